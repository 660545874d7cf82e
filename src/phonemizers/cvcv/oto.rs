use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{LibraryOracle, Tone};

use super::error::CvcvError;

/// A pitch range recorded as a separate set of samples.
///
/// Aliases in a sub-bank carry `suffix` appended to the base alias, e.g.
/// `ka_H` for a high sub-bank with suffix `_H`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subbank {
    pub min_tone: Tone,
    pub max_tone: Tone,
    #[serde(default)]
    pub suffix: String,
}

impl Subbank {
    pub fn contains(&self, tone: Tone) -> bool {
        (self.min_tone..=self.max_tone).contains(&tone)
    }
}

/// Alias index of a voicebank built from its `oto.ini`.
#[derive(Debug, Clone, Default)]
pub struct OtoIndex {
    aliases: HashSet<String>,
    subbanks: Vec<Subbank>,
}

impl OtoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_aliases<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            subbanks: Vec::new(),
        }
    }

    pub fn with_subbanks(mut self, subbanks: Vec<Subbank>) -> Self {
        self.subbanks = subbanks;
        self
    }

    /// Parse `oto.ini` text.
    ///
    /// Each entry reads `file.wav=alias,offset,consonant,cutoff,preutter,overlap`.
    /// Only the alias is kept; an empty alias registers the file stem instead.
    /// Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Result<Self, CvcvError> {
        let mut index = Self::new();

        for (n, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (file, params) = line.split_once('=').ok_or_else(|| CvcvError::OtoParse {
                line: n + 1,
                reason: "missing '='".to_string(),
            })?;

            let alias = params.split(',').next().unwrap_or_default().trim();
            if !alias.is_empty() {
                index.insert(alias);
                continue;
            }

            let stem = Path::new(file.trim())
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default();
            if stem.is_empty() {
                return Err(CvcvError::OtoParse {
                    line: n + 1,
                    reason: "entry has neither alias nor file name".to_string(),
                });
            }
            index.insert(stem);
        }

        Ok(index)
    }

    /// Load and parse an `oto.ini` file.
    pub fn load(path: &Path) -> Result<Self, CvcvError> {
        let content = std::fs::read_to_string(path)?;
        let index = Self::parse(&content)?;
        log::info!("Indexed {} aliases from {}", index.len(), path.display());
        Ok(index)
    }

    pub fn insert(&mut self, alias: impl Into<String>) {
        self.aliases.insert(alias.into());
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains(alias)
    }

    /// Suffix of the sub-bank covering `tone`, empty when none does.
    pub fn suffix_for(&self, tone: Tone) -> &str {
        self.subbanks
            .iter()
            .find(|subbank| subbank.contains(tone))
            .map(|subbank| subbank.suffix.as_str())
            .unwrap_or_default()
    }
}

impl LibraryOracle for OtoIndex {
    fn exists(&self, alias: &str, tone: Tone) -> bool {
        let suffix = self.suffix_for(tone);
        if !suffix.is_empty() && self.aliases.contains(&format!("{alias}{suffix}")) {
            return true;
        }
        self.aliases.contains(alias)
    }

    fn same_subbank(&self, a: Tone, b: Tone) -> bool {
        self.suffix_for(a) == self.suffix_for(b)
    }
}

/// Find the pitch suffix of a bank from its `-E` or `pfE` entry.
///
/// The suffix is whatever follows the `E` up to the first comma, e.g. `_H` in
/// `_e.wav=-E_H,...`. When several entries qualify the last one wins.
pub fn detect_pitch_suffix(content: &str) -> Option<String> {
    content
        .lines()
        .filter(|line| line.contains("-E") || line.contains("pfE"))
        .filter_map(|line| {
            let start = line.find('E')? + 1;
            let end = line.find(',')?;
            line.get(start..end).map(str::to_string)
        })
        .last()
}

/// Duplication rules as (pattern, replacements), matched against the
/// original entry and applied to the entry with `X` already spelled `ch`.
fn duplication_rules(suffix: &str) -> Vec<(String, Vec<String>)> {
    let tail = |symbol: &str| format!("{symbol}{suffix},");
    let plain = |text: &str| text.to_string();

    vec![
        // consonants
        (plain("=n"), vec![plain("=N")]),
        (tail("n"), vec![tail("N")]),
        (tail("h"), vec![tail("-")]),
        (plain("S"), vec![plain("Z"), plain("dZ")]),
        // vowels
        (plain("E"), vec![plain("oe"), plain("@")]),
        (plain("Y"), vec![plain("0")]),
        // vowel-consonant entries
        (plain("=o"), vec![plain("=U")]),
        (plain("=e"), vec![plain("=I")]),
        // consonant-vowel entries
        (tail("o"), vec![tail("U")]),
        (tail("e"), vec![tail("I")]),
        // diphthongs
        (tail("a"), vec![tail("aU"), tail("aI")]),
        (tail("O"), vec![tail("OI")]),
        (plain("=o"), vec![plain("=aU")]),
        (plain("=e"), vec![plain("=aI"), plain("=OI")]),
    ]
}

/// Rewrite an `oto.ini` so a bank recorded with a reduced inventory covers the
/// full one.
///
/// `X` is respelled `ch`, and every entry gains copies standing in for
/// symbols the bank never recorded (`N` from `n`, `Z` and `dZ` from `S`, `oe`
/// and `@` from `E`, diphthongs from their first vowel, ...). A copy that
/// repeats an entry already written for the same line is skipped.
pub fn rephonemize(content: &str) -> String {
    let suffix = detect_pitch_suffix(content).unwrap_or_else(|| {
        log::warn!("No -E or pfE entry found, assuming no pitch suffix");
        String::new()
    });
    let rules = duplication_rules(&suffix);

    let mut out = String::with_capacity(content.len() * 2);
    let mut added = 0;
    for line in content.lines() {
        let respelled = line.replace('X', "ch");
        let mut written = vec![respelled.clone()];

        for (pattern, replacements) in &rules {
            if !line.contains(pattern.as_str()) {
                continue;
            }
            for replacement in replacements {
                let copy = respelled.replace(pattern.as_str(), replacement);
                if !written.contains(&copy) {
                    written.push(copy);
                }
            }
        }

        added += written.len() - 1;
        for entry in written {
            out.push_str(&entry);
            out.push('\n');
        }
    }

    log::info!("Rephonemized oto.ini with suffix {suffix:?}, {added} entries added");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const OTO: &str = "\
# CVCV bank
_ka.wav=- ka,10,120,-200,80,30
_ka.wav=ka,250,120,-200,80,30

_at.wav=,0,100,-150,60,20
_at.wav=a t,300,100,-150,60,20
";

    #[test]
    fn parses_aliases_and_file_stems() {
        let index = OtoIndex::parse(OTO).expect("valid oto");
        assert_eq!(index.len(), 4);
        assert!(index.contains("- ka"));
        assert!(index.contains("ka"));
        assert!(index.contains("_at"));
        assert!(index.contains("a t"));
    }

    #[test]
    fn reports_line_of_malformed_entry() {
        let err = OtoIndex::parse("a.wav=a,0\nbroken line\n").unwrap_err();
        assert!(matches!(err, CvcvError::OtoParse { line: 2, .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{OTO}").expect("write oto");
        let index = OtoIndex::load(file.path()).expect("oto loads");
        assert!(index.exists("ka", 0));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = OtoIndex::load(Path::new("/nonexistent/oto.ini")).unwrap_err();
        assert!(matches!(err, CvcvError::Io(_)));
    }

    #[test]
    fn resolves_pitch_subbanks() {
        let index = OtoIndex::from_aliases(["ka", "ka_H", "ta"]).with_subbanks(vec![
            Subbank {
                min_tone: 0,
                max_tone: 59,
                suffix: String::new(),
            },
            Subbank {
                min_tone: 60,
                max_tone: 127,
                suffix: "_H".to_string(),
            },
        ]);

        assert_eq!(index.suffix_for(72), "_H");
        assert!(index.exists("ka", 72));
        // Aliases absent from the sub-bank fall back to the base spelling.
        assert!(index.exists("ta", 72));
        assert!(index.same_subbank(10, 40));
        assert!(!index.same_subbank(40, 72));
    }

    const REDUCED_OTO: &str = "\
_e.wav=-E_H,0,100,-200,80,30
_na.wav=na_H,0,100,-200,80,30
_aS.wav=a S_H,0,100,-200,80,30
_aX.wav=a X_H,0,100,-200,80,30
_o.wav=o_H,0,100,-200,80,30
_eo.wav=e o_H,0,100,-200,80,30
";

    #[test]
    fn detects_pitch_suffix() {
        assert_eq!(detect_pitch_suffix(REDUCED_OTO).as_deref(), Some("_H"));
        assert_eq!(
            detect_pitch_suffix("_pfe.wav=pfE,0,1,2,3,4").as_deref(),
            Some("")
        );
        assert_eq!(detect_pitch_suffix(OTO), None);
    }

    #[test]
    fn rephonemize_duplicates_missing_symbols() {
        let out = rephonemize(REDUCED_OTO);
        let lines: Vec<&str> = out.lines().collect();
        let has = |alias: &str| lines.iter().any(|line| line.contains(&format!("={alias},")));

        // X is respelled, the original entries stay.
        assert!(has("a ch_H"));
        assert!(!out.contains('X'));
        assert!(has("na_H"));
        // consonants
        assert!(has("Na_H"));
        assert!(has("a Z_H"));
        assert!(has("a dZ_H"));
        // vowels
        assert!(has("-oe_H"));
        assert!(has("-@_H"));
        assert!(has("U_H"));
        assert!(has("e U_H"));
        // diphthongs
        assert!(has("naU_H"));
        assert!(has("naI_H"));
        assert!(has("aU_H"));
    }

    #[test]
    fn rephonemize_skips_repeated_copies() {
        let out = rephonemize(REDUCED_OTO);
        let copies = out.lines().filter(|line| *line == "_o.wav=U_H,0,100,-200,80,30");
        assert_eq!(copies.count(), 1);
    }

    #[test]
    fn rephonemized_bank_indexes_new_aliases() {
        let index = OtoIndex::parse(&rephonemize(REDUCED_OTO)).expect("valid oto");
        assert!(index.contains("Na_H"));
        assert!(index.contains("-@_H"));
        assert!(index.len() > OtoIndex::parse(REDUCED_OTO).expect("valid oto").len());
    }

    #[test]
    fn subbanks_deserialize_from_json() {
        let subbanks: Vec<Subbank> =
            serde_json::from_str(r#"[{ "min_tone": 60, "max_tone": 127, "suffix": "_H" }]"#)
                .expect("valid subbanks");
        assert!(subbanks[0].contains(60));
        assert!(!subbanks[0].contains(59));
    }
}
