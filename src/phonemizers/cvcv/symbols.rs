use std::collections::BTreeMap;
use std::path::Path;

use crate::{LibraryOracle, Tone};

use super::error::CvcvError;

/// Parse a `src=dst,src=dst` replacement list.
///
/// Malformed entries are ignored, and entries mapping a symbol onto itself
/// are omitted since they would be no-ops.
pub fn parse_replacements(list: &str) -> BTreeMap<String, String> {
    list.split(',')
        .map(|entry| entry.split('=').map(str::trim).collect::<Vec<_>>())
        .filter(|parts| parts.len() == 2 && !parts[0].is_empty())
        .filter(|parts| parts[0] != parts[1])
        .map(|parts| (parts[0].to_string(), parts[1].to_string()))
        .collect()
}

/// Load a supplementary replacement table from a JSON object of strings.
pub fn load_replacements(path: &Path) -> Result<BTreeMap<String, String>, CvcvError> {
    let content = std::fs::read_to_string(path)?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| CvcvError::Replacements(format!("Failed to parse JSON: {e}")))?;

    let obj = json
        .as_object()
        .ok_or_else(|| CvcvError::Replacements("Top level must be an object".to_string()))?;

    let mut map = BTreeMap::new();
    for (k, v) in obj {
        let target = v.as_str().ok_or_else(|| {
            CvcvError::Replacements(format!("Non-string replacement for key {k:?}"))
        })?;
        if k != target {
            map.insert(k.clone(), target.to_string());
        }
    }

    Ok(map)
}

/// Maps source dictionary symbols onto the ruleset inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementTable {
    entries: BTreeMap<String, String>,
}

impl ReplacementTable {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Merge a supplementary table over this one; supplementary entries win.
    pub fn merge(&mut self, supplementary: BTreeMap<String, String>) {
        self.entries.extend(supplementary);
    }

    /// Merge a supplementary table from disk.
    ///
    /// A table that fails to load is logged and skipped, leaving the base
    /// entries in place.
    pub fn with_supplementary_file(mut self, path: &Path) -> Self {
        match load_replacements(path) {
            Ok(entries) => {
                log::info!(
                    "Merged {} supplementary replacements from {}",
                    entries.len(),
                    path.display()
                );
                self.merge(entries);
            }
            Err(e) => log::error!("Failed to load {}: {e}", path.display()),
        }
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.entries.get(symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every mapped symbol; unmapped symbols pass through.
    pub fn apply<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<String> {
        symbols
            .iter()
            .map(|s| {
                let s = s.as_ref();
                self.get(s).unwrap_or(s).to_string()
            })
            .collect()
    }
}

/// IPA sequences and their CVCV spelling, longest first where prefixes overlap.
const IPA_TABLE: &[(&str, &str)] = &[
    ("dʒ", "dZ"),
    ("ts", "z"),
    ("ə", "@"),
    ("ɜ", "@"),
    ("ɛ", "E"),
    ("ɪ", "I"),
    ("ɔ", "O"),
    ("ʊ", "U"),
    ("œ", "oe"),
    ("ø", "0"),
    ("ç", "ch"),
    ("ŋ", "N"),
    ("ɾ", "R"),
    ("s", "ss"),
    ("z", "s"),
    ("ʃ", "S"),
    ("v", "w"),
];

/// Stress, tie and length marks carry no alias information.
fn is_ipa_decoration(ch: char) -> bool {
    matches!(ch, 'ˈ' | 'ˌ' | '\u{0361}' | 'ː')
}

/// Transliterate IPA text into the CVCV inventory spelling.
///
/// The scan is a single left-to-right pass, so a replacement is never
/// rewritten again (`ts` becomes `z`, while a plain `z` becomes `s`).
pub fn ipa_to_cvcv(ipa: &str) -> String {
    let cleaned: String = ipa.chars().filter(|&ch| !is_ipa_decoration(ch)).collect();
    let mut out = String::with_capacity(cleaned.len());
    let mut rest = cleaned.as_str();

    while let Some(ch) = rest.chars().next() {
        match IPA_TABLE.iter().find(|(ipa, _)| rest.starts_with(ipa)) {
            Some((ipa, cvcv)) => {
                out.push_str(cvcv);
                rest = &rest[ipa.len()..];
            }
            None => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    out
}

/// Split diphthongs the library has no alias for.
///
/// `aI` becomes `a` followed by `I` plus the split marker, so the second half
/// still classifies as a vowel and the marker is stripped on normalization.
pub fn split_diphthongs<S: AsRef<str>>(
    symbols: &[S],
    diphthongs: &[String],
    marker: &str,
    oracle: &dyn LibraryOracle,
    tone: Tone,
) -> Vec<String> {
    let mut out = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let symbol = symbol.as_ref();
        let splittable = diphthongs.iter().any(|d| d == symbol);
        if splittable
            && !oracle.exists(&format!("- {symbol}"), tone)
            && !oracle.exists(symbol, tone)
        {
            let mut chars = symbol.chars();
            if let (Some(first), Some(second)) = (chars.next(), chars.next()) {
                log::debug!("Splitting diphthong {symbol:?} missing from the library");
                out.push(first.to_string());
                out.push(format!("{second}{marker}"));
                continue;
            }
        }
        out.push(symbol.to_string());
    }
    out
}
