use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::CvcvError;
use super::normalizer::{AliasNormalizer, NormalizeRule};
use super::symbols::parse_replacements;

/// Phonetic sub-class of a consonant, used to scale transition lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsonantClass {
    Stop,
    Tap,
    Affricate,
    LongFricative,
    SemiLongSonorant,
    Unclassified,
}

/// Classification of a single inventory symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Vowel,
    Consonant(ConsonantClass),
}

/// Consonant sub-class membership lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsonantClasses {
    pub stop: Vec<String>,
    pub tap: Vec<String>,
    pub affricate: Vec<String>,
    pub long_fricative: Vec<String>,
    pub semi_long_sonorant: Vec<String>,
}

/// Transition length multipliers, one per boundary classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionMultipliers {
    pub stop: f64,
    pub tap: f64,
    pub long_fricative: f64,
    pub affricate: f64,
    pub semi_long_sonorant: f64,
    /// Vowel-initial alias carrying a boundary marker, e.g. `[a-]`.
    pub vowel_ending: f64,
    /// Consonant directly followed by a boundary marker, e.g. `[t-]`.
    pub consonant_ending: f64,
    pub default: f64,
}

impl Default for TransitionMultipliers {
    fn default() -> Self {
        Self {
            stop: 1.3,
            tap: 0.7,
            long_fricative: 2.3,
            affricate: 1.5,
            semi_long_sonorant: 1.7,
            vowel_ending: 1.0,
            consonant_ending: 0.5,
            default: 1.0,
        }
    }
}

impl TransitionMultipliers {
    pub fn for_class(&self, class: ConsonantClass) -> f64 {
        match class {
            ConsonantClass::Stop => self.stop,
            ConsonantClass::Tap => self.tap,
            ConsonantClass::Affricate => self.affricate,
            ConsonantClass::LongFricative => self.long_fricative,
            ConsonantClass::SemiLongSonorant => self.semi_long_sonorant,
            ConsonantClass::Unclassified => self.default,
        }
    }
}

/// Where glide proxies are applied during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlideProxyMode {
    /// Only a lone glide before the end marker, e.g. `[w-]` -> `[u-]`.
    #[default]
    BoundaryOnly,
    /// Also any glide touching a consonant, e.g. `[wk]` -> `[uk]`.
    BesideConsonant,
}

/// A plain `from` -> `to` spelling rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// A symbol found while scanning an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'r> {
    pub symbol: &'r str,
    /// Byte offset of the symbol within the alias.
    pub offset: usize,
    pub kind: SymbolKind,
    /// The next non-space character after the symbol is a boundary marker.
    pub before_boundary: bool,
}

/// Everything a CVCV voicebank convention is parameterized by.
///
/// Rulesets are plain data: they can be built from the presets below or
/// loaded from JSON with [`load_ruleset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub name: String,
    pub vowels: Vec<String>,
    pub consonants: Vec<String>,
    #[serde(default)]
    pub classes: ConsonantClasses,
    #[serde(default)]
    pub multipliers: TransitionMultipliers,
    /// Vowel -> glide consonant inserted when a vowel-vowel alias is missing.
    #[serde(default)]
    pub glide_exceptions: BTreeMap<String, String>,
    /// Consonant -> stand-in used when the library lacks that consonant.
    #[serde(default)]
    pub missing_consonants: BTreeMap<String, String>,
    /// Aliases whose absence marks a library as missing consonants.
    #[serde(default)]
    pub missing_consonant_probes: Vec<String>,
    /// Diphthong -> monophthong used in front of a consonant.
    #[serde(default)]
    pub diphthong_proxies: BTreeMap<String, String>,
    /// Glide -> vowel proxy.
    #[serde(default)]
    pub glide_proxies: BTreeMap<String, String>,
    #[serde(default)]
    pub glide_proxy_mode: GlideProxyMode,
    /// Rhotic spelling unification, applied in order.
    #[serde(default)]
    pub rhotic_rules: Vec<Substitution>,
    /// Marker appended to the second half of a split diphthong.
    #[serde(default = "default_split_marker")]
    pub split_marker: String,
    /// Diphthongs that are split when the library has no alias for them.
    #[serde(default)]
    pub splittable_diphthongs: Vec<String>,
    /// Source dictionary symbol -> inventory symbol.
    #[serde(default)]
    pub dictionary_replacements: BTreeMap<String, String>,
}

fn default_split_marker() -> String {
    "^".to_string()
}

fn strings(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const DE_DICTIONARY_REPLACEMENTS: &str = "aa=a,ae=E,ah=@,ao=O,aw=aU,ax=@,ay=aI,\
    b=b,cc=ch,ch=S,d=d,dh=ss,ee=e,eh=E,er=6,ex=R,f=f,g=g,hh=h,ih=I,iy=i,jh=dZ,\
    k=k,l=l,m=m,n=n,ng=N,oe=oe,ohh=0,ooh=o,oy=OI,p=p,pf=pf,r=r;,rr=r;,s=ss,\
    sh=S,t=t,th=ss,ts=z,ue=y,uh=U,uw=u,v=w,w=w,x=x,y=j,yy=Y,z=s,zh=Z";

const SPLITTABLE_DIPHTHONGS: &str = "aI,eI,OI,aU,oU,ai,ei,Oi,au,ou,Ou,@u";

impl Ruleset {
    /// German CVCV convention.
    pub fn de_cvcv() -> Self {
        Self {
            name: "DE CVCV".to_string(),
            vowels: strings("a,@,6,E,e,i,I,O,o,U,u,oe,0,Y,y,aU,aI,OI"),
            consonants: strings("b,ch,d,dZ,f,g,h,j,k,m,n,N,l,p,pf,r,R,s,ss,S,t,w,x,z,Z"),
            classes: ConsonantClasses {
                stop: strings("b,d,g,k,p,t"),
                tap: strings("r"),
                affricate: strings("pf,ch,dZ,x"),
                long_fricative: strings("f,s,ss,S,z,Z,R"),
                semi_long_sonorant: strings("h,j,m,n,N,l,w"),
            },
            multipliers: TransitionMultipliers::default(),
            glide_exceptions: table(&[
                ("O", "w"),
                ("o", "w"),
                ("U", "w"),
                ("u", "w"),
                ("aU", "w"),
                ("Y", "j"),
                ("y", "j"),
                ("aI", "j"),
                ("OI", "j"),
                ("i", "j"),
                ("6", "r"),
            ]),
            missing_consonants: table(&[("w", "u"), ("R", "6")]),
            missing_consonant_probes: strings("w,wR"),
            diphthong_proxies: table(&[("aI", "e"), ("OI", "e"), ("aU", "u")]),
            glide_proxies: table(&[("w", "u"), ("y", "i")]),
            glide_proxy_mode: GlideProxyMode::BoundaryOnly,
            rhotic_rules: vec![Substitution::new("r;", "r"), Substitution::new("6", "R")],
            split_marker: default_split_marker(),
            splittable_diphthongs: strings(SPLITTABLE_DIPHTHONGS),
            dictionary_replacements: parse_replacements(DE_DICTIONARY_REPLACEMENTS),
        }
    }

    /// Older German CVCV banks: `dz` affricate, `y` glide, proxies for every
    /// glide touching a consonant and shorter tap/fricative transitions.
    pub fn de_cvcv_legacy() -> Self {
        let mut dictionary_replacements = parse_replacements(DE_DICTIONARY_REPLACEMENTS);
        dictionary_replacements.insert("ex".to_string(), "6".to_string());
        dictionary_replacements.insert("jh".to_string(), "dz".to_string());

        Self {
            name: "DE CVCV (legacy)".to_string(),
            vowels: strings("a,@,6,E,i,I,O,o,U,u,oe,0,Y,y,aU,aI,OI"),
            consonants: strings("b,ch,d,dz,f,g,h,j,k,m,n,N,l,p,pf,r,R,s,ss,S,t,w,x,z,Z"),
            classes: ConsonantClasses {
                stop: strings("b,d,g,k,p,t,R"),
                tap: strings("r"),
                affricate: strings("ch,dz,x"),
                long_fricative: strings("f,pf,s,ss,S,z,Z"),
                semi_long_sonorant: strings("h,j,m,n,N,l,w"),
            },
            multipliers: TransitionMultipliers {
                tap: 0.5,
                long_fricative: 2.0,
                ..TransitionMultipliers::default()
            },
            glide_exceptions: table(&[
                ("O", "w"),
                ("o", "w"),
                ("U", "w"),
                ("u", "w"),
                ("aU", "w"),
                ("Y", "y"),
                ("y", "y"),
                ("aI", "y"),
                ("OI", "y"),
                ("i", "y"),
                ("E", "y"),
                ("I", "y"),
                ("6", "r"),
            ]),
            missing_consonants: table(&[("w", "u"), ("R", "6")]),
            missing_consonant_probes: strings("w,wR"),
            diphthong_proxies: BTreeMap::new(),
            glide_proxies: table(&[("w", "u"), ("y", "i")]),
            glide_proxy_mode: GlideProxyMode::BesideConsonant,
            rhotic_rules: vec![Substitution::new("r;", "r"), Substitution::new("6", "R")],
            split_marker: default_split_marker(),
            splittable_diphthongs: strings(SPLITTABLE_DIPHTHONGS),
            dictionary_replacements,
        }
    }

    /// Parse and validate a ruleset from JSON text.
    pub fn from_json(content: &str) -> Result<Self, CvcvError> {
        let ruleset: Ruleset = serde_json::from_str(content)
            .map_err(|e| CvcvError::Ruleset(format!("Failed to parse JSON: {e}")))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Check the invariants the resolver relies on.
    pub fn validate(&self) -> Result<(), CvcvError> {
        if self.vowels.is_empty() {
            return Err(CvcvError::Ruleset("'vowels' must not be empty".to_string()));
        }
        if let Some(symbol) = self.vowels.iter().find(|v| self.consonants.contains(v)) {
            return Err(CvcvError::Ruleset(format!(
                "{symbol:?} is listed as both vowel and consonant"
            )));
        }
        if let Some(symbol) = self
            .vowels
            .iter()
            .chain(&self.consonants)
            .find(|s| s.is_empty() || s.contains([' ', '-']))
        {
            return Err(CvcvError::Ruleset(format!(
                "Invalid inventory symbol {symbol:?}"
            )));
        }

        let rewrite_sources = self
            .missing_consonants
            .keys()
            .chain(self.diphthong_proxies.keys())
            .chain(self.glide_proxies.keys())
            .chain(self.rhotic_rules.iter().map(|rule| &rule.from));
        if rewrite_sources.into_iter().any(String::is_empty) {
            return Err(CvcvError::Ruleset(
                "Rewrite rules must not have an empty source".to_string(),
            ));
        }

        for missing_consonants in [false, true] {
            self.check_rewrites_settle(missing_consonants)?;
        }
        Ok(())
    }

    /// Reject rewrite tables that can feed themselves: a rule whose output
    /// contains its own source, or a chain of rules leading back to its start.
    fn check_rewrites_settle(&self, missing_consonants: bool) -> Result<(), CvcvError> {
        let normalizer = AliasNormalizer::new(self, missing_consonants);
        let rewrites: Vec<(&str, &str)> = normalizer
            .rules()
            .iter()
            .filter_map(NormalizeRule::rewrite)
            .collect();

        if let Some((from, to)) = rewrites.iter().find(|(from, to)| to.contains(from)) {
            return Err(CvcvError::Ruleset(format!(
                "Rewrite {from:?} -> {to:?} reintroduces its own source"
            )));
        }

        let feeds = |a: usize, b: usize| rewrites[a].1.contains(rewrites[b].0);
        for start in 0..rewrites.len() {
            let mut seen = vec![false; rewrites.len()];
            let mut pending: Vec<usize> =
                (0..rewrites.len()).filter(|&j| feeds(start, j)).collect();
            while let Some(j) = pending.pop() {
                if j == start {
                    let (from, to) = rewrites[start];
                    return Err(CvcvError::Ruleset(format!(
                        "Rewrite {from:?} -> {to:?} is part of a rewrite cycle"
                    )));
                }
                if std::mem::replace(&mut seen[j], true) {
                    continue;
                }
                pending.extend((0..rewrites.len()).filter(|&k| feeds(j, k)));
            }
        }
        Ok(())
    }

    /// Whether `symbol` is a vowel, ignoring a trailing split marker.
    pub fn is_vowel(&self, symbol: &str) -> bool {
        let symbol = if self.split_marker.is_empty() {
            symbol
        } else {
            symbol.trim_end_matches(self.split_marker.as_str())
        };
        self.vowels.iter().any(|v| v == symbol)
    }

    pub fn is_consonant(&self, symbol: &str) -> bool {
        self.consonants.iter().any(|c| c == symbol)
    }

    pub fn consonant_class(&self, symbol: &str) -> ConsonantClass {
        let classes = [
            (&self.classes.stop, ConsonantClass::Stop),
            (&self.classes.tap, ConsonantClass::Tap),
            (&self.classes.affricate, ConsonantClass::Affricate),
            (&self.classes.long_fricative, ConsonantClass::LongFricative),
            (&self.classes.semi_long_sonorant, ConsonantClass::SemiLongSonorant),
        ];
        classes
            .into_iter()
            .find(|(members, _)| members.iter().any(|m| m == symbol))
            .map(|(_, class)| class)
            .unwrap_or(ConsonantClass::Unclassified)
    }

    /// Longest inventory symbol at the start of `text`.
    fn longest_symbol(&self, text: &str) -> Option<(&str, SymbolKind)> {
        let vowels = self.vowels.iter().map(|v| (v.as_str(), SymbolKind::Vowel));
        let consonants = self
            .consonants
            .iter()
            .map(|c| (c.as_str(), SymbolKind::Consonant(self.consonant_class(c))));
        vowels
            .chain(consonants)
            .filter(|(symbol, _)| text.starts_with(symbol))
            .max_by_key(|(symbol, _)| symbol.len())
    }

    /// Split an alias into inventory symbols by longest match.
    ///
    /// Spaces and boundary markers separate symbols but are not returned;
    /// characters outside the inventory are skipped.
    pub fn tokenize(&self, alias: &str) -> Vec<Token<'_>> {
        let mut tokens = Vec::new();
        let mut offset = 0;

        while let Some(ch) = alias[offset..].chars().next() {
            if ch == ' ' || ch == '-' {
                offset += ch.len_utf8();
                continue;
            }
            match self.longest_symbol(&alias[offset..]) {
                Some((symbol, kind)) => {
                    let end = offset + symbol.len();
                    tokens.push(Token {
                        symbol,
                        offset,
                        kind,
                        before_boundary: alias[end..].trim_start().starts_with('-'),
                    });
                    offset = end;
                }
                None => offset += ch.len_utf8(),
            }
        }

        tokens
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::de_cvcv()
    }
}

/// Load a ruleset from a JSON file.
///
/// Fields other than `name`, `vowels` and `consonants` may be omitted and
/// take neutral defaults.
pub fn load_ruleset(path: &Path) -> Result<Ruleset, CvcvError> {
    let content = std::fs::read_to_string(path)?;
    let ruleset = Ruleset::from_json(&content)?;
    log::info!(
        "Loaded ruleset '{}' ({} vowels, {} consonants) from {}",
        ruleset.name,
        ruleset.vowels.len(),
        ruleset.consonants.len(),
        path.display()
    );
    Ok(ruleset)
}
