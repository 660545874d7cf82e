//! Alias normalization.
//!
//! Candidate aliases are spelled from the transcription, but voicebanks use
//! their own conventions: some lack consonants, some record diphthongs only
//! before vowels, some join every symbol without separators. The normalizer
//! rewrites a candidate into that spelling through an ordered rule table.
//!
//! Rule order:
//! 1. missing consonant substitution (session dependent)
//! 2. diphthong proxies in front of consonants
//! 3. glide proxies
//! 4. rhotic unification
//! 5. split-diphthong marker removal
//! 6. separator collapsing
//!
//! The table is re-applied until a pass leaves the alias unchanged, so a
//! rewrite that exposes a new match (for example collapsing `aI k` into `aIk`)
//! is handled and `normalize` is idempotent.

use super::ruleset::{GlideProxyMode, Ruleset};

/// Minimum number of rule table passes before giving up. Rulesets that pass
/// [`Ruleset::validate`] have no rewrite feeding itself, so the shipped
/// tables settle in two or three passes; shrinking rules such as `kk` -> `k`
/// may need up to one pass per character, which raises the bound.
const MAX_PASSES: usize = 8;

/// A single rewrite step of the normalization table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeRule {
    /// Replace every occurrence of `from`.
    Substitute { from: String, to: String },
    /// Replace a diphthong when a consonant follows it directly.
    DiphthongBeforeConsonant { diphthong: String, proxy: String },
    /// Replace a lone glide before the end marker, e.g. `[w-]`.
    GlideAtBoundary { glide: String, proxy: String },
    /// Replace a glide directly preceded or followed by a consonant.
    GlideBesideConsonant { glide: String, proxy: String },
    /// Remove every occurrence of a marker.
    StripMarker(String),
    /// Remove separator spaces.
    CollapseSpaces,
}

impl NormalizeRule {
    /// Source and replacement text of a rewriting rule.
    pub fn rewrite(&self) -> Option<(&str, &str)> {
        match self {
            NormalizeRule::Substitute { from, to } => Some((from.as_str(), to.as_str())),
            NormalizeRule::DiphthongBeforeConsonant { diphthong, proxy } => {
                Some((diphthong.as_str(), proxy.as_str()))
            }
            NormalizeRule::GlideAtBoundary { glide, proxy }
            | NormalizeRule::GlideBesideConsonant { glide, proxy } => {
                Some((glide.as_str(), proxy.as_str()))
            }
            NormalizeRule::StripMarker(_) | NormalizeRule::CollapseSpaces => None,
        }
    }
}

/// Rewrites candidate aliases into a library's spelling.
#[derive(Debug, Clone)]
pub struct AliasNormalizer {
    rules: Vec<NormalizeRule>,
    consonants: Vec<String>,
}

impl AliasNormalizer {
    /// Build the rule table for a ruleset.
    ///
    /// `missing_consonants` is the session probe result; when set, the
    /// ruleset's stand-ins are substituted and rhotic rules that would
    /// reintroduce a missing symbol are left out.
    pub fn new(ruleset: &Ruleset, missing_consonants: bool) -> Self {
        let mut rules = Vec::new();

        if missing_consonants {
            for (from, to) in &ruleset.missing_consonants {
                rules.push(NormalizeRule::Substitute {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        for (diphthong, proxy) in &ruleset.diphthong_proxies {
            rules.push(NormalizeRule::DiphthongBeforeConsonant {
                diphthong: diphthong.clone(),
                proxy: proxy.clone(),
            });
        }

        for (glide, proxy) in &ruleset.glide_proxies {
            rules.push(NormalizeRule::GlideAtBoundary {
                glide: glide.clone(),
                proxy: proxy.clone(),
            });
            if ruleset.glide_proxy_mode == GlideProxyMode::BesideConsonant {
                rules.push(NormalizeRule::GlideBesideConsonant {
                    glide: glide.clone(),
                    proxy: proxy.clone(),
                });
            }
        }

        for rule in &ruleset.rhotic_rules {
            if missing_consonants && ruleset.missing_consonants.contains_key(&rule.to) {
                continue;
            }
            rules.push(NormalizeRule::Substitute {
                from: rule.from.clone(),
                to: rule.to.clone(),
            });
        }

        if !ruleset.split_marker.is_empty() {
            rules.push(NormalizeRule::StripMarker(ruleset.split_marker.clone()));
        }
        rules.push(NormalizeRule::CollapseSpaces);

        Self {
            rules,
            consonants: ruleset.consonants.clone(),
        }
    }

    pub fn rules(&self) -> &[NormalizeRule] {
        &self.rules
    }

    /// Rewrite `alias` into the library's spelling.
    pub fn normalize(&self, alias: &str) -> String {
        let mut current = alias.to_string();
        for _ in 0..MAX_PASSES.max(alias.len()) {
            let next = self
                .rules
                .iter()
                .fold(current.clone(), |acc, rule| self.apply(rule, &acc));
            if next == current {
                return current;
            }
            current = next;
        }
        log::warn!("Normalization of {alias:?} did not settle, using {current:?}");
        current
    }

    fn apply(&self, rule: &NormalizeRule, alias: &str) -> String {
        match rule {
            NormalizeRule::Substitute { from, to } => {
                if from.is_empty() {
                    alias.to_string()
                } else {
                    alias.replace(from.as_str(), to)
                }
            }
            NormalizeRule::DiphthongBeforeConsonant { diphthong, proxy } => {
                self.replace_where(alias, diphthong, proxy, |_, after| {
                    self.starts_with_consonant(after)
                })
            }
            NormalizeRule::GlideAtBoundary { glide, proxy } => {
                let compact: String = alias.chars().filter(|&ch| ch != ' ').collect();
                if compact.strip_suffix('-') == Some(glide.as_str()) {
                    format!("{proxy}-")
                } else {
                    alias.to_string()
                }
            }
            NormalizeRule::GlideBesideConsonant { glide, proxy } => {
                self.replace_where(alias, glide, proxy, |before, after| {
                    self.ends_with_consonant(before) || self.starts_with_consonant(after)
                })
            }
            NormalizeRule::StripMarker(marker) => {
                if marker.is_empty() {
                    alias.to_string()
                } else {
                    alias.replace(marker.as_str(), "")
                }
            }
            NormalizeRule::CollapseSpaces => alias.replace(' ', ""),
        }
    }

    /// Replace occurrences of `pattern` for which `accept(before, after)`
    /// holds, judging context against the unmodified alias.
    fn replace_where<F>(&self, alias: &str, pattern: &str, replacement: &str, accept: F) -> String
    where
        F: Fn(&str, &str) -> bool,
    {
        if pattern.is_empty() {
            return alias.to_string();
        }

        let mut out = String::with_capacity(alias.len());
        let mut cursor = 0;
        while let Some(found) = alias[cursor..].find(pattern) {
            let start = cursor + found;
            let end = start + pattern.len();
            out.push_str(&alias[cursor..start]);
            if accept(&alias[..start], &alias[end..]) {
                out.push_str(replacement);
            } else {
                out.push_str(pattern);
            }
            cursor = end;
        }
        out.push_str(&alias[cursor..]);
        out
    }

    fn starts_with_consonant(&self, text: &str) -> bool {
        self.consonants.iter().any(|c| text.starts_with(c.as_str()))
    }

    fn ends_with_consonant(&self, text: &str) -> bool {
        self.consonants.iter().any(|c| text.ends_with(c.as_str()))
    }
}
