use crate::{Ending, LibraryOracle, Phonemizer, ResolvedPhoneme, Syllable, Tone, Word};

use super::duration::transition_multiplier;
use super::endings::process_ending;
use super::normalizer::AliasNormalizer;
use super::ruleset::Ruleset;
use super::symbols::{split_diphthongs, ReplacementTable};
use super::syllables::process_syllable;

/// Per-library state captured once at the start of a session.
#[derive(Debug, Clone)]
pub struct CvcvSession {
    missing_consonants: bool,
    normalizer: AliasNormalizer,
}

impl CvcvSession {
    /// Whether the library failed the missing-consonant probe.
    pub fn missing_consonants(&self) -> bool {
        self.missing_consonants
    }

    pub fn normalizer(&self) -> &AliasNormalizer {
        &self.normalizer
    }
}

/// Oracle queries with normalization fallback, shared by the resolvers.
pub(crate) struct Lookup<'a> {
    oracle: &'a dyn LibraryOracle,
    normalizer: &'a AliasNormalizer,
}

impl<'a> Lookup<'a> {
    pub(crate) fn new(oracle: &'a dyn LibraryOracle, session: &'a CvcvSession) -> Self {
        Self {
            oracle,
            normalizer: &session.normalizer,
        }
    }

    /// The spelling of `alias` the library has: as written, else normalized.
    pub(crate) fn confirm(&self, alias: &str, tone: Tone) -> Option<String> {
        if self.oracle.exists(alias, tone) {
            return Some(alias.to_string());
        }
        let normalized = self.normalizer.normalize(alias);
        if normalized != alias && self.oracle.exists(&normalized, tone) {
            return Some(normalized);
        }
        None
    }

    /// First candidate the library confirms.
    pub(crate) fn first(&self, candidates: &[String], tone: Tone) -> Option<String> {
        candidates
            .iter()
            .find_map(|candidate| self.confirm(candidate, tone))
    }

    /// Best available spelling of an alias that is emitted regardless.
    pub(crate) fn settle(&self, alias: &str, tone: Tone) -> String {
        self.confirm(alias, tone)
            .unwrap_or_else(|| alias.to_string())
    }

    pub(crate) fn same_subbank(&self, a: Tone, b: Tone) -> bool {
        self.oracle.same_subbank(a, b)
    }
}

/// CVCV alias resolver, parameterized by a [`Ruleset`].
///
/// # Quick Start
///
/// ```rust
/// use std::collections::HashSet;
/// use cvcv_rs::{Phonemizer, Syllable};
/// use cvcv_rs::phonemizers::cvcv::CvcvPhonemizer;
///
/// let bank: HashSet<String> = ["-ka", "ka"].iter().map(|s| s.to_string()).collect();
/// let phonemizer = CvcvPhonemizer::de_cvcv();
/// let session = phonemizer.begin_session(&bank, 0);
///
/// let syllable = Syllable::new(None, &["k"], "a", 0);
/// let aliases = phonemizer.process_syllable(&syllable, &bank, &session);
/// assert_eq!(aliases[0].alias, "-ka");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CvcvPhonemizer {
    ruleset: Ruleset,
}

impl CvcvPhonemizer {
    pub fn new(ruleset: Ruleset) -> Self {
        Self { ruleset }
    }

    /// German CVCV convention.
    pub fn de_cvcv() -> Self {
        Self::new(Ruleset::de_cvcv())
    }

    /// Older German CVCV banks.
    pub fn de_cvcv_legacy() -> Self {
        Self::new(Ruleset::de_cvcv_legacy())
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Build a session from an already known probe result.
    pub fn session_with(&self, missing_consonants: bool) -> CvcvSession {
        CvcvSession {
            missing_consonants,
            normalizer: AliasNormalizer::new(&self.ruleset, missing_consonants),
        }
    }

    /// Dictionary replacement table of the ruleset.
    pub fn replacements(&self) -> ReplacementTable {
        ReplacementTable::new(self.ruleset.dictionary_replacements.clone())
    }

    /// Split diphthongs the library cannot voice as a whole.
    pub fn prepare_symbols<S: AsRef<str>>(
        &self,
        symbols: &[S],
        oracle: &dyn LibraryOracle,
        tone: Tone,
    ) -> Vec<String> {
        split_diphthongs(
            symbols,
            &self.ruleset.splittable_diphthongs,
            &self.ruleset.split_marker,
            oracle,
            tone,
        )
    }

    /// Segment symbols into syllables using the ruleset's vowels.
    pub fn segment<S: AsRef<str>>(&self, symbols: &[S], tone: Tone) -> Option<Word> {
        Word::segment(symbols, |symbol| self.ruleset.is_vowel(symbol), tone)
    }
}

impl Phonemizer for CvcvPhonemizer {
    type Session = CvcvSession;

    fn name(&self) -> &str {
        &self.ruleset.name
    }

    fn begin_session(&self, oracle: &dyn LibraryOracle, tone: Tone) -> CvcvSession {
        let missing = self
            .ruleset
            .missing_consonant_probes
            .iter()
            .any(|probe| !oracle.exists(probe, tone));
        if missing {
            log::info!(
                "{}: library lacks probe aliases {:?}, substituting missing consonants",
                self.ruleset.name,
                self.ruleset.missing_consonant_probes
            );
        }
        self.session_with(missing)
    }

    fn process_syllable(
        &self,
        syllable: &Syllable,
        oracle: &dyn LibraryOracle,
        session: &CvcvSession,
    ) -> Vec<ResolvedPhoneme> {
        process_syllable(&self.ruleset, &Lookup::new(oracle, session), syllable)
    }

    fn process_ending(
        &self,
        ending: &Ending,
        oracle: &dyn LibraryOracle,
        session: &CvcvSession,
    ) -> Vec<ResolvedPhoneme> {
        process_ending(&Lookup::new(oracle, session), ending)
    }

    fn validate_alias(&self, alias: &str, session: &CvcvSession) -> String {
        session.normalizer.normalize(alias)
    }

    fn transition_length_ms(&self, alias: &str, base_ms: f64) -> f64 {
        base_ms * transition_multiplier(&self.ruleset, alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bank(aliases: &[&str]) -> HashSet<String> {
        aliases.iter().map(|s| s.to_string()).collect()
    }

    fn aliases(phonemes: &[ResolvedPhoneme]) -> Vec<&str> {
        phonemes.iter().map(|p| p.alias.as_str()).collect()
    }

    #[test]
    fn probe_flags_missing_consonants_once() {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let full = bank(&["w", "wR"]);
        let partial = bank(&["w"]);

        assert!(!phonemizer.begin_session(&full, 0).missing_consonants());
        assert!(phonemizer.begin_session(&partial, 0).missing_consonants());
    }

    #[test]
    fn validate_alias_uses_session_normalizer() {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let lacking = phonemizer.session_with(true);
        let complete = phonemizer.session_with(false);
        assert_eq!(phonemizer.validate_alias("w a", &lacking), "ua");
        assert_eq!(phonemizer.validate_alias("w a", &complete), "wa");
    }

    #[test]
    fn confirm_prefers_spelling_as_written() {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let session = phonemizer.session_with(false);
        let oracle = bank(&["a k", "ak"]);
        let lookup = Lookup::new(&oracle, &session);
        assert_eq!(lookup.confirm("a k", 0).as_deref(), Some("a k"));
    }

    #[test]
    fn confirm_falls_back_to_normalized_spelling() {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let session = phonemizer.session_with(false);
        let oracle = bank(&["ak"]);
        let lookup = Lookup::new(&oracle, &session);
        assert_eq!(lookup.confirm("a k", 0).as_deref(), Some("ak"));
        assert_eq!(lookup.confirm("a t", 0), None);
        assert_eq!(lookup.settle("a t", 0), "a t");
    }

    #[test]
    fn processes_whole_word() {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let oracle = bank(&["w", "wR", "-ha", "a l", "lO", "O-"]);
        let session = phonemizer.begin_session(&oracle, 0);

        let word = phonemizer
            .segment(&["h", "a", "l", "O"], 0)
            .expect("word has vowels");
        let phonemes = phonemizer.process_word(&word, &oracle, &session);
        assert_eq!(aliases(&phonemes), vec!["-ha", "a l", "lO", "O-"]);
    }

    #[test]
    fn segments_split_diphthongs_as_vowels() {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let oracle = bank(&[]);
        let symbols = phonemizer.prepare_symbols(&["m", "aI"], &oracle, 0);
        let word = phonemizer.segment(&symbols, 0).expect("word has vowels");
        assert_eq!(word.syllables.len(), 2);
        assert_eq!(word.syllables[1].prev_v.as_deref(), Some("a"));
        assert_eq!(word.syllables[1].v, "I^");
    }

    #[test]
    fn transition_lengths_follow_aliases() {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let phonemes = vec![
            ResolvedPhoneme::new("apf", 0),
            ResolvedPhoneme::new("t-", 0),
        ];
        assert_eq!(phonemizer.transition_lengths(&phonemes, 100.0), vec![150.0, 50.0]);
    }

    #[test]
    fn dictionary_replacements_omit_identity() {
        let table = CvcvPhonemizer::de_cvcv().replacements();
        assert_eq!(table.get("sh"), Some("S"));
        assert_eq!(table.get("b"), None);
    }
}
