//! # cvcv-rs
//!
//! A Rust library that turns phonetic transcriptions into the sample aliases a
//! concatenative singing voicebank actually contains.
//!
//! ## Features
//!
//! - **CVCV alias resolution**: per-syllable and per-ending decision logic with
//!   graceful fallbacks when the ideal alias is missing
//! - **Alias normalization**: rule-table rewrite of candidate aliases into the
//!   spelling conventions of the target library
//! - **Transition lengths**: cross-fade multipliers by consonant class
//! - **Configurable rulesets**: inventories and tables loaded from JSON
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! cvcv-rs = { version = "2026.2", features = ["cvcv"] }
//! ```
//!
//! ```ignore
//! use cvcv_rs::{phonemizers::cvcv::{CvcvPhonemizer, OtoIndex}, Phonemizer};
//!
//! let oto = OtoIndex::load("voicebank/oto.ini".as_ref())?;
//! let phonemizer = CvcvPhonemizer::de_cvcv();
//! let session = phonemizer.begin_session(&oto, 60);
//!
//! let symbols = ["h", "a", "l", "O"].map(String::from);
//! if let Some(word) = phonemizer.segment(&symbols, 60) {
//!     for phoneme in phonemizer.process_word(&word, &oto, &session) {
//!         println!("{}", phoneme.alias);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod phonemizers;
pub mod syllable;

use std::collections::{BTreeSet, HashSet};

pub use syllable::{
    Ending, EndingBuilder, EndingShape, Syllable, SyllableBuilder, SyllableShape, Word,
};

/// Pitch bucket a voicebank may register distinct sample variants under.
///
/// The resolver never interprets it; it is only forwarded to the oracle.
pub type Tone = i32;

/// A single alias chosen for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPhoneme {
    /// Alias as registered in the voicebank
    pub alias: String,
    /// Pitch bucket the alias was resolved against
    pub tone: Tone,
}

impl ResolvedPhoneme {
    pub fn new(alias: impl Into<String>, tone: Tone) -> Self {
        Self {
            alias: alias.into(),
            tone,
        }
    }
}

/// Existence queries against a voicebank.
///
/// Implementations must be free of observable side effects: the resolver may
/// ask the same question many times per syllable.
pub trait LibraryOracle {
    /// Whether `alias` is registered for the pitch bucket `tone`.
    fn exists(&self, alias: &str, tone: Tone) -> bool;

    /// Whether two pitch buckets resolve to the same sample sub-bank.
    ///
    /// Libraries without pitch sub-banks can keep the default.
    fn same_subbank(&self, _a: Tone, _b: Tone) -> bool {
        true
    }
}

impl LibraryOracle for HashSet<String> {
    fn exists(&self, alias: &str, _tone: Tone) -> bool {
        self.contains(alias)
    }
}

impl LibraryOracle for BTreeSet<String> {
    fn exists(&self, alias: &str, _tone: Tone) -> bool {
        self.contains(alias)
    }
}

/// Common interface for alias conventions.
///
/// Each voicebank convention provides one implementation. Per-library facts
/// that would otherwise be re-probed on every alias are computed once by
/// [`Phonemizer::begin_session`] and passed back in on every call.
pub trait Phonemizer {
    /// Values derived from the library when a session starts.
    type Session;

    /// Human-readable name of the convention.
    fn name(&self) -> &str;

    /// Probe the library once and capture what the resolver needs to know.
    fn begin_session(&self, oracle: &dyn LibraryOracle, tone: Tone) -> Self::Session;

    /// Resolve the aliases covering a single syllable.
    fn process_syllable(
        &self,
        syllable: &Syllable,
        oracle: &dyn LibraryOracle,
        session: &Self::Session,
    ) -> Vec<ResolvedPhoneme>;

    /// Resolve the aliases covering the end of a word.
    fn process_ending(
        &self,
        ending: &Ending,
        oracle: &dyn LibraryOracle,
        session: &Self::Session,
    ) -> Vec<ResolvedPhoneme>;

    /// Rewrite an alias into the spelling the library is expected to use.
    fn validate_alias(&self, alias: &str, session: &Self::Session) -> String;

    /// Cross-fade length for `alias` given the renderer's base length.
    fn transition_length_ms(&self, alias: &str, base_ms: f64) -> f64;

    /// Resolve every syllable of a word followed by its ending.
    ///
    /// Default implementation concatenates `process_syllable()` and
    /// `process_ending()` in playback order.
    fn process_word(
        &self,
        word: &Word,
        oracle: &dyn LibraryOracle,
        session: &Self::Session,
    ) -> Vec<ResolvedPhoneme> {
        let mut phonemes = Vec::new();
        for syllable in &word.syllables {
            phonemes.extend(self.process_syllable(syllable, oracle, session));
        }
        phonemes.extend(self.process_ending(&word.ending, oracle, session));
        phonemes
    }

    /// Transition length of each resolved alias, in the same order.
    fn transition_lengths(&self, phonemes: &[ResolvedPhoneme], base_ms: f64) -> Vec<f64> {
        phonemes
            .iter()
            .map(|phoneme| self.transition_length_ms(&phoneme.alias, base_ms))
            .collect()
    }
}
