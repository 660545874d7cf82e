//! CVCV alias convention.
//!
//! CVCV voicebanks record consonant-vowel units (`[ka]`), vowel-to-consonant
//! transitions (`[a k]`), and boundary aliases that start or end an utterance
//! (`[- ka]`, `[a-]`). This module picks, for each syllable and word ending, the
//! sequence of aliases that best covers it in a given library, falling back
//! gracefully when the ideal alias was never recorded.
//!
//! # Rulesets
//!
//! | Preset | Constructor | Notes |
//! |---|---|---|
//! | DE CVCV | [`Ruleset::de_cvcv`] | Current German convention, `dZ` affricate, `j` glide |
//! | DE CVCV (legacy) | [`Ruleset::de_cvcv_legacy`] | Older banks, `dz` affricate, `y` glide, shorter taps |
//!
//! Any other convention can be described in JSON and loaded with
//! [`load_ruleset`]. Only `name`, `vowels` and `consonants` are required.
//!
//! # Alias Spelling
//!
//! | Alias | Meaning |
//! |---|---|
//! | `- ka` / `-ka` | `k a` at the start of an utterance |
//! | `ka` | consonant into vowel |
//! | `a k` / `ak` | vowel into consonant |
//! | `s t` / `st` | consonant into consonant |
//! | `a-` / `t-` | release into silence |
//!
//! Libraries differ in whether they separate symbols with spaces. The resolver
//! tries the spelling as written first and then its [normalized](AliasNormalizer)
//! form.
//!
//! # Examples
//!
//! ## Resolving a Word
//!
//! ```rust
//! use cvcv_rs::Phonemizer;
//! use cvcv_rs::phonemizers::cvcv::{CvcvPhonemizer, OtoIndex};
//!
//! let oto = OtoIndex::from_aliases(["w", "wR", "- ha", "a l", "lO", "O-"]);
//! let phonemizer = CvcvPhonemizer::de_cvcv();
//! let session = phonemizer.begin_session(&oto, 0);
//!
//! let word = phonemizer.segment(&["h", "a", "l", "O"], 0).unwrap();
//! let aliases: Vec<String> = phonemizer
//!     .process_word(&word, &oto, &session)
//!     .into_iter()
//!     .map(|p| p.alias)
//!     .collect();
//! assert_eq!(aliases, ["- ha", "a l", "lO", "O-"]);
//! ```
//!
//! ## Transition Lengths
//!
//! ```rust
//! use cvcv_rs::Phonemizer;
//! use cvcv_rs::phonemizers::cvcv::CvcvPhonemizer;
//!
//! let phonemizer = CvcvPhonemizer::de_cvcv();
//! assert_eq!(phonemizer.transition_length_ms("apf", 100.0), 150.0);
//! ```

pub mod duration;
mod endings;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod oto;
pub mod ruleset;
pub mod symbols;
mod syllables;

pub use duration::transition_multiplier;
pub use engine::{CvcvPhonemizer, CvcvSession};
pub use error::CvcvError;
pub use normalizer::{AliasNormalizer, NormalizeRule};
pub use oto::{detect_pitch_suffix, rephonemize, OtoIndex, Subbank};
pub use ruleset::{load_ruleset, ConsonantClass, GlideProxyMode, Ruleset, TransitionMultipliers};
pub use symbols::{ipa_to_cvcv, ReplacementTable};
