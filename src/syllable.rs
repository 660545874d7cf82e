//! Syllable and ending descriptors handed to a [`Phonemizer`](crate::Phonemizer).
//!
//! A word is described as a run of [`Syllable`]s followed by exactly one
//! [`Ending`]. Each descriptor reports its shape from its field values, and the
//! resolver dispatches on that shape.

use derive_builder::Builder;

use crate::Tone;

/// The mutually exclusive forms a syllable can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyllableShape {
    /// Word-initial vowel with no onset, e.g. `[a]`.
    StartingVowel,
    /// Vowel directly following another vowel (glide or hiatus).
    VowelVowel,
    /// Word-initial single consonant onset.
    StartingConsonantVowel,
    /// Word-initial cluster of two or more consonants.
    StartingClusterVowel,
    /// One consonant between two vowels.
    VowelConsonantVowel,
    /// Two or more consonants between two vowels.
    VowelClusterVowel,
}

/// A syllable as produced by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct Syllable {
    /// Nucleus of the previous syllable, `None` at the start of a word.
    #[builder(setter(into, strip_option), default)]
    pub prev_v: Option<String>,
    /// Consonants between the previous vowel (or word start) and the nucleus.
    #[builder(default)]
    pub cc: Vec<String>,
    /// Vowel nucleus.
    pub v: String,
    /// Pitch bucket used for consonant-led aliases.
    #[builder(default)]
    pub tone: Tone,
    /// Pitch bucket used for aliases that carry the nucleus.
    #[builder(default)]
    pub vowel_tone: Tone,
    /// Whether the previous alias may be stretched over a vowel-vowel glide.
    #[builder(default)]
    pub can_alias_extend: bool,
}

impl Syllable {
    /// Convenience constructor using one pitch bucket for consonants and vowel.
    pub fn new(prev_v: Option<&str>, cc: &[&str], v: &str, tone: Tone) -> Self {
        Self {
            prev_v: prev_v.map(str::to_string),
            cc: cc.iter().map(|c| c.to_string()).collect(),
            v: v.to_string(),
            tone,
            vowel_tone: tone,
            can_alias_extend: false,
        }
    }

    pub fn shape(&self) -> SyllableShape {
        match (self.prev_v.is_some(), self.cc.len()) {
            (false, 0) => SyllableShape::StartingVowel,
            (true, 0) => SyllableShape::VowelVowel,
            (false, 1) => SyllableShape::StartingConsonantVowel,
            (false, _) => SyllableShape::StartingClusterVowel,
            (true, 1) => SyllableShape::VowelConsonantVowel,
            (true, _) => SyllableShape::VowelClusterVowel,
        }
    }
}

/// The mutually exclusive forms a word ending can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingShape {
    EndingOnVowel,
    EndingOnOneConsonant,
    EndingOnCluster,
}

/// The tail of a word: the last vowel and any consonants after it.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct Ending {
    /// Last vowel of the word.
    pub prev_v: String,
    /// Trailing consonants in order.
    #[builder(default)]
    pub cc: Vec<String>,
    #[builder(default)]
    pub tone: Tone,
}

impl Ending {
    pub fn new(prev_v: &str, cc: &[&str], tone: Tone) -> Self {
        Self {
            prev_v: prev_v.to_string(),
            cc: cc.iter().map(|c| c.to_string()).collect(),
            tone,
        }
    }

    pub fn shape(&self) -> EndingShape {
        match self.cc.len() {
            0 => EndingShape::EndingOnVowel,
            1 => EndingShape::EndingOnOneConsonant,
            _ => EndingShape::EndingOnCluster,
        }
    }
}

/// A segmented word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub syllables: Vec<Syllable>,
    pub ending: Ending,
}

impl Word {
    /// Group a symbol stream into syllables and an ending.
    ///
    /// Every consonant between two vowels belongs to the cluster of the
    /// following syllable; consonants after the last vowel form the ending.
    /// Returns `None` when the stream contains no vowel at all.
    pub fn segment<S, F>(symbols: &[S], is_vowel: F, tone: Tone) -> Option<Self>
    where
        S: AsRef<str>,
        F: Fn(&str) -> bool,
    {
        let mut syllables = Vec::new();
        let mut prev_v: Option<String> = None;
        let mut cc = Vec::new();

        for symbol in symbols {
            let symbol = symbol.as_ref();
            if symbol.is_empty() {
                continue;
            }
            if is_vowel(symbol) {
                syllables.push(Syllable {
                    prev_v: prev_v.clone(),
                    cc: std::mem::take(&mut cc),
                    v: symbol.to_string(),
                    tone,
                    vowel_tone: tone,
                    can_alias_extend: false,
                });
                prev_v = Some(symbol.to_string());
            } else {
                cc.push(symbol.to_string());
            }
        }

        let Some(prev_v) = prev_v else {
            log::debug!("No vowel in symbol stream, nothing to segment");
            return None;
        };

        Some(Self {
            syllables,
            ending: Ending { prev_v, cc, tone },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_vowel(symbol: &str) -> bool {
        matches!(symbol, "a" | "e" | "i" | "o" | "u")
    }

    #[test]
    fn classifies_syllable_shapes() {
        assert_eq!(
            Syllable::new(None, &[], "a", 0).shape(),
            SyllableShape::StartingVowel
        );
        assert_eq!(
            Syllable::new(Some("a"), &[], "o", 0).shape(),
            SyllableShape::VowelVowel
        );
        assert_eq!(
            Syllable::new(None, &["k"], "a", 0).shape(),
            SyllableShape::StartingConsonantVowel
        );
        assert_eq!(
            Syllable::new(None, &["s", "t"], "a", 0).shape(),
            SyllableShape::StartingClusterVowel
        );
        assert_eq!(
            Syllable::new(Some("a"), &["t"], "a", 0).shape(),
            SyllableShape::VowelConsonantVowel
        );
        assert_eq!(
            Syllable::new(Some("a"), &["s", "t"], "a", 0).shape(),
            SyllableShape::VowelClusterVowel
        );
    }

    #[test]
    fn classifies_ending_shapes() {
        assert_eq!(Ending::new("a", &[], 0).shape(), EndingShape::EndingOnVowel);
        assert_eq!(
            Ending::new("a", &["t"], 0).shape(),
            EndingShape::EndingOnOneConsonant
        );
        assert_eq!(
            Ending::new("a", &["s", "t"], 0).shape(),
            EndingShape::EndingOnCluster
        );
    }

    #[test]
    fn builder_fills_defaults() {
        let syllable = SyllableBuilder::default()
            .prev_v("a")
            .cc(vec!["n".to_string()])
            .v("o")
            .tone(60)
            .build()
            .expect("nucleus is set");
        assert_eq!(syllable.prev_v.as_deref(), Some("a"));
        assert_eq!(syllable.vowel_tone, 0);
        assert!(!syllable.can_alias_extend);
        assert_eq!(syllable.shape(), SyllableShape::VowelConsonantVowel);
    }

    #[test]
    fn builder_requires_nucleus() {
        assert!(SyllableBuilder::default().tone(60).build().is_err());
    }

    #[test]
    fn segments_word_into_syllables_and_ending() {
        let word = Word::segment(&["s", "t", "a", "n", "d", "o", "r", "t"], is_vowel, 5)
            .expect("word has vowels");

        assert_eq!(
            word.syllables,
            vec![
                Syllable::new(None, &["s", "t"], "a", 5),
                Syllable::new(Some("a"), &["n", "d"], "o", 5),
            ]
        );
        assert_eq!(word.ending, Ending::new("o", &["r", "t"], 5));
    }

    #[test]
    fn segments_adjacent_vowels_as_vowel_vowel() {
        let word = Word::segment(&["a", "u"], is_vowel, 0).expect("word has vowels");
        assert_eq!(word.syllables[1].shape(), SyllableShape::VowelVowel);
        assert_eq!(word.ending.shape(), EndingShape::EndingOnVowel);
    }

    #[test]
    fn refuses_to_segment_without_vowel() {
        assert!(Word::segment(&["h", "m"], is_vowel, 0).is_none());
    }
}
