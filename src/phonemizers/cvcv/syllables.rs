//! Syllable resolution.
//!
//! Each syllable shape picks a base alias carrying the transition into the
//! nucleus, plus prefix aliases for the consonants before it. Every branch ends
//! in a default, so resolution never fails; a missing alias only lowers the
//! quality of the result.

use crate::{ResolvedPhoneme, Syllable, SyllableShape, Tone};

use super::engine::Lookup;
use super::ruleset::Ruleset;

pub(crate) fn process_syllable(
    ruleset: &Ruleset,
    lookup: &Lookup<'_>,
    syllable: &Syllable,
) -> Vec<ResolvedPhoneme> {
    let mut phonemes = Vec::new();
    let prev_v = syllable.prev_v.as_deref().unwrap_or_default();

    let base = match syllable.shape() {
        SyllableShape::StartingVowel => Some(starting_vowel(lookup, syllable)),
        SyllableShape::VowelVowel => vowel_vowel(ruleset, lookup, syllable, prev_v, &mut phonemes),
        SyllableShape::StartingConsonantVowel => {
            Some(starting_consonant(lookup, syllable, &mut phonemes))
        }
        SyllableShape::StartingClusterVowel => {
            Some(starting_cluster(lookup, syllable, &mut phonemes))
        }
        SyllableShape::VowelConsonantVowel => {
            vowel_to_consonant(lookup, prev_v, &syllable.cc[0], syllable.tone, &mut phonemes);
            Some(consonant_to_vowel(lookup, syllable))
        }
        SyllableShape::VowelClusterVowel => {
            vowel_to_consonant(lookup, prev_v, &syllable.cc[0], syllable.tone, &mut phonemes);
            let mut base = consonant_to_vowel(lookup, syllable);
            decompose_cluster(lookup, syllable, 0, &mut base, &mut phonemes);
            Some(base)
        }
    };

    if let Some(base) = base {
        phonemes.push(ResolvedPhoneme::new(base, syllable.vowel_tone));
    }
    phonemes
}

// [-a] or [a]
fn starting_vowel(lookup: &Lookup<'_>, syllable: &Syllable) -> String {
    let v = &syllable.v;
    lookup
        .confirm(&format!("-{v}"), syllable.vowel_tone)
        .unwrap_or_else(|| lookup.settle(v, syllable.vowel_tone))
}

/// Vowel following a vowel. Returns `None` when the previous alias is
/// stretched over the glide instead.
fn vowel_vowel(
    ruleset: &Ruleset,
    lookup: &Lookup<'_>,
    syllable: &Syllable,
    prev_v: &str,
    phonemes: &mut Vec<ResolvedPhoneme>,
) -> Option<String> {
    let v = syllable.v.as_str();
    let tone = syllable.tone;
    let vowel_tone = syllable.vowel_tone;

    if syllable.can_alias_extend && lookup.same_subbank(tone, vowel_tone) {
        log::debug!("[{prev_v}] extends over [{v}]");
        return None;
    }

    // [ou]
    if let Some(alias) = lookup.confirm(&format!("{prev_v}{v}"), vowel_tone) {
        return Some(alias);
    }

    // [ow] [wu]
    if prev_v != v {
        if let Some(glide) = ruleset.glide_exceptions.get(prev_v) {
            let candidates = [format!("{prev_v}{glide}"), format!("{prev_v} {glide}")];
            if let Some(transition) = lookup.first(&candidates, tone) {
                log::debug!("Inserting glide [{glide}] between [{prev_v}] and [{v}]");
                phonemes.push(ResolvedPhoneme::new(transition, tone));
                return Some(lookup.settle(&format!("{glide}{v}"), vowel_tone));
            }
        }
    }

    // [u]
    if let Some(alias) = lookup.confirm(v, vowel_tone) {
        return Some(alias);
    }

    // glottal stop: [o-] [-u]
    phonemes.push(ResolvedPhoneme::new(
        lookup.settle(&format!("{prev_v}-"), tone),
        tone,
    ));
    Some(lookup.settle(&format!("-{v}"), vowel_tone))
}

// [- ka] or [-k] [ka]
fn starting_consonant(
    lookup: &Lookup<'_>,
    syllable: &Syllable,
    phonemes: &mut Vec<ResolvedPhoneme>,
) -> String {
    let c = &syllable.cc[0];
    let v = &syllable.v;

    if let Some(alias) = lookup.confirm(&format!("- {c}{v}"), syllable.vowel_tone) {
        return alias;
    }
    if let Some(prefix) = lookup.first(&[format!("-{c}"), format!("- {c}")], syllable.tone) {
        phonemes.push(ResolvedPhoneme::new(prefix, syllable.tone));
    }
    lookup.settle(&format!("{c}{v}"), syllable.vowel_tone)
}

fn starting_cluster(
    lookup: &Lookup<'_>,
    syllable: &Syllable,
    phonemes: &mut Vec<ResolvedPhoneme>,
) -> String {
    let cc = &syllable.cc;
    let v = &syllable.v;
    let tone = syllable.tone;
    let vowel_tone = syllable.vowel_tone;
    let cluster = cc.concat();
    let last = cc.len() - 1;

    // [- stra]
    if let Some(alias) = lookup.confirm(&format!("- {cluster}{v}"), vowel_tone) {
        return alias;
    }

    // [- str] [- st], else [-s]
    let mut first_c = 0;
    let mut prefix = None;
    for i in (2..=cc.len()).rev() {
        if let Some(alias) = lookup.confirm(&format!("- {}", cc[..i].concat()), tone) {
            prefix = Some(alias);
            first_c = i - 1;
            break;
        }
    }
    let prefix = prefix.unwrap_or_else(|| {
        let c = &cc[0];
        lookup
            .first(&[format!("-{c}"), format!("- {c}")], tone)
            .unwrap_or_else(|| lookup.settle(&format!("-{c}"), tone))
    });
    phonemes.push(ResolvedPhoneme::new(prefix, tone));

    // [stra] covers the rest of the cluster
    if let Some(alias) = lookup.confirm(&format!("{cluster}{v}"), vowel_tone) {
        return alias;
    }

    let mut base = lookup.settle(&format!("{}{v}", cc[last]), vowel_tone);
    decompose_cluster(lookup, syllable, first_c, &mut base, phonemes);
    base
}

/// Transition from the previous vowel into the first consonant.
///
/// `[a k]`, else `[ak]`, else `[a-] [-k]` when only the vowel release exists.
fn vowel_to_consonant(
    lookup: &Lookup<'_>,
    prev_v: &str,
    c: &str,
    tone: Tone,
    phonemes: &mut Vec<ResolvedPhoneme>,
) {
    if let Some(alias) = lookup.first(&[format!("{prev_v} {c}"), format!("{prev_v}{c}")], tone) {
        phonemes.push(ResolvedPhoneme::new(alias, tone));
        return;
    }
    if let Some(release) = lookup.confirm(&format!("{prev_v}-"), tone) {
        phonemes.push(ResolvedPhoneme::new(release, tone));
        phonemes.push(ResolvedPhoneme::new(
            lookup.settle(&format!("-{c}"), tone),
            tone,
        ));
        return;
    }
    phonemes.push(ResolvedPhoneme::new(
        lookup.settle(&format!("{prev_v} {c}"), tone),
        tone,
    ));
}

/// `[k a]`, else `[ka]`, using the last consonant before the nucleus.
fn consonant_to_vowel(lookup: &Lookup<'_>, syllable: &Syllable) -> String {
    let c = syllable.cc.last().map(String::as_str).unwrap_or_default();
    let v = &syllable.v;
    lookup
        .first(&[format!("{c} {v}"), format!("{c}{v}")], syllable.vowel_tone)
        .unwrap_or_else(|| lookup.settle(&format!("{c}{v}"), syllable.vowel_tone))
}

/// Cover `cc[start..]` with consonant aliases, left to right.
///
/// Each position tries the longest joined run to the end of the cluster, then
/// the spaced and joined pair. A confirmed run covers everything up to the
/// nucleus and ends the walk; a confirmed pair chains into the next pair; a
/// consonant with no pair is emitted alone. The base alias moves to `[Cn V]`
/// whenever the library has it, or to `[Ci CnV]` when the final pair can hand
/// the vowel over directly.
fn decompose_cluster(
    lookup: &Lookup<'_>,
    syllable: &Syllable,
    start: usize,
    base: &mut String,
    phonemes: &mut Vec<ResolvedPhoneme>,
) {
    let cc = &syllable.cc;
    let v = &syllable.v;
    let tone = syllable.tone;
    let vowel_tone = syllable.vowel_tone;
    let last = cc.len() - 1;

    if start >= last {
        return;
    }
    if let Some(alias) = lookup.confirm(&format!("{}{v}", cc[last]), vowel_tone) {
        *base = alias;
    }

    let mut i = start;
    while i < last {
        if i + 1 == last {
            if let Some(alias) = lookup.confirm(&format!("{} {}{v}", cc[i], cc[last]), vowel_tone)
            {
                *base = alias;
                break;
            }
        }

        // like [VC1] [C1C2C3] [C3V]
        if let Some(alias) = lookup.confirm(&cc[i..].concat(), tone) {
            phonemes.push(ResolvedPhoneme::new(alias, tone));
            break;
        }

        // like [VC1] [C1 C2] [C2 ..]
        let pair = [
            format!("{} {}", cc[i], cc[i + 1]),
            format!("{}{}", cc[i], cc[i + 1]),
        ];
        match lookup.first(&pair, tone) {
            Some(alias) => phonemes.push(ResolvedPhoneme::new(alias, tone)),
            // like [VC1] [C1] [C2 ..]
            None => phonemes.push(ResolvedPhoneme::new(lookup.settle(&cc[i], tone), tone)),
        }
        i += 1;
    }
}
