//! Property-based tests for the CVCV resolver.
//!
//! Uses proptest to check the invariants every convention must keep:
//! idempotent normalization, total resolution, full cluster coverage and a
//! released word ending.

use std::collections::HashSet;

use cvcv_rs::phonemizers::cvcv::{AliasNormalizer, CvcvPhonemizer, Ruleset};
use cvcv_rs::{Ending, Phonemizer, Syllable};
use proptest::prelude::*;

const VOWELS: &[&str] = &["a", "e", "i", "o", "E", "I", "O", "U", "aI", "aU"];

/// Consonants no normalization rule rewrites.
const STABLE_CONSONANTS: &[&str] = &["b", "d", "f", "k", "l", "m", "n", "p", "s", "t", "S", "N"];

/// Fragments that exercise every normalization rule.
const FRAGMENTS: &[&str] = &[
    "a", "e", "I", "U", "aI", "aU", "OI", "6", "R", "r;", "r", "w", "y", "k", "t", "S", "^", "-",
    " ",
];

fn vowel() -> impl Strategy<Value = String> {
    prop::sample::select(VOWELS).prop_map(str::to_string)
}

fn consonants(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(STABLE_CONSONANTS).prop_map(str::to_string),
        range,
    )
}

fn alias_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..12).prop_map(|parts| parts.concat())
}

/// Every alias the resolver could ask about for these symbols.
fn candidate_aliases(prev_v: &str, cc: &[String], v: &str) -> Vec<String> {
    let mut out = Vec::new();
    for (i, c) in cc.iter().enumerate() {
        out.push(c.clone());
        out.extend([
            format!("-{c}"),
            format!("- {c}"),
            format!("{c}-"),
            format!("{c} -"),
            format!("{prev_v}{c}"),
            format!("{prev_v} {c}"),
            format!("{c}{v}"),
            format!("{c} {v}"),
        ]);
        for j in i + 1..cc.len() {
            let run = cc[i..=j].concat();
            out.extend([
                run.clone(),
                format!("{} {}", cc[i], cc[i + 1]),
                format!("- {run}"),
                format!("- {run}{v}"),
                format!("{run}{v}"),
                format!("{prev_v}{}", cc[..=j].concat()),
                format!("{run}-"),
                format!("{} {}{v}", cc[i], cc[j]),
            ]);
        }
    }
    out.extend([
        format!("{prev_v}-"),
        format!("-{v}"),
        format!("{prev_v}{v}"),
        v.to_string(),
        format!("{v}-"),
    ]);
    out
}

fn pick(candidates: Vec<String>, mask: &[bool]) -> HashSet<String> {
    candidates
        .into_iter()
        .zip(mask.iter().cycle())
        .filter(|(_, keep)| **keep)
        .map(|(alias, _)| alias)
        .collect()
}

fn compact(alias: &str) -> String {
    alias.replace(' ', "")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Normalizing twice gives the same result as normalizing once, with and
    /// without the missing-consonant substitution.
    #[test]
    fn normalization_is_idempotent(alias in alias_text(), missing in any::<bool>(), legacy in any::<bool>()) {
        let ruleset = if legacy { Ruleset::de_cvcv_legacy() } else { Ruleset::de_cvcv() };
        let normalizer = AliasNormalizer::new(&ruleset, missing);
        let once = normalizer.normalize(&alias);
        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    /// Every syllable resolves against an empty library, and every syllable
    /// that is not an alias extension yields its base alias last.
    #[test]
    fn syllables_resolve_against_empty_library(
        prev_v in prop::option::of(vowel()),
        cc in consonants(0..=4),
        v in vowel(),
    ) {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let oracle: HashSet<String> = HashSet::new();
        let session = phonemizer.begin_session(&oracle, 0);

        let syllable = Syllable {
            prev_v,
            cc,
            v,
            tone: 0,
            vowel_tone: 0,
            can_alias_extend: false,
        };
        let phonemes = phonemizer.process_syllable(&syllable, &oracle, &session);
        prop_assert!(!phonemes.is_empty());
        let base = compact(&phonemes[phonemes.len() - 1].alias);
        prop_assert!(base.ends_with(syllable.v.as_str()));
    }

    /// Resolution against any library subset never fails and never emits an
    /// empty alias.
    #[test]
    fn syllables_resolve_against_any_library(
        prev_v in prop::option::of(vowel()),
        cc in consonants(0..=4),
        v in vowel(),
        mask in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let candidates = candidate_aliases(prev_v.as_deref().unwrap_or("a"), &cc, &v);
        let oracle = pick(candidates, &mask);
        let session = phonemizer.begin_session(&oracle, 0);

        let syllable = Syllable {
            prev_v,
            cc,
            v,
            tone: 0,
            vowel_tone: 0,
            can_alias_extend: false,
        };
        let phonemes = phonemizer.process_syllable(&syllable, &oracle, &session);
        prop_assert!(phonemes.iter().all(|p| !p.alias.is_empty()));
    }

    /// Every consonant of a cluster appears in at least one emitted alias.
    #[test]
    fn clusters_are_fully_covered(
        prev_v in prop::option::of(vowel()),
        cc in consonants(2..=4),
        v in vowel(),
        mask in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let candidates = candidate_aliases(prev_v.as_deref().unwrap_or("a"), &cc, &v);
        let oracle = pick(candidates, &mask);
        let session = phonemizer.begin_session(&oracle, 0);

        let syllable = Syllable {
            prev_v,
            cc: cc.clone(),
            v,
            tone: 0,
            vowel_tone: 0,
            can_alias_extend: false,
        };
        let aliases: Vec<String> = phonemizer
            .process_syllable(&syllable, &oracle, &session)
            .iter()
            .map(|p| compact(&p.alias))
            .collect();
        for c in &cc {
            prop_assert!(
                aliases.iter().any(|alias| alias.contains(c.as_str())),
                "consonant {:?} missing from {:?}", c, aliases
            );
        }
    }

    /// Cluster endings always release into silence.
    #[test]
    fn cluster_endings_carry_boundary_marker(
        prev_v in vowel(),
        cc in consonants(2..=4),
        mask in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let candidates = candidate_aliases(&prev_v, &cc, "a");
        let oracle = pick(candidates, &mask);
        let session = phonemizer.begin_session(&oracle, 0);

        let ending = Ending { prev_v, cc, tone: 0 };
        let phonemes = phonemizer.process_ending(&ending, &oracle, &session);
        prop_assert!(phonemes.iter().any(|p| p.alias.trim_end().ends_with('-')));
    }

    /// A single trailing consonant either yields nothing or a released pair.
    #[test]
    fn single_consonant_endings_are_all_or_nothing(
        prev_v in vowel(),
        c in consonants(1..=1),
        mask in prop::collection::vec(any::<bool>(), 1..16),
    ) {
        let phonemizer = CvcvPhonemizer::de_cvcv();
        let candidates = candidate_aliases(&prev_v, &c, "a");
        let oracle = pick(candidates, &mask);
        let session = phonemizer.begin_session(&oracle, 0);

        let ending = Ending { prev_v, cc: c, tone: 0 };
        let phonemes = phonemizer.process_ending(&ending, &oracle, &session);
        prop_assert!(phonemes.is_empty() || phonemes.len() == 2);
        if let Some(last) = phonemes.last() {
            prop_assert!(last.alias.ends_with('-'));
        }
    }
}
