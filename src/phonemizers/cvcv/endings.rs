//! Word ending resolution.
//!
//! The last alias of a word must release into silence, so every consonant
//! ending leaves at least one alias carrying a trailing `-`.

use crate::{Ending, EndingShape, ResolvedPhoneme};

use super::engine::Lookup;

pub(crate) fn process_ending(lookup: &Lookup<'_>, ending: &Ending) -> Vec<ResolvedPhoneme> {
    let v = ending.prev_v.as_str();
    let tone = ending.tone;
    let mut phonemes = Vec::new();

    match ending.shape() {
        // [a-]
        EndingShape::EndingOnVowel => {
            if let Some(alias) = lookup.confirm(&format!("{v}-"), tone) {
                phonemes.push(ResolvedPhoneme::new(alias, tone));
            }
        }
        // [at] [t-]
        EndingShape::EndingOnOneConsonant => {
            let c = &ending.cc[0];
            if let Some(alias) = lookup.first(&[format!("{v}{c}"), format!("{v} {c}")], tone) {
                phonemes.push(ResolvedPhoneme::new(alias, tone));
                phonemes.push(ResolvedPhoneme::new(
                    lookup.settle(&format!("{c}-"), tone),
                    tone,
                ));
            } else {
                log::debug!("No [{v}{c}] in library, leaving ending open");
            }
        }
        EndingShape::EndingOnCluster => {
            resolve_cluster(lookup, ending, &mut phonemes);
        }
    }

    phonemes
}

fn resolve_cluster(lookup: &Lookup<'_>, ending: &Ending, phonemes: &mut Vec<ResolvedPhoneme>) {
    let v = ending.prev_v.as_str();
    let cc = &ending.cc;
    let tone = ending.tone;
    let last = cc.len() - 1;

    // Longest vowel-led run first: [ast], [a st], then [as], [a s].
    let mut first_c = 0;
    let mut head = None;
    for i in (0..=last).rev() {
        let run = cc[..=i].concat();
        if let Some(alias) = lookup.first(&[format!("{v}{run}"), format!("{v} {run}")], tone) {
            head = Some(alias);
            first_c = i;
            break;
        }
    }
    let head = head.unwrap_or_else(|| lookup.settle(&format!("{v} {}", cc[0]), tone));
    phonemes.push(ResolvedPhoneme::new(head, tone));

    let mut i = first_c;
    while i < last {
        // [n st-]
        if i + 2 == last {
            let run = format!("{} {}{}-", cc[i], cc[i + 1], cc[i + 2]);
            if let Some(alias) = lookup.confirm(&run, tone) {
                phonemes.push(ResolvedPhoneme::new(alias, tone));
                break;
            }
        }

        let pair = [
            format!("{}{}", cc[i], cc[i + 1]),
            format!("{} {}", cc[i], cc[i + 1]),
        ];

        if i + 1 == last {
            let c = &cc[i];
            let cn = &cc[last];
            // [s t-]
            if let Some(alias) = lookup.confirm(&format!("{c} {cn}-"), tone) {
                phonemes.push(ResolvedPhoneme::new(alias, tone));
            // [st] [t -]
            } else if let Some(alias) = lookup.first(&pair, tone) {
                phonemes.push(ResolvedPhoneme::new(alias, tone));
                let release = lookup
                    .first(&[format!("{cn} -"), format!("{cn}-")], tone)
                    .unwrap_or_else(|| lookup.settle(&format!("{cn}-"), tone));
                phonemes.push(ResolvedPhoneme::new(release, tone));
            // [s-] [-t]
            } else {
                let release = lookup
                    .first(&[format!("{c} -"), format!("{c}-")], tone)
                    .unwrap_or_else(|| lookup.settle(&format!("{c}-"), tone));
                let onset = lookup
                    .first(&[format!("- {cn}"), format!("-{cn}")], tone)
                    .unwrap_or_else(|| lookup.settle(&format!("-{cn}"), tone));
                phonemes.push(ResolvedPhoneme::new(release, tone));
                phonemes.push(ResolvedPhoneme::new(onset, tone));
            }
            break;
        }

        match lookup.first(&pair, tone) {
            Some(alias) => phonemes.push(ResolvedPhoneme::new(alias, tone)),
            None => phonemes.push(ResolvedPhoneme::new(lookup.settle(&cc[i], tone), tone)),
        }
        i += 1;
    }

    let released = phonemes
        .iter()
        .any(|phoneme| phoneme.alias.trim_end().ends_with('-'));
    if !released {
        let cn = &cc[last];
        let release = lookup
            .first(&[format!("{cn}-"), format!("{cn} -")], tone)
            .unwrap_or_else(|| lookup.settle(&format!("{cn}-"), tone));
        phonemes.push(ResolvedPhoneme::new(release, tone));
    }
}
