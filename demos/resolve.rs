use std::path::PathBuf;

use cvcv_rs::{
    phonemizers::cvcv::{CvcvPhonemizer, OtoIndex},
    EndingBuilder, Phonemizer, SyllableBuilder,
};

const BASE_TRANSITION_MS: f64 = 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Usage: resolve [oto.ini] [symbols...]
    let mut args = std::env::args().skip(1);
    let oto = match args.next() {
        Some(path) => OtoIndex::load(&PathBuf::from(path))?,
        None => OtoIndex::from_aliases([
            "w", "wR", "- Sta", "-S", "a n", "n d", "d ro", "ro", "an", "ast", "t-", "O-",
        ]),
    };
    let mut symbols: Vec<String> = args.collect();
    if symbols.is_empty() {
        symbols = ["S", "t", "a", "n", "d", "r", "O"].map(String::from).to_vec();
    }

    let phonemizer = CvcvPhonemizer::de_cvcv();
    let session = phonemizer.begin_session(&oto, 0);
    println!(
        "{}: {} aliases indexed, missing consonants: {}",
        phonemizer.name(),
        oto.len(),
        session.missing_consonants()
    );

    let symbols = phonemizer.replacements().apply(&symbols);
    let symbols = phonemizer.prepare_symbols(&symbols, &oto, 0);
    let Some(word) = phonemizer.segment(&symbols, 0) else {
        println!("No vowel in {symbols:?}");
        return Ok(());
    };

    let phonemes = phonemizer.process_word(&word, &oto, &session);
    let lengths = phonemizer.transition_lengths(&phonemes, BASE_TRANSITION_MS);
    for (phoneme, ms) in phonemes.iter().zip(lengths) {
        println!("  [{}] {:.0}ms", phoneme.alias, ms);
    }

    // Descriptors can also be built by hand.
    let syllable = SyllableBuilder::default()
        .prev_v("a")
        .cc(vec!["s".to_string(), "t".to_string()])
        .v("a")
        .build()?;
    let ending = EndingBuilder::default()
        .prev_v("a")
        .cc(vec!["s".to_string(), "t".to_string()])
        .build()?;

    let mut phonemes = phonemizer.process_syllable(&syllable, &oto, &session);
    phonemes.extend(phonemizer.process_ending(&ending, &oto, &session));
    let aliases: Vec<&str> = phonemes.iter().map(|p| p.alias.as_str()).collect();
    println!("Hand-built: {aliases:?}");

    Ok(())
}
