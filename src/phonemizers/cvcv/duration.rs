use super::ruleset::{ConsonantClass, Ruleset, SymbolKind};

/// Consonant classes in the order they are matched; the first class with an
/// interior consonant in the alias decides the multiplier.
const CLASS_PRIORITY: [ConsonantClass; 5] = [
    ConsonantClass::Stop,
    ConsonantClass::Tap,
    ConsonantClass::LongFricative,
    ConsonantClass::Affricate,
    ConsonantClass::SemiLongSonorant,
];

/// Cross-fade multiplier for an alias.
///
/// An interior consonant is one that does not start the alias and is not
/// directly followed by the end marker. Without one, a vowel-initial alias
/// carrying a boundary marker keeps the vowel-ending factor and a consonant
/// released into the end marker gets the consonant-ending factor.
pub fn transition_multiplier(ruleset: &Ruleset, alias: &str) -> f64 {
    let multipliers = &ruleset.multipliers;
    let tokens = ruleset.tokenize(alias);

    let interior: Vec<ConsonantClass> = tokens
        .iter()
        .filter(|token| token.offset > 0 && !token.before_boundary)
        .filter_map(|token| match token.kind {
            SymbolKind::Consonant(class) => Some(class),
            SymbolKind::Vowel => None,
        })
        .collect();

    if let Some(class) = CLASS_PRIORITY.iter().find(|class| interior.contains(class)) {
        return multipliers.for_class(*class);
    }

    let starts_with_vowel = tokens
        .first()
        .is_some_and(|token| token.offset == 0 && token.kind == SymbolKind::Vowel);
    if starts_with_vowel && alias.contains('-') {
        return multipliers.vowel_ending;
    }

    let consonant_released = tokens
        .iter()
        .any(|token| matches!(token.kind, SymbolKind::Consonant(_)) && token.before_boundary);
    if consonant_released {
        return multipliers.consonant_ending;
    }

    multipliers.default
}
