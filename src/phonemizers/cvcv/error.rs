#[derive(thiserror::Error, Debug)]
pub enum CvcvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid ruleset: {0}")]
    Ruleset(String),
    #[error("Invalid replacement table: {0}")]
    Replacements(String),
    #[error("Malformed oto.ini entry on line {line}: {reason}")]
    OtoParse { line: usize, reason: String },
}
