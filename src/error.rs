use thiserror::Error;

/// Errors raised while reading rule files.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("{origin}:{line}: malformed rule `{content}`, expected `name=pattern`")]
    MissingSeparator {
        origin: String,
        line: usize,
        content: String,
    },
}

pub type Result<T> = std::result::Result<T, RuleError>;
