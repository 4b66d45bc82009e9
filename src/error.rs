use thiserror::Error;

/// Error type for the reckoner crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed input: unexpected or trailing characters, an unbalanced
    /// parenthesis, a missing argument or a nesting depth past the limit
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Well-formed input that is mathematically out of domain, such as a zero
    /// divisor or a factorial argument the engine rejects
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
}
