use thiserror::Error;

/// Errors surfaced while lexing or parsing a predicate.
///
/// These propagate unchanged to the caller; this layer never attempts
/// partial recovery from unparsable input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid escape sequence '\\{ch}' at position {position}")]
    InvalidEscape { ch: char, position: usize },

    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("expected {expected}, got {got} at position {position}")]
    UnexpectedToken {
        expected: String,
        got: String,
        position: usize,
    },
}

/// Errors produced by planning passes.
///
/// None of these are retried inside this layer: a fatal condition propagates
/// immediately and the caller decides whether to reject the request or fall
/// back.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Structurally invalid query: a marker with zero or multiple sources,
    /// or a bounded-range marker wrapping non-range content. Never silently
    /// repaired.
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// Invalid regular expression in a comparison or filter-function
    /// argument, surfaced at validation time.
    #[error("invalid pattern '{pattern}' for field {field}: {source}")]
    PatternSyntax {
        field: String,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// Term count over the configured maximum during range-building. An
    /// explicit rejection, never a truncated partial result.
    #[error("term limit exceeded: {count} terms where at most {limit} are permitted")]
    TermLimitExceeded { count: usize, limit: usize },

    /// Lineage or reference-wrapping violation detected by validation.
    #[error("lineage violation: {0}")]
    Lineage(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
