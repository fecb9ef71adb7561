use thiserror::Error;

/// Error types for dictionary loading and option parsing
#[derive(Error, Debug)]
pub enum L10nError {
    /// A quoted field in a dictionary source was still open at end of input
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
    /// An `{ITEM}` dictionary key could not be compiled into a matcher
    #[error("Invalid pattern rule for key {key:?}: {source}")]
    PatternRule {
        key: String,
        #[source]
        source: regex::Error,
    },
    /// The key and its translation disagree on the number of `{ITEM}` slots
    #[error("Pattern rule {key:?} has {expected} item slot(s) but its translation has {found}")]
    ItemCountMismatch {
        key: String,
        expected: usize,
        found: usize,
    },
    /// Delimiter name other than comma, semicolon or auto
    #[error("Unknown delimiter: {0}")]
    UnknownDelimiter(String),
    /// Gender name other than male or female
    #[error("Unknown gender: {0}")]
    UnknownGender(String),
    /// Language pack metadata is not valid JSON for a pack description
    #[error("Invalid language pack metadata: {0}")]
    PackInfo(#[from] serde_json::Error),
}

/// Result type for localization operations
pub type L10nResult<T> = Result<T, L10nError>;
