use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command registry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command name must not be empty")]
    EmptyCommandName,

    #[error("RunParm without a command name at line {line}")]
    EmptyRunParmName { line: usize },

    #[error("Unmatched quote in RunParm at line {line}")]
    UnmatchedQuote { line: usize },

    #[error("Missing delimiter after quoted field in RunParm at line {line}")]
    MissingDelimiter { line: usize },

    #[error("RunParm `{name}` expects at least {expected} value(s), but {actual} given")]
    InvalidRunParm {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;
