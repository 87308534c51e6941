use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Directory errors
    #[error("Malformed directory response ({length} chars): expected a JSON array")]
    MalformedDirectory { length: usize },

    #[error("Directory parse error ({category}) at line {line}, column {column}: near `{excerpt}`")]
    DirectoryParse {
        category: String,
        line: usize,
        column: usize,
        excerpt: String,
    },

    // Badge errors
    #[error("Invalid badge identifier: {0}")]
    InvalidBadge(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Display errors
    #[error("Display line {line} out of range (max {max})")]
    InvalidLine { line: usize, max: usize },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration key: {0}")]
    MissingConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
