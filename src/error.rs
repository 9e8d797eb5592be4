use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenprogError {
    #[error("Malformed input: {0}")]
    InputMalformed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cell ({row}, {column}) is outside a {rows}x{columns} table")]
    OutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Config loader error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenprogError>;

/// Per-row evaluation failure. Never fatal: it only counts against the
/// genome's error budget.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("ran off the end of the genome at node {position}")]
    Truncated { position: usize },

    #[error("{operator} is undefined for its arguments")]
    Domain { operator: &'static str },

    #[error("unknown operator id {0}")]
    UnknownOperator(usize),

    #[error("column {column} is not readable at row {row}")]
    Cell { row: usize, column: usize },
}
