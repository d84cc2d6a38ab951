use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaxmanError {
    #[error("level has no rows")]
    EmptyLevel,

    #[error("level row {row} has width {found}, expected {expected}")]
    RaggedLevel {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown level symbol '{symbol}' at ({x},{y})")]
    UnknownCell { symbol: char, x: usize, y: usize },

    #[error("unsupported ranking store version {0}")]
    UnsupportedVersion(u8),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PaxmanResult<T> = Result<T, PaxmanError>;
