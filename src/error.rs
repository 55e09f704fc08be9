use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("board must have at least one row and one column (got {columns}x{rows})")]
    EmptyBoard { columns: usize, rows: usize },
    #[error("board of {columns}x{rows} is too large")]
    TooLarge { columns: usize, rows: usize },
    #[error("board of {columns}x{rows} has an odd number of cards")]
    OddCardCount { columns: usize, rows: usize },
    #[error("board needs {pairs} distinct symbols but the pool only has {pool_size}")]
    PoolTooSmall { pairs: usize, pool_size: usize },
    #[error("symbol pool contains '{0}' more than once")]
    DuplicateSymbol(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },
    #[error(transparent)]
    Game(#[from] GameError),
}
