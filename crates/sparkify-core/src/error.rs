// crates/sparkify-core/src/error.rs

use sparkify_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("failed to connect to Postgres: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParserError,
    },

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to walk data directory: {0}")]
    Walk(#[from] glob::GlobError),
}

pub type Result<T> = std::result::Result<T, EtlError>;
