use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON lines input: {0}")]
    MalformedJson(#[source] PolarsError),

    #[error("column '{column}' not found in input")]
    MissingColumn { column: &'static str },

    #[error("column '{column}' could not be read as {expected}: {source}")]
    ColumnType {
        column: &'static str,
        expected: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
