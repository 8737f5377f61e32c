use std::io::Cursor;
use std::path::Path;

use polars::io::SerReader;
use polars::prelude::*;

use crate::errors::ParserError;

/// Reads newline-delimited JSON into a DataFrame, one row per line.
///
/// The schema is inferred from every line so that a column that is null for
/// the first records still picks up its type from later ones. Blank input
/// yields an empty frame with no columns.
pub fn read_json_lines(content: &str) -> Result<DataFrame, ParserError> {
    if content.trim().is_empty() {
        return Ok(DataFrame::empty());
    }

    JsonReader::new(Cursor::new(content.as_bytes().to_vec()))
        .with_json_format(JsonFormat::JsonLines)
        .infer_schema_len(None)
        .finish()
        .map_err(ParserError::MalformedJson)
}

pub fn read_json_lines_file(path: &Path) -> Result<DataFrame, ParserError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParserError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json_lines(&content)
}
