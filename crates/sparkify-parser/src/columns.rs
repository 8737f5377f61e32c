use std::str::FromStr;

use polars::prelude::*;

use crate::errors::ParserError;

fn column<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a Column, ParserError> {
    df.column(name)
        .map_err(|_| ParserError::MissingColumn { column: name })
}

fn cast_column(
    df: &DataFrame,
    name: &'static str,
    dtype: &DataType,
    expected: &'static str,
) -> Result<Column, ParserError> {
    column(df, name)?
        .cast(dtype)
        .map_err(|source| ParserError::ColumnType {
            column: name,
            expected,
            source,
        })
}

/// Values of `name` rendered as text. Integers keep their decimal digits, so
/// a numeric `ts` or `sessionId` reads back as e.g. `"1541105830796"`.
pub fn string_values(df: &DataFrame, name: &'static str) -> Result<Vec<Option<String>>, ParserError> {
    let cast = cast_column(df, name, &DataType::String, "string")?;
    let values = cast.str().map_err(|source| ParserError::ColumnType {
        column: name,
        expected: "string",
        source,
    })?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_owned))
        .collect())
}

/// Values of `name` as floats, with NaN folded into null.
pub fn float_values(df: &DataFrame, name: &'static str) -> Result<Vec<Option<f64>>, ParserError> {
    let cast = cast_column(df, name, &DataType::Float64, "float")?;
    let values = cast.f64().map_err(|source| ParserError::ColumnType {
        column: name,
        expected: "float",
        source,
    })?;
    Ok(values
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect())
}

pub fn int_values(df: &DataFrame, name: &'static str) -> Result<Vec<Option<i64>>, ParserError> {
    let cast = cast_column(df, name, &DataType::Int64, "integer")?;
    let values = cast.i64().map_err(|source| ParserError::ColumnType {
        column: name,
        expected: "integer",
        source,
    })?;
    Ok(values.into_iter().collect())
}

/// A value is numeric when it is a non-empty run of ASCII digits. Signs,
/// decimal points and whitespace all disqualify it.
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a numeric string into `T`. Anything that is not numeric, or that
/// overflows `T`, comes back as `None`.
pub fn parse_numeric<T: FromStr>(value: Option<&str>) -> Option<T> {
    value
        .filter(|v| is_numeric(v))
        .and_then(|v| v.parse::<T>().ok())
}
