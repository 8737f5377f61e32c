use std::path::Path;

use polars::prelude::*;

use crate::columns::{float_values, int_values, parse_numeric, string_values};
use crate::errors::ParserError;
use crate::frame::{read_json_lines, read_json_lines_file};
use crate::model::{timestamp_from_millis, SongplayEvent, TimeRecord, UserRecord};

/// `page` value of a log row that records active playback.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// Only the first playback timestamps of each log file, in file order, feed
/// the time dimension.
pub const TIME_ROW_LIMIT: usize = 20;

/// Rows extracted from one event-log file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFileData {
    pub time: Vec<TimeRecord>,
    pub users: Vec<UserRecord>,
    pub events: Vec<SongplayEvent>,
}

pub fn parse_log_file(content: &str) -> Result<LogFileData, ParserError> {
    let df = read_json_lines(content)?;
    log_file_from_frame(&df)
}

pub fn read_log_file(path: &Path) -> Result<LogFileData, ParserError> {
    let df = read_json_lines_file(path)?;
    log_file_from_frame(&df)
}

pub fn log_file_from_frame(df: &DataFrame) -> Result<LogFileData, ParserError> {
    if df.width() == 0 {
        return Ok(LogFileData::default());
    }

    Ok(LogFileData {
        time: time_records(df)?,
        users: user_records(df)?,
        events: songplay_events(df)?,
    })
}

fn time_records(df: &DataFrame) -> Result<Vec<TimeRecord>, ParserError> {
    for required in ["page", "ts"] {
        if df.column(required).is_err() {
            return Err(ParserError::MissingColumn { column: required });
        }
    }

    let next_songs = df
        .clone()
        .lazy()
        .filter(col("page").cast(DataType::String).eq(lit(NEXT_SONG_PAGE)))
        .select([col("ts")])
        .limit(TIME_ROW_LIMIT as IdxSize)
        .collect()?;

    // A playback row without a usable timestamp still counts against the
    // limit; it just contributes no time row.
    Ok(int_values(&next_songs, "ts")?
        .into_iter()
        .flatten()
        .filter_map(timestamp_from_millis)
        .map(TimeRecord::from_timestamp)
        .collect())
}

fn user_records(df: &DataFrame) -> Result<Vec<UserRecord>, ParserError> {
    let user_ids = string_values(df, "userId")?;
    let first_names = string_values(df, "firstName")?;
    let last_names = string_values(df, "lastName")?;
    let genders = string_values(df, "gender")?;
    let levels = string_values(df, "level")?;

    Ok(user_ids
        .into_iter()
        .zip(first_names)
        .zip(last_names)
        .zip(genders)
        .zip(levels)
        .filter_map(|((((user_id, first_name), last_name), gender), level)| {
            Some(UserRecord {
                user_id: parse_numeric(user_id.as_deref())?,
                first_name,
                last_name,
                gender,
                level,
            })
        })
        .collect())
}

fn songplay_events(df: &DataFrame) -> Result<Vec<SongplayEvent>, ParserError> {
    let timestamps = string_values(df, "ts")?;
    let user_ids = string_values(df, "userId")?;
    let levels = string_values(df, "level")?;
    let songs = string_values(df, "song")?;
    let artists = string_values(df, "artist")?;
    let lengths = float_values(df, "length")?;
    let session_ids = string_values(df, "sessionId")?;
    let locations = string_values(df, "location")?;
    let user_agents = string_values(df, "userAgent")?;

    let mut events = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let start_time = parse_numeric::<i64>(timestamps[idx].as_deref())
            .and_then(timestamp_from_millis);

        events.push(SongplayEvent {
            start_time,
            user_id: parse_numeric(user_ids[idx].as_deref()),
            level: levels[idx].clone(),
            song: songs[idx].clone(),
            artist: artists[idx].clone(),
            length: lengths[idx],
            session_id: session_ids[idx].clone(),
            location: locations[idx].clone(),
            user_agent: user_agents[idx].clone(),
        });
    }

    Ok(events)
}
