use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRecord {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One row of the time dimension, derived from a playback timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRecord {
    pub start_time: NaiveDateTime,
    pub hour: NaiveTime,
    pub day: i32,
    /// ISO 8601 week number.
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// Monday is 1, Sunday is 7.
    pub weekday: i32,
    pub day_name: String,
}

impl TimeRecord {
    pub fn from_timestamp(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            hour: start_time.time(),
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
            weekday: start_time.weekday().number_from_monday() as i32,
            day_name: start_time.format("%A").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub user_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// A single log row as seen by the songplay loader.
///
/// Every row of a log file becomes an event, whatever its page. `user_id` and
/// `start_time` are only set when the raw `userId` and `ts` were numeric; an
/// event missing either is looked up but never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongplayEvent {
    pub start_time: Option<NaiveDateTime>,
    pub user_id: Option<i32>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<String>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl SongplayEvent {
    pub fn loadable(&self) -> Option<(i32, NaiveDateTime)> {
        Some((self.user_id?, self.start_time?))
    }
}

impl fmt::Display for SongplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({})",
            self.song.as_deref().unwrap_or("<no song>"),
            self.artist.as_deref().unwrap_or("<no artist>"),
            self.length
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string())
        )
    }
}

/// Converts epoch milliseconds (UTC) to a naive timestamp.
pub fn timestamp_from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}
