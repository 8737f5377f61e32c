use std::ops::AddAssign;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use sparkify_parser::{read_log_file, read_song_file, LogFileData, ParserError, SongFileData};
use sqlx::PgConnection;
use tracing::debug;

use crate::error::{EtlError, Result};
use crate::load::{
    find_song, insert_artist, insert_song, insert_songplay, insert_time, insert_user,
};

/// Rows actually written while loading one file (or a batch of files).
/// Skipped duplicates are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
    pub users: usize,
    pub songplays: usize,
    /// Songplays stored without a resolved song/artist.
    pub unresolved_songplays: usize,
}

impl AddAssign for FileSummary {
    fn add_assign(&mut self, other: Self) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.time += other.time;
        self.users += other.users;
        self.songplays += other.songplays;
        self.unresolved_songplays += other.unresolved_songplays;
    }
}

/// Turns one raw file into rows on the given connection.
///
/// Implementations never commit; the batch driver owns the transaction.
#[async_trait]
pub trait FileTransformer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn process_file(&self, conn: &mut PgConnection, path: &Path) -> Result<FileSummary>;
}

fn parse_error(path: &Path, source: ParserError) -> EtlError {
    EtlError::Parse {
        path: path.display().to_string(),
        source,
    }
}

/// Loads song-metadata files into `songs` and `artists`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SongFileTransformer;

#[async_trait]
impl FileTransformer for SongFileTransformer {
    fn name(&self) -> &'static str {
        "song_file"
    }

    async fn process_file(&self, conn: &mut PgConnection, path: &Path) -> Result<FileSummary> {
        let data = read_song_file(path).map_err(|err| parse_error(path, err))?;
        load_song_data(conn, &data).await
    }
}

pub async fn load_song_data(conn: &mut PgConnection, data: &SongFileData) -> Result<FileSummary> {
    let mut summary = FileSummary::default();

    for song in &data.songs {
        if insert_song(conn, song).await? {
            summary.songs += 1;
        }
    }

    for artist in &data.artists {
        if insert_artist(conn, artist).await? {
            summary.artists += 1;
        }
    }

    Ok(summary)
}

/// Loads event-log files into `time`, `users` and `songplay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFileTransformer;

#[async_trait]
impl FileTransformer for LogFileTransformer {
    fn name(&self) -> &'static str {
        "log_file"
    }

    async fn process_file(&self, conn: &mut PgConnection, path: &Path) -> Result<FileSummary> {
        let data = read_log_file(path).map_err(|err| parse_error(path, err))?;
        load_log_data(conn, &data).await
    }
}

pub async fn load_log_data(conn: &mut PgConnection, data: &LogFileData) -> Result<FileSummary> {
    let mut summary = FileSummary::default();

    for time in &data.time {
        if insert_time(conn, time).await? {
            summary.time += 1;
        }
    }

    for user in &data.users {
        if insert_user(conn, user).await? {
            summary.users += 1;
        }
    }

    // The lookup runs for every event, including ones that end up skipped.
    for event in &data.events {
        let song = find_song(conn, event).await?;

        let Some((user_id, start_time)) = event.loadable() else {
            debug!(%event, "Skipping play without numeric user or timestamp");
            continue;
        };

        if insert_songplay(conn, start_time, user_id, event, &song).await? {
            summary.songplays += 1;
            if !song.is_resolved() {
                summary.unresolved_songplays += 1;
            }
        }
    }

    Ok(summary)
}
