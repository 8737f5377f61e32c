//! Single-row writers for each table, plus the songplay lookup.
//!
//! Each insert returns whether a row was actually written; `false` means the
//! natural key already existed and the insert was skipped.

use chrono::NaiveDateTime;
use sparkify_parser::{ArtistRecord, SongRecord, SongplayEvent, TimeRecord, UserRecord};
use sqlx::PgConnection;

use crate::error::Result;
use crate::queries::{
    ARTIST_TABLE_INSERT, SONGPLAY_TABLE_INSERT, SONG_SELECT, SONG_TABLE_INSERT, TIME_TABLE_INSERT,
    USER_TABLE_INSERT,
};

/// Identifiers resolved for a play event. Both are `None` when no catalog
/// song matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongMatch {
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
}

impl SongMatch {
    pub fn is_resolved(&self) -> bool {
        self.song_id.is_some()
    }
}

/// Shortest text that parses back to the same `f64`. Binding a float directly
/// would let Postgres round it to 15 significant digits on the way to `NUMERIC`.
pub fn decimal_text(value: f64) -> String {
    value.to_string()
}

pub async fn insert_song(conn: &mut PgConnection, song: &SongRecord) -> Result<bool> {
    let result = sqlx::query(SONG_TABLE_INSERT.sql)
        .bind(&song.song_id)
        .bind(&song.title)
        .bind(&song.artist_id)
        .bind(song.year)
        .bind(song.duration.map(decimal_text))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_artist(conn: &mut PgConnection, artist: &ArtistRecord) -> Result<bool> {
    let result = sqlx::query(ARTIST_TABLE_INSERT.sql)
        .bind(&artist.artist_id)
        .bind(&artist.name)
        .bind(&artist.location)
        .bind(artist.latitude)
        .bind(artist.longitude)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_time(conn: &mut PgConnection, time: &TimeRecord) -> Result<bool> {
    let result = sqlx::query(TIME_TABLE_INSERT.sql)
        .bind(time.start_time)
        .bind(time.hour)
        .bind(time.day)
        .bind(time.week)
        .bind(time.month)
        .bind(time.year)
        .bind(time.weekday)
        .bind(&time.day_name)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_user(conn: &mut PgConnection, user: &UserRecord) -> Result<bool> {
    let result = sqlx::query(USER_TABLE_INSERT.sql)
        .bind(user.user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.gender)
        .bind(&user.level)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Runs the catalog lookup for one event and keeps the first match.
pub async fn find_song(conn: &mut PgConnection, event: &SongplayEvent) -> Result<SongMatch> {
    let row: Option<(String, String)> = sqlx::query_as(SONG_SELECT.sql)
        .bind(event.length.map(decimal_text))
        .bind(event.song.as_deref())
        .bind(event.artist.as_deref())
        .fetch_optional(&mut *conn)
        .await?;

    Ok(match row {
        Some((song_id, artist_id)) => SongMatch {
            song_id: Some(song_id),
            artist_id: Some(artist_id),
        },
        None => SongMatch::default(),
    })
}

pub async fn insert_songplay(
    conn: &mut PgConnection,
    start_time: NaiveDateTime,
    user_id: i32,
    event: &SongplayEvent,
    song: &SongMatch,
) -> Result<bool> {
    let result = sqlx::query(SONGPLAY_TABLE_INSERT.sql)
        .bind(start_time)
        .bind(user_id)
        .bind(&event.level)
        .bind(&song.song_id)
        .bind(&song.artist_id)
        .bind(&event.session_id)
        .bind(&event.location)
        .bind(&event.user_agent)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
