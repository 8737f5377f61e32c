use std::path::Path;

use polars::prelude::DataFrame;

use crate::columns::{float_values, int_values, string_values};
use crate::errors::ParserError;
use crate::frame::{read_json_lines, read_json_lines_file};
use crate::model::{ArtistRecord, SongRecord};

/// Rows extracted from one song-metadata file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFileData {
    pub songs: Vec<SongRecord>,
    pub artists: Vec<ArtistRecord>,
}

pub fn parse_song_file(content: &str) -> Result<SongFileData, ParserError> {
    let df = read_json_lines(content)?;
    song_file_from_frame(&df)
}

pub fn read_song_file(path: &Path) -> Result<SongFileData, ParserError> {
    let df = read_json_lines_file(path)?;
    song_file_from_frame(&df)
}

/// Splits a song frame into song and artist rows.
///
/// Songs without a `song_id` or `title` and artists without an `artist_id`
/// or `artist_name` are left out, since the target tables require them.
pub fn song_file_from_frame(df: &DataFrame) -> Result<SongFileData, ParserError> {
    if df.width() == 0 {
        return Ok(SongFileData::default());
    }

    Ok(SongFileData {
        songs: song_records(df)?,
        artists: artist_records(df)?,
    })
}

fn song_records(df: &DataFrame) -> Result<Vec<SongRecord>, ParserError> {
    let song_ids = string_values(df, "song_id")?;
    let titles = string_values(df, "title")?;
    let artist_ids = string_values(df, "artist_id")?;
    let years = int_values(df, "year")?;
    let durations = float_values(df, "duration")?;

    Ok(song_ids
        .into_iter()
        .zip(titles)
        .zip(artist_ids)
        .zip(years)
        .zip(durations)
        .filter_map(|((((song_id, title), artist_id), year), duration)| {
            Some(SongRecord {
                song_id: song_id?,
                title: title?,
                artist_id,
                year: year.and_then(|y| i32::try_from(y).ok()),
                duration,
            })
        })
        .collect())
}

fn artist_records(df: &DataFrame) -> Result<Vec<ArtistRecord>, ParserError> {
    let artist_ids = string_values(df, "artist_id")?;
    let names = string_values(df, "artist_name")?;
    let locations = string_values(df, "artist_location")?;
    let latitudes = float_values(df, "artist_latitude")?;
    let longitudes = float_values(df, "artist_longitude")?;

    Ok(artist_ids
        .into_iter()
        .zip(names)
        .zip(locations)
        .zip(latitudes)
        .zip(longitudes)
        .filter_map(|((((artist_id, name), location), latitude), longitude)| {
            Some(ArtistRecord {
                artist_id: artist_id?,
                name: name?,
                location,
                latitude,
                longitude,
            })
        })
        .collect())
}
