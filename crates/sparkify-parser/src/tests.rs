use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::df;
use serde_json::json;

use crate::columns::{float_values, is_numeric, parse_numeric};
use crate::errors::ParserError;
use crate::model::{timestamp_from_millis, TimeRecord};
use crate::{parse_log_file, parse_song_file, read_log_file, read_song_file, TIME_ROW_LIMIT};

fn fixture_path(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(path)
}

fn fixture(path: &str) -> String {
    let full_path = fixture_path(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn log_line(page: &str, ts: i64, user_id: &str, level: &str) -> String {
    json!({
        "artist": "Casual",
        "auth": "Logged In",
        "firstName": "Kaylee",
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Summers",
        "length": 218.93179,
        "level": level,
        "location": "Phoenix-Mesa-Scottsdale, AZ",
        "method": "PUT",
        "page": page,
        "registration": 1540344794796.0,
        "sessionId": 139,
        "song": "I Didn't Mean To",
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (X11; Linux x86_64; rv:31.0) Gecko/20100101 Firefox/31.0",
        "userId": user_id,
    })
    .to_string()
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_milli_opt(h, min, s, ms)
        .unwrap()
}

#[test]
fn parses_single_record_song_file() {
    let parsed = read_song_file(&fixture_path("song_data/A/A/A/TRAAAAW128F429D538.json"))
        .expect("song file parse failed");

    assert_eq!(parsed.songs.len(), 1);
    assert_eq!(parsed.artists.len(), 1);

    let song = &parsed.songs[0];
    assert_eq!(song.song_id, "SOMZWCG12A8C13C480");
    assert_eq!(song.title, "I Didn't Mean To");
    assert_eq!(song.artist_id.as_deref(), Some("ARD7TVE1187B99BFB1"));
    assert_eq!(song.year, Some(0));
    assert_eq!(song.duration, Some(218.93179));

    let artist = &parsed.artists[0];
    assert_eq!(artist.artist_id, "ARD7TVE1187B99BFB1");
    assert_eq!(artist.name, "Casual");
    assert_eq!(artist.location.as_deref(), Some("California - LA"));
    assert_eq!(artist.latitude, None);
    assert_eq!(artist.longitude, None);
}

#[test]
fn song_and_artist_rows_from_inline_record() {
    let line = json!({
        "song_id": "S1",
        "title": "T",
        "artist_id": "A1",
        "year": 2000,
        "duration": 1.0,
        "artist_name": "N",
        "artist_location": null,
        "artist_latitude": null,
        "artist_longitude": null,
    })
    .to_string();

    let parsed = parse_song_file(&line).expect("inline song parse failed");

    assert_eq!(parsed.songs.len(), 1);
    assert_eq!(parsed.songs[0].song_id, "S1");
    assert_eq!(parsed.songs[0].year, Some(2000));
    assert_eq!(parsed.artists.len(), 1);
    assert_eq!(parsed.artists[0].name, "N");
}

#[test]
fn rows_missing_required_keys_are_dropped() {
    let parsed = parse_song_file(&fixture("songs_with_gaps.json")).expect("parse failed");

    let song_ids: Vec<&str> = parsed.songs.iter().map(|s| s.song_id.as_str()).collect();
    assert_eq!(song_ids, ["SOINLJW12A8C13314C", "SOUDSGM12AC9618304"]);

    let artist_ids: Vec<&str> = parsed
        .artists
        .iter()
        .map(|a| a.artist_id.as_str())
        .collect();
    assert_eq!(
        artist_ids,
        ["AR8IEZO1187B99055E", "ARMJAGH1187FB546F3", "ARGSJW91187B9B1D6B"]
    );

    // An empty location is a value, not a null.
    assert_eq!(parsed.artists[0].location.as_deref(), Some(""));
    assert_eq!(parsed.artists[1].latitude, Some(35.14968));
}

#[test]
fn malformed_song_file_fails_whole_file() {
    let err = parse_song_file(&fixture("malformed_song.json")).unwrap_err();
    assert!(matches!(err, ParserError::MalformedJson(_)), "got {err:?}");
}

#[test]
fn missing_song_column_is_reported() {
    let line = json!({
        "song_id": "S1",
        "artist_id": "A1",
        "year": 2000,
        "duration": 1.0,
        "artist_name": "N",
        "artist_location": null,
        "artist_latitude": null,
        "artist_longitude": null,
    })
    .to_string();

    let err = parse_song_file(&line).unwrap_err();
    assert!(
        matches!(err, ParserError::MissingColumn { column: "title" }),
        "got {err:?}"
    );
}

#[test]
fn blank_files_yield_no_rows() {
    assert!(parse_song_file("").unwrap().songs.is_empty());
    let log = parse_log_file("\n").unwrap();
    assert!(log.time.is_empty());
    assert!(log.events.is_empty());
}

#[test]
fn missing_file_reports_path() {
    let err = read_log_file(&fixture_path("log_data/does-not-exist.json")).unwrap_err();
    match err {
        ParserError::Io { path, .. } => assert!(path.ends_with("does-not-exist.json")),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn nan_floats_become_null() {
    let frame = df!("duration" => [Some(f64::NAN), Some(1.5), None]).unwrap();
    let values = float_values(&frame, "duration").unwrap();
    assert_eq!(values, vec![None, Some(1.5), None]);
}

#[test]
fn parses_log_fixture() {
    let parsed = read_log_file(&fixture_path("log_data/2018/11/2018-11-01-events.json"))
        .expect("log parse failed");

    // Four NextSong rows, one Home, one logged-out Login.
    assert_eq!(parsed.time.len(), 4);
    assert_eq!(parsed.events.len(), 6);

    let user_ids: Vec<i32> = parsed.users.iter().map(|u| u.user_id).collect();
    assert_eq!(user_ids, [39, 8, 8, 7, 8]);
    assert_eq!(parsed.users[0].first_name.as_deref(), Some("Walter"));
    assert_eq!(parsed.users[3].level.as_deref(), Some("free"));

    let first_play = &parsed.time[0];
    assert_eq!(first_play.start_time, datetime(2018, 11, 1, 21, 1, 46, 796));

    let logged_out = &parsed.events[3];
    assert_eq!(logged_out.user_id, None);
    assert!(logged_out.start_time.is_some());
    assert!(logged_out.loadable().is_none());

    let play = &parsed.events[1];
    assert_eq!(play.user_id, Some(8));
    assert_eq!(play.song.as_deref(), Some("I Didn't Mean To"));
    assert_eq!(play.artist.as_deref(), Some("Casual"));
    assert_eq!(play.length, Some(218.93179));
    assert_eq!(play.session_id.as_deref(), Some("139"));
    assert_eq!(
        play.loadable(),
        Some((8, datetime(2018, 11, 1, 21, 1, 46, 796)))
    );
}

#[test]
fn time_rows_are_capped_per_file() {
    let base = 1541106106796_i64;
    let lines: Vec<String> = (0..25)
        .map(|i| log_line("NextSong", base + i * 1_000, "8", "free"))
        .collect();

    let parsed = parse_log_file(&lines.join("\n")).unwrap();

    assert_eq!(parsed.time.len(), TIME_ROW_LIMIT);
    assert_eq!(parsed.events.len(), 25);
    let expected: Vec<NaiveDateTime> = (0..20)
        .map(|i| timestamp_from_millis(base + i * 1_000).unwrap())
        .collect();
    let actual: Vec<NaiveDateTime> = parsed.time.iter().map(|t| t.start_time).collect();
    assert_eq!(actual, expected);
}

#[test]
fn time_cap_only_counts_next_song_rows() {
    let base = 1541106106796_i64;
    let mut lines = Vec::new();
    for i in 0..25 {
        lines.push(log_line("Home", base + i * 2_000, "8", "free"));
        lines.push(log_line("NextSong", base + i * 2_000 + 1_000, "8", "free"));
    }

    let parsed = parse_log_file(&lines.join("\n")).unwrap();

    assert_eq!(parsed.time.len(), 20);
    assert_eq!(
        parsed.time[0].start_time,
        timestamp_from_millis(base + 1_000).unwrap()
    );
    assert_eq!(parsed.users.len(), 50);
}

#[test]
fn non_numeric_user_produces_no_user_or_play() {
    let lines = [
        log_line("NextSong", 1541106106796, "abc", "free"),
        log_line("NextSong", 1541106352796, "", "free"),
        log_line("NextSong", 1541106673796, "-4", "free"),
    ];

    let parsed = parse_log_file(&lines.join("\n")).unwrap();

    assert!(parsed.users.is_empty());
    assert_eq!(parsed.events.len(), 3);
    assert!(parsed.events.iter().all(|e| e.loadable().is_none()));
    // The time dimension does not depend on the user.
    assert_eq!(parsed.time.len(), 3);
}

#[test]
fn numeric_checks_are_digit_only() {
    assert!(is_numeric("39"));
    assert!(is_numeric("1541106106796"));
    assert!(!is_numeric(""));
    assert!(!is_numeric("-1"));
    assert!(!is_numeric("3.5"));
    assert!(!is_numeric(" 7"));
    assert!(!is_numeric("abc"));

    assert_eq!(parse_numeric::<i32>(Some("007")), Some(7));
    assert_eq!(parse_numeric::<i32>(Some("99999999999")), None);
    assert_eq!(parse_numeric::<i64>(Some("99999999999")), Some(99_999_999_999));
    assert_eq!(parse_numeric::<i32>(None), None);
}

#[test]
fn time_record_fields() {
    let record = TimeRecord::from_timestamp(datetime(2018, 11, 1, 21, 1, 46, 796));

    assert_eq!(
        record.hour,
        NaiveTime::from_hms_milli_opt(21, 1, 46, 796).unwrap()
    );
    assert_eq!(record.day, 1);
    assert_eq!(record.week, 44);
    assert_eq!(record.month, 11);
    assert_eq!(record.year, 2018);
    assert_eq!(record.weekday, 4);
    assert_eq!(record.day_name, "Thursday");

    let sunday = TimeRecord::from_timestamp(datetime(2018, 11, 4, 0, 0, 0, 0));
    assert_eq!(sunday.weekday, 7);
    assert_eq!(sunday.day_name, "Sunday");
}
