//! Table definitions and parameterized statements for the sparkify star schema.
//!
//! Every statement is paired with the ordered names of its bind parameters so
//! callers and tests can check that `$n` placeholders line up with what is
//! bound.

/// A parameterized SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    pub name: &'static str,
    pub sql: &'static str,
    pub params: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Songplay,
    Users,
    Songs,
    Artists,
    Time,
}

impl Table {
    /// Drop/create order: the fact table first.
    pub const ALL: [Table; 5] = [
        Table::Songplay,
        Table::Users,
        Table::Songs,
        Table::Artists,
        Table::Time,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Songplay => "songplay",
            Table::Users => "users",
            Table::Songs => "songs",
            Table::Artists => "artists",
            Table::Time => "time",
        }
    }

    /// Column that insert-or-skip is keyed on. The fact table has none.
    pub fn natural_key(&self) -> Option<&'static str> {
        match self {
            Table::Songplay => None,
            Table::Users => Some("user_id"),
            Table::Songs => Some("song_id"),
            Table::Artists => Some("artist_id"),
            Table::Time => Some("start_time"),
        }
    }

    pub fn drop_statement(&self) -> &'static str {
        match self {
            Table::Songplay => SONGPLAY_TABLE_DROP,
            Table::Users => USER_TABLE_DROP,
            Table::Songs => SONG_TABLE_DROP,
            Table::Artists => ARTIST_TABLE_DROP,
            Table::Time => TIME_TABLE_DROP,
        }
    }

    pub fn create_statement(&self) -> &'static str {
        match self {
            Table::Songplay => SONGPLAY_TABLE_CREATE,
            Table::Users => USER_TABLE_CREATE,
            Table::Songs => SONG_TABLE_CREATE,
            Table::Artists => ARTIST_TABLE_CREATE,
            Table::Time => TIME_TABLE_CREATE,
        }
    }

    pub fn insert(&self) -> &'static Statement {
        match self {
            Table::Songplay => &SONGPLAY_TABLE_INSERT,
            Table::Users => &USER_TABLE_INSERT,
            Table::Songs => &SONG_TABLE_INSERT,
            Table::Artists => &ARTIST_TABLE_INSERT,
            Table::Time => &TIME_TABLE_INSERT,
        }
    }
}

pub const SONGPLAY_TABLE_DROP: &str = r#"DROP TABLE IF EXISTS "songplay""#;
pub const USER_TABLE_DROP: &str = r#"DROP TABLE IF EXISTS "users""#;
pub const SONG_TABLE_DROP: &str = r#"DROP TABLE IF EXISTS "songs""#;
pub const ARTIST_TABLE_DROP: &str = r#"DROP TABLE IF EXISTS "artists""#;
pub const TIME_TABLE_DROP: &str = r#"DROP TABLE IF EXISTS "time""#;

pub const SONG_TABLE_CREATE: &str = r#"
    CREATE TABLE "songs" (
        "id" SERIAL PRIMARY KEY,
        "song_id" VARCHAR UNIQUE NOT NULL,
        "title" VARCHAR NOT NULL,
        "artist_id" VARCHAR,
        "year" INT,
        "duration" DECIMAL NOT NULL
    )
"#;

pub const ARTIST_TABLE_CREATE: &str = r#"
    CREATE TABLE "artists" (
        "id" SERIAL PRIMARY KEY,
        "artist_id" VARCHAR UNIQUE NOT NULL,
        "name" VARCHAR NOT NULL,
        "location" VARCHAR,
        "latitude" DOUBLE PRECISION,
        "longitude" DOUBLE PRECISION
    )
"#;

pub const TIME_TABLE_CREATE: &str = r#"
    CREATE TABLE "time" (
        "id" SERIAL PRIMARY KEY,
        "start_time" TIMESTAMP UNIQUE NOT NULL,
        "hour" TIME,
        "day" INT,
        "week" INT,
        "month" INT,
        "year" INT,
        "weekday" INT,
        "day_name" VARCHAR
    )
"#;

pub const USER_TABLE_CREATE: &str = r#"
    CREATE TABLE "users" (
        "id" SERIAL PRIMARY KEY,
        "user_id" INT UNIQUE NOT NULL,
        "first_name" VARCHAR,
        "last_name" VARCHAR,
        "gender" VARCHAR,
        "level" VARCHAR
    )
"#;

pub const SONGPLAY_TABLE_CREATE: &str = r#"
    CREATE TABLE "songplay" (
        "id" SERIAL PRIMARY KEY,
        "start_time" TIMESTAMP NOT NULL,
        "user_id" INT NOT NULL,
        "level" VARCHAR,
        "song_id" VARCHAR,
        "artist_id" VARCHAR,
        "session_id" VARCHAR,
        "location" VARCHAR,
        "user_agent" VARCHAR
    )
"#;

pub static SONG_TABLE_INSERT: Statement = Statement {
    name: "song_table_insert",
    sql: r#"
        INSERT INTO "songs" (song_id, title, artist_id, year, duration)
        VALUES ($1, $2, $3, $4, $5::numeric)
        ON CONFLICT (song_id) DO NOTHING
    "#,
    params: &["song_id", "title", "artist_id", "year", "duration"],
};

pub static ARTIST_TABLE_INSERT: Statement = Statement {
    name: "artist_table_insert",
    sql: r#"
        INSERT INTO "artists" (artist_id, name, location, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (artist_id) DO NOTHING
    "#,
    params: &["artist_id", "name", "location", "latitude", "longitude"],
};

pub static TIME_TABLE_INSERT: Statement = Statement {
    name: "time_table_insert",
    sql: r#"
        INSERT INTO "time" (start_time, hour, day, week, month, year, weekday, day_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (start_time) DO NOTHING
    "#,
    params: &[
        "start_time",
        "hour",
        "day",
        "week",
        "month",
        "year",
        "weekday",
        "day_name",
    ],
};

pub static USER_TABLE_INSERT: Statement = Statement {
    name: "user_table_insert",
    sql: r#"
        INSERT INTO "users" (user_id, first_name, last_name, gender, level)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO NOTHING
    "#,
    params: &["user_id", "first_name", "last_name", "gender", "level"],
};

pub static SONGPLAY_TABLE_INSERT: Statement = Statement {
    name: "songplay_table_insert",
    sql: r#"
        INSERT INTO "songplay" (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT DO NOTHING
    "#,
    params: &[
        "start_time",
        "user_id",
        "level",
        "song_id",
        "artist_id",
        "session_id",
        "location",
        "user_agent",
    ],
};

/// Resolves `(song_id, artist_id)` for a play event. Title and artist name
/// are `LIKE` patterns with escaping disabled; duration must match exactly.
/// Durations travel as decimal text so the `DECIMAL` column keeps every digit.
pub static SONG_SELECT: Statement = Statement {
    name: "song_select",
    sql: r#"
        SELECT songs.song_id, artists.artist_id
        FROM "songs" songs
        INNER JOIN "artists" artists ON songs.artist_id = artists.artist_id
        WHERE songs.duration = $1::numeric
          AND songs.title LIKE $2 ESCAPE ''
          AND artists.name LIKE $3 ESCAPE ''
    "#,
    params: &["duration", "title", "artist_name"],
};

pub fn create_table_queries() -> [&'static str; 5] {
    Table::ALL.map(|table| table.create_statement())
}

pub fn drop_table_queries() -> [&'static str; 5] {
    Table::ALL.map(|table| table.drop_statement())
}
