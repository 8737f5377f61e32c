pub mod columns;
pub mod errors;
pub mod frame;
pub mod log;
pub mod model;
pub mod song;

pub use errors::ParserError;
pub use log::{parse_log_file, read_log_file, LogFileData, NEXT_SONG_PAGE, TIME_ROW_LIMIT};
pub use model::{ArtistRecord, SongRecord, SongplayEvent, TimeRecord, UserRecord};
pub use song::{parse_song_file, read_song_file, SongFileData};

#[cfg(test)]
mod tests;
