pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod load;
pub mod queries;
pub mod transform;

pub use batch::{discover_files, json_pattern, process_data, BatchSummary};
pub use config::EtlConfig;
pub use error::{EtlError, Result};
pub use transform::{FileSummary, FileTransformer, LogFileTransformer, SongFileTransformer};
