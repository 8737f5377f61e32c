use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use serde::Serialize;
use sqlx::{Connection, PgConnection};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::transform::{FileSummary, FileTransformer};

/// Outcome of running one transformer over a data root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub root: PathBuf,
    pub files_found: usize,
    pub files_processed: usize,
    pub rows: FileSummary,
}

/// Lists every `*.json` file below `root`, at any depth, as absolute paths.
///
/// Order is whatever the directory walk yields; callers must not rely on it.
/// Hidden files are skipped. A root that does not exist has no files.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = json_pattern(root);
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut files = Vec::new();
    for entry in glob_with(&pattern, options)? {
        let path = entry?;
        if path.is_file() {
            files.push(std::path::absolute(&path)?);
        }
    }
    Ok(files)
}

/// Glob matching every `*.json` below `root`. An empty root means the
/// current directory.
pub fn json_pattern(root: &Path) -> String {
    let base = root.components().as_path();
    let base = if base.as_os_str().is_empty() {
        Path::new(".")
    } else {
        base
    };
    format!("{}/**/*.json", Pattern::escape(&base.to_string_lossy()))
}

/// Runs `transformer` over every JSON file under `root`, committing once per
/// file.
///
/// The first error aborts the batch. Files committed before it stay
/// committed; the failing file's transaction is rolled back.
pub async fn process_data(
    conn: &mut PgConnection,
    root: &Path,
    transformer: &dyn FileTransformer,
) -> Result<BatchSummary> {
    if !root.as_os_str().is_empty() && !root.exists() {
        warn!(root = %root.display(), "Data root does not exist");
    }

    let files = discover_files(root)?;
    let total = files.len();
    println!("{} files found in {}", total, root.display());
    info!(
        transformer = transformer.name(),
        root = %root.display(),
        files = total,
        "Starting batch"
    );

    let mut summary = BatchSummary {
        root: root.to_path_buf(),
        files_found: total,
        ..BatchSummary::default()
    };

    for (index, path) in files.iter().enumerate() {
        let mut tx = conn.begin().await?;
        let file_summary = transformer.process_file(&mut *tx, path).await?;
        tx.commit().await?;

        debug!(
            transformer = transformer.name(),
            file = %path.display(),
            songs = file_summary.songs,
            artists = file_summary.artists,
            time = file_summary.time,
            users = file_summary.users,
            songplays = file_summary.songplays,
            "File committed"
        );

        summary.files_processed += 1;
        summary.rows += file_summary;
        println!("{}/{} files processed.", index + 1, total);
    }

    info!(
        transformer = transformer.name(),
        files = summary.files_processed,
        "Batch finished"
    );
    Ok(summary)
}
