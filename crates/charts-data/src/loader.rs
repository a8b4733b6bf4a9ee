//! CSV snapshot discovery and loading.
//!
//! Snapshots are written by the YouTube Data API scraper as
//! `channels_data_YYYY-MM-DD.csv` and `video_data_YYYY-MM-DD.csv`. Each file
//! becomes one immutable [`Table`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use charts_core::error::{ChartsError, Result};
use charts_core::models::{ChannelRecord, ChannelTable, Table, VideoRecord, VideoTable};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// File-name prefix of channel snapshots.
pub const CHANNELS_PREFIX: &str = "channels_data_";
/// File-name prefix of video snapshots.
pub const VIDEOS_PREFIX: &str = "video_data_";

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find every `<prefix>*.csv` file directly inside `dir`, sorted by path.
pub fn find_snapshots(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| name.starts_with(prefix) && name.ends_with(".csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// The newest snapshot for `prefix` in `dir`.
///
/// Date stamps are ISO formatted, so the lexicographically greatest file name
/// is the most recent one.
pub fn discover_snapshot(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let files = find_snapshots(dir, prefix);
    if files.len() > 1 {
        debug!(
            "{} {}*.csv snapshots in {}, using the newest",
            files.len(),
            prefix,
            dir.display()
        );
    }
    files
        .into_iter()
        .next_back()
        .ok_or_else(|| ChartsError::SnapshotNotFound {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
        })
}

/// Use `explicit` when given, otherwise discover the newest snapshot in `dir`.
pub fn resolve_snapshot(explicit: Option<&Path>, dir: &Path, prefix: &str) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => discover_snapshot(dir, prefix),
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load the channels snapshot at `path`.
pub fn load_channels(path: &Path) -> Result<ChannelTable> {
    read_table(path, "channels", |row: &mut ChannelRecord, n| {
        row.row_number = n
    })
}

/// Load the videos snapshot at `path`.
pub fn load_videos(path: &Path) -> Result<VideoTable> {
    read_table(path, "videos", |row: &mut VideoRecord, n| row.row_number = n)
}

/// Read a CSV file into a table, numbering data rows from 1.
///
/// The header row becomes the table's schema; columns the record type does
/// not know are ignored and missing ones are left at their defaults.
fn read_table<R>(path: &Path, name: &str, number: impl Fn(&mut R, usize)) -> Result<Table<R>>
where
    R: DeserializeOwned,
{
    let started = Instant::now();
    let load_err = |source: csv::Error| ChartsError::Load {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_path(path)
        .map_err(load_err)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(load_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<R>().enumerate() {
        let mut row = record.map_err(load_err)?;
        number(&mut row, index + 1);
        rows.push(row);
    }

    info!(
        "Loaded {} {} rows from {} in {:?}",
        rows.len(),
        name,
        path.display(),
        started.elapsed()
    );

    Ok(Table::new(name, columns, rows))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
