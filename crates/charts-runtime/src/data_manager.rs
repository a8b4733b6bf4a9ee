//! Load-once store for the channel and video tables.
//!
//! Each table is read from disk on first access and then shared as an
//! [`Arc`] for the rest of the process. A failed load is not remembered, so
//! the next access retries it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use charts_core::error::Result;
use charts_core::models::{ChannelTable, VideoTable};
use charts_core::settings::Settings;
use charts_data::loader::{self, CHANNELS_PREFIX, VIDEOS_PREFIX};
use tracing::debug;

// ── DataManager ───────────────────────────────────────────────────────────────

/// Memoized access to the two snapshot tables.
///
/// # Example
/// ```no_run
/// use charts_runtime::data_manager::DataManager;
///
/// let mgr = DataManager::new("channels_data_2023-03-19.csv", "video_data_2023-03-19.csv");
/// let channels = mgr.channels()?;
/// println!("{} channels", channels.len());
/// # Ok::<(), charts_runtime::core::error::ChartsError>(())
/// ```
#[derive(Debug)]
pub struct DataManager {
    channels_path: PathBuf,
    videos_path: PathBuf,
    channels: OnceLock<Arc<ChannelTable>>,
    videos: OnceLock<Arc<VideoTable>>,
    /// Serialises first loads so a table is never read twice.
    load_lock: Mutex<()>,
}

impl DataManager {
    pub fn new(channels_path: impl Into<PathBuf>, videos_path: impl Into<PathBuf>) -> Self {
        Self {
            channels_path: channels_path.into(),
            videos_path: videos_path.into(),
            channels: OnceLock::new(),
            videos: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Resolve snapshot paths from `--channels`/`--videos`, falling back to
    /// the newest snapshot in `--data-dir`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let channels = loader::resolve_snapshot(
            settings.channels.as_deref(),
            &settings.data_dir,
            CHANNELS_PREFIX,
        )?;
        let videos = loader::resolve_snapshot(
            settings.videos.as_deref(),
            &settings.data_dir,
            VIDEOS_PREFIX,
        )?;
        debug!(
            "Using snapshots {} and {}",
            channels.display(),
            videos.display()
        );
        Ok(Self::new(channels, videos))
    }

    pub fn channels_path(&self) -> &Path {
        &self.channels_path
    }

    pub fn videos_path(&self) -> &Path {
        &self.videos_path
    }

    /// The channels table, loading it on first call.
    pub fn channels(&self) -> Result<Arc<ChannelTable>> {
        self.memoized(&self.channels, || loader::load_channels(&self.channels_path))
    }

    /// The videos table, loading it on first call.
    pub fn videos(&self) -> Result<Arc<VideoTable>> {
        self.memoized(&self.videos, || loader::load_videos(&self.videos_path))
    }

    /// `true` once both tables are resident.
    pub fn is_loaded(&self) -> bool {
        self.channels.get().is_some() && self.videos.get().is_some()
    }

    // ── Private ───────────────────────────────────────────────────────────

    fn memoized<T>(
        &self,
        cell: &OnceLock<Arc<T>>,
        load: impl FnOnce() -> Result<T>,
    ) -> Result<Arc<T>> {
        if let Some(table) = cell.get() {
            debug!("table cache hit");
            return Ok(Arc::clone(table));
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished loading while we waited.
        if let Some(table) = cell.get() {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load()?);
        let _ = cell.set(Arc::clone(&table));
        Ok(table)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
