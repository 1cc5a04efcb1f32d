//! Application settings persisted across sessions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::Result;

/// Smallest capture oversampling factor accepted for PDF export.
pub const MIN_RASTER_SCALE: f32 = 2.0;

/// Settings read from `settings.json` in the user config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Directory receiving exported files; the download directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Font used by the preview surface; common system fonts are probed when unset.
    pub preview_font: Option<PathBuf>,
    /// Delay before the print dialog opens, giving the print view time to lay out.
    pub print_settle_delay_ms: u64,
    /// How long a notice stays on screen.
    pub notice_duration_secs: u64,
    /// Capture oversampling factor for PDF export.
    pub raster_scale: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            preview_font: None,
            print_settle_delay_ms: 800,
            notice_duration_secs: 5,
            raster_scale: MIN_RASTER_SCALE,
        }
    }
}

impl AppSettings {
    /// Location of the settings file (`<config dir>/mailsheet/settings.json`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailsheet")
            .join("settings.json")
    }

    /// Loads settings from `path`.
    ///
    /// A missing file yields the defaults; so does an unparsable one, with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        match serde_json::from_str(&contents) {
            Ok(settings) => {
                info!("Settings loaded from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                warn!("Ignoring malformed settings at {:?}: {}", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Loads settings from `path`, first writing the defaults there if no
    /// file exists yet so there is one to edit.
    ///
    /// Failing to write the defaults is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn load_or_create(path: &Path) -> Result<Self> {
        if tokio::fs::try_exists(path).await.unwrap_or(true) {
            return Self::load(path).await;
        }
        let settings = Self::default();
        if let Err(e) = settings.save(path).await {
            warn!("Could not write default settings to {:?}: {}", path, e);
        }
        Ok(settings)
    }

    /// Writes settings to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        info!("Settings saved to {:?}", path);
        Ok(())
    }

    /// Directory receiving exported files.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Print settle delay.
    #[must_use]
    pub const fn print_settle_delay(&self) -> Duration {
        Duration::from_millis(self.print_settle_delay_ms)
    }

    /// Notice display duration.
    #[must_use]
    pub const fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_duration_secs)
    }

    /// Capture oversampling factor, never below [`MIN_RASTER_SCALE`].
    #[must_use]
    pub fn raster_scale(&self) -> f32 {
        if self.raster_scale.is_finite() {
            self.raster_scale.max(MIN_RASTER_SCALE)
        } else {
            MIN_RASTER_SCALE
        }
    }
}
