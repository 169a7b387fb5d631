use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{GalleryError, Result};

/// Listing host used when no configuration overrides it
pub const DEFAULT_BASE_URL: &str = "https://picsum.photos";

/// Image shown in every cell in place of the record's own URL
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://picsum.photos/200/300";

/// How a sentinel intersection interacts with a fetch already in flight
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Every qualifying intersection advances the cursor and dispatches a
    /// fetch, even while a previous one is still in flight
    #[default]
    Unguarded,
    /// Intersections are ignored while the loading flag is set
    GateOnLoading,
}

/// User-tunable gallery settings
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/infinite-scroll/config.json
/// - macOS: ~/Library/Application Support/infinite-scroll/config.json
/// - Windows: %APPDATA%\infinite-scroll\config.json
///
/// Every field is optional in the file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// Base URL of the listing service (without the `/v2/list` path)
    pub base_url: String,
    /// Items requested per fetch
    pub page_size: u32,
    /// Constant image rendered by every cell
    pub placeholder_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Fraction of the sentinel that must be visible to count as intersecting
    pub threshold: f32,
    /// Whether fetch dispatch is gated on the loading flag
    pub dispatch: DispatchPolicy,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 2,
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            request_timeout_ms: 10_000,
            threshold: 1.0,
            dispatch: DispatchPolicy::Unguarded,
        }
    }
}

impl GalleryConfig {
    /// Load the configuration from the user's config directory.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file is
    /// logged and also yields the defaults; the gallery never refuses to start
    /// over its configuration.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring config file");
                Self::default()
            }
        }
    }

    /// Read and parse a config file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GalleryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Parse from a JSON string, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GalleryError::Config(e.to_string()))?;
        Ok(config.normalized())
    }

    /// Get the path where the config file is expected
    fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("infinite-scroll");
        path.push("config.json");
        Some(path)
    }

    fn normalized(mut self) -> Self {
        // A zero limit would request empty pages forever
        self.page_size = self.page_size.max(1);
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            self.threshold = 1.0;
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self
    }
}
