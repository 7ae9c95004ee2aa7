//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/livemark/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Documents longer than this many chars are styled on the scan worker first
pub const DEFAULT_FULL_SCAN_THRESHOLD: usize = 64 * 1024;

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Selected theme id (e.g., "default-dark", "default-light")
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Char length above which the initial full scan runs in the background
    #[serde(default = "default_full_scan_threshold")]
    pub full_scan_threshold: usize,
}

fn default_theme() -> String {
    "default-dark".to_string()
}

fn default_full_scan_threshold() -> usize {
    DEFAULT_FULL_SCAN_THRESHOLD
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            full_scan_threshold: default_full_scan_threshold(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Whether a document of `len` chars should get its first styling pass
    /// from the background worker
    pub fn prefers_background_scan(&self, len: usize) -> bool {
        len > self.full_scan_threshold
    }
}
