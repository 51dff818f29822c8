/// Application configuration: load, save, sanitize.
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use room_planner_mod_history::{Autosave, HistoryConfig};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ROOM_PLANNER_DATA_DIR";

/// Shortest allowed autosave interval.
const MIN_AUTOSAVE_INTERVAL_SECS: u64 = 5;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub history: HistoryConfig,
    /// Whether to checkpoint the current layout periodically.
    pub autosave_enabled: bool,
    /// Interval in seconds between autosaves (minimum 5).
    pub autosave_interval_secs: u64,
    /// Directory for saved layouts. Empty = platform default.
    pub data_dir: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            autosave_enabled: true,
            autosave_interval_secs: 30,
            data_dir: String::new(),
        }
    }
}

impl PlannerConfig {
    /// Returns the config file path: exe directory + `room-planner.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("room-planner.json")))
            .unwrap_or_else(|| PathBuf::from("room-planner.json"))
    }

    /// Loads config from `path`, writing a default file first if none exists.
    ///
    /// An unreadable or invalid file is left in place and defaults are used.
    pub fn load_or_create(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            return config;
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Reads and sanitizes the config stored at `path`.
    pub fn load(path: &Path) -> Result<Self, std::io::Error> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self =
            serde_json::from_str(&contents).map_err(std::io::Error::other)?;
        config.sanitize();
        Ok(config)
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.autosave_interval_secs = self.autosave_interval_secs.max(MIN_AUTOSAVE_INTERVAL_SECS);
        // Persist the effective bound rather than the raw value.
        if self.history.max_depth == 1 {
            self.history.max_depth = 2;
        }
    }

    /// Builds the autosave scheduler described by this config.
    pub fn autosave(&self, now: Instant) -> Autosave {
        if self.autosave_enabled {
            Autosave::new(Duration::from_secs(self.autosave_interval_secs), now)
        } else {
            Autosave::disabled(now)
        }
    }

    /// Resolves the directory layouts are saved in.
    ///
    /// Resolution order:
    /// 1. `ROOM_PLANNER_DATA_DIR` environment variable
    /// 2. `data_dir` from the config (if non-empty)
    /// 3. Platform data directory + `room-planner`
    /// 4. `.data/` in the working directory
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        if !self.data_dir.is_empty() {
            return PathBuf::from(&self.data_dir);
        }
        dirs::data_dir()
            .map(|d| d.join("room-planner"))
            .unwrap_or_else(|| PathBuf::from(".data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_planner_mod_history::DedupPolicy;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert!(config.autosave_enabled);
        assert_eq!(config.autosave_interval_secs, 30);
        assert_eq!(config.history.dedup, DedupPolicy::SkipUnchanged);
        assert!(config.data_dir.is_empty());
    }

    #[test]
    fn test_sanitize_clamps_interval() {
        let mut config = PlannerConfig {
            autosave_interval_secs: 1,
            ..Default::default()
        };
        config.sanitize();
        assert_eq!(config.autosave_interval_secs, 5);
    }

    #[test]
    fn test_sanitize_raises_depth_one() {
        let mut config = PlannerConfig::default();
        config.history.max_depth = 1;
        config.sanitize();
        assert_eq!(config.history.max_depth, 2);

        config.history.max_depth = 0;
        config.sanitize();
        assert_eq!(config.history.max_depth, 0);
    }

    #[test]
    fn test_load_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("room-planner.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(PlannerConfig::load(&path).is_err());
        assert!(PlannerConfig::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_autosave_follows_config() {
        let now = Instant::now();
        let config = PlannerConfig::default();
        let autosave = config.autosave(now);
        assert!(autosave.is_enabled());
        assert_eq!(autosave.interval(), Duration::from_secs(30));

        let disabled = PlannerConfig {
            autosave_enabled: false,
            ..Default::default()
        };
        assert!(!disabled.autosave(now).is_enabled());
    }

    #[test]
    fn test_resolve_data_dir() {
        // Save and restore env var
        let original = std::env::var(DATA_DIR_ENV).ok();

        std::env::set_var(DATA_DIR_ENV, "/custom/path");
        let config = PlannerConfig {
            data_dir: "/from/config".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/custom/path"));

        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/from/config"));

        let unset = PlannerConfig::default().resolve_data_dir();
        assert!(unset.ends_with("room-planner") || unset == Path::new(".data"));

        match original {
            Some(val) => std::env::set_var(DATA_DIR_ENV, val),
            None => std::env::remove_var(DATA_DIR_ENV),
        }
    }
}
