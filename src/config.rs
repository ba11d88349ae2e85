//! Roadmap configuration.
//!
//! Loaded from `<home>/config.toml`, where `<home>` is `$ROADMAP_HOME` or
//! `~/.roadmap`. Every key is optional; a missing file means defaults.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::roadmap::{DefaultHorizon, TimelineOrder};

/// Environment variable that relocates the roadmap home directory.
pub const HOME_ENV: &str = "ROADMAP_HOME";

const DEFAULT_WIDTH: usize = 60;

/// Roadmap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Where goals without a deadline end on the timeline.
    pub default_horizon: DefaultHorizon,

    /// Default ordering for `roadmap timeline`.
    pub order: TimelineOrder,

    /// Bar width, in columns, for `roadmap timeline`.
    pub width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_horizon: DefaultHorizon::default(),
            order: TimelineOrder::default(),
            width: DEFAULT_WIDTH,
        }
    }
}

impl Config {
    /// Load config from `<home>/config.toml`.
    /// Returns defaults if the file is missing, an error if it is invalid.
    pub fn load(home: &Path) -> Result<Self, String> {
        let path = Self::path(home);

        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;
        if config.width == 0 {
            return Err("width must be at least 1".to_string());
        }
        Ok(config)
    }

    /// The config file path inside the roadmap home.
    pub fn path(home: &Path) -> PathBuf {
        home.join("config.toml")
    }

    /// The roadmap home: `$ROADMAP_HOME` if set, otherwise `~/.roadmap`.
    pub fn home() -> Option<PathBuf> {
        Self::home_from(env::var_os(HOME_ENV))
    }

    /// An empty override counts as unset.
    fn home_from(override_dir: Option<OsString>) -> Option<PathBuf> {
        if let Some(dir) = override_dir
            && !dir.is_empty()
        {
            return Some(PathBuf::from(dir));
        }
        crate::storage::Storage::default_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn parses_kebab_case_keys() {
        let config = Config::parse(
            "default-horizon = \"now\"\n\
             order = \"start\"\n\
             width = 40\n",
        )
        .unwrap();

        assert_eq!(config.default_horizon, DefaultHorizon::Now);
        assert_eq!(config.order, TimelineOrder::Start);
        assert_eq!(config.width, 40);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::parse("order = \"start\"").unwrap();
        assert_eq!(config.default_horizon, DefaultHorizon::Estimate);
        assert_eq!(config.width, DEFAULT_WIDTH);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_width() {
        assert!(Config::parse("colour = \"blue\"").is_err());
        assert!(Config::parse("width = 0").is_err());
    }

    #[test]
    fn home_override_wins_unless_empty() {
        assert_eq!(
            Config::home_from(Some(OsString::from("/tmp/roadmap-home"))),
            Some(PathBuf::from("/tmp/roadmap-home"))
        );
        assert_eq!(
            Config::home_from(Some(OsString::new())),
            crate::storage::Storage::default_root()
        );
        assert_eq!(Config::home_from(None), crate::storage::Storage::default_root());
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        fs::write(Config::path(dir.path()), "order = 7").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.contains("config.toml"));
    }
}
