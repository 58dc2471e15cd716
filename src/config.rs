use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::session::DisplayCount;
use crate::backend::window::{FIRST_COMIC, LAST_COMIC};
use crate::error::PagerError;

pub const API_ENV_VAR: &str = "XKCD_PAGER_API";
const DEFAULT_API_BASE: &str = "https://xkcd.vercel.app";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub reveal_delay_ms: u64,
    pub initial_comic: i64,
    pub display_count: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            reveal_delay_ms: 1500,
            initial_comic: 2,
            display_count: 3,
            request_timeout_secs: 15,
            user_agent: concat!("xkcd-pager/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("xkcd-pager")
        .join("config.json")
}

impl Config {
    /// Reads the user's config file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        let path = get_config_path();
        let mut config = Self::load_from(&path).unwrap_or_else(|e| {
            warn!("ignoring config at {}: {}", path.display(), e);
            Self::default()
        });

        if let Ok(api_base) = std::env::var(API_ENV_VAR) {
            if !api_base.is_empty() {
                config.api_base = api_base;
            }
        }

        config.sanitized()
    }

    pub fn load_from(path: &Path) -> Result<Self, PagerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(FIRST_COMIC..=LAST_COMIC).contains(&self.initial_comic) {
            warn!(
                "initial_comic {} is outside {}..={}, using {}",
                self.initial_comic, FIRST_COMIC, LAST_COMIC, defaults.initial_comic
            );
            self.initial_comic = defaults.initial_comic;
        }
        if DisplayCount::from_value(self.display_count).is_none() {
            warn!(
                "display_count {} is not supported, using {}",
                self.display_count, defaults.display_count
            );
            self.display_count = defaults.display_count;
        }
        self
    }

    pub fn display_count(&self) -> DisplayCount {
        DisplayCount::from_value(self.display_count).unwrap_or_default()
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reveal_delay(), Duration::from_millis(1500));
        assert_eq!(config.display_count(), DisplayCount::Three);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "display_count": 5, "reveal_delay_ms": 250 }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.display_count(), DisplayCount::Five);
        assert_eq!(config.reveal_delay(), Duration::from_millis(250));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.initial_comic, 2);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load_from(&path), Err(PagerError::Config(_))));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let config = Config {
            initial_comic: 9000,
            display_count: 4,
            ..Config::default()
        }
        .sanitized();

        assert_eq!(config.initial_comic, 2);
        assert_eq!(config.display_count, 3);
    }
}
