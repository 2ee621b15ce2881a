use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_HEIGHT;
use crate::input::placeholder_for;
use crate::persist::DEFAULT_OUTPUT_FILE;
use crate::rtt_window::DEFAULT_CHART_WIDTH;

const CONFIG_DIR_NAME: &str = "PingBars";
const CONFIG_FILE_NAME: &str = "config.json";

pub const MAX_HISTORY_HEIGHT: usize = 100;
pub const MAX_CHART_WIDTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host pinged most recently; offered as a hint in the input.
    pub last_target: Option<String>,
    pub output_file: PathBuf,
    pub log_file: PathBuf,
    pub history_height: usize,
    pub chart_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_target: None,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            log_file: PathBuf::from("debug.log"),
            history_height: DEFAULT_HISTORY_HEIGHT,
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }
}

impl AppConfig {
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join(CONFIG_DIR_NAME);

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// A missing file is not an error; it yields the defaults. Out-of-range
    /// sizes are clamped.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config.clamped())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn placeholder(&self) -> String {
        placeholder_for(self.last_target.as_deref())
    }

    /// Pull sizes back into the range the screen can lay out.
    fn clamped(mut self) -> Self {
        self.history_height = self.history_height.clamp(1, MAX_HISTORY_HEIGHT);
        self.chart_width = self.chart_width.clamp(1, MAX_CHART_WIDTH);
        self
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history_height, 5);
        assert_eq!(config.chart_width, 25);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "last_target": "google.ca", "history_height": 8 }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.last_target.as_deref(), Some("google.ca"));
        assert_eq!(config.history_height, 8);
        assert_eq!(config.output_file, PathBuf::from("output.log"));
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            last_target: Some("example.com".into()),
            chart_width: 40,
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn garbage_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn out_of_range_sizes_are_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            format!(r#"{{ "history_height": {}, "chart_width": 0 }}"#, usize::MAX),
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.history_height, MAX_HISTORY_HEIGHT);
        assert_eq!(config.chart_width, 1);

        fs::write(&path, r#"{ "history_height": 0, "chart_width": 65536 }"#).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.history_height, 1);
        assert_eq!(config.chart_width, MAX_CHART_WIDTH);
    }

    #[test]
    fn placeholder_mentions_last_target() {
        let mut config = AppConfig::default();
        assert_eq!(config.placeholder(), "Enter a URL to ping...");
        config.last_target = Some("google.ca".into());
        assert!(config.placeholder().ends_with("(last: google.ca)"));
    }
}
