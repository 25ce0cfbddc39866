//! Application configuration.
//!
//! The city → data file table lives here rather than in a global so that
//! tests and alternative deployments can point the loader at any files.
//! Settings are stored as pretty-printed JSON; a missing file means defaults.

use crate::error::{BikeshareError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`AppConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the city CSV files
    pub data_dir: PathBuf,
    /// Lower-case city name → file name inside `data_dir`
    pub cities: BTreeMap<String, String>,
    /// Also write rolling log files next to the console output
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let cities = [
            ("chicago", "chicago.csv"),
            ("new york city", "new_york_city.csv"),
            ("washington", "washington.csv"),
        ]
        .into_iter()
        .map(|(city, file)| (city.to_owned(), file.to_owned()))
        .collect();

        Self {
            data_dir: PathBuf::from("data"),
            cities,
            log_to_file: true,
        }
    }
}

impl AppConfig {
    pub fn city_names(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    /// Configured spelling of `input`, matched case-insensitively.
    pub fn canonical_city(&self, input: &str) -> Option<&str> {
        let wanted = input.trim().to_lowercase();
        self.city_names().find(|name| name.to_lowercase() == wanted)
    }

    /// # Errors
    ///
    /// [`BikeshareError::Config`] when `city` is not configured.
    pub fn city_path(&self, city: &str) -> Result<PathBuf> {
        let name = self.canonical_city(city).ok_or_else(|| {
            BikeshareError::Config(format!(
                "unknown city '{city}' (configured: {})",
                self.city_names().collect::<Vec<_>>().join(", ")
            ))
        })?;
        let file = self.cities.get(name).ok_or_else(|| {
            BikeshareError::Config(format!("no data file configured for '{name}'"))
        })?;
        Ok(self.data_dir.join(file))
    }
}

/// # Errors
///
/// [`BikeshareError::Config`] when the platform has no configuration directory.
pub fn get_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        BikeshareError::Config("could not determine the user configuration directory".to_owned())
    })?;
    Ok(base.join("bikeshare").join("config.json"))
}

/// Loads the config at `path`, falling back to defaults when the file does not exist.
///
/// # Errors
///
/// [`BikeshareError::Io`] when the file exists but cannot be read and
/// [`BikeshareError::Config`] when it is not valid JSON.
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

/// # Errors
///
/// Returns an error when the parent directory or the file cannot be written.
pub fn save_app_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cities() {
        let config = AppConfig::default();
        let names: Vec<&str> = config.city_names().collect();
        assert_eq!(names, vec!["chicago", "new york city", "washington"]);
        assert_eq!(
            config.city_path("Washington").unwrap(),
            PathBuf::from("data").join("washington.csv")
        );
    }

    #[test]
    fn test_unknown_city() {
        let err = AppConfig::default().city_path("boston").unwrap_err();
        assert!(matches!(err, BikeshareError::Config(_)));
        assert!(err.to_string().contains("boston"));
    }

    #[test]
    fn test_canonical_city_ignores_case_and_padding() {
        let config = AppConfig::default();
        assert_eq!(config.canonical_city("  New York City \n"), Some("new york city"));
        assert_eq!(config.canonical_city("new york"), None);
    }

    #[test]
    fn test_round_trip_through_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.data_dir = PathBuf::from("/srv/bikeshare");
        config.log_to_file = false;
        save_app_config(&config, &path)?;

        assert_eq!(load_app_config(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = load_app_config(&dir.path().join("absent.json"))?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "data_dir": "/tmp/trips" }"#)?;

        let config = load_app_config(&path)?;
        assert_eq!(config.data_dir, PathBuf::from("/tmp/trips"));
        assert_eq!(config.cities.len(), 3);
        assert!(config.log_to_file);
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json")?;

        let err = load_app_config(&path).unwrap_err();
        assert!(matches!(err, BikeshareError::Config(_)));
        Ok(())
    }
}
