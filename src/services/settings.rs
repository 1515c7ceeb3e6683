//! Store settings service
//!
//! Loads, saves and resets the JSON settings file

use crate::models::StoreSettings;
use crate::utils::error::AppError;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings manager
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
        }
    }

    /// Manager for `<config_dir>/blogmeta/settings.json`
    pub fn with_default_path() -> Self {
        Self::new(default_settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings, falling back to defaults when the file is absent
    pub fn load(&self) -> Result<StoreSettings, AppError> {
        if !self.settings_path.exists() {
            tracing::info!("settings file {:?} not found, using defaults", self.settings_path);
            return Ok(StoreSettings::default());
        }

        let content = fs::read_to_string(&self.settings_path)
            .map_err(|e| AppError::Config(format!("cannot read settings file: {}", e)))?;

        let settings: StoreSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("malformed settings file: {}", e)))?;

        tracing::info!("loaded settings from {:?}", self.settings_path);
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, settings: &StoreSettings) -> Result<(), AppError> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("cannot create settings directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Config(format!("cannot serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content)
            .map_err(|e| AppError::Config(format!("cannot write settings file: {}", e)))?;

        tracing::info!("saved settings to {:?}", self.settings_path);
        Ok(())
    }

    /// Reset to defaults
    pub fn reset(&self) -> Result<StoreSettings, AppError> {
        let default_settings = StoreSettings::default();
        self.save(&default_settings)?;
        Ok(default_settings)
    }
}

/// Default settings file path
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blogmeta")
        .join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_META_FILE;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let manager = SettingsManager::new(tmp.path().join("settings.json"));

        let settings = manager.load().unwrap();
        assert_eq!(settings.scan.meta_file_name, DEFAULT_META_FILE);
        assert!(settings.scan.skip_hidden);
        assert_eq!(settings.posts_dir, PathBuf::from("./posts"));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let manager = SettingsManager::new(tmp.path().join("config").join("settings.json"));

        let mut settings = StoreSettings::default();
        settings.database_path = tmp.path().join("blog.sqlite3");
        settings.posts_dir = tmp.path().join("posts");
        manager.save(&settings).unwrap();

        assert_eq!(manager.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "postsDir": "/srv/blog/posts" }"#).unwrap();

        let settings = SettingsManager::new(&path).load().unwrap();
        assert_eq!(settings.posts_dir, PathBuf::from("/srv/blog/posts"));
        assert_eq!(settings.scan.meta_file_name, DEFAULT_META_FILE);
    }

    #[test]
    fn test_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SettingsManager::new(&path).load().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_reset() {
        let tmp = TempDir::new().unwrap();
        let manager = SettingsManager::new(tmp.path().join("settings.json"));

        let reset = manager.reset().unwrap();
        assert_eq!(manager.load().unwrap(), reset);
    }
}
