//! Startup configuration.
//!
//! An optional `lanerush.json` next to the binary overrides the defaults.
//! Every field has a default so a partial file is fine; a missing or invalid
//! file falls back to the defaults entirely. The high-score path lives here
//! and is threaded into `HighScoreStore` at construction; there is no
//! process-wide mutable path.

use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH: &str = "lanerush.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default = "default_highscore_path")]
    pub highscore_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            window_title: default_window_title(),
            assets_dir: default_assets_dir(),
            highscore_path: default_highscore_path(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Missing file is the normal case and stays quiet; a present-but-broken file
/// is worth a warning before falling back.
pub fn load_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return GameConfig::default();
    }
    match load_config(path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("{err}. Using default configuration.");
            GameConfig::default()
        }
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err("Config validation failed: window size must be non-zero".to_string());
    }
    if config.assets_dir.is_empty() {
        return Err("Config validation failed: assets_dir must not be empty".to_string());
    }
    if config.highscore_path.is_empty() {
        return Err("Config validation failed: highscore_path must not be empty".to_string());
    }
    Ok(())
}

fn default_window_width() -> u32 {
    800
}

fn default_window_height() -> u32 {
    600
}

fn default_window_title() -> String {
    "Lane Rush".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_highscore_path() -> String {
    "highscore.txt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "lanerush_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn full_config_parses() {
        let path = temp_file_path("full");
        fs::write(
            &path,
            r#"{
              "window_width": 1024,
              "window_height": 768,
              "window_title": "Test",
              "assets_dir": "art",
              "highscore_path": "scores/best.txt"
            }"#,
        )
        .expect("write temp file");

        let config = load_config(&path).expect("valid config should load");
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.assets_dir, "art");
        assert_eq!(config.highscore_path, "scores/best.txt");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "window_width": 1280 }"#).expect("write temp file");

        let config = load_config(&path).expect("partial config should load");
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.assets_dir, "assets");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let path = temp_file_path("zero");
        fs::write(&path, r#"{ "window_width": 0 }"#).expect("write temp file");

        let err = load_config(&path).expect_err("zero size should fail");
        assert!(err.contains("non-zero"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_or_default_recovers_from_bad_json() {
        let path = temp_file_path("bad");
        fs::write(&path, "{ not json").expect("write temp file");

        assert_eq!(load_or_default(&path), GameConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_or_default_handles_missing_file() {
        let path = temp_file_path("missing");
        assert_eq!(load_or_default(&path), GameConfig::default());
    }
}
