//! Game configuration.
//!
//! Manages settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1024
//! height = 768
//! target_fps = 30
//! title = Breakout
//!
//! [assets]
//! root = ./assets
//! max_concurrent_requests = 1
//! simulated_latency_ms = 75
//! manifest = manifest.json
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::assets::LoaderSettings;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 768;
const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_TITLE: &str = "Breakout";
const DEFAULT_ASSETS_ROOT: &str = "./assets";
const DEFAULT_MAX_CONCURRENT_REQUESTS: u32 = 1;
const DEFAULT_SIMULATED_LATENCY_MS: u32 = 75;
const DEFAULT_MANIFEST_FILE: &str = "manifest.json";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration.
///
/// Stores the canvas/window settings and the asset loader knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Canvas width in pixels.
    pub window_width: u32,
    /// Canvas height in pixels.
    pub window_height: u32,
    /// Frames per second the time manager aims for.
    pub target_fps: u32,
    /// Window title.
    pub title: String,
    /// Directory asset paths are resolved against.
    pub assets_root: PathBuf,
    /// Upper bound on asset requests in flight.
    pub max_concurrent_requests: u32,
    /// Artificial delay between an asset finishing and its slot being released.
    pub simulated_latency_ms: u32,
    /// Manifest file name, relative to `assets_root`.
    pub manifest_file: String,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            title: DEFAULT_TITLE.to_string(),
            assets_root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            simulated_latency_ms: DEFAULT_SIMULATED_LATENCY_MS,
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            // Zero would make the frame interval infinite.
            self.target_fps = (fps as u32).max(1);
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            self.assets_root = PathBuf::from(root);
        }
        if let Some(max) = config
            .getuint("assets", "max_concurrent_requests")
            .ok()
            .flatten()
        {
            self.max_concurrent_requests = (max as u32).max(1);
        }
        if let Some(ms) = config
            .getuint("assets", "simulated_latency_ms")
            .ok()
            .flatten()
        {
            self.simulated_latency_ms = ms as u32;
        }
        if let Some(manifest) = config.get("assets", "manifest") {
            self.manifest_file = manifest;
        }

        info!(
            "Loaded config: {}x{} canvas, fps={}, assets={:?}, max_requests={}, latency={}ms",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.assets_root,
            self.max_concurrent_requests,
            self.simulated_latency_ms
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "title", Some(self.title.clone()));

        // [assets] section
        config.set(
            "assets",
            "root",
            Some(self.assets_root.display().to_string()),
        );
        config.set(
            "assets",
            "max_concurrent_requests",
            Some(self.max_concurrent_requests.to_string()),
        );
        config.set(
            "assets",
            "simulated_latency_ms",
            Some(self.simulated_latency_ms.to_string()),
        );
        config.set("assets", "manifest", Some(self.manifest_file.clone()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the canvas size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Full path of the asset manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.assets_root.join(&self.manifest_file)
    }

    /// Asset loader knobs derived from the `[assets]` section.
    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings {
            max_concurrent_requests: self.max_concurrent_requests as usize,
            simulated_latency: self.simulated_latency_ms as f32 / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.window_size(), (1024, 768));
        assert_eq!(config.target_fps, 30);
        let settings = config.loader_settings();
        assert_eq!(settings.max_concurrent_requests, 1);
        assert!((settings.simulated_latency - 0.075).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GameConfig::with_path(dir.path().join("nope.ini"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.window_width, 1024);
    }

    #[test]
    fn test_partial_file_overrides_only_present_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[window]\nwidth = 640\n\n[assets]\nmax_concurrent_requests = 3\n")
            .unwrap();
        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.window_width, 640);
        assert_eq!(config.window_height, 768);
        assert_eq!(config.max_concurrent_requests, 3);
        assert_eq!(config.manifest_file, "manifest.json");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut saved = GameConfig::with_path(&path);
        saved.window_width = 800;
        saved.simulated_latency_ms = 0;
        saved.title = "Bricks".to_string();
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, saved);
    }
}
