//! Asset manifest.
//!
//! Groups asset requests by scene so the list of files lives next to the
//! assets rather than in code:
//!
//! ```json
//! {
//!   "boot": [
//!     { "key": "splashBackground", "path": "images/breakout-splash-background.png", "type": "texture" }
//!   ]
//! }
//! ```
//!
//! The `type` is kept as a string so an unknown kind reaches the loader and is
//! reported there instead of failing the whole manifest.

use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::assets::AssetError;

/// One asset request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: String,
    pub path: String,
    #[serde(rename = "type", default = "default_asset_type")]
    pub asset_type: String,
}

fn default_asset_type() -> String {
    "texture".to_string()
}

impl ManifestEntry {
    pub fn new(key: impl Into<String>, path: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            asset_type: asset_type.into(),
        }
    }

    pub fn texture(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(key, path, "texture")
    }
}

/// Asset requests grouped by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    groups: FxHashMap<String, Vec<ManifestEntry>>,
}

impl AssetManifest {
    /// Manifest used when no manifest file is available: the three textures
    /// the boot scene needs for the loading screen.
    pub fn builtin() -> Self {
        let mut manifest = Self::default();
        manifest.insert_group(
            "boot",
            vec![
                ManifestEntry::texture(
                    "splashBackground",
                    "images/breakout-splash-background.png",
                ),
                ManifestEntry::texture(
                    "loadingBarBackground",
                    "images/breakout-loading-bar-background.png",
                ),
                ManifestEntry::texture("loadingBarFill", "images/breakout-loading-bar-fill.png"),
            ],
        );
        manifest
    }

    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        serde_json::from_str(json).map_err(|e| AssetError::Manifest(e.to_string()))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| AssetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let manifest = Self::from_json(&json)?;
        info!(
            "Loaded asset manifest {} ({} groups)",
            path.display(),
            manifest.groups.len()
        );
        Ok(manifest)
    }

    /// Entries of `name`, empty when the group does not exist.
    pub fn group(&self, name: &str) -> &[ManifestEntry] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn insert_group(&mut self, name: impl Into<String>, entries: Vec<ManifestEntry>) {
        self.groups.insert(name.into(), entries);
    }
}
