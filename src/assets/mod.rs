//! Asset loading.
//!
//! - [`fetch`] – the byte-fetching capability and its filesystem implementation
//! - [`loader`] – throttled, queue-backed [`AssetLoader`] feeding the texture store
//! - [`manifest`] – JSON manifest grouping asset requests per scene
//!
//! Every failure here is reported through `log` and turned into forward
//! progress: a failed asset consumes its slot but leaves its key empty.

pub mod fetch;
pub mod loader;
pub mod manifest;

pub use fetch::{AssetFetcher, FileFetcher};
pub use loader::{AssetLoader, LoaderSettings};
pub use manifest::{AssetManifest, ManifestEntry};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kinds of asset the loader understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetType {
    Texture,
}

impl AssetType {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Texture => "texture",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "texture" => Ok(AssetType::Texture),
            _ => Err(AssetError::UnsupportedType(s.to_string())),
        }
    }
}

/// Errors produced while requesting, fetching or decoding assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Unsupported asset type: {0}")]
    UnsupportedType(String),
    #[error("Asset not found: {path}")]
    NotFound { path: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Invalid asset manifest: {0}")]
    Manifest(String),
    #[error("Failed to start fetch for {path}: {reason}")]
    Spawn { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_parses_case_insensitively() {
        assert_eq!("texture".parse::<AssetType>().unwrap(), AssetType::Texture);
        assert_eq!(" TEXTURE ".parse::<AssetType>().unwrap(), AssetType::Texture);
    }

    #[test]
    fn test_unknown_asset_type_is_reported() {
        match "sound".parse::<AssetType>() {
            Err(AssetError::UnsupportedType(name)) => assert_eq!(name, "sound"),
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
    }
}
