//! Byte fetching.
//!
//! The loader only needs "give me the bytes at this path, or tell me why
//! not". [`AssetFetcher`] is that capability; [`FileFetcher`] serves it from
//! a directory on disk. Fetchers run on worker threads, hence `Send + Sync`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::assets::AssetError;

/// Retrieves the raw bytes of an asset.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from the filesystem, relative to `root`.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute-or-root-relative location of `path`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches("./");
        let candidate = Path::new(relative);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }
}

impl AssetFetcher for FileFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.resolve(path);
        std::fs::read(&full).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AssetError::NotFound {
                path: full.display().to_string(),
            },
            _ => AssetError::Io {
                path: full.display().to_string(),
                source: e,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bin"), [1u8, 2, 3]).unwrap();
        let fetcher = FileFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("./a.bin").unwrap(), vec![1, 2, 3]);
        assert_eq!(fetcher.fetch("a.bin").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileFetcher::new(dir.path());
        assert!(matches!(
            fetcher.fetch("missing.png"),
            Err(AssetError::NotFound { .. })
        ));
    }
}
