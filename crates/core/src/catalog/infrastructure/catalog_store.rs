use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::domain::catalog_cache::CatalogCache;

#[derive(Error, Debug)]
pub enum CatalogStoreError {
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode catalog: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write catalog to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persists a [`CatalogCache`] as JSON between runs.
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `catalog.json` in the platform cache directory.
    ///
    /// - macOS: `~/Library/Caches/BrilFit/`
    /// - Linux: `$XDG_CACHE_HOME/BrilFit/` or `~/.cache/BrilFit/`
    /// - Windows: `%LOCALAPPDATA%/BrilFit/`
    pub fn default_location() -> Result<Self, CatalogStoreError> {
        dirs::cache_dir()
            .map(|d| Self::new(d.join("BrilFit").join("catalog.json")))
            .ok_or(CatalogStoreError::NoCacheDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored cache, or `None` when the file is missing or unreadable.
    pub fn load(&self) -> Option<CatalogCache> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(cache) => Some(cache),
            Err(e) => {
                log::warn!("Ignoring unreadable catalog cache {}: {e}", self.path.display());
                None
            }
        }
    }

    pub fn save(&self, cache: &CatalogCache) -> Result<(), CatalogStoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| CatalogStoreError::CacheDir {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_vec_pretty(cache).map_err(CatalogStoreError::Encode)?;

        // Write to a temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("part");
        let write_error = |source| CatalogStoreError::Write {
            path: temp_path.clone(),
            source,
        };
        let mut file = fs::File::create(&temp_path).map_err(write_error)?;
        file.write_all(&json).map_err(write_error)?;
        file.flush().map_err(write_error)?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| CatalogStoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        log::debug!("Saved catalog cache to {}", self.path.display());
        Ok(())
    }
}
