//! Manifest file discovery
//!
//! A file path is used as-is. A directory is walked recursively and every file
//! whose name matches one of the configured glob patterns is returned, in
//! file-name order.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Finds compose manifests below a path
#[derive(Debug, Clone)]
pub struct ManifestDiscovery {
    patterns: GlobSet,
}

impl ManifestDiscovery {
    /// Creates a discovery matching file names against `patterns`
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, DiscoveryError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|source| DiscoveryError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }

        let patterns = builder.build().map_err(|source| DiscoveryError::Pattern {
            pattern: "<set>".to_string(),
            source,
        })?;

        Ok(Self { patterns })
    }

    /// Checks if a file name is a compose manifest name
    pub fn is_manifest(&self, file_name: &Path) -> bool {
        self.patterns.is_match(file_name)
    }

    /// Returns the manifest files at or below `root`
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        if !root.exists() {
            return Err(DiscoveryError::NotFound(root.to_path_buf()));
        }

        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() && self.is_manifest(Path::new(entry.file_name())) {
                debug!("Found manifest {:?}", entry.path());
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}
