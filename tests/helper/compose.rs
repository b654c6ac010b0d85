//! Compose fixture utilities

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Writes `content` to `relative` under `root`, creating parent directories
pub fn write_manifest(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Creates a temporary project from `(relative path, content)` pairs
#[allow(dead_code)]
pub fn create_project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (relative, content) in files {
        write_manifest(temp_dir.path(), relative, content);
    }
    temp_dir
}
