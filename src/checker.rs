//! Update orchestration
//!
//! Discovers compose manifests, extracts their image references, fetches the
//! tags of every distinct image once and selects the latest acceptable tag for
//! each reference.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_FILE_PATTERNS};
use crate::discovery::{DiscoveryError, ManifestDiscovery};
use crate::parser::ComposeParser;
use crate::version::policy::UpdatePolicy;
use crate::version::registry::Registry;
use crate::version::selector::select_latest;
use crate::version::semver::{ParseMode, TagVersion, parse_tag};

/// Errors that abort a whole check run
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Result for one image reference in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    pub file_path: PathBuf,
    /// 1-based line of the `image:` entry
    pub line: usize,
    pub raw_line: String,
    pub full_image_name: String,
    pub image_name: String,
    pub current_tag: String,
    /// Newer tag allowed by the policy, None when there is no update
    pub latest_tag: Option<String>,
}

impl UpdateInfo {
    pub fn has_update(&self) -> bool {
        self.latest_tag.is_some()
    }
}

/// Checks compose manifests for image updates
pub struct UpdateChecker {
    registry: Arc<dyn Registry>,
    policy: UpdatePolicy,
    concurrency: usize,
    discovery: Option<ManifestDiscovery>,
    parser: ComposeParser,
}

impl UpdateChecker {
    pub fn new(registry: Arc<dyn Registry>, policy: UpdatePolicy) -> Self {
        Self {
            registry,
            policy,
            concurrency: DEFAULT_CONCURRENCY,
            discovery: None,
            parser: ComposeParser::new(),
        }
    }

    /// Sets the maximum number of tag fetches in flight
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Replaces the default manifest file-name matching
    pub fn with_discovery(mut self, discovery: ManifestDiscovery) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Checks every manifest at or below `path`
    pub async fn check_path(&self, path: &Path) -> Result<Vec<UpdateInfo>, CheckError> {
        self.check_paths(&[path.to_path_buf()]).await
    }

    /// Checks every manifest at or below each of `paths`.
    /// Each image is fetched once even when it appears under several paths.
    pub async fn check_paths(&self, paths: &[PathBuf]) -> Result<Vec<UpdateInfo>, CheckError> {
        let default_discovery;
        let discovery = match &self.discovery {
            Some(discovery) => discovery,
            None => {
                default_discovery = ManifestDiscovery::new(&DEFAULT_FILE_PATTERNS[..])?;
                &default_discovery
            }
        };

        let mut files = Vec::new();
        for path in paths {
            let found = discovery.discover(path)?;
            info!("Found {} manifest(s) under {}", found.len(), path.display());
            for file in found {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }

        self.check_files(&files).await
    }

    /// Checks the given manifest files.
    ///
    /// Results follow the order of `files` and, within a file, line order.
    /// Images whose tags cannot be fetched are reported without an update.
    pub async fn check_files(&self, files: &[PathBuf]) -> Result<Vec<UpdateInfo>, CheckError> {
        let mut entries: Vec<(UpdateInfo, TagVersion)> = Vec::new();

        for file in files {
            let content =
                tokio::fs::read_to_string(file)
                    .await
                    .map_err(|source| CheckError::Io {
                        path: file.clone(),
                        source,
                    })?;

            for reference in self.parser.parse(&content) {
                let current = match parse_tag(&reference.tag, ParseMode::Lenient) {
                    Ok(version) => version,
                    Err(e) => {
                        warn!(
                            "Skipping {} (invalid semver) at {}:{}: {}",
                            reference.full_image_name,
                            file.display(),
                            reference.line,
                            e
                        );
                        continue;
                    }
                };

                entries.push((
                    UpdateInfo {
                        file_path: file.clone(),
                        line: reference.line,
                        raw_line: reference.raw_line,
                        full_image_name: reference.full_image_name,
                        image_name: reference.image_name,
                        current_tag: reference.tag,
                        latest_tag: None,
                    },
                    current,
                ));
            }
        }

        let image_names: IndexSet<String> = entries
            .iter()
            .map(|(info, _)| info.image_name.clone())
            .collect();
        let tags = self.fetch_all_tags(image_names).await;

        let results = entries
            .into_iter()
            .map(|(mut info, current)| {
                info.latest_tag = tags
                    .get(info.image_name.as_str())
                    .and_then(|tags| select_latest(&current, tags, self.policy));
                if let Some(latest) = &info.latest_tag {
                    debug!("{}: {} -> {}", info.image_name, info.current_tag, latest);
                }
                info
            })
            .collect();

        Ok(results)
    }

    /// Fetches tags for each image, at most `concurrency` at a time.
    /// Images that fail are logged and left out of the returned map.
    async fn fetch_all_tags(&self, image_names: IndexSet<String>) -> HashMap<String, Vec<String>> {
        let registry = self.registry.as_ref();

        stream::iter(image_names)
            .map(|image_name| async move {
                let result = registry.fetch_tags(&image_name).await;
                (image_name, result)
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|(image_name, result)| async move {
                match result {
                    Ok(image_tags) => {
                        debug!(
                            "Fetched {} tags for {} from {}",
                            image_tags.len(),
                            image_name,
                            registry.name()
                        );
                        Some((image_name, image_tags.tags))
                    }
                    Err(e) => {
                        error!("Failed to fetch tags for {}: {}", image_name, e);
                        debug!("{} fetch error for {}: {:?}", registry.name(), image_name, e);
                        None
                    }
                }
            })
            .collect()
            .await
    }
}
