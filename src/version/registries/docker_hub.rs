//! Docker Hub style tag listing API implementation
//!
//! Pages through `<base>/<namespace>/<image>/tags?page_size=100`, following the
//! `next` URL of each response until it is empty.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_DOCKER_HUB_URL, DOCKER_HUB_PAGE_SIZE};
use crate::version::error::RegistryError;
use crate::version::registries::{http_client, is_official_image};
use crate::version::registry::Registry;
use crate::version::types::ImageTags;

/// One page of the tag listing
#[derive(Debug, Deserialize)]
struct TagsPage {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    results: Vec<TagEntry>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Registry implementation for Docker Hub compatible JSON tag listings
pub struct DockerHubRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl DockerHubRegistry {
    /// Creates a new DockerHubRegistry with a custom base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a DockerHubRegistry pointing at hub.docker.com
    pub fn docker_hub(timeout: Duration) -> Result<Self, RegistryError> {
        Self::new(DEFAULT_DOCKER_HUB_URL, timeout)
    }

    /// First page URL for an image
    fn tags_url(&self, image_name: &str) -> String {
        let namespace = if is_official_image(image_name) {
            "library/"
        } else {
            ""
        };
        format!(
            "{}/{}{}/tags?page_size={}",
            self.base_url, namespace, image_name, DOCKER_HUB_PAGE_SIZE
        )
    }
}

#[async_trait::async_trait]
impl Registry for DockerHubRegistry {
    fn name(&self) -> &'static str {
        "docker-hub"
    }

    async fn fetch_tags(&self, image_name: &str) -> Result<ImageTags, RegistryError> {
        let mut tags = Vec::new();
        let mut url = self.tags_url(image_name);

        loop {
            debug!("Fetching tags page {}", url);
            let response = self.client.get(&url).send().await?;

            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(RegistryError::NotFound(image_name.to_string()));
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                return Err(RegistryError::RateLimited {
                    retry_after_secs: retry_after,
                });
            }

            if !status.is_success() {
                warn!("Docker Hub returned status {}: {}", status, url);
                return Err(RegistryError::InvalidResponse(format!(
                    "Unexpected status: {}",
                    status
                )));
            }

            let page: TagsPage = response.json().await.map_err(|e| {
                warn!("Failed to parse Docker Hub tags response: {}", e);
                RegistryError::InvalidResponse(e.to_string())
            })?;

            debug!(
                "Received {} of {:?} tags for {}",
                page.results.len(),
                page.count,
                image_name
            );
            tags.extend(page.results.into_iter().map(|entry| entry.name));

            match page.next.filter(|next| !next.is_empty()) {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(ImageTags::new(tags))
    }
}
