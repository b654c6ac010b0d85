//! Registry trait for fetching image tags from container registries

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::ImageTags;

/// Trait for listing the tags of an image
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Short name used in log lines (e.g. "docker-hub", "oci")
    fn name(&self) -> &'static str;

    /// Fetches every tag published for an image
    ///
    /// # Arguments
    /// * `image_name` - Image name without tag (e.g. "nginx", "bitnami/redis", "ghcr.io/org/app")
    ///
    /// # Returns
    /// * `Ok(ImageTags)` - All tags across every page
    /// * `Err(RegistryError)` - If any request or decode fails
    async fn fetch_tags(&self, image_name: &str) -> Result<ImageTags, RegistryError>;
}
