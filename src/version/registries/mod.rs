//! Registry implementations for fetching image tags

pub mod docker_hub;
pub mod oci;

pub use docker_hub::DockerHubRegistry;
pub use oci::OciRegistry;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::RegistryConfig;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

const USER_AGENT: &str = concat!("compose-update-checker/", env!("CARGO_PKG_VERSION"));

/// Selects the registry implementation described by the configuration.
///
/// A configured URL means a Docker Hub compatible listing API; otherwise each
/// image's own registry is queried through the OCI distribution API.
pub fn build_registry(config: &RegistryConfig) -> Result<Arc<dyn Registry>, RegistryError> {
    let timeout = Duration::from_millis(config.timeout_ms);
    match config.url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => {
            info!("Listing tags through Docker Hub compatible API at {}", url);
            Ok(Arc::new(DockerHubRegistry::new(url, timeout)?))
        }
        None => {
            info!("Listing tags through OCI distribution API");
            Ok(Arc::new(OciRegistry::new(timeout)))
        }
    }
}

/// Builds the HTTP client shared by registry implementations
fn http_client(timeout: Duration) -> Result<reqwest::Client, RegistryError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Docker Hub keeps official images under the `library/` namespace
fn is_official_image(repository: &str) -> bool {
    !repository.contains('/')
}
