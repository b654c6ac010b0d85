//! OCI distribution (Registry HTTP API v2) tag listing
//!
//! Works against any registry host named in the image reference. Image names
//! are resolved with `oci_client::Reference`, so Docker Hub images without a
//! host go to Docker Hub's `library/` namespace. Every request is anonymous;
//! registries that answer with a `Bearer` challenge get an anonymous pull
//! token from the client.

use std::time::Duration;

use oci_client::client::{ClientConfig, ClientProtocol};
use oci_client::secrets::RegistryAuth;
use oci_client::{Client, Reference, RegistryOperation};
use tracing::debug;

use crate::config::OCI_PAGE_SIZE;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::ImageTags;

fn oci_client(timeout: Duration, protocol: ClientProtocol) -> Client {
    Client::new(ClientConfig {
        protocol,
        read_timeout: Some(timeout),
        connect_timeout: Some(timeout),
        ..Default::default()
    })
}

/// Registry implementation for the OCI distribution tag list API
pub struct OciRegistry {
    client: Client,
    timeout: Duration,
    endpoint: Option<String>,
    page_size: usize,
}

impl OciRegistry {
    /// Creates an OciRegistry that contacts whichever host the image names over HTTPS
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: oci_client(timeout, ClientProtocol::Https),
            timeout,
            endpoint: None,
            page_size: OCI_PAGE_SIZE,
        }
    }

    /// Sends every request to `endpoint` instead of the image's own registry host.
    ///
    /// An `http://` endpoint is contacted without TLS.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, RegistryError> {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|e| RegistryError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| RegistryError::InvalidEndpoint(endpoint.to_string()))?;
        let address = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let protocol = if url.scheme() == "http" {
            ClientProtocol::HttpsExcept(vec![address.clone()])
        } else {
            ClientProtocol::Https
        };
        self.client = oci_client(self.timeout, protocol);
        self.endpoint = Some(address);
        Ok(self)
    }

    /// Number of tags requested per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Registry and repository of an image name, redirected to the endpoint if one is set
    fn reference(&self, image_name: &str) -> Result<Reference, RegistryError> {
        let reference = image_name
            .parse::<Reference>()
            .map_err(|e| RegistryError::InvalidReference(format!("{}: {}", image_name, e)))?;

        Ok(match &self.endpoint {
            Some(endpoint) => Reference::with_tag(
                endpoint.clone(),
                reference.repository().to_string(),
                reference.tag().unwrap_or("latest").to_string(),
            ),
            None => reference,
        })
    }
}

#[async_trait::async_trait]
impl Registry for OciRegistry {
    fn name(&self) -> &'static str {
        "oci"
    }

    async fn fetch_tags(&self, image_name: &str) -> Result<ImageTags, RegistryError> {
        let reference = self.reference(image_name)?;
        let auth = RegistryAuth::Anonymous;

        debug!(
            "Authenticating anonymously against {} for {}",
            reference.resolve_registry(),
            reference.repository()
        );
        self.client
            .auth(&reference, &auth, RegistryOperation::Pull)
            .await?;

        let mut tags = Vec::new();
        let mut last: Option<String> = None;

        // Pages continue after the last tag of a full page
        loop {
            debug!(
                "Fetching tags of {} after {:?}",
                reference.repository(),
                last
            );
            let page = self
                .client
                .list_tags(&reference, &auth, Some(self.page_size), last.as_deref())
                .await?;

            let full = page.tags.len() >= self.page_size;
            let next = page.tags.last().cloned();
            tags.extend(page.tags);

            match next {
                Some(next) if full && last.as_deref() != Some(next.as_str()) => last = Some(next),
                _ => break,
            }
        }

        debug!("Found {} tags for {}", tags.len(), image_name);
        Ok(ImageTags::new(tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use rstest::rstest;

    fn registry(server: &ServerGuard) -> OciRegistry {
        OciRegistry::new(Duration::from_secs(5))
            .with_endpoint(&server.url())
            .unwrap()
    }

    async fn mock_open_registry(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/v2/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .expect_at_least(1)
            .create_async()
            .await
    }

    #[rstest]
    #[case("nginx", "docker.io", "library/nginx")]
    #[case("bitnami/redis", "docker.io", "bitnami/redis")]
    #[case("docker.io/nginx", "docker.io", "library/nginx")]
    #[case("ghcr.io/org/app", "ghcr.io", "org/app")]
    #[case("localhost:5000/app", "localhost:5000", "app")]
    #[case("registry.example.com:8443/a/b/c", "registry.example.com:8443", "a/b/c")]
    fn reference_resolves_registry_and_repository(
        #[case] image: &str,
        #[case] registry: &str,
        #[case] repository: &str,
    ) {
        let reference = OciRegistry::new(Duration::from_secs(5))
            .reference(image)
            .unwrap();

        assert_eq!(reference.registry(), registry);
        assert_eq!(reference.repository(), repository);
    }

    #[rstest]
    #[case("")]
    #[case("bad name")]
    fn reference_rejects_invalid_names(#[case] image: &str) {
        let result = OciRegistry::new(Duration::from_secs(5)).reference(image);

        assert!(matches!(result, Err(RegistryError::InvalidReference(_))));
    }

    #[test]
    fn reference_is_redirected_to_endpoint() {
        let reference = OciRegistry::new(Duration::from_secs(5))
            .with_endpoint("http://127.0.0.1:5000")
            .unwrap()
            .reference("nginx")
            .unwrap();

        assert_eq!(reference.registry(), "127.0.0.1:5000");
        assert_eq!(reference.repository(), "library/nginx");
    }

    #[rstest]
    #[case("not a url")]
    #[case("unix:/var/run/registry.sock")]
    fn with_endpoint_rejects_urls_without_host(#[case] endpoint: &str) {
        let result = OciRegistry::new(Duration::from_secs(5)).with_endpoint(endpoint);

        assert!(matches!(result, Err(RegistryError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn fetch_tags_returns_tags_from_tag_list() {
        let mut server = Server::new_async().await;
        let ping = mock_open_registry(&mut server).await;

        let mock = server
            .mock("GET", "/v2/library/nginx/tags/list")
            .match_query(Matcher::Exact("n=1000".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "library/nginx", "tags": ["1.25", "1.25.3", "latest"]}"#)
            .create_async()
            .await;

        let result = registry(&server).fetch_tags("nginx").await.unwrap();

        ping.assert_async().await;
        mock.assert_async().await;
        assert_eq!(
            result.tags,
            vec!["1.25".to_string(), "1.25.3".to_string(), "latest".to_string()]
        );
    }

    #[tokio::test]
    async fn fetch_tags_continues_after_full_page() {
        let mut server = Server::new_async().await;
        let _ping = mock_open_registry(&mut server).await;

        let first = server
            .mock("GET", "/v2/org/app/tags/list")
            .match_query(Matcher::Exact("n=2".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "org/app", "tags": ["1.0.0", "1.1.0"]}"#)
            .create_async()
            .await;

        let second = server
            .mock("GET", "/v2/org/app/tags/list")
            .match_query(Matcher::Exact("n=2&last=1.1.0".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "org/app", "tags": ["1.2.0"]}"#)
            .create_async()
            .await;

        let result = registry(&server)
            .with_page_size(2)
            .fetch_tags("ghcr.io/org/app")
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(
            result.tags,
            vec!["1.0.0".to_string(), "1.1.0".to_string(), "1.2.0".to_string()]
        );
    }

    #[tokio::test]
    async fn fetch_tags_uses_anonymous_token_from_challenge() {
        let mut server = Server::new_async().await;
        let challenge = format!(
            r#"Bearer realm="{}/token",service="registry.test""#,
            server.url()
        );

        let ping = server
            .mock("GET", "/v2/")
            .with_status(401)
            .with_header("www-authenticate", &challenge)
            .expect_at_least(1)
            .create_async()
            .await;

        let token = server
            .mock("GET", "/token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("service".into(), "registry.test".into()),
                Matcher::UrlEncoded("scope".into(), "repository:library/redis:pull".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token": "anon-token"}"#)
            .expect_at_least(1)
            .create_async()
            .await;

        let tags = server
            .mock("GET", "/v2/library/redis/tags/list")
            .match_query(Matcher::Exact("n=1000".to_string()))
            .match_header("authorization", "Bearer anon-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "library/redis", "tags": ["7.2.4"]}"#)
            .create_async()
            .await;

        let result = registry(&server).fetch_tags("redis").await.unwrap();

        ping.assert_async().await;
        token.assert_async().await;
        tags.assert_async().await;
        assert_eq!(result.tags, vec!["7.2.4".to_string()]);
    }

    #[tokio::test]
    async fn fetch_tags_fails_for_unknown_repository() {
        let mut server = Server::new_async().await;
        let _ping = mock_open_registry(&mut server).await;

        let mock = server
            .mock("GET", "/v2/library/missing/tags/list")
            .match_query(Matcher::Exact("n=1000".to_string()))
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors": [{"code": "NAME_UNKNOWN", "message": "repository name not known to registry"}]}"#)
            .create_async()
            .await;

        let result = registry(&server).fetch_tags("missing").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::Oci(_))));
    }
}
