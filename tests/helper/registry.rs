//! Registry test utilities

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use compose_update_checker::version::error::RegistryError;
use compose_update_checker::version::registry::Registry;
use compose_update_checker::version::types::ImageTags;

/// In-memory registry that records how often each image was requested
#[derive(Default)]
pub struct MockRegistry {
    tags: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    requests: Mutex<HashMap<String, usize>>,
}

#[allow(dead_code)]
impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, image: &str, tags: Vec<&str>) -> Self {
        self.tags.insert(
            image.to_string(),
            tags.into_iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Makes every fetch of `image` fail with an invalid response
    pub fn with_failure(mut self, image: &str, message: &str) -> Self {
        self.failures
            .insert(image.to_string(), message.to_string());
        self
    }

    pub fn request_count(&self, image: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .get(image)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_tags(&self, image_name: &str) -> Result<ImageTags, RegistryError> {
        *self
            .requests
            .lock()
            .unwrap()
            .entry(image_name.to_string())
            .or_default() += 1;

        if let Some(message) = self.failures.get(image_name) {
            return Err(RegistryError::InvalidResponse(message.clone()));
        }

        match self.tags.get(image_name) {
            Some(tags) => Ok(ImageTags::new(tags.clone())),
            None => Err(RegistryError::NotFound(image_name.to_string())),
        }
    }
}
