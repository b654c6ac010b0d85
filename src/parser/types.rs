//! Common types for manifest parsing

/// An `image:` reference found in a manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// The manifest line exactly as written
    pub raw_line: String,
    /// Image value after `image:` (e.g., "nginx:1.25.3")
    pub full_image_name: String,
    /// Image name without tag (e.g., "nginx", "ghcr.io/org/app")
    pub image_name: String,
    /// Tag portion, empty when the reference has none
    pub tag: String,
    /// Line number (1-indexed)
    pub line: usize,
}

/// Split an image value into name and tag.
///
/// The tag is the text after the last `:` unless that text contains `/`, in
/// which case the colon belongs to a registry port. Digests are dropped.
///
/// Examples:
/// - "nginx:1.25" -> ("nginx", "1.25")
/// - "nginx" -> ("nginx", "")
/// - "localhost:5000/app:2.0" -> ("localhost:5000/app", "2.0")
/// - "localhost:5000/app" -> ("localhost:5000/app", "")
/// - "redis:7.2@sha256:abc" -> ("redis", "7.2")
pub fn split_image_reference(value: &str) -> (&str, &str) {
    let without_digest = value.split_once('@').map_or(value, |(image, _)| image);

    match without_digest.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, tag),
        _ => (without_digest, ""),
    }
}
