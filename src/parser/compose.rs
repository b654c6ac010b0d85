//! Compose manifest parser
//!
//! Scans line by line for `image: <reference>` entries. No YAML structure is
//! interpreted; a line qualifies when, ignoring surrounding whitespace, it is
//! exactly `image:` followed by a single value.
//!
//! Format examples:
//! - `    image: nginx:1.25.3`
//! - `    image: "ghcr.io/org/app:v2.1.0"`

use std::collections::HashSet;

use regex::Regex;
use tracing::trace;

use crate::parser::types::{ImageReference, split_image_reference};

/// Parser for docker compose files
pub struct ComposeParser {
    /// Regex for an image line: `image: <reference>`
    image_re: Regex,
}

impl ComposeParser {
    pub fn new() -> Self {
        Self {
            // Match: image: nginx:1.25.3
            image_re: Regex::new(r"^\s*image:\s*(\S+)\s*$").expect("image line pattern is valid"),
        }
    }

    /// Extract image references, deduplicated by image name and tag.
    /// The first occurrence wins and line order is preserved.
    pub fn parse(&self, content: &str) -> Vec<ImageReference> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let Some(value) = self.image_value(line) else {
                continue;
            };

            let (image_name, tag) = split_image_reference(value);
            if !seen.insert((image_name.to_string(), tag.to_string())) {
                trace!("Skipping duplicate image {} on line {}", value, line_num + 1);
                continue;
            }

            results.push(ImageReference {
                raw_line: line.to_string(),
                full_image_name: value.to_string(),
                image_name: image_name.to_string(),
                tag: tag.to_string(),
                line: line_num + 1,
            });
        }

        results
    }

    /// The value of an `image:` line, or None when the line is anything else
    fn image_value<'a>(&self, line: &'a str) -> Option<&'a str> {
        let value = self.image_re.captures(line)?.get(1)?.as_str();
        Some(unquote(value)).filter(|v| !v.is_empty())
    }
}

impl Default for ComposeParser {
    fn default() -> Self {
        Self::new()
    }
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| value.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(value)
}
