//! Parser layer
//! - types.rs: Common types (ImageReference) and image reference splitting
//! - compose.rs: docker compose manifest parser

pub mod compose;
pub mod types;

pub use compose::ComposeParser;
pub use types::ImageReference;
