//! Version layer for image tag checking
//!
//! This module lists the tags of container images and picks the newest tag an
//! update policy allows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│  Selector   │◀────│   Policy    │
//! │ (list tags) │     │ (pick tag)  │     │ (M / m / p) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │   Semver    │
//! │ (hub, OCI)  │     │ (tag parse) │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for listing tags from remote sources
//! - [`registries`]: Concrete registry implementations (Docker Hub API, OCI distribution)
//! - [`semver`]: Strict and lenient tag parsing into comparable versions
//! - [`policy`]: Major/minor/patch update policy
//! - [`selector`]: Latest acceptable tag selection
//! - [`error`]: Error types for registry and parse operations
//! - [`types`]: Common types like `ImageTags`

pub mod error;
pub mod policy;
pub mod registries;
pub mod registry;
pub mod selector;
pub mod semver;
pub mod types;
