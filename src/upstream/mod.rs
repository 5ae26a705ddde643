//! Upstream version lookup
//!
//! ```text
//! ┌──────────────────┐  1. project id   ┌─────────────────────┐
//! │ ProjectResolver  │─────────────────▶│ Registry            │
//! │ (memoized)       │  2. versions     │ (release-monitoring)│
//! └──────────────────┘                  └─────────────────────┘
//!          │ 3. no usable version
//!          ▼
//! ┌──────────────────┐
//! │ FallbackLookup   │  `lastversion <name>`
//! └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait and API response types
//! - [`release_monitoring`]: HTTP implementation of the registry
//! - [`fallback`]: External tool used when the registry has no answer
//! - [`resolver`]: Registry-then-fallback resolution with memoization
//! - [`search`]: Paged package listing filtered by partial names
//! - [`error`]: Error types for registry and fallback lookups

pub mod error;
pub mod fallback;
pub mod registry;
pub mod release_monitoring;
pub mod resolver;
pub mod search;
