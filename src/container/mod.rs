//! Ephemeral containers used to read package versions out of base images
//!
//! - [`engine`]: Engine choice (podman, docker), probed once per run
//! - [`package_manager`]: Refresh/info commands and `Version` line parsing
//! - [`handle`]: Create, query and remove one named container

pub mod engine;
pub mod handle;
pub mod package_manager;

pub use engine::{ContainerEngine, resolve_engine, select_engine};
pub use handle::{ContainerError, ContainerHandle};
pub use package_manager::{PackageManager, ParseError, parse_version};
