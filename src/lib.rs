//! Compare upstream release versions with the packages shipped in base images
//!
//! Upstream versions come from the release-monitoring registry (with a local
//! tool as fallback); installed versions are read by running the image's
//! package manager inside a throwaway container. The two are joined into a
//! CSV report with one row per tracked project and one column per image.

pub mod command;
pub mod config;
pub mod container;
pub mod logging;
pub mod orchestrator;
pub mod project;
pub mod report;
pub mod upstream;
