use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Registry constants
// =============================================================================

/// Default base URL of the release-monitoring registry
pub const DEFAULT_REGISTRY_URL: &str = "https://release-monitoring.org";

/// Maximum page size accepted by the packages endpoint
pub const ITEMS_PER_PAGE: u32 = 250;

/// Delay between two project resolutions to avoid hammering the registry (1s)
pub const PROJECT_PAUSE_MS: u64 = 1_000;

/// Tool used when the registry has no usable version for a project
pub const DEFAULT_FALLBACK_TOOL: &str = "lastversion";

/// Partial package names searched by the `packages` command by default
pub const DEFAULT_PARTIAL_NAMES: &[&str] = &["helm", "kubernetes"];

// =============================================================================
// Container constants
// =============================================================================

/// Name given to the short-lived query container
pub const DEFAULT_CONTAINER_NAME: &str = "release_monitoring";

/// Lifetime ceiling of a query container in seconds (30 minutes)
pub const CONTAINER_LIFETIME_SECS: u64 = 1_800;

/// Images queried when neither the CLI nor the config file lists any
pub const DEFAULT_IMAGES: &[&str] = &[
    "opensuse/leap:15.4",
    "registry.suse.com/bci/bci-base:15.4",
    "registry.suse.com/bci/bci-base:15.3",
];

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default report file, relative to the working directory
pub const DEFAULT_REPORT_FILE: &str = "report.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yml::Error,
    },
}

/// Top-level config document
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Tracked projects keyed by name, in file order
    pub projects: IndexMap<String, Option<ProjectEntry>>,
    /// Images to query; empty means "use the defaults"
    pub images: Vec<String>,
}

/// Per-project overrides
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjectEntry {
    /// Name of the project in the registry, when it differs from the key
    pub real_name: Option<String>,
    /// Name of the package inside the distribution
    pub suse_name: Option<String>,
}

impl ReportConfig {
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Iterate over project entries, treating `name:` with no body as defaults
    pub fn entries(&self) -> impl Iterator<Item = (&str, ProjectEntry)> + '_ {
        self.projects
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.clone().unwrap_or_default()))
    }
}

pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    ReportConfig::from_yaml(&content, path)
}

/// Pick the image list: explicit CLI images, then config images, then defaults.
pub fn select_images(cli_images: &[String], config: &ReportConfig) -> Vec<String> {
    if !cli_images.is_empty() {
        return cli_images.to_vec();
    }
    if !config.images.is_empty() {
        return config.images.clone();
    }
    DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect()
}
