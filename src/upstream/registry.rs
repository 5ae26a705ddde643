//! Registry trait and the wire types of the release-monitoring v2 API

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;

use crate::upstream::error::RegistryError;

/// One project as returned by `GET /api/v2/projects`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegistryProject {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub ecosystem: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

/// Response of `GET /api/v2/projects`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsResponse {
    pub items: Vec<RegistryProject>,
    #[serde(default)]
    pub total_items: u64,
}

/// Response of `GET /api/v2/versions`
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectVersions {
    pub latest_version: Option<String>,
    /// All known versions, newest first
    pub versions: Vec<String>,
    /// Versions without pre-release markers, newest first
    pub stable_versions: Vec<String>,
}

#[cfg(test)]
impl ProjectVersions {
    pub fn stable(versions: &[&str]) -> Self {
        Self {
            latest_version: versions.first().map(|v| v.to_string()),
            versions: versions.iter().map(|v| v.to_string()).collect(),
            stable_versions: versions.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// One distribution package as returned by `GET /api/v2/packages`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegistryPackage {
    pub name: String,
    pub distribution: String,
    /// Name of the upstream project this package maps to
    pub project: String,
    #[serde(default)]
    pub ecosystem: Option<String>,
}

/// One page of `GET /api/v2/packages`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PackagesPage {
    pub items: Vec<RegistryPackage>,
    pub page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
}

/// Trait for querying the upstream release registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Looks a project up by exact name
    ///
    /// # Returns
    /// * `Ok(Some(project))` - First matching project
    /// * `Ok(None)` - The registry does not know the name
    /// * `Err(RegistryError)` - If the query fails
    async fn find_project(&self, name: &str) -> Result<Option<RegistryProject>, RegistryError>;

    /// Fetches the known versions of a project
    async fn project_versions(&self, project_id: u64) -> Result<ProjectVersions, RegistryError>;

    /// Fetches one page of the distribution package listing (pages start at 1)
    async fn list_packages(
        &self,
        page: u32,
        items_per_page: u32,
    ) -> Result<PackagesPage, RegistryError>;
}
