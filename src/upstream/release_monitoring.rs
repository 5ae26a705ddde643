//! release-monitoring.org (Anitya) v2 API registry implementation

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::upstream::error::RegistryError;
use crate::upstream::registry::{
    PackagesPage, ProjectVersions, ProjectsResponse, Registry, RegistryProject,
};

/// Registry implementation for the release-monitoring HTTP API
pub struct ReleaseMonitoringRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl ReleaseMonitoringRegistry {
    /// Creates a new registry client with a custom base URL
    pub fn new(base_url: &str) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("release-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{base}/api/v2/{path}` with query parameters, decoding a 200 body
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RegistryError> {
        let url = Url::parse_with_params(&format!("{}/api/v2/{}", self.base_url, path), params)
            .map_err(|e| RegistryError::InvalidResponse(format!("invalid request URL: {e}")))?;
        debug!("Querying registry: {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            error!("Wrong arguments for request '{}' (status {})", url, status);
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json().await.map_err(|e| {
            error!("Failed to decode response of '{}': {}", url, e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl Registry for ReleaseMonitoringRegistry {
    async fn find_project(&self, name: &str) -> Result<Option<RegistryProject>, RegistryError> {
        let response: ProjectsResponse = self
            .get("projects", &[("name", name.to_string())])
            .await?;

        let project = response.items.into_iter().next();
        match &project {
            Some(p) => debug!("Project '{}' has id '{}'", name, p.id),
            None => debug!("Project '{}' not found", name),
        }
        Ok(project)
    }

    async fn project_versions(&self, project_id: u64) -> Result<ProjectVersions, RegistryError> {
        self.get("versions", &[("project_id", project_id.to_string())])
            .await
    }

    async fn list_packages(
        &self,
        page: u32,
        items_per_page: u32,
    ) -> Result<PackagesPage, RegistryError> {
        self.get(
            "packages",
            &[
                ("items_per_page", items_per_page.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }
}
