//! Upstream version resolution: registry first, local tool as last resort
//!
//! Each project is resolved at most once per resolver. The outcome, including
//! "nothing found", is kept in an explicit results map keyed by project name so
//! repeated calls never hit the network or spawn the tool again.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use tracing::{info, warn};

use crate::project::{TrackedProject, UpstreamResolution, VersionSource};
use crate::upstream::fallback::FallbackLookup;
use crate::upstream::registry::{ProjectVersions, Registry};

/// What the registry had to say about a project
#[derive(Debug, Clone, PartialEq, Eq)]
enum RegistryOutcome {
    Found(String),
    /// Versions were fetched but none matched the branch filter
    NoBranchMatch,
    /// Unknown project, failed query or empty version list
    NoData,
}

pub struct ProjectResolver {
    registry: Arc<dyn Registry>,
    fallback: Arc<dyn FallbackLookup>,
    resolved: HashMap<String, UpstreamResolution>,
}

impl ProjectResolver {
    pub fn new(registry: Arc<dyn Registry>, fallback: Arc<dyn FallbackLookup>) -> Self {
        Self {
            registry,
            fallback,
            resolved: HashMap::new(),
        }
    }

    /// Resolves the upstream version of `project`, memoized by project name
    pub async fn resolve(&mut self, project: &TrackedProject) -> UpstreamResolution {
        if let Some(cached) = self.resolved.get(&project.name) {
            return cached.clone();
        }

        let resolution = self.resolve_uncached(project).await;
        self.resolved
            .insert(project.name.clone(), resolution.clone());
        resolution
    }

    async fn resolve_uncached(&self, project: &TrackedProject) -> UpstreamResolution {
        let registry_id = self.lookup_registry_id(&project.canonical_name).await;

        let outcome = match registry_id {
            Some(id) => self.registry_version(project, id).await,
            None => RegistryOutcome::NoData,
        };

        match outcome {
            RegistryOutcome::Found(version) => {
                info!("{}: upstream version {} (registry)", project.name, version);
                UpstreamResolution {
                    registry_id,
                    version: Some(version),
                    source: VersionSource::Registry,
                }
            }
            RegistryOutcome::NoBranchMatch => {
                warn!(
                    "{}: no stable version matches branch {:?}",
                    project.name, project.branch_filter
                );
                UpstreamResolution::unresolved(registry_id)
            }
            RegistryOutcome::NoData => self.fallback_version(project, registry_id).await,
        }
    }

    async fn lookup_registry_id(&self, canonical_name: &str) -> Option<u64> {
        match self.registry.find_project(canonical_name).await {
            Ok(Some(project)) => Some(project.id),
            Ok(None) => {
                info!("{}: not tracked by the registry", canonical_name);
                None
            }
            Err(e) => {
                warn!("{}: project lookup failed: {}", canonical_name, e);
                None
            }
        }
    }

    async fn registry_version(&self, project: &TrackedProject, id: u64) -> RegistryOutcome {
        let versions = match self.registry.project_versions(id).await {
            Ok(versions) => versions,
            Err(e) => {
                warn!("{}: version lookup failed: {}", project.name, e);
                return RegistryOutcome::NoData;
            }
        };

        select_version(&versions, project.branch_filter.as_deref())
    }

    async fn fallback_version(
        &self,
        project: &TrackedProject,
        registry_id: Option<u64>,
    ) -> UpstreamResolution {
        match self.fallback.latest_version(&project.name).await {
            Ok(version) => {
                info!("{}: upstream version {} (fallback)", project.name, version);
                UpstreamResolution {
                    registry_id,
                    version: Some(version),
                    source: VersionSource::Fallback,
                }
            }
            Err(e) => {
                warn!("{}: fallback lookup failed: {}", project.name, e);
                UpstreamResolution::unresolved(registry_id)
            }
        }
    }
}

/// Pick the newest stable version, restricted to `branch` when given
fn select_version(versions: &ProjectVersions, branch: Option<&str>) -> RegistryOutcome {
    if versions.stable_versions.is_empty() {
        return RegistryOutcome::NoData;
    }

    let Some(branch) = branch else {
        return RegistryOutcome::Found(versions.stable_versions[0].clone());
    };

    let matcher = BranchMatcher::new(branch);
    versions
        .stable_versions
        .iter()
        .find(|v| matcher.matches(v))
        .map(|v| RegistryOutcome::Found(v.clone()))
        .unwrap_or(RegistryOutcome::NoBranchMatch)
}

/// Start-anchored branch pattern; falls back to a literal prefix when the
/// pattern is not a valid regex
enum BranchMatcher {
    Pattern(Regex),
    Prefix(String),
}

impl BranchMatcher {
    fn new(branch: &str) -> Self {
        match Regex::new(&format!("^(?:{branch})")) {
            Ok(re) => Self::Pattern(re),
            Err(_) => Self::Prefix(branch.to_string()),
        }
    }

    fn matches(&self, version: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(version),
            Self::Prefix(prefix) => version.starts_with(prefix.as_str()),
        }
    }
}
