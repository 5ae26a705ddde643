//! Search the registry's distribution packages by partial name

use tracing::{info, warn};

use crate::upstream::registry::{Registry, RegistryPackage};

/// A distribution package whose name matched one of the partial names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMatch {
    pub package: RegistryPackage,
    /// Id of the upstream project the package maps to, if the registry knows it
    pub project_id: Option<u64>,
}

impl PackageMatch {
    /// `project_id;distribution;name`, with an empty id when unknown
    pub fn to_line(&self) -> String {
        format!(
            "{};{};{}",
            self.project_id.map(|id| id.to_string()).unwrap_or_default(),
            self.package.distribution,
            self.package.name
        )
    }
}

/// Fetches every package page until a short page is returned
///
/// A failed page is treated as empty and ends the listing.
pub async fn fetch_all_packages(
    registry: &dyn Registry,
    items_per_page: u32,
) -> Vec<RegistryPackage> {
    let items_per_page = items_per_page.max(1);
    let mut packages = Vec::new();
    let mut page = 1;

    loop {
        let items = match registry.list_packages(page, items_per_page).await {
            Ok(response) => response.items,
            Err(e) => {
                warn!("Failed to fetch package page {}: {}", page, e);
                Vec::new()
            }
        };

        let last_page = items.len() < items_per_page as usize;
        packages.extend(items);
        if last_page {
            break;
        }
        page += 1;
    }

    info!("Fetched {} packages in {} pages", packages.len(), page);
    packages
}

/// Keeps packages whose name contains any of `partial_names`, ignoring case
pub fn filter_packages(
    packages: Vec<RegistryPackage>,
    partial_names: &[String],
) -> Vec<RegistryPackage> {
    let needles: Vec<String> = partial_names.iter().map(|n| n.to_lowercase()).collect();

    packages
        .into_iter()
        .filter(|package| {
            let name = package.name.to_lowercase();
            needles.iter().any(|needle| name.contains(needle.as_str()))
        })
        .collect()
}

/// Lists matching packages and resolves the project id of each
pub async fn find_packages(
    registry: &dyn Registry,
    partial_names: &[String],
    items_per_page: u32,
) -> Vec<PackageMatch> {
    let packages = fetch_all_packages(registry, items_per_page).await;
    let filtered = filter_packages(packages, partial_names);

    let mut matches = Vec::with_capacity(filtered.len());
    for package in filtered {
        let project_id = if package.project.is_empty() {
            None
        } else {
            match registry.find_project(&package.project).await {
                Ok(project) => project.map(|p| p.id),
                Err(e) => {
                    warn!("Project lookup for package '{}' failed: {}", package.name, e);
                    None
                }
            }
        };
        matches.push(PackageMatch {
            package,
            project_id,
        });
    }
    matches
}
