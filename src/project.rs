//! Tracked projects and the per-run results attached to them

use indexmap::IndexMap;

use crate::config::ProjectEntry;

/// A project listed in the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProject {
    /// Config key, possibly carrying a branch suffix (e.g. "kubernetes1.24")
    pub name: String,
    /// Name used to look the project up in the registry
    pub canonical_name: String,
    /// Version prefix/pattern selecting one release branch
    pub branch_filter: Option<String>,
    /// Name used when querying package managers
    pub package_name: String,
}

impl TrackedProject {
    pub fn new(name: &str, entry: &ProjectEntry) -> Self {
        let canonical_name = entry.real_name.clone().unwrap_or_else(|| name.to_string());
        let branch_filter = entry
            .real_name
            .as_deref()
            .and_then(|real_name| branch_suffix(name, real_name));
        let package_name = entry.suse_name.clone().unwrap_or_else(|| name.to_string());

        Self {
            name: name.to_string(),
            canonical_name,
            branch_filter,
            package_name,
        }
    }
}

/// Part of `name` after the last occurrence of `canonical`, if non-empty
fn branch_suffix(name: &str, canonical: &str) -> Option<String> {
    if canonical.is_empty() {
        return None;
    }
    name.rsplit_once(canonical)
        .map(|(_, suffix)| suffix)
        .filter(|suffix| !suffix.is_empty())
        .map(str::to_string)
}

/// Where an upstream version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Registry,
    Fallback,
    Unresolved,
}

/// Outcome of resolving one project's upstream version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResolution {
    pub registry_id: Option<u64>,
    pub version: Option<String>,
    pub source: VersionSource,
}

impl UpstreamResolution {
    pub fn unresolved(registry_id: Option<u64>) -> Self {
        Self {
            registry_id,
            version: None,
            source: VersionSource::Unresolved,
        }
    }
}

/// Everything collected about one project during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    pub project: TrackedProject,
    pub upstream: UpstreamResolution,
    /// Image label -> installed version, in image processing order
    pub installed_versions: IndexMap<String, Option<String>>,
}

impl ProjectReport {
    pub fn new(project: TrackedProject, upstream: UpstreamResolution) -> Self {
        Self {
            project,
            upstream,
            installed_versions: IndexMap::new(),
        }
    }

    pub fn record_installed(&mut self, image_label: &str, version: Option<String>) {
        self.installed_versions
            .insert(image_label.to_string(), version);
    }
}

/// Column label for an image: its last path component
///
/// `registry.suse.com/bci/bci-base:15.4` -> `bci-base:15.4`
pub fn image_label(image: &str) -> &str {
    image.rsplit('/').next().unwrap_or(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(real_name: Option<&str>, suse_name: Option<&str>) -> ProjectEntry {
        ProjectEntry {
            real_name: real_name.map(str::to_string),
            suse_name: suse_name.map(str::to_string),
        }
    }

    #[test]
    fn new_defaults_every_name_to_config_key() {
        let project = TrackedProject::new("helm", &entry(None, None));

        assert_eq!(
            project,
            TrackedProject {
                name: "helm".to_string(),
                canonical_name: "helm".to_string(),
                branch_filter: None,
                package_name: "helm".to_string(),
            }
        );
    }

    #[test]
    fn new_extracts_branch_filter_from_real_name_suffix() {
        let project = TrackedProject::new(
            "kubernetes1.24",
            &entry(Some("kubernetes"), Some("kubernetes1.24-client")),
        );

        assert_eq!(project.canonical_name, "kubernetes");
        assert_eq!(project.branch_filter, Some("1.24".to_string()));
        assert_eq!(project.package_name, "kubernetes1.24-client");
    }

    #[rstest]
    #[case("kubernetes", "kubernetes", None)]
    #[case("go1.21", "go", Some("1.21"))]
    #[case("python311", "python3", Some("11"))]
    #[case("cri-o", "containerd", None)]
    #[case("anything", "", None)]
    fn branch_suffix_returns_expected(
        #[case] name: &str,
        #[case] canonical: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(branch_suffix(name, canonical), expected.map(str::to_string));
    }

    #[rstest]
    #[case("opensuse/leap:15.4", "leap:15.4")]
    #[case("registry.suse.com/bci/bci-base:15.3", "bci-base:15.3")]
    #[case("alpine", "alpine")]
    fn image_label_uses_last_path_component(#[case] image: &str, #[case] expected: &str) {
        assert_eq!(image_label(image), expected);
    }

    #[test]
    fn record_installed_keeps_processing_order_and_nulls() {
        let project = TrackedProject::new("helm", &entry(None, None));
        let mut report = ProjectReport::new(project, UpstreamResolution::unresolved(None));

        report.record_installed("leap:15.4", Some("3.10.0".to_string()));
        report.record_installed("bci-base:15.3", None);

        let columns: Vec<(&str, Option<&str>)> = report
            .installed_versions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
            .collect();
        assert_eq!(
            columns,
            vec![("leap:15.4", Some("3.10.0")), ("bci-base:15.3", None)]
        );
    }
}
