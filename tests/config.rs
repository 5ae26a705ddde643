use std::fs;

use tempfile::TempDir;

use release_check::config::{ConfigError, DEFAULT_IMAGES, load_config, select_images};
use release_check::orchestrator::tracked_projects;

#[test]
fn load_config_reads_projects_and_images_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(
        &path,
        r#"
images:
  - opensuse/tumbleweed
projects:
  helm:
    id: null
    distribution: [openSUSE]
  go1.21:
    real_name: go
    suse_name: go1.21
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    let projects = tracked_projects(&config);

    assert_eq!(select_images(&[], &config), vec!["opensuse/tumbleweed"]);
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].canonical_name, "go");
    assert_eq!(projects[1].branch_filter.as_deref(), Some("1.21"));
    assert_eq!(projects[1].package_name, "go1.21");
}

#[test]
fn load_config_without_images_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "projects:\n  helm: {}\n").unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(select_images(&[], &config), DEFAULT_IMAGES.to_vec());
}

#[test]
fn load_config_rejects_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "projects:\n  - [broken\n").unwrap();

    let result = load_config(&path);

    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
