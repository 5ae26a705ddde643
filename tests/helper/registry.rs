//! mockito fixtures for the release-monitoring API
#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};

/// `GET /api/v2/projects?name=<name>` answering with `id`, or no items
pub async fn mock_project(server: &mut ServerGuard, name: &str, id: Option<u64>) -> Mock {
    let items = match id {
        Some(id) => format!(r#"[{{"id": {id}, "name": "{name}", "ecosystem": "https://github.com/{name}/{name}"}}]"#),
        None => "[]".to_string(),
    };

    server
        .mock("GET", "/api/v2/projects")
        .match_query(Matcher::UrlEncoded("name".into(), name.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"items": {items}, "items_per_page": 25, "page": 1, "total_items": {}}}"#,
            usize::from(id.is_some())
        ))
        .create_async()
        .await
}

/// `GET /api/v2/versions?project_id=<id>` answering with `stable_versions`
pub async fn mock_versions(server: &mut ServerGuard, id: u64, stable: &[&str]) -> Mock {
    let stable = serde_json::to_string(stable).unwrap();

    server
        .mock("GET", "/api/v2/versions")
        .match_query(Matcher::UrlEncoded("project_id".into(), id.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"latest_version": null, "versions": {stable}, "stable_versions": {stable}}}"#
        ))
        .create_async()
        .await
}
