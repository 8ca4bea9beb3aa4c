//! Mock server helpers for release listing and package index pages

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Release JSON object as returned by the GitHub API
pub fn release(tag: &str, prerelease: bool) -> Value {
    json!({
        "tag_name": tag,
        "name": tag,
        "prerelease": prerelease,
        "draft": false,
        "assets": [],
    })
}

/// Serve `releases` at `/repos/{owner}/{repo}/releases`
pub async fn mock_releases(server: &MockServer, owner: &str, repo: &str, releases: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/releases", owner, repo)))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(releases)))
        .mount(server)
        .await;
}

/// Serve a versions tab listing `versions` (newest first) for `package`
pub async fn mock_package_versions(server: &MockServer, package: &str, versions: &[&str]) {
    let links: String = versions
        .iter()
        .map(|v| format!(r#"<a class="js-versionLink" href="/{package}@{v}">{v}</a>"#))
        .collect::<Vec<_>>()
        .join("\n");
    let body = format!("<html><body>{}</body></html>", links);

    Mock::given(method("GET"))
        .and(path(format!("/{}", package)))
        .and(query_param("tab", "versions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Answer GET `route` with `status`
pub async fn mock_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
