//! Mock server helpers for downloads and release listings

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `content` at `route`, expecting exactly `times` requests
pub async fn mock_download(server: &MockServer, route: &str, content: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .expect(times)
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

pub fn release(tag: &str, prerelease: bool) -> Value {
    json!({"tag_name": tag, "prerelease": prerelease, "draft": false})
}

/// Serve a release listing for `owner/repo`
pub async fn mock_releases(server: &MockServer, owner: &str, repo: &str, releases: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/releases", owner, repo)))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(releases)))
        .mount(server)
        .await;
}
