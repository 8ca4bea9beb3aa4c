//! Shared HTTP client
//!
//! Transport failures (connect, timeout, body) are retried under the
//! configured policy. Status codes are never retried; callers check them
//! with [`require_ok`].

use bine_core::retry::{ClosurePredicate, RetryExecutor};
use bine_core::types::RetryPolicy;
use bine_core::{Error, Result, RuntimeConfig};
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// `reqwest::Client` plus the retry policy applied to every GET
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    retry_policy: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.network.user_agent)
            .timeout(Duration::from_secs(config.network.http_timeout_secs))
            .build()
            .map_err(|e| Error::network("client", e))?;

        Ok(Self {
            client,
            retry_policy: config.retry.clone(),
        })
    }

    /// GET `url` with extra headers, retrying transport failures
    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        debug!(url = %url, "GET");

        let executor = RetryExecutor::new(self.retry_policy.clone())
            .named("http-get")
            .with_predicate(ClosurePredicate::new(is_transient));

        executor
            .execute(|| self.client.get(url).headers(headers.clone()).send())
            .await
            .map_err(|e| match e.into_source() {
                Some(source) => Error::network(url, source),
                None => Error::network(url, "no request attempts allowed by retry policy"),
            })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
}

/// Fail with `UpstreamStatusError` unless the response is `200 OK`
pub fn require_ok(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        Ok(response)
    } else {
        Err(Error::upstream_status(url, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bine_core::types::RetryStrategy;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.retry.strategy = RetryStrategy::None;
        config.network.http_timeout_secs = 5;
        config
    }

    #[tokio::test]
    async fn test_get_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .and(header("x-test", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-test", "1".parse().unwrap());

        let url = format!("{}/ok", server.uri());
        let resp = require_ok(&url, client.get(&url, headers).await.unwrap()).unwrap();
        assert_eq!(resp.text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config()).unwrap();
        let url = format!("{}/missing", server.uri());
        let resp = client.get(&url, HeaderMap::new()).await.unwrap();

        let err = require_ok(&url, resp).unwrap_err();
        match err {
            Error::UpstreamStatusError { status, .. } => assert!(status.contains("404")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_connect_failure_is_network_error() {
        let mut config = config();
        config.retry.max_attempts = 2;
        let client = HttpClient::new(&config).unwrap();

        // Nothing listens on port 9 of the loopback interface.
        let err = client
            .get("http://127.0.0.1:9/unreachable", HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NetworkFailure { .. }));
    }
}
