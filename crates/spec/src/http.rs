//! HTTP client shared by the GitHub client and lint downloads

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, SpecError};
use crate::targets::Downloader;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// User agent string (GitHub rejects requests without one)
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("podkit-spec/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Thin wrapper over `reqwest::Client` mapping failures onto `SpecError`
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let inner = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SpecError::from_reqwest("(client setup)", e))?;
        Ok(Self { inner })
    }

    /// GET a URL, failing on any non-success status
    pub async fn get(&self, url: &str, bearer: Option<&str>) -> Result<Response> {
        debug!("GET {}", url);
        let mut request = self.inner.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SpecError::from_reqwest(url, e))?;
        debug!("GET {} -> {}", url, response.status());

        check_status(url, response)
    }

    /// GET a URL and decode its JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<T> {
        self.get(url, bearer)
            .await?
            .json::<T>()
            .await
            .map_err(|e| SpecError::from_reqwest(url, e))
    }

    /// GET a URL and return its raw body
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .get(url, None)
            .await?
            .bytes()
            .await
            .map_err(|e| SpecError::from_reqwest(url, e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Downloader for HttpClient {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.get_bytes(url).await
    }
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if is_rate_limited(&response) {
        return Err(SpecError::RateLimited {
            url: url.to_string(),
        });
    }

    Err(SpecError::Remote {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

fn is_rate_limited(response: &Response) -> bool {
    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim() == "0")
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_get_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Foo.podspec"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Pod::Spec.new"))
            .mount(&server)
            .await;

        let body = client()
            .get_bytes(&format!("{}/Foo.podspec", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"Pod::Spec.new");
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/private"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .mount(&server)
            .await;

        let value: serde_json::Value = client()
            .get_json(&format!("{}/private", server.uri()), Some("s3cret"))
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_status_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/limited"))
            .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/throttled"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forbidden"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client();
        let err = client
            .get_bytes(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, SpecError::Remote { status: 404, .. }));

        let err = client
            .get_bytes(&format!("{}/limited", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, SpecError::RateLimited { .. }));

        let err = client
            .get_bytes(&format!("{}/throttled", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SpecError::RateLimited { ref url } if url.ends_with("/throttled")
        ));

        let err = client
            .get_bytes(&format!("{}/forbidden", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, SpecError::Remote { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = HttpClient::new(HttpConfig {
            request_timeout: Duration::from_millis(200),
            ..HttpConfig::default()
        })
        .unwrap();

        let err = client
            .get_bytes(&format!("{}/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, SpecError::Timeout { .. }));
    }
}
