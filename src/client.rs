use async_trait::async_trait;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::FetchError;

/// An outbound POST. Method is implied; the pipeline never sends anything
/// else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single network capability the pipeline depends on.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// Production client. No timeout is configured; a request resolves or fails
/// on the transport's terms.
pub struct ReqwestClient {
    http: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("leetstats/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let start_time = Instant::now();
        info!(action = "start", component = "http_client", url = %request.url, body_bytes = request.body.len(), "Sending request");

        let mut builder = self.http.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(classify_reqwest_error)?
            .to_vec();

        info!(
            action = "complete",
            component = "http_client",
            status,
            body_bytes = body.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Response received"
        );
        Ok(HttpResponse { status, body })
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> FetchError {
    warn!(action = "send", component = "http_client", error = %e, "Request failed");
    if e.is_connect() {
        FetchError::Transport(format!("Connection failed: {}", e))
    } else if e.is_request() || e.is_builder() {
        FetchError::Transport(format!("Request error: {}", e))
    } else {
        FetchError::Transport(format!("Network error: {}", e))
    }
}
