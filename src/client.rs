//! HTTP client for a remote rendering server.

use http::header::{self, HeaderMap, HeaderName};
use http::StatusCode;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::error::BoxError;
use crate::reporting::{BoxFuture, RenderResult, ReportingService};
use crate::request::RenderPayload;

/// Path of the render endpoint, relative to the server's base URL.
const REPORT_PATH: &str = "api/report";

/// Errors returned by [`HttpReportingService`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL could not be parsed.
    #[error("invalid rendering server url: {0}")]
    Url(#[from] url::ParseError),

    /// The request could not be sent or the reply could not be read.
    #[error("rendering server request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("rendering server returned {status}: {body}")]
    Status {
        /// Status of the reply.
        status: StatusCode,
        /// Body of the reply, usually the server's error message.
        body: String,
    },
}

/// [`ReportingService`] that posts payloads to a rendering server as JSON.
#[derive(Debug, Clone)]
pub struct HttpReportingService {
    client: reqwest::Client,
    endpoint: Url,
    credentials: Option<(String, String)>,
    timeout: Option<Duration>,
}

impl HttpReportingService {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: report_endpoint(base_url)?,
            credentials: None,
            timeout: None,
        })
    }

    /// Uses an existing reqwest client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Authenticates with basic auth.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Fails render calls that take longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the URL payloads are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, payload: RenderPayload) -> Result<RenderResult, ClientError> {
        let mut request = self.client.post(self.endpoint.clone()).json(&payload);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let (headers, content_headers) = split_headers(response.headers());
        let media_type = media_type(&content_headers);
        let content = response.bytes().await?;

        Ok(RenderResult {
            status,
            media_type,
            headers,
            content_headers,
            content,
        })
    }
}

impl ReportingService for HttpReportingService {
    fn render(&self, payload: RenderPayload) -> BoxFuture<'static, Result<RenderResult, BoxError>> {
        let this = self.clone();
        Box::pin(async move { this.send(payload).await.map_err(BoxError::from) })
    }
}

fn report_endpoint(base_url: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(REPORT_PATH)
}

/// Splits reply headers into response-level and content-level sets.
fn split_headers(headers: &HeaderMap) -> (HeaderMap, HeaderMap) {
    let mut response_headers = HeaderMap::new();
    let mut content_headers = HeaderMap::new();

    for (name, value) in headers {
        let target = if is_content_header(name) {
            &mut content_headers
        } else {
            &mut response_headers
        };
        target.append(name.clone(), value.clone());
    }

    (response_headers, content_headers)
}

fn is_content_header(name: &HeaderName) -> bool {
    name.as_str().starts_with("content-")
        || *name == header::ALLOW
        || *name == header::EXPIRES
        || *name == header::LAST_MODIFIED
}

/// Extracts the media type, without parameters, from `content-type`.
fn media_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("application/octet-stream")
        .to_owned()
}
