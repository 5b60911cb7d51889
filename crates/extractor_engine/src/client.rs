use std::time::Duration;

use extractor_logging::{abbreviate, extractor_debug};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{BackendError, FailureKind, ScrapedPage};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a whole call, body included.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_bytes: 32 * 1024 * 1024,
        }
    }
}

/// The extraction service, one method per endpoint.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, BackendError>;

    /// `preloaded` must be a page previously returned by `scrape`.
    async fn extract(
        &self,
        url: &str,
        schema: &str,
        preloaded: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, BackendError>;

    /// Base64-encoded PNG of the rendered page.
    async fn screenshot(&self, url: &str) -> Result<String, BackendError>;

    async fn generate_schema(&self, query: &str) -> Result<String, BackendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Scrape,
    Extract,
    Screenshot,
    Query,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Scrape => "/api/scrape",
            Endpoint::Extract => "/api/extract",
            Endpoint::Screenshot => "/api/screenshot",
            Endpoint::Query => "/api/query",
        }
    }

    /// Shown when the backend fails without an `error` field of its own.
    fn fallback_message(self) -> &'static str {
        match self {
            Endpoint::Scrape => "Failed to scrape webpage",
            Endpoint::Extract => "Failed to fetch data",
            Endpoint::Screenshot => "Failed to get screenshot",
            Endpoint::Query => "Failed to generate schema",
        }
    }
}

#[derive(Serialize)]
struct UrlBody<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct ExtractBody<'a> {
    url: &'a str,
    schema: &'a str,
    preloaded_content: Option<&'a serde_json::Value>,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct ScreenshotReply {
    screenshot: String,
}

#[derive(Deserialize)]
struct SchemaReply {
    schema: serde_json::Value,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let base_url = Url::parse(&settings.base_url).map_err(invalid_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(client_failure)?;
        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    async fn post<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let target = self.base_url.join(endpoint.path()).map_err(invalid_url)?;
        extractor_debug!("POST {}", target);

        let response = self
            .client
            .post(target)
            .json(body)
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(endpoint, err))?;

        let status = response.status();
        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| self.map_reqwest_error(endpoint, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorReply>(&bytes)
                .ok()
                .and_then(|reply| reply.error)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| endpoint.fallback_message().to_string());
            extractor_debug!("{} answered {}: {}", endpoint.path(), status, message);
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            extractor_debug!(
                "Undecodable {} reply ({}): {}",
                endpoint.path(),
                err,
                abbreviate(&String::from_utf8_lossy(&bytes), 120)
            );
            BackendError::new(FailureKind::Decode, endpoint.fallback_message())
        })
    }

    fn too_large(&self, actual: Option<u64>) -> BackendError {
        BackendError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual,
            },
            "response too large",
        )
    }

    fn map_reqwest_error(&self, endpoint: Endpoint, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            return BackendError::new(
                FailureKind::Timeout,
                format!(
                    "request timed out after {:?}",
                    self.settings.request_timeout
                ),
            );
        }
        extractor_debug!("{} transport error: {}", endpoint.path(), err);
        BackendError::new(FailureKind::Network, endpoint.fallback_message())
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, BackendError> {
        let page: ScrapedPage = self.post(Endpoint::Scrape, &UrlBody { url }).await?;
        if !page.success {
            let message = if page.error.is_empty() {
                Endpoint::Scrape.fallback_message().to_string()
            } else {
                page.error
            };
            return Err(BackendError::new(FailureKind::Rejected, message));
        }
        Ok(page)
    }

    async fn extract(
        &self,
        url: &str,
        schema: &str,
        preloaded: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, BackendError> {
        let body = ExtractBody {
            url,
            schema,
            preloaded_content: preloaded,
        };
        self.post(Endpoint::Extract, &body).await
    }

    async fn screenshot(&self, url: &str) -> Result<String, BackendError> {
        let reply: ScreenshotReply = self.post(Endpoint::Screenshot, &UrlBody { url }).await?;
        Ok(reply.screenshot)
    }

    async fn generate_schema(&self, query: &str) -> Result<String, BackendError> {
        let reply: SchemaReply = self.post(Endpoint::Query, &QueryBody { query }).await?;
        Ok(schema_text(reply.schema))
    }
}

fn invalid_url(err: url::ParseError) -> BackendError {
    BackendError::new(FailureKind::InvalidUrl, err.to_string())
}

fn client_failure(err: reqwest::Error) -> BackendError {
    BackendError::new(FailureKind::Network, err.to_string())
}

/// The query endpoint may answer with schema text or a JSON object.
fn schema_text(schema: serde_json::Value) -> String {
    match schema {
        serde_json::Value::String(text) => text,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    }
}
