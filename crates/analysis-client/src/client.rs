//! HTTP client for the analysis service

use crate::auth::{StaticToken, TokenProvider};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::race::{race_preview, RaceState};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared_types::{bearer, failure_message, truncate_chars, ApiResult, Endpoint, Summary};
use std::path::Path;
use std::sync::Arc;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub status: u16,
    pub body: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The summary endpoint answers either `{summary: {...}}` or the bare summary
#[derive(Deserialize)]
#[serde(untagged)]
enum SummaryBody {
    Wrapped { summary: Summary },
    Bare(Summary),
}

impl From<SummaryBody> for Summary {
    fn from(body: SummaryBody) -> Self {
        match body {
            SummaryBody::Wrapped { summary } => summary,
            SummaryBody::Bare(summary) => summary,
        }
    }
}

#[derive(Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl AnalysisClient {
    /// Client using the configured static token, if any
    pub fn new(config: ClientConfig) -> Self {
        let tokens = config
            .api_token
            .clone()
            .map(|t| Arc::new(StaticToken::new(t)) as Arc<dyn TokenProvider>);
        Self {
            http: reqwest::Client::new(),
            config,
            tokens,
        }
    }

    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(provider);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn health(&self) -> Result<Health> {
        let response = self
            .http
            .get(Endpoint::Health.url(&self.config.api_base))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Health check: {} {}", status, body);
        Ok(Health { status, body })
    }

    /// Analyze pasted text, sent as `{"text": ...}` to the JSON endpoint
    pub async fn analyze_text(&self, text: &str) -> Result<ApiResult> {
        let text = self.prepare_text(text)?;
        let request = self
            .post(Endpoint::Analyze)
            .await?
            .json(&serde_json::json!({ "text": text }));
        self.send_json(request).await
    }

    /// Analyze text sent as a raw `text/plain` body. The raw endpoint takes
    /// the whole body as the document, so it must never carry JSON.
    pub async fn analyze_plain(&self, text: &str) -> Result<ApiResult> {
        let text = self.prepare_text(text)?.to_string();
        let request = self
            .post(Endpoint::AnalyzeRaw)
            .await?
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text);
        self.send_json(request).await
    }

    pub async fn analyze_file(&self, path: &Path) -> Result<ApiResult> {
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ClientError::EmptyInput
            } else {
                ClientError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.analyze_file_bytes(&file_name, bytes).await
    }

    /// Upload a document as multipart field `file`
    pub async fn analyze_file_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<ApiResult> {
        if bytes.is_empty() {
            return Err(ClientError::EmptyInput);
        }
        if bytes.len() > shared_types::MAX_UPLOAD_BYTES {
            return Err(ClientError::TooLarge {
                size: bytes.len(),
                limit: shared_types::MAX_UPLOAD_BYTES,
            });
        }

        tracing::info!("Uploading {} ({} bytes)", file_name, bytes.len());
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let request = self.post(Endpoint::AnalyzeFile).await?.multipart(form);
        self.send_json(request).await
    }

    /// Fast summary-only analysis
    pub async fn analyze_summary(&self, text: &str) -> Result<Summary> {
        let text = self.prepare_text(text)?;
        let request = self
            .post(Endpoint::AnalyzeSummary)
            .await?
            .json(&serde_json::json!({ "text": text }));
        let body: SummaryBody = self.send_json(request).await?;
        Ok(body.into())
    }

    /// Run the full analysis with a summary preview alongside it.
    ///
    /// `on_state` sees every accepted transition. The preview request is
    /// dropped once the full result arrives.
    pub async fn analyze_with_preview<F>(&self, text: &str, on_state: F) -> Result<ApiResult>
    where
        F: FnMut(&RaceState),
    {
        self.prepare_text(text)?;
        race_preview(self.analyze_summary(text), self.analyze_text(text), on_state).await
    }

    fn prepare_text<'t>(&self, text: &'t str) -> Result<&'t str> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyInput);
        }
        let truncated = truncate_chars(text, self.config.max_chars);
        if truncated.len() < text.len() {
            tracing::warn!(
                "Text truncated to {} characters before analysis",
                self.config.max_chars
            );
        }
        Ok(truncated)
    }

    async fn post(&self, endpoint: Endpoint) -> Result<RequestBuilder> {
        let mut request = self.http.post(endpoint.url(&self.config.api_base));
        if endpoint.requires_auth() {
            let provider = self
                .tokens
                .as_ref()
                .ok_or_else(|| ClientError::Auth("not signed in".to_string()))?;
            let token = provider.token().await?;
            request = request.header(AUTHORIZATION, bearer(&token));
        }
        Ok(request)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Undecodable analysis response: {}", e);
            ClientError::Decode(e.to_string())
        })
    }
}

/// Turn a non-2xx response into `ClientError::Http`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();
    let message = failure_message(
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        content_type.as_deref(),
        &body,
    );
    tracing::warn!("Analysis request failed: {}", message);

    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}
