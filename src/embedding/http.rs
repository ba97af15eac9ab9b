//! OpenAI-compatible `/embeddings` provider.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_PROVIDER_REQUEST_TIMEOUT, DEFAULT_RETRY_AFTER,
};

const EMBEDDINGS_PATH: &str = "embeddings";
const MODELS_PATH: &str = "models";
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Connection settings for [`HttpEmbeddingProvider`].
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// API base, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl HttpProviderConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            dimension: DEFAULT_EMBEDDING_DIM,
            request_timeout: DEFAULT_PROVIDER_REQUEST_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding provider speaking the OpenAI embeddings wire format.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingProvider {
    client: Client,
    embeddings_url: String,
    models_url: String,
    model: String,
    dimension: usize,
}

impl HttpEmbeddingProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self, EmbeddingError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                EmbeddingError::provider("configure", format!("invalid api key: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                EmbeddingError::provider("configure", format!("client build failed: {e}"))
            })?;

        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            embeddings_url: format!("{base}/{EMBEDDINGS_PATH}"),
            models_url: format!("{base}/{MODELS_PATH}"),
            model: config.model,
            dimension: config.dimension,
        })
    }

    fn decode(
        &self,
        body: EmbeddingsResponse,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut data = body.data;
        if data.len() != expected {
            return Err(EmbeddingError::malformed(format!(
                "expected {expected} embeddings, got {}",
                data.len()
            )));
        }

        data.sort_by_key(|d| d.index);
        for (position, datum) in data.iter().enumerate() {
            if datum.index != position {
                return Err(EmbeddingError::malformed(format!(
                    "missing embedding for input {position}"
                )));
            }
            if datum.embedding.len() != self.dimension {
                return Err(EmbeddingError::malformed(format!(
                    "expected dimension {}, got {}",
                    self.dimension,
                    datum.embedding.len()
                )));
            }
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

impl EmbeddingProvider for HttpEmbeddingProvider {
    #[instrument(skip(self, texts), fields(model = %self.model, count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let payload = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&self.embeddings_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_transport_error("embed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_http_error("embed", response).await);
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::malformed(format!("response decode: {e}")))?;

        let vectors = self.decode(body, texts.len())?;
        debug!(status = status.as_u16(), "embeddings received");
        Ok(vectors)
    }

    async fn probe(&self) -> Result<(), EmbeddingError> {
        let response = self
            .client
            .get(&self.models_url)
            .send()
            .await
            .map_err(|e| map_transport_error("probe", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(map_http_error("probe", response).await)
        }
    }

    fn version(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn map_transport_error(operation: &'static str, err: reqwest::Error) -> EmbeddingError {
    if err.is_timeout() {
        EmbeddingError::provider(operation, "request timed out")
    } else {
        EmbeddingError::provider(operation, format!("request error: {err}"))
    }
}

async fn map_http_error(operation: &'static str, response: Response) -> EmbeddingError {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return EmbeddingError::RateLimited {
            retry_after: parse_retry_after(response.headers()).unwrap_or(DEFAULT_RETRY_AFTER),
        };
    }

    let body: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect();

    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::PAYLOAD_TOO_LARGE
        | StatusCode::UNPROCESSABLE_ENTITY => EmbeddingError::generation(format!(
            "provider rejected input ({}): {body}",
            status.as_u16()
        )),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbeddingError::provider(
            operation,
            format!("auth failed ({}): {body}", status.as_u16()),
        ),
        _ => EmbeddingError::provider(operation, format!("status {}: {body}", status.as_u16())),
    }
}

/// Reads `Retry-After` as delta-seconds (integer or fractional).
pub(super) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    let secs: f64 = raw.parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then(|| Duration::from_secs_f64(secs))
}
