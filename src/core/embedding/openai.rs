//! OpenAI-compatible embeddings client.
//!
//! Sends one text per request to `{base_url}/embeddings`. There is no
//! retry: a non-success status or transport error is returned to the
//! caller and ends the run.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::time::Duration;

use crate::core::config::EmbeddingConfig;
use crate::core::embedding::Embedder;
use crate::core::error::{IngestError, Result};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Async embeddings client for OpenAI-compatible endpoints
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
    strip_new_lines: bool,
}

impl OpenAiEmbedder {
    /// Build a client with an explicit API key
    pub fn new(api_key: &str, config: &EmbeddingConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(IngestError::ConfigError(format!(
                "Missing embedding API key. Set {API_KEY_ENV}."
            )));
        }
        if config.model.trim().is_empty() {
            return Err(IngestError::ConfigError(
                "Missing embedding model name".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| IngestError::ConfigError("Invalid embedding API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: endpoint_for(&config.base_url),
            model: config.model.clone(),
            dimensions: config.dimensions,
            strip_new_lines: config.strip_new_lines,
        })
    }

    /// Build a client reading the API key from `OPENAI_API_KEY`
    pub fn from_env(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = env::var(API_KEY_ENV).unwrap_or_default();
        Self::new(&api_key, config)
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn prepare_input<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.strip_new_lines && text.contains('\n') {
            Cow::Owned(text.replace('\n', " "))
        } else {
            Cow::Borrowed(text)
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = self.prepare_input(text);
        let request = EmbeddingRequest {
            model: &self.model,
            input: [input.as_ref()],
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(IngestError::EmbeddingFailed(format!(
                "{} returned {}: {}",
                self.endpoint, status, body
            )));
        }

        parse_embedding_response(&body)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}/embeddings", base_url.trim_end_matches('/'))
}

/// Extract the single embedding from a response body
fn parse_embedding_response(body: &str) -> Result<Vec<f32>> {
    let mut parsed: EmbeddingResponse = serde_json::from_str(body)?;
    parsed.data.sort_by_key(|entry| entry.index);
    let embedding = parsed
        .data
        .into_iter()
        .next()
        .map(|entry| entry.embedding)
        .ok_or_else(|| {
            IngestError::EmbeddingFailed("Response contained no embeddings".to_string())
        })?;

    if embedding.is_empty() {
        return Err(IngestError::EmbeddingFailed(
            "Response contained an empty embedding".to_string(),
        ));
    }
    Ok(embedding)
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
