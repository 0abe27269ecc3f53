//! Sentence embedding clients.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::JobsError;
use crate::rate_limit::check_response;

pub const DEFAULT_EMBEDDING_MODEL: &str = "paraphrase-multilingual-MiniLM-L12-v2";
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:8080/v1";

/// Turns texts into fixed-size vectors, one per input, in input order.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn embed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, JobsError>> + Send + 'a>>;
}

/// Settings for [`HttpEmbedder`].
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API; `/embeddings` is appended.
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Texts per request.
    pub batch_size: usize,
    pub timeout: Duration,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_EMBEDDING_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            batch_size: 32,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

/// Client for an OpenAI-compatible `POST /embeddings` endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: EmbeddingConfig,
}

impl HttpEmbedder {
    pub fn new(config: EmbeddingConfig) -> Self {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.url.trim_end_matches('/'))
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, JobsError> {
        let mut req = self
            .client
            .post(self.endpoint())
            .timeout(self.config.timeout)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input: batch,
            });
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        check_response(&resp)?;
        let body = resp.text().await?;
        parse_embedding_response(&body, batch.len())
    }
}

impl Embedder for HttpEmbedder {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn embed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, JobsError>> + Send + 'a>> {
        Box::pin(async move {
            let mut vectors = Vec::with_capacity(texts.len());
            for batch in texts.chunks(self.config.batch_size.max(1)) {
                tracing::debug!(model = %self.config.model, batch = batch.len(), "embedding batch");
                vectors.extend(self.embed_batch(batch).await?);
            }
            Ok(vectors)
        })
    }
}

/// Decode an embeddings response body, restoring input order by `index`.
///
/// The number of vectors must equal `expected`.
pub fn parse_embedding_response(body: &str, expected: usize) -> Result<Vec<Vec<f32>>, JobsError> {
    let parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| JobsError::Embedding(format!("invalid response: {}", e)))?;

    if parsed.data.len() != expected {
        return Err(JobsError::Embedding(format!(
            "expected {} embeddings, got {}",
            expected,
            parsed.data.len()
        )));
    }

    let mut items = parsed.data;
    if items.iter().all(|item| item.index.is_some()) {
        items.sort_by_key(|item| item.index);
    }
    Ok(items.into_iter().map(|item| item.embedding).collect())
}

/// Deterministic bag-of-words embedder for tests and offline runs.
///
/// Each dimension counts case-insensitive occurrences of one vocabulary
/// term in the text.
pub struct MockEmbedder {
    vocabulary: Vec<String>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|t| t.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.vocabulary
            .iter()
            .map(|term| lower.matches(term.as_str()).count() as f32)
            .collect()
    }
}

impl Embedder for MockEmbedder {
    fn name(&self) -> &str {
        "mock"
    }

    fn embed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, JobsError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { Ok(texts.iter().map(|t| self.vector(t)).collect()) })
    }
}
