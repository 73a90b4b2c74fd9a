//! Generation client. All calls to the run endpoint go through this module.
//!
//! One POST per request, no retry, no timeout. The response body is handed
//! back as a stream of decoded text chunks in arrival order.
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::generation::decode::Utf8Decoder;

/// Fixed caller identity sent with every request.
pub const DEMO_USER_ID: &str = "frontend-demo";
pub const PLAN: &str = "ALLIN";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Streamed response text, one item per decoded transport chunk.
pub type ChunkStream = BoxStream<'static, Result<String, GenerationError>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answers {
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub framework_id: String,
    pub answers: Answers,
    pub user_id: String,
    pub plan: String,
}

impl GenerationRequest {
    pub fn new(framework_id: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            framework_id: framework_id.into(),
            answers: Answers {
                keyword: keyword.into(),
            },
            user_id: DEMO_USER_ID.to_string(),
            plan: PLAN.to_string(),
        }
    }
}

/// Anything that can turn a request into a chunk stream.
/// `FormSession` holds an `Arc<dyn Generator>` so tests can swap in a fake.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn start(&self, request: &GenerationRequest) -> Result<ChunkStream, GenerationError>;
}

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    url: String,
    api_key: String,
}

impl GenerationClient {
    pub fn new(client: Client, url: String, api_key: String) -> Self {
        Self {
            client,
            url,
            api_key,
        }
    }
}

#[async_trait]
impl Generator for GenerationClient {
    async fn start(&self, request: &GenerationRequest) -> Result<ChunkStream, GenerationError> {
        debug!(
            "POST {} frameworkId={} keyword={:?}",
            self.url, request.framework_id, request.answers.keyword
        );

        let response = self
            .client
            .post(&self.url)
            .header("apikey", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Generation endpoint returned {}: {}", status, message);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes_stream().boxed();
        let chunks = stream::unfold(
            Some((bytes, Utf8Decoder::default())),
            |state| async move {
                let (mut bytes, mut decoder) = state?;
                loop {
                    match bytes.next().await {
                        Some(Ok(chunk)) => {
                            let text = decoder.push(&chunk);
                            if text.is_empty() {
                                continue;
                            }
                            return Some((Ok(text), Some((bytes, decoder))));
                        }
                        Some(Err(e)) => return Some((Err(GenerationError::Http(e)), None)),
                        None => {
                            let rest = decoder.finish();
                            if rest.is_empty() {
                                return None;
                            }
                            return Some((Ok(rest), None));
                        }
                    }
                }
            },
        );

        Ok(chunks.boxed())
    }
}
