//! Outbound call to the natural-language generation service.
//!
//! The client owns authentication, the request timeout and transport failures.
//! It never retries; a failed call surfaces to the caller as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompt::Prompt;
use crate::config::GenerationConfig;

/// Error raised while obtaining raw text from the generation service.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation credential is not configured")]
    MissingCredential,
    #[error("generation client could not be initialised: {0}")]
    Client(#[source] reqwest::Error),
    #[error("generation service failed{}", status_suffix(.status))]
    Upstream { status: Option<u16>, body: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {code}"),
        None => String::new(),
    }
}

impl GenerationError {
    /// Configuration problems are detected before any network traffic.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::Client(_))
    }
}

/// Seam between the pipeline and the generation transport.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Messages-style HTTP client backed by `reqwest`.
pub struct HttpGenerationClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl HttpGenerationClient {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerationError::Client)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: &prompt.instructions,
            messages: [UserMessage {
                role: "user",
                content: &prompt.task,
            }],
        };

        debug!(endpoint = %self.config.endpoint, model = %self.config.model, "requesting plan generation");
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generation service returned an error status");
            return Err(GenerationError::Upstream {
                status: Some(status.as_u16()),
                body,
            });
        }

        let payload: MessagesResponse = response.json().await.map_err(transport_error)?;
        payload
            .content
            .into_iter()
            .find(|block| block.kind == "text" || block.kind.is_empty())
            .and_then(|block| block.text)
            .ok_or_else(|| GenerationError::Upstream {
                status: Some(status.as_u16()),
                body: "response carried no text content".to_string(),
            })
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    };
    GenerationError::Upstream {
        status: err.status().map(|status| status.as_u16()),
        body: reason,
    }
}
