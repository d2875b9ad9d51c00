//! LLM Client: the single point of entry for every upstream model call.
//!
//! No other module talks to a provider API directly. Callers pick the
//! provider and supply the caller's own API key per request; this module
//! shapes the request for that provider, sends it once, and extracts the text.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;

pub mod providers;

pub use providers::LlmProvider;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{provider} returned empty content")]
    EmptyContent { provider: &'static str },
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => AppError::Upstream { status, message },
            other => AppError::Llm(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// Sends one completion request. Non-2xx answers come back as
    /// `LlmError::Api` carrying the provider's status and message. No retry.
    pub async fn complete(
        &self,
        provider: LlmProvider,
        api_key: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let request = provider.build_request(api_key, system, prompt);

        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = provider.error_message(&body);
            warn!("{} returned {}: {}", provider.as_str(), status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = serde_json::from_str(&body)?;
        let text = provider
            .extract_text(&json)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent {
                provider: provider.as_str(),
            })?;

        debug!(
            "{} call succeeded ({} chars)",
            provider.as_str(),
            text.len()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_becomes_upstream_passthrough() {
        let err: AppError = LlmError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        }
        .into();
        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_content_becomes_llm_error() {
        let err: AppError = LlmError::EmptyContent { provider: "gemini" }.into();
        assert!(matches!(err, AppError::Llm(msg) if msg.contains("gemini")));
    }
}
