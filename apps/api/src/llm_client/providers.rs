//! Provider-specific request shaping and response extraction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-1.5-pro";

const MISTRAL_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const MISTRAL_MODEL: &str = "mistral-large-latest";

const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Openai,
    Anthropic,
    Gemini,
    Mistral,
}

/// A fully shaped HTTP request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 4] = [
        LlmProvider::Openai,
        LlmProvider::Anthropic,
        LlmProvider::Gemini,
        LlmProvider::Mistral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Openai => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Gemini => "gemini",
            LlmProvider::Mistral => "mistral",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            LlmProvider::Openai => OPENAI_MODEL,
            LlmProvider::Anthropic => ANTHROPIC_MODEL,
            LlmProvider::Gemini => GEMINI_MODEL,
            LlmProvider::Mistral => MISTRAL_MODEL,
        }
    }

    fn chat_url(&self) -> &'static str {
        match self {
            LlmProvider::Mistral => MISTRAL_URL,
            _ => OPENAI_URL,
        }
    }

    pub fn build_request(&self, api_key: &str, system: &str, prompt: &str) -> ProviderRequest {
        match self {
            LlmProvider::Openai | LlmProvider::Mistral => ProviderRequest {
                url: self.chat_url().to_string(),
                headers: vec![("authorization", format!("Bearer {api_key}"))],
                body: json!({
                    "model": self.model(),
                    "temperature": TEMPERATURE,
                    "max_tokens": MAX_TOKENS,
                    "messages": [
                        { "role": "system", "content": system },
                        { "role": "user", "content": prompt }
                    ]
                }),
            },
            LlmProvider::Anthropic => ProviderRequest {
                url: ANTHROPIC_URL.to_string(),
                headers: vec![
                    ("x-api-key", api_key.to_string()),
                    ("anthropic-version", ANTHROPIC_VERSION.to_string()),
                ],
                body: json!({
                    "model": ANTHROPIC_MODEL,
                    "max_tokens": MAX_TOKENS,
                    "system": system,
                    "messages": [{ "role": "user", "content": prompt }]
                }),
            },
            LlmProvider::Gemini => ProviderRequest {
                url: format!("{GEMINI_BASE_URL}/{GEMINI_MODEL}:generateContent"),
                headers: vec![("x-goog-api-key", api_key.to_string())],
                body: json!({
                    "systemInstruction": { "parts": [{ "text": system }] },
                    "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                    "generationConfig": {
                        "temperature": TEMPERATURE,
                        "maxOutputTokens": MAX_TOKENS
                    }
                }),
            },
        }
    }

    /// Pulls the generated text out of a successful response body.
    pub fn extract_text(&self, body: &Value) -> Option<String> {
        match self {
            LlmProvider::Openai | LlmProvider::Mistral => body
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(str::to_string),
            LlmProvider::Anthropic => {
                let text: Vec<&str> = body
                    .get("content")?
                    .as_array()?
                    .iter()
                    .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
                    .filter_map(|block| block.get("text").and_then(Value::as_str))
                    .collect();
                (!text.is_empty()).then(|| text.join(""))
            }
            LlmProvider::Gemini => {
                let text: Vec<&str> = body
                    .pointer("/candidates/0/content/parts")?
                    .as_array()?
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect();
                (!text.is_empty()).then(|| text.join(""))
            }
        }
    }

    /// Best-effort error message from a non-2xx body; falls back to the raw body.
    pub fn error_message(&self, body: &str) -> String {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed.as_ref().and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .or_else(|| v.get("detail"))
                .and_then(Value::as_str)
        });
        match message {
            Some(m) => m.to_string(),
            None if body.trim().is_empty() => format!("{} request failed", self.as_str()),
            None => body.to_string(),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        match needle.as_str() {
            "openai" | "gpt" => Ok(LlmProvider::Openai),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "mistral" => Ok(LlmProvider::Mistral),
            _ => Err(AppError::Validation(format!(
                "unsupported llmType '{s}'; expected one of {}",
                LlmProvider::ALL.map(|p| p.as_str()).join(", ")
            ))),
        }
    }
}
