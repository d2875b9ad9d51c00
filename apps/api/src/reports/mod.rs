//! Brand sentiment analysis report generation, proxied through `llm_client`.

pub mod handlers;
pub mod prompts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmProvider};
use crate::reports::prompts::{BSA_REPORT_PROMPT_TEMPLATE, BSA_REPORT_SYSTEM};

/// Request body for `POST /api/v1/reports/generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub data_source: Value,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub quarter: String,
    #[serde(deserialize_with = "year_from_number_or_string")]
    pub year: i32,
    #[serde(default)]
    pub llm_type: String,
    #[serde(default)]
    pub llm_api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub report: String,
    pub client_name: String,
    pub quarter: String,
    pub year: i32,
    pub generated_at: DateTime<Utc>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReport {
    pub provider: LlmProvider,
    pub api_key: String,
    pub client_name: String,
    pub quarter: String,
    pub year: i32,
    pub data_source: String,
}

impl ReportRequest {
    pub fn validate(self) -> Result<ValidatedReport, AppError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(AppError::Validation("llmApiKey is required".to_string()));
        }
        if self.client_name.trim().is_empty() {
            return Err(AppError::Validation("clientName is required".to_string()));
        }
        let provider: LlmProvider = self.llm_type.parse()?;
        let quarter = normalize_quarter(&self.quarter)?;
        if !(2000..=2100).contains(&self.year) {
            return Err(AppError::Validation(format!("invalid year: {}", self.year)));
        }
        let data_source = render_data_source(&self.data_source);
        if data_source.trim().is_empty() {
            return Err(AppError::Validation("dataSource is required".to_string()));
        }

        Ok(ValidatedReport {
            provider,
            api_key: self.llm_api_key.trim().to_string(),
            client_name: self.client_name.trim().to_string(),
            quarter,
            year: self.year,
            data_source,
        })
    }
}

/// "q3", "3" and "Q3" all become "Q3".
fn normalize_quarter(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('Q')
        .or_else(|| trimmed.strip_prefix('q'))
        .unwrap_or(trimmed);
    match digits {
        "1" | "2" | "3" | "4" => Ok(format!("Q{digits}")),
        _ => Err(AppError::Validation(format!(
            "quarter must be Q1-Q4, got '{raw}'"
        ))),
    }
}

fn render_data_source(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

fn year_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i32),
        Text(String),
    }

    match Year::deserialize(deserializer)? {
        Year::Number(n) => Ok(n),
        Year::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub fn build_report_prompt(report: &ValidatedReport) -> String {
    BSA_REPORT_PROMPT_TEMPLATE
        .replace("{client_name}", &report.client_name)
        .replace("{quarter}", &report.quarter)
        .replace("{year}", &report.year.to_string())
        .replace("{data_source}", &report.data_source)
}

/// Validates, prompts the chosen provider once, and wraps the text.
pub async fn generate_report(
    llm: &LlmClient,
    request: ReportRequest,
) -> Result<ReportResponse, AppError> {
    let report = request.validate()?;
    info!(
        "Generating {} {} report for '{}' via {}",
        report.quarter,
        report.year,
        report.client_name,
        report.provider.as_str()
    );

    let prompt = build_report_prompt(&report);
    let text = llm
        .complete(report.provider, &report.api_key, BSA_REPORT_SYSTEM, &prompt)
        .await?;

    Ok(ReportResponse {
        report: text,
        client_name: report.client_name,
        quarter: report.quarter,
        year: report.year,
        generated_at: Utc::now(),
    })
}
