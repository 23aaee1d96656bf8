//! Google Generative Language REST backend.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{prompts, Analyst, CallAnalysis, InterviewSummary, ProcessAnalysis};
use crate::config::{AiConfig, Config};
use crate::error::AnalysisError;
use crate::model::LegalProcess;

#[derive(Clone)]
pub struct GeminiAnalyst {
  http: reqwest::Client,
  endpoint: String,
  key: Option<String>,
  fast_model: String,
  pro_model: String,
}

impl GeminiAnalyst {
  /// Build from configuration. A missing key is not an error here; each
  /// request reports it instead, so call triage can still fall back.
  pub fn new(config: &AiConfig) -> Result<Self> {
    Self::with_key(config, Config::get_ai_key())
  }

  pub fn with_key(config: &AiConfig, key: Option<String>) -> Result<Self> {
    let http = reqwest::Client::builder()
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      endpoint: config.endpoint().trim_end_matches('/').to_string(),
      key,
      fast_model: config.fast_model.clone(),
      pro_model: config.pro_model.clone(),
    })
  }

  async fn generate<T: DeserializeOwned>(
    &self,
    model: &str,
    prompt: String,
    schema: Value,
  ) -> Result<T, AnalysisError> {
    let key = self.key.as_deref().ok_or(AnalysisError::MissingKey)?;
    let url = format!("{}/models/{}:generateContent", self.endpoint, model);
    let body = json!({
      "contents": [{ "parts": [{ "text": prompt }] }],
      "generationConfig": {
        "responseMimeType": "application/json",
        "responseSchema": schema,
      }
    });

    debug!(model, "requesting generation");
    let response = self
      .http
      .post(url)
      .header("x-goog-api-key", key)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(AnalysisError::Status {
        status: status.as_u16(),
        body,
      });
    }

    let reply: GenerateResponse = response.json().await?;
    decode_reply(reply)
  }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
  text: Option<String>,
}

/// Decode the first candidate's first text part as `T`.
fn decode_reply<T: DeserializeOwned>(reply: GenerateResponse) -> Result<T, AnalysisError> {
  let text = reply
    .candidates
    .into_iter()
    .next()
    .and_then(|c| c.content)
    .and_then(|c| c.parts.into_iter().next())
    .and_then(|p| p.text)
    .filter(|t| !t.trim().is_empty())
    .ok_or(AnalysisError::Empty)?;
  Ok(serde_json::from_str(text.trim())?)
}

#[async_trait]
impl Analyst for GeminiAnalyst {
  async fn analyze_call(&self, information: &str) -> Result<CallAnalysis, AnalysisError> {
    let analysis: CallAnalysis = self
      .generate(
        &self.fast_model,
        prompts::call_triage(information),
        prompts::call_triage_schema(),
      )
      .await?;
    info!(priority = analysis.priority.label(), category = %analysis.category, "call analyzed");
    Ok(analysis)
  }

  async fn summarize_interview(&self, notes: &str) -> Result<InterviewSummary, AnalysisError> {
    let summary: InterviewSummary = self
      .generate(
        &self.fast_model,
        prompts::interview_summary(notes),
        prompts::interview_summary_schema(),
      )
      .await?;
    info!(urgency = summary.urgency_score, "interview summarized");
    Ok(summary)
  }

  async fn analyze_process(
    &self,
    process: &LegalProcess,
  ) -> Result<ProcessAnalysis, AnalysisError> {
    let analysis: ProcessAnalysis = self
      .generate(
        &self.pro_model,
        prompts::process_review(process),
        prompts::process_review_schema(),
      )
      .await?;
    info!(process = %process.id, options = analysis.strategic_options.len(), "process analyzed");
    Ok(analysis)
  }
}
