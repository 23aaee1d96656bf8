//! Generative-text collaborator: call triage, interview summaries and
//! legal-process reviews.
//!
//! Results are handed back to the caller and never written to a cache or to
//! the store.

mod gemini;
mod prompts;

pub use gemini::GeminiAnalyst;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::AnalysisError;
use crate::model::{LegalProcess, Priority};

/// Category used when triage could not run.
pub const UNCATEGORIZED: &str = "Não Categorizado";

/// Suggested priority and short subject of an incoming call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAnalysis {
  pub priority: Priority,
  pub category: String,
}

impl Default for CallAnalysis {
  fn default() -> Self {
    Self {
      priority: Priority::Medium,
      category: UNCATEGORIZED.to_string(),
    }
  }
}

/// Structured digest of a prospect's interview notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
  pub summary: String,
  pub rights_found: Vec<String>,
  /// 1 (can wait) to 10 (urgent)
  #[serde(deserialize_with = "urgency")]
  pub urgency_score: u8,
  pub conversion_pitch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicOption {
  pub label: String,
  pub description: String,
}

/// Strategic review of a legal process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessAnalysis {
  pub situation_summary: String,
  pub risks: Vec<String>,
  pub suggestions: Vec<String>,
  pub strategic_options: Vec<StrategicOption>,
}

/// Clamp a model-provided score into 1..=10.
pub fn clamp_urgency(score: f64) -> u8 {
  if score.is_nan() {
    return 1;
  }
  score.round().clamp(1.0, 10.0) as u8
}

fn urgency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
  f64::deserialize(deserializer).map(clamp_urgency)
}

/// A generative-text backend.
#[async_trait]
pub trait Analyst: Send + Sync {
  async fn analyze_call(&self, information: &str) -> Result<CallAnalysis, AnalysisError>;

  async fn summarize_interview(&self, notes: &str) -> Result<InterviewSummary, AnalysisError>;

  async fn analyze_process(&self, process: &LegalProcess)
    -> Result<ProcessAnalysis, AnalysisError>;
}

/// Call analysis that never fails: any error yields the neutral default.
pub async fn triage_call(analyst: &dyn Analyst, information: &str) -> CallAnalysis {
  match analyst.analyze_call(information).await {
    Ok(analysis) => analysis,
    Err(e) => {
      warn!(error = %e, "call analysis failed, using default triage");
      CallAnalysis::default()
    }
  }
}
