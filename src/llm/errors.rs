// src/llm/errors.rs

use thiserror::Error;

/// One tier's failure, kept for the aggregate error summary.
#[derive(Debug, Clone)]
pub struct TierFailure {
    pub tier: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no LLM tiers configured; check PRIMARY_LLM_BASE_URL and PRIMARY_LLM_MODEL")]
    NotConfigured,
    #[error("tier '{tier}' timed out after {timeout_ms}ms")]
    TierTimeout { tier: String, timeout_ms: u64 },
    #[error("tier '{tier}' transport failure: {message}")]
    TierTransport { tier: String, message: String },
    #[error("no content returned from the model")]
    NoContent,
    #[error("all LLM tiers failed; {}", summarize(.failures))]
    AllTiersFailed { failures: Vec<TierFailure> },
}

fn summarize(failures: &[TierFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.tier, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}
