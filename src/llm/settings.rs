// src/llm/settings.rs

//! Router configuration: environment-sourced tier settings and the fixed
//! cloud-fallback table.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default endpoint for the cloud fallback tiers.
pub const DEFAULT_CLOUD_BASE_URL: &str = "https://api.deepseek.com";

/// Base URL for the hosted-inference last resort.
pub const HOSTED_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

const DEFAULT_PRIMARY_TIMEOUT_MS: u64 = 180_000;
const DEFAULT_HOSTED_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_HOSTED_MODEL: &str = "deepseek-ai/deepseek-coder-1.3b-instruct";

/// Cloud fallback models in priority order, fastest and cheapest first.
/// Appended only when the primary endpoint is a local relay; each entry has
/// its own timeout budget, much longer for the largest model.
const CLOUD_FALLBACKS: &[(&str, u64)] = &[
    ("deepseek-chat", 60_000),
    ("deepseek-reasoner", 300_000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    /// OpenAI-style `POST {base}/chat/completions`.
    ChatCompletions,
    /// HuggingFace text-generation endpoint.
    HostedInference,
}

/// One candidate backend in the fallback order.
#[derive(Debug, Clone)]
pub struct Tier {
    pub name: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub kind: TierKind,
    pub is_local_relay: bool,
}

/// Generation parameter defaults, applied when a request omits them. Tuned
/// for deterministic code-like output; kept in configuration so operators
/// can adjust them via `config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct GenerationDefaults {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        GenerationDefaults {
            max_tokens: 8192,
            temperature: 0.6,
            top_p: 0.95,
            frequency_penalty: 0.1,
            presence_penalty: 0.1,
        }
    }
}

/// Environment-sourced router settings.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub primary_base_url: Option<String>,
    pub primary_model: Option<String>,
    pub primary_api_key: Option<String>,
    pub primary_timeout_ms: u64,
    pub cloud_base_url: String,
    pub cloud_api_key: Option<String>,
    pub hosted_enabled: bool,
    pub hosted_api_key: Option<String>,
    pub hosted_model: String,
    pub hosted_timeout_ms: u64,
}

impl RouterSettings {
    pub fn from_env() -> Self {
        RouterSettings {
            primary_base_url: env_opt("PRIMARY_LLM_BASE_URL"),
            primary_model: env_opt("PRIMARY_LLM_MODEL"),
            primary_api_key: env_opt("PRIMARY_LLM_API_KEY"),
            primary_timeout_ms: env_ms("PRIMARY_LLM_TIMEOUT_MS", DEFAULT_PRIMARY_TIMEOUT_MS),
            cloud_base_url: env_opt("CLOUD_LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CLOUD_BASE_URL.to_string()),
            cloud_api_key: env_opt("CLOUD_LLM_API_KEY"),
            hosted_enabled: env::var("HF_FALLBACK_ENABLED")
                .map(|v| v != "false")
                .unwrap_or(true),
            hosted_api_key: env_opt("HF_FALLBACK_API_KEY"),
            hosted_model: env_opt("HF_FALLBACK_MODEL")
                .unwrap_or_else(|| DEFAULT_HOSTED_MODEL.to_string()),
            hosted_timeout_ms: env_ms("HF_FALLBACK_TIMEOUT_MS", DEFAULT_HOSTED_TIMEOUT_MS),
        }
    }

    /// Builds the ordered tier list. Tier 0 is the primary endpoint; a
    /// local-relay primary gets the cloud fallbacks appended (skipping any
    /// entry duplicating the primary's model); the hosted-inference last
    /// resort, when enabled with a credential, always goes last.
    pub fn build_tiers(&self) -> Vec<Tier> {
        let mut tiers = Vec::new();

        if let (Some(url), Some(model)) = (&self.primary_base_url, &self.primary_model) {
            let local = is_local_relay(url);
            tiers.push(Tier {
                name: if local {
                    "primary (local relay)".to_string()
                } else {
                    "primary".to_string()
                },
                base_url: Some(url.clone()),
                api_key: self.primary_api_key.clone(),
                model: model.clone(),
                timeout: Duration::from_millis(self.primary_timeout_ms),
                kind: TierKind::ChatCompletions,
                is_local_relay: local,
            });

            if local {
                for (fallback_model, timeout_ms) in CLOUD_FALLBACKS {
                    if fallback_model == model {
                        continue;
                    }
                    tiers.push(Tier {
                        name: format!("cloud fallback ({})", fallback_model),
                        base_url: Some(self.cloud_base_url.clone()),
                        api_key: self
                            .cloud_api_key
                            .clone()
                            .or_else(|| self.primary_api_key.clone()),
                        model: fallback_model.to_string(),
                        timeout: Duration::from_millis(*timeout_ms),
                        kind: TierKind::ChatCompletions,
                        is_local_relay: false,
                    });
                }
            }
        }

        if self.hosted_enabled && self.hosted_api_key.is_some() {
            tiers.push(Tier {
                name: format!("hosted inference ({})", self.hosted_model),
                base_url: None,
                api_key: self.hosted_api_key.clone(),
                model: self.hosted_model.clone(),
                timeout: Duration::from_millis(self.hosted_timeout_ms),
                kind: TierKind::HostedInference,
                is_local_relay: false,
            });
        }

        tiers
    }
}

fn is_local_relay(url: &str) -> bool {
    url.contains("localhost") || url.contains("127.0.0.1")
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_ms(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> RouterSettings {
        RouterSettings {
            primary_base_url: None,
            primary_model: None,
            primary_api_key: None,
            primary_timeout_ms: DEFAULT_PRIMARY_TIMEOUT_MS,
            cloud_base_url: DEFAULT_CLOUD_BASE_URL.to_string(),
            cloud_api_key: None,
            hosted_enabled: true,
            hosted_api_key: None,
            hosted_model: DEFAULT_HOSTED_MODEL.to_string(),
            hosted_timeout_ms: DEFAULT_HOSTED_TIMEOUT_MS,
        }
    }

    #[test]
    fn no_configuration_means_no_tiers() {
        assert!(base_settings().build_tiers().is_empty());
    }

    #[test]
    fn remote_primary_gets_no_cloud_fallbacks() {
        let mut settings = base_settings();
        settings.primary_base_url = Some("https://api.example.com/v1".to_string());
        settings.primary_model = Some("some-model".to_string());

        let tiers = settings.build_tiers();
        assert_eq!(tiers.len(), 1);
        assert!(!tiers[0].is_local_relay);
    }

    #[test]
    fn local_relay_primary_appends_cloud_fallbacks_in_order() {
        let mut settings = base_settings();
        settings.primary_base_url = Some("http://localhost:11434/v1".to_string());
        settings.primary_model = Some("deepseek-v3".to_string());

        let tiers = settings.build_tiers();
        assert_eq!(tiers.len(), 1 + CLOUD_FALLBACKS.len());
        assert!(tiers[0].is_local_relay);
        assert_eq!(tiers[1].model, "deepseek-chat");
        assert_eq!(tiers[2].model, "deepseek-reasoner");
        assert!(tiers[1].timeout < tiers[2].timeout);
    }

    #[test]
    fn cloud_fallback_duplicating_primary_model_is_skipped() {
        let mut settings = base_settings();
        settings.primary_base_url = Some("http://127.0.0.1:11434/v1".to_string());
        settings.primary_model = Some("deepseek-chat".to_string());

        let tiers = settings.build_tiers();
        assert_eq!(tiers.len(), 1 + CLOUD_FALLBACKS.len() - 1);
        assert!(tiers.iter().skip(1).all(|t| t.model != "deepseek-chat"));
    }

    #[test]
    fn hosted_fallback_is_always_last() {
        let mut settings = base_settings();
        settings.primary_base_url = Some("http://localhost:11434/v1".to_string());
        settings.primary_model = Some("deepseek-v3".to_string());
        settings.hosted_api_key = Some("hf_token".to_string());

        let tiers = settings.build_tiers();
        let last = tiers.last().unwrap();
        assert_eq!(last.kind, TierKind::HostedInference);
        assert_eq!(last.model, DEFAULT_HOSTED_MODEL);
    }

    #[test]
    fn hosted_fallback_requires_enable_and_credential() {
        let mut settings = base_settings();
        settings.hosted_api_key = Some("hf_token".to_string());
        settings.hosted_enabled = false;
        assert!(settings.build_tiers().is_empty());

        settings.hosted_enabled = true;
        settings.hosted_api_key = None;
        assert!(settings.build_tiers().is_empty());
    }
}
