// src/llm/router.rs

//! Multi-tier model router. Tiers are tried strictly in order, one in-flight
//! call at a time, each under its own timeout; the first well-formed
//! completion wins. No retries and no racing inside the router; a caller
//! that wants retries wraps the whole cascade.

use super::client::LlmClient;
use super::errors::{LlmError, TierFailure};
use super::settings::{GenerationDefaults, RouterSettings, Tier, TierKind};
use crate::models::{ChatMessage, Completion, GenerationParams};
use async_trait::async_trait;
use std::time::Instant;

/// Backend seam so tests can inject failing/succeeding tiers without a
/// network.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn call(
        &self,
        tier: &Tier,
        messages: &[ChatMessage],
        params: &GenerationParams,
        defaults: &GenerationDefaults,
    ) -> Result<Completion, LlmError>;
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn call(
        &self,
        tier: &Tier,
        messages: &[ChatMessage],
        params: &GenerationParams,
        defaults: &GenerationDefaults,
    ) -> Result<Completion, LlmError> {
        match tier.kind {
            TierKind::ChatCompletions => {
                self.chat_completion(tier, messages, params, defaults).await
            }
            TierKind::HostedInference => {
                self.hosted_inference(tier, messages, params, defaults).await
            }
        }
    }
}

pub struct ModelRouter {
    tiers: Vec<Tier>,
    defaults: GenerationDefaults,
    backend: Box<dyn CompletionBackend>,
}

impl ModelRouter {
    pub fn from_settings(settings: &RouterSettings, defaults: GenerationDefaults) -> Self {
        ModelRouter {
            tiers: settings.build_tiers(),
            defaults,
            backend: Box::new(LlmClient::new()),
        }
    }

    pub fn with_backend(
        tiers: Vec<Tier>,
        defaults: GenerationDefaults,
        backend: Box<dyn CompletionBackend>,
    ) -> Self {
        ModelRouter {
            tiers,
            defaults,
            backend,
        }
    }

    /// Tries each tier in order and returns the first completion. Raises
    /// `NotConfigured` when no tier exists and `AllTiersFailed` (with one
    /// entry per tier, in tier order) when every tier fails.
    pub async fn generate(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<Completion, LlmError> {
        if self.tiers.is_empty() {
            return Err(LlmError::NotConfigured);
        }

        let prompt_chars: usize = messages.iter().map(|m| m.content.len()).sum();
        log::info!(
            "LLM request: {} messages, ~{} chars, max_tokens={}",
            messages.len(),
            prompt_chars,
            params.max_tokens.unwrap_or(self.defaults.max_tokens)
        );

        let mut failures = Vec::new();
        for tier in &self.tiers {
            log::info!(
                "Trying tier '{}' (timeout {}ms)",
                tier.name,
                tier.timeout.as_millis()
            );
            let started = Instant::now();

            let outcome = tokio::time::timeout(
                tier.timeout,
                self.backend.call(tier, messages, params, &self.defaults),
            )
            .await;

            match outcome {
                Ok(Ok(completion)) => {
                    match &completion.usage {
                        Some(usage) => log::info!(
                            "Tier '{}' succeeded in {:.1?} ({} prompt + {} completion = {} tokens)",
                            tier.name,
                            started.elapsed(),
                            usage.prompt_tokens,
                            usage.completion_tokens,
                            usage.total_tokens
                        ),
                        None => log::info!(
                            "Tier '{}' succeeded in {:.1?} (~{} chars output)",
                            tier.name,
                            started.elapsed(),
                            completion.content.len()
                        ),
                    }
                    return Ok(completion);
                }
                Ok(Err(error)) => {
                    log::warn!(
                        "Tier '{}' failed after {:.1?}: {}",
                        tier.name,
                        started.elapsed(),
                        error
                    );
                    failures.push(TierFailure {
                        tier: tier.name.clone(),
                        message: error.to_string(),
                    });
                }
                Err(_elapsed) => {
                    let error = LlmError::TierTimeout {
                        tier: tier.name.clone(),
                        timeout_ms: tier.timeout.as_millis() as u64,
                    };
                    log::warn!("{}", error);
                    failures.push(TierFailure {
                        tier: tier.name.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }

        Err(LlmError::AllTiersFailed { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tier(name: &str) -> Tier {
        Tier {
            name: name.to_string(),
            base_url: Some("http://localhost:9".to_string()),
            api_key: None,
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            kind: TierKind::ChatCompletions,
            is_local_relay: false,
        }
    }

    fn completion(content: &str) -> Completion {
        Completion {
            content: content.to_string(),
            finish_reason: "stop".to_string(),
            usage: None,
        }
    }

    /// Fails every tier whose name starts with "bad", succeeds otherwise.
    struct ScriptedBackend;

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn call(
            &self,
            tier: &Tier,
            _messages: &[ChatMessage],
            _params: &GenerationParams,
            _defaults: &GenerationDefaults,
        ) -> Result<Completion, LlmError> {
            if tier.name.starts_with("bad") {
                Err(LlmError::TierTransport {
                    tier: tier.name.clone(),
                    message: "simulated transport failure".to_string(),
                })
            } else {
                Ok(completion(&format!("from {}", tier.name)))
            }
        }
    }

    /// Sleeps past any tier timeout.
    struct HangingBackend;

    #[async_trait]
    impl CompletionBackend for HangingBackend {
        async fn call(
            &self,
            _tier: &Tier,
            _messages: &[ChatMessage],
            _params: &GenerationParams,
            _defaults: &GenerationDefaults,
        ) -> Result<Completion, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(completion("never"))
        }
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::user("hello")]
    }

    #[tokio::test]
    async fn no_tiers_is_a_configuration_error() {
        let router = ModelRouter::with_backend(
            Vec::new(),
            GenerationDefaults::default(),
            Box::new(ScriptedBackend),
        );
        let error = router
            .generate(&messages(), &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(error, LlmError::NotConfigured));
    }

    #[tokio::test]
    async fn first_healthy_tier_short_circuits() {
        let router = ModelRouter::with_backend(
            vec![tier("good-0"), tier("good-1")],
            GenerationDefaults::default(),
            Box::new(ScriptedBackend),
        );
        let completion = router
            .generate(&messages(), &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(completion.content, "from good-0");
    }

    #[tokio::test]
    async fn failing_primary_falls_through_to_next_tier() {
        let router = ModelRouter::with_backend(
            vec![tier("bad-0"), tier("good-1")],
            GenerationDefaults::default(),
            Box::new(ScriptedBackend),
        );
        let completion = router
            .generate(&messages(), &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(completion.content, "from good-1");
    }

    #[tokio::test]
    async fn all_failures_aggregate_in_tier_order() {
        let router = ModelRouter::with_backend(
            vec![tier("bad-0"), tier("bad-1")],
            GenerationDefaults::default(),
            Box::new(ScriptedBackend),
        );
        let error = router
            .generate(&messages(), &GenerationParams::default())
            .await
            .unwrap_err();
        match error {
            LlmError::AllTiersFailed { failures } => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].tier, "bad-0");
                assert_eq!(failures[1].tier, "bad-1");
            }
            other => panic!("expected AllTiersFailed, got {}", other),
        }
    }

    #[tokio::test]
    async fn tier_timeout_moves_to_the_next_tier() {
        let mut slow = tier("slow-0");
        slow.timeout = Duration::from_millis(10);
        let router = ModelRouter::with_backend(
            vec![slow],
            GenerationDefaults::default(),
            Box::new(HangingBackend),
        );
        let error = router
            .generate(&messages(), &GenerationParams::default())
            .await
            .unwrap_err();
        match error {
            LlmError::AllTiersFailed { failures } => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].message.contains("timed out"));
            }
            other => panic!("expected AllTiersFailed, got {}", other),
        }
    }
}
