// src/llm/client.rs

use super::errors::LlmError;
use super::settings::{GenerationDefaults, Tier, HOSTED_INFERENCE_BASE_URL};
use crate::models::{ChatMessage, Completion, GenerationParams, Role, Usage};
use reqwest::Client;
use serde_json::{json, Value};

/// HTTP client for the model backends.
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Calls an OpenAI-compatible chat-completions endpoint.
    pub async fn chat_completion(
        &self,
        tier: &Tier,
        messages: &[ChatMessage],
        params: &GenerationParams,
        defaults: &GenerationDefaults,
    ) -> Result<Completion, LlmError> {
        let base_url = tier.base_url.as_deref().ok_or_else(|| LlmError::TierTransport {
            tier: tier.name.clone(),
            message: "no endpoint URL configured".to_string(),
        })?;

        let mut body = json!({
            "model": tier.model,
            "messages": messages,
            "max_tokens": params.max_tokens.unwrap_or(defaults.max_tokens),
            "temperature": params.temperature.unwrap_or(defaults.temperature),
            "top_p": params.top_p.unwrap_or(defaults.top_p),
            "frequency_penalty": params.frequency_penalty.unwrap_or(defaults.frequency_penalty),
            "presence_penalty": params.presence_penalty.unwrap_or(defaults.presence_penalty),
            "stream": false,
        });
        if tier.is_local_relay {
            // Keep the relayed model loaded between requests.
            body["keep_alive"] = json!("10m");
        }

        log::debug!("Calling '{}' at {}", tier.name, base_url);

        let mut request = self
            .client
            .post(format!("{}/chat/completions", base_url))
            .json(&body);
        if let Some(api_key) = &tier.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::TierTransport {
                tier: tier.name.clone(),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let raw_response = response.text().await?;
        let json_response: Value = serde_json::from_str(&raw_response)?;

        if let Some(error) = json_response.get("error") {
            return Err(LlmError::TierTransport {
                tier: tier.name.clone(),
                message: error.to_string(),
            });
        }

        let content = json_response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::TierTransport {
                tier: tier.name.clone(),
                message: "malformed response: missing choices[0].message.content".to_string(),
            })?
            .to_string();
        let finish_reason = json_response["choices"][0]["finish_reason"]
            .as_str()
            .unwrap_or("stop")
            .to_string();
        let usage = serde_json::from_value::<Usage>(json_response["usage"].clone()).ok();

        Ok(Completion {
            content,
            finish_reason,
            usage,
        })
    }

    /// Calls the hosted text-generation endpoint used as the last-resort
    /// tier. Messages are flattened into a role-prefixed transcript since
    /// the endpoint takes a single prompt.
    pub async fn hosted_inference(
        &self,
        tier: &Tier,
        messages: &[ChatMessage],
        params: &GenerationParams,
        defaults: &GenerationDefaults,
    ) -> Result<Completion, LlmError> {
        let api_key = tier.api_key.as_deref().ok_or_else(|| LlmError::TierTransport {
            tier: tier.name.clone(),
            message: "no API key configured".to_string(),
        })?;

        let prompt = flatten_messages(messages);
        let url = format!("{}/{}", HOSTED_INFERENCE_BASE_URL, tier.model);

        log::debug!("Calling '{}' at {}", tier.name, url);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "inputs": prompt,
                "parameters": {
                    "max_new_tokens": params.max_tokens.unwrap_or(defaults.max_tokens),
                    "temperature": params.temperature.unwrap_or(defaults.temperature),
                    "return_full_text": false,
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::TierTransport {
                tier: tier.name.clone(),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let json_response: Value = serde_json::from_str(&response.text().await?)?;
        let content = json_response[0]["generated_text"]
            .as_str()
            .or_else(|| json_response["generated_text"].as_str())
            .ok_or_else(|| LlmError::TierTransport {
                tier: tier.name.clone(),
                message: "malformed response: missing generated_text".to_string(),
            })?
            .to_string();

        Ok(Completion {
            content,
            finish_reason: "stop".to_string(),
            usage: None,
        })
    }
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
    }
}

fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let prefix = match m.role {
                Role::System => "System",
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{}: {}", prefix, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_is_role_prefixed() {
        let messages = vec![
            ChatMessage::system("be terse"),
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi"),
        ];
        assert_eq!(
            flatten_messages(&messages),
            "System: be terse\n\nUser: hello\n\nAssistant: hi"
        );
    }
}
