use serde::{Deserialize, Serialize};

/// One page of a project: a project-relative path plus the full document text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: String,
    pub html: String,
}

impl Page {
    pub fn new(path: impl Into<String>, html: impl Into<String>) -> Self {
        Page {
            path: path.into(),
            html: html.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat-style message sent to the model backend.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-request generation parameters; `None` fields fall back to the
/// configured defaults when the request body is built.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GenerationParams {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A successful completion from one backend tier.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub finish_reason: String,
    pub usage: Option<Usage>,
}

/// 1-based inclusive line span in the resulting page HTML affected by one
/// applied edit. Collected in application order, never merged or deduplicated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRange {
    pub start_line: usize,
    pub end_line: usize,
}

/// One search/replace instruction extracted from a marker triplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBlock {
    pub search: String,
    pub replace: String,
}
