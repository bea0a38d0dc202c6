use crate::llm::errors::LlmError;
use std::fmt;
use toml;

#[derive(Debug)]
pub enum AppError {
    IoError(std::io::Error),
    LlmError(LlmError),
    TomlError(toml::de::Error),
    MissingPrompt,
    MissingPages,
    MalformedResponse(String),
    RollbackError(String),
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::IoError(e) => write!(f, "IO error: {}", e),
            AppError::LlmError(e) => write!(f, "LLM error: {}", e),
            AppError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            AppError::MissingPrompt => write!(f, "Prompt is required"),
            AppError::MissingPages => write!(f, "No pages found in the project directory"),
            AppError::MalformedResponse(e) => write!(f, "Malformed model response: {}", e),
            AppError::RollbackError(e) => write!(f, "Rollback error: {}", e),
            AppError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::TomlError(err)
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::LlmError(err)
    }
}
