//! Pageforge: prompt-driven generation and editing of multi-page HTML
//! projects through a tiered LLM backend.

pub mod cli;
pub mod errors;
pub mod llm;
pub mod models;
pub mod patch;
pub mod project;
pub mod rate_limit;
pub mod utils;
