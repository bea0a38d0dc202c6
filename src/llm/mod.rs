pub mod client;
pub mod errors;
pub mod prompts;
pub mod router;
pub mod settings;
