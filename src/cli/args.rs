use clap::{Parser, Subcommand};

/// CLI arguments for the Pageforge application.
#[derive(Parser, Debug, PartialEq, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Prompt describing what to build or change.
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Path to the project directory containing the HTML pages.
    #[arg(short = 'd', long, default_value = "./")]
    pub project_dir: String,

    /// Generate a brand new project instead of editing existing pages.
    #[arg(short, long)]
    pub new: bool,

    /// Restrict the edit to a single HTML element (outer HTML snippet).
    #[arg(short, long)]
    pub select: Option<String>,

    /// Automatically overwrite the project files in place.
    #[arg(short, long)]
    pub auto: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for the Pageforge application.
#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum Commands {
    /// Manage configuration options.
    Config {
        /// Set the log level (debug, info, warn, error).
        #[arg(long)]
        set_log_level: Option<String>,

        /// Set the output directory.
        #[arg(long)]
        set_output_directory: Option<String>,

        /// Set the maximum number of retries for API calls.
        #[arg(long)]
        set_retries: Option<u32>,

        /// Set the sampling temperature for the model.
        #[arg(long)]
        set_temperature: Option<f32>,

        /// Set the completion token budget for the model.
        #[arg(long)]
        set_max_tokens: Option<u32>,
    },

    /// Rollback changes made by the last run.
    Rollback,
}
