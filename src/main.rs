use clap::Parser;
use pageforge::cli::args::{Args, Commands};
use pageforge::cli::display::CliDisplayManager;
use pageforge::errors::AppError;
use pageforge::llm::errors::LlmError;
use pageforge::llm::prompts::{follow_up_messages, initial_messages};
use pageforge::llm::router::ModelRouter;
use pageforge::llm::settings::RouterSettings;
use pageforge::models::GenerationParams;
use pageforge::patch::engine::{apply_update, contains_patch_markers, parse_full_generation};
use pageforge::project::{reader, writer};
use pageforge::utils::config::{read_config, write_config};
use pageforge::utils::logger;
use std::{
    path::Path,
    time::{Duration, Instant},
};

/// The main entry point of the application
#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let start_time = Instant::now();

    // Create the CLI display manager
    let mut display_manager = CliDisplayManager::new();

    // Handle subcommands
    handle_subcommands(args.command.clone()).await?;

    match &args.command {
        Some(_) => return Ok(()),
        None => {}
    }

    // Ensure prompt is provided
    let prompt = args.prompt.ok_or(AppError::MissingPrompt)?;

    // Read config.toml
    let config = read_config()?;

    logger::setup_logger(&config);

    display_manager.print_header();

    let project_dir = Path::new(&args.project_dir);
    let output_directory = Path::new(&config.output_directory).join("pageforge.output");

    let pages = if args.new {
        display_manager.print_new_project_start();
        Vec::new()
    } else {
        let pages = reader::read_pages(project_dir).await?;
        if pages.is_empty() {
            return Err(AppError::MissingPages);
        }
        display_manager.print_page_scan_start(pages.len());
        pages
    };

    let settings = RouterSettings::from_env();
    let router = ModelRouter::from_settings(&settings, config.generation);

    let messages = if args.new {
        initial_messages(&prompt)
    } else {
        follow_up_messages(&prompt, &pages, args.select.as_deref(), false)
    };

    display_manager.print_model_query_start();
    display_manager.start_spinner_model();

    let mut retries = config.retries;
    let completion = loop {
        match router.generate(&messages, &GenerationParams::default()).await {
            Ok(completion) => break completion,
            Err(e @ LlmError::NotConfigured) => {
                display_manager.stop_spinner();
                return Err(e.into());
            }
            Err(e) if retries > 0 => {
                retries -= 1;
                log::warn!("LLM call failed, retries left: {} ({})", retries, e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Err(e) => {
                display_manager.stop_spinner();
                return Err(e.into());
            }
        }
    };

    display_manager.stop_spinner();
    display_manager.print_model_response_success();

    if completion.content.trim().is_empty() {
        return Err(AppError::LlmError(LlmError::NoContent));
    }

    if args.new {
        let generation = parse_full_generation(&completion.content);
        if generation.pages.is_empty() {
            return Err(AppError::LlmError(LlmError::NoContent));
        }
        if generation.pages[0].path != "index.html" {
            return Err(AppError::MalformedResponse(
                "first generated page must be index.html".to_string(),
            ));
        }
        if let Some(name) = &generation.project_name {
            display_manager.print_project_name(name);
        }

        display_manager.print_saving_results_start();
        let saved_pages =
            writer::save_pages(&generation.pages, project_dir, &output_directory, args.auto)
                .await?;
        display_manager.print_saving_results_success(args.auto);
        display_manager.print_footer(saved_pages, start_time.elapsed());
        return Ok(());
    }

    if !contains_patch_markers(&completion.content) {
        return Err(AppError::LlmError(LlmError::NoContent));
    }

    let update = apply_update(&pages, &completion.content);
    display_manager.print_edits_applied(update.changed_ranges.len());
    for (before, after) in pages.iter().zip(update.pages.iter()) {
        display_manager.print_page_diff(&after.path, &before.html, &after.html);
    }

    display_manager.print_saving_results_start();
    let saved_pages =
        writer::save_pages(&update.pages, project_dir, &output_directory, args.auto).await?;
    display_manager.print_saving_results_success(args.auto);
    display_manager.print_footer(saved_pages, start_time.elapsed());

    Ok(())
}

async fn handle_subcommands(command: Option<Commands>) -> Result<(), AppError> {
    match command {
        Some(Commands::Rollback) => {
            handle_rollback_subcommand().await?;
        }
        Some(Commands::Config {
            set_log_level,
            set_output_directory,
            set_retries,
            set_temperature,
            set_max_tokens,
        }) => {
            handle_config_subcommand(
                set_log_level,
                set_output_directory,
                set_retries,
                set_temperature,
                set_max_tokens,
            )
            .await?;
        }
        None => {}
    }

    Ok(())
}

async fn handle_rollback_subcommand() -> Result<(), AppError> {
    let config = read_config()?;
    let output_directory = Path::new(&config.output_directory).join("pageforge.output");
    writer::rollback_last_run(&output_directory).await
}

/// Handles the config subcommand
async fn handle_config_subcommand(
    set_log_level: Option<String>,
    set_output_directory: Option<String>,
    set_retries: Option<u32>,
    set_temperature: Option<f32>,
    set_max_tokens: Option<u32>,
) -> Result<(), AppError> {
    let mut config = read_config()?;

    if let Some(log_level) = set_log_level {
        config.log_level = log_level.clone();
        println!("Log level set to {}", log_level);
    }

    if let Some(output_directory) = set_output_directory {
        config.output_directory = output_directory.clone();
        println!("Output directory set to {}", output_directory);
    }

    if let Some(retries) = set_retries {
        config.retries = retries;
        println!("Retries set to {}", retries);
    }

    if let Some(temperature) = set_temperature {
        config.generation.temperature = temperature;
        println!("Temperature set to {}", temperature);
    }

    if let Some(max_tokens) = set_max_tokens {
        config.generation.max_tokens = max_tokens;
        println!("Max tokens set to {}", max_tokens);
    }

    write_config(&config)?;
    Ok(())
}
