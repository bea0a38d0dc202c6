use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use similar::{ChangeTag, TextDiff};
use std::time::Duration;

/// Manages CLI display and output formatting.
pub struct CliDisplayManager {
    spinner: Option<ProgressBar>,
}

impl CliDisplayManager {
    /// Creates a new `CliDisplayManager`.
    pub fn new() -> Self {
        CliDisplayManager { spinner: None }
    }

    /// Prints the application header.
    pub fn print_header(&self) {
        println!("\n{}", "╭──────────────────────╮".bright_magenta());
        println!("{}", "│  🔨 Pageforge v0.1.0 │".bright_magenta().bold());
        println!("{}\n", "╰──────────────────────╯".bright_magenta());
    }

    /// Prints the start of the page scan.
    pub fn print_page_scan_start(&self, page_count: usize) {
        self.print_section(
            "📁",
            "[1/3] Reading Pages",
            &format!("Found {} page(s) in the project", page_count),
        );
    }

    /// Prints the start of a fresh project generation.
    pub fn print_new_project_start(&self) {
        self.print_section("📁", "[1/3] New Project", "Generating pages from scratch");
    }

    /// Prints the start of model querying.
    pub fn print_model_query_start(&self) {
        self.print_section("⚓", "[2/3] Querying Model", "");
    }

    /// Prints a success message for the model response.
    pub fn print_model_response_success(&self) {
        self.print_info("Successfully received model response");
    }

    pub fn print_project_name(&self, name: &str) {
        self.print_info(&format!("Project name: {}", name));
    }

    pub fn print_edits_applied(&self, edit_count: usize) {
        self.print_info(&format!("Applied {} edit(s)", edit_count));
    }

    /// Prints the start of saving results.
    pub fn print_saving_results_start(&self) {
        self.print_section("💾", "[3/3] Saving Results", "");
    }

    /// Prints a success message for saving results.
    pub fn print_saving_results_success(&self, auto: bool) {
        match auto {
            true => self.print_info("Successfully merged results with project files"),
            false => self.print_info("Successfully saved results to 'pageforge.output/pages'"),
        }
    }

    /// Prints the application footer.
    pub fn print_footer(&self, saved_pages: usize, duration: Duration) {
        println!();
        println!(
            "{}",
            format!("⚡ Saved {} page(s)", saved_pages)
                .bright_white()
                .dimmed(),
        );
        println!(
            "{}",
            format!("⚡ Completed in {:.2?}", duration)
                .bright_white()
                .dimmed(),
        );
        println!();
    }

    /// Prints a line diff of one page before and after editing.
    pub fn print_page_diff(&self, path: &str, before: &str, after: &str) {
        if before == after {
            return;
        }
        println!("   {} {}", "→".bright_white(), path.bright_cyan().bold());
        let diff = TextDiff::from_lines(before, after);
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => print!("{}", format!("   - {}", change).red()),
                ChangeTag::Insert => print!("{}", format!("   + {}", change).green()),
                ChangeTag::Equal => {}
            }
        }
    }

    /// Starts a spinner while waiting on the model.
    pub fn start_spinner_model(&mut self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template(&format!(
                "   {} {{spinner}} {}",
                "→".bright_white(),
                "Waiting for model response".italic().bright_white()
            ))
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Stops the spinner.
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    /// Helper function to print a section header.
    fn print_section(&self, icon: &str, title: &str, description: &str) {
        println!("{} {}", icon.bright_yellow(), title.bright_cyan().bold());
        if !description.is_empty() {
            println!(
                "   {} {}",
                "→".bright_white(),
                description.italic().bright_white()
            );
        }
    }

    /// Helper function to print an informational message.
    fn print_info(&self, message: &str) {
        println!(
            "   {} {}",
            "→".bright_white(),
            message.italic().bright_white()
        );
    }
}
