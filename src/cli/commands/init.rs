//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Minne Setup");
    println!();
    println!("Welcome to Minne! Let's make sure everything is configured correctly.\n");

    // Step 1: Check prerequisites
    println!("{}", style("Step 1: Checking prerequisites").bold().cyan());
    println!();

    if ytdlp_missing() {
        Output::warning("yt-dlp was not found. It is required for generating flashcards from videos.");
        println!();
        println!("  {} {}", style("→").dim(), style(install_hint_ytdlp()).dim());
        println!();
        println!("  Document files (pdf, docx, pptx, xlsx, csv) work without it.");
        println!();

        if !prompt_continue("Continue anyway?")? {
            println!();
            Output::info("Setup cancelled. Install yt-dlp and run 'minne init' again.");
            return Ok(());
        }
    } else {
        Output::success("All required tools are installed!");
    }

    println!();

    // Step 2: Check API key
    println!("{}", style("Step 2: Checking API configuration").bold().cyan());
    println!();

    if std::env::var("OPENAI_API_KEY").is_err() {
        Output::warning("OPENAI_API_KEY environment variable is not set.");
        println!();
        println!("  Minne requires an OpenAI API key for summarization and flashcard generation.");
        println!(
            "  Get your API key from: {}",
            style("https://platform.openai.com/api-keys").underlined()
        );
        println!();
        println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'minne init' again.");
            return Ok(());
        }
    } else {
        Output::success("OpenAI API key is configured!");
    }

    println!();

    // Step 3: Create directories
    println!("{}", style("Step 3: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    let temp_dir = settings.temp_dir();

    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    if !temp_dir.exists() {
        std::fs::create_dir_all(&temp_dir)?;
        Output::success(&format!("Created temp directory: {}", temp_dir.display()));
    } else {
        Output::info(&format!("Temp directory exists: {}", temp_dir.display()));
    }

    println!();

    // Step 4: Create config file
    println!("{}", style("Step 4: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("minne config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("minne doctor").cyan());
    println!(
        "  {} Generate flashcards from a video",
        style("minne generate --url <youtube-url>").cyan()
    );
    println!(
        "  {} Generate flashcards from documents",
        style("minne generate lecture.pdf notes.docx").cyan()
    );
    println!();
    println!("For more help: {}", style("minne --help").cyan());

    Ok(())
}

fn ytdlp_missing() -> bool {
    std::process::Command::new("yt-dlp")
        .arg("--version")
        .output()
        .is_err()
}

/// Get platform-specific install hint.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
