//! prospector - GitHub pull-request dataset harvester
//!
//! Enumerates popular repositories, walks their merged/closed pull
//! requests over the GraphQL API, filters out unreviewed and
//! instantly-resolved PRs, and appends the survivors to a CSV dataset.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::Result;
use clap::{Parser, Subcommand};
use prospector_core::shutdown_flag;

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "prospector")]
#[command(about = "Harvest pull-request metadata from GitHub into a CSV dataset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./prospector.toml or ~/.config/prospector/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the collection pipeline
    Collect(cmd::collect::CollectArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(prospector_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug  — progress bars show activity
    //   non-TTY: info unless --debug          — logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    prospector_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Collect(args) => {
            setup_signal_handler();
            cmd::collect::run(args, &config, &progress)
        }
        Command::Config => {
            show_config(&config);
            Ok(())
        }
    }
}

fn show_config(config: &Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Output path", &config.output.path.display().to_string()]);
    table.add_row(vec!["Endpoint", &config.github.endpoint]);
    table.add_row(vec![
        "Token",
        if config.github.token.is_some() {
            "configured"
        } else {
            "not set"
        },
    ]);
    table.add_row(vec!["Search query", &config.collect.search_query]);
    table.add_row(vec!["Max repos", &config.collect.max_repos.to_string()]);
    table.add_row(vec![
        "Page sizes",
        &format!(
            "{} repos / {} PRs",
            config.collect.repo_page_size, config.collect.pr_page_size
        ),
    ]);
    table.add_row(vec![
        "PR page cap",
        &config.collect.max_pr_pages.to_string(),
    ]);
    table.add_row(vec![
        "Min PRs per repo",
        &config.collect.min_pull_requests.to_string(),
    ]);
    table.add_row(vec![
        "Eligibility",
        &format!(
            ">= {} reviews, > {}s to resolve",
            config.collect.min_reviews, config.collect.min_resolution_secs
        ),
    ]);
    table.add_row(vec!["Workers", &config.collect.workers.to_string()]);
    table.add_row(vec![
        "Throttle",
        &format!("{}ms", config.collect.throttle_ms),
    ]);
    table.add_row(vec!["Max retries", &config.http.max_retries.to_string()]);

    eprintln!("\n{table}");
}

fn setup_signal_handler() {
    // First signal: set graceful shutdown flag
    // Second signal: force exit (default SIGINT behavior restored)
    // SAFETY: AtomicBool::store and process::exit are async-signal-safe
    unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTERM, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGTERM handler");
        signal_hook::low_level::register(signal_hook::consts::SIGINT, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGINT handler");
    }
}
