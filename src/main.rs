//! bibdex: bibliographic record scraper for economics journal archives

use anyhow::{Context, Result};
use bibdex::{
    config::{Config, LogFormat},
    scraping::ScrapeCoordinator,
    sink::RecordSink,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "bibdex")]
#[command(about = "Scrape abstracts, JEL codes, and citations from journal index sites")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "bibdex.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every configured journal and write records to the sink
    Run {
        /// Output file (overrides the configured sink path)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Enumerate article links without extracting records
    Links {
        /// Write the link list to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load or create config
    let config = if cli.config.exists() {
        Config::load(&cli.config)
            .with_context(|| format!("failed to load {}", cli.config.display()))?
    } else {
        Config::default()
    };

    setup_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Run { out } => run_scrape(config, out).await,
        Commands::Links { out } => list_links(config, out).await,
        Commands::Init { path } => init_config(path),
    }
}

fn setup_logging(config: &Config, verbose: u8) -> Result<()> {
    let log_level = match verbose {
        0 => config.logging.level.to_level(),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false);

    match config.logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }

    Ok(())
}

async fn run_scrape(mut config: Config, out: Option<PathBuf>) -> Result<()> {
    if let Some(path) = out {
        config.sink.path = path;
    }

    info!("Scraping {} journals", config.journals.len());

    let coordinator = ScrapeCoordinator::new(&config)?;
    let sink = RecordSink::start(&config.sink.path)?;

    let summary = coordinator.run(&sink).await;
    let written = sink.finish().await?;

    println!("\nScrape complete:");
    for outcome in &summary.outcomes {
        match &outcome.error {
            None => println!(
                "  {}: {} links, {} records",
                outcome.tag, outcome.links_found, outcome.records_written
            ),
            Some(e) => println!(
                "  {}: {} links, {} records, FAILED: {}",
                outcome.tag, outcome.links_found, outcome.records_written, e
            ),
        }
    }
    println!(
        "{} records written to {}",
        written,
        config.sink.path.display()
    );

    if !summary.all_ok() {
        anyhow::bail!("{} journal(s) failed", summary.failures().count());
    }

    Ok(())
}

async fn list_links(config: Config, out: Option<PathBuf>) -> Result<()> {
    let coordinator = ScrapeCoordinator::new(&config)?;
    let links = coordinator.collect_links().await?;

    let json = serde_json::to_string_pretty(&links)?;
    match out {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("{} links written to {}", links.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn init_config(path: PathBuf) -> Result<()> {
    let config_path = path.join("bibdex.toml");
    let toml_content = toml::to_string_pretty(&Config::default())?;

    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}
