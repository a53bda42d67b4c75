//! Dealboard CLI - query companies, investors and news from the terminal

mod commands;

use clap::{Parser, Subcommand};
use dealboard::config::{self, Overrides, Settings};
use dealboard::{RecordKind, Skin};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dealboard")]
#[command(version)]
#[command(about = "Deal-flow dashboard data layer - companies, VCs and news")]
#[command(long_about = r#"
Dealboard loads company, investor and news records from a backend (or the
embedded fallback dataset) and answers dashboard queries:
  • Lookup, filter, search and top-N over every collection
  • Portfolio and partner-program statistics
  • A JSON API that mirrors the backend list endpoints

Example usage:
  dealboard search openai
  dealboard top companies valuation -n 5
  dealboard filter companies industry ai-natives
  dealboard serve --port 3000
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Skip the backend and use the embedded dataset
    #[arg(long, global = true)]
    offline: bool,

    /// Dataset used when the backend is unavailable (biotech, digital-natives)
    #[arg(long, global = true)]
    skin: Option<Skin>,

    /// Backend root URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the preference database
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and prepare the preference database
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Show dashboard statistics
    Stats,

    /// Show one record
    Get {
        /// Collection: companies, vcs or news
        kind: RecordKind,
        id: u64,
    },

    /// List records whose field equals a value
    Filter {
        kind: RecordKind,
        field: String,
        /// Value to match; omit to list everything
        value: Option<String>,
    },

    /// Case-insensitive text search
    Search {
        query: String,

        /// Restrict to one collection
        #[arg(short, long)]
        kind: Option<RecordKind>,
    },

    /// Highest records by a numeric field
    Top {
        kind: RecordKind,
        field: String,

        #[arg(short, default_value = "5")]
        n: usize,
    },

    /// News for a company, or the latest articles
    News {
        /// Company id
        #[arg(long, conflicts_with = "recent")]
        company: Option<u64>,

        /// Number of most recent articles
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Show or clear recent searches
    Recent {
        #[arg(long)]
        clear: bool,
    },

    /// Show or change the colour theme (light, dark, toggle)
    Theme { mode: Option<String> },

    /// Serve the JSON API
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Directory with a prebuilt front end to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a command result as one JSON document
pub fn emit_success<T: Serialize>(output_mode: OutputMode, command: &str, data: T) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let doc = serde_json::json!({
            "ok": true,
            "command": command,
            "data": serde_json::to_value(data)?,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }
    Ok(())
}

/// Everything a command needs besides its own arguments
pub struct Context {
    pub settings: Settings,
    pub config_path: PathBuf,
    pub output_mode: OutputMode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let file_config = config::load_config(Some(&config_path))?;
    let overrides = Overrides {
        base_url: cli.base_url,
        skin: cli.skin,
        prefs: cli.prefs,
        offline: cli.offline,
    };
    let settings = Settings::resolve(overrides, file_config.as_ref(), &std::env::current_dir()?);

    let ctx = Context {
        settings,
        config_path,
        output_mode: if cli.json { OutputMode::Json } else { OutputMode::Human },
    };

    let result = match cli.command {
        Commands::Init { force } => commands::run_init(&ctx, force),
        Commands::Stats => commands::run_stats(&ctx).await,
        Commands::Get { kind, id } => commands::run_get(&ctx, kind, id).await,
        Commands::Filter { kind, field, value } => {
            commands::run_filter(&ctx, kind, &field, value.as_deref().unwrap_or("")).await
        }
        Commands::Search { query, kind } => commands::run_search(&ctx, &query, kind).await,
        Commands::Top { kind, field, n } => commands::run_top(&ctx, kind, &field, n).await,
        Commands::News { company, recent } => commands::run_news(&ctx, company, recent).await,
        Commands::Recent { clear } => commands::run_recent(&ctx, clear),
        Commands::Theme { mode } => commands::run_theme(&ctx, mode.as_deref()),
        Commands::Serve { port, static_dir } => commands::run_serve(&ctx, port, static_dir).await,
    };

    if let Err(e) = &result {
        if ctx.output_mode.is_human() {
            dealboard::ui::error(&e.to_string());
        } else {
            let doc = serde_json::json!({ "ok": false, "error": e.to_string() });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        std::process::exit(1);
    }

    Ok(())
}
