use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commander_stats::api::{build_router, state::AppState};
use commander_stats::calculate::compute_stats;
use commander_stats::config::{AppConfig, OutputFormat};
use commander_stats::integrity::{check_games, warn_on_issues};
use commander_stats::report::{render_commander, render_text};
use commander_stats::storage::GameLog;

#[derive(Parser)]
#[command(name = "commander-stats")]
#[command(about = "Commander match log analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Match log file (overrides config)
    #[arg(long)]
    games: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full statistics report
    Report {
        /// Output format: text or json
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print one commander's breakdown
    Commander {
        /// Commander name (case-insensitive)
        name: String,
    },

    /// Check the match log for data-integrity issues
    Check {
        /// Exit with an error if any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(games) = cli.games {
        config.games_path = games;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting commander-stats v{}", env!("CARGO_PKG_VERSION"));

    let log = GameLog::new(&config.games_path);

    match cli.command {
        Commands::Report { format, pretty } => {
            let games = log
                .load()
                .with_context(|| format!("Failed to read match log {:?}", log.path()))?;
            warn_on_issues(&games);
            let stats = compute_stats(&games);

            match format.unwrap_or(config.report.format) {
                OutputFormat::Text => print!("{}", render_text(&stats)),
                OutputFormat::Json => {
                    let json = if pretty || config.report.pretty {
                        serde_json::to_string_pretty(&stats)?
                    } else {
                        serde_json::to_string(&stats)?
                    };
                    println!("{}", json);
                }
            }
        }

        Commands::Commander { name } => {
            let games = log
                .load()
                .with_context(|| format!("Failed to read match log {:?}", log.path()))?;
            let stats = compute_stats(&games);
            let Some(commander) = stats.get_commander(&name) else {
                bail!("No games logged with commander '{}'", name);
            };
            print!("{}", render_commander(commander));
        }

        Commands::Check { strict } => {
            let games = log
                .load()
                .with_context(|| format!("Failed to read match log {:?}", log.path()))?;
            let issues = check_games(&games);

            if issues.is_empty() {
                println!("Checked {} games: no issues found", games.len());
            } else {
                for issue in &issues {
                    println!("{}", issue);
                }
                println!("Checked {} games: {} issues", games.len(), issues.len());
                if strict {
                    bail!("{} integrity issues found", issues.len());
                }
            }
        }

        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);

            let app = build_router(AppState::new(log), &config.server.cors_origin);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            tracing::info!("Serving match log {:?}", config.games_path);
            tracing::info!("API: http://{}/api/stats", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
