use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use axe_stats::{build_career, run_scrape, Config, DatabaseReport, ScorerClient, SqliteScoreStore};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CliArgs {
    /// Path to TOML configuration file. CLI flags override values in the file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Player whose matches are scraped and reported.
    #[clap(long)]
    pub profile_id: Option<u32>,

    /// SQLite database file.
    #[clap(long)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover the player's matches and process every pending one.
    Scrape {
        /// Also reprocess matches previously rejected as invalid.
        #[clap(long)]
        retry_invalid: bool,
    },
    /// Print row counts and matches per status.
    Report,
    /// Write the career statistics tree as JSON.
    Stats {
        /// Output file; stdout when omitted.
        #[clap(long)]
        output: Option<PathBuf>,
    },
}

fn resolve_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(profile_id) = args.profile_id {
        config.profile_id = profile_id;
    }
    if let Some(database) = &args.database {
        config.database_path = database.clone();
    }
    if let Command::Scrape { retry_invalid: true } = args.command {
        config.retry_invalid = true;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    let start = Instant::now();
    let config = resolve_config(&cli_args)?;
    let store = SqliteScoreStore::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;

    match &cli_args.command {
        Command::Scrape { .. } => {
            let client = ScorerClient::from_config(&config)?;
            let report = run_scrape(&client, &store, &config).await?;
            store.vacuum()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Report => {
            println!("{}", DatabaseReport::collect(&store)?);
        }
        Command::Stats { output } => {
            let career = build_career(&store, config.profile_id)?;
            let json = serde_json::to_string_pretty(&career)?;
            match output {
                Some(path) => {
                    std::fs::write(path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "wrote career statistics");
                }
                None => println!("{json}"),
            }
        }
    }

    info!(
        elapsed_secs = start.elapsed().as_secs(),
        "total runtime"
    );
    Ok(())
}
