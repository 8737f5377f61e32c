use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sparkify_core::{batch, db, EtlConfig, LogFileTransformer, SongFileTransformer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Load sparkify song and event data into Postgres", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load song data, then log data (the default when no command is given)
    Etl(EtlArgs),
    /// Drop and recreate the sparkify tables
    CreateTables,
}

#[derive(Args, Debug, Default)]
struct EtlArgs {
    /// Root directory of the song metadata files
    #[arg(long)]
    song_data: Option<PathBuf>,
    /// Root directory of the event log files
    #[arg(long)]
    log_data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = EtlConfig::from_env();

    match cli.command {
        None => run_etl(config, EtlArgs::default()).await,
        Some(Command::Etl(args)) => run_etl(config, args).await,
        Some(Command::CreateTables) => create_tables(&config).await,
    }
}

async fn run_etl(mut config: EtlConfig, args: EtlArgs) -> Result<()> {
    if let Some(song_data) = args.song_data {
        config.song_data = song_data;
    }
    if let Some(log_data) = args.log_data {
        config.log_data = log_data;
    }

    let mut conn = db::connect(&config.database_url)
        .await
        .context("could not open the sparkify database")?;

    let songs = batch::process_data(&mut conn, &config.song_data, &SongFileTransformer)
        .await
        .with_context(|| format!("song batch failed under {}", config.song_data.display()))?;
    let logs = batch::process_data(&mut conn, &config.log_data, &LogFileTransformer)
        .await
        .with_context(|| format!("log batch failed under {}", config.log_data.display()))?;

    db::close(conn).await?;

    info!(
        songs = %serde_json::to_value(&songs)?,
        logs = %serde_json::to_value(&logs)?,
        "ETL finished"
    );
    println!("Process ended");
    Ok(())
}

async fn create_tables(config: &EtlConfig) -> Result<()> {
    let mut conn = db::connect(&config.database_url)
        .await
        .context("could not open the sparkify database")?;
    db::reset_tables(&mut conn).await?;
    db::close(conn).await?;
    println!("Tables created");
    Ok(())
}
