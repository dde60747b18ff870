//! Default seed script - creates the fixture users, posts and comments
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed
//! ```
//!
//! Exits with status 0 on success and 1 on any failure.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use seed_data::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Populate the blog database with fixture users, posts and comments
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Populate the blog database with fixture data", long_about = None)]
struct Args {
    /// Seed an in-memory store instead of the database
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print the created rows as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Seed failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn open_store(args: &Args) -> anyhow::Result<Box<dyn SeedStore>> {
    if args.dry_run {
        info!("Dry run: seeding an in-memory store");
        return Ok(Box::new(MemoryStore::new()));
    }

    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    Ok(Box::new(db))
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let store = open_store(args).await?;

    // Disconnect on both paths before the outcome decides the exit code.
    let result = Seeder::new(store.as_ref()).run().await;
    store.disconnect().await;
    let summary = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    info!("Seed data created successfully.");
    Ok(())
}
