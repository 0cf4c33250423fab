//! Warsweep - duplicate war-history reconciler

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warsweep::{
    config::Args,
    db::{MongoClient, MongoWarStore},
    reconcile::{self, RunOptions},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments (MONGODB_URI missing aborts here)
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warsweep={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Warsweep - war-history reconciler");
    info!("======================================");
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Database: {}", args.mongodb_db);
    info!("Mode: {}", if args.dry_run { "DRY RUN" } else { "LIVE" });
    if let Some(ref tag) = args.clan_tag {
        info!("Clan filter: {}", tag);
    }
    info!(
        "Build: {} ({})",
        env!("GIT_COMMIT_SHORT"),
        env!("BUILD_TIMESTAMP")
    );
    info!("======================================");

    // Connect to MongoDB; no partial run without a store
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let store = MongoWarStore::new(mongo);
    let opts = RunOptions {
        dry_run: args.dry_run,
        clan_tag: args.clan_tag.clone(),
    };

    let summary = match reconcile::run(&store, &opts).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Reconciliation run failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !summary.is_clean() {
        error!(
            clans_failed = summary.clans_failed,
            "Run finished with clan-level errors"
        );
        std::process::exit(1);
    }

    Ok(())
}
