mod jobs;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "precio")]
#[command(about = "Catalog maintenance jobs for the precio product database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Delete every document in the target collection and insert a freshly
    /// generated sample catalog
    Reseed {
        /// Number of records to generate
        #[arg(long, default_value_t = 200)]
        count: usize,

        /// Target collection (defaults to PRECIO_COLLECTION)
        #[arg(long)]
        collection: Option<String>,

        /// Seed for the price/store generator, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Preview what would be done without writing to the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Add the derived lowercase name_lower field to documents that lack it
    Backfill {
        /// Target collection (defaults to PRECIO_COLLECTION)
        #[arg(long)]
        collection: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = precio_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let store = build_firestore_client(&config)?;

    match cli.command {
        Commands::Reseed {
            count,
            collection,
            seed,
            dry_run,
        } => {
            let collection = collection.unwrap_or_else(|| config.collection.clone());
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let report = jobs::run_reseed(&store, &collection, count, dry_run, &mut rng).await?;
            tracing::info!(
                collection = %collection,
                deleted = report.deleted,
                inserted = report.inserted,
                "reseed finished"
            );
        }
        Commands::Backfill { collection } => {
            let collection = collection.unwrap_or_else(|| config.collection.clone());
            let report = jobs::run_backfill(&store, &collection).await?;
            tracing::info!(
                collection = %collection,
                scanned = report.scanned,
                updated = report.updated,
                already_present = report.already_present,
                skipped = report.skipped,
                "backfill finished"
            );
        }
    }

    Ok(())
}

fn build_firestore_client(
    config: &precio_core::AppConfig,
) -> anyhow::Result<precio_store::FirestoreClient> {
    let client = match &config.base_url {
        Some(base_url) => precio_store::FirestoreClient::with_base_url(
            &config.project_id,
            &config.database_id,
            config.auth_token.as_deref(),
            config.request_timeout_secs,
            base_url,
        ),
        None => precio_store::FirestoreClient::new(
            &config.project_id,
            &config.database_id,
            config.auth_token.as_deref(),
            config.request_timeout_secs,
        ),
    };
    client
        .map(|c| c.with_retry_policy(config.max_retries, config.retry_backoff_base_ms))
        .map_err(|e| anyhow::anyhow!("failed to build Firestore client: {e}"))
}
