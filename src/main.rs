//! Maintenance binary: runs the bulk absence resync pass.
//!
//! Intended for use after data import, migration, or detected drift. Reads
//! `config.toml` if present, falls back to the `DATABASE_URL` environment
//! variable, and logs the mutation counts of the pass.

use absence_sync::config;
use absence_sync::core::resync;
use absence_sync::errors::Result;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // .env is optional; env vars can be set externally
    dotenv().ok();

    let database_url = match config::app::load_default_config() {
        Ok(app_config) => {
            info!(tanev = %app_config.tanev, "Loaded application configuration.");
            app_config.database_url
        }
        Err(e) => {
            info!("No usable config.toml ({e}); falling back to environment.");
            config::database::get_database_url()
        }
    };

    let db = config::database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    let summary = resync::resync_absences(&db)
        .await
        .inspect_err(|e| error!("Bulk resync failed: {e}"))?;
    info!("{}", resync::format_resync_summary(&summary));

    Ok(())
}
