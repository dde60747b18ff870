//! Applies the blog schema migrations.
//!
//! Run with:
//! ```
//! cargo run -p blog --bin migrate
//! ```

use blog::{Database, DatabaseConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config).await?;

    let result = db.migrate().await;
    db.close().await;
    result?;

    tracing::info!("Migrations applied");
    Ok(())
}
