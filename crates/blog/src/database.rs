use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::DbError;
use crate::gateways::{CommentTable, PostTable, UserTable};

/// Client for the blog database. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool using the given settings.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        info!("Connecting to database at {}", config.redacted_url());

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the schema migrations bundled with this crate.
    pub async fn migrate(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn users(&self) -> UserTable {
        UserTable::new(self.pool.clone())
    }

    pub fn posts(&self) -> PostTable {
        PostTable::new(self.pool.clone())
    }

    pub fn comments(&self) -> CommentTable {
        CommentTable::new(self.pool.clone())
    }

    /// Closes every pooled connection. Later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}
