//! Throwaway PostgreSQL schemas for integration tests.
//!
//! [`TestDb::connect`] creates a uniquely named schema, points every pooled
//! connection at it through `search_path` and applies the migrations. The
//! schema is dropped when the [`TestDb`] goes out of scope, including when a
//! test fails an assertion.

use std::env;
use std::thread;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::database::Database;

pub struct TestDb {
    pub db: Database,
    schema: String,
    url: String,
}

impl TestDb {
    /// A migrated database in a fresh `<prefix>_<uuid>` schema, or `None` (with
    /// a note on stderr) when `DATABASE_URL` is unset or unreachable.
    pub async fn connect(prefix: &str) -> Option<TestDb> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("Skipping test: DATABASE_URL not set");
                return None;
            }
        };

        let admin = match admin_pool(&url).await {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("Skipping test: Failed to connect to database: {e}");
                return None;
            }
        };

        let schema = format!("{prefix}_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("Failed to create test schema");
        admin.close().await;

        let search_path = schema.clone();
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn, _meta| {
                let sql = format!("SET search_path TO {search_path}");
                Box::pin(async move {
                    sqlx::query(&sql).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("Failed to connect to test schema");

        // Owned from here on, so a failed migration still drops the schema.
        let test = TestDb {
            db: Database::new(pool),
            schema,
            url,
        };
        test.db.migrate().await.expect("Failed to apply migrations");

        Some(test)
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }
}

async fn admin_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(1).connect(url).await
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Drop runs inside the test's runtime, so the cleanup gets a runtime
        // of its own on a separate thread. Failures are only reported.
        let url = self.url.clone();
        let sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);

        let cleanup = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    eprintln!("Failed to drop test schema: {e}");
                    return;
                }
            };

            runtime.block_on(async {
                let result = match admin_pool(&url).await {
                    Ok(admin) => {
                        let result = sqlx::query(&sql).execute(&admin).await;
                        admin.close().await;
                        result.map(|_| ())
                    }
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    eprintln!("Failed to drop test schema: {e}");
                }
            });
        });

        let _ = cleanup.join();
    }
}
