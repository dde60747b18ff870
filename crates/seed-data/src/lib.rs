//! Fixture data for the blog database.
//!
//! Seeds three users, three posts and three comments, strictly in sequence:
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let db = Database::connect(&DatabaseConfig::from_env()?).await?;
//! let summary = Seeder::new(&db).run().await;
//! db.disconnect().await;
//! let summary = summary?;
//! ```

pub mod db;
pub mod fixtures;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::db::{MemoryStore, SeedError, SeedStore, SeedSummary, Seeder};
    pub use crate::fixtures::{COMMENTS, POSTS, USERS};
    pub use blog::{Database, DatabaseConfig, DbError};
}
