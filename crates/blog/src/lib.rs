//! Persistence client for the blog schema.
//!
//! [`Database`] owns the connection pool and hands out one gateway per table:
//!
//! ```rust,ignore
//! use blog::prelude::*;
//!
//! let db = Database::connect(&DatabaseConfig::from_env()?).await?;
//! let user = db.users().insert(&NewUser::new("user1", "password123")).await?;
//! let post = db.posts().insert(&NewPost::new(&user.username, "Hello")).await?;
//! db.close().await;
//! ```

pub mod config;
pub mod database;
pub mod errors;
pub mod gateways;
pub mod models;
pub mod query_builder;

// Shared by the integration tests of this and dependent crates
#[doc(hidden)]
pub mod testing;

pub use config::DatabaseConfig;
pub use database::Database;
pub use errors::DbError;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::DatabaseConfig;
    pub use crate::database::Database;
    pub use crate::errors::DbError;
    pub use crate::gateways::{CommentTable, PostTable, TableGateway, UserTable};
    pub use crate::models::{Comment, NewComment, NewPost, NewUser, Post, PostCommentCount, User};
}
