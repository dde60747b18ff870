//! The persistence seam the seeder writes through.

use async_trait::async_trait;
use blog::gateways::TableGateway;
use blog::models::{Comment, NewComment, NewPost, NewUser, Post, User};
use blog::{Database, DbError};

/// Create operations per entity plus teardown of the underlying connection.
#[async_trait]
pub trait SeedStore: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User, DbError>;

    async fn create_post(&self, post: &NewPost) -> Result<Post, DbError>;

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, DbError>;

    /// Releases the connection. Creates after this fail.
    async fn disconnect(&self);
}

#[async_trait]
impl SeedStore for Database {
    async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
        self.users().insert(user).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, DbError> {
        self.posts().insert(post).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, DbError> {
        self.comments().insert(comment).await
    }

    async fn disconnect(&self) {
        self.close().await;
    }
}
