//! Database seeding utilities.

use blog::DbError;
use blog::models::{Comment, NewComment, NewPost, Post, User};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::store::SeedStore;
use crate::fixtures::{COMMENTS, POSTS, USERS};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to create {step}")]
    Store { step: String, source: DbError },
}

impl SeedError {
    fn store(step: impl Into<String>) -> impl FnOnce(DbError) -> Self {
        let step = step.into();
        move |source| SeedError::Store { step, source }
    }
}

/// Rows created by a successful run, in insertion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedSummary {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

/// Inserts the fixture users, posts and comments, one row at a time.
pub struct Seeder<'a> {
    store: &'a dyn SeedStore,
}

impl<'a> Seeder<'a> {
    pub fn new(store: &'a dyn SeedStore) -> Self {
        Self { store }
    }

    /// Runs the whole sequence. The first failed insert aborts the run; rows
    /// inserted before it are left in place.
    pub async fn run(&self) -> Result<SeedSummary, SeedError> {
        let users = self.seed_users().await?;
        let posts = self.seed_posts(&users).await?;
        let comments = self.seed_comments(&users, &posts).await?;

        Ok(SeedSummary {
            users,
            posts,
            comments,
        })
    }

    async fn seed_users(&self) -> Result<Vec<User>, SeedError> {
        info!("Seeding {} users...", USERS.len());

        let mut users = Vec::with_capacity(USERS.len());
        for fixture in &USERS {
            let user = self
                .store
                .create_user(&fixture.to_new_user())
                .await
                .map_err(SeedError::store(format!("user {}", fixture.username)))?;
            debug!(id = user.id, username = %user.username, "created user");
            users.push(user);
        }

        info!("Seeded {} users", users.len());
        Ok(users)
    }

    async fn seed_posts(&self, users: &[User]) -> Result<Vec<Post>, SeedError> {
        info!("Seeding {} posts...", POSTS.len());

        let mut posts = Vec::with_capacity(POSTS.len());
        for fixture in &POSTS {
            let author = &users[fixture.author];
            let post = self
                .store
                .create_post(&NewPost::new(&author.username, fixture.content))
                .await
                .map_err(SeedError::store(format!("post {:?}", fixture.content)))?;
            debug!(id = post.id, user_id = %post.user_id, "created post");
            posts.push(post);
        }

        info!("Seeded {} posts", posts.len());
        Ok(posts)
    }

    async fn seed_comments(
        &self,
        users: &[User],
        posts: &[Post],
    ) -> Result<Vec<Comment>, SeedError> {
        info!("Seeding {} comments...", COMMENTS.len());

        let mut comments = Vec::with_capacity(COMMENTS.len());
        for fixture in &COMMENTS {
            let author = &users[fixture.author];
            let post = &posts[fixture.post];
            let comment = self
                .store
                .create_comment(&NewComment::new(post.id, &author.username, fixture.content))
                .await
                .map_err(SeedError::store(format!("comment {:?}", fixture.content)))?;
            debug!(id = comment.id, post_id = comment.post_id, "created comment");
            comments.push(comment);
        }

        info!("Seeded {} comments", comments.len());
        Ok(comments)
    }
}
