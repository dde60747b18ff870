//! In-process store used for dry runs and tests.
//!
//! Enforces the same constraints as the blog schema (unique usernames,
//! existing foreign-key targets) and reports violations with the constraint
//! names PostgreSQL generates for that schema.

use async_trait::async_trait;
use blog::DbError;
use blog::models::{Comment, NewComment, NewPost, NewUser, Post, User};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::store::SeedStore;

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    closed: bool,
}

impl MemoryState {
    fn ensure_open(&self) -> Result<(), DbError> {
        if self.closed {
            return Err(DbError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn has_user(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username == username)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.state.lock().await.posts.clone()
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.state.lock().await.comments.clone()
    }

    /// Row counts as (users, posts, comments).
    pub async fn counts(&self) -> (usize, usize, usize) {
        let state = self.state.lock().await;
        (state.users.len(), state.posts.len(), state.comments.len())
    }
}

fn next_id(len: usize) -> i32 {
    i32::try_from(len + 1).unwrap_or(i32::MAX)
}

fn fk_violation(constraint: &str) -> DbError {
    DbError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        if state.has_user(&user.username) {
            return Err(DbError::UniqueViolation {
                constraint: "users_username_key".to_string(),
            });
        }

        let row = User {
            id: next_id(state.users.len()),
            username: user.username.clone(),
            password: user.password.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        state.users.push(row.clone());
        Ok(row)
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, DbError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        if !state.has_user(&post.user_id) {
            return Err(fk_violation("posts_user_id_fkey"));
        }

        let row = Post {
            id: next_id(state.posts.len()),
            user_id: post.user_id.clone(),
            content: post.content.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        state.posts.push(row.clone());
        Ok(row)
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, DbError> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        if !state.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(fk_violation("comments_post_id_fkey"));
        }
        if !state.has_user(&comment.user_id) {
            return Err(fk_violation("comments_user_id_fkey"));
        }

        let row = Comment {
            id: next_id(state.comments.len()),
            post_id: comment.post_id,
            user_id: comment.user_id.clone(),
            content: comment.content.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        state.comments.push(row.clone());
        Ok(row)
    }

    async fn disconnect(&self) {
        self.state.lock().await.closed = true;
    }
}
