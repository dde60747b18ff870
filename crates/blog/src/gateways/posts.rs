use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::TableGateway;
use crate::errors::DbError;
use crate::models::{NewPost, Post};

#[derive(Clone)]
pub struct PostTable {
    pool: PgPool,
}

impl PostTable {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Posts written by the given username, oldest first.
    pub async fn find_by_user(&self, username: &str) -> Result<Vec<Post>, DbError> {
        self.find_where("user_id", username).await
    }

    /// Posts whose content matches exactly.
    pub async fn find_by_content(&self, content: &str) -> Result<Vec<Post>, DbError> {
        self.find_where("content", content).await
    }

    async fn find_where(&self, column: &str, value: &str) -> Result<Vec<Post>, DbError> {
        let mut qb = Self::select();
        qb.where_eq(column, value).order_by("id");
        self.find_with(qb).await
    }
}

#[async_trait]
impl TableGateway for PostTable {
    type Entity = Post;
    type New = NewPost;

    const TABLE: &'static str = "posts";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "content", "created_at"];

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert(&self, new: &NewPost) -> Result<Post, DbError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, content)
            VALUES ($1, $2)
            RETURNING id, user_id, content, created_at
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = post.id, user_id = %post.user_id, "inserted post");
        Ok(post)
    }

    async fn update(&self, post: &Post) -> Result<Post, DbError> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET user_id = $2, content = $3
            WHERE id = $1
            RETURNING id, user_id, content, created_at
            "#,
        )
        .bind(post.id)
        .bind(&post.user_id)
        .bind(&post.content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }
}
