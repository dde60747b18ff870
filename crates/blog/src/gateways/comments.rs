use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::TableGateway;
use crate::errors::DbError;
use crate::models::{Comment, NewComment, PostCommentCount};
use crate::query_builder::{Aggregate, QueryBuilder, SqlCondition, bind_values};

#[derive(Clone)]
pub struct CommentTable {
    pool: PgPool,
}

impl CommentTable {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_post(&self, post_id: i32) -> Result<Vec<Comment>, DbError> {
        let mut qb = Self::select();
        qb.where_eq("post_id", post_id).order_by("id");
        self.find_with(qb).await
    }

    pub async fn find_by_user(&self, username: &str) -> Result<Vec<Comment>, DbError> {
        let mut qb = Self::select();
        qb.where_eq("user_id", username).order_by("id");
        self.find_with(qb).await
    }

    /// Comments whose content matches exactly, oldest first.
    pub async fn find_by_content(&self, content: &str) -> Result<Vec<Comment>, DbError> {
        let mut qb = Self::select();
        qb.where_eq("content", content).order_by("id");
        self.find_with(qb).await
    }

    /// Comment totals for every post with at least `min_comments` comments.
    pub async fn counts_per_post(
        &self,
        min_comments: i64,
    ) -> Result<Vec<PostCommentCount>, DbError> {
        let count = SqlCondition::aggregate(Aggregate::Count, "id");

        let mut qb = QueryBuilder::new();
        qb.select(&["post_id".to_string(), format!("{count} AS comment_count")])
            .from(Self::TABLE)
            .group_by(&["post_id"])
            .having_cmp(count, ">=", min_comments)
            .order_by("post_id");
        let sql = qb.build()?;

        let counts = bind_values(sqlx::query_as::<_, PostCommentCount>(&sql), qb.values())
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }
}

#[async_trait]
impl TableGateway for CommentTable {
    type Entity = Comment;
    type New = NewComment;

    const TABLE: &'static str = "comments";
    const COLUMNS: &'static [&'static str] = &["id", "post_id", "user_id", "content", "created_at"];

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert(&self, new: &NewComment) -> Result<Comment, DbError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(new.post_id)
        .bind(&new.user_id)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = comment.id, post_id = comment.post_id, "inserted comment");
        Ok(comment)
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, DbError> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET post_id = $2, user_id = $3, content = $4
            WHERE id = $1
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(&comment.user_id)
        .bind(&comment.content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }
}
