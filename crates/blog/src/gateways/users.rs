use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::TableGateway;
use crate::errors::DbError;
use crate::models::{NewUser, User};
use crate::query_builder::{Aggregate, QueryBuilder, SqlCondition, bind_scalar_values};

#[derive(Clone)]
pub struct UserTable {
    pool: PgPool,
}

impl UserTable {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let mut qb = Self::select();
        qb.where_eq("username", username);
        Ok(self.find_with(qb).await?.into_iter().next())
    }

    /// Whether a user with this username has been created.
    pub async fn exists(&self, username: &str) -> Result<bool, DbError> {
        let mut qb = QueryBuilder::new();
        qb.select(&[SqlCondition::aggregate(Aggregate::Count, "id").to_string()])
            .from(Self::TABLE)
            .where_eq("username", username);
        let sql = qb.build()?;

        let count = bind_scalar_values(sqlx::query_scalar::<_, i64>(&sql), qb.values())
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

#[async_trait]
impl TableGateway for UserTable {
    type Entity = User;
    type New = NewUser;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "username", "password", "created_at"];

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert(&self, new: &NewUser) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = user.id, username = %user.username, "inserted user");
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET username = $2, password = $3
            WHERE id = $1
            RETURNING id, username, password, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }
}
