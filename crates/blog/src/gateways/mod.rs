//! Per-table data access.
//!
//! Each table gets a gateway implementing [`TableGateway`]. The trait supplies
//! the generic reads (`find_with`, `find_by_id`, `find_all`, `count`) and
//! `delete`; the gateways implement the writes and any table-specific finders.

mod comments;
mod posts;
mod users;

pub use comments::CommentTable;
pub use posts::PostTable;
pub use users::UserTable;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, postgres::PgRow};

use crate::errors::DbError;
use crate::query_builder::{Aggregate, QueryBuilder, SqlCondition, bind_values};

#[async_trait]
pub trait TableGateway: Send + Sync {
    /// Row type returned by reads and writes.
    type Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin;
    /// Caller-supplied fields for an insert.
    type New: Send + Sync;

    const TABLE: &'static str;
    /// Columns selected for [`Self::Entity`], primary key first.
    const COLUMNS: &'static [&'static str];

    fn pool(&self) -> &PgPool;

    /// Inserts a row and returns it with its store-assigned fields.
    async fn insert(&self, new: &Self::New) -> Result<Self::Entity, DbError>;

    /// Overwrites the row with the entity's id. Fails with [`DbError::NotFound`]
    /// if no such row exists.
    async fn update(&self, entity: &Self::Entity) -> Result<Self::Entity, DbError>;

    /// A builder pre-loaded with this table's select list.
    fn select() -> QueryBuilder {
        let mut qb = QueryBuilder::new();
        qb.select(Self::COLUMNS).from(Self::TABLE);
        qb
    }

    /// Runs a builder obtained from [`Self::select`], binding its values in order.
    async fn find_with(&self, qb: QueryBuilder) -> Result<Vec<Self::Entity>, DbError> {
        let sql = qb.build()?;

        let rows = bind_values(sqlx::query_as::<_, Self::Entity>(&sql), qb.values())
            .fetch_all(self.pool())
            .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Self::Entity>, DbError> {
        let mut qb = Self::select();
        qb.where_eq("id", id);
        Ok(self.find_with(qb).await?.into_iter().next())
    }

    async fn find_all(&self) -> Result<Vec<Self::Entity>, DbError> {
        let mut qb = Self::select();
        qb.order_by("id");
        self.find_with(qb).await
    }

    /// Deletes the row with the given id. Returns true if a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, DbError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, DbError> {
        let mut qb = QueryBuilder::new();
        qb.select(&[SqlCondition::aggregate(Aggregate::Count, "id").to_string()])
            .from(Self::TABLE);
        let sql = qb.build()?;

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }
}
