//! SQL query builder for SELECT statements.
//!
//! The builder renders the statement text and collects the values for its
//! `$n` placeholders in order, so callers never count parameters by hand.
//! Placeholders are numbered across the whole statement: a HAVING value added
//! after two WHERE values becomes `$3`.

use std::fmt;

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};

use crate::errors::DbError;

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i32),
    BigInt(i64),
    Text(String),
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

/// Builder for SELECT statements with bound values.
///
/// # Example
/// ```ignore
/// let mut qb = QueryBuilder::new();
/// qb.select(&["id", "content"]).from("posts").where_eq("user_id", "user1");
/// let sql = qb.build()?;
/// let posts: Vec<Post> = bind_values(sqlx::query_as(&sql), qb.values())
///     .fetch_all(&pool)
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct QueryBuilder {
    table: Option<String>,
    columns: Vec<String>,
    conditions: Vec<String>,
    group_by: Vec<String>,
    having: Vec<String>,
    order_by: Vec<String>,
    values: Vec<SqlValue>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends columns (or expressions) to the select list.
    pub fn select<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        self.columns
            .extend(columns.iter().map(|c| c.as_ref().to_string()));
        self
    }

    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// Adds `column = $n` and binds `value` to it.
    pub fn where_eq(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_cmp(column, "=", value)
    }

    /// Adds `column <operator> $n` and binds `value` to it.
    pub fn where_cmp(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<SqlValue>,
    ) -> &mut Self {
        let placeholder = self.push_value(value);
        self.conditions
            .push(format!("{column} {operator} {placeholder}"));
        self
    }

    pub fn group_by<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        self.group_by
            .extend(columns.iter().map(|c| c.as_ref().to_string()));
        self
    }

    /// Adds `<condition> <operator> $n` to HAVING and binds `value` to it.
    pub fn having_cmp(
        &mut self,
        condition: SqlCondition,
        operator: &str,
        value: impl Into<SqlValue>,
    ) -> &mut Self {
        let placeholder = self.push_value(value);
        self.having
            .push(condition.with_operator(operator, placeholder).to_string());
        self
    }

    pub fn order_by(&mut self, expression: impl Into<String>) -> &mut Self {
        self.order_by.push(expression.into());
        self
    }

    /// Values for `$1..$n`, in order.
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    fn push_value(&mut self, value: impl Into<SqlValue>) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }

    /// Builds the complete SELECT statement.
    pub fn build(&self) -> Result<String, DbError> {
        let table = match &self.table {
            Some(table) if !self.columns.is_empty() => table,
            _ => {
                return Err(DbError::InvalidQuery(
                    "table and columns must be specified".to_string(),
                ));
            }
        };

        let mut sql = format!("SELECT {} FROM {table}", self.columns.join(", "));

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.join(" AND "));
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        Ok(sql)
    }
}

/// Binds the builder's values, in placeholder order, to a row query.
pub fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::BigInt(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

/// Binds the builder's values, in placeholder order, to a scalar query.
pub fn bind_scalar_values<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    values: &'q [SqlValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::BigInt(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

/// SQL aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }
}

/// A function expression over columns, optionally compared to a value.
///
/// `COUNT(id)`, `CONCAT(user_id, content)`, `COUNT(id) >= $1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlCondition {
    function: String,
    columns: Vec<String>,
    comparison: Option<(String, String)>,
}

impl SqlCondition {
    pub fn aggregate(function: Aggregate, column: &str) -> Self {
        Self::function(function.as_str(), &[column])
    }

    pub fn function(name: &str, columns: &[&str]) -> Self {
        Self {
            function: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            comparison: None,
        }
    }

    pub fn with_operator(mut self, operator: &str, value: impl Into<String>) -> Self {
        self.comparison = Some((operator.to_string(), value.into()));
        self
    }
}

impl fmt::Display for SqlCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.columns.join(", "))?;
        if let Some((operator, value)) = &self.comparison {
            write!(f, " {operator} {value}")?;
        }
        Ok(())
    }
}
