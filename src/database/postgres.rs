use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::marker::PhantomData;
use uuid::Uuid;

use super::collection::Collection;
use super::entity::Entity;
use super::manager::DatabaseError;
use crate::filter::{Filter, Page, Predicate, SqlResult, Value, ValueKind};

/// Binds every filter value, in order, onto a `query` or `query_as` builder.
macro_rules! bind_values {
    ($query:expr, $params:expr) => {{
        let mut q = $query;
        for value in $params.iter() {
            q = match value {
                Value::Null(ValueKind::Bool) => q.bind(None::<bool>),
                Value::Null(ValueKind::Int) => q.bind(None::<i64>),
                Value::Null(ValueKind::Text) => q.bind(None::<String>),
                Value::Null(ValueKind::Uuid) => q.bind(None::<Uuid>),
                Value::Null(ValueKind::Timestamp) => q.bind(None::<DateTime<Utc>>),
                Value::Bool(b) => q.bind(*b),
                Value::Int(i) => q.bind(*i),
                Value::Text(s) => q.bind(s.as_str()),
                Value::Uuid(u) => q.bind(*u),
                Value::Timestamp(t) => q.bind(*t),
            };
        }
        q
    }};
}

/// Postgres-backed collection. SQL is derived from the entity's column list.
pub struct PgCollection<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> PgCollection<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    async fn select(&self, predicate: Predicate, page: Option<Page>) -> Result<Vec<T>, DatabaseError> {
        let mut filter = Filter::new(T::TABLE)?;
        filter.where_clause(predicate).order(T::DEFAULT_ORDER)?;
        if let Some(page) = page {
            filter.page(page)?;
        }
        let sql = filter.to_sql()?;
        tracing::debug!(table = T::TABLE, query = %sql.query, "select");

        let q = bind_values!(sqlx::query_as::<_, T>(&sql.query), sql.params);
        Ok(q.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl<T: Entity> Collection<T> for PgCollection<T> {
    async fn find_one(&self, predicate: Predicate) -> Result<Option<T>, DatabaseError> {
        Ok(self.select(predicate, Some(Page::first(1))).await?.into_iter().next())
    }

    async fn list(&self, predicate: Predicate, page: Page) -> Result<Vec<T>, DatabaseError> {
        if predicate.is_never() {
            return Ok(vec![]);
        }
        self.select(predicate, Some(page)).await
    }

    async fn list_all(&self, predicate: Predicate) -> Result<Vec<T>, DatabaseError> {
        self.select(predicate, None).await
    }

    async fn insert(&self, record: T) -> Result<Uuid, DatabaseError> {
        let sql = insert_sql::<T>(record.values());
        bind_values!(sqlx::query(&sql.query), sql.params).execute(&self.pool).await?;
        tracing::debug!(table = T::TABLE, id = %record.id(), "inserted");
        Ok(record.id())
    }

    async fn update(&self, record: T) -> Result<(), DatabaseError> {
        let sql = update_sql::<T>(record.id(), record.values());
        let result = bind_values!(sqlx::query(&sql.query), sql.params)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} {} not found", T::KIND, record.id())));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let query = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", T::TABLE);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} {} not found", T::KIND, id)));
        }
        Ok(())
    }
}

fn insert_sql<T: Entity>(values: Vec<Value>) -> SqlResult {
    let columns: Vec<String> = T::COLUMNS.iter().map(|c| format!("\"{}\"", c)).collect();
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
    SqlResult {
        query: format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            T::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        ),
        params: values,
    }
}

fn update_sql<T: Entity>(id: Uuid, values: Vec<Value>) -> SqlResult {
    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (column, value) in T::COLUMNS.iter().zip(values) {
        if *column == "id" {
            continue;
        }
        params.push(value);
        assignments.push(format!("\"{}\" = ${}", column, params.len()));
    }
    params.push(Value::Uuid(id));
    SqlResult {
        query: format!(
            "UPDATE \"{}\" SET {} WHERE \"id\" = ${}",
            T::TABLE,
            assignments.join(", "),
            params.len()
        ),
        params,
    }
}
