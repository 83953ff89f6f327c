use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::collection::Collection;
use super::entity::Entity;
use super::manager::DatabaseError;
use crate::filter::{compare_by, Fields, FilterOrder, Page, Predicate};

/// In-process collection used by tests and database-less development runs.
pub struct MemoryCollection<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Entity> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    fn matching(rows: &HashMap<Uuid, T>, predicate: &Predicate) -> Result<Vec<T>, DatabaseError> {
        let mut out = Vec::new();
        for row in rows.values() {
            if predicate.matches(row)? {
                out.push(row.clone());
            }
        }
        let order = FilterOrder::parse(T::DEFAULT_ORDER)?;
        out.sort_by(|a, b| compare_by(a, b, &order).then_with(|| a.id().cmp(&b.id())));
        Ok(out)
    }

    /// Rejects `record` if it repeats a unique column value held by another row.
    fn check_unique(rows: &HashMap<Uuid, T>, record: &T) -> Result<(), DatabaseError> {
        for column in T::UNIQUE {
            let Some(value) = record.field(column) else {
                continue;
            };
            let clash = rows
                .values()
                .filter(|other| other.id() != record.id())
                .any(|other| other.field(column).is_some_and(|v| v.sql_eq(&value)));
            if clash {
                return Err(DatabaseError::Duplicate(format!(
                    "{} with this {} already exists",
                    T::KIND,
                    column
                )));
            }
        }
        Ok(())
    }
}

impl<T: Entity> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Collection<T> for MemoryCollection<T> {
    async fn find_one(&self, predicate: Predicate) -> Result<Option<T>, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(Self::matching(&rows, &predicate)?.into_iter().next())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(&self, predicate: Predicate, page: Page) -> Result<Vec<T>, DatabaseError> {
        let rows = self.rows.read().await;
        let skip = usize::try_from(page.skip).unwrap_or(0);
        let limit = usize::try_from(page.limit).unwrap_or(0);
        Ok(Self::matching(&rows, &predicate)?.into_iter().skip(skip).take(limit).collect())
    }

    async fn list_all(&self, predicate: Predicate) -> Result<Vec<T>, DatabaseError> {
        let rows = self.rows.read().await;
        Self::matching(&rows, &predicate)
    }


    async fn insert(&self, record: T) -> Result<Uuid, DatabaseError> {
        let mut rows = self.rows.write().await;
        let id = record.id();
        if rows.contains_key(&id) {
            return Err(DatabaseError::Duplicate(format!("{} {} already exists", T::KIND, id)));
        }
        Self::check_unique(&rows, &record)?;
        rows.insert(id, record);
        Ok(id)
    }

    async fn update(&self, record: T) -> Result<(), DatabaseError> {
        let mut rows = self.rows.write().await;
        let id = record.id();
        if !rows.contains_key(&id) {
            return Err(DatabaseError::NotFound(format!("{} {} not found", T::KIND, id)));
        }
        Self::check_unique(&rows, &record)?;
        rows.insert(id, record);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("{} {} not found", T::KIND, id))),
        }
    }
}
