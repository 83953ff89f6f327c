use async_trait::async_trait;
use uuid::Uuid;

use super::entity::Entity;
use super::manager::DatabaseError;
use crate::filter::{Page, Predicate};

/// Storage for one entity kind. Implemented by the Postgres and in-memory stores.
#[async_trait]
pub trait Collection<T: Entity>: Send + Sync {
    async fn find_one(&self, predicate: Predicate) -> Result<Option<T>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        self.find_one(Predicate::eq("id", id)).await
    }

    /// One page of matching records in the entity's default order.
    async fn list(&self, predicate: Predicate, page: Page) -> Result<Vec<T>, DatabaseError>;

    /// Every matching record; for internal bulk work, not request paths.
    async fn list_all(&self, predicate: Predicate) -> Result<Vec<T>, DatabaseError>;

    async fn insert(&self, record: T) -> Result<Uuid, DatabaseError>;

    /// Replaces the stored record with the same id.
    async fn update(&self, record: T) -> Result<(), DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;
}
