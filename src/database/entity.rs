use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow};
use uuid::Uuid;

use crate::filter::{Fields, Value};

/// A record kind persisted in its own table.
///
/// `values()` must line up with `COLUMNS` index for index; both stores derive
/// their writes and in-memory predicate evaluation from that pairing.
pub trait Entity:
    Clone + Send + Sync + Unpin + Serialize + for<'r> FromRow<'r, PgRow> + 'static
{
    const TABLE: &'static str;
    /// Human name used in error messages.
    const KIND: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Columns whose non-null values must be distinct across the table.
    const UNIQUE: &'static [&'static str] = &[];
    const DEFAULT_ORDER: &'static str = "created_at desc";

    fn id(&self) -> Uuid;

    fn values(&self) -> Vec<Value>;
}

impl<T: Entity> Fields for T {
    fn table() -> &'static str {
        T::TABLE
    }

    fn field(&self, column: &str) -> Option<Value> {
        let index = T::COLUMNS.iter().position(|c| *c == column)?;
        self.values().into_iter().nth(index)
    }
}
