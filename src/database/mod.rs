pub mod collection;
pub mod entity;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use collection::Collection;
pub use entity::Entity;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCollection;
pub use postgres::PgCollection;
pub use store::Store;
