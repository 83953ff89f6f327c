use sqlx::PgPool;
use std::sync::Arc;

use super::collection::Collection;
use super::memory::MemoryCollection;
use super::models::{Account, Agency, Complaint, Response};
use super::postgres::PgCollection;

/// One collection per entity kind, shared by every request.
#[derive(Clone)]
pub struct Store {
    pub accounts: Arc<dyn Collection<Account>>,
    pub agencies: Arc<dyn Collection<Agency>>,
    pub complaints: Arc<dyn Collection<Complaint>>,
    pub responses: Arc<dyn Collection<Response>>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(PgCollection::<Account>::new(pool.clone())),
            agencies: Arc::new(PgCollection::<Agency>::new(pool.clone())),
            complaints: Arc::new(PgCollection::<Complaint>::new(pool.clone())),
            responses: Arc::new(PgCollection::<Response>::new(pool)),
        }
    }

    pub fn memory() -> Self {
        Self {
            accounts: Arc::new(MemoryCollection::<Account>::new()),
            agencies: Arc::new(MemoryCollection::<Agency>::new()),
            complaints: Arc::new(MemoryCollection::<Complaint>::new()),
            responses: Arc::new(MemoryCollection::<Response>::new()),
        }
    }
}
