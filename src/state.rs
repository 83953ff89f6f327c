use sqlx::PgPool;
use std::sync::Arc;

use crate::access::{AccessControl, AccessPolicy};
use crate::auth::CredentialVerifier;
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::AccountService;

/// Shared, read-only application context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub credentials: CredentialVerifier,
    pub accounts: AccountService,
    pub access: AccessControl,
    /// Present when running against Postgres; used by the health check.
    pub database: Option<PgPool>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store, database: Option<PgPool>) -> Self {
        let credentials = CredentialVerifier::new(&config.security);
        let access = AccessControl::new(AccessPolicy {
            conceal_foreign_complaints: config.security.conceal_foreign_complaints,
        });
        let accounts = AccountService::new(store.accounts.clone(), credentials.clone());
        Self {
            config: Arc::new(config),
            store,
            credentials,
            accounts,
            access,
            database,
        }
    }
}
