// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: authenticated, active account
// Route Prefix: /api/*
// Middleware: middleware::authenticate injects `Caller` and `Account`
//
// Each handler resolves what the access rules need with one store read per
// entity, asks `AccessControl`, and only then writes.

pub mod agencies;
pub mod complaints;
pub mod responses;
pub mod users;

use serde::Deserialize;

use crate::config::PaginationConfig;
use crate::filter::Page;

/// `?skip=&limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn page(&self, config: &PaginationConfig) -> Page {
        Page::from_query(self.skip, self.limit, config)
    }
}
