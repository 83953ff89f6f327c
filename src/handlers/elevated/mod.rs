// handlers/elevated/mod.rs - System administration handlers
//
// Security Level: authenticated system admin
// Route Prefix: /api/admin/*, /api/complaints/:id/assign
// Middleware: middleware::authenticate; the role itself is checked by AccessControl
//
// Non-admin callers are refused before any target is looked up.

pub mod accounts;
pub mod assignments;
