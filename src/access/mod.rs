//! Role-based access rules for accounts, agencies, complaints and responses.
//!
//! Everything here is synchronous and free of I/O. Handlers resolve the
//! entities a rule needs, ask for a [`Decision`] (or a scoping [`Predicate`]
//! for listings), and only then touch the store.
//!
//! [`Predicate`]: crate::filter::Predicate

pub mod caller;
pub mod decision;
pub mod rules;
pub mod scope;

pub use caller::Caller;
pub use decision::{Decision, Denied, DenyReason, Operation};
pub use rules::{AccessControl, AccessPolicy, AgencyChange};
pub use scope::ComplaintQuery;
