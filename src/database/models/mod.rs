pub mod account;
pub mod agency;
pub mod complaint;
pub mod response;

pub use account::{Account, Role};
pub use agency::Agency;
pub use complaint::{Complaint, ComplaintChanges, ComplaintDraft, ComplaintStatus, MAX_PRIORITY, MIN_PRIORITY};
pub use response::Response;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Invalid {field}: '{value}'")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
