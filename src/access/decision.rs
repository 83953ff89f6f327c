//! Decision values produced by the access rules

use serde::Serialize;
use std::fmt;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Authenticated but not permitted.
    Forbidden,
    /// The target entity does not exist, or its existence is concealed.
    NotFound,
    /// A uniqueness rule would be broken.
    Duplicate,
    /// A referenced entity is missing or has the wrong role.
    InvalidReference,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Forbidden => "forbidden",
            DenyReason::NotFound => "not_found",
            DenyReason::Duplicate => "duplicate",
            DenyReason::InvalidReference => "invalid_reference",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every protected operation the rules know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAgency,
    UpdateAgency,
    DeleteAgency,
    ListAgencies,
    ReadAgency,
    CreateComplaint,
    ListComplaints,
    ReadComplaint,
    UpdateComplaint,
    AssignComplaint,
    CreateResponse,
    ListResponses,
    ListAccounts,
    ManageAccounts,
}

impl Operation {
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::CreateAgency => "create agencies",
            Operation::UpdateAgency => "update this agency",
            Operation::DeleteAgency => "delete agencies",
            Operation::ListAgencies => "list agencies",
            Operation::ReadAgency => "view this agency",
            Operation::CreateComplaint => "file complaints",
            Operation::ListComplaints => "list complaints",
            Operation::ReadComplaint => "view this complaint",
            Operation::UpdateComplaint => "update this complaint",
            Operation::AssignComplaint => "assign complaints",
            Operation::CreateResponse => "respond to this complaint",
            Operation::ListResponses => "view responses to this complaint",
            Operation::ListAccounts => "list accounts",
            Operation::ManageAccounts => "manage accounts",
        }
    }

    /// Entity kind the operation targets, for not-found and duplicate messages.
    pub fn target(&self) -> &'static str {
        match self {
            Operation::CreateAgency
            | Operation::UpdateAgency
            | Operation::DeleteAgency
            | Operation::ListAgencies
            | Operation::ReadAgency => "Agency",
            Operation::ListAccounts | Operation::ManageAccounts => "Account",
            _ => "Complaint",
        }
    }

    fn invalid_reference(&self) -> &'static str {
        match self {
            Operation::CreateAgency | Operation::UpdateAgency => {
                "admin_id must reference an existing agency admin account"
            }
            Operation::AssignComplaint => "agency_id must reference an existing agency",
            _ => "Invalid reference",
        }
    }
}

/// Outcome of a single rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn allow_if(condition: bool, otherwise: DenyReason) -> Self {
        if condition {
            Decision::Allow
        } else {
            Decision::Deny(otherwise)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }

    /// Evaluates the next check only when this one allowed.
    pub fn and_then(self, next: impl FnOnce() -> Decision) -> Decision {
        match self {
            Decision::Allow => next(),
            deny => deny,
        }
    }

    /// Turns a denial into an error tagged with the operation.
    pub fn require(self, operation: Operation) -> Result<(), Denied> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(Denied { operation, reason }),
        }
    }
}

/// A denial carried through `?` to the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denied {
    pub operation: Operation,
    pub reason: DenyReason,
}

impl fmt::Display for Denied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            DenyReason::Forbidden => write!(f, "Not permitted to {}", self.operation.describe()),
            DenyReason::NotFound => write!(f, "{} not found", self.operation.target()),
            DenyReason::Duplicate => write!(f, "{} with this name already exists", self.operation.target()),
            DenyReason::InvalidReference => f.write_str(self.operation.invalid_reference()),
        }
    }
}

impl std::error::Error for Denied {}
