use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::caller::Caller;
use super::decision::{Decision, Denied, DenyReason, Operation};
use crate::database::models::{
    Account, Agency, Complaint, ComplaintDraft, ComplaintStatus, Response, Role, MIN_PRIORITY,
};

/// Deployment-level choices the rules defer to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Deny a citizen's access to another citizen's complaint as `not_found` instead of `forbidden`.
    pub conceal_foreign_complaints: bool,
}

/// Proposed edits to an agency that the rules must vet.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgencyChange<'a> {
    /// Another agency already uses the requested name.
    pub name_taken: bool,
    /// `Some` when the edit replaces the admin; the inner value is the account found for the new id.
    pub new_admin: Option<Option<&'a Account>>,
}

/// Role-based access rules. Pure: every input is a snapshot resolved by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControl {
    policy: AccessPolicy,
}

impl AccessControl {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    pub fn create_agency(&self, caller: &Caller, proposed_admin: Option<&Account>, name_taken: bool) -> Decision {
        signed_in(caller)
            .and_then(|| Decision::allow_if(!name_taken, DenyReason::Duplicate))
            .and_then(|| Decision::allow_if(caller.is_system_admin(), DenyReason::Forbidden))
            .and_then(|| admin_reference(proposed_admin))
    }

    pub fn update_agency(&self, caller: &Caller, agency: &Agency, change: AgencyChange<'_>) -> Decision {
        let permitted = caller.is_system_admin() || (caller.role == Role::AgencyAdmin && caller.id == agency.admin_id);
        signed_in(caller)
            .and_then(|| Decision::allow_if(permitted, DenyReason::Forbidden))
            .and_then(|| Decision::allow_if(!change.name_taken, DenyReason::Duplicate))
            .and_then(|| match change.new_admin {
                Some(account) => admin_reference(account),
                None => Decision::Allow,
            })
    }

    pub fn delete_agency(&self, caller: &Caller) -> Decision {
        Decision::allow_if(caller.is_system_admin(), DenyReason::Forbidden)
    }

    /// Listing and reading agencies is open to every signed-in account.
    pub fn read_agencies(&self, caller: &Caller) -> Decision {
        signed_in(caller)
    }

    pub fn create_complaint(&self, caller: &Caller) -> Decision {
        signed_in(caller)
    }

    /// Builds the record for a new complaint. Owner and workflow fields in the draft are ignored.
    pub fn file_complaint(
        &self,
        caller: &Caller,
        draft: ComplaintDraft,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Complaint, Denied> {
        self.create_complaint(caller).require(Operation::CreateComplaint)?;
        Ok(Complaint {
            id,
            owner_id: caller.id,
            agency_id: None,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            location: draft.location,
            priority: draft.priority.unwrap_or(MIN_PRIORITY),
            status: ComplaintStatus::Pending,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        })
    }

    pub fn read_complaint(&self, caller: &Caller, complaint: &Complaint) -> Decision {
        signed_in(caller).and_then(|| match caller.role {
            Role::AgencyAdmin | Role::SystemAdmin => Decision::Allow,
            Role::Citizen if complaint.owner_id == caller.id => Decision::Allow,
            Role::Citizen => Decision::Deny(self.foreign_complaint()),
        })
    }

    /// Content edits and status transitions share the read rule.
    pub fn update_complaint(&self, caller: &Caller, complaint: &Complaint) -> Decision {
        self.read_complaint(caller, complaint)
    }

    /// System admins only. Role is checked before existence so other roles learn nothing.
    pub fn assign_complaint(&self, caller: &Caller, complaint: Option<&Complaint>, agency: Option<&Agency>) -> Decision {
        Decision::allow_if(caller.is_system_admin(), DenyReason::Forbidden)
            .and_then(|| Decision::allow_if(complaint.is_some(), DenyReason::NotFound))
            .and_then(|| Decision::allow_if(agency.is_some(), DenyReason::InvalidReference))
    }

    pub fn respond_to_complaint(&self, caller: &Caller, complaint: &Complaint) -> Decision {
        self.read_complaint(caller, complaint)
    }

    pub fn list_responses(&self, caller: &Caller, complaint: &Complaint) -> Decision {
        self.read_complaint(caller, complaint)
    }

    /// Builds a response to `complaint`, attributed to the caller.
    pub fn compose_response(
        &self,
        caller: &Caller,
        complaint: &Complaint,
        message: String,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Response, Denied> {
        self.respond_to_complaint(caller, complaint)
            .require(Operation::CreateResponse)?;
        Ok(Response {
            id,
            complaint_id: complaint.id,
            responder_id: caller.id,
            message,
            created_at: now,
        })
    }

    pub fn list_accounts(&self, caller: &Caller) -> Decision {
        Decision::allow_if(caller.is_system_admin(), DenyReason::Forbidden)
    }

    /// Creating accounts of any role and toggling the active flag.
    pub fn manage_accounts(&self, caller: &Caller) -> Decision {
        Decision::allow_if(caller.is_system_admin(), DenyReason::Forbidden)
    }

    fn foreign_complaint(&self) -> DenyReason {
        if self.policy.conceal_foreign_complaints {
            DenyReason::NotFound
        } else {
            DenyReason::Forbidden
        }
    }
}

fn signed_in(caller: &Caller) -> Decision {
    Decision::allow_if(caller.active, DenyReason::Forbidden)
}

fn admin_reference(account: Option<&Account>) -> Decision {
    Decision::allow_if(account.is_some_and(Account::is_agency_admin), DenyReason::InvalidReference)
}
