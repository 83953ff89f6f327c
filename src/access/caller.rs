use uuid::Uuid;

use crate::database::models::{Account, Role};

/// The authenticated account behind a request, as the access rules see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
    /// Agency administered by this caller; only ever set for agency admins.
    pub affiliated_agency_id: Option<Uuid>,
    pub active: bool,
}

impl Caller {
    pub fn from_account(account: &Account, affiliated_agency_id: Option<Uuid>) -> Self {
        Self {
            id: account.id,
            role: account.role,
            affiliated_agency_id: affiliated_agency_id.filter(|_| account.role == Role::AgencyAdmin),
            active: account.is_active,
        }
    }

    /// Active system admin.
    pub fn is_system_admin(&self) -> bool {
        self.active && self.role == Role::SystemAdmin
    }
}
