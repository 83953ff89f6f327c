use serde::Deserialize;

use super::caller::Caller;
use super::rules::AccessControl;
use crate::database::models::{ComplaintStatus, Role};
use crate::filter::Predicate;

/// Optional equality filters a caller may add to a complaint listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintQuery {
    pub status: Option<ComplaintStatus>,
    pub category: Option<String>,
}

impl AccessControl {
    /// Rows of `complaints` the caller may list, narrowed by the requested filters.
    pub fn complaint_scope(&self, caller: &Caller, query: &ComplaintQuery) -> Predicate {
        if !caller.active {
            return Predicate::Never;
        }

        let visible = match caller.role {
            Role::Citizen => Predicate::eq("owner_id", caller.id),
            Role::AgencyAdmin => match caller.affiliated_agency_id {
                Some(agency_id) => Predicate::eq("agency_id", agency_id),
                None => Predicate::Never,
            },
            Role::SystemAdmin => Predicate::Always,
        };

        visible
            .and_maybe(query.status.map(|s| Predicate::eq("status", s.as_str())))
            .and_maybe(query.category.as_deref().map(|c| Predicate::eq("category", c)))
    }
}
