// handlers/protected/agencies.rs - Agency directory and administration

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::PageParams;
use crate::access::{AgencyChange, Caller, Operation};
use crate::database::models::{Account, Agency};
use crate::error::ApiError;
use crate::filter::Predicate;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Validator;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AgencyDraft {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub admin_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgencyChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub admin_id: Option<Uuid>,
}

async fn load(state: &AppState, id: Uuid) -> Result<Agency, ApiError> {
    state
        .store
        .agencies
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Agency not found"))
}

async fn find_account(state: &AppState, id: Option<Uuid>) -> Result<Option<Account>, ApiError> {
    match id {
        Some(id) => Ok(state.store.accounts.find_by_id(id).await?),
        None => Ok(None),
    }
}

/// Whether an agency other than `except` already uses `name`.
async fn name_taken(state: &AppState, name: &str, except: Option<Uuid>) -> Result<bool, ApiError> {
    let predicate = Predicate::eq("name", name.trim()).and_maybe(except.map(|id| Predicate::ne("id", id)));
    Ok(state.store.agencies.find_one(predicate).await?.is_some())
}

pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<PageParams>,
) -> ApiResult<Vec<Agency>> {
    state.access.read_agencies(&caller).require(Operation::ListAgencies)?;
    let agencies = state
        .store
        .agencies
        .list(Predicate::Always, params.page(&state.config.pagination))
        .await?;
    Ok(ApiResponse::success(agencies))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> ApiResult<Agency> {
    state.access.read_agencies(&caller).require(Operation::ReadAgency)?;
    Ok(ApiResponse::success(load(&state, id).await?))
}

/**
 * POST /api/agencies - Register an agency (system admin)
 *
 * Input:
 * ```json
 * {
 *   "name": "Roads Authority",
 *   "description": "Road maintenance",
 *   "contact_email": "roads@example.gov",
 *   "contact_phone": "0788000000",
 *   "admin_id": "<uuid of an agency_admin account>"
 * }
 * ```
 *
 * 409 when the name is taken (reported before the role check), 403 for
 * non system admins, 400 when `admin_id` is not an agency admin.
 */
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(draft): Json<AgencyDraft>,
) -> ApiResult<Agency> {
    Validator::new()
        .required("name", &draft.name)
        .required("description", &draft.description)
        .email("contact_email", &draft.contact_email)
        .required("contact_phone", &draft.contact_phone)
        .finish()?;

    let taken = name_taken(&state, &draft.name, None).await?;
    let admin = find_account(&state, draft.admin_id).await?;
    state
        .access
        .create_agency(&caller, admin.as_ref(), taken)
        .require(Operation::CreateAgency)?;

    let admin_id = admin
        .map(|account| account.id)
        .ok_or_else(|| ApiError::invalid_reference("Admin must be an existing agency admin"))?;

    let now = Utc::now();
    let agency = Agency {
        id: Uuid::new_v4(),
        name: draft.name.trim().to_string(),
        description: draft.description,
        contact_email: draft.contact_email.trim().to_string(),
        contact_phone: draft.contact_phone,
        admin_id,
        created_at: now,
        updated_at: now,
    };
    state.store.agencies.insert(agency.clone()).await?;
    tracing::info!("Agency {} ({}) created by {}", agency.id, agency.name, caller.id);
    Ok(ApiResponse::created(agency))
}

/// PUT /api/agencies/:id - partial update by a system admin or the agency's own admin.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(changes): Json<AgencyChanges>,
) -> ApiResult<Agency> {
    Validator::new()
        .present("name", changes.name.as_deref())
        .present("description", changes.description.as_deref())
        .present("contact_phone", changes.contact_phone.as_deref())
        .finish()?;
    if let Some(email) = changes.contact_email.as_deref() {
        Validator::new().email("contact_email", email).finish()?;
    }

    let mut agency = load(&state, id).await?;

    let taken = match changes.name.as_deref() {
        Some(name) => name_taken(&state, name, Some(agency.id)).await?,
        None => false,
    };
    let replacing_admin = changes.admin_id.filter(|admin_id| *admin_id != agency.admin_id);
    let new_admin = find_account(&state, replacing_admin).await?;
    let change = AgencyChange {
        name_taken: taken,
        new_admin: replacing_admin.map(|_| new_admin.as_ref()),
    };
    state
        .access
        .update_agency(&caller, &agency, change)
        .require(Operation::UpdateAgency)?;

    if let Some(name) = changes.name {
        agency.name = name.trim().to_string();
    }
    if let Some(description) = changes.description {
        agency.description = description;
    }
    if let Some(email) = changes.contact_email {
        agency.contact_email = email.trim().to_string();
    }
    if let Some(phone) = changes.contact_phone {
        agency.contact_phone = phone;
    }
    if let Some(admin_id) = replacing_admin {
        agency.admin_id = admin_id;
    }
    agency.updated_at = Utc::now();

    state.store.agencies.update(agency.clone()).await?;
    Ok(ApiResponse::success(agency))
}

/// DELETE /api/agencies/:id - system admin only; assigned complaints become unassigned.
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.access.delete_agency(&caller).require(Operation::DeleteAgency)?;
    let agency = load(&state, id).await?;

    let now = Utc::now();
    let assigned = state
        .store
        .complaints
        .list_all(Predicate::eq("agency_id", agency.id))
        .await?;
    let released = assigned.len();
    for complaint in assigned {
        state.store.complaints.update(complaint.unassigned(now)).await?;
    }

    state.store.agencies.delete(agency.id).await?;
    tracing::info!("Agency {} deleted by {}; {} complaint(s) unassigned", agency.id, caller.id, released);
    Ok(ApiResponse::no_content())
}
