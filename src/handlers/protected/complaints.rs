// handlers/protected/complaints.rs - Complaint filing, listing, reading and updates

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{Caller, ComplaintQuery, Operation};
use crate::database::models::{Complaint, ComplaintChanges, ComplaintDraft, ComplaintStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Validator;

#[derive(Debug, Default, Deserialize)]
pub struct ComplaintListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<ComplaintStatus>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: ComplaintStatus,
}

/// Loads a complaint or fails with 404.
pub(crate) async fn load(state: &AppState, id: Uuid) -> Result<Complaint, ApiError> {
    state
        .store
        .complaints
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Complaint not found"))
}

/**
 * POST /api/complaints - File a new complaint
 *
 * The filer always becomes the owner and the complaint always starts out
 * pending and unassigned, whatever the payload says.
 *
 * Input:
 * ```json
 * { "title": "Pothole", "description": "Deep pothole on Main St", "category": "roads", "location": "Main St", "priority": 3 }
 * ```
 */
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(draft): Json<ComplaintDraft>,
) -> ApiResult<Complaint> {
    Validator::new()
        .required("title", &draft.title)
        .required("description", &draft.description)
        .required("category", &draft.category)
        .priority("priority", draft.priority)
        .finish()?;

    let complaint = state.access.file_complaint(&caller, draft, Uuid::new_v4(), Utc::now())?;
    state.store.complaints.insert(complaint.clone()).await?;
    tracing::info!("Complaint {} filed by {}", complaint.id, caller.id);
    Ok(ApiResponse::created(complaint))
}

/// GET /api/complaints - complaints visible to the caller, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ComplaintListParams>,
) -> ApiResult<Vec<Complaint>> {
    let query = ComplaintQuery {
        status: params.status,
        category: params.category,
    };
    let scope = state.access.complaint_scope(&caller, &query);
    let page = crate::filter::Page::from_query(params.skip, params.limit, &state.config.pagination);

    let complaints = state.store.complaints.list(scope, page).await?;
    Ok(ApiResponse::success(complaints))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> ApiResult<Complaint> {
    let complaint = load(&state, id).await?;
    state
        .access
        .read_complaint(&caller, &complaint)
        .require(Operation::ReadComplaint)?;
    Ok(ApiResponse::success(complaint))
}

/**
 * PUT /api/complaints/:id - Edit content and optionally move the status
 *
 * Every field is optional. Moving to `resolved` stamps `resolved_at`.
 */
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(changes): Json<ComplaintChanges>,
) -> ApiResult<Complaint> {
    Validator::new()
        .present("title", changes.title.as_deref())
        .present("description", changes.description.as_deref())
        .present("category", changes.category.as_deref())
        .priority("priority", changes.priority)
        .finish()?;

    apply_changes(&state, &caller, id, changes).await.map(ApiResponse::success)
}

/// PUT /api/complaints/:id/status - `{"status": "resolved"}`
pub async fn update_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange>,
) -> ApiResult<Complaint> {
    let changes = ComplaintChanges {
        status: Some(change.status),
        ..Default::default()
    };
    apply_changes(&state, &caller, id, changes).await.map(ApiResponse::success)
}

async fn apply_changes(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
    changes: ComplaintChanges,
) -> Result<Complaint, ApiError> {
    let complaint = load(state, id).await?;
    state
        .access
        .update_complaint(caller, &complaint)
        .require(Operation::UpdateComplaint)?;

    let previous = complaint.status;
    let updated = complaint.apply(changes, Utc::now());
    state.store.complaints.update(updated.clone()).await?;

    if updated.status != previous {
        tracing::info!("Complaint {} moved {} -> {} by {}", id, previous, updated.status, caller.id);
    }
    Ok(updated)
}
