// handlers/elevated/assignments.rs - PUT /api/complaints/:id/assign

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{Caller, Operation};
use crate::database::models::Complaint;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Assignment {
    pub agency_id: Uuid,
}

/**
 * PUT /api/complaints/:id/assign - Hand a complaint to an agency
 *
 * Input: `{"agency_id": "<uuid>"}`
 *
 * 403 for anyone but a system admin (even for unknown ids), 404 when the
 * complaint does not exist, 400 when the agency does not. On success the
 * complaint moves to `in_progress`.
 */
pub async fn assign(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(assignment): Json<Assignment>,
) -> ApiResult<Complaint> {
    let complaint = state.store.complaints.find_by_id(id).await?;
    let agency = state.store.agencies.find_by_id(assignment.agency_id).await?;
    state
        .access
        .assign_complaint(&caller, complaint.as_ref(), agency.as_ref())
        .require(Operation::AssignComplaint)?;

    let (Some(complaint), Some(agency)) = (complaint, agency) else {
        return Err(ApiError::internal_server_error("Assignment allowed without both targets"));
    };

    let updated = complaint.assigned_to(agency.id, Utc::now());
    state.store.complaints.update(updated.clone()).await?;
    tracing::info!("Complaint {} assigned to agency {} by {}", updated.id, agency.id, caller.id);
    Ok(ApiResponse::success(updated))
}
