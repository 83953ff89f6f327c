// handlers/protected/responses.rs - Responses posted against a complaint

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::complaints::load;
use super::PageParams;
use crate::access::{Caller, Operation};
use crate::database::models::Response;
use crate::filter::Predicate;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Validator;

#[derive(Debug, Deserialize)]
pub struct ResponseDraft {
    pub message: String,
}

/// POST /api/complaints/:id/responses - `{"message": "..."}`; the caller is recorded as responder.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(complaint_id): Path<Uuid>,
    Json(draft): Json<ResponseDraft>,
) -> ApiResult<Response> {
    Validator::new().required("message", &draft.message).finish()?;

    let complaint = load(&state, complaint_id).await?;
    let response = state
        .access
        .compose_response(&caller, &complaint, draft.message, Uuid::new_v4(), Utc::now())?;
    state.store.responses.insert(response.clone()).await?;
    Ok(ApiResponse::created(response))
}

/// GET /api/complaints/:id/responses - oldest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(complaint_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> ApiResult<Vec<Response>> {
    let complaint = load(&state, complaint_id).await?;
    state
        .access
        .list_responses(&caller, &complaint)
        .require(Operation::ListResponses)?;

    let responses = state
        .store
        .responses
        .list(Predicate::eq("complaint_id", complaint.id), params.page(&state.config.pagination))
        .await?;
    Ok(ApiResponse::success(responses))
}
