// handlers/elevated/accounts.rs - Account administration (system admin)

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{Caller, Operation};
use crate::database::models::{Account, Role};
use crate::filter::{Page, Predicate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Registration;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AccountListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct NewAccount {
    #[serde(flatten)]
    pub registration: Registration,
    pub role: Role,
}

/// GET /api/admin/users?role=agency_admin
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<AccountListParams>,
) -> ApiResult<Vec<Account>> {
    state.access.list_accounts(&caller).require(Operation::ListAccounts)?;

    let predicate = match params.role {
        Some(role) => Predicate::eq("role", role.as_str()),
        None => Predicate::Always,
    };
    let page = Page::from_query(params.skip, params.limit, &state.config.pagination);
    let accounts = state.store.accounts.list(predicate, page).await?;
    Ok(ApiResponse::success(accounts))
}

/**
 * POST /api/admin/users - Create an account with any role
 *
 * Same payload and validation as `/auth/register` plus `"role"`. This is
 * how agency admins come into existence.
 */
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(new_account): Json<NewAccount>,
) -> ApiResult<Account> {
    state.access.manage_accounts(&caller).require(Operation::ManageAccounts)?;
    let account = state.accounts.register(new_account.registration, new_account.role).await?;
    Ok(ApiResponse::created(account))
}

/// PUT /api/admin/users/:id/toggle-status - flips `is_active`.
pub async fn toggle_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> ApiResult<Account> {
    state.access.manage_accounts(&caller).require(Operation::ManageAccounts)?;
    let account = state.accounts.toggle_active(id).await?;
    Ok(ApiResponse::success(account))
}
