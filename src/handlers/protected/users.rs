// handlers/protected/users.rs - GET /api/users/me

use axum::Extension;

use crate::database::models::Account;
use crate::middleware::{ApiResponse, ApiResult};

/// The authenticated account, as loaded by the auth middleware.
pub async fn me(Extension(account): Extension<Account>) -> ApiResult<Account> {
    Ok(ApiResponse::success(account))
}
