// handlers/public/auth.rs - Citizen sign-up and token acquisition

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::AccessToken;
use crate::database::models::{Account, Role};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Registration;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

/**
 * POST /auth/register - Self-registration, always as a citizen
 *
 * Input:
 * ```json
 * {
 *   "email": "jane@example.com",
 *   "full_name": "Jane Doe",
 *   "phone_number": "0788123456",
 *   "national_id": "1199780012345678",
 *   "password": "Str0ng!Pass"
 * }
 * ```
 *
 * 201 with the stored account (no password hash), 400 with `field_errors`
 * on invalid input, 409 when the email or national id is already registered.
 */
pub async fn register(State(state): State<AppState>, Json(registration): Json<Registration>) -> ApiResult<Account> {
    let account = state.accounts.register(registration, Role::Citizen).await?;
    Ok(ApiResponse::created(account))
}

/**
 * POST /auth/token - Exchange email and password for a bearer token
 *
 * Output:
 * ```json
 * { "success": true, "data": { "access_token": "eyJ...", "token_type": "bearer", "expires_in": 3600 } }
 * ```
 */
pub async fn token(State(state): State<AppState>, Json(request): Json<TokenRequest>) -> ApiResult<AccessToken> {
    let token = state.accounts.login(&request.email, &request.password).await?;
    Ok(ApiResponse::success(token))
}
