use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::access::Caller;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::filter::Predicate;
use crate::state::AppState;

/// Bearer authentication for `/api/*`.
///
/// Validates the token, loads the account it names, rejects inactive
/// accounts, and injects the resulting [`Caller`] and `Account` into the
/// request extensions.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers()).map_err(ApiError::unauthorized)?;
    let account_id = state.credentials.validate(token)?;

    let account = state.store.accounts.find_by_id(account_id).await?.ok_or_else(|| {
        tracing::warn!("Token subject {} no longer exists", account_id);
        ApiError::unauthorized("Could not validate credentials")
    })?;

    if !account.is_active {
        tracing::warn!("Rejected request from inactive account {}", account.id);
        return Err(ApiError::forbidden("Account is inactive"));
    }

    let affiliated_agency_id = match account.role {
        Role::AgencyAdmin => state
            .store
            .agencies
            .find_one(Predicate::eq("admin_id", account.id))
            .await?
            .map(|agency| agency.id),
        _ => None,
    };

    let caller = Caller::from_account(&account, affiliated_agency_id);
    tracing::debug!("Authenticated {} as {} (agency {:?})", caller.id, caller.role, caller.affiliated_agency_id);

    request.extensions_mut().insert(caller);
    request.extensions_mut().insert(account);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer` header
fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers("bearer abc")), Ok("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_blanks() {
        assert!(extract_bearer(&HeaderMap::new()).is_err());
        assert!(extract_bearer(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_bearer(&headers("Bearer   ")).is_err());
    }
}
