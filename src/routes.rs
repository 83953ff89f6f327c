use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Environment;
use crate::handlers::{elevated, protected, public};
use crate::state::AppState;

/// The full application router: public routes, `/api/*` behind bearer auth,
/// plus tracing and CORS around everything.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(user_routes())
        .merge(complaint_routes())
        .merge(agency_routes())
        .merge(admin_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), crate::middleware::authenticate));

    Router::new()
        .merge(public_routes())
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(state.config.environment, &state.config.security.cors_origins)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .route("/auth/register", post(public::auth::register))
        .route("/auth/token", post(public::auth::token))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(protected::users::me))
}

fn complaint_routes() -> Router<AppState> {
    use protected::{complaints, responses};

    Router::new()
        .route("/complaints", post(complaints::create).get(complaints::list))
        .route("/complaints/:id", get(complaints::get).put(complaints::update))
        .route("/complaints/:id/status", put(complaints::update_status))
        .route("/complaints/:id/responses", post(responses::create).get(responses::list))
        .route("/complaints/:id/assign", put(elevated::assignments::assign))
}

fn agency_routes() -> Router<AppState> {
    use protected::agencies;

    Router::new()
        .route("/agencies", get(agencies::list).post(agencies::create))
        .route(
            "/agencies/:id",
            get(agencies::get).put(agencies::update).delete(agencies::delete),
        )
}

fn admin_routes() -> Router<AppState> {
    use elevated::accounts;

    Router::new()
        .route("/admin/users", get(accounts::list).post(accounts::create))
        .route("/admin/users/:id/toggle-status", put(accounts::toggle_status))
}

/// An explicit allow-list when origins are configured. With none, development
/// is permissive and every other environment refuses cross-origin requests.
fn cors_layer(environment: Environment, origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return match environment {
            Environment::Development => CorsLayer::permissive(),
            _ => {
                tracing::warn!("SECURITY_CORS_ORIGINS not set; cross-origin requests are refused");
                CorsLayer::new()
            }
        };
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
