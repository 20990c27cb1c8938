//! API handlers for Livros REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, services::auth::Identity, AppState};

/// Extractor for a caller authenticated with HTTP Basic credentials
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let (username, password) = parse_basic(auth_header)?;
        let identity = state.services.auth.authenticate(&username, &password)?;

        Ok(AuthenticatedUser(identity))
    }
}

/// Split `Basic base64(user:pass)` into its two parts
fn parse_basic(header: &str) -> Result<(String, String), AppError> {
    let invalid = || AppError::Authentication("Invalid authorization header format".to_string());

    let (scheme, encoded) = header.trim().split_once(' ').ok_or_else(invalid)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(invalid());
    }

    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| invalid())?;
    let decoded = String::from_utf8(decoded).map_err(|_| invalid())?;
    let (username, password) = decoded.split_once(':').ok_or_else(invalid)?;

    Ok((username.to_string(), password.to_string()))
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/livros", get(books::list_books))
        .route("/addlivros", post(books::add_book))
        .route(
            "/atualizarlivros/:id",
            put(books::update_book).patch(books::patch_book),
        )
        .route("/deletarlivros/:id", delete(books::delete_book))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
