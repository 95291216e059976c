mod extract;
mod todos;
mod user;

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, patch, post, put};
use axum::{Router, extract::State, http::StatusCode};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ConfigError};
use crate::error::AppError;
use crate::state::AppState;

pub use todos::TodosQuery;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/todos", get(todos::list_todos).delete(todos::delete_todos))
        .route("/api/v1/todos/add", post(todos::create_todo))
        .route("/api/v1/todos/{id}", patch(todos::update_todo))
        .route("/api/v1/user", get(user::current_user))
        .route("/api/v1/user/update", put(user::update_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn cors_layer(config: &AppConfig) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(&config.client_origin).map_err(|_| ConfigError::Invalid {
        name: "CLIENT_ORIGIN",
        value: config.client_origin.clone(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400)))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
