//! Resolves inbound requests to the user they act for.
//!
//! Sessions are issued by the authentication service that shares the
//! database; this module only reads them.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{now, repository};
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "todo_api.session_token";

#[async_trait]
pub trait AuthGate: Send + Sync {
    async fn resolve_session(&self, headers: &HeaderMap) -> Result<Option<User>, AppError>;
}

/// Looks the request's session token up in the `sessions` table.
pub struct SessionAuthGate {
    db: SqlitePool,
}

impl SessionAuthGate {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthGate for SessionAuthGate {
    async fn resolve_session(&self, headers: &HeaderMap) -> Result<Option<User>, AppError> {
        let Some(token) = session_token(headers) else {
            return Ok(None);
        };
        let user = repository::find_user_by_session_token(&self.db, token, now()).await?;
        if user.is_none() {
            debug!("session token did not resolve");
        }
        Ok(user)
    }
}

/// Bearer token first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}

/// The user behind the request; rejects with `Unauthorized` when the
/// session does not resolve.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .auth
            .resolve_session(&parts.headers)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
