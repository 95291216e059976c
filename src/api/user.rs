use axum::Json;
use axum::extract::State;
use tracing::info;

use super::extract::AppJson;
use crate::auth::CurrentUser;
use crate::db::{now, repository};
use crate::error::AppError;
use crate::models::{UpdateUserRequest, User};
use crate::state::AppState;

pub(super) async fn current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

pub(super) async fn update_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let first_name = name_part(&req.first_name, "First name")?;
    let last_name = name_part(&req.last_name, "Last name")?;

    let updated = repository::rename_user(&state.db, &user.id, &format!("{first_name} {last_name}"), now())
        .await?
        .ok_or(AppError::NotFound)?;
    info!(user_id = %updated.id, "user renamed");
    Ok(Json(updated))
}

fn name_part<'a>(raw: &'a str, label: &str) -> Result<&'a str, AppError> {
    let value = raw.trim();
    if value.chars().count() < 2 {
        return Err(AppError::BadRequest(format!("{label} is required.")));
    }
    Ok(value)
}
