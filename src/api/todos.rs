use std::num::NonZeroU32;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::extract::{AppJson, AppQuery};
use crate::auth::CurrentUser;
use crate::db::{now, repository};
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

/// Query string of `GET /api/v1/todos`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodosQuery {
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub page_size: Option<i64>,
    pub order_by: Option<SortOrder>,
}

impl TodosQuery {
    pub fn into_page_request(self, owner_id: &str) -> Result<PageRequest, AppError> {
        let page_size = match self.page_size {
            None => DEFAULT_PAGE_SIZE,
            Some(n) if n <= 0 => {
                return Err(AppError::BadRequest(
                    "'pageSize' must be a positive integer.".to_string(),
                ));
            }
            Some(n) => u32::try_from(n)
                .ok()
                .and_then(NonZeroU32::new)
                .map_or(MAX_PAGE_SIZE, |size| size.min(MAX_PAGE_SIZE)),
        };

        let id = self.id.filter(|v| !v.trim().is_empty());
        let created_at = self.created_at.filter(|v| !v.trim().is_empty());
        let cursor = match (id, created_at) {
            (None, None) => None,
            (Some(_), None) => return Err(AppError::BadRequest("'createdAt' is required.".to_string())),
            (None, Some(_)) => return Err(AppError::BadRequest("'id' is required.".to_string())),
            (Some(id), Some(created_at)) => Some(Cursor {
                id: parse_task_id(&id)?,
                created_at: parse_created_at(&created_at)?,
            }),
        };

        Ok(PageRequest {
            owner_id: owner_id.to_string(),
            page_size,
            cursor,
            order: self.order_by.unwrap_or_default(),
        })
    }
}

fn parse_task_id(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest(format!("'{raw}' is not a valid id.")))
}

/// Cursor timestamps must fit the stored microsecond precision.
fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let at = DateTime::parse_from_rfc3339(raw.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest("'createdAt' must be an RFC 3339 timestamp.".to_string()))?;
    if at.timestamp_subsec_nanos() % 1_000 != 0 {
        return Err(AppError::BadRequest(
            "'createdAt' must not be more precise than microseconds.".to_string(),
        ));
    }
    Ok(at)
}

fn non_empty_title(raw: &str) -> Result<&str, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("No title provided!".to_string()));
    }
    Ok(title)
}

pub(super) async fn list_todos(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppQuery(params): AppQuery<TodosQuery>,
) -> Result<Json<Page>, AppError> {
    let request = params.into_page_request(&user.id)?;
    let page = state.pager.paginate(&request).await?;
    Ok(Json(page))
}

pub(super) async fn create_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<NewTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let title = non_empty_title(&req.title)?;
    let task = repository::insert_task(&state.db, &user.id, title, now()).await?;
    info!(task_id = %task.id, owner_id = %user.id, "task created");
    Ok(Json(task))
}

pub(super) async fn update_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    AppJson(mut req): AppJson<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let id = parse_task_id(&id)?;
    if let Some(title) = req.title.take() {
        req.title = Some(non_empty_title(&title)?.to_string());
    }

    let task = repository::update_task(&state.db, &user.id, &id, req, now())
        .await?
        .ok_or(AppError::NotFound)?;
    info!(task_id = %task.id, owner_id = %user.id, "task updated");
    Ok(Json(task))
}

pub(super) async fn delete_todos(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<DeleteTasksRequest>,
) -> Result<Json<DeleteTasksResponse>, AppError> {
    if req.ids.is_empty() {
        return Err(AppError::BadRequest("No id's provided.".to_string()));
    }
    let ids = req
        .ids
        .iter()
        .map(|id| parse_task_id(id))
        .collect::<Result<Vec<_>, _>>()?;

    let deleted = repository::delete_tasks(&state.db, &user.id, &ids).await?;
    info!(owner_id = %user.id, requested = ids.len(), deleted = deleted.len(), "tasks deleted");
    Ok(Json(DeleteTasksResponse::new(deleted)))
}
