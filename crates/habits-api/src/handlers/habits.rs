//! Habit handlers
//!
//! Every handler acts on the authenticated caller's habits only.

use axum::{extract::State, Json};
use habits_service::dto::{
    BulkHabitUpdate, CreateHabitRequest, CreatedHabitResponse, DeleteHabitResponse,
    HabitResponse, UpdateHabitRequest,
};
use habits_service::HabitService;

use crate::extractors::{AuthUser, HabitId, JsonBody};
use crate::response::ApiResult;
use crate::state::AppState;

/// Create a habit
///
/// POST /createhabit
pub async fn create_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<CreateHabitRequest>,
) -> ApiResult<Json<CreatedHabitResponse>> {
    let service = HabitService::new(state.service_context());
    let habit = service.create(&auth.email, request).await?;
    Ok(Json(habit))
}

/// Get one habit
///
/// GET /retrievehabit?id=
pub async fn retrieve_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    HabitId(id): HabitId,
) -> ApiResult<Json<HabitResponse>> {
    let service = HabitService::new(state.service_context());
    let habit = service.get(&auth.email, &id).await?;
    Ok(Json(habit))
}

/// List the caller's habits
///
/// GET /retrievehabits
pub async fn retrieve_habits(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<HabitResponse>>> {
    let service = HabitService::new(state.service_context());
    let habits = service.list(&auth.email).await?;
    Ok(Json(habits))
}

/// Update one habit
///
/// PUT /updatehabit?id=
pub async fn update_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    HabitId(id): HabitId,
    JsonBody(request): JsonBody<UpdateHabitRequest>,
) -> ApiResult<Json<HabitResponse>> {
    let service = HabitService::new(state.service_context());
    let habit = service.update(&auth.email, &id, request).await?;
    Ok(Json(habit))
}

/// Update several habits at once
///
/// PUT /updatehabits
pub async fn update_habits(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(updates): JsonBody<Vec<BulkHabitUpdate>>,
) -> ApiResult<Json<Vec<HabitResponse>>> {
    let service = HabitService::new(state.service_context());
    let habits = service.update_many(&auth.email, updates).await?;
    Ok(Json(habits))
}

/// Delete one habit
///
/// DELETE /deletehabit?id=
pub async fn delete_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    HabitId(id): HabitId,
) -> ApiResult<Json<DeleteHabitResponse>> {
    let service = HabitService::new(state.service_context());
    service.delete(&auth.email, &id).await?;
    Ok(Json(DeleteHabitResponse::deleted()))
}
