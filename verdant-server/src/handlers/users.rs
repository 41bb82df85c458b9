use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde_json::{Value, json};

use verdant_core::CascadeOutcome;
use verdant_model::{UserFields, UserID};

use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

/// Users newest first, each with its farms.
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let users = state.cascade.list_users_with_farms().await?;
    Ok(Json(json!({ "users": users })))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(fields) = payload?;
    let user = state.cascade.create_user(&fields).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<UserID>, PathRejection>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Path(id) = id?;
    let Json(fields) = payload?;
    let user = state.cascade.update_user(id, &fields).await?;
    Ok(Json(json!({ "user": user })))
}

/// Delete a user after removing every farm it owns.
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<UserID>, PathRejection>,
) -> AppResult<Json<CascadeOutcome>> {
    let Path(id) = id?;
    let outcome = state.cascade.delete_user(id).await?;
    Ok(Json(outcome))
}
