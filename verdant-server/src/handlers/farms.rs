use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde_json::{Value, json};

use verdant_model::{FarmFields, FarmID};

use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

/// Farms newest first with their owner attached (or `null`).
pub async fn list_farms(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let farms = state.cascade.list_farms_with_owners().await?;
    Ok(Json(json!({ "farms": farms })))
}

pub async fn create_farm(
    State(state): State<AppState>,
    payload: Result<Json<FarmFields>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(fields) = payload?;
    let farm = state.cascade.create_farm(&fields).await?;
    Ok((StatusCode::CREATED, Json(json!({ "farm": farm }))))
}

pub async fn update_farm(
    State(state): State<AppState>,
    id: Result<Path<FarmID>, PathRejection>,
    payload: Result<Json<FarmFields>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Path(id) = id?;
    let Json(fields) = payload?;
    let farm = state.cascade.update_farm(id, &fields).await?;
    Ok(Json(json!({ "farm": farm })))
}

pub async fn delete_farm(
    State(state): State<AppState>,
    id: Result<Path<FarmID>, PathRejection>,
) -> AppResult<Json<Value>> {
    let Path(id) = id?;
    state.cascade.delete_farm(id).await?;
    Ok(Json(json!({ "deleted": true })))
}
