//! Duplicate variety scan and consolidation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use tracing::info;

use verdant_model::{ApplyOutcome, ConsolidationPlan, DuplicateGroup, ScanReport};

use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

#[derive(Debug, Deserialize)]
pub struct ApplyDuplicatesRequest {
    pub groups: Vec<DuplicateGroup>,
}

/// Scan the catalog and return the consolidation plan. Nothing is modified.
pub async fn scan_duplicates(State(state): State<AppState>) -> AppResult<Json<ScanReport>> {
    let report = state.duplicates.scan().await?;
    Ok(Json(report))
}

/// Apply a plan previously returned by [`scan_duplicates`].
pub async fn apply_duplicates(
    State(state): State<AppState>,
    payload: Result<Json<ApplyDuplicatesRequest>, JsonRejection>,
) -> AppResult<Json<ApplyOutcome>> {
    let Json(request) = payload?;
    let plan = ConsolidationPlan::new(request.groups);

    let outcome = state.duplicates.apply(&plan).await?;
    info!(
        groups = plan.group_count(),
        deleted = outcome.deleted_count,
        "duplicate consolidation requested via API"
    );
    Ok(Json(outcome))
}
