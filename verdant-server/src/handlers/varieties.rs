use axum::{Json, extract::State};

use verdant_core::consistency::stats;
use verdant_model::VarietyStats;

use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

pub async fn variety_stats(State(state): State<AppState>) -> AppResult<Json<VarietyStats>> {
    let stats = stats::variety_stats(state.unit_of_work.varieties.as_ref()).await?;
    Ok(Json(stats))
}
