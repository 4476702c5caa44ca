/// Landing page counters
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use purestream_core::Stats;

/// GET /api/stats
pub async fn get_stats(State(app_state): State<AppState>) -> Result<Json<Stats>> {
    let stats = purestream_storage::stats::counts(&app_state.pool).await?;
    Ok(Json(stats))
}
