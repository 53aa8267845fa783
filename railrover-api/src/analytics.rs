use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};

use railrover_store::analytics_repo::{DashboardStats, RevenuePoint};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/revenue", get(revenue))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = state
        .analytics
        .dashboard_stats()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(stats))
}

async fn revenue(State(state): State<AppState>) -> Result<Json<Vec<RevenuePoint>>, AppError> {
    let timeline = state
        .analytics
        .revenue_timeline()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(timeline))
}
