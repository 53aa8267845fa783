use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;

use railrover_core::train::Train;
use railrover_store::train_repo::NewTrain;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct CreateTrainRequest {
    name: String,
    number: String,
    train_type: String,
    total_seats: i32,
    #[serde(default)]
    amenities: Vec<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_trains).post(create_train))
}

async fn list_trains(State(state): State<AppState>) -> Result<Json<Vec<Train>>, AppError> {
    let trains = state
        .trains
        .list_active()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(trains))
}

async fn create_train(
    State(state): State<AppState>,
    Json(req): Json<CreateTrainRequest>,
) -> Result<(StatusCode, Json<Train>), AppError> {
    if req.total_seats < 0 {
        return Err(AppError::ValidationError("Total seats must be non-negative".to_string()));
    }

    let train = state
        .trains
        .create(NewTrain {
            name: req.name,
            number: req.number,
            train_type: req.train_type,
            total_seats: req.total_seats,
            amenities: req.amenities,
        })
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(train)))
}
