use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use railrover_core::booking::{Booking, BookingRequest};
use railrover_core::train::TicketClass;
use railrover_core::workflow::BookingOutcome;
use railrover_core::BookingError;

use crate::{error::AppError, middleware::auth::GuestClaims, state::AppState};

#[derive(Debug, Deserialize)]
struct CreateBookingPayload {
    train_id: Uuid,
    route_id: Uuid,
    travel_date: NaiveDate,
    ticket_class: TicketClass,
    passengers: u32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum BookingResponse {
    Confirmed { booking: Booking },
    Waitlisted,
    Error { reason: String },
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/{id}", get(get_booking))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            crate::middleware::auth::guest_auth_middleware,
        ))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<GuestClaims>,
    Json(payload): Json<CreateBookingPayload>,
) -> impl IntoResponse {
    if payload.passengers == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(BookingResponse::Error {
                reason: "Passenger count must be positive".to_string(),
            }),
        );
    }

    let request = BookingRequest {
        user_id: claims.sub,
        train_id: payload.train_id,
        route_id: payload.route_id,
        travel_date: payload.travel_date,
        ticket_class: payload.ticket_class,
        passengers: payload.passengers,
    };

    match state.workflow.create_booking(request).await {
        Ok(result) => match result.outcome {
            BookingOutcome::Confirmed { booking } => (
                StatusCode::CREATED,
                Json(BookingResponse::Confirmed { booking }),
            ),
            BookingOutcome::Waitlisted => (StatusCode::ACCEPTED, Json(BookingResponse::Waitlisted)),
        },
        Err(BookingError::TrainNotFound) => (
            StatusCode::NOT_FOUND,
            Json(BookingResponse::Error {
                reason: "Train not found".to_string(),
            }),
        ),
        Err(e) => {
            error!("Booking failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BookingResponse::Error {
                    reason: "Booking failed".to_string(),
                }),
            )
        }
    }
}

async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    use railrover_core::repository::BookingStore;

    let booking = state
        .bookings
        .find(booking_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

    Ok(Json(booking))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use railrover_core::booking::BookingStatus;

    #[test]
    fn test_response_shapes() {
        let waitlisted = serde_json::to_value(BookingResponse::Waitlisted).unwrap();
        assert_eq!(waitlisted, serde_json::json!({"status": "waitlisted"}));

        let error = serde_json::to_value(BookingResponse::Error {
            reason: "Train not found".to_string(),
        })
        .unwrap();
        assert_eq!(error["status"], "error");
        assert_eq!(error["reason"], "Train not found");

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: "guest-1".to_string(),
            train_id: Uuid::new_v4(),
            route_id: Uuid::new_v4(),
            travel_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ticket_class: TicketClass::Economy,
            passengers: 2,
            total_price: 100,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };
        let confirmed = serde_json::to_value(BookingResponse::Confirmed { booking }).unwrap();
        assert_eq!(confirmed["status"], "confirmed");
        assert_eq!(confirmed["booking"]["total_price"], 100);
        assert_eq!(confirmed["booking"]["status"], "confirmed");
    }
}
