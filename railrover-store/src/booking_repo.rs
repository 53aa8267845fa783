use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use railrover_core::booking::{Booking, BookingRequest, BookingStatus};
use railrover_core::repository::BookingStore;
use railrover_core::train::TicketClass;
use railrover_core::{BookingError, BookingResult};

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: String,
    train_id: Uuid,
    route_id: Uuid,
    travel_date: NaiveDate,
    ticket_class: String,
    passenger_count: i32,
    total_price: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let ticket_class = TicketClass::parse(&row.ticket_class)
            .ok_or_else(|| BookingError::Store(format!("Unknown ticket class: {}", row.ticket_class)))?;

        if row.status != BookingStatus::Confirmed.as_str() {
            return Err(BookingError::Store(format!("Unknown booking status: {}", row.status)));
        }

        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            train_id: row.train_id,
            route_id: row.route_id,
            travel_date: row.travel_date,
            ticket_class,
            passengers: row.passenger_count as u32,
            total_price: row.total_price,
            status: BookingStatus::Confirmed,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresBookingStore {
    pub pool: PgPool,
}

impl PostgresBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_err(e: sqlx::Error) -> BookingError {
    BookingError::Store(e.to_string())
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    /// Conditional insert under a row lock. `FOR UPDATE` on the train row
    /// serializes concurrent bookings for the same train, so the promised-seat
    /// sum read below cannot go stale before the insert commits.
    async fn create(&self, request: &BookingRequest, total_price: i64) -> BookingResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        // 1. Re-read the train under lock
        let total_seats: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT total_seats FROM trains
            WHERE id = $1 AND active = TRUE
            FOR UPDATE
            "#,
        )
        .bind(request.train_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_err)?;

        let total_seats = total_seats.ok_or(BookingError::TrainNotFound)?;

        // 2. Seats already promised for this train and travel date
        let promised: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(passenger_count), 0)
            FROM bookings
            WHERE train_id = $1 AND travel_date = $2 AND status = $3
            "#,
        )
        .bind(request.train_id)
        .bind(request.travel_date)
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err)?;

        // 3. The capacity condition must still hold at commit time
        if (total_seats as i64) - promised < request.passengers as i64 {
            // Dropping the transaction rolls it back
            return Err(BookingError::InsufficientCapacity);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: request.user_id.clone(),
            train_id: request.train_id,
            route_id: request.route_id,
            travel_date: request.travel_date,
            ticket_class: request.ticket_class,
            passengers: request.passengers,
            total_price,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, user_id, train_id, route_id, travel_date, ticket_class,
                 passenger_count, total_price, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(booking.id)
        .bind(&booking.user_id)
        .bind(booking.train_id)
        .bind(booking.route_id)
        .bind(booking.travel_date)
        .bind(booking.ticket_class.as_str())
        .bind(booking.passengers as i32)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await
        .map_err(store_err)?;

        tx.commit().await.map_err(store_err)?;

        Ok(booking)
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, user_id, train_id, route_id, travel_date, ticket_class,
                   passenger_count, total_price, status, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        row.map(Booking::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticket_class: &str, status: &str) -> BookingRow {
        BookingRow {
            id: Uuid::new_v4(),
            user_id: "guest-1".to_string(),
            train_id: Uuid::new_v4(),
            route_id: Uuid::new_v4(),
            travel_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ticket_class: ticket_class.to_string(),
            passenger_count: 2,
            total_price: 100,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_maps_to_domain_booking() {
        let booking = Booking::try_from(row("Economy", "confirmed")).unwrap();
        assert_eq!(booking.ticket_class, TicketClass::Economy);
        assert_eq!(booking.passengers, 2);
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_unknown_ticket_class_is_a_store_error() {
        let result = Booking::try_from(row("Standing", "confirmed"));
        assert!(matches!(result, Err(BookingError::Store(_))));
    }

    #[test]
    fn test_unknown_status_is_a_store_error() {
        let result = Booking::try_from(row("Economy", "pending"));
        assert!(matches!(result, Err(BookingError::Store(_))));
    }
}
