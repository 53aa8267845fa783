use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use railrover_core::booking::BookingStatus;
use railrover_core::{BookingError, BookingResult};

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_bookings: i64,
    pub active_trains: i64,
    pub total_revenue: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: i64,
}

pub struct AnalyticsRepository {
    pub pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_stats(&self) -> BookingResult<DashboardStats> {
        let total_bookings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;

        let active_trains: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM trains WHERE active = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(store_err)?;

        let total_revenue: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_price), 0)::BIGINT FROM bookings WHERE status = $1",
        )
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(DashboardStats {
            total_bookings,
            active_trains,
            total_revenue,
        })
    }

    pub async fn revenue_timeline(&self) -> BookingResult<Vec<RevenuePoint>> {
        sqlx::query_as::<_, RevenuePoint>(
            r#"
            SELECT travel_date AS date, COALESCE(SUM(total_price), 0)::BIGINT AS revenue
            FROM bookings
            WHERE status = $1
            GROUP BY travel_date
            ORDER BY travel_date
            "#,
        )
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)
    }
}

fn store_err(e: sqlx::Error) -> BookingError {
    BookingError::Store(e.to_string())
}
