use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use railrover_core::repository::TrainStore;
use railrover_core::train::Train;
use railrover_core::{BookingError, BookingResult};

#[derive(Debug, sqlx::FromRow)]
struct TrainRow {
    id: Uuid,
    name: String,
    number: String,
    train_type: String,
    total_seats: i32,
    amenities: Vec<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<TrainRow> for Train {
    fn from(row: TrainRow) -> Self {
        Train {
            id: row.id,
            name: row.name,
            number: row.number,
            train_type: row.train_type,
            total_seats: row.total_seats,
            amenities: row.amenities,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
pub struct NewTrain {
    pub name: String,
    pub number: String,
    pub train_type: String,
    pub total_seats: i32,
    pub amenities: Vec<String>,
}

pub struct PostgresTrainStore {
    pub pool: PgPool,
}

impl PostgresTrainStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> BookingResult<Vec<Train>> {
        let rows = sqlx::query_as::<_, TrainRow>(
            r#"
            SELECT id, name, number, train_type, total_seats, amenities, active, created_at
            FROM trains
            WHERE active = TRUE
            ORDER BY number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookingError::Store(e.to_string()))?;

        Ok(rows.into_iter().map(Train::from).collect())
    }

    pub async fn create(&self, new_train: NewTrain) -> BookingResult<Train> {
        let train = Train {
            id: Uuid::new_v4(),
            name: new_train.name,
            number: new_train.number,
            train_type: new_train.train_type,
            total_seats: new_train.total_seats,
            amenities: new_train.amenities,
            active: true,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO trains (id, name, number, train_type, total_seats, amenities, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(train.id)
        .bind(&train.name)
        .bind(&train.number)
        .bind(&train.train_type)
        .bind(train.total_seats)
        .bind(&train.amenities)
        .bind(train.active)
        .bind(train.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| BookingError::Store(e.to_string()))?;

        Ok(train)
    }
}

#[async_trait]
impl TrainStore for PostgresTrainStore {
    async fn find_train(&self, id: Uuid) -> BookingResult<Option<Train>> {
        let row = sqlx::query_as::<_, TrainRow>(
            r#"
            SELECT id, name, number, train_type, total_seats, amenities, active, created_at
            FROM trains
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BookingError::Store(e.to_string()))?;

        Ok(row.map(Train::from))
    }
}
