use std::sync::Arc;

use railrover_core::workflow::BookingWorkflow;
use railrover_store::{
    AnalyticsRepository, PostgresBookingStore, PostgresTrainStore, RedisClient,
};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub redis: Arc<RedisClient>,
    pub trains: Arc<PostgresTrainStore>,
    pub bookings: Arc<PostgresBookingStore>,
    pub analytics: Arc<AnalyticsRepository>,
    pub workflow: Arc<BookingWorkflow>,
    pub auth: AuthConfig,
}
