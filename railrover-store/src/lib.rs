pub mod analytics_repo;
pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod events;
pub mod redis_repo;
pub mod train_repo;

pub use analytics_repo::AnalyticsRepository;
pub use booking_repo::PostgresBookingStore;
pub use database::DbClient;
pub use events::EventProducer;
pub use redis_repo::RedisClient;
pub use train_repo::PostgresTrainStore;
