use std::net::SocketAddr;
use std::sync::Arc;

use railrover_api::{app, state::{AppState, AuthConfig}};
use railrover_core::workflow::BookingWorkflow;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railrover_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = railrover_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting RailRover API on port {}", config.server.port);

    // Postgres Connection
    let db = railrover_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    // Redis Connection
    let redis_client = railrover_store::RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");
    let redis_arc = Arc::new(redis_client);

    // Kafka Connection
    let kafka_producer = railrover_store::EventProducer::new(&config.kafka.brokers)
        .expect("Failed to create Kafka producer");
    let kafka_arc = Arc::new(kafka_producer);

    // Repositories and the booking workflow (collaborators injected here,
    // nothing is process-global)
    let trains = Arc::new(railrover_store::PostgresTrainStore::new(db.pool.clone()));
    let bookings = Arc::new(railrover_store::PostgresBookingStore::new(db.pool.clone()));
    let analytics = Arc::new(railrover_store::AnalyticsRepository::new(db.pool.clone()));

    let workflow = Arc::new(BookingWorkflow::new(
        trains.clone(),
        bookings.clone(),
        kafka_arc.clone(),
        redis_arc.clone(),
        config.pricing.clone(),
    ));

    // Background email worker
    tokio::spawn(railrover_api::worker::start_email_worker(redis_arc.clone()));

    let app_state = AppState {
        redis: redis_arc,
        trains,
        bookings,
        analytics,
        workflow,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>()
    ).await.unwrap();
}
