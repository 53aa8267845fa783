use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use railrover_core::messaging::EMAIL_QUEUE;
use railrover_shared::events::EmailNotificationJob;
use railrover_store::RedisClient;

/// Drains the email-notifications queue. Jobs are durable in Redis until
/// popped, so a worker restart re-delivers anything left on the list.
pub async fn start_email_worker(redis: Arc<RedisClient>) {
    info!("Email worker started, draining {}...", EMAIL_QUEUE);

    loop {
        match redis.pop_job(EMAIL_QUEUE, 5.0).await {
            Ok(Some(payload)) => match serde_json::from_str::<EmailNotificationJob>(&payload) {
                Ok(job) => send_confirmation_email(&job).await,
                Err(e) => error!("Discarding malformed email job: {}", e),
            },
            // Timed out on an empty queue; poll again
            Ok(None) => {}
            Err(e) => {
                error!("Email queue read failed: {}", e);
                sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

async fn send_confirmation_email(job: &EmailNotificationJob) {
    // Mock delivery: a real deployment would hand this to an SMTP relay
    info!(
        "Sending confirmation email for booking {} to user {}",
        job.booking_id, job.user_id
    );
}
