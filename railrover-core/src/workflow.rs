use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use railrover_shared::events::{BookingCreatedEvent, EmailNotificationJob, WaitlistRequestedEvent};

use crate::booking::{Booking, BookingRequest};
use crate::capacity::CapacityChecker;
use crate::messaging::{
    MessagePublisher, NotificationOutcome, TaskQueue, BOOKING_EVENTS_CHANNEL, EMAIL_QUEUE,
    WAITLIST_CHANNEL,
};
use crate::pricing::PricingTable;
use crate::repository::{BookingStore, TrainStore};
use crate::{BookingError, BookingResult};

/// Terminal state of one pass through the booking state machine.
#[derive(Debug)]
pub enum BookingOutcome {
    Confirmed { booking: Booking },
    Waitlisted,
}

/// Critical result plus the informational trail of side-effect attempts.
/// Notification outcomes never change which variant was reached.
#[derive(Debug)]
pub struct WorkflowResult {
    pub outcome: BookingOutcome,
    pub notifications: Vec<NotificationOutcome>,
}

/// End-to-end booking orchestrator.
///
/// Collaborators are injected at construction so the workflow can run
/// against Postgres/Kafka/Redis in production and in-memory fakes in tests.
pub struct BookingWorkflow {
    capacity: CapacityChecker,
    bookings: Arc<dyn BookingStore>,
    publisher: Arc<dyn MessagePublisher>,
    queue: Arc<dyn TaskQueue>,
    pricing: PricingTable,
}

impl BookingWorkflow {
    pub fn new(
        trains: Arc<dyn TrainStore>,
        bookings: Arc<dyn BookingStore>,
        publisher: Arc<dyn MessagePublisher>,
        queue: Arc<dyn TaskQueue>,
        pricing: PricingTable,
    ) -> Self {
        Self {
            capacity: CapacityChecker::new(trains),
            bookings,
            publisher,
            queue,
            pricing,
        }
    }

    /// Runs one booking request through the full state machine:
    /// capacity check, then either the waitlist branch or
    /// price -> transactional write -> notification fan-out.
    pub async fn create_booking(&self, request: BookingRequest) -> BookingResult<WorkflowResult> {
        // 1. Capacity pre-check (point-in-time; the write re-checks under lock)
        let check = self
            .capacity
            .check(request.train_id, request.passengers)
            .await?;

        if !check.has_capacity {
            return Ok(self.waitlist(&request).await);
        }

        // 2. Price is fixed here and never recomputed
        let total_price = self.pricing.total(request.ticket_class, request.passengers);

        // 3. Atomic conditional write
        let booking = match self.bookings.create(&request, total_price).await {
            Ok(booking) => booking,
            // Lost the capacity race inside the transaction: same terminal
            // state as a failed pre-check, never an error to the caller.
            Err(BookingError::InsufficientCapacity) => {
                return Ok(self.waitlist(&request).await);
            }
            Err(e) => return Err(e),
        };

        info!(booking_id = %booking.id, train_id = %booking.train_id, "Booking confirmed");

        // 4. Best-effort fan-out; the booking is durable regardless
        let mut notifications = Vec::new();

        let event = BookingCreatedEvent::new(
            booking.id,
            booking.user_id.clone(),
            booking.train_id,
            booking.total_price,
        );
        notifications.push(self.publish_event(BOOKING_EVENTS_CHANNEL, &event).await);

        let job = EmailNotificationJob::new(booking.id, booking.user_id.clone());
        notifications.push(self.enqueue_job(EMAIL_QUEUE, &job).await);

        Ok(WorkflowResult {
            outcome: BookingOutcome::Confirmed { booking },
            notifications,
        })
    }

    async fn waitlist(&self, request: &BookingRequest) -> WorkflowResult {
        info!(train_id = %request.train_id, passengers = request.passengers, "Request waitlisted");

        let event = WaitlistRequestedEvent::new(
            request.user_id.clone(),
            request.train_id,
            request.travel_date,
            request.passengers,
        );
        let notification = self.publish_event(WAITLIST_CHANNEL, &event).await;

        WorkflowResult {
            outcome: BookingOutcome::Waitlisted,
            notifications: vec![notification],
        }
    }

    async fn publish_event<T: Serialize>(&self, channel: &str, event: &T) -> NotificationOutcome {
        let payload = match serde_json::to_string(event) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to serialize event for {}: {}", channel, e);
                return NotificationOutcome::Failed {
                    channel: channel.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        match self.publisher.publish(channel, &payload).await {
            Ok(()) => NotificationOutcome::Published {
                channel: channel.to_string(),
            },
            Err(e) => {
                warn!("Failed to publish to {}: {}", channel, e);
                NotificationOutcome::Failed {
                    channel: channel.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn enqueue_job<T: Serialize>(&self, queue: &str, job: &T) -> NotificationOutcome {
        let payload = match serde_json::to_string(job) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to serialize job for {}: {}", queue, e);
                return NotificationOutcome::Failed {
                    channel: queue.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        match self.queue.enqueue(queue, &payload).await {
            Ok(()) => NotificationOutcome::Enqueued {
                queue: queue.to_string(),
            },
            Err(e) => {
                warn!("Failed to enqueue on {}: {}", queue, e);
                NotificationOutcome::Failed {
                    channel: queue.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::messaging::PublishError;
    use crate::train::{TicketClass, Train};

    struct FakeTrainStore {
        trains: HashMap<Uuid, Train>,
    }

    #[async_trait]
    impl TrainStore for FakeTrainStore {
        async fn find_train(&self, id: Uuid) -> BookingResult<Option<Train>> {
            Ok(self.trains.get(&id).cloned())
        }
    }

    /// In-memory booking store that enforces the capacity condition
    /// atomically, the way the Postgres store does under a row lock.
    struct FakeBookingStore {
        trains: HashMap<Uuid, i32>,
        bookings: Mutex<Vec<Booking>>,
    }

    impl FakeBookingStore {
        fn new(trains: &[(Uuid, i32)]) -> Self {
            Self {
                trains: trains.iter().cloned().collect(),
                bookings: Mutex::new(Vec::new()),
            }
        }

        fn persisted(&self) -> Vec<Booking> {
            self.bookings.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BookingStore for FakeBookingStore {
        async fn create(&self, request: &BookingRequest, total_price: i64) -> BookingResult<Booking> {
            let total_seats = *self
                .trains
                .get(&request.train_id)
                .ok_or(BookingError::TrainNotFound)?;

            let mut bookings = self.bookings.lock().unwrap();
            let promised: i64 = bookings
                .iter()
                .filter(|b| b.train_id == request.train_id && b.travel_date == request.travel_date)
                .map(|b| b.passengers as i64)
                .sum();

            if total_seats as i64 - promised < request.passengers as i64 {
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
                status: crate::booking::BookingStatus::Confirmed,
                created_at: Utc::now(),
            };
            bookings.push(booking.clone());
            Ok(booking)
        }

        async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>> {
            Ok(self.bookings.lock().unwrap().iter().find(|b| b.id == id).cloned())
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        messages: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl MessagePublisher for RecordingPublisher {
        async fn publish(&self, channel: &str, payload: &str) -> Result<(), PublishError> {
            if self.fail {
                return Err(PublishError("broker unreachable".to_string()));
            }
            self.messages
                .lock()
                .unwrap()
                .push((channel.to_string(), payload.to_string()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingQueue {
        jobs: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TaskQueue for RecordingQueue {
        async fn enqueue(&self, queue: &str, job: &str) -> Result<(), PublishError> {
            self.jobs
                .lock()
                .unwrap()
                .push((queue.to_string(), job.to_string()));
            Ok(())
        }
    }

    fn train(id: Uuid, total_seats: i32) -> Train {
        Train {
            id,
            name: "Night Mail".to_string(),
            number: "NM-7".to_string(),
            train_type: "Sleeper".to_string(),
            total_seats,
            amenities: vec!["wifi".to_string()],
            active: true,
            created_at: Utc::now(),
        }
    }

    fn request(train_id: Uuid, passengers: u32) -> BookingRequest {
        BookingRequest {
            user_id: "guest-42".to_string(),
            train_id,
            route_id: Uuid::new_v4(),
            travel_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ticket_class: TicketClass::Economy,
            passengers,
        }
    }

    struct Harness {
        workflow: BookingWorkflow,
        bookings: Arc<FakeBookingStore>,
        publisher: Arc<RecordingPublisher>,
        queue: Arc<RecordingQueue>,
    }

    fn harness(trains: Vec<Train>, failing_publisher: bool) -> Harness {
        let seats: Vec<(Uuid, i32)> = trains.iter().map(|t| (t.id, t.total_seats)).collect();
        let train_store = Arc::new(FakeTrainStore {
            trains: trains.into_iter().map(|t| (t.id, t)).collect(),
        });
        let bookings = Arc::new(FakeBookingStore::new(&seats));
        let publisher = Arc::new(RecordingPublisher {
            messages: Mutex::new(Vec::new()),
            fail: failing_publisher,
        });
        let queue = Arc::new(RecordingQueue::default());

        let workflow = BookingWorkflow::new(
            train_store,
            bookings.clone(),
            publisher.clone(),
            queue.clone(),
            PricingTable::default(),
        );

        Harness {
            workflow,
            bookings,
            publisher,
            queue,
        }
    }

    #[tokio::test]
    async fn test_oversized_request_is_waitlisted_without_a_row() {
        let train_id = Uuid::new_v4();
        let h = harness(vec![train(train_id, 2)], false);

        let result = h.workflow.create_booking(request(train_id, 3)).await.unwrap();

        assert!(matches!(result.outcome, BookingOutcome::Waitlisted));
        assert!(h.bookings.persisted().is_empty());

        let messages = h.publisher.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, WAITLIST_CHANNEL);
        assert!(h.queue.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_booking_carries_calculated_price() {
        let train_id = Uuid::new_v4();
        let h = harness(vec![train(train_id, 5)], false);

        let result = h.workflow.create_booking(request(train_id, 2)).await.unwrap();

        let booking = match result.outcome {
            BookingOutcome::Confirmed { booking } => booking,
            other => panic!("expected confirmed, got {:?}", other),
        };
        assert_eq!(booking.total_price, 100); // economy base 50 x 2
        assert_eq!(h.bookings.persisted().len(), 1);

        let messages = h.publisher.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, BOOKING_EVENTS_CHANNEL);
        assert!(messages[0].1.contains("BOOKING_CREATED"));

        let jobs = h.queue.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].0, EMAIL_QUEUE);
    }

    #[tokio::test]
    async fn test_unknown_train_is_an_error_with_no_side_effects() {
        let h = harness(vec![train(Uuid::new_v4(), 5)], false);

        let result = h.workflow.create_booking(request(Uuid::new_v4(), 1)).await;

        assert!(matches!(result, Err(BookingError::TrainNotFound)));
        assert!(h.bookings.persisted().is_empty());
        assert!(h.publisher.messages.lock().unwrap().is_empty());
        assert!(h.queue.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_unconfirm_the_booking() {
        let train_id = Uuid::new_v4();
        let h = harness(vec![train(train_id, 5)], true);

        let result = h.workflow.create_booking(request(train_id, 1)).await.unwrap();

        assert!(matches!(result.outcome, BookingOutcome::Confirmed { .. }));
        assert_eq!(h.bookings.persisted().len(), 1);
        assert!(result.notifications.iter().any(|n| matches!(
            n,
            NotificationOutcome::Failed { channel, .. } if channel == BOOKING_EVENTS_CHANNEL
        )));
        // the email job still went out: the queue is a separate collaborator
        assert_eq!(h.queue.jobs.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lost_write_race_redirects_to_waitlist() {
        let train_id = Uuid::new_v4();
        // Pre-check sees 4 seats, but the store has already promised 3 of
        // them, so the conditional write fails for a party of 2.
        let h = harness(vec![train(train_id, 4)], false);
        h.workflow
            .create_booking(request(train_id, 3))
            .await
            .unwrap();

        let result = h.workflow.create_booking(request(train_id, 2)).await.unwrap();

        assert!(matches!(result.outcome, BookingOutcome::Waitlisted));
        assert_eq!(h.bookings.persisted().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_demand_never_oversells() {
        let train_id = Uuid::new_v4();
        let h = Arc::new(harness(vec![train(train_id, 3)], false));

        let a = {
            let h = h.clone();
            tokio::spawn(async move { h.workflow.create_booking(request(train_id, 2)).await })
        };
        let b = {
            let h = h.clone();
            tokio::spawn(async move { h.workflow.create_booking(request(train_id, 2)).await })
        };

        let (ra, rb) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());

        let confirmed = [&ra, &rb]
            .iter()
            .filter(|r| matches!(r.outcome, BookingOutcome::Confirmed { .. }))
            .count();
        assert_eq!(confirmed, 1);

        let promised: i64 = h
            .bookings
            .persisted()
            .iter()
            .map(|b| b.passengers as i64)
            .sum();
        assert!(promised <= 3);
    }
}
