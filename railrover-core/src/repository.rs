use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, BookingRequest};
use crate::train::Train;
use crate::BookingResult;

/// Read access to train inventory.
#[async_trait]
pub trait TrainStore: Send + Sync {
    async fn find_train(&self, id: Uuid) -> BookingResult<Option<Train>>;
}

/// Transactional booking persistence.
///
/// `create` must run as a single atomic transaction: re-read the train
/// under a lock, verify the capacity condition still holds, and insert the
/// row — or roll back fully. A lost capacity race surfaces as
/// `BookingError::InsufficientCapacity`, never as a partial write.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, request: &BookingRequest, total_price: i64) -> BookingResult<Booking>;

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>>;
}
