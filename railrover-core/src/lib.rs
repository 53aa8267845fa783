pub mod booking;
pub mod capacity;
pub mod messaging;
pub mod pricing;
pub mod repository;
pub mod train;
pub mod workflow;

/// Failures that threaten booking correctness. These are the only errors
/// the workflow surfaces to the caller; notification failures never appear here.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Train not found")]
    TrainNotFound,
    #[error("Not enough seats available")]
    InsufficientCapacity,
    #[error("Storage failure: {0}")]
    Store(String),
}

pub type BookingResult<T> = Result<T, BookingError>;
