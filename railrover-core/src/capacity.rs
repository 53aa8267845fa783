use std::sync::Arc;
use uuid::Uuid;

use crate::repository::TrainStore;
use crate::train::Train;
use crate::{BookingError, BookingResult};

#[derive(Debug)]
pub struct CapacityCheck {
    pub train: Train,
    pub has_capacity: bool,
}

/// Point-in-time capacity check against the train's static seat count.
/// The authoritative re-check happens inside the write transaction.
pub struct CapacityChecker {
    trains: Arc<dyn TrainStore>,
}

impl CapacityChecker {
    pub fn new(trains: Arc<dyn TrainStore>) -> Self {
        Self { trains }
    }

    pub async fn check(&self, train_id: Uuid, requested_seats: u32) -> BookingResult<CapacityCheck> {
        let train = self
            .trains
            .find_train(train_id)
            .await?
            .ok_or(BookingError::TrainNotFound)?;

        // Inactive trains are not bookable
        if !train.active {
            return Err(BookingError::TrainNotFound);
        }

        let has_capacity = train.total_seats >= requested_seats as i32;
        Ok(CapacityCheck { train, has_capacity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    struct SingleTrain(Train);

    #[async_trait]
    impl TrainStore for SingleTrain {
        async fn find_train(&self, id: Uuid) -> BookingResult<Option<Train>> {
            if id == self.0.id {
                Ok(Some(self.0.clone()))
            } else {
                Ok(None)
            }
        }
    }

    fn train(total_seats: i32, active: bool) -> Train {
        Train {
            id: Uuid::new_v4(),
            name: "Coastal Express".to_string(),
            number: "CE-101".to_string(),
            train_type: "Express".to_string(),
            total_seats,
            amenities: vec![],
            active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_exact_fit_has_capacity() {
        let t = train(4, true);
        let id = t.id;
        let checker = CapacityChecker::new(Arc::new(SingleTrain(t)));

        let check = checker.check(id, 4).await.unwrap();
        assert!(check.has_capacity);
    }

    #[tokio::test]
    async fn test_oversized_party_has_no_capacity() {
        let t = train(2, true);
        let id = t.id;
        let checker = CapacityChecker::new(Arc::new(SingleTrain(t)));

        let check = checker.check(id, 3).await.unwrap();
        assert!(!check.has_capacity);
    }

    #[tokio::test]
    async fn test_unknown_train_is_not_found() {
        let checker = CapacityChecker::new(Arc::new(SingleTrain(train(10, true))));

        let result = checker.check(Uuid::new_v4(), 1).await;
        assert!(matches!(result, Err(BookingError::TrainNotFound)));
    }

    #[tokio::test]
    async fn test_inactive_train_is_not_found() {
        let t = train(10, false);
        let id = t.id;
        let checker = CapacityChecker::new(Arc::new(SingleTrain(t)));

        let result = checker.check(id, 1).await;
        assert!(matches!(result, Err(BookingError::TrainNotFound)));
    }
}
