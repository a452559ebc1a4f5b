//! Property submission backends
//!
//! [`Submitter`] is the seam where a real listing service would plug in.
//! [`SimulatedSubmitter`] accepts every payload after a fixed delay.

use crate::errors::Result;
use crate::form::SubmissionPayload;
use crate::simulated;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::AbortRegistration;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Acknowledgement of an accepted listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub photo_count: usize,
    pub field_count: usize,
}

/// Destination of packaged listings
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Deliver `payload`. An abort registration, when given, cancels the
    /// delivery early.
    async fn submit(
        &self,
        payload: SubmissionPayload,
        abort: Option<AbortRegistration>,
    ) -> Result<SubmissionReceipt>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    latency: Duration,
}

impl SimulatedSubmitter {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Submitter for SimulatedSubmitter {
    async fn submit(
        &self,
        payload: SubmissionPayload,
        abort: Option<AbortRegistration>,
    ) -> Result<SubmissionReceipt> {
        let receipt = SubmissionReceipt {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            photo_count: payload.photo_count(),
            field_count: payload.field_count(),
        };

        let receipt = simulated::round_trip(self.latency, abort, receipt).await?;
        info!(
            receipt = %receipt.id,
            photos = receipt.photo_count,
            "Simulated submission accepted"
        );
        Ok(receipt)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::form::validation::tests::valid_form;
    use crate::form::{package, FormValidator, PhotoUpload};
    use futures::future::AbortHandle;

    fn payload() -> SubmissionPayload {
        let photos: Vec<_> = (0..5)
            .map(|i| PhotoUpload::new(format!("{}.png", i), "image/png", vec![0; 8]))
            .collect();
        package(&FormValidator::default(), &valid_form(), &photos).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_submit() {
        let submitter = SimulatedSubmitter::new(Duration::from_millis(1000));
        let receipt = submitter.submit(payload(), None).await.unwrap();

        assert_eq!(receipt.photo_count, 5);
        assert_eq!(receipt.field_count, 23);
        assert_eq!(submitter.name(), "simulated");
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_submit() {
        let submitter = SimulatedSubmitter::new(Duration::from_millis(1000));
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        let result = submitter.submit(payload(), Some(registration)).await;
        assert!(matches!(result, Err(AppError::Aborted)));
    }
}
