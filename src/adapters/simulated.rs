use crate::domain::model::RegistrationFormData;
use crate::domain::ports::AccountGateway;
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_SUBMISSION_DELAY: Duration = Duration::from_millis(1500);

/// Stands in for the account API: waits, then accepts (or rejects) every
/// submission.
#[derive(Debug, Clone)]
pub struct SimulatedAccountGateway {
    delay: Duration,
    fail_with: Option<String>,
}

impl SimulatedAccountGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_with: None,
        }
    }

    pub fn failing(delay: Duration, message: impl Into<String>) -> Self {
        Self {
            delay,
            fail_with: Some(message.into()),
        }
    }
}

impl Default for SimulatedAccountGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMISSION_DELAY)
    }
}

#[async_trait]
impl AccountGateway for SimulatedAccountGateway {
    async fn create_account(&self, form: &RegistrationFormData) -> Result<()> {
        tracing::debug!("Simulating account creation for {} ({:?})", form.email, self.delay);
        tokio::time::sleep(self.delay).await;
        match &self.fail_with {
            Some(message) => Err(MarketError::SubmissionError {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}
