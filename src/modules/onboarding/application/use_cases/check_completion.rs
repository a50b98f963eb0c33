use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::application::ports::outgoing::AccountId;
use crate::onboarding::application::ports::outgoing::{Collection, ProfileStore};
use crate::onboarding::application::use_cases::StepError;

#[async_trait]
pub trait ICheckCompletionUseCase: Send + Sync {
    async fn execute(&self, account_id: &AccountId) -> Result<bool, StepError>;
}

/// Whether onboarding finished for an account: reads the `completado` flag,
/// probing the student collection first and falling back to companies. An
/// account with no document in either collection counts as not complete.
pub struct CheckCompletionUseCase {
    profiles: Arc<dyn ProfileStore>,
}

impl CheckCompletionUseCase {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ICheckCompletionUseCase for CheckCompletionUseCase {
    async fn execute(&self, account_id: &AccountId) -> Result<bool, StepError> {
        for collection in [Collection::Students, Collection::Companies] {
            if let Some(doc) = self.profiles.get(collection, account_id).await? {
                let complete = doc
                    .get("completado")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                return Ok(complete);
            }
        }
        Ok(false)
    }
}
