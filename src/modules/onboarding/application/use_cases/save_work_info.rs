use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::auth::application::ports::outgoing::AuthProvider;
use crate::onboarding::application::domain::WorkInfoPatch;
use crate::onboarding::application::ports::outgoing::{fields_of, Collection, ProfileStore};
use crate::onboarding::application::use_cases::StepError;

#[derive(Debug, Clone)]
pub struct WorkInfoInput {
    pub works_now: bool,
    /// Current employer. May be blank even when `works_now` is set; the step
    /// persists whatever the user typed.
    pub employer: String,
    pub role: String,
}

#[async_trait]
pub trait ISaveWorkInfoUseCase: Send + Sync {
    async fn execute(&self, input: WorkInfoInput) -> Result<(), StepError>;
}

/// Student step "work info": a single merge update on the profile document.
/// Requires an active session; the account id comes from it.
pub struct SaveWorkInfoUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl SaveWorkInfoUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { auth, profiles }
    }
}

#[async_trait]
impl ISaveWorkInfoUseCase for SaveWorkInfoUseCase {
    async fn execute(&self, input: WorkInfoInput) -> Result<(), StepError> {
        let session = self
            .auth
            .current_session()
            .ok_or(StepError::NotAuthenticated)?;

        let patch = WorkInfoPatch {
            trabaja_actual: input.works_now,
            empresa_actual: input.employer,
            rol_actual: input.role,
            ultima_actualizacion: Utc::now(),
        };
        self.profiles
            .update(Collection::Students, &session.account_id, fields_of(&patch)?)
            .await?;

        info!(uid = %session.account_id, works_now = input.works_now, "work info saved");
        Ok(())
    }
}
