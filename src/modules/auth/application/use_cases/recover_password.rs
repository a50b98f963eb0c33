use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::auth::application::ports::outgoing::{AuthError, AuthProvider};
use crate::onboarding::application::services::validation::{self, ValidationError};

#[derive(Debug, Clone, thiserror::Error)]
pub enum RecoverPasswordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[async_trait]
pub trait IRecoverPasswordUseCase: Send + Sync {
    async fn execute(&self, email: &str) -> Result<(), RecoverPasswordError>;
}

/// Password recovery start: delegates entirely to the identity provider's
/// reset-email dispatch. No local code/expiry state is kept here.
pub struct RecoverPasswordUseCase {
    auth: Arc<dyn AuthProvider>,
}

impl RecoverPasswordUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }
}

#[async_trait]
impl IRecoverPasswordUseCase for RecoverPasswordUseCase {
    async fn execute(&self, email: &str) -> Result<(), RecoverPasswordError> {
        validation::require("Email", email)?;
        validation::validate_email(email)?;

        self.auth.send_reset_email(email.trim()).await?;
        info!("password reset email dispatched");
        Ok(())
    }
}
