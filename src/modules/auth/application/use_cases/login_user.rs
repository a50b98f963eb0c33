use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::auth::application::ports::outgoing::{AuthError, AuthProvider, Session};
use crate::onboarding::application::domain::Role;
use crate::onboarding::application::ports::outgoing::{
    Collection, ProfileStore, ProfileStoreError,
};
use crate::onboarding::application::services::validation::{self, ValidationError};

#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub session: Session,
    pub role: Role,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("No profile found for this account")]
    ProfileNotFound,

    #[error("Could not verify your profile: {0}")]
    Store(String),
}

impl From<ProfileStoreError> for LoginError {
    fn from(e: ProfileStoreError) -> Self {
        LoginError::Store(e.to_string())
    }
}

#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, email: &str, password: &str) -> Result<LoginOutput, LoginError>;
}

/// Credential login with implicit role detection.
///
/// There is no role claim on the account: after sign-in the account id is
/// probed against the student collection first, then companies. The probe
/// order is a contract — a student document suppresses the company lookup.
pub struct LoginUserUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl LoginUserUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { auth, profiles }
    }
}

#[async_trait]
impl ILoginUserUseCase for LoginUserUseCase {
    async fn execute(&self, email: &str, password: &str) -> Result<LoginOutput, LoginError> {
        validation::require("Email", email)?;
        validation::require("Password", password)?;
        validation::validate_email(email)?;

        let session = self.auth.sign_in(email.trim(), password).await?;

        if self
            .profiles
            .get(Collection::Students, &session.account_id)
            .await?
            .is_some()
        {
            info!(uid = %session.account_id, "student signed in");
            return Ok(LoginOutput {
                session,
                role: Role::Student,
            });
        }

        if self
            .profiles
            .get(Collection::Companies, &session.account_id)
            .await?
            .is_some()
        {
            info!(uid = %session.account_id, "company signed in");
            return Ok(LoginOutput {
                session,
                role: Role::Company,
            });
        }

        // Account exists at the provider but has no document in either
        // collection. Drop the half-open session before reporting.
        self.auth.sign_out();
        Err(LoginError::ProfileNotFound)
    }
}
