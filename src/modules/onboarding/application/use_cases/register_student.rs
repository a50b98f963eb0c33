use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::auth::application::ports::outgoing::{AuthError, AuthProvider, Session};
use crate::onboarding::application::domain::StudentProfile;
use crate::onboarding::application::ports::outgoing::{
    fields_of, Collection, ProfileStore,
};
use crate::onboarding::application::services::validation;
use crate::onboarding::application::use_cases::StepError;

#[derive(Debug, Clone)]
pub struct RegisterStudentInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[async_trait]
pub trait IRegisterStudentUseCase: Send + Sync {
    async fn execute(&self, input: RegisterStudentInput) -> Result<Session, StepError>;
}

/// Step "basic registration" for students.
///
/// Chain: validate → create auth account → write the profile document under
/// the new account id. The document write is an upsert so a resubmission
/// after a partial failure converges on the same document instead of failing
/// with a duplicate-key error.
pub struct RegisterStudentUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl RegisterStudentUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { auth, profiles }
    }
}

#[async_trait]
impl IRegisterStudentUseCase for RegisterStudentUseCase {
    async fn execute(&self, input: RegisterStudentInput) -> Result<Session, StepError> {
        validation::require("Full name", &input.full_name)?;
        validation::require("Email", &input.email)?;
        validation::require("Password", &input.password)?;
        validation::validate_email(&input.email)?;
        validation::validate_password_length(&input.password)?;
        validation::validate_passwords_match(&input.password, &input.confirm_password)?;

        let email = input.email.trim().to_string();

        let session = match self.auth.create_account(&email, &input.password).await {
            Ok(session) => session,
            // The account may be left over from an earlier attempt whose
            // document write failed. Signing in with the same credentials
            // recovers the account id and lets the upsert below finish the
            // job.
            Err(AuthError::EmailInUse) => {
                warn!(%email, "account already exists, retrying as sign-in");
                self.auth
                    .sign_in(&email, &input.password)
                    .await
                    .map_err(|_| StepError::Auth(AuthError::EmailInUse))?
            }
            Err(e) => return Err(e.into()),
        };

        let profile = StudentProfile::new(
            session.account_id.as_str().to_string(),
            input.full_name.trim().to_string(),
            email,
        );
        self.profiles
            .upsert(
                Collection::Students,
                &session.account_id,
                fields_of(&profile)?,
            )
            .await?;

        info!(uid = %session.account_id, "student registered");
        Ok(session)
    }
}
