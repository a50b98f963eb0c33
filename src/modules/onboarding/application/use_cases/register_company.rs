use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, warn};

use crate::auth::application::ports::outgoing::{AuthError, AuthProvider, Session};
use crate::onboarding::application::domain::CompanyProfile;
use crate::onboarding::application::ports::outgoing::{fields_of, Collection, ProfileStore};
use crate::onboarding::application::services::validation;
use crate::onboarding::application::use_cases::StepError;

const TEMP_PASSWORD_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct RegisterCompanyInput {
    pub nit: String,
    pub phone: String,
    pub email: String,
    pub workers: String,
}

#[async_trait]
pub trait IRegisterCompanyUseCase: Send + Sync {
    async fn execute(&self, input: RegisterCompanyInput) -> Result<Session, StepError>;
}

/// Step "basic registration" for companies.
///
/// The company sets no password in the wizard; the account is created with a
/// generated temporary one and the real credential arrives later through the
/// provider's reset-email flow. The generated password is cached for the
/// lifetime of this use case so a resubmission after a partial failure can
/// sign back into the account it created.
pub struct RegisterCompanyUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    temp_password: Mutex<Option<String>>,
}

impl RegisterCompanyUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            auth,
            profiles,
            temp_password: Mutex::new(None),
        }
    }

    fn temp_password(&self) -> String {
        let mut cached = self.temp_password.lock().expect("temp password lock");
        cached
            .get_or_insert_with(|| {
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(TEMP_PASSWORD_LEN)
                    .map(char::from)
                    .collect()
            })
            .clone()
    }
}

#[async_trait]
impl IRegisterCompanyUseCase for RegisterCompanyUseCase {
    async fn execute(&self, input: RegisterCompanyInput) -> Result<Session, StepError> {
        validation::require("Tax id", &input.nit)?;
        validation::require("Phone", &input.phone)?;
        validation::require("Email", &input.email)?;
        validation::require("Worker count", &input.workers)?;
        validation::validate_email(&input.email)?;

        let email = input.email.trim().to_string();
        let temp_password = self.temp_password();

        let session = match self.auth.create_account(&email, &temp_password).await {
            Ok(session) => session,
            Err(AuthError::EmailInUse) => {
                warn!(%email, "company account already exists, retrying as sign-in");
                self.auth
                    .sign_in(&email, &temp_password)
                    .await
                    .map_err(|_| StepError::Auth(AuthError::EmailInUse))?
            }
            Err(e) => return Err(e.into()),
        };

        let profile = CompanyProfile::new(
            session.account_id.as_str().to_string(),
            input.nit.trim().to_string(),
            input.phone.trim().to_string(),
            email,
            input.workers.trim().to_string(),
        );
        self.profiles
            .upsert(
                Collection::Companies,
                &session.account_id,
                fields_of(&profile)?,
            )
            .await?;

        info!(uid = %session.account_id, "company registered");
        Ok(session)
    }
}
