use crate::auth::application::ports::outgoing::AuthError;
use crate::onboarding::application::ports::outgoing::ProfileStoreError;
use crate::onboarding::application::services::validation::ValidationError;
use crate::storage::application::ports::outgoing::BlobStoreError;

/// Failure of a single wizard step submission.
///
/// Every variant renders as one human-readable message; the controller shows
/// exactly one at a time and never reports partial success.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("You must be signed in to continue")]
    NotAuthenticated,

    #[error(transparent)]
    Auth(AuthError),

    #[error("Could not save your information: {0}")]
    Write(String),

    #[error(transparent)]
    Upload(BlobStoreError),
}

impl From<AuthError> for StepError {
    fn from(e: AuthError) -> Self {
        StepError::Auth(e)
    }
}

impl From<ProfileStoreError> for StepError {
    fn from(e: ProfileStoreError) -> Self {
        match e {
            ProfileStoreError::NotAuthenticated => StepError::NotAuthenticated,
            other => StepError::Write(other.to_string()),
        }
    }
}

impl From<BlobStoreError> for StepError {
    fn from(e: BlobStoreError) -> Self {
        StepError::Upload(e)
    }
}
