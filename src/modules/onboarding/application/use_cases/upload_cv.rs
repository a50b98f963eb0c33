use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::AuthProvider;
use crate::onboarding::application::domain::CvPatch;
use crate::onboarding::application::ports::outgoing::{fields_of, Collection, ProfileStore};
use crate::onboarding::application::services::validation::ValidationError;
use crate::onboarding::application::use_cases::StepError;
use crate::storage::application::ports::outgoing::{BlobStore, FileHandle};

#[async_trait]
pub trait IUploadCvUseCase: Send + Sync {
    async fn execute(&self, file: FileHandle) -> Result<String, StepError>;
}

/// Final student step.
///
/// Chain: upload the CV under a fresh random token → resolve its durable URL
/// → merge `{cvUrl, cvSubido, completado: true}` into the profile. A failure
/// anywhere leaves `completado` untouched; a re-upload writes a new blob and
/// overwrites the URL (the old blob is orphaned, by contract).
pub struct UploadCvUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStore>,
}

impl UploadCvUseCase {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            auth,
            profiles,
            blobs,
        }
    }
}

#[async_trait]
impl IUploadCvUseCase for UploadCvUseCase {
    async fn execute(&self, file: FileHandle) -> Result<String, StepError> {
        if !file.is_pdf() {
            return Err(ValidationError::NotAPdf("CV").into());
        }

        let session = self
            .auth
            .current_session()
            .ok_or(StepError::NotAuthenticated)?;

        let path = format!("cvs/{}/{}.pdf", session.account_id, Uuid::new_v4());
        let blob = self.blobs.upload(&path, &file).await?;
        let url = self.blobs.get_url(&blob).await?;

        let patch = CvPatch {
            cv_url: url.clone(),
            cv_subido: true,
            completado: true,
        };
        self.profiles
            .update(Collection::Students, &session.account_id, fields_of(&patch)?)
            .await?;

        info!(uid = %session.account_id, "CV uploaded, onboarding complete");
        Ok(url)
    }
}
