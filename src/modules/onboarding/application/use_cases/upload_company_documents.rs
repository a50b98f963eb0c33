use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::AuthProvider;
use crate::onboarding::application::domain::CompanyDocumentsPatch;
use crate::onboarding::application::ports::outgoing::{fields_of, Collection, ProfileStore};
use crate::onboarding::application::services::validation::ValidationError;
use crate::onboarding::application::use_cases::StepError;
use crate::storage::application::ports::outgoing::{BlobStore, FileHandle};

#[derive(Debug, Clone)]
pub struct CompanyDocumentsInput {
    /// Tax registration (RUT).
    pub tax_document: FileHandle,
    /// Chamber of commerce certificate.
    pub chamber_document: FileHandle,
}

#[async_trait]
pub trait IUploadCompanyDocumentsUseCase: Send + Sync {
    async fn execute(&self, input: CompanyDocumentsInput) -> Result<(), StepError>;
}

/// Final company step.
///
/// Two upload+URL chains run one after the other (tax document first), and
/// only when both URLs are in hand does a single merge update write them
/// together with `completado: true`. A failure in either chain leaves the
/// document untouched.
pub struct UploadCompanyDocumentsUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStore>,
}

impl UploadCompanyDocumentsUseCase {
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
impl IUploadCompanyDocumentsUseCase for UploadCompanyDocumentsUseCase {
    async fn execute(&self, input: CompanyDocumentsInput) -> Result<(), StepError> {
        if !input.tax_document.is_pdf() {
            return Err(ValidationError::NotAPdf("Tax registration document").into());
        }
        if !input.chamber_document.is_pdf() {
            return Err(ValidationError::NotAPdf("Chamber of commerce document").into());
        }

        let session = self
            .auth
            .current_session()
            .ok_or(StepError::NotAuthenticated)?;
        let uid = &session.account_id;

        let tax_path = format!("empresas/{uid}/documentos/rut_{}.pdf", Uuid::new_v4());
        let tax_blob = self.blobs.upload(&tax_path, &input.tax_document).await?;
        let tax_url = self.blobs.get_url(&tax_blob).await?;

        let chamber_path = format!("empresas/{uid}/documentos/camara_{}.pdf", Uuid::new_v4());
        let chamber_blob = self
            .blobs
            .upload(&chamber_path, &input.chamber_document)
            .await?;
        let chamber_url = self.blobs.get_url(&chamber_blob).await?;

        let patch = CompanyDocumentsPatch {
            rut_url: tax_url,
            camara_comercio_url: chamber_url,
            completado: true,
            ultima_actualizacion: Utc::now(),
        };
        self.profiles
            .update(Collection::Companies, uid, fields_of(&patch)?)
            .await?;

        info!(uid = %uid, "company documents uploaded, onboarding complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::auth::application::ports::outgoing::{AccountId, AuthError, Session};
    use crate::onboarding::application::ports::outgoing::{Fields, ProfileStoreError};
    use crate::storage::application::ports::outgoing::{BlobRef, BlobStoreError};

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct SessionAuth;

    #[async_trait]
    impl AuthProvider for SessionAuth {
        async fn create_account(&self, _e: &str, _p: &str) -> Result<Session, AuthError> {
            unimplemented!()
        }
        async fn sign_in(&self, _e: &str, _p: &str) -> Result<Session, AuthError> {
            unimplemented!()
        }
        fn current_session(&self) -> Option<Session> {
            Some(Session {
                account_id: AccountId("company-7".to_string()),
                id_token: "token".to_string(),
            })
        }
        fn sign_out(&self) {}
        async fn send_reset_email(&self, _e: &str) -> Result<(), AuthError> {
            unimplemented!()
        }
    }

    struct FakeBlobs {
        log: CallLog,
        /// Fail `get_url` on the nth call (1-based), if set.
        fail_url_call: Option<usize>,
        url_calls: Mutex<usize>,
    }

    #[async_trait]
    impl BlobStore for FakeBlobs {
        async fn upload(&self, path: &str, _f: &FileHandle) -> Result<BlobRef, BlobStoreError> {
            self.log.lock().unwrap().push(format!("upload:{path}"));
            Ok(BlobRef {
                bucket: "test".to_string(),
                path: path.to_string(),
                token: None,
            })
        }
        async fn get_url(&self, blob: &BlobRef) -> Result<String, BlobStoreError> {
            let mut count = self.url_calls.lock().unwrap();
            *count += 1;
            self.log.lock().unwrap().push("get_url".to_string());
            if self.fail_url_call == Some(*count) {
                return Err(BlobStoreError::UrlFailed("denied".to_string()));
            }
            Ok(format!("https://blobs.test/{}", blob.path))
        }
    }

    struct FakeProfiles {
        log: CallLog,
    }

    #[async_trait]
    impl ProfileStore for FakeProfiles {
        async fn create(
            &self,
            _c: Collection,
            _id: &AccountId,
            _f: Fields,
        ) -> Result<(), ProfileStoreError> {
            unimplemented!()
        }
        async fn upsert(
            &self,
            _c: Collection,
            _id: &AccountId,
            _f: Fields,
        ) -> Result<(), ProfileStoreError> {
            unimplemented!()
        }
        async fn update(
            &self,
            _c: Collection,
            _id: &AccountId,
            fields: Fields,
        ) -> Result<(), ProfileStoreError> {
            self.log.lock().unwrap().push("update".to_string());
            assert_eq!(fields["completado"], true);
            assert!(fields["rutUrl"].as_str().unwrap().contains("rut_"));
            assert!(fields["camaraComercioUrl"]
                .as_str()
                .unwrap()
                .contains("camara_"));
            Ok(())
        }
        async fn get(
            &self,
            _c: Collection,
            _id: &AccountId,
        ) -> Result<Option<Fields>, ProfileStoreError> {
            Ok(None)
        }
    }

    fn pdf(name: &str) -> FileHandle {
        FileHandle::from_bytes(name, b"%PDF-1.4".to_vec())
    }

    fn input() -> CompanyDocumentsInput {
        CompanyDocumentsInput {
            tax_document: pdf("rut.pdf"),
            chamber_document: pdf("camara.pdf"),
        }
    }

    #[tokio::test]
    async fn both_chains_succeed_then_one_update_marks_complete() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let uc = UploadCompanyDocumentsUseCase::new(
            Arc::new(SessionAuth),
            Arc::new(FakeProfiles { log: log.clone() }),
            Arc::new(FakeBlobs {
                log: log.clone(),
                fail_url_call: None,
                url_calls: Mutex::new(0),
            }),
        );

        uc.execute(input()).await.unwrap();

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 5);
        assert!(calls[0].contains("/documentos/rut_"));
        assert_eq!(calls[1], "get_url");
        assert!(calls[2].contains("/documentos/camara_"));
        assert_eq!(calls[3], "get_url");
        assert_eq!(calls[4], "update");
    }

    #[tokio::test]
    async fn second_chain_failure_aborts_before_any_update() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let uc = UploadCompanyDocumentsUseCase::new(
            Arc::new(SessionAuth),
            Arc::new(FakeProfiles { log: log.clone() }),
            Arc::new(FakeBlobs {
                log: log.clone(),
                fail_url_call: Some(2),
                url_calls: Mutex::new(0),
            }),
        );

        let err = uc.execute(input()).await.unwrap_err();
        assert!(matches!(err, StepError::Upload(_)));
        assert!(!log.lock().unwrap().iter().any(|c| c == "update"));
    }

    #[tokio::test]
    async fn non_pdf_chamber_document_is_rejected_locally() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let uc = UploadCompanyDocumentsUseCase::new(
            Arc::new(SessionAuth),
            Arc::new(FakeProfiles { log: log.clone() }),
            Arc::new(FakeBlobs {
                log: log.clone(),
                fail_url_call: None,
                url_calls: Mutex::new(0),
            }),
        );

        let err = uc
            .execute(CompanyDocumentsInput {
                tax_document: pdf("rut.pdf"),
                chamber_document: FileHandle::from_bytes("cert.png", vec![0x89, 0x50]),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::Validation(_)));
        assert!(log.lock().unwrap().is_empty());
    }
}
