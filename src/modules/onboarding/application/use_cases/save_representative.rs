use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::AuthProvider;
use crate::onboarding::application::domain::RepresentativePatch;
use crate::onboarding::application::ports::outgoing::{fields_of, Collection, ProfileStore};
use crate::onboarding::application::services::validation::{self, ValidationError};
use crate::onboarding::application::use_cases::StepError;
use crate::storage::application::ports::outgoing::{BlobStore, FileHandle};

#[derive(Debug, Clone)]
pub struct RepresentativeInput {
    pub name: String,
    pub document_type: String,
    pub document_number: String,
    pub document: FileHandle,
}

#[async_trait]
pub trait ISaveRepresentativeUseCase: Send + Sync {
    async fn execute(&self, input: RepresentativeInput) -> Result<(), StepError>;
}

/// Company step "legal representative".
///
/// Chain: upload the representative's id document → resolve URL → merge the
/// representative fields plus the URL into the company document.
pub struct SaveRepresentativeUseCase {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStore>,
}

impl SaveRepresentativeUseCase {
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
impl ISaveRepresentativeUseCase for SaveRepresentativeUseCase {
    async fn execute(&self, input: RepresentativeInput) -> Result<(), StepError> {
        validation::require("Representative name", &input.name)?;
        validation::require("Document type", &input.document_type)?;
        validation::require("Document number", &input.document_number)?;
        if !input.document.is_pdf() {
            return Err(ValidationError::NotAPdf("Representative document").into());
        }

        let session = self
            .auth
            .current_session()
            .ok_or(StepError::NotAuthenticated)?;

        let path = format!(
            "empresas/{}/representante/{}.pdf",
            session.account_id,
            Uuid::new_v4()
        );
        let blob = self.blobs.upload(&path, &input.document).await?;
        let url = self.blobs.get_url(&blob).await?;

        let patch = RepresentativePatch {
            representante_legal: input.name.trim().to_string(),
            tipo_documento: input.document_type.trim().to_string(),
            numero_documento: input.document_number.trim().to_string(),
            documento_representante_url: url,
            ultima_actualizacion: Utc::now(),
        };
        self.profiles
            .update(
                Collection::Companies,
                &session.account_id,
                fields_of(&patch)?,
            )
            .await?;

        info!(uid = %session.account_id, "representative info saved");
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
                account_id: AccountId("company-3".to_string()),
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
            self.log.lock().unwrap().push("get_url".to_string());
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
            collection: Collection,
            _id: &AccountId,
            fields: Fields,
        ) -> Result<(), ProfileStoreError> {
            self.log.lock().unwrap().push("update".to_string());
            assert_eq!(collection, Collection::Companies);
            assert_eq!(fields["representanteLegal"], "Bob B.");
            assert_eq!(fields["tipoDocumento"], "CC");
            assert_eq!(fields["numeroDocumento"], "1020304050");
            assert!(fields["documentoRepresentanteUrl"]
                .as_str()
                .unwrap()
                .contains("representante"));
            // This step never finishes onboarding on its own.
            assert!(fields.get("completado").is_none());
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

    fn valid_input() -> RepresentativeInput {
        RepresentativeInput {
            name: "Bob B.".to_string(),
            document_type: "CC".to_string(),
            document_number: "1020304050".to_string(),
            document: FileHandle::from_bytes("id.pdf", b"%PDF-1.4".to_vec()),
        }
    }

    #[tokio::test]
    async fn uploads_document_then_updates_company() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let uc = SaveRepresentativeUseCase::new(
            Arc::new(SessionAuth),
            Arc::new(FakeProfiles { log: log.clone() }),
            Arc::new(FakeBlobs { log: log.clone() }),
        );

        uc.execute(valid_input()).await.unwrap();

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("upload:empresas/company-3/representante/"));
        assert_eq!(calls[1], "get_url");
        assert_eq!(calls[2], "update");
    }

    #[tokio::test]
    async fn blank_name_is_rejected_with_no_calls() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let uc = SaveRepresentativeUseCase::new(
            Arc::new(SessionAuth),
            Arc::new(FakeProfiles { log: log.clone() }),
            Arc::new(FakeBlobs { log: log.clone() }),
        );

        let mut input = valid_input();
        input.name = " ".to_string();

        let err = uc.execute(input).await.unwrap_err();
        assert!(matches!(
            err,
            StepError::Validation(ValidationError::Required("Representative name"))
        ));
        assert!(log.lock().unwrap().is_empty());
    }
}
