use async_trait::async_trait;
use serde::Serialize;

use crate::auth::application::ports::outgoing::AccountId;

/// The two profile collections. Wire names are the Firestore collection ids
/// the deployed mobile clients read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Companies,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Students => "usuarios",
            Collection::Companies => "empresas",
        }
    }
}

#[cfg(not(tarpaulin_include))]
impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A profile document (or partial update) as a flat field map.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Serialize a domain entity or patch struct into a field map.
pub fn fields_of<T: Serialize>(value: &T) -> Result<Fields, ProfileStoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(ProfileStoreError::Serialization(
            "expected a JSON object".to_string(),
        )),
        Err(e) => Err(ProfileStoreError::Serialization(e.to_string())),
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("A profile already exists for this account")]
    AlreadyExists,

    #[error("Profile not found")]
    NotFound,

    #[error("You must be signed in to do this")]
    NotAuthenticated,

    #[error("Could not encode profile data: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Port for the remote profile document store.
///
/// `update` and `upsert` have merge semantics: only the keys present in
/// `fields` change, everything else on the document survives. A partial
/// update must never clobber fields written by an unrelated step.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create a new document keyed by the account id. Fails with
    /// `AlreadyExists` when the key is taken.
    async fn create(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError>;

    /// Create-or-merge. Used by the registration steps so that resubmitting
    /// after a partial failure converges instead of erroring.
    async fn upsert(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError>;

    /// Merge the given fields into an existing document.
    async fn update(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError>;

    async fn get(
        &self,
        collection: Collection,
        id: &AccountId,
    ) -> Result<Option<Fields>, ProfileStoreError>;
}
