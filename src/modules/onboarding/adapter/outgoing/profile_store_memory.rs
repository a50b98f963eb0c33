use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::application::ports::outgoing::{AccountId, SessionStore};
use crate::onboarding::application::ports::outgoing::{
    Collection, Fields, ProfileStore, ProfileStoreError,
};

/// In-memory document store for tests and local runs.
///
/// Mirrors the remote store's merge semantics: `update` and `upsert` replace
/// only the keys present in the patch and leave the rest of the document
/// alone. When built with a [`SessionStore`] every write requires a live
/// session, like the authenticated remote API.
pub struct MemoryProfileStore {
    documents: Mutex<HashMap<(Collection, AccountId), Fields>>,
    sessions: Option<SessionStore>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            sessions: None,
        }
    }

    /// Writes fail with `NotAuthenticated` unless `sessions` holds a session.
    pub fn with_sessions(sessions: SessionStore) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            sessions: Some(sessions),
        }
    }

    /// Direct read for assertions.
    pub fn document(&self, collection: Collection, id: &AccountId) -> Option<Fields> {
        self.documents
            .lock()
            .expect("documents lock poisoned")
            .get(&(collection, id.clone()))
            .cloned()
    }

    fn check_session(&self) -> Result<(), ProfileStoreError> {
        match &self.sessions {
            Some(sessions) if sessions.current().is_none() => {
                Err(ProfileStoreError::NotAuthenticated)
            }
            _ => Ok(()),
        }
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn create(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError> {
        self.check_session()?;
        let mut documents = self.documents.lock().expect("documents lock poisoned");
        let key = (collection, id.clone());
        if documents.contains_key(&key) {
            return Err(ProfileStoreError::AlreadyExists);
        }
        documents.insert(key, fields);
        Ok(())
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError> {
        self.check_session()?;
        let mut documents = self.documents.lock().expect("documents lock poisoned");
        documents
            .entry((collection, id.clone()))
            .or_default()
            .extend(fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &AccountId,
        fields: Fields,
    ) -> Result<(), ProfileStoreError> {
        self.check_session()?;
        let mut documents = self.documents.lock().expect("documents lock poisoned");
        match documents.get_mut(&(collection, id.clone())) {
            Some(document) => {
                document.extend(fields);
                Ok(())
            }
            None => Err(ProfileStoreError::NotFound),
        }
    }

    async fn get(
        &self,
        collection: Collection,
        id: &AccountId,
    ) -> Result<Option<Fields>, ProfileStoreError> {
        Ok(self.document(collection, id))
    }
}
