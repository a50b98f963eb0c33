use std::sync::{Arc, RwLock};

use async_trait::async_trait;

/// Opaque identifier issued by the identity provider at account creation.
///
/// Doubles as the profile document key, so the two stores never need a
/// mapping table between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(not(tarpaulin_include))]
impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated session against the identity provider.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: AccountId,
    pub id_token: String,
}

/// Shared handle to the current session, written by the auth adapter after a
/// successful sign-in/sign-up and read by the profile store adapter to attach
/// credentials to writes.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, session: Session) {
        *self.inner.write().expect("session lock poisoned") = Some(session);
    }

    pub fn clear(&self) {
        *self.inner.write().expect("session lock poisoned") = None;
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.read().expect("session lock poisoned").clone()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("An account already exists for this email")]
    EmailInUse,

    #[error("Password is too weak")]
    WeakPassword,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No account exists for this email")]
    UserNotFound,

    #[error("Network error: {0}")]
    Network(String),
}

/// Port for the external identity provider.
///
/// Account creation returns a full session: the provider signs the new user
/// in as a side effect, and subsequent profile writes need that token.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// The active session, if any. Purely local state; never hits the network.
    fn current_session(&self) -> Option<Session>;

    fn sign_out(&self);

    async fn send_reset_email(&self, email: &str) -> Result<(), AuthError>;
}
