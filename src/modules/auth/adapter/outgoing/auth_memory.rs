use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::{
    AccountId, AuthError, AuthProvider, Session, SessionStore,
};

/// Firebase rejects passwords shorter than six characters; the in-memory
/// provider mirrors that so tests exercise the same failure mode.
const PROVIDER_MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
struct Account {
    id: AccountId,
    password: String,
}

/// In-memory identity provider for tests and local runs. Accounts are keyed
/// by email; sessions live in the shared [`SessionStore`].
pub struct MemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    sessions: SessionStore,
    reset_emails: Mutex<Vec<String>>,
}

impl MemoryAuthProvider {
    pub fn new(sessions: SessionStore) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            sessions,
            reset_emails: Mutex::new(Vec::new()),
        }
    }

    /// Emails a reset was requested for, oldest first.
    pub fn reset_emails(&self) -> Vec<String> {
        self.reset_emails.lock().expect("reset lock poisoned").clone()
    }

    fn issue_session(&self, account: &Account) -> Session {
        let session = Session {
            account_id: account.id.clone(),
            id_token: format!("memory-token-{}", Uuid::new_v4()),
        };
        self.sessions.set(session.clone());
        session
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if password.len() < PROVIDER_MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let mut accounts = self.accounts.lock().expect("accounts lock poisoned");
        if accounts.contains_key(email) {
            return Err(AuthError::EmailInUse);
        }

        let account = Account {
            id: AccountId(Uuid::new_v4().to_string()),
            password: password.to_string(),
        };
        accounts.insert(email.to_string(), account.clone());
        drop(accounts);

        Ok(self.issue_session(&account))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = {
            let accounts = self.accounts.lock().expect("accounts lock poisoned");
            accounts.get(email).cloned()
        };

        match account {
            None => Err(AuthError::UserNotFound),
            Some(account) if account.password != password => Err(AuthError::InvalidCredentials),
            Some(account) => Ok(self.issue_session(&account)),
        }
    }

    fn current_session(&self) -> Option<Session> {
        self.sessions.current()
    }

    fn sign_out(&self) {
        self.sessions.clear();
    }

    async fn send_reset_email(&self, email: &str) -> Result<(), AuthError> {
        let accounts = self.accounts.lock().expect("accounts lock poisoned");
        if !accounts.contains_key(email) {
            return Err(AuthError::UserNotFound);
        }
        drop(accounts);

        self.reset_emails
            .lock()
            .expect("reset lock poisoned")
            .push(email.to_string());
        Ok(())
    }
}
