use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::auth::application::ports::outgoing::{
    AccountId, AuthError, AuthProvider, Session, SessionStore,
};
use crate::shared::firebase::FirebaseConfig;

const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// Identity Toolkit REST adapter.
///
/// Implements the same sign-up/sign-in/reset surface the mobile SDK uses,
/// keyed by the project's web API key. Sessions land in the shared
/// [`SessionStore`] so the document and blob adapters can attach the
/// id token to their requests.
pub struct FirebaseAuthRest {
    http: reqwest::Client,
    api_key: String,
    sessions: SessionStore,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(rename = "idToken")]
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Identity Toolkit reports failures as upper-snake codes in the error
/// message, sometimes with a trailing explanation after " : ".
fn map_auth_error(code: &str) -> AuthError {
    let code = code.split(':').next().unwrap_or(code).trim();
    match code {
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" => AuthError::InvalidCredentials,
        "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
        other => AuthError::Network(other.to_string()),
    }
}

impl FirebaseAuthRest {
    pub fn new(config: &FirebaseConfig, sessions: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            sessions,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{IDENTITY_TOOLKIT_BASE}/accounts:{action}?key={}",
            self.api_key
        )
    }

    async fn credentials_call(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let err = match response.json::<ErrorBody>().await {
                Ok(body) => map_auth_error(&body.error.message),
                Err(_) => AuthError::Network(format!("identity toolkit returned {status}")),
            };
            return Err(err);
        }

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let session = Session {
            account_id: AccountId(body.local_id),
            id_token: body.id_token,
        };
        self.sessions.set(session.clone());
        debug!(uid = %session.account_id, %action, "identity toolkit call succeeded");
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuthRest {
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.credentials_call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.credentials_call("signInWithPassword", email, password)
            .await
    }

    fn current_session(&self) -> Option<Session> {
        self.sessions.current()
    }

    fn sign_out(&self) {
        self.sessions.clear();
    }

    async fn send_reset_email(&self, email: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("sendOobCode"))
            .json(&json!({
                "requestType": "PASSWORD_RESET",
                "email": email,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let err = match response.json::<ErrorBody>().await {
                Ok(body) => map_auth_error(&body.error.message),
                Err(_) => AuthError::Network(format!("identity toolkit returned {status}")),
            };
            return Err(err);
        }
        Ok(())
    }
}
