pub mod auth_provider;

pub use auth_provider::{AccountId, AuthError, AuthProvider, Session, SessionStore};
