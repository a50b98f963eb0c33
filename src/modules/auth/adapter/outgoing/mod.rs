pub mod auth_memory;
pub mod firebase_auth_rest;

pub use auth_memory::MemoryAuthProvider;
pub use firebase_auth_rest::FirebaseAuthRest;
