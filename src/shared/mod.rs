pub mod firebase;

pub use firebase::FirebaseConfig;
