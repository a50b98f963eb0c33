pub mod firestore_rest;
pub mod profile_store_memory;

pub use firestore_rest::FirestoreRest;
pub use profile_store_memory::MemoryProfileStore;
