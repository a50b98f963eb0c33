pub mod blob_store_memory;
pub mod firebase_storage_rest;

pub use blob_store_memory::MemoryBlobStore;
pub use firebase_storage_rest::FirebaseStorageRest;
