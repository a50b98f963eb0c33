pub mod profile_store;

pub use profile_store::{fields_of, Collection, Fields, ProfileStore, ProfileStoreError};
