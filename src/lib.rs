pub mod modules;
pub mod shared;

pub use modules::auth;
pub use modules::onboarding;
pub use modules::storage;
