pub mod error;
pub mod escape;
pub mod logger;
pub mod notifier;
pub mod user_validation;
