pub mod contact;
pub mod content;
pub mod notifier;
pub mod revocation;
pub mod sqlx_repo;
pub mod storage;
pub mod token;
pub mod user;
