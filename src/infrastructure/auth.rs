pub mod jwt;
pub mod notifier;
pub mod password;
