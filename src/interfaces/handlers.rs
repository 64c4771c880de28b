pub mod auth;
pub mod contact;
pub mod content;
pub mod home;
pub mod json_error;
pub mod pages;
pub mod storage;
pub mod system;
pub mod upload;
