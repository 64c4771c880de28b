pub mod auth;
pub mod contact;
pub mod content;
pub mod extractors;
pub mod pages;
pub mod recovery;
pub mod storage;
