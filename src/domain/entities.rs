pub mod contact_message;
pub mod education;
pub mod experience;
pub mod form_fields;
pub mod hobby;
pub mod journey;
pub mod language;
pub mod pages;
pub mod profile;
pub mod project;
pub mod schema;
pub mod skill;
pub mod storage;
pub mod token;
pub mod user;
