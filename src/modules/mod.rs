pub mod chat;
pub mod language;
pub mod speech;
pub mod translation;
pub mod validation;
