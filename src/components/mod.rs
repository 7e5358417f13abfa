pub mod chat;
pub mod field;
pub mod hero;
pub mod thoughts;
