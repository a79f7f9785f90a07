pub mod attractions;
pub mod chat;
