pub mod chat;
pub mod config;
pub mod core;
pub mod input;
pub mod sync;
