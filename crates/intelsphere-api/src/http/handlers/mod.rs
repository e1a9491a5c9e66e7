//! HTTP request handlers, one module per dashboard area.

pub mod analysis;
pub mod chat;
pub mod health;
pub mod models;
pub mod sentiment;
