// src/ct_log/mod.rs
pub mod client;
pub mod types;

pub use client::CtLogClient;
pub use types::{LogTarget, TreeHead};
