// src/lib.rs
// Library interface for ct-latency-probe
pub mod cli;
pub mod config;
pub mod ct_log;
pub mod error;
pub mod output;
pub mod probe;
pub mod scheduler;
pub mod stats;
pub mod types;
