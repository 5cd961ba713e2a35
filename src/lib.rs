pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod members;
pub mod metrics;
pub mod pipeline;
pub mod storage;
pub mod types;
pub mod voting;

// Layered boundaries for ports and their adapters
pub mod app;
pub mod infra;
