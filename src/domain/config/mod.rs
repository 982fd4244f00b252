//! Configuration domain module

mod app_config;
mod backend;

pub use app_config::{AppConfig, MonitorConfig, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SELECTION};
pub use backend::{Backend, VALID_BACKENDS};
