//! Domain layer - Core monitor state and value objects
//!
//! Contains buffer data, tracker state, timers, configuration
//! and domain errors. This layer has no dependencies on external systems.

pub mod buffer;
pub mod config;
pub mod error;
pub mod monitor;

// Re-export common types
pub use buffer::{BufferContent, BufferData, BufferMode};
pub use config::{AppConfig, Backend};
pub use error::*;
pub use monitor::{BufferTracker, CheckPolicy, SingleShotTimer};
