//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod buffer;
pub mod clock;
pub mod config;
pub mod watcher;
pub mod window;

// Re-export common types
pub use buffer::{BufferAccess, BufferError};
pub use clock::Clock;
pub use config::ConfigStore;
pub use watcher::{NotificationSender, OwnershipWatcher, WatchError};
pub use window::{PointerState, WindowSystem};
