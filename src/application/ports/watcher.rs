//! Ownership watcher port interface

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::buffer::BufferMode;

/// Channel end that receives ownership-change notifications
pub type NotificationSender = mpsc::UnboundedSender<BufferMode>;

/// Watcher errors
#[derive(Debug, Clone, Error)]
pub enum WatchError {
    #[error("{0} not found. Please install wl-clipboard.")]
    ToolNotFound(&'static str),

    #[error("Display connection failed: {0}")]
    Connection(String),

    #[error("Ownership notifications unsupported: {0}")]
    Unsupported(String),

    #[error("Failed to start watcher: {0}")]
    SpawnFailed(String),
}

/// Port for sources of ownership-change notifications.
///
/// Implementations start background work that keeps sending the mode of
/// every buffer whose owner changed, until the receiver is dropped.
/// Redundant or out-of-order notifications are fine.
pub trait OwnershipWatcher: Send + Sync {
    /// Start watching the given buffers.
    fn watch(&self, modes: &[BufferMode], sender: NotificationSender) -> Result<(), WatchError>;
}

/// Blanket implementation for boxed watcher types
impl OwnershipWatcher for Box<dyn OwnershipWatcher> {
    fn watch(&self, modes: &[BufferMode], sender: NotificationSender) -> Result<(), WatchError> {
        self.as_ref().watch(modes, sender)
    }
}
