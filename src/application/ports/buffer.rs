//! Buffer access port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::buffer::{BufferContent, BufferData, BufferMode};

/// Buffer access errors
#[derive(Debug, Clone, Error)]
pub enum BufferError {
    #[error("{0} not found. Please install wl-clipboard.")]
    ToolNotFound(&'static str),

    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("The {0} buffer is not supported on this platform")]
    Unsupported(BufferMode),

    #[error("Failed to read {mode}: {message}")]
    ReadFailed { mode: BufferMode, message: String },

    #[error("Failed to write {mode}: {message}")]
    WriteFailed { mode: BufferMode, message: String },
}

/// Port for reading and writing the shared buffers.
///
/// A read error is treated as transient: the owner of the buffer may be
/// busy or misbehaving, so the monitor retries later instead of failing.
#[async_trait]
pub trait BufferAccess: Send + Sync {
    /// Read the current content of a buffer.
    ///
    /// # Arguments
    /// * `mode` - Which buffer to read
    /// * `formats` - Formats to fetch; others may be omitted
    ///
    /// # Returns
    /// The content and an optional freshness token, or an error
    async fn read(&self, mode: BufferMode, formats: &[String]) -> Result<BufferContent, BufferError>;

    /// Replace the content of a buffer.
    async fn write(&self, mode: BufferMode, data: &BufferData) -> Result<(), BufferError>;
}

/// Blanket implementation for boxed buffer access types
#[async_trait]
impl BufferAccess for Box<dyn BufferAccess> {
    async fn read(&self, mode: BufferMode, formats: &[String]) -> Result<BufferContent, BufferError> {
        self.as_ref().read(mode, formats).await
    }

    async fn write(&self, mode: BufferMode, data: &BufferData) -> Result<(), BufferError> {
        self.as_ref().write(mode, data).await
    }
}
