//! Buffer domain module

mod data;
mod mode;

pub use data::{BufferContent, BufferData, MIME_HTML, MIME_OWNER, MIME_TEXT, MIME_WINDOW_TITLE};
pub use mode::{BufferMode, ALL_MODES};
