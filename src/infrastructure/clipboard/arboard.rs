//! Cross-platform buffer access using arboard
//!
//! Works on Windows, macOS, and Linux (X11/Wayland). Plain text and HTML are
//! exchanged; the primary selection is Linux-only.

use async_trait::async_trait;

use crate::application::ports::{BufferAccess, BufferError};
use crate::domain::buffer::{BufferContent, BufferData, BufferMode, MIME_HTML, MIME_TEXT};

/// Buffer access adapter using arboard
pub struct ArboardBuffers;

impl ArboardBuffers {
    /// Create a new arboard buffer adapter
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<arboard::Clipboard, BufferError> {
        arboard::Clipboard::new().map_err(|e| BufferError::Unavailable(e.to_string()))
    }

    pub(crate) fn read_text(mode: BufferMode) -> Result<Option<String>, BufferError> {
        let mut clipboard = Self::open()?;
        let result = match mode {
            BufferMode::Clipboard => clipboard.get_text(),
            BufferMode::Selection => get_primary_text(&mut clipboard)?,
        };
        content_or_none(mode, result)
    }

    fn read_html(mode: BufferMode) -> Result<Option<String>, BufferError> {
        let mut clipboard = Self::open()?;
        let result = match mode {
            BufferMode::Clipboard => clipboard.get().html(),
            BufferMode::Selection => get_primary_html(&mut clipboard)?,
        };
        content_or_none(mode, result)
    }

    fn read_formats(mode: BufferMode, formats: &[String]) -> Result<BufferData, BufferError> {
        let wants = |format: &str| formats.iter().any(|f| f == format);

        let mut data = BufferData::new();
        if wants(MIME_TEXT) {
            if let Some(text) = Self::read_text(mode)? {
                data.insert(MIME_TEXT, text.into_bytes());
            }
        }
        if wants(MIME_HTML) {
            if let Some(html) = Self::read_html(mode)? {
                data.insert(MIME_HTML, html.into_bytes());
            }
        }
        Ok(data)
    }

    fn write_data(mode: BufferMode, data: &BufferData) -> Result<(), BufferError> {
        let mut clipboard = Self::open()?;
        let text = data.text().unwrap_or_default().to_string();

        let result = match (mode, data.html()) {
            (BufferMode::Clipboard, Some(html)) => clipboard.set_html(html, Some(text.as_str())),
            (BufferMode::Clipboard, None) => clipboard.set_text(text),
            (BufferMode::Selection, _) => set_primary_text(&mut clipboard, text)?,
        };

        result.map_err(|e| BufferError::WriteFailed {
            mode,
            message: e.to_string(),
        })
    }
}

impl Default for ArboardBuffers {
    fn default() -> Self {
        Self::new()
    }
}

fn content_or_none(
    mode: BufferMode,
    result: Result<String, arboard::Error>,
) -> Result<Option<String>, BufferError> {
    match result {
        Ok(content) => Ok(Some(content)),
        // An empty buffer is valid content, not a failed read.
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(BufferError::ReadFailed {
            mode,
            message: e.to_string(),
        }),
    }
}

#[cfg(target_os = "linux")]
fn get_primary_html(clipboard: &mut arboard::Clipboard) -> Result<Result<String, arboard::Error>, BufferError> {
    use arboard::{GetExtLinux, LinuxClipboardKind};
    Ok(clipboard.get().clipboard(LinuxClipboardKind::Primary).html())
}

#[cfg(not(target_os = "linux"))]
fn get_primary_html(_clipboard: &mut arboard::Clipboard) -> Result<Result<String, arboard::Error>, BufferError> {
    Err(BufferError::Unsupported(BufferMode::Selection))
}

#[cfg(target_os = "linux")]
fn get_primary_text(clipboard: &mut arboard::Clipboard) -> Result<Result<String, arboard::Error>, BufferError> {
    use arboard::{GetExtLinux, LinuxClipboardKind};
    Ok(clipboard.get().clipboard(LinuxClipboardKind::Primary).text())
}

#[cfg(not(target_os = "linux"))]
fn get_primary_text(_clipboard: &mut arboard::Clipboard) -> Result<Result<String, arboard::Error>, BufferError> {
    Err(BufferError::Unsupported(BufferMode::Selection))
}

#[cfg(target_os = "linux")]
fn set_primary_text(clipboard: &mut arboard::Clipboard, text: String) -> Result<Result<(), arboard::Error>, BufferError> {
    use arboard::{LinuxClipboardKind, SetExtLinux};
    Ok(clipboard.set().clipboard(LinuxClipboardKind::Primary).text(text))
}

#[cfg(not(target_os = "linux"))]
fn set_primary_text(_clipboard: &mut arboard::Clipboard, _text: String) -> Result<Result<(), arboard::Error>, BufferError> {
    Err(BufferError::Unsupported(BufferMode::Selection))
}

#[async_trait]
impl BufferAccess for ArboardBuffers {
    async fn read(&self, mode: BufferMode, formats: &[String]) -> Result<BufferContent, BufferError> {
        if !formats.iter().any(|f| f == MIME_TEXT || f == MIME_HTML) {
            return Ok(BufferContent::default());
        }

        // arboard operations are blocking, so run in spawn_blocking
        let formats = formats.to_vec();
        let data = tokio::task::spawn_blocking(move || Self::read_formats(mode, &formats))
            .await
            .map_err(|e| BufferError::ReadFailed {
                mode,
                message: format!("Task join error: {}", e),
            })??;

        Ok(BufferContent::new(data))
    }

    async fn write(&self, mode: BufferMode, data: &BufferData) -> Result<(), BufferError> {
        let data = data.clone();

        tokio::task::spawn_blocking(move || Self::write_data(mode, &data))
            .await
            .map_err(|e| BufferError::WriteFailed {
                mode,
                message: format!("Task join error: {}", e),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_create_successfully() {
        let _buffers = ArboardBuffers::new();
    }

    #[test]
    fn missing_content_is_empty_not_failed() {
        let content = content_or_none(BufferMode::Clipboard, Err(arboard::Error::ContentNotAvailable));
        assert_eq!(content.unwrap(), None);

        let content = content_or_none(BufferMode::Clipboard, Ok("<b>x</b>".to_string()));
        assert_eq!(content.unwrap().as_deref(), Some("<b>x</b>"));
    }

    #[test]
    fn other_errors_fail_the_read() {
        let err = content_or_none(BufferMode::Selection, Err(arboard::Error::ClipboardOccupied))
            .unwrap_err();
        assert!(matches!(
            err,
            BufferError::ReadFailed {
                mode: BufferMode::Selection,
                ..
            }
        ));
    }

    #[test]
    fn read_formats_without_known_formats_reads_nothing() {
        let data = ArboardBuffers::read_formats(BufferMode::Clipboard, &["image/png".to_string()]).unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn read_without_text_format_skips_clipboard() {
        let buffers = ArboardBuffers::default();
        let content = buffers
            .read(BufferMode::Clipboard, &["image/png".to_string()])
            .await
            .unwrap();
        assert!(content.data.is_empty());
        assert!(content.timestamp.is_none());
    }
}
