//! Wayland buffer access using wl-paste / wl-copy

use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::application::ports::{BufferAccess, BufferError};
use crate::domain::buffer::{BufferContent, BufferData, BufferMode, MIME_TEXT};

/// How long a buffer owner gets to hand over its data
const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Buffer access adapter using the wl-clipboard tools
pub struct WlClipboardBuffers {
    read_timeout: Duration,
}

impl WlClipboardBuffers {
    /// Create a new wl-clipboard buffer adapter
    pub fn new() -> Self {
        Self {
            read_timeout: READ_TIMEOUT,
        }
    }

    /// Create with a custom read timeout
    pub fn with_timeout(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }

    async fn wl_paste(&self, mode: BufferMode, args: &[&str]) -> Result<Output, BufferError> {
        let mut command = Command::new("wl-paste");
        if mode == BufferMode::Selection {
            command.arg("--primary");
        }
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.read_timeout, command.output())
            .await
            .map_err(|_| BufferError::ReadFailed {
                mode,
                message: "owner did not answer in time".to_string(),
            })?;

        output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BufferError::ToolNotFound("wl-paste")
            } else {
                BufferError::ReadFailed {
                    mode,
                    message: e.to_string(),
                }
            }
        })
    }

    /// Formats currently offered by the buffer owner
    async fn list_types(&self, mode: BufferMode) -> Result<Vec<String>, BufferError> {
        let output = self.wl_paste(mode, &["--list-types"]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_empty_buffer_message(&stderr) {
                return Ok(Vec::new());
            }
            return Err(BufferError::ReadFailed {
                mode,
                message: stderr.trim().to_string(),
            });
        }

        Ok(parse_type_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Default for WlClipboardBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// wl-paste reports an empty buffer as an error
fn is_empty_buffer_message(stderr: &str) -> bool {
    stderr.contains("Nothing is copied") || stderr.contains("No selection")
}

fn parse_type_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Type argument to pass to wl-paste for a requested format.
///
/// Plain text is requested as `text` so wl-paste picks the best text
/// type the owner offers (UTF8_STRING, text/plain;charset=utf-8, ...).
fn paste_type<'a>(format: &'a str, offered: &[String]) -> Option<&'a str> {
    if format == MIME_TEXT {
        let has_text = offered.iter().any(|t| {
            t.starts_with("text/plain") || t == "UTF8_STRING" || t == "STRING" || t == "TEXT"
        });
        return has_text.then_some("text");
    }
    offered.iter().any(|t| t == format).then_some(format)
}

#[async_trait]
impl BufferAccess for WlClipboardBuffers {
    async fn read(&self, mode: BufferMode, formats: &[String]) -> Result<BufferContent, BufferError> {
        let offered = self.list_types(mode).await?;

        let mut data = BufferData::new();
        for format in formats {
            let Some(paste_type) = paste_type(format, &offered) else {
                continue;
            };

            let output = self
                .wl_paste(mode, &["--no-newline", "--type", paste_type])
                .await?;
            if !output.status.success() {
                return Err(BufferError::ReadFailed {
                    mode,
                    message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            data.insert(format.clone(), output.stdout);
        }

        Ok(BufferContent::new(data))
    }

    async fn write(&self, mode: BufferMode, data: &BufferData) -> Result<(), BufferError> {
        let (format, bytes) = match data.get(MIME_TEXT) {
            Some(bytes) => (MIME_TEXT, bytes),
            None => data.iter().next().unwrap_or((MIME_TEXT, &[][..])),
        };

        let mut command = Command::new("wl-copy");
        if mode == BufferMode::Selection {
            command.arg("--primary");
        }
        let mut child = command
            .args(["--type", format])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BufferError::ToolNotFound("wl-copy")
                } else {
                    BufferError::WriteFailed {
                        mode,
                        message: e.to_string(),
                    }
                }
            })?;

        // Write data to stdin; dropping it closes the pipe
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(bytes)
                .await
                .map_err(|e| BufferError::WriteFailed {
                    mode,
                    message: e.to_string(),
                })?;
        }

        // Wait for process to complete
        let status = child.wait().await.map_err(|e| BufferError::WriteFailed {
            mode,
            message: e.to_string(),
        })?;

        if !status.success() {
            return Err(BufferError::WriteFailed {
                mode,
                message: format!("wl-copy exited with status: {}", status),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offered(types: &[&str]) -> Vec<String> {
        types.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn text_maps_to_generic_text_type() {
        let types = offered(&["text/plain;charset=utf-8", "text/html"]);
        assert_eq!(paste_type(MIME_TEXT, &types), Some("text"));
        assert_eq!(paste_type("text/html", &types), Some("text/html"));
    }

    #[test]
    fn missing_formats_are_skipped() {
        let types = offered(&["image/png"]);
        assert_eq!(paste_type(MIME_TEXT, &types), None);
        assert_eq!(paste_type("text/html", &types), None);
    }

    #[test]
    fn x11_style_text_targets_count_as_text() {
        let types = offered(&["UTF8_STRING", "TARGETS"]);
        assert_eq!(paste_type(MIME_TEXT, &types), Some("text"));
    }

    #[test]
    fn parse_type_list_skips_blank_lines() {
        let types = parse_type_list("text/plain\n\n  text/html  \n");
        assert_eq!(types, vec!["text/plain".to_string(), "text/html".to_string()]);
    }

    #[test]
    fn empty_buffer_messages() {
        assert!(is_empty_buffer_message("Nothing is copied\n"));
        assert!(is_empty_buffer_message("No selection"));
        assert!(!is_empty_buffer_message("Failed to connect to a Wayland server"));
    }

    #[test]
    fn custom_timeout() {
        let buffers = WlClipboardBuffers::with_timeout(Duration::from_millis(10));
        assert_eq!(buffers.read_timeout, Duration::from_millis(10));
    }
}
