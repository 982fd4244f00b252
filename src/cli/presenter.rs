//! CLI presenter for output formatting

use colored::*;
use serde_json::json;

use crate::domain::buffer::{BufferData, BufferMode, MIME_WINDOW_TITLE};

/// Longest text preview shown for an event, in characters
const PREVIEW_CHARS: usize = 60;

/// Presenter for CLI output formatting
pub struct Presenter {
    json: bool,
}

impl Presenter {
    /// Create a new presenter with human-readable event lines
    pub fn new() -> Self {
        Self { json: false }
    }

    /// Create a presenter printing events as JSON lines
    pub fn json() -> Self {
        Self { json: true }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print one buffer change event to stdout
    pub fn event(&self, mode: BufferMode, data: &BufferData) {
        let line = if self.json {
            format_event_json(mode, data)
        } else {
            format_event(mode, data)
        };
        println!("{}", line);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn owner_title(data: &BufferData) -> Option<String> {
    data.get(MIME_WINDOW_TITLE)
        .map(|title| String::from_utf8_lossy(title).into_owned())
        .filter(|title| !title.is_empty())
}

/// Single-line, shortened view of the text of an event
pub fn preview(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let flat = flat.trim();

    if flat.chars().count() <= PREVIEW_CHARS {
        return flat.to_string();
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS - 1).collect();
    format!("{}…", cut)
}

/// Human-readable event line: mode, owner, text preview
pub fn format_event(mode: BufferMode, data: &BufferData) -> String {
    let owner = owner_title(data)
        .map(|title| format!(" [{}]", title))
        .unwrap_or_default();

    let body = match data.text() {
        Some(text) => format!("\"{}\"", preview(text)),
        None if data.formats().any(|f| f != MIME_WINDOW_TITLE) => {
            let formats: Vec<&str> = data.formats().filter(|f| *f != MIME_WINDOW_TITLE).collect();
            format!("({})", formats.join(", "))
        }
        None => "(empty)".to_string(),
    };

    format!("{:<9}{} {}", mode.as_str().bold(), owner.cyan(), body)
}

/// JSON event line
pub fn format_event_json(mode: BufferMode, data: &BufferData) -> String {
    let formats: Vec<&str> = data.formats().filter(|f| *f != MIME_WINDOW_TITLE).collect();
    json!({
        "mode": mode.as_str(),
        "owner": owner_title(data),
        "formats": formats,
        "text": data.text(),
    })
    .to_string()
}
