//! Buffer mode value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidBufferMode;

/// Both buffer modes, in check priority order
pub const ALL_MODES: &[BufferMode] = &[BufferMode::Clipboard, BufferMode::Selection];

/// Identity of an OS-managed shared buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferMode {
    /// The system clipboard (explicit copy/paste)
    #[default]
    Clipboard,
    /// The primary selection (mouse selection, middle-click paste)
    Selection,
}

impl BufferMode {
    /// Get the string identifier for this mode
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clipboard => "clipboard",
            Self::Selection => "selection",
        }
    }

    /// Name of the X11 selection atom backing this buffer
    pub const fn x11_atom_name(&self) -> &'static str {
        match self {
            Self::Clipboard => "CLIPBOARD",
            Self::Selection => "PRIMARY",
        }
    }
}

impl FromStr for BufferMode {
    type Err = InvalidBufferMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clipboard" => Ok(Self::Clipboard),
            "selection" | "primary" => Ok(Self::Selection),
            _ => Err(InvalidBufferMode {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BufferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
