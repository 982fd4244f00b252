//! Platform backend preference

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidBackendError;

/// Valid backend names, for help and validation messages
pub const VALID_BACKENDS: &[&str] = &["auto", "x11", "wayland", "poll"];

/// Which platform adapters drive the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Pick from the session environment
    #[default]
    Auto,
    /// X11: XFixes notifications, owner title and pointer state
    X11,
    /// Wayland: wl-clipboard tools
    Wayland,
    /// Any platform: poll the clipboard for changes
    Poll,
}

impl Backend {
    /// Get the string identifier for this backend
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::X11 => "x11",
            Self::Wayland => "wayland",
            Self::Poll => "poll",
        }
    }
}

impl FromStr for Backend {
    type Err = InvalidBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "x11" => Ok(Self::X11),
            "wayland" => Ok(Self::Wayland),
            "poll" => Ok(Self::Poll),
            _ => Err(InvalidBackendError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_valid() {
        for name in VALID_BACKENDS {
            let backend: Backend = name.parse().unwrap();
            assert_eq!(backend.as_str(), *name);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("X11".parse::<Backend>().unwrap(), Backend::X11);
    }

    #[test]
    fn parse_invalid() {
        let err = "mir".parse::<Backend>().unwrap_err();
        assert!(err.to_string().contains("mir"));
    }
}
