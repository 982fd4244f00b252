//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::buffer::{MIME_HTML, MIME_TEXT};
use crate::domain::monitor::{
    CheckPolicy, DEFAULT_MAX_INTERVAL_MS, DEFAULT_MAX_RETRIES, DEFAULT_MIN_INTERVAL_MS,
};

use super::backend::Backend;

/// Default poll interval for backends without ownership notifications
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Check-again timing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub min_interval_ms: Option<u64>,
    pub max_interval_ms: Option<u64>,
    pub max_retries: Option<u32>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
/// The primary selection only exists on Linux desktops
pub const DEFAULT_SELECTION: bool = cfg!(target_os = "linux");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub formats: Option<Vec<String>>,
    pub clipboard: Option<bool>,
    pub selection: Option<bool>,
    pub backend: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub monitor: Option<MonitorConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            formats: Some(vec![MIME_TEXT.to_string(), MIME_HTML.to_string()]),
            clipboard: Some(true),
            selection: Some(DEFAULT_SELECTION),
            backend: Some("auto".to_string()),
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
            monitor: Some(MonitorConfig {
                min_interval_ms: Some(DEFAULT_MIN_INTERVAL_MS),
                max_interval_ms: Some(DEFAULT_MAX_INTERVAL_MS),
                max_retries: Some(DEFAULT_MAX_RETRIES),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            formats: other.formats.or(self.formats),
            clipboard: other.clipboard.or(self.clipboard),
            selection: other.selection.or(self.selection),
            backend: other.backend.or(self.backend),
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            monitor: Self::merge_monitor_config(self.monitor, other.monitor),
        }
    }

    /// Merge monitor config sections
    fn merge_monitor_config(
        base: Option<MonitorConfig>,
        other: Option<MonitorConfig>,
    ) -> Option<MonitorConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(MonitorConfig {
                min_interval_ms: o.min_interval_ms.or(b.min_interval_ms),
                max_interval_ms: o.max_interval_ms.or(b.max_interval_ms),
                max_retries: o.max_retries.or(b.max_retries),
            }),
        }
    }

    /// Get monitored clipboard formats, or text and HTML if not set/empty
    pub fn formats_or_default(&self) -> Vec<String> {
        self.formats
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| vec![MIME_TEXT.to_string(), MIME_HTML.to_string()])
    }

    /// Get clipboard monitoring setting, or true if not set
    pub fn clipboard_or_default(&self) -> bool {
        self.clipboard.unwrap_or(true)
    }

    /// Get selection monitoring setting, or true on Linux if not set
    pub fn selection_or_default(&self) -> bool {
        self.selection.unwrap_or(DEFAULT_SELECTION)
    }

    /// Get backend as parsed Backend, or Auto if not set/invalid
    pub fn backend_or_default(&self) -> Backend {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get poll interval, or 250ms if not set or zero
    pub fn poll_interval_or_default(&self) -> u64 {
        self.poll_interval_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }

    /// Build the check-again policy from the monitor section
    pub fn check_policy(&self) -> CheckPolicy {
        let monitor = self.monitor.as_ref();
        CheckPolicy::new(
            monitor
                .and_then(|m| m.min_interval_ms)
                .unwrap_or(DEFAULT_MIN_INTERVAL_MS),
            monitor
                .and_then(|m| m.max_interval_ms)
                .unwrap_or(DEFAULT_MAX_INTERVAL_MS),
            monitor
                .and_then(|m| m.max_retries)
                .unwrap_or(DEFAULT_MAX_RETRIES),
        )
    }
}
