//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// clipwatch - clipboard and primary selection monitor
#[derive(Parser, Debug)]
#[command(name = "clipwatch")]
#[command(version)]
#[command(about = "Watch the clipboard and primary selection for changes")]
#[command(long_about = None)]
pub struct Cli {
    /// Clipboard formats to capture (comma separated MIME types)
    #[arg(short = 'f', long, value_name = "MIME", value_delimiter = ',')]
    pub formats: Option<Vec<String>>,

    /// Do not monitor the clipboard
    #[arg(long)]
    pub no_clipboard: bool,

    /// Do not monitor the primary selection
    #[arg(long)]
    pub no_selection: bool,

    /// Backend to use (auto, x11, wayland, poll)
    #[arg(short = 'b', long, value_name = "BACKEND")]
    pub backend: Option<String>,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Put text into a buffer
    Copy {
        /// Write to the primary selection instead of the clipboard
        #[arg(short = 's', long)]
        selection: bool,
        /// Text to copy
        text: String,
    },
    /// Print the text of a buffer
    Paste {
        /// Read the primary selection instead of the clipboard
        #[arg(short = 's', long)]
        selection: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "formats",
    "clipboard",
    "selection",
    "backend",
    "poll_interval_ms",
    "monitor.min_interval_ms",
    "monitor.max_interval_ms",
    "monitor.max_retries",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
