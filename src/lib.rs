//! clipwatch - clipboard and primary selection monitor
//!
//! Turns unreliable "buffer owner changed" notifications from the window
//! system into debounced, deduplicated change events, with bounded retries
//! for owners that answer slowly and a gate that waits for mouse selections
//! to finish.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Buffer data, tracker state, timers and configuration values
//! - **Application**: The monitor use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (arboard, wl-clipboard, X11, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
