//! X11 infrastructure module
//!
//! Selection reads through `ConvertSelection`, owner window titles and
//! pointer state through core protocol queries, and selection ownership
//! notifications through the XFixes extension.

mod buffers;
mod window;
mod xfixes;

pub use buffers::X11Buffers;
pub use window::X11WindowSystem;
pub use xfixes::XfixesWatcher;

use thiserror::Error;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::xproto::{Atom, ConnectionExt as _, Window};
use x11rb::rust_connection::RustConnection;

/// X11 errors
#[derive(Debug, Error)]
pub enum X11Error {
    #[error("Cannot connect to X server: {0}")]
    Connect(String),

    #[error("X server has no screen {0}")]
    NoScreen(usize),

    #[error("X11 connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("X11 resource allocation failed: {0}")]
    Id(#[from] ReplyOrIdError),

    #[error("Selection owner did not answer in time")]
    Timeout,
}

/// Connect to the display named by `$DISPLAY` and return its root window
fn connect() -> Result<(RustConnection, Window), X11Error> {
    let (conn, screen_num) =
        x11rb::connect(None).map_err(|e| X11Error::Connect(e.to_string()))?;
    let root = conn
        .setup()
        .roots
        .get(screen_num)
        .map(|screen| screen.root)
        .ok_or(X11Error::NoScreen(screen_num))?;
    Ok((conn, root))
}

fn intern(conn: &RustConnection, name: &str) -> Result<Atom, X11Error> {
    Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
}
