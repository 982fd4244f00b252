//! XFixes selection ownership watcher

use std::thread;

use x11rb::connection::Connection;
use x11rb::protocol::xfixes::{ConnectionExt as _, SelectionEventMask};
use x11rb::protocol::xproto::Atom;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

use crate::application::ports::{NotificationSender, OwnershipWatcher, WatchError};
use crate::domain::buffer::BufferMode;

use super::{connect, intern, X11Error};

/// Watches selection owner changes with XFixes on a background thread
pub struct XfixesWatcher;

impl XfixesWatcher {
    /// Create a new XFixes watcher
    pub fn new() -> Self {
        Self
    }

    fn subscribe(
        modes: &[BufferMode],
    ) -> Result<(RustConnection, Vec<(Atom, BufferMode)>), X11Error> {
        let (conn, root) = connect()?;
        conn.xfixes_query_version(5, 0)?.reply()?;

        let mask = SelectionEventMask::SET_SELECTION_OWNER
            | SelectionEventMask::SELECTION_WINDOW_DESTROY
            | SelectionEventMask::SELECTION_CLIENT_CLOSE;

        let mut selections = Vec::with_capacity(modes.len());
        for &mode in modes {
            let atom = intern(&conn, mode.x11_atom_name())?;
            conn.xfixes_select_selection_input(root, atom, mask)?;
            selections.push((atom, mode));
        }
        conn.flush()?;

        Ok((conn, selections))
    }
}

impl Default for XfixesWatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn run(conn: RustConnection, selections: Vec<(Atom, BufferMode)>, sender: NotificationSender) {
    loop {
        let event = match conn.wait_for_event() {
            Ok(event) => event,
            Err(e) => {
                log::warn!("XFixes watcher stopped: {}", e);
                return;
            }
        };

        let Event::XfixesSelectionNotify(notify) = event else {
            continue;
        };

        let mode = selections
            .iter()
            .find(|(atom, _)| *atom == notify.selection)
            .map(|(_, mode)| *mode);

        if let Some(mode) = mode {
            if sender.send(mode).is_err() {
                // Monitor is gone
                return;
            }
        }
    }
}

impl OwnershipWatcher for XfixesWatcher {
    fn watch(&self, modes: &[BufferMode], sender: NotificationSender) -> Result<(), WatchError> {
        let (conn, selections) = Self::subscribe(modes).map_err(|e| match e {
            X11Error::Connect(_) | X11Error::NoScreen(_) => WatchError::Connection(e.to_string()),
            _ => WatchError::Unsupported(e.to_string()),
        })?;

        thread::Builder::new()
            .name("xfixes-watcher".to_string())
            .spawn(move || run(conn, selections, sender))
            .map_err(|e| WatchError::SpawnFailed(e.to_string()))?;

        log::info!("Watching selection owners with XFixes");
        Ok(())
    }
}
