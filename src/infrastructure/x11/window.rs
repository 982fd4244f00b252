//! X11 window system adapter

use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt as _, KeyButMask, Window};
use x11rb::rust_connection::RustConnection;

use crate::application::ports::{PointerState, WindowSystem};
use crate::domain::buffer::BufferMode;

use super::{connect, intern, X11Error};

/// Longest title read, in 32-bit units
const MAX_TITLE_LENGTH: u32 = 1024;

struct Atoms {
    net_active_window: Atom,
    net_wm_name: Atom,
    utf8_string: Atom,
}

/// Window system adapter for X11.
///
/// The owner title is the title of the active window at the time of the
/// query; selection owners are usually hidden helper windows without a
/// useful name.
pub struct X11WindowSystem {
    conn: RustConnection,
    root: Window,
    atoms: Atoms,
}

impl X11WindowSystem {
    /// Connect to the X server named by `$DISPLAY`
    pub fn connect() -> Result<Self, X11Error> {
        let (conn, root) = connect()?;
        let atoms = Atoms {
            net_active_window: intern(&conn, "_NET_ACTIVE_WINDOW")?,
            net_wm_name: intern(&conn, "_NET_WM_NAME")?,
            utf8_string: intern(&conn, "UTF8_STRING")?,
        };
        Ok(Self { conn, root, atoms })
    }

    fn active_window(&self) -> Result<Option<Window>, X11Error> {
        let reply = self
            .conn
            .get_property(
                false,
                self.root,
                self.atoms.net_active_window,
                AtomEnum::WINDOW,
                0,
                1,
            )?
            .reply()?;
        Ok(reply
            .value32()
            .and_then(|mut values| values.next())
            .filter(|window| *window != 0))
    }

    fn window_title(&self, window: Window) -> Result<String, X11Error> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                self.atoms.net_wm_name,
                self.atoms.utf8_string,
                0,
                MAX_TITLE_LENGTH,
            )?
            .reply()?;
        if !reply.value.is_empty() {
            return Ok(String::from_utf8_lossy(&reply.value).into_owned());
        }

        // Legacy title, usually Latin-1; lossy is good enough for display
        let reply = self
            .conn
            .get_property(
                false,
                window,
                AtomEnum::WM_NAME,
                AtomEnum::ANY,
                0,
                MAX_TITLE_LENGTH,
            )?
            .reply()?;
        Ok(String::from_utf8_lossy(&reply.value).into_owned())
    }

    fn query_pointer(&self) -> Result<PointerState, X11Error> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        let mask = u16::from(reply.mask);
        Ok(PointerState {
            button_held: mask & u16::from(KeyButMask::BUTTON1) != 0,
            modifier_held: mask & u16::from(KeyButMask::SHIFT) != 0,
        })
    }
}

impl WindowSystem for X11WindowSystem {
    fn owner_title(&self, mode: BufferMode) -> String {
        let title = self.active_window().and_then(|window| match window {
            Some(window) => self.window_title(window),
            None => Ok(String::new()),
        });

        title.unwrap_or_else(|e| {
            log::debug!("Cannot get {} owner title: {}", mode, e);
            String::new()
        })
    }

    fn pointer_state(&self) -> Option<PointerState> {
        self.query_pointer()
            .map_err(|e| log::debug!("Cannot query pointer: {}", e))
            .ok()
    }

    fn process_events(&self) {
        // A round trip makes the server handle everything queued before it.
        let result = self
            .conn
            .get_input_focus()
            .map_err(X11Error::from)
            .and_then(|cookie| cookie.reply().map_err(X11Error::from));
        if let Err(e) = result {
            log::debug!("Cannot sync with X server: {}", e);
        }
    }
}
