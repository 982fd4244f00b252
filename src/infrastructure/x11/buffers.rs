//! X11 selection reader

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ConnectionExt as _, CreateWindowAux, SelectionNotifyEvent, Window,
    WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT, CURRENT_TIME, NONE};

use crate::application::ports::{BufferAccess, BufferError};
use crate::domain::buffer::{BufferContent, BufferData, BufferMode, MIME_TEXT};
use crate::infrastructure::clipboard::ArboardBuffers;

use super::{connect, intern, X11Error};

/// How long an owner may take to answer one conversion
const CONVERT_TIMEOUT: Duration = Duration::from_secs(1);

const POLL_STEP: Duration = Duration::from_millis(5);

/// Largest property read at once, in 32-bit units
const MAX_PROPERTY_LENGTH: u32 = 4 * 1024 * 1024;

/// Target holding the time the owner acquired the selection
const TIMESTAMP_TARGET: &str = "TIMESTAMP";

/// Property on the reader window receiving converted data
const PROPERTY_NAME: &str = "CLIPWATCH_SELECTION";

/// X11 targets to ask for a format, preferred first
fn targets_for(format: &str) -> Vec<&str> {
    if format == MIME_TEXT {
        vec!["UTF8_STRING", "text/plain;charset=utf-8", MIME_TEXT]
    } else {
        vec![format]
    }
}

fn read_failed(mode: BufferMode, message: impl ToString) -> BufferError {
    BufferError::ReadFailed {
        mode,
        message: message.to_string(),
    }
}

/// Converts selections into a property of an unmapped helper window
struct SelectionReader {
    conn: RustConnection,
    window: Window,
    property: Atom,
    incr: Atom,
    atoms: HashMap<String, Atom>,
}

impl SelectionReader {
    fn connect() -> Result<Self, X11Error> {
        let (conn, root) = connect()?;
        let window = conn.generate_id()?;
        conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            COPY_FROM_PARENT,
            &CreateWindowAux::new(),
        )?;
        let property = intern(&conn, PROPERTY_NAME)?;
        let incr = intern(&conn, "INCR")?;
        conn.flush()?;

        Ok(Self {
            conn,
            window,
            property,
            incr,
            atoms: HashMap::new(),
        })
    }

    fn atom(&mut self, name: &str) -> Result<Atom, X11Error> {
        if let Some(atom) = self.atoms.get(name) {
            return Ok(*atom);
        }
        let atom = intern(&self.conn, name)?;
        self.atoms.insert(name.to_string(), atom);
        Ok(atom)
    }

    fn read(&mut self, mode: BufferMode, formats: &[String]) -> Result<BufferContent, X11Error> {
        let selection = self.atom(mode.x11_atom_name())?;
        let owner = self.conn.get_selection_owner(selection)?.reply()?.owner;
        if owner == NONE {
            return Ok(BufferContent::default());
        }

        let timestamp_target = self.atom(TIMESTAMP_TARGET)?;
        let timestamp = self.convert(selection, timestamp_target)?;

        let mut data = BufferData::new();
        for format in formats {
            for name in targets_for(format) {
                let target = self.atom(name)?;
                if let Some(bytes) = self.convert(selection, target)? {
                    data.insert(format.as_str(), bytes);
                    break;
                }
            }
        }

        Ok(BufferContent { data, timestamp })
    }

    /// Ask the owner for one target and wait for the answer.
    ///
    /// Returns `None` if the owner refused the target.
    fn convert(&mut self, selection: Atom, target: Atom) -> Result<Option<Vec<u8>>, X11Error> {
        self.conn
            .convert_selection(self.window, selection, target, self.property, CURRENT_TIME)?;
        self.conn.flush()?;

        let notify = self.wait_for_notify(selection, target)?;
        if notify.property == NONE {
            return Ok(None);
        }

        let reply = self
            .conn
            .get_property(
                true,
                self.window,
                self.property,
                AtomEnum::ANY,
                0,
                MAX_PROPERTY_LENGTH,
            )?
            .reply()?;

        if reply.type_ == self.incr {
            log::debug!("Skipping target {}: incremental transfers are not read", target);
            return Ok(None);
        }
        Ok(Some(reply.value))
    }

    fn wait_for_notify(
        &self,
        selection: Atom,
        target: Atom,
    ) -> Result<SelectionNotifyEvent, X11Error> {
        let deadline = Instant::now() + CONVERT_TIMEOUT;
        while Instant::now() < deadline {
            match self.conn.poll_for_event()? {
                Some(Event::SelectionNotify(notify))
                    if notify.requestor == self.window
                        && notify.selection == selection
                        && notify.target == target =>
                {
                    return Ok(notify);
                }
                Some(_) => continue,
                None => thread::sleep(POLL_STEP),
            }
        }
        Err(X11Error::Timeout)
    }
}

/// Buffer access for X11.
///
/// Reads convert the selection directly, so every requested target and the
/// owner's `TIMESTAMP` are fetched. Writes go through arboard, which keeps
/// answering requests for the new data.
pub struct X11Buffers {
    reader: Arc<Mutex<SelectionReader>>,
    writer: ArboardBuffers,
}

impl X11Buffers {
    /// Connect to the X server named by `$DISPLAY`
    pub fn connect() -> Result<Self, X11Error> {
        Ok(Self {
            reader: Arc::new(Mutex::new(SelectionReader::connect()?)),
            writer: ArboardBuffers::new(),
        })
    }
}

#[async_trait]
impl BufferAccess for X11Buffers {
    async fn read(&self, mode: BufferMode, formats: &[String]) -> Result<BufferContent, BufferError> {
        let reader = Arc::clone(&self.reader);
        let formats = formats.to_vec();

        // Conversions block on the owner, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            let mut reader = reader
                .lock()
                .map_err(|_| read_failed(mode, "selection reader poisoned"))?;
            reader.read(mode, &formats).map_err(|e| read_failed(mode, e))
        })
        .await
        .map_err(|e| read_failed(mode, format!("Task join error: {}", e)))?
    }

    async fn write(&self, mode: BufferMode, data: &BufferData) -> Result<(), BufferError> {
        self.writer.write(mode, data).await
    }
}
