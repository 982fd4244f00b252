//! Window system infrastructure module

use crate::application::ports::{PointerState, WindowSystem};
use crate::domain::buffer::BufferMode;

#[cfg(target_os = "linux")]
pub use super::x11::X11WindowSystem;

/// Window system adapter for platforms without queries.
///
/// Owner titles are empty and the pointer state is unknown, which lets
/// every selection commit immediately.
pub struct NoWindowSystem;

impl WindowSystem for NoWindowSystem {
    fn owner_title(&self, _mode: BufferMode) -> String {
        String::new()
    }

    fn pointer_state(&self) -> Option<PointerState> {
        None
    }
}
