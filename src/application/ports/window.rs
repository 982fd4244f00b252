//! Window system port interface

use crate::domain::buffer::BufferMode;

/// Pointer and modifier state at the time of a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    /// Primary pointer button is held
    pub button_held: bool,
    /// Shift is held
    pub modifier_held: bool,
}

impl PointerState {
    /// Check whether the user is probably still extending a text selection
    pub fn is_selecting(&self) -> bool {
        self.button_held || self.modifier_held
    }
}

/// Port for best-effort window system queries.
///
/// Every method must return quickly and never fail: a missing answer is
/// an empty title or `None`.
pub trait WindowSystem: Send + Sync {
    /// Title of the window that currently owns (or just took) a buffer.
    fn owner_title(&self, mode: BufferMode) -> String;

    /// Current pointer/modifier state, or `None` if the platform cannot tell.
    fn pointer_state(&self) -> Option<PointerState>;

    /// Flush pending window system events before taking a buffer.
    fn process_events(&self) {}
}

/// Blanket implementation for boxed window system types
impl WindowSystem for Box<dyn WindowSystem> {
    fn owner_title(&self, mode: BufferMode) -> String {
        self.as_ref().owner_title(mode)
    }

    fn pointer_state(&self) -> Option<PointerState> {
        self.as_ref().pointer_state()
    }

    fn process_events(&self) {
        self.as_ref().process_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_pointer_is_not_selecting() {
        assert!(!PointerState::default().is_selecting());
    }

    #[test]
    fn button_or_shift_means_selecting() {
        let button = PointerState {
            button_held: true,
            modifier_held: false,
        };
        let shift = PointerState {
            button_held: false,
            modifier_held: true,
        };
        assert!(button.is_selecting());
        assert!(shift.is_selecting());
    }
}
