//! Input abstraction layer.
//!
//! Normalizes pointer and keyboard events from the host surface into a
//! single `InputEvent` enum consumed by the [`Editor`](crate::controller::Editor).

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// ⌘ on macOS.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, ⌘ on macOS.
    pub const COMMAND: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// The platform "command" modifier is held.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f32,
        y: f32,
    },
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    Key {
        key: String,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::DoubleClick { x, y } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_ctrl_or_meta() {
        assert!(!Modifiers::NONE.command());
        assert!(Modifiers::COMMAND.command());
        let mac = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(mac.command());
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert!(!alt.command());
    }

    #[test]
    fn position_of_pointer_events_only() {
        assert_eq!(InputEvent::down(1.0, 2.0).position(), Some((1.0, 2.0)));
        assert_eq!(InputEvent::DoubleClick { x: 3.0, y: 4.0 }.position(), Some((3.0, 4.0)));
        assert_eq!(InputEvent::key("z", Modifiers::COMMAND).position(), None);
    }
}
