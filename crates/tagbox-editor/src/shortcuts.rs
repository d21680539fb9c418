//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The editor
//! turns actions into operations in [`Editor::perform`].
//!
//! [`Editor::perform`]: crate::controller::Editor::perform

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Duplicate,

    // ── Structure ──
    /// Enter or leave connect mode.
    ToggleConnect,
    /// Expand/collapse the selected top-level box.
    ToggleExpand,
    /// Attach an inbound event box to the selected box.
    AddInboundEvent,
    /// Attach an outbound event box to the selected box.
    AddOutboundEvent,

    // ── UI ──
    /// Leave connect mode and clear the selection.
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                _ => None,
            };
        }

        if shift {
            return match key {
                "I" | "i" => Some(ShortcutAction::AddInboundEvent),
                "O" | "o" => Some(ShortcutAction::AddOutboundEvent),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "c" | "C" => Some(ShortcutAction::ToggleConnect),
            "Enter" => Some(ShortcutAction::ToggleExpand),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }

    pub fn resolve_with(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        Self::resolve(
            key,
            modifiers.ctrl,
            modifiers.shift,
            modifiers.alt,
            modifiers.meta,
        )
    }
}
