//! Undo/redo history.
//!
//! Every mutation is preceded by a snapshot of the whole scene plus the
//! selection. Undo swaps the current state for the newest snapshot; the
//! swapped-out state goes on the redo stack.
//!
//! Drag gestures use **lazy snapshots**: `begin_gesture` parks the state
//! captured at pointer-down, and it is only pushed once the gesture
//! actually mutates (`mark_dirty`). A click that never moves leaves no
//! undo step behind.

use crate::selection::Selection;
use tagbox_core::Scene;

/// Default maximum undo depth.
pub const DEFAULT_DEPTH: usize = 30;

/// A deep copy of everything undo restores.
#[derive(Debug, Clone, Default)]
pub struct HistoryEntry {
    pub scene: Scene,
    pub selection: Selection,
}

pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// Maximum undo depth. Oldest entries are dropped first.
    max_depth: usize,
    /// Snapshot captured at the start of a gesture, not yet pushed.
    pending: Option<HistoryEntry>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            pending: None,
        }
    }

    /// Push the state as it was *before* a mutation.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.pending = None;
        self.push(entry);
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new action
        self.redo_stack.clear();
    }

    /// Park the state at the start of a gesture.
    pub fn begin_gesture(&mut self, entry: HistoryEntry) {
        self.pending = Some(entry);
    }

    /// The gesture mutated something: push the parked snapshot. Further
    /// calls within the same gesture are no-ops.
    pub fn mark_dirty(&mut self) {
        if let Some(entry) = self.pending.take() {
            self.push(entry);
        }
    }

    /// Close the gesture, discarding the snapshot if nothing changed.
    pub fn end_gesture(&mut self) {
        self.pending = None;
    }

    pub fn in_gesture(&self) -> bool {
        self.pending.is_some()
    }

    /// Swap `current` for the newest snapshot. `None` (and `current` is
    /// dropped unchanged by the caller) when there is nothing to undo.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(entry)
    }

    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
