pub mod bridge;
pub mod controller;
pub mod history;
pub mod input;
pub mod panel;
pub mod selection;
pub mod shortcuts;

pub use bridge::{FileBridge, MemoryBridge, PersistenceBridge, SaveDebouncer};
pub use controller::{Editor, EditorConfig, InteractionState};
pub use history::{History, HistoryEntry};
pub use input::{InputEvent, Modifiers};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutMap};
