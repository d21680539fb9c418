//! Persistence bridge: where the scene goes after every commit.
//!
//! The editor calls [`PersistenceBridge::save`] on every committed change
//! and schedules the compact shareable form through a [`SaveDebouncer`],
//! so a burst of edits (a long drag) produces a single shareable write
//! once things settle. Pending writes are flushed when the editor is
//! dropped.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tagbox_core::{Scene, persist};

/// Default trailing-edge delay for shareable saves.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(300);

pub trait PersistenceBridge {
    /// The last saved scene, if any. Unreadable state loads as an empty
    /// scene rather than failing.
    fn load(&mut self) -> Option<Scene>;

    /// Persist the full scene. Called on every commit.
    fn save(&mut self, scene: &Scene);

    /// Persist the compact shareable encoding. Debounced by the caller.
    fn save_shareable(&mut self, encoded: &str);
}

// ─── In-memory bridge ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub document: Option<String>,
    pub shareable: Option<String>,
    pub saves: usize,
    pub shareable_saves: usize,
}

/// Keeps saved state in memory. Clones share the same store, so a test
/// can keep a handle after moving the bridge into an editor.
#[derive(Debug, Clone, Default)]
pub struct MemoryBridge {
    store: Rc<RefCell<MemoryStore>>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bridge whose first `load` returns `json`.
    pub fn with_document(json: impl Into<String>) -> Self {
        let bridge = Self::new();
        bridge.store.borrow_mut().document = Some(json.into());
        bridge
    }

    pub fn document(&self) -> Option<String> {
        self.store.borrow().document.clone()
    }

    pub fn shareable(&self) -> Option<String> {
        self.store.borrow().shareable.clone()
    }

    pub fn save_count(&self) -> usize {
        self.store.borrow().saves
    }

    pub fn shareable_save_count(&self) -> usize {
        self.store.borrow().shareable_saves
    }
}

impl PersistenceBridge for MemoryBridge {
    fn load(&mut self) -> Option<Scene> {
        let store = self.store.borrow();
        store.document.as_deref().map(persist::from_json)
    }

    fn save(&mut self, scene: &Scene) {
        match persist::to_json(scene) {
            Ok(json) => {
                let mut store = self.store.borrow_mut();
                store.document = Some(json);
                store.saves += 1;
            }
            Err(e) => log::warn!("{e}"),
        }
    }

    fn save_shareable(&mut self, encoded: &str) {
        let mut store = self.store.borrow_mut();
        store.shareable = Some(encoded.to_string());
        store.shareable_saves += 1;
    }
}

// ─── File bridge ─────────────────────────────────────────────────────────

/// Saves the scene as pretty JSON to `path`, and the shareable form next to
/// it with a `.share` extension.
#[derive(Debug, Clone)]
pub struct FileBridge {
    path: PathBuf,
}

impl FileBridge {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shareable_path(&self) -> PathBuf {
        self.path.with_extension("share")
    }

    fn write(path: &Path, contents: &str) -> Result<(), String> {
        fs::write(path, contents).map_err(|e| format!("write {}: {e}", path.display()))
    }
}

impl PersistenceBridge for FileBridge {
    fn load(&mut self) -> Option<Scene> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Some(persist::from_json(&json)),
            Err(e) => {
                log::debug!("no saved scene at {}: {e}", self.path.display());
                None
            }
        }
    }

    fn save(&mut self, scene: &Scene) {
        if let Err(e) = persist::to_json(scene).and_then(|json| Self::write(&self.path, &json)) {
            log::warn!("save failed: {e}");
        }
    }

    fn save_shareable(&mut self, encoded: &str) {
        if let Err(e) = Self::write(&self.shareable_path(), encoded) {
            log::warn!("shareable save failed: {e}");
        }
    }
}

// ─── Debouncer ───────────────────────────────────────────────────────────

/// Trailing-edge debouncer. Time is passed in so callers (and tests)
/// control the clock.
#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    delay: Duration,
    due: Option<Instant>,
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DELAY)
    }
}

impl SaveDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    /// (Re)arm the timer. A newer schedule supersedes the pending one.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    /// `true` once, when the pending write is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// `true` if a write was pending. Clears it regardless of the clock.
    pub fn flush(&mut self) -> bool {
        self.due.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }
}
