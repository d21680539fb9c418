//! Interaction controller: the editor state machine.
//!
//! Pointer and keyboard events drive an explicit [`InteractionState`].
//! Every mutating operation follows the same sequence:
//!
//! 1. snapshot the scene + selection into [`History`] (before the change),
//! 2. mutate the [`Scene`],
//! 3. [`commit`](Editor::commit): relayout the affected branches, refresh
//!    connection endpoints, save through the [`PersistenceBridge`] and
//!    schedule the debounced shareable save.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Click on box | Click on empty canvas |
//! |----------|--------------|-----------------------|
//! | **Ctrl/⌘** | Toggle in multi-selection | Additive area selection |
//! | **Ctrl/⌘ + Alt** | Duplicate and select the copy | Additive area selection |

use crate::bridge::{DEFAULT_SAVE_DELAY, MemoryBridge, PersistenceBridge, SaveDebouncer};
use crate::history::{DEFAULT_DEPTH, History, HistoryEntry};
use crate::input::{InputEvent, Modifiers};
use crate::selection::Selection;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use smallvec::{SmallVec, smallvec};
use std::time::{Duration, Instant};
use tagbox_core::geometry::Point;
use tagbox_core::{
    Bounds, Branch, ConnectionId, EventDirection, LayoutEngine, Node, NodeId, NodeKind, Placement,
    Scene, find_at_point, find_drop_target, nodes_in_rect, persist,
};

/// Editor-level knobs. Layout metrics live in
/// [`LayoutConfig`](tagbox_core::LayoutConfig).
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Maximum undo depth.
    pub history_depth: usize,
    /// Offset applied to both axes of a duplicated box.
    pub duplicate_offset: f32,
    /// Max distance from a connection path that still counts as a hit.
    pub connection_tolerance: f32,
    /// Trailing delay before the shareable form is written.
    pub save_delay: Duration,
    /// Name given to boxes created by double-clicking the canvas.
    pub default_node_name: String,
    pub default_event_name: String,
    /// Horizontal gap between an owner and a newly attached event box.
    pub event_box_gap: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_DEPTH,
            duplicate_offset: 20.0,
            connection_tolerance: 6.0,
            save_delay: DEFAULT_SAVE_DELAY,
            default_node_name: "Component".to_string(),
            default_event_name: "onEvent".to_string(),
            event_box_gap: 60.0,
        }
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Moving `node` (and, for group drags, every other selected box).
    Dragging {
        node: NodeId,
        /// Pointer position relative to the node's top-left corner.
        grab: Point,
        /// Moving a multi-selection. Group drags never reparent.
        group: bool,
        /// At least one move happened since pointer-down.
        moved: bool,
    },
    AreaSelecting {
        anchor: Point,
        current: Point,
        additive: bool,
    },
    ConnectingAwaitingFirst,
    ConnectingAwaitingSecond {
        first: NodeId,
        /// Loose end of the rubber band.
        cursor: Point,
    },
}

impl InteractionState {
    pub fn is_connecting(&self) -> bool {
        matches!(
            self,
            Self::ConnectingAwaitingFirst | Self::ConnectingAwaitingSecond { .. }
        )
    }
}

/// Which geometry a commit recomputes.
enum Relayout {
    Skip,
    /// Whole forest, top-down.
    Full,
    /// Subtrees of these nodes' top-level ancestors.
    Branches(SmallVec<[NodeId; 4]>),
}

pub struct Editor {
    scene: Scene,
    selection: Selection,
    state: InteractionState,
    /// Box the dragged node would be dropped into.
    drop_target: Option<NodeId>,
    history: History,
    layout: LayoutEngine,
    config: EditorConfig,
    bridge: Box<dyn PersistenceBridge>,
    saves: SaveDebouncer,
}

impl Editor {
    /// Build an editor over whatever `bridge` has saved (or an empty scene).
    pub fn new(
        config: EditorConfig,
        layout: LayoutEngine,
        mut bridge: Box<dyn PersistenceBridge>,
    ) -> Self {
        let mut scene = bridge.load().unwrap_or_default();
        layout.relayout(&mut scene.tree);
        scene.refresh_connections();
        log::debug!(
            "editor ready: {} nodes, {} connections",
            scene.tree.len(),
            scene.connections.len()
        );
        Self {
            scene,
            selection: Selection::None,
            state: InteractionState::Idle,
            drop_target: None,
            history: History::new(config.history_depth),
            saves: SaveDebouncer::new(config.save_delay),
            layout,
            config,
            bridge,
        }
    }

    pub fn with_bridge(bridge: impl PersistenceBridge + 'static) -> Self {
        Self::new(EditorConfig::default(), LayoutEngine::default(), Box::new(bridge))
    }

    /// Empty editor backed by a fresh [`MemoryBridge`].
    pub fn in_memory() -> Self {
        Self::with_bridge(MemoryBridge::new())
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn drop_target(&self) -> Option<NodeId> {
        self.drop_target
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Live area-selection rectangle.
    pub fn area_rect(&self) -> Option<Bounds> {
        match self.state {
            InteractionState::AreaSelecting { anchor, current, .. } => Some(Bounds::from_corners(
                anchor.x, anchor.y, current.x, current.y,
            )),
            _ => None,
        }
    }

    /// Half-made connection: from the first box's center to the pointer.
    pub fn rubber_band(&self) -> Option<(Point, Point)> {
        match self.state {
            InteractionState::ConnectingAwaitingSecond { first, cursor } => {
                let (cx, cy) = self.scene.tree.get(first)?.bounds.center();
                Some((Point::new(cx, cy), cursor))
            }
            _ => None,
        }
    }

    pub fn save_pending(&self) -> bool {
        self.saves.is_pending()
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Feed one input event. Returns `false` for keys with no binding or
    /// whose action had nothing to act on.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => self.pointer_down(*x, *y, *modifiers),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(*x, *y),
            InputEvent::PointerUp { x, y, modifiers } => self.pointer_up(*x, *y, *modifiers),
            InputEvent::DoubleClick { x, y } => return self.double_click(*x, *y).is_some(),
            InputEvent::Key { key, modifiers } => {
                return ShortcutMap::resolve_with(key, *modifiers)
                    .is_some_and(|action| self.perform(action));
            }
        }
        true
    }

    pub fn perform(&mut self, action: ShortcutAction) -> bool {
        log::trace!("perform {action:?}");
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selection(),
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Duplicate => self.duplicate(),
            ShortcutAction::ToggleConnect => {
                self.toggle_connect_mode();
                true
            }
            ShortcutAction::ToggleExpand => self
                .selection
                .single_node()
                .is_some_and(|id| self.toggle_expanded(id)),
            ShortcutAction::AddInboundEvent => {
                let name = self.config.default_event_name.clone();
                self.add_event_box(&name, EventDirection::Inbound).is_some()
            }
            ShortcutAction::AddOutboundEvent => {
                let name = self.config.default_event_name.clone();
                self.add_event_box(&name, EventDirection::Outbound).is_some()
            }
            ShortcutAction::Deselect => {
                self.escape();
                true
            }
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        let p = Point::new(x, y);
        match self.state {
            InteractionState::ConnectingAwaitingFirst => {
                if let Some(first) = find_at_point(&self.scene, x, y) {
                    log::trace!("connect: first end {first}");
                    self.state = InteractionState::ConnectingAwaitingSecond { first, cursor: p };
                }
                return;
            }
            InteractionState::ConnectingAwaitingSecond { first, .. } => {
                let second = find_at_point(&self.scene, x, y);
                self.finish_connection(first, second);
                return;
            }
            InteractionState::Idle => {}
            InteractionState::Dragging { .. } | InteractionState::AreaSelecting { .. } => {
                // A second press without a release: drop the stale gesture.
                self.abort_gesture();
            }
        }

        let tolerance = self.config.connection_tolerance;
        if let Some(id) = self.scene.hit_test_connection(x, y, tolerance) {
            log::trace!("select connection {id}");
            self.selection = Selection::Connection(id);
            return;
        }

        let Some(hit) = find_at_point(&self.scene, x, y) else {
            if !modifiers.command() {
                self.selection = Selection::None;
            }
            self.state = InteractionState::AreaSelecting {
                anchor: p,
                current: p,
                additive: modifiers.command(),
            };
            return;
        };

        if modifiers.command() {
            if modifiers.alt {
                self.duplicate_nodes(&[hit]);
            } else {
                self.selection.toggle(hit);
            }
            return;
        }

        if self.selection.in_group(hit) {
            self.start_drag(hit, p, true);
            return;
        }

        // Nested boxes need a prior click before they can be dragged.
        let was_selected = self.selection.contains(hit);
        self.selection = Selection::node(&self.scene, hit);
        if was_selected || self.scene.tree.is_top_level(hit) {
            self.start_drag(hit, p, false);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let p = Point::new(x, y);
        match self.state {
            InteractionState::Dragging {
                node,
                grab,
                group,
                moved,
            } => self.drag_to(node, grab, group, moved, p),
            InteractionState::AreaSelecting {
                anchor, additive, ..
            } => {
                self.state = InteractionState::AreaSelecting {
                    anchor,
                    current: p,
                    additive,
                };
            }
            InteractionState::ConnectingAwaitingSecond { first, .. } => {
                self.state = InteractionState::ConnectingAwaitingSecond { first, cursor: p };
            }
            InteractionState::Idle | InteractionState::ConnectingAwaitingFirst => {}
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        match self.state {
            InteractionState::Dragging {
                node, group, moved, ..
            } => {
                self.state = InteractionState::Idle;
                let target = self.drop_target.take();
                self.history.end_gesture();
                if moved {
                    self.finish_drag(node, group, target);
                }
            }
            InteractionState::AreaSelecting {
                anchor, additive, ..
            } => {
                self.state = InteractionState::Idle;
                let rect = Bounds::from_corners(anchor.x, anchor.y, x, y);
                let hits = nodes_in_rect(&self.scene, &rect);
                log::trace!("area select {rect:?}: {} hit(s)", hits.len());
                if additive || modifiers.command() {
                    self.selection.extend(&hits);
                } else if hits.is_empty() {
                    self.selection = Selection::None;
                } else {
                    self.selection = Selection::Nodes(hits);
                }
            }
            // Connect mode outlives individual clicks.
            InteractionState::Idle
            | InteractionState::ConnectingAwaitingFirst
            | InteractionState::ConnectingAwaitingSecond { .. } => {}
        }
    }

    /// Double-click on empty canvas creates a box there.
    pub fn double_click(&mut self, x: f32, y: f32) -> Option<NodeId> {
        if find_at_point(&self.scene, x, y).is_some() {
            return None;
        }
        let name = self.config.default_node_name.clone();
        self.add_node(&name, x, y)
    }

    fn start_drag(&mut self, node: NodeId, p: Point, group: bool) {
        let Some(bounds) = self.scene.tree.get(node).map(|n| n.bounds) else {
            return;
        };
        let entry = self.snapshot();
        self.history.begin_gesture(entry);
        self.state = InteractionState::Dragging {
            node,
            grab: Point::new(p.x - bounds.x, p.y - bounds.y),
            group,
            moved: false,
        };
        log::trace!("drag start {node} (group: {group})");
    }

    fn drag_to(&mut self, node: NodeId, grab: Point, group: bool, moved: bool, p: Point) {
        let Some(current) = self.scene.tree.get(node).map(|n| n.bounds) else {
            self.abort_gesture();
            return;
        };
        let dx = p.x - grab.x - current.x;
        let dy = p.y - grab.y - current.y;
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        if !moved {
            self.history.mark_dirty();
        }
        self.state = InteractionState::Dragging {
            node,
            grab,
            group,
            moved: true,
        };

        if group {
            for id in self.group_roots() {
                self.scene.tree.translate_branch(id, dx, dy);
            }
        } else {
            self.scene.tree.translate_branch(node, dx, dy);
        }
        self.scene.refresh_connections();

        let is_event_box = self.scene.tree.get(node).is_some_and(Node::is_event_box);
        self.drop_target = if group || is_event_box {
            None
        } else {
            let (cx, cy) = current.center();
            find_drop_target(&self.scene, cx + dx, cy + dy, node)
        };
    }

    /// Selected nodes with no selected ancestor, so nothing moves twice.
    fn group_roots(&self) -> Vec<NodeId> {
        let selected = self.selection.nodes();
        selected
            .iter()
            .copied()
            .filter(|id| self.scene.tree.contains(*id))
            .filter(|id| {
                !self
                    .scene
                    .tree
                    .ancestors(*id)
                    .iter()
                    .any(|a| selected.contains(a))
            })
            .collect()
    }

    fn finish_drag(&mut self, node: NodeId, group: bool, target: Option<NodeId>) {
        if group {
            self.commit(Relayout::Full);
            return;
        }
        let tree = &mut self.scene.tree;
        let old_top = tree.top_level_ancestor(node);
        let is_event_box = tree.get(node).is_some_and(Node::is_event_box);

        if !is_event_box {
            match target {
                Some(parent) if tree.parent(node) != Some(parent) => {
                    if tree.reparent(node, Placement::ChildOf(parent)) {
                        log::debug!("drop {node} into {parent}");
                    }
                }
                None if !tree.is_top_level(node) => {
                    if tree.reparent(node, Placement::TopLevel) {
                        log::debug!("promote {node} to top level");
                    }
                }
                _ => {}
            }
        }

        if self.selection.single_node() == Some(node) {
            self.selection = Selection::node(&self.scene, node);
        }
        let mut affected: SmallVec<[NodeId; 4]> = smallvec![node];
        affected.extend(old_top);
        self.commit(Relayout::Branches(affected));
    }

    /// Drop an unfinished drag or area selection. Moves already applied
    /// are kept and committed.
    fn abort_gesture(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.drop_target = None;
        self.history.end_gesture();
        if let InteractionState::Dragging { moved: true, .. } = state {
            self.commit(Relayout::Full);
        }
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Enter connect mode (clearing the selection), or leave it.
    pub fn toggle_connect_mode(&mut self) {
        if self.state.is_connecting() {
            self.state = InteractionState::Idle;
            log::trace!("connect mode off");
        } else {
            self.abort_gesture();
            self.selection = Selection::None;
            self.state = InteractionState::ConnectingAwaitingFirst;
            log::trace!("connect mode on");
        }
    }

    fn finish_connection(&mut self, first: NodeId, second: Option<NodeId>) {
        match second {
            Some(second)
                if second != first && self.scene.connections.between(first, second).is_none() =>
            {
                self.connect(first, second);
                self.state = InteractionState::Idle;
            }
            _ => {
                log::trace!("connect: cancelled second end");
                self.state = InteractionState::ConnectingAwaitingFirst;
            }
        }
    }

    /// Connect two boxes directly. No-op (and no undo step) for self-loops,
    /// unknown boxes, or an already connected pair.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Option<ConnectionId> {
        if from == to
            || !self.scene.tree.contains(from)
            || !self.scene.tree.contains(to)
            || self.scene.connections.between(from, to).is_some()
        {
            return None;
        }
        self.record();
        let id = self.scene.connect(from, to)?;
        self.commit(Relayout::Skip);
        Some(id)
    }

    // ─── Edit operations ─────────────────────────────────────────────────

    /// Create a top-level box at `(x, y)` and select it.
    pub fn add_node(&mut self, name: &str, x: f32, y: f32) -> Option<NodeId> {
        let branch = Branch::leaf(Node::at(name, x, y));
        self.record();
        let id = self.scene.tree.insert_top_level(branch)?;
        self.selection = Selection::Node { id, child: false };
        log::debug!("add {id} `{name}` at ({x}, {y})");
        self.commit(Relayout::Branches(smallvec![id]));
        Some(id)
    }

    /// Create an event box. When a single box is selected it becomes the
    /// owner: the event box is placed to its right and connected from it.
    pub fn add_event_box(&mut self, name: &str, direction: EventDirection) -> Option<NodeId> {
        let gap = self.config.event_box_gap;
        let owner = self
            .selection
            .single_node()
            .filter(|id| self.scene.tree.get(*id).is_some_and(|n| !n.is_event_box()));
        let (x, y) = match owner.and_then(|id| self.scene.tree.get(id)) {
            Some(n) => (n.bounds.x + n.bounds.width + gap, n.bounds.y),
            None => (gap, gap),
        };

        let mut node = Node::new(name, NodeKind::EventBox(direction));
        node.bounds.x = x;
        node.bounds.y = y;
        self.record();
        let id = self.scene.tree.insert_top_level(Branch::leaf(node))?;
        if let Some(owner) = owner {
            self.scene.connect(owner, id);
        }
        self.selection = Selection::Node { id, child: false };
        log::debug!("add event box {id} ({direction:?}), owner {owner:?}");
        self.commit(Relayout::Branches(smallvec![id]));
        Some(id)
    }

    /// Delete the selected connection, or every selected box with its
    /// subtree and attached connections.
    pub fn delete_selection(&mut self) -> bool {
        if let Some(id) = self.selection.connection() {
            if self.scene.connections.get(id).is_none() {
                self.selection = Selection::None;
                return false;
            }
            self.record();
            self.scene.connections.remove(id);
            self.selection = Selection::None;
            log::debug!("delete connection {id}");
            self.commit(Relayout::Skip);
            return true;
        }

        let ids = self.selection.nodes();
        if ids.iter().all(|id| !self.scene.tree.contains(*id)) {
            return false;
        }
        self.record();
        let mut affected = SmallVec::new();
        for id in ids {
            if let Some(top) = self.scene.tree.top_level_ancestor(id)
                && top != id
            {
                affected.push(top);
            }
            self.scene.delete_node(id);
        }
        self.selection = Selection::None;
        self.commit(Relayout::Branches(affected));
        true
    }

    /// Duplicate every selected box and select the copies.
    pub fn duplicate(&mut self) -> bool {
        let ids = self.selection.nodes();
        !self.duplicate_nodes(&ids).is_empty()
    }

    fn duplicate_nodes(&mut self, ids: &[NodeId]) -> Vec<NodeId> {
        if ids.iter().all(|id| !self.scene.tree.contains(*id)) {
            return Vec::new();
        }
        self.record();
        let offset = self.config.duplicate_offset;
        let copies: Vec<NodeId> = ids
            .iter()
            .filter_map(|id| self.scene.tree.duplicate(*id, offset, offset))
            .collect();
        self.selection = match copies.as_slice() {
            [] => Selection::None,
            [one] => Selection::node(&self.scene, *one),
            many => Selection::Nodes(many.to_vec()),
        };
        log::debug!("duplicate {ids:?} -> {copies:?}");
        self.commit(Relayout::Branches(copies.iter().copied().collect()));
        copies
    }

    /// Expand or collapse a top-level box.
    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        if !self.scene.tree.is_top_level(id) {
            return false;
        }
        self.record();
        self.scene.tree.toggle_expanded(id);
        self.commit(Relayout::Full);
        true
    }

    /// Select every visible box.
    pub fn select_all(&mut self) -> bool {
        let ids: Vec<NodeId> = self
            .scene
            .tree
            .walk()
            .into_iter()
            .filter(|id| !self.scene.is_hidden(*id))
            .collect();
        if ids.is_empty() {
            return false;
        }
        self.selection = Selection::Nodes(ids);
        true
    }

    /// Leave connect mode and clear every kind of selection.
    pub fn escape(&mut self) {
        if self.state.is_connecting() {
            self.state = InteractionState::Idle;
        } else {
            self.abort_gesture();
        }
        self.selection = Selection::None;
    }

    /// Replace the whole scene (an import). Undoable.
    pub fn replace_scene(&mut self, scene: Scene) {
        self.abort_gesture();
        self.record();
        self.scene = scene;
        self.selection = Selection::None;
        self.commit(Relayout::Full);
    }

    /// Load a scene from its compact shareable encoding.
    pub fn import_compact(&mut self, encoded: &str) -> Result<(), String> {
        let scene = persist::from_compact(encoded)?;
        self.replace_scene(scene);
        Ok(())
    }

    // ─── History ─────────────────────────────────────────────────────────

    fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            scene: self.scene.clone(),
            selection: self.selection.clone(),
        }
    }

    /// Snapshot the current state before a mutation.
    pub(crate) fn record(&mut self) {
        let entry = self.snapshot();
        self.history.record(entry);
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(entry) => {
                self.restore(entry);
                log::debug!("undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(entry) => {
                self.restore(entry);
                log::debug!("redo");
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.scene = entry.scene;
        self.selection = entry.selection;
        self.state = InteractionState::Idle;
        self.drop_target = None;
        self.history.end_gesture();
        self.commit(Relayout::Full);
    }

    // ─── Commit & persistence ────────────────────────────────────────────

    fn commit(&mut self, relayout: Relayout) {
        match relayout {
            Relayout::Skip => {}
            Relayout::Full => self.layout.relayout(&mut self.scene.tree),
            Relayout::Branches(ids) => {
                let mut done: SmallVec<[NodeId; 4]> = SmallVec::new();
                for id in ids {
                    let Some(top) = self.scene.tree.top_level_ancestor(id) else {
                        continue;
                    };
                    if !done.contains(&top) {
                        self.layout.relayout_branch(&mut self.scene.tree, top);
                        done.push(top);
                    }
                }
            }
        }
        self.scene.refresh_connections();
        self.selection.prune(&self.scene);
        self.bridge.save(&self.scene);
        self.saves.schedule(Instant::now());
    }

    /// Apply layout, endpoint refresh and save after a panel edit.
    pub(crate) fn commit_node(&mut self, id: NodeId) {
        self.commit(Relayout::Branches(smallvec![id]));
    }

    /// Write the shareable form if its debounce delay has elapsed.
    pub fn poll_saves(&mut self, now: Instant) -> bool {
        if self.saves.poll(now) {
            self.write_shareable();
            true
        } else {
            false
        }
    }

    /// Write a pending shareable save right away.
    pub fn flush_saves(&mut self) -> bool {
        if self.saves.flush() {
            self.write_shareable();
            true
        } else {
            false
        }
    }

    fn write_shareable(&mut self) {
        match persist::to_compact(&self.scene) {
            Ok(encoded) => self.bridge.save_shareable(&encoded),
            Err(e) => log::warn!("shareable save failed: {e}"),
        }
    }

    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.flush_saves();
    }
}
