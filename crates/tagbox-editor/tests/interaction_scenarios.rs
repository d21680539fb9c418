//! Integration tests: end-to-end pointer/keyboard scenarios (tagbox-editor).
//!
//! Drives the `Editor` purely through `InputEvent`s, the way a host
//! surface would, and checks the resulting scene.

use pretty_assertions::assert_eq;
use tagbox_core::NodeId;
use tagbox_editor::{Editor, InputEvent, InteractionState, Modifiers, Selection};

fn center(editor: &Editor, id: NodeId) -> (f32, f32) {
    editor.scene().tree.get(id).unwrap().bounds.center()
}

fn click(editor: &mut Editor, x: f32, y: f32) {
    editor.handle(&InputEvent::down(x, y));
    editor.handle(&InputEvent::up(x, y));
}

fn key(editor: &mut Editor, key: &str) -> bool {
    editor.handle(&InputEvent::key(key, Modifiers::NONE))
}

fn command_key(editor: &mut Editor, key: &str) -> bool {
    editor.handle(&InputEvent::key(key, Modifiers::COMMAND))
}

// ─── Drag into, delete, undo ─────────────────────────────────────────────

#[test]
fn drag_into_delete_and_undo() {
    let mut editor = Editor::in_memory();

    let alpha = editor.add_node("Alpha", 50.0, 50.0).unwrap();
    assert_eq!(editor.scene().tree.top_level().len(), 1);
    let node = editor.scene().tree.get(alpha).unwrap();
    assert_eq!(node.name, "Alpha");
    assert!(editor.scene().tree.children(alpha).is_empty());

    let beta = editor.add_node("Beta", 300.0, 50.0).unwrap();
    let beta_height = editor.scene().tree.get(beta).unwrap().bounds.height;

    // Grab Alpha at its center and move that center onto Beta's center.
    let (ax, ay) = center(&editor, alpha);
    let (bx, by) = center(&editor, beta);
    editor.handle(&InputEvent::down(ax, ay));
    editor.handle(&InputEvent::moved((ax + bx) / 2.0, (ay + by) / 2.0));
    editor.handle(&InputEvent::moved(bx, by));
    assert_eq!(editor.drop_target(), Some(beta));
    editor.handle(&InputEvent::up(bx, by));

    assert_eq!(editor.scene().tree.top_level(), &[beta]);
    assert_eq!(editor.scene().tree.children(beta), &[alpha]);
    assert!(editor.scene().tree.get(beta).unwrap().bounds.height > beta_height);
    let before_delete = tagbox_core::persist::to_document(editor.scene());

    // Select Beta by its header row, then delete.
    let b = editor.scene().tree.get(beta).unwrap().bounds;
    click(&mut editor, b.x + 4.0, b.y + 4.0);
    assert_eq!(editor.selection(), &Selection::Node { id: beta, child: false });
    assert!(key(&mut editor, "Delete"));
    assert!(editor.scene().tree.top_level().is_empty());
    assert!(editor.scene().tree.is_empty());

    assert!(command_key(&mut editor, "z"));
    assert_eq!(editor.scene().tree.top_level(), &[beta]);
    assert_eq!(editor.scene().tree.children(beta), &[alpha]);
    assert_eq!(tagbox_core::persist::to_document(editor.scene()), before_delete);
}

// ─── Connect, select, delete ─────────────────────────────────────────────

#[test]
fn connect_select_and_delete_connection() {
    let mut editor = Editor::in_memory();
    let a = editor.add_node("A", 0.0, 0.0).unwrap();
    let b = editor.add_node("B", 300.0, 0.0).unwrap();

    assert!(key(&mut editor, "c"));
    assert_eq!(editor.state(), InteractionState::ConnectingAwaitingFirst);
    let (ax, ay) = center(&editor, a);
    let (bx, by) = center(&editor, b);
    click(&mut editor, ax, ay);
    editor.handle(&InputEvent::moved(200.0, 40.0));
    assert!(editor.rubber_band().is_some());
    click(&mut editor, bx, by);

    assert_eq!(editor.state(), InteractionState::Idle);
    assert_eq!(editor.scene().connections.len(), 1);
    let conn = editor.scene().connections.iter().next().unwrap().clone();
    assert_eq!((conn.from, conn.to), (a, b));

    // Midpoint of the straight path between the facing edges.
    let mx = (conn.from_point.x + conn.to_point.x) / 2.0;
    let my = (conn.from_point.y + conn.to_point.y) / 2.0;
    click(&mut editor, mx, my);
    assert_eq!(editor.selection(), &Selection::Connection(conn.id));

    assert!(key(&mut editor, "Backspace"));
    assert!(editor.scene().connections.is_empty());
    assert!(editor.selection().is_empty());
    assert_eq!(editor.scene().tree.len(), 2);
}

#[test]
fn second_connection_between_same_pair_is_ignored() {
    let mut editor = Editor::in_memory();
    let a = editor.add_node("A", 0.0, 0.0).unwrap();
    let b = editor.add_node("B", 300.0, 0.0).unwrap();
    assert!(editor.connect(a, b).is_some());

    key(&mut editor, "c");
    let (ax, ay) = center(&editor, a);
    let (bx, by) = center(&editor, b);
    click(&mut editor, bx, by);
    click(&mut editor, ax, ay);

    // Pair already connected: back to waiting for a first end.
    assert_eq!(editor.state(), InteractionState::ConnectingAwaitingFirst);
    assert_eq!(editor.scene().connections.len(), 1);
    assert!(key(&mut editor, "Escape"));
    assert_eq!(editor.state(), InteractionState::Idle);
}

// ─── Cascades ────────────────────────────────────────────────────────────

#[test]
fn deleting_parent_drops_connections_to_children() {
    let mut editor = Editor::in_memory();
    let parent = editor.add_node("Parent", 0.0, 0.0).unwrap();
    let child = editor.add_node("Child", 0.0, 200.0).unwrap();
    let other = editor.add_node("Other", 400.0, 0.0).unwrap();

    let (cx, cy) = center(&editor, child);
    let (px, py) = center(&editor, parent);
    editor.handle(&InputEvent::down(cx, cy));
    editor.handle(&InputEvent::moved(px, py));
    editor.handle(&InputEvent::up(px, py));
    assert_eq!(editor.scene().tree.parent(child), Some(parent));

    editor.connect(other, child).unwrap();
    let selected = editor.scene().tree.get(parent).unwrap().bounds;
    click(&mut editor, selected.x + 4.0, selected.y + 4.0);
    assert!(key(&mut editor, "Delete"));

    assert_eq!(editor.scene().tree.top_level(), &[other]);
    assert!(editor.scene().connections.is_empty());
}

#[test]
fn multi_delete_and_select_all() {
    let mut editor = Editor::in_memory();
    for i in 0..4 {
        editor.add_node(&format!("N{i}"), i as f32 * 200.0, 0.0);
    }
    assert!(command_key(&mut editor, "a"));
    assert_eq!(editor.selection().nodes().len(), 4);
    assert!(key(&mut editor, "Delete"));
    assert!(editor.scene().tree.is_empty());

    assert!(command_key(&mut editor, "z"));
    assert_eq!(editor.scene().tree.len(), 4);
    assert!(!key(&mut editor, "q"));
}

#[test]
fn duplicate_shortcut_copies_subtree() {
    let mut editor = Editor::in_memory();
    let card = editor.add_node("Card", 0.0, 0.0).unwrap();
    let title = editor.add_node("Title", 0.0, 300.0).unwrap();
    let (tx, ty) = center(&editor, title);
    let (cx, cy) = center(&editor, card);
    editor.handle(&InputEvent::down(tx, ty));
    editor.handle(&InputEvent::moved(cx, cy));
    editor.handle(&InputEvent::up(cx, cy));

    let b = editor.scene().tree.get(card).unwrap().bounds;
    click(&mut editor, b.x + 4.0, b.y + 4.0);
    assert!(command_key(&mut editor, "d"));

    let top = editor.scene().tree.top_level().to_vec();
    assert_eq!(top.len(), 2);
    let copy = top[1];
    assert_eq!(editor.selection(), &Selection::Node { id: copy, child: false });
    assert_eq!(editor.scene().tree.children(copy).len(), 1);
    let copied_title = editor.scene().tree.children(copy)[0];
    assert_ne!(copied_title, title);
    assert_eq!(editor.scene().tree.get(copied_title).unwrap().name, "Title");
}

#[test]
fn event_box_is_never_dropped_into_a_box() {
    let mut editor = Editor::in_memory();
    let owner = editor.add_node("Owner", 0.0, 0.0).unwrap();
    let ev = editor
        .add_event_box("onClick", tagbox_core::EventDirection::Inbound)
        .unwrap();

    let (ex, ey) = center(&editor, ev);
    let (ox, oy) = center(&editor, owner);
    editor.handle(&InputEvent::down(ex, ey));
    editor.handle(&InputEvent::moved(ox, oy));
    assert_eq!(editor.drop_target(), None);
    editor.handle(&InputEvent::up(ox, oy));

    assert!(editor.scene().tree.is_top_level(ev));
    assert!(editor.scene().tree.validate().is_ok());
}
