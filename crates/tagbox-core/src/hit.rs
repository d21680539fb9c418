//! Hit testing: point → node lookup.
//!
//! Walks each list last-to-first (last drawn = topmost) and checks
//! children before their parent, so the most nested, topmost box wins.
//! Children of collapsed top-level boxes and event boxes whose owner is
//! collapsed are not drawn and therefore never hit.

use crate::id::NodeId;
use crate::model::Bounds;
use crate::scene::Scene;

/// Topmost, most nested visible box containing `(x, y)`.
pub fn find_at_point(scene: &Scene, x: f32, y: f32) -> Option<NodeId> {
    find_in(scene, scene.tree.top_level(), x, y, &|_| true, &|_| true)
}

/// The box `dragged` would be dropped into at `(x, y)`.
///
/// Same priority as [`find_at_point`], but never `dragged` itself, never
/// anything below it (that would make a cycle), and never an event box.
/// Event boxes are never dropped anywhere.
pub fn find_drop_target(scene: &Scene, x: f32, y: f32, dragged: NodeId) -> Option<NodeId> {
    if scene.tree.get(dragged)?.is_event_box() {
        return None;
    }
    let tree = &scene.tree;
    find_in(
        scene,
        tree.top_level(),
        x,
        y,
        &|id| id != dragged,
        &|id| {
            id != dragged
                && !tree.is_descendant_of(id, dragged)
                && tree.get(id).is_some_and(|n| !n.is_event_box())
        },
    )
}

/// `descend(id)` gates recursion into `id`'s children; `accept(id)` gates
/// `id` itself as a result.
fn find_in(
    scene: &Scene,
    list: &[NodeId],
    x: f32,
    y: f32,
    descend: &dyn Fn(NodeId) -> bool,
    accept: &dyn Fn(NodeId) -> bool,
) -> Option<NodeId> {
    for &id in list.iter().rev() {
        let Some(node) = scene.tree.get(id) else {
            continue;
        };
        if scene.is_hidden(id) {
            continue;
        }
        if descend(id)
            && children_visible(scene, id)
            && let Some(hit) = find_in(scene, scene.tree.children(id), x, y, descend, accept)
        {
            return Some(hit);
        }
        if accept(id) && node.bounds.contains(x, y) {
            return Some(id);
        }
    }
    None
}

fn children_visible(scene: &Scene, id: NodeId) -> bool {
    !scene.tree.is_top_level(id) || scene.tree.get(id).is_some_and(|n| n.expanded)
}

/// Every visible box (nested ones included) overlapping `rect`, in
/// render order.
pub fn nodes_in_rect(scene: &Scene, rect: &Bounds) -> Vec<NodeId> {
    scene
        .tree
        .walk()
        .into_iter()
        .filter(|id| !scene.is_hidden(*id))
        .filter(|id| {
            scene
                .tree
                .get(*id)
                .is_some_and(|n| n.bounds.intersects(rect))
        })
        .collect()
}
