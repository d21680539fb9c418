//! The scene aggregate: node tree + connections.
//!
//! Everything an editor session mutates (apart from selection) lives here,
//! so a snapshot is a plain `clone()`.

use crate::connection::Connections;
use crate::id::{ConnectionId, NodeId};
use crate::model::Branch;
use crate::tree::NodeTree;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub tree: NodeTree,
    pub connections: Connections,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: NodeTree) -> Self {
        Self {
            tree,
            connections: Connections::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty() && self.connections.is_empty()
    }

    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Option<ConnectionId> {
        self.connections.create(&self.tree, from, to)
    }

    /// Remove `id` with its whole subtree, and every connection touching
    /// any removed node.
    pub fn delete_node(&mut self, id: NodeId) -> Option<Branch> {
        let mut removed = vec![id];
        removed.extend(self.tree.descendants(id));
        let branch = self.tree.remove(id)?;
        let dropped = self.connections.remove_touching(&removed);
        log::debug!(
            "deleted {id}: {} node(s), {} connection(s)",
            removed.len(),
            dropped.len()
        );
        Some(branch)
    }

    pub fn owner_of(&self, event_box: NodeId) -> Option<NodeId> {
        self.connections.owner_of(&self.tree, event_box)
    }

    /// Whether `id` is currently not drawn: it sits inside a collapsed
    /// top-level node, or it is an event box whose owner is collapsed or
    /// itself not drawn.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        if self.tree.is_collapsed_away(id) {
            return true;
        }
        let Some(owner) = self.owner_of(id) else {
            return false;
        };
        let owner_collapsed = self.tree.is_top_level(owner)
            && self.tree.get(owner).is_some_and(|n| !n.expanded);
        owner_collapsed || self.tree.is_collapsed_away(owner)
    }

    /// Connection under `(x, y)`, ignoring connections with an end that is
    /// not drawn.
    pub fn hit_test_connection(&self, x: f32, y: f32, tolerance: f32) -> Option<ConnectionId> {
        self.connections.hit_test_by(&self.tree, x, y, tolerance, |c| {
            !self.is_hidden(c.from) && !self.is_hidden(c.to)
        })
    }

    /// Refresh cached connection endpoints after boxes moved or resized.
    pub fn refresh_connections(&mut self) {
        self.connections.refresh_endpoints(&self.tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::model::{EventDirection, Node, NodeKind};

    #[test]
    fn delete_cascades_to_subtree_connections() {
        let mut scene = Scene::new();
        let app = scene.tree.insert_top_level(Branch::leaf(Node::at("App", 0.0, 0.0))).unwrap();
        let nav = scene
            .tree
            .insert_child(app, Branch::leaf(Node::at("Nav", 0.0, 0.0)))
            .unwrap();
        let other = scene
            .tree
            .insert_top_level(Branch::leaf(Node::at("Other", 300.0, 0.0)))
            .unwrap();
        scene.connect(other, nav).unwrap();
        scene.connect(app, other).unwrap();

        let branch = scene.delete_node(app).unwrap();
        assert_eq!(branch.node_count(), 2);
        assert!(scene.connections.is_empty());
        assert_eq!(scene.tree.top_level(), &[other]);
    }

    #[test]
    fn event_box_hidden_with_collapsed_owner() {
        let mut scene = Scene::new();
        let app = scene.tree.insert_top_level(Branch::leaf(Node::at("App", 0.0, 0.0))).unwrap();
        let ev = scene
            .tree
            .insert_top_level(Branch::leaf(Node::new(
                "onLoad",
                NodeKind::EventBox(EventDirection::Inbound),
            )))
            .unwrap();
        scene.connect(app, ev).unwrap();

        assert!(!scene.is_hidden(ev));
        scene.tree.toggle_expanded(app);
        assert!(scene.is_hidden(ev));
        assert!(!scene.is_hidden(app));
    }

    #[test]
    fn hidden_connections_are_not_hit() {
        let mut scene = Scene::new();
        let app = scene.tree.insert_top_level(Branch::leaf(Node::at("App", 0.0, 0.0))).unwrap();
        let mut ev = Node::new("onLoad", NodeKind::EventBox(EventDirection::Outbound));
        ev.bounds.x = 300.0;
        let ev = scene.tree.insert_top_level(Branch::leaf(ev)).unwrap();
        LayoutEngine::default().relayout(&mut scene.tree);
        let id = scene.connect(app, ev).unwrap();

        // Straight run between the facing edges at the boxes' mid-height.
        let (_, cy) = scene.tree.get(app).unwrap().bounds.center();
        assert_eq!(scene.hit_test_connection(220.0, cy, 6.0), Some(id));

        scene.tree.toggle_expanded(app);
        assert_eq!(scene.hit_test_connection(220.0, cy, 6.0), None);
        assert_eq!(scene.connections.hit_test(&scene.tree, 220.0, cy, 6.0), Some(id));
    }

    #[test]
    fn connections_into_collapsed_boxes_are_not_hit() {
        let mut scene = Scene::new();
        let app = scene.tree.insert_top_level(Branch::leaf(Node::at("App", 0.0, 0.0))).unwrap();
        let nav = scene
            .tree
            .insert_child(app, Branch::leaf(Node::at("Nav", 0.0, 0.0)))
            .unwrap();
        let other = scene
            .tree
            .insert_top_level(Branch::leaf(Node::at("Other", 400.0, 0.0)))
            .unwrap();
        LayoutEngine::default().relayout(&mut scene.tree);
        let id = scene.connect(other, nav).unwrap();
        let route = scene.connections.get(id).unwrap().route();
        let start = route[0];
        assert_eq!(scene.hit_test_connection(start.x, start.y, 6.0), Some(id));

        scene.tree.toggle_expanded(app);
        assert_eq!(scene.hit_test_connection(start.x, start.y, 6.0), None);
    }
}
