//! What the user has selected.
//!
//! Single node, multi-node set, and connection selections are mutually
//! exclusive, so they are variants of one enum rather than separate fields.

use tagbox_core::{ConnectionId, NodeId, Scene};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// One node. `child` is set when the node is nested.
    Node { id: NodeId, child: bool },
    /// Multi-selection, in the order nodes were added.
    Nodes(Vec<NodeId>),
    Connection(ConnectionId),
}

impl Selection {
    pub fn node(scene: &Scene, id: NodeId) -> Self {
        Selection::Node {
            id,
            child: !scene.tree.is_top_level(id),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::None => true,
            Selection::Nodes(ids) => ids.is_empty(),
            _ => false,
        }
    }

    /// Every selected node, single or multi.
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Selection::Node { id, .. } => vec![*id],
            Selection::Nodes(ids) => ids.clone(),
            Selection::None | Selection::Connection(_) => Vec::new(),
        }
    }

    pub fn single_node(&self) -> Option<NodeId> {
        match self {
            Selection::Node { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn connection(&self) -> Option<ConnectionId> {
        match self {
            Selection::Connection(id) => Some(*id),
            _ => None,
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        match self {
            Selection::Node { id, .. } => *id == node,
            Selection::Nodes(ids) => ids.contains(&node),
            _ => false,
        }
    }

    pub fn in_group(&self, node: NodeId) -> bool {
        matches!(self, Selection::Nodes(ids) if ids.contains(&node))
    }

    /// Modifier-click: flip `node` in or out of the multi-selection. A
    /// single selection is promoted to a set first.
    pub fn toggle(&mut self, node: NodeId) {
        let mut ids = match std::mem::take(self) {
            Selection::Node { id, .. } => vec![id],
            Selection::Nodes(ids) => ids,
            Selection::None | Selection::Connection(_) => Vec::new(),
        };
        if let Some(pos) = ids.iter().position(|id| *id == node) {
            ids.remove(pos);
        } else {
            ids.push(node);
        }
        *self = if ids.is_empty() {
            Selection::None
        } else {
            Selection::Nodes(ids)
        };
    }

    /// Union `extra` into the current node selection, keeping order.
    pub fn extend(&mut self, extra: &[NodeId]) {
        let mut ids = self.nodes();
        for id in extra {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        *self = if ids.is_empty() {
            Selection::None
        } else {
            Selection::Nodes(ids)
        };
    }

    /// Drop references to nodes or connections no longer in `scene`.
    pub fn prune(&mut self, scene: &Scene) {
        match self {
            Selection::Node { id, .. } if !scene.tree.contains(*id) => *self = Selection::None,
            Selection::Nodes(ids) => {
                ids.retain(|id| scene.tree.contains(*id));
                if ids.is_empty() {
                    *self = Selection::None;
                }
            }
            Selection::Connection(id) if scene.connections.get(*id).is_none() => {
                *self = Selection::None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagbox_core::{Branch, Node};

    #[test]
    fn toggle_promotes_and_empties() {
        let (a, b) = (NodeId::intern("sel_a"), NodeId::intern("sel_b"));
        let mut sel = Selection::Node { id: a, child: false };
        sel.toggle(b);
        assert_eq!(sel, Selection::Nodes(vec![a, b]));
        sel.toggle(a);
        assert_eq!(sel, Selection::Nodes(vec![b]));
        sel.toggle(b);
        assert_eq!(sel, Selection::None);
    }

    #[test]
    fn extend_unions_without_duplicates() {
        let (a, b, c) = (
            NodeId::intern("ext_a"),
            NodeId::intern("ext_b"),
            NodeId::intern("ext_c"),
        );
        let mut sel = Selection::Nodes(vec![a, b]);
        sel.extend(&[b, c]);
        assert_eq!(sel.nodes(), vec![a, b, c]);
    }

    #[test]
    fn prune_forgets_deleted_nodes() {
        let mut scene = Scene::new();
        let keep = scene.tree.insert_top_level(Branch::leaf(Node::at("Keep", 0.0, 0.0))).unwrap();
        let gone = scene.tree.insert_top_level(Branch::leaf(Node::at("Gone", 0.0, 0.0))).unwrap();
        let mut sel = Selection::Nodes(vec![keep, gone]);
        scene.delete_node(gone);
        sel.prune(&scene);
        assert_eq!(sel, Selection::Nodes(vec![keep]));

        let mut single = Selection::node(&scene, keep);
        scene.delete_node(keep);
        single.prune(&scene);
        assert!(single.is_empty());
    }
}
