//! Core data model for Tagbox diagrams.
//!
//! A diagram is a forest of labeled boxes. Each box (`Node`) has a kind,
//! an ordered property list rendered as tag attributes, optional inner
//! content, and optional nested children. Containment lives in
//! [`NodeTree`](crate::tree::NodeTree); connections between arbitrary boxes
//! live in [`Connections`](crate::connection::Connections).

use crate::id::NodeId;
use serde::{Deserialize, Serialize};

/// Value stored in the property that mirrors an event descriptor.
/// Rendered as `name={() => {}}` instead of a quoted string.
pub const EVENT_HANDLER_SENTINEL: &str = "() => {}";

// ─── Kinds ───────────────────────────────────────────────────────────────

/// Direction of an event box relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventDirection {
    Inbound,
    Outbound,
}

/// What a box represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeKind {
    #[default]
    Component,
    Provider,
    Hook,
    /// Event annotation linked to an owner via a connection.
    /// Never contains children and is never nested.
    EventBox(EventDirection),
}

impl NodeKind {
    pub fn is_event_box(self) -> bool {
        matches!(self, NodeKind::EventBox(_))
    }
}

// ─── Properties & events ─────────────────────────────────────────────────

/// A tag attribute: `name` or `name="value"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The mirrored property for an event named `name`.
    pub fn event_handler(name: impl Into<String>) -> Self {
        Self::new(name, Some(EVENT_HANDLER_SENTINEL.to_string()))
    }

    pub fn is_event_handler(&self) -> bool {
        self.value.as_deref() == Some(EVENT_HANDLER_SENTINEL)
    }
}

/// An event the box emits or handles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag rectangle from two corners.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// AABB overlap. Touching edges count as overlapping so that a
    /// zero-area drag rectangle still selects the box under it.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x <= other.x + other.width
            && self.x + self.width >= other.x
            && self.y <= other.y + other.height
            && self.y + self.height >= other.y
    }
}

// ─── Font ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "monospace".into(),
            size: 13.0,
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A single box in the diagram. Children are owned by the tree, not the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Display name, rendered as the tag name.
    pub name: String,

    pub kind: NodeKind,

    /// Position and size. `x`/`y` are authoritative only for top-level
    /// nodes; everything else is written by the layout engine.
    pub bounds: Bounds,

    /// Collapse state. Ignored for nested nodes, which always render expanded.
    pub expanded: bool,

    pub properties: Vec<Property>,

    pub events: Vec<EventDescriptor>,

    /// Free text rendered between the opening and closing tags.
    pub content: String,

    pub notes: String,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::fresh(),
            name: name.into(),
            kind,
            bounds: Bounds::default(),
            expanded: true,
            properties: Vec::new(),
            events: Vec::new(),
            content: String::new(),
            notes: String::new(),
        }
    }

    /// A plain component box placed at `(x, y)`.
    pub fn at(name: impl Into<String>, x: f32, y: f32) -> Self {
        let mut node = Self::new(name, NodeKind::Component);
        node.bounds.x = x;
        node.bounds.y = y;
        node
    }

    pub fn is_event_box(&self) -> bool {
        self.kind.is_event_box()
    }

    /// Whether anything renders between the opening and closing tag
    /// (children are checked by the caller, which owns them).
    pub fn has_body(&self) -> bool {
        !self.content.is_empty() || !self.events.is_empty()
    }
}

/// A node together with its owned subtree.
///
/// This is the portable form of a subtree: what [`NodeTree::remove`]
/// hands back, what duplication clones, and what persistence nests.
///
/// [`NodeTree::remove`]: crate::tree::NodeTree::remove
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub node: Node,
    #[serde(default)]
    pub children: Vec<Branch>,
}

impl Branch {
    pub fn leaf(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn with_children(node: Node, children: Vec<Branch>) -> Self {
        Self { node, children }
    }

    /// Number of nodes in this branch, including its root.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Branch::node_count).sum::<usize>()
    }

    /// Deep copy with fresh ids throughout, shifted by `(dx, dy)`.
    pub fn clone_fresh(&self, dx: f32, dy: f32) -> Branch {
        let mut node = self.node.clone();
        node.id = NodeId::fresh();
        node.bounds.x += dx;
        node.bounds.y += dy;
        Branch {
            node,
            children: self
                .children
                .iter()
                .map(|c| c.clone_fresh(dx, dy))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_contains_edges() {
        let b = Bounds::new(10.0, 10.0, 100.0, 50.0);
        assert!(b.contains(10.0, 10.0));
        assert!(b.contains(110.0, 60.0));
        assert!(!b.contains(111.0, 30.0));
    }

    #[test]
    fn corners_normalize() {
        let b = Bounds::from_corners(50.0, 80.0, 10.0, 20.0);
        assert_eq!(b, Bounds::new(10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn clone_fresh_changes_every_id() {
        let parent = Node::at("Parent", 0.0, 0.0);
        let child = Node::new("Child", NodeKind::Hook);
        let branch = Branch::with_children(parent.clone(), vec![Branch::leaf(child.clone())]);

        let copy = branch.clone_fresh(20.0, 20.0);
        assert_ne!(copy.node.id, parent.id);
        assert_ne!(copy.children[0].node.id, child.id);
        assert_eq!(copy.node.name, "Parent");
        assert_eq!(copy.node.bounds.x, 20.0);
        assert_eq!(copy.node_count(), 2);
    }

    #[test]
    fn event_handler_property() {
        let p = Property::event_handler("onClick");
        assert!(p.is_event_handler());
        assert!(!Property::new("title", Some("x".into())).is_event_handler());
    }
}
