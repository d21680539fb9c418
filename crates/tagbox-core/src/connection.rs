//! Directed connections between boxes, independent of containment.
//!
//! Endpoints sit on the box boundaries along the line between centers;
//! the visible path between them is routed orthogonally.

use crate::geometry::{Point, near_polyline};
use crate::id::{ConnectionId, NodeId};
use crate::model::Bounds;
use crate::tree::NodeTree;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// Below this on both axes the endpoints are treated as coincident.
pub const ROUTE_EPSILON: f32 = 1.0;

/// Both deltas at least this large get a clean elbow at the midpoint.
pub const MIN_ELBOW_DELTA: f32 = 20.0;

/// Side-step used when one delta is too small for a clean elbow.
pub const DETOUR_OFFSET: f32 = 24.0;

/// Routed path: at most four points.
pub type Route = SmallVec<[Point; 4]>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    /// Boundary points, refreshed on every commit since boxes move.
    pub from_point: Point,
    pub to_point: Point,
}

impl Connection {
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// Whether this connects `a` and `b` in either direction.
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn route(&self) -> Route {
        route(self.from_point, self.to_point)
    }
}

/// All connections, in creation order.
#[derive(Debug, Clone, Default)]
pub struct Connections {
    items: Vec<Connection>,
}

impl Connections {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.items.iter()
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.items.iter().find(|c| c.id == id)
    }

    /// The connection between `a` and `b`, in either direction.
    pub fn between(&self, a: NodeId, b: NodeId) -> Option<&Connection> {
        self.items.iter().find(|c| c.joins(a, b))
    }

    /// Connect `from` → `to`. No-op for self-loops, unknown nodes, or when
    /// the pair is already connected in either direction.
    pub fn create(&mut self, tree: &NodeTree, from: NodeId, to: NodeId) -> Option<ConnectionId> {
        if from == to || self.between(from, to).is_some() {
            return None;
        }
        let from_bounds = tree.get(from)?.bounds;
        let to_bounds = tree.get(to)?.bounds;
        let id = ConnectionId::next();
        self.items.push(Connection {
            id,
            from,
            to,
            from_point: compute_edge_point(&from_bounds, &to_bounds),
            to_point: compute_edge_point(&to_bounds, &from_bounds),
        });
        log::debug!("connect {from} -> {to} ({id})");
        Some(id)
    }

    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection> {
        let pos = self.items.iter().position(|c| c.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Drop every connection with an endpoint in `nodes`. Returns the
    /// removed ids.
    pub fn remove_touching(&mut self, nodes: &[NodeId]) -> Vec<ConnectionId> {
        let mut removed = Vec::new();
        self.items.retain(|c| {
            let hit = nodes.iter().any(|n| c.touches(*n));
            if hit {
                removed.push(c.id);
            }
            !hit
        });
        removed
    }

    /// Recompute cached endpoints from current box positions.
    pub fn refresh_endpoints(&mut self, tree: &NodeTree) {
        for c in &mut self.items {
            if let (Some(from), Some(to)) = (tree.get(c.from), tree.get(c.to)) {
                c.from_point = compute_edge_point(&from.bounds, &to.bounds);
                c.to_point = compute_edge_point(&to.bounds, &from.bounds);
            }
        }
    }

    /// First connection (creation order) whose routed path passes within
    /// `tolerance` of `(x, y)`. Routes are derived from live box positions.
    pub fn hit_test(
        &self,
        tree: &NodeTree,
        x: f32,
        y: f32,
        tolerance: f32,
    ) -> Option<ConnectionId> {
        self.hit_test_by(tree, x, y, tolerance, |_| true)
    }

    /// [`hit_test`](Self::hit_test) restricted to connections accepted by
    /// `include`.
    pub fn hit_test_by(
        &self,
        tree: &NodeTree,
        x: f32,
        y: f32,
        tolerance: f32,
        include: impl Fn(&Connection) -> bool,
    ) -> Option<ConnectionId> {
        let p = Point::new(x, y);
        self.items
            .iter()
            .filter(|&c| include(c))
            .find(|c| {
                let (Some(from), Some(to)) = (tree.get(c.from), tree.get(c.to)) else {
                    return false;
                };
                let start = compute_edge_point(&from.bounds, &to.bounds);
                let end = compute_edge_point(&to.bounds, &from.bounds);
                near_polyline(p, &route(start, end), tolerance)
            })
            .map(|c| c.id)
    }

    /// The node owning an event box: the `from` end of the first
    /// connection arriving at it.
    pub fn owner_of(&self, tree: &NodeTree, event_box: NodeId) -> Option<NodeId> {
        if !tree.get(event_box)?.is_event_box() {
            return None;
        }
        self.items
            .iter()
            .find(|c| c.to == event_box)
            .map(|c| c.from)
    }
}

/// Point on `from`'s boundary where the line toward `to`'s center exits.
///
/// The exit edge is chosen by comparing the center-to-center angle with the
/// box's corner angle. Coincident centers fall back to the right edge.
pub fn compute_edge_point(from: &Bounds, to: &Bounds) -> Point {
    let (cx, cy) = from.center();
    let (tx, ty) = to.center();
    let hw = from.width / 2.0;
    let hh = from.height / 2.0;
    let dx = tx - cx;
    let dy = ty - cy;

    if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
        return Point::new(cx + hw, cy);
    }

    let angle = dy.atan2(dx);
    let corner = hh.atan2(hw);
    let pi = std::f32::consts::PI;

    if angle.abs() <= corner {
        // right
        Point::new(cx + hw, cy + hw * dy / dx)
    } else if angle.abs() >= pi - corner {
        // left
        Point::new(cx - hw, cy - hw * dy / dx)
    } else if angle > 0.0 {
        // bottom (y grows downward)
        Point::new(cx + hh * dx / dy, cy + hh)
    } else {
        // top
        Point::new(cx - hh * dx / dy, cy - hh)
    }
}

/// Orthogonal path from `start` to `end`.
///
/// - Already axis-aligned (or both deltas tiny): straight two-point line.
/// - Both deltas at least [`MIN_ELBOW_DELTA`]: elbow halfway along the
///   longer axis.
/// - Otherwise: side-step by [`DETOUR_OFFSET`] across the small delta so no
///   segment degenerates.
pub fn route(start: Point, end: Point) -> Route {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let (adx, ady) = (dx.abs(), dy.abs());

    if adx < ROUTE_EPSILON || ady < ROUTE_EPSILON {
        return smallvec![start, end];
    }

    if adx >= MIN_ELBOW_DELTA && ady >= MIN_ELBOW_DELTA {
        return if adx >= ady {
            let mid = start.x + dx / 2.0;
            smallvec![start, Point::new(mid, start.y), Point::new(mid, end.y), end]
        } else {
            let mid = start.y + dy / 2.0;
            smallvec![start, Point::new(start.x, mid), Point::new(end.x, mid), end]
        };
    }

    if ady < MIN_ELBOW_DELTA {
        // Mostly horizontal: go over both endpoints.
        let over = start.y.min(end.y) - DETOUR_OFFSET;
        smallvec![start, Point::new(start.x, over), Point::new(end.x, over), end]
    } else {
        // Mostly vertical: go around to the right.
        let side = start.x.max(end.x) + DETOUR_OFFSET;
        smallvec![start, Point::new(side, start.y), Point::new(side, end.y), end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, EventDirection, Node, NodeKind};

    fn sized(name: &str, x: f32, y: f32) -> Branch {
        let mut node = Node::at(name, x, y);
        node.bounds.width = 100.0;
        node.bounds.height = 40.0;
        Branch::leaf(node)
    }

    fn is_orthogonal(route: &[Point]) -> bool {
        route
            .windows(2)
            .all(|s| (s[0].x - s[1].x).abs() < 1e-3 || (s[0].y - s[1].y).abs() < 1e-3)
    }

    #[test]
    fn edge_point_right_and_bottom() {
        let a = Bounds::new(0.0, 0.0, 100.0, 40.0);
        let right = Bounds::new(300.0, 0.0, 100.0, 40.0);
        let below = Bounds::new(0.0, 200.0, 100.0, 40.0);

        assert_eq!(compute_edge_point(&a, &right), Point::new(100.0, 20.0));
        assert_eq!(compute_edge_point(&a, &below), Point::new(50.0, 40.0));
        assert_eq!(compute_edge_point(&right, &a), Point::new(300.0, 20.0));
        assert_eq!(compute_edge_point(&below, &a), Point::new(50.0, 200.0));
    }

    #[test]
    fn edge_point_coincident_centers() {
        let a = Bounds::new(0.0, 0.0, 100.0, 40.0);
        assert_eq!(compute_edge_point(&a, &a), Point::new(100.0, 20.0));
    }

    #[test]
    fn route_shapes() {
        let straight = route(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        assert_eq!(straight.len(), 2);

        let tiny = route(Point::new(0.0, 0.0), Point::new(0.5, 0.5));
        assert_eq!(tiny.len(), 2);

        let elbow = route(Point::new(0.0, 0.0), Point::new(200.0, 100.0));
        assert_eq!(elbow.len(), 4);
        assert_eq!(elbow[1], Point::new(100.0, 0.0));
        assert!(is_orthogonal(&elbow));

        let detour = route(Point::new(0.0, 0.0), Point::new(200.0, 5.0));
        assert_eq!(detour.len(), 4);
        assert_eq!(detour[1].y, -DETOUR_OFFSET);
        assert!(is_orthogonal(&detour));
    }

    #[test]
    fn create_is_direction_agnostic() {
        let mut tree = NodeTree::new();
        let a = tree.insert_top_level(sized("A", 0.0, 0.0)).unwrap();
        let b = tree.insert_top_level(sized("B", 300.0, 0.0)).unwrap();
        let mut conns = Connections::new();

        assert!(conns.create(&tree, a, b).is_some());
        assert!(conns.create(&tree, b, a).is_none());
        assert!(conns.create(&tree, a, b).is_none());
        assert!(conns.create(&tree, a, a).is_none());
        assert_eq!(conns.len(), 1);
    }

    #[test]
    fn hit_test_finds_midpoint() {
        let mut tree = NodeTree::new();
        let a = tree.insert_top_level(sized("A", 0.0, 0.0)).unwrap();
        let b = tree.insert_top_level(sized("B", 300.0, 0.0)).unwrap();
        let mut conns = Connections::new();
        let id = conns.create(&tree, a, b).unwrap();

        assert_eq!(conns.hit_test(&tree, 200.0, 21.0, 6.0), Some(id));
        assert_eq!(conns.hit_test(&tree, 200.0, 60.0, 6.0), None);
    }

    #[test]
    fn remove_touching_cascades() {
        let mut tree = NodeTree::new();
        let a = tree.insert_top_level(sized("A", 0.0, 0.0)).unwrap();
        let b = tree.insert_top_level(sized("B", 300.0, 0.0)).unwrap();
        let c = tree.insert_top_level(sized("C", 0.0, 300.0)).unwrap();
        let mut conns = Connections::new();
        conns.create(&tree, a, b).unwrap();
        conns.create(&tree, c, a).unwrap();
        let keep = conns.create(&tree, b, c).unwrap();

        let removed = conns.remove_touching(&[a]);
        assert_eq!(removed.len(), 2);
        assert_eq!(conns.len(), 1);
        assert!(conns.get(keep).is_some());
    }

    #[test]
    fn owner_of_event_box() {
        let mut tree = NodeTree::new();
        let a = tree.insert_top_level(sized("A", 0.0, 0.0)).unwrap();
        let mut ev = Node::new("onSave", NodeKind::EventBox(EventDirection::Outbound));
        ev.bounds = Bounds::new(200.0, 0.0, 80.0, 30.0);
        let ev = tree.insert_top_level(Branch::leaf(ev)).unwrap();
        let mut conns = Connections::new();
        conns.create(&tree, a, ev).unwrap();

        assert_eq!(conns.owner_of(&tree, ev), Some(a));
        assert_eq!(conns.owner_of(&tree, a), None);
    }
}
