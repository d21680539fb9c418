pub mod connection;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod layout;
pub mod markup;
pub mod model;
pub mod persist;
pub mod scene;
pub mod tree;

pub use connection::{Connection, Connections, compute_edge_point, route};
pub use geometry::Point;
pub use hit::{find_at_point, find_drop_target, nodes_in_rect};
pub use id::{ConnectionId, NodeId};
pub use layout::{LayoutConfig, LayoutEngine, MonospaceMeasure, TextMeasure};
pub use markup::{emit_document, emit_markup};
pub use model::*;
pub use scene::Scene;
pub use tree::{NodeTree, ParentLookup, Placement};
