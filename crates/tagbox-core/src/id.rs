//! Session identities for boxes and connections.
//!
//! Identity is never derived from content: two boxes with the same name,
//! kind, and properties are different boxes, and every created, loaded, or
//! duplicated box gets a fresh [`NodeId`]. Ids are not written to saved
//! scenes (connections are saved by structural reference instead), so
//! they only need to be unique within one process.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Backing store for [`NodeId`] labels.
static LABELS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

static NEXT_NODE: AtomicU64 = AtomicU64::new(0);
static NEXT_CONNECTION: AtomicU64 = AtomicU64::new(1);

fn next(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Identity of one box in the diagram.
///
/// A `Copy` handle to an interned label such as `node_7`. Hashing and
/// equality work on the handle, so ids are cheap map keys for the tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Spur);

impl NodeId {
    /// A new id no other box in this process has.
    pub fn fresh() -> Self {
        Self::intern(&format!("node_{}", next(&NEXT_NODE)))
    }

    /// The id labelled `label`. The same label always yields the same id.
    pub fn intern(label: &str) -> Self {
        NodeId(LABELS.get_or_intern(label))
    }

    pub fn as_str(&self) -> &str {
        LABELS.resolve(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

// Serialized nodes and connections carry ids as their labels.
impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&label))
    }
}

/// Identity of one connection, handed out in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        ConnectionId(next(&NEXT_CONNECTION))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_label_same_id() {
        let a = NodeId::intern("header_box");
        assert_eq!(a, NodeId::intern("header_box"));
        assert_eq!(a.to_string(), "#header_box");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn connection_ids_increase() {
        let a = ConnectionId::next();
        let b = ConnectionId::next();
        assert!(b > a);
    }
}
