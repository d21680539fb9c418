//! Persisted scene format.
//!
//! Nodes are stored nested, without ids. Connections cannot point at ids
//! either, so each end is stored as a [`NodeRef`] (name, kind, position)
//! and matched back against the freshly loaded nodes. Loading is
//! best-effort: missing fields take defaults, connections whose refs match
//! zero or several nodes are dropped, and an unparsable payload yields an
//! empty scene.
//!
//! Two encodings share the same document:
//! - JSON (`to_json` / `from_json`) for files and local storage
//! - compact (`to_compact` / `from_compact`): MessagePack + URL-safe
//!   base64, small enough to embed in a link

use crate::id::NodeId;
use crate::model::{Branch, EventDescriptor, Node, NodeKind, Property};
use crate::scene::Scene;
use crate::tree::NodeTree;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: u32 = 1;

/// Max distance between a stored ref position and a loaded node for the
/// two to be considered the same box.
const POSITION_TOLERANCE: f32 = 0.5;

// ─── Records ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDocument {
    pub version: u32,
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    pub name: String,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    pub expanded: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventDescriptor>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: NodeKind::Component,
            x: 0.0,
            y: 0.0,
            expanded: true,
            properties: Vec::new(),
            events: Vec::new(),
            content: String::new(),
            notes: String::new(),
            children: Vec::new(),
        }
    }
}

/// Structural reference to a node: enough to find it again after load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRef {
    pub name: String,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
}

impl NodeRef {
    fn of(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            kind: node.kind,
            x: node.bounds.x,
            y: node.bounds.y,
        }
    }

    fn matches(&self, node: &Node) -> bool {
        self.name == node.name
            && self.kind == node.kind
            && (self.x - node.bounds.x).abs() <= POSITION_TOLERANCE
            && (self.y - node.bounds.y).abs() <= POSITION_TOLERANCE
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionRecord {
    pub from: NodeRef,
    pub to: NodeRef,
}

// ─── Scene ⇄ document ────────────────────────────────────────────────────

pub fn to_document(scene: &Scene) -> SceneDocument {
    let tree = &scene.tree;
    let nodes = tree
        .top_level()
        .iter()
        .filter_map(|id| record_of(tree, *id))
        .collect();
    let connections = scene
        .connections
        .iter()
        .filter_map(|c| {
            Some(ConnectionRecord {
                from: NodeRef::of(tree.get(c.from)?),
                to: NodeRef::of(tree.get(c.to)?),
            })
        })
        .collect();
    SceneDocument {
        version: FORMAT_VERSION,
        nodes,
        connections,
    }
}

fn record_of(tree: &NodeTree, id: NodeId) -> Option<NodeRecord> {
    let node = tree.get(id)?;
    Some(NodeRecord {
        name: node.name.clone(),
        kind: node.kind,
        x: node.bounds.x,
        y: node.bounds.y,
        expanded: node.expanded,
        properties: node.properties.clone(),
        events: node.events.clone(),
        content: node.content.clone(),
        notes: node.notes.clone(),
        children: tree
            .children(id)
            .iter()
            .filter_map(|c| record_of(tree, *c))
            .collect(),
    })
}

/// Rebuild a record's subtree. Event boxes cannot nest or hold children,
/// so offending records are moved to `hoisted` (top level) instead of
/// taking the rest of the subtree down with them.
fn branch_of(record: NodeRecord, nested: bool, hoisted: &mut Vec<Branch>) -> Option<Branch> {
    let mut node = Node::at(record.name, record.x, record.y);
    node.kind = record.kind;
    node.expanded = record.expanded;
    node.properties = record.properties;
    node.events = record.events;
    node.content = record.content;
    node.notes = record.notes;

    let mut children = Vec::new();
    for child in record.children {
        if node.is_event_box() {
            log::warn!(
                "event box `{}` cannot hold `{}`; moving it to the top level",
                node.name,
                child.name
            );
            if let Some(branch) = branch_of(child, false, hoisted) {
                hoisted.push(branch);
            }
        } else if let Some(branch) = branch_of(child, true, hoisted) {
            children.push(branch);
        }
    }

    let branch = Branch::with_children(node, children);
    if nested && branch.node.is_event_box() {
        log::warn!(
            "event box `{}` cannot be nested; moving it to the top level",
            branch.node.name
        );
        hoisted.push(branch);
        return None;
    }
    Some(branch)
}

/// Rebuild a scene. Positions are restored as stored; sizes are zero until
/// the caller runs layout.
pub fn from_document(doc: SceneDocument) -> Scene {
    if doc.version > FORMAT_VERSION {
        log::warn!(
            "scene format version {} is newer than {FORMAT_VERSION}; loading what is understood",
            doc.version
        );
    }
    let mut hoisted = Vec::new();
    let mut branches: Vec<Branch> = doc
        .nodes
        .into_iter()
        .filter_map(|record| branch_of(record, false, &mut hoisted))
        .collect();
    branches.extend(hoisted);
    let mut scene = Scene::from_tree(NodeTree::from_branches(branches));

    let all = scene.tree.walk();
    for record in doc.connections {
        let (Some(from), Some(to)) = (
            resolve(&scene.tree, &all, &record.from),
            resolve(&scene.tree, &all, &record.to),
        ) else {
            continue;
        };
        if scene.connect(from, to).is_none() {
            log::warn!("dropping connection {from} -> {to}: duplicate or self-loop");
        }
    }
    scene
}

/// The single node matching `r`, or `None` (with a warning) when zero or
/// several match.
fn resolve(tree: &NodeTree, all: &[NodeId], r: &NodeRef) -> Option<NodeId> {
    let mut found = all
        .iter()
        .copied()
        .filter(|id| tree.get(*id).is_some_and(|n| r.matches(n)));
    match (found.next(), found.next()) {
        (Some(id), None) => Some(id),
        (None, _) => {
            log::warn!("dropping connection: no node `{}` at ({}, {})", r.name, r.x, r.y);
            None
        }
        (Some(_), Some(_)) => {
            log::warn!("dropping connection: `{}` at ({}, {}) is ambiguous", r.name, r.x, r.y);
            None
        }
    }
}

// ─── Encodings ───────────────────────────────────────────────────────────

pub fn to_json(scene: &Scene) -> Result<String, String> {
    serde_json::to_string_pretty(&to_document(scene)).map_err(|e| format!("encode scene: {e}"))
}

pub fn parse_json(input: &str) -> Result<SceneDocument, String> {
    serde_json::from_str(input).map_err(|e| format!("parse scene: {e}"))
}

/// Load a JSON payload, falling back to an empty scene when it cannot be
/// parsed at all.
pub fn from_json(input: &str) -> Scene {
    match parse_json(input) {
        Ok(doc) => from_document(doc),
        Err(e) => {
            log::warn!("{e}; starting with an empty scene");
            Scene::new()
        }
    }
}

/// Compact shareable form: MessagePack, then URL-safe base64 without
/// padding.
pub fn to_compact(scene: &Scene) -> Result<String, String> {
    let bytes = rmp_serde::to_vec_named(&to_document(scene))
        .map_err(|e| format!("encode compact scene: {e}"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

pub fn from_compact(input: &str) -> Result<Scene, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(input.trim())
        .map_err(|e| format!("decode compact scene: {e}"))?;
    let doc: SceneDocument =
        rmp_serde::from_slice(&bytes).map_err(|e| format!("parse compact scene: {e}"))?;
    Ok(from_document(doc))
}
