//! The node tree: an ordered forest of boxes.
//!
//! Nodes live in a `StableDiGraph` with parent → child containment edges,
//! so parent lookup is a single incoming-edge walk. Sibling order is kept
//! explicitly (`top_level` and `child_order`) because edge iteration order
//! is not something we want to depend on.
//!
//! Every structural operation keeps the tree invariants:
//! - each node is in exactly one list (top-level XOR one parent's children),
//! - no node is its own descendant,
//! - event boxes never have children and are never nested.
//!
//! Invalid requests are rejected as no-ops (`None` / `false`).

use crate::id::NodeId;
use crate::model::{Branch, Node};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::{HashMap, HashSet};

/// Result of [`NodeTree::find_parent_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLookup {
    /// The node is not in the tree.
    NotFound,
    /// The node is in the top-level list.
    TopLevel,
    /// The node is a child of the given parent.
    Nested(NodeId),
}

/// Where a branch is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    TopLevel,
    ChildOf(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    graph: StableDiGraph<Node, ()>,
    id_index: HashMap<NodeId, NodeIndex>,
    top_level: Vec<NodeId>,
    child_order: HashMap<NodeId, Vec<NodeId>>,
}

impl NodeTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from nested branches. Branches that would break the
    /// tree invariants are skipped with a warning.
    pub fn from_branches(branches: Vec<Branch>) -> Self {
        let mut tree = Self::new();
        for branch in branches {
            let name = branch.node.name.clone();
            if tree.insert_top_level(branch).is_none() {
                log::warn!("skipping invalid top-level branch `{name}`");
            }
        }
        tree
    }

    /// Deep copy of the whole forest in top-level order.
    pub fn to_branches(&self) -> Vec<Branch> {
        self.top_level
            .iter()
            .filter_map(|id| self.branch(*id))
            .collect()
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    /// Total number of nodes, nested ones included.
    pub fn len(&self) -> usize {
        self.id_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_index.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Mutable access to a node's fields. Callers must not change `id`.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    /// Children of `id` in order. Empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.child_order.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.id_index.get(&id)?;
        self.graph
            .neighbors_directed(*idx, Direction::Incoming)
            .next()
            .map(|p| self.graph[p].id)
    }

    /// Distinguishes "not in the tree" from "in the top-level list".
    pub fn find_parent_of(&self, id: NodeId) -> ParentLookup {
        if !self.contains(id) {
            return ParentLookup::NotFound;
        }
        match self.parent(id) {
            Some(parent) => ParentLookup::Nested(parent),
            None => ParentLookup::TopLevel,
        }
    }

    /// The list that currently holds `id`.
    pub fn containing_list(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.find_parent_of(id) {
            ParentLookup::NotFound => None,
            ParentLookup::TopLevel => Some(&self.top_level),
            ParentLookup::Nested(parent) => Some(self.children(parent)),
        }
    }

    pub fn is_top_level(&self, id: NodeId) -> bool {
        self.find_parent_of(id) == ParentLookup::TopLevel
    }

    /// Parent, grandparent, ... up to the top-level ancestor.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            out.push(parent);
            current = parent;
        }
        out
    }

    /// The top-level node whose subtree contains `id` (itself if top-level).
    pub fn top_level_ancestor(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        Some(self.ancestors(id).last().copied().unwrap_or(id))
    }

    /// Whether `candidate` sits anywhere below `ancestor`. A node is not
    /// its own descendant.
    pub fn is_descendant_of(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        if candidate == ancestor {
            return false;
        }
        let mut current = candidate;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Pre-order walk of the whole forest, in render order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        for &id in &self.top_level {
            self.collect_preorder(id, &mut out);
        }
        out
    }

    /// Pre-order walk of everything below `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &child in self.children(id) {
            self.collect_preorder(child, &mut out);
        }
        out
    }

    fn collect_preorder(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in self.children(id) {
            self.collect_preorder(child, out);
        }
    }

    /// Owned deep copy of the subtree rooted at `id`.
    pub fn branch(&self, id: NodeId) -> Option<Branch> {
        let node = self.get(id)?.clone();
        let children = self
            .children(id)
            .iter()
            .filter_map(|child| self.branch(*child))
            .collect();
        Some(Branch::with_children(node, children))
    }

    // ─── Structural mutation ─────────────────────────────────────────────

    /// Append a branch to the top-level list.
    pub fn insert_top_level(&mut self, branch: Branch) -> Option<NodeId> {
        self.insert(Placement::TopLevel, branch)
    }

    /// Append a branch to `parent`'s children.
    pub fn insert_child(&mut self, parent: NodeId, branch: Branch) -> Option<NodeId> {
        self.insert(Placement::ChildOf(parent), branch)
    }

    /// Append a branch at `placement`. No-op if any id in the branch is
    /// already present, the parent is missing or an event box, or the
    /// branch would nest an event box.
    pub fn insert(&mut self, placement: Placement, branch: Branch) -> Option<NodeId> {
        if !self.can_insert(placement, &branch) {
            return None;
        }
        Some(self.attach(placement, branch))
    }

    fn can_insert(&self, placement: Placement, branch: &Branch) -> bool {
        if let Placement::ChildOf(parent) = placement {
            match self.get(parent) {
                Some(p) if !p.is_event_box() => {}
                _ => return false,
            }
            if branch.node.is_event_box() {
                return false;
            }
        }
        let mut seen = HashSet::new();
        branch_is_valid(branch, &mut seen) && seen.iter().all(|id| !self.contains(*id))
    }

    fn attach(&mut self, placement: Placement, branch: Branch) -> NodeId {
        self.attach_at(placement, branch, None)
    }

    /// Attach at `index` in the target list, or at the end.
    fn attach_at(&mut self, placement: Placement, branch: Branch, index: Option<usize>) -> NodeId {
        let Branch { node, children } = branch;
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        match placement {
            Placement::TopLevel => insert_at(&mut self.top_level, id, index),
            Placement::ChildOf(parent) => {
                let parent_idx = self.id_index[&parent];
                self.graph.add_edge(parent_idx, idx, ());
                insert_at(self.child_order.entry(parent).or_default(), id, index);
            }
        }
        for child in children {
            self.attach(Placement::ChildOf(id), child);
        }
        id
    }

    /// Detach `id` and its whole subtree from the tree, handing it back.
    /// Returns `None` when the node is not present.
    pub fn remove(&mut self, id: NodeId) -> Option<Branch> {
        match self.find_parent_of(id) {
            ParentLookup::NotFound => return None,
            ParentLookup::TopLevel => self.top_level.retain(|n| *n != id),
            ParentLookup::Nested(parent) => {
                if let Some(list) = self.child_order.get_mut(&parent) {
                    list.retain(|n| *n != id);
                    if list.is_empty() {
                        self.child_order.remove(&parent);
                    }
                }
            }
        }
        self.extract(id)
    }

    fn extract(&mut self, id: NodeId) -> Option<Branch> {
        let children_ids = self.child_order.remove(&id).unwrap_or_default();
        let children = children_ids
            .into_iter()
            .filter_map(|child| self.extract(child))
            .collect();
        let idx = self.id_index.remove(&id)?;
        let node = self.graph.remove_node(idx)?;
        Some(Branch::with_children(node, children))
    }

    /// Move `id` (with its subtree) to `placement`, as one atomic
    /// remove-then-append. Rejected when it would create a cycle, nest an
    /// event box, drop into an event box, or when `id` is already top-level
    /// and `placement` is top-level.
    pub fn reparent(&mut self, id: NodeId, placement: Placement) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        match placement {
            Placement::TopLevel => {
                if self.is_top_level(id) {
                    return false;
                }
            }
            Placement::ChildOf(target) => {
                if node.is_event_box() || target == id || self.is_descendant_of(target, id) {
                    return false;
                }
                match self.get(target) {
                    Some(t) if !t.is_event_box() => {}
                    _ => return false,
                }
            }
        }
        let Some(branch) = self.remove(id) else {
            return false;
        };
        self.attach(placement, branch);
        true
    }

    /// Deep-clone `id`'s subtree with fresh ids, shifted by `(dx, dy)`,
    /// and insert it directly after the original in the same list.
    pub fn duplicate(&mut self, id: NodeId, dx: f32, dy: f32) -> Option<NodeId> {
        let placement = match self.find_parent_of(id) {
            ParentLookup::NotFound => return None,
            ParentLookup::TopLevel => Placement::TopLevel,
            ParentLookup::Nested(parent) => Placement::ChildOf(parent),
        };
        let position = self.containing_list(id)?.iter().position(|n| *n == id)?;
        let copy = self.branch(id)?.clone_fresh(dx, dy);
        if !self.can_insert(placement, &copy) {
            return None;
        }
        Some(self.attach_at(placement, copy, Some(position + 1)))
    }

    /// Rigidly move `id` and everything below it.
    pub fn translate_branch(&mut self, id: NodeId, dx: f32, dy: f32) {
        let mut ids = vec![id];
        ids.extend(self.descendants(id));
        for n in ids {
            if let Some(node) = self.get_mut(n) {
                node.bounds.x += dx;
                node.bounds.y += dy;
            }
        }
    }

    /// Flip the collapse state of a top-level node. Nested nodes always
    /// render expanded, so this is a no-op for them.
    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        if !self.is_top_level(id) {
            return false;
        }
        match self.get_mut(id) {
            Some(node) => {
                node.expanded = !node.expanded;
                true
            }
            None => false,
        }
    }

    /// Whether `id` is the child of a collapsed top-level node (directly or
    /// deeper), i.e. not drawn at all.
    pub fn is_collapsed_away(&self, id: NodeId) -> bool {
        self.ancestors(id)
            .iter()
            .any(|a| self.get(*a).is_some_and(|n| !n.expanded) && self.is_top_level(*a))
    }

    /// Check that every node is reachable from exactly one list and that
    /// the index and graph agree.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: HashMap<NodeId, usize> = HashMap::new();
        for id in self.walk() {
            *seen.entry(id).or_default() += 1;
        }
        for (id, count) in &seen {
            if *count != 1 {
                return Err(format!("{id} appears {count} times"));
            }
        }
        if seen.len() != self.id_index.len() || self.graph.node_count() != self.id_index.len() {
            return Err(format!(
                "{} reachable nodes, {} indexed, {} stored",
                seen.len(),
                self.id_index.len(),
                self.graph.node_count()
            ));
        }
        for (parent, children) in &self.child_order {
            if self.get(*parent).is_some_and(Node::is_event_box) {
                return Err(format!("event box {parent} has children"));
            }
            for child in children {
                if self.parent(*child) != Some(*parent) {
                    return Err(format!("{child} is listed under {parent} without an edge"));
                }
                if self.get(*child).is_some_and(Node::is_event_box) {
                    return Err(format!("event box {child} is nested"));
                }
            }
        }
        Ok(())
    }
}

fn insert_at(list: &mut Vec<NodeId>, id: NodeId, index: Option<usize>) {
    match index {
        Some(i) if i <= list.len() => list.insert(i, id),
        _ => list.push(id),
    }
}

/// Collects ids and rejects duplicate ids or event boxes with children.
fn branch_is_valid(branch: &Branch, seen: &mut HashSet<NodeId>) -> bool {
    if !seen.insert(branch.node.id) {
        return false;
    }
    if branch.node.is_event_box() && !branch.children.is_empty() {
        return false;
    }
    branch
        .children
        .iter()
        .all(|c| !c.node.is_event_box() && branch_is_valid(c, seen))
}
