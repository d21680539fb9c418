//! Configuration panel hooks.
//!
//! The side panel edits one box at a time. Every hook snapshots history
//! before the change and relayouts the box's branch after it; edits that
//! would not change anything (unknown node, bad index, same value) are
//! no-ops that return `false` and leave no undo step.
//!
//! Event descriptors are mirrored into the property list as
//! `name={() => {}}`, so adding, renaming, or removing an event keeps the
//! matching property in sync.

use crate::controller::Editor;
use tagbox_core::{EventDescriptor, Node, NodeId, NodeKind, Property};

impl Editor {
    /// Apply `edit` to a copy of the node; commit only if it reports
    /// success and actually changed something.
    fn edit_node(&mut self, id: NodeId, edit: impl FnOnce(&mut Node) -> bool) -> bool {
        let Some(original) = self.scene().tree.get(id) else {
            return false;
        };
        let mut edited = original.clone();
        if !edit(&mut edited) || edited == *original {
            return false;
        }
        self.record();
        if let Some(node) = self.scene_mut().tree.get_mut(id) {
            *node = edited;
        }
        log::debug!("panel edit {id}");
        self.commit_node(id);
        true
    }

    pub fn rename_node(&mut self, id: NodeId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.edit_node(id, |node| {
            node.name = name.to_string();
            true
        })
    }

    pub fn set_inner_content(&mut self, id: NodeId, content: &str) -> bool {
        self.edit_node(id, |node| {
            node.content = content.to_string();
            true
        })
    }

    pub fn set_notes(&mut self, id: NodeId, notes: &str) -> bool {
        self.edit_node(id, |node| {
            node.notes = notes.to_string();
            true
        })
    }

    /// Change what a box represents. A box can only become an event box
    /// while it is top-level and has no children.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> bool {
        if kind.is_event_box()
            && (!self.scene().tree.is_top_level(id) || !self.scene().tree.children(id).is_empty())
        {
            return false;
        }
        self.edit_node(id, |node| {
            node.kind = kind;
            true
        })
    }

    // ─── Properties ──────────────────────────────────────────────────────

    pub fn add_property(&mut self, id: NodeId, name: &str, value: Option<&str>) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.edit_node(id, |node| {
            node.properties
                .push(Property::new(name, value.map(str::to_string)));
            true
        })
    }

    pub fn update_property(
        &mut self,
        id: NodeId,
        index: usize,
        name: &str,
        value: Option<&str>,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.edit_node(id, |node| match node.properties.get_mut(index) {
            Some(p) => {
                p.name = name.to_string();
                p.value = value.map(str::to_string);
                true
            }
            None => false,
        })
    }

    pub fn remove_property(&mut self, id: NodeId, index: usize) -> bool {
        self.edit_node(id, |node| {
            if index >= node.properties.len() {
                return false;
            }
            node.properties.remove(index);
            true
        })
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn add_event(&mut self, id: NodeId, name: &str, description: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.edit_node(id, |node| {
            node.events.push(EventDescriptor {
                name: name.to_string(),
                description: description.to_string(),
            });
            if !node.properties.iter().any(|p| p.name == name) {
                node.properties.push(Property::event_handler(name));
            }
            true
        })
    }

    /// Edit an event. Renaming it renames the mirrored handler property.
    pub fn update_event(
        &mut self,
        id: NodeId,
        index: usize,
        name: &str,
        description: &str,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.edit_node(id, |node| {
            let Some(event) = node.events.get_mut(index) else {
                return false;
            };
            let old = std::mem::replace(&mut event.name, name.to_string());
            event.description = description.to_string();
            if old != name {
                match node
                    .properties
                    .iter_mut()
                    .find(|p| p.name == old && p.is_event_handler())
                {
                    Some(p) => p.name = name.to_string(),
                    None => node.properties.push(Property::event_handler(name)),
                }
            }
            true
        })
    }

    /// Remove an event and its mirrored handler property.
    pub fn remove_event(&mut self, id: NodeId, index: usize) -> bool {
        self.edit_node(id, |node| {
            if index >= node.events.len() {
                return false;
            }
            let event = node.events.remove(index);
            node.properties
                .retain(|p| !(p.name == event.name && p.is_event_handler()));
            true
        })
    }
}
