//! Pseudo-markup rendering: Node → tag lines.
//!
//! Each box shows its subtree as JSX-like text:
//!
//! ```text
//! <Form
//!   onSubmit={() => {}}
//!   method="post"
//! >
//!   Fill in your details
//!   // events: onSubmit
//!   <Input />
//! </Form>
//! ```
//!
//! The layout engine sizes boxes from these lines; renderers draw them.

use crate::id::NodeId;
use crate::model::{EventDirection, Node, NodeKind, Property};
use crate::tree::NodeTree;
use std::fmt::Write;

/// What a rendered line is, so a renderer can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    OpenTag,
    Property,
    TagEnd,
    Content,
    Events,
    CloseTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupLine {
    /// Nesting depth relative to the rendered node.
    pub depth: usize,
    pub role: LineRole,
    pub text: String,
}

/// The tag name shown for a node.
pub fn tag_name(node: &Node) -> String {
    match node.kind {
        NodeKind::Component | NodeKind::Hook => node.name.clone(),
        NodeKind::Provider => format!("{}.Provider", node.name),
        NodeKind::EventBox(EventDirection::Inbound) => format!("in:{}", node.name),
        NodeKind::EventBox(EventDirection::Outbound) => format!("out:{}", node.name),
    }
}

/// A single attribute as written inside the opening tag.
pub fn property_line(property: &Property) -> String {
    match &property.value {
        None => property.name.clone(),
        Some(_) if property.is_event_handler() => {
            format!("{}={{{}}}", property.name, crate::model::EVENT_HANDLER_SENTINEL)
        }
        Some(value) => format!("{}=\"{}\"", property.name, value),
    }
}

/// Summary line for a node's event descriptors.
pub fn events_line(node: &Node) -> Option<String> {
    if node.events.is_empty() {
        return None;
    }
    let names: Vec<&str> = node.events.iter().map(|e| e.name.as_str()).collect();
    Some(format!("// events: {}", names.join(", ")))
}

/// Render `id` and its subtree. A collapsed top-level node renders only
/// its opening tag; nested nodes always render in full.
pub fn node_lines(tree: &NodeTree, id: NodeId) -> Vec<MarkupLine> {
    let mut out = Vec::new();
    let expanded = tree.get(id).is_some_and(|n| n.expanded) || !tree.is_top_level(id);
    push_node(tree, id, 0, expanded, &mut out);
    out
}

fn push_node(tree: &NodeTree, id: NodeId, depth: usize, expanded: bool, out: &mut Vec<MarkupLine>) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let tag = tag_name(node);
    let children = tree.children(id);
    let has_body = node.has_body() || !children.is_empty();
    let open_body = expanded && has_body;
    let tag_end = match (open_body, has_body) {
        (true, _) => ">",
        (false, true) => "/> …",
        (false, false) => "/>",
    };

    if node.properties.is_empty() {
        out.push(MarkupLine {
            depth,
            role: LineRole::OpenTag,
            text: if open_body {
                format!("<{tag}>")
            } else {
                format!("<{tag} {tag_end}")
            },
        });
    } else {
        out.push(MarkupLine {
            depth,
            role: LineRole::OpenTag,
            text: format!("<{tag}"),
        });
        for property in &node.properties {
            out.push(MarkupLine {
                depth: depth + 1,
                role: LineRole::Property,
                text: property_line(property),
            });
        }
        out.push(MarkupLine {
            depth,
            role: LineRole::TagEnd,
            text: tag_end.to_string(),
        });
    }

    if !open_body {
        return;
    }

    for line in node.content.lines() {
        out.push(MarkupLine {
            depth: depth + 1,
            role: LineRole::Content,
            text: line.to_string(),
        });
    }
    if let Some(text) = events_line(node) {
        out.push(MarkupLine {
            depth: depth + 1,
            role: LineRole::Events,
            text,
        });
    }
    for &child in children {
        push_node(tree, child, depth + 1, true, out);
    }
    out.push(MarkupLine {
        depth,
        role: LineRole::CloseTag,
        text: format!("</{tag}>"),
    });
}

/// Render a node's subtree as indented text.
#[must_use]
pub fn emit_markup(tree: &NodeTree, id: NodeId) -> String {
    let mut out = String::new();
    for line in node_lines(tree, id) {
        for _ in 0..line.depth {
            out.push_str("  ");
        }
        let _ = writeln!(out, "{}", line.text);
    }
    out
}

/// Render every top-level node, separated by blank lines.
#[must_use]
pub fn emit_document(tree: &NodeTree) -> String {
    tree.top_level()
        .iter()
        .map(|id| emit_markup(tree, *id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, EventDescriptor};
    use pretty_assertions::assert_eq;

    #[test]
    fn self_closing_leaf() {
        let mut tree = NodeTree::new();
        let id = tree.insert_top_level(Branch::leaf(Node::at("Logo", 0.0, 0.0))).unwrap();
        assert_eq!(emit_markup(&tree, id), "<Logo />\n");
    }

    #[test]
    fn properties_content_and_children() {
        let mut tree = NodeTree::new();
        let mut form = Node::at("Form", 0.0, 0.0);
        form.properties.push(Property::event_handler("onSubmit"));
        form.properties.push(Property::new("method", Some("post".into())));
        form.properties.push(Property::new("noValidate", None));
        form.content = "Fill in your details".into();
        form.events.push(EventDescriptor {
            name: "onSubmit".into(),
            description: "fires on send".into(),
        });
        let form = tree.insert_top_level(Branch::leaf(form)).unwrap();
        tree.insert_child(form, Branch::leaf(Node::at("Input", 0.0, 0.0)))
            .unwrap();

        let expected = "\
<Form
  onSubmit={() => {}}
  method=\"post\"
  noValidate
>
  Fill in your details
  // events: onSubmit
  <Input />
</Form>
";
        assert_eq!(emit_markup(&tree, form), expected);
    }

    #[test]
    fn collapsed_top_level_hides_body() {
        let mut tree = NodeTree::new();
        let app = tree.insert_top_level(Branch::leaf(Node::at("App", 0.0, 0.0))).unwrap();
        tree.insert_child(app, Branch::leaf(Node::at("Nav", 0.0, 0.0)))
            .unwrap();
        tree.toggle_expanded(app);
        assert_eq!(emit_markup(&tree, app), "<App /> …\n");
    }

    #[test]
    fn kind_specific_tags() {
        let provider = Node::new("Theme", NodeKind::Provider);
        let inbound = Node::new("click", NodeKind::EventBox(EventDirection::Inbound));
        assert_eq!(tag_name(&provider), "Theme.Provider");
        assert_eq!(tag_name(&inbound), "in:click");
    }
}
