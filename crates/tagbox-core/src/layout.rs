//! Content-driven layout engine.
//!
//! Box sizes are never user input: every box is as wide as its label, its
//! widest attribute line, and (when expanded) its widest child plus a
//! margin; its height is the sum of the rendered rows. Nested children are
//! stacked top-down inside their parent, so their positions are derived too.
//!
//! Two entry points:
//! - [`relayout`] recomputes every top-level subtree (used on expand/collapse),
//! - [`relayout_branch`] recomputes only the subtree of a node's top-level
//!   ancestor (used after structural or content edits).

use crate::id::NodeId;
use crate::markup::{property_line, tag_name};
use crate::model::{FontSpec, Node};
use crate::tree::NodeTree;

/// Measures rendered text. Provided by the drawing surface.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> f32;
}

/// Fixed-advance measurement: every char is `ratio × font.size` wide.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub ratio: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { ratio: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * self.ratio
    }
}

/// Layout metrics, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub font: FontSpec,
    pub min_width: f32,
    /// Horizontal text padding on each side of a box.
    pub padding: f32,
    /// Opening tag row.
    pub header_height: f32,
    /// One attribute or content row.
    pub line_height: f32,
    /// A blank line inside the content block.
    pub empty_line_gap: f32,
    /// Row reserved for the event summary.
    pub event_block_height: f32,
    /// Closing tag row plus bottom padding.
    pub closing_padding: f32,
    /// Horizontal offset of nested boxes and nested text.
    pub indent: f32,
    /// Vertical gap after each nested box.
    pub child_gap: f32,
    /// Extra width a parent keeps around its widest child.
    pub child_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            min_width: 140.0,
            padding: 10.0,
            header_height: 28.0,
            line_height: 18.0,
            empty_line_gap: 8.0,
            event_block_height: 22.0,
            closing_padding: 24.0,
            indent: 16.0,
            child_gap: 8.0,
            child_margin: 32.0,
        }
    }
}

/// Layout configuration bundled with its text measurer.
pub struct LayoutEngine {
    pub config: LayoutConfig,
    measure: Box<dyn TextMeasure>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, measure: Box<dyn TextMeasure>) -> Self {
        Self { config, measure }
    }

    pub fn relayout(&self, tree: &mut NodeTree) {
        relayout(tree, self.measure.as_ref(), &self.config);
    }

    pub fn relayout_branch(&self, tree: &mut NodeTree, id: NodeId) {
        relayout_branch(tree, id, self.measure.as_ref(), &self.config);
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), Box::new(MonospaceMeasure::default()))
    }
}

/// Recompute every box, top-down over the whole top-level list.
pub fn relayout(tree: &mut NodeTree, measure: &dyn TextMeasure, config: &LayoutConfig) {
    let roots = tree.top_level().to_vec();
    for id in roots {
        layout_top_level(tree, id, measure, config);
    }
    log::debug!("relayout: {} nodes", tree.len());
}

/// Recompute the subtree of `id`'s top-level ancestor. Nothing outside that
/// subtree depends on it.
pub fn relayout_branch(
    tree: &mut NodeTree,
    id: NodeId,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) {
    if let Some(top) = tree.top_level_ancestor(id) {
        layout_top_level(tree, top, measure, config);
    }
}

fn layout_top_level(
    tree: &mut NodeTree,
    id: NodeId,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) {
    let expanded = tree.get(id).is_some_and(|n| n.expanded);
    size_node(tree, id, expanded, measure, config);
    place_children(tree, id, measure, config);
}

/// Post-order sizing. Children are always sized as expanded.
fn size_node(
    tree: &mut NodeTree,
    id: NodeId,
    expanded: bool,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) {
    let children = tree.children(id).to_vec();
    for child in children {
        size_node(tree, child, true, measure, config);
    }
    let width = measure_width(tree, id, expanded, measure, config);
    if let Some(node) = tree.get_mut(id) {
        node.bounds.width = width;
    }
    let height = update_height(tree, id, expanded, measure, config);
    if let Some(node) = tree.get_mut(id) {
        node.bounds.height = height;
    }
}

/// Pre-order placement of nested boxes below the parent's own rows.
fn place_children(
    tree: &mut NodeTree,
    id: NodeId,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let x = node.bounds.x + config.indent;
    let mut y = node.bounds.y
        + config.header_height
        + node.properties.len() as f32 * config.line_height
        + content_height(node, measure, config);
    if !node.events.is_empty() {
        y += config.event_block_height;
    }

    let children = tree.children(id).to_vec();
    for child in children {
        let Some(c) = tree.get_mut(child) else {
            continue;
        };
        c.bounds.x = x;
        c.bounds.y = y;
        y += c.bounds.height + config.child_gap;
        place_children(tree, child, measure, config);
    }
}

/// `max(min_width, label, widest attribute, widest child + margin)`.
/// Child widths must already be up to date.
pub fn measure_width(
    tree: &NodeTree,
    id: NodeId,
    expanded: bool,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) -> f32 {
    let Some(node) = tree.get(id) else {
        return config.min_width;
    };
    let font = &config.font;
    let label = measure.measure(&format!("<{}>", tag_name(node)), font) + 2.0 * config.padding;
    let widest_property = node
        .properties
        .iter()
        .map(|p| measure.measure(&property_line(p), font) + config.indent + 2.0 * config.padding)
        .fold(0.0f32, f32::max);
    let widest_child = if expanded {
        tree.children(id)
            .iter()
            .filter_map(|c| tree.get(*c))
            .map(|c| c.bounds.width + config.child_margin)
            .fold(0.0f32, f32::max)
    } else {
        0.0
    };
    config
        .min_width
        .max(label)
        .max(widest_property)
        .max(widest_child)
}

/// Height of a box from its rows. Uses the node's current width for
/// wrapping and its children's current heights.
pub fn update_height(
    tree: &NodeTree,
    id: NodeId,
    expanded: bool,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) -> f32 {
    let Some(node) = tree.get(id) else {
        return 0.0;
    };
    let children = tree.children(id);
    let mut height = config.header_height + node.properties.len() as f32 * config.line_height;

    // Collapsed or self-closing: header and attribute rows only.
    if !expanded || (!node.has_body() && children.is_empty()) {
        return height;
    }

    height += content_height(node, measure, config);
    if !node.events.is_empty() {
        height += config.event_block_height;
    }
    for child in children {
        if let Some(c) = tree.get(*child) {
            height += c.bounds.height + config.child_gap;
        }
    }
    height + config.closing_padding
}

/// Rows taken by the inner content: explicit lines, each word-wrapped.
fn content_height(node: &Node, measure: &dyn TextMeasure, config: &LayoutConfig) -> f32 {
    if node.content.is_empty() {
        return 0.0;
    }
    let available = node.bounds.width - 2.0 * config.padding - config.indent;
    node.content
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                config.empty_line_gap
            } else {
                wrap_line(line, available, measure, &config.font).len() as f32 * config.line_height
            }
        })
        .sum()
}

/// Greedy word wrap. A single word wider than `max_width` keeps its own row.
pub fn wrap_line(
    line: &str,
    max_width: f32,
    measure: &dyn TextMeasure,
    font: &FontSpec,
) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.measure(&candidate, font) <= max_width {
            current = candidate;
        } else {
            rows.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, EventDescriptor, Property};

    fn engine() -> LayoutEngine {
        LayoutEngine::default()
    }

    fn single(name: &str) -> (NodeTree, NodeId) {
        let mut tree = NodeTree::new();
        let id = tree.insert_top_level(Branch::leaf(Node::at(name, 10.0, 20.0))).unwrap();
        (tree, id)
    }

    #[test]
    fn empty_box_is_header_only() {
        let (mut tree, id) = single("A");
        let e = engine();
        e.relayout(&mut tree);
        let b = tree.get(id).unwrap().bounds;
        assert_eq!(b.width, e.config.min_width);
        assert_eq!(b.height, e.config.header_height);
    }

    #[test]
    fn long_label_widens_box() {
        let (mut tree, id) = single("AVeryLongComponentNameThatOverflows");
        let e = engine();
        e.relayout(&mut tree);
        let label = e.measure().measure("<AVeryLongComponentNameThatOverflows>", &e.config.font);
        assert!(tree.get(id).unwrap().bounds.width >= label);
    }

    #[test]
    fn property_adds_a_row() {
        let (mut tree, id) = single("A");
        let e = engine();
        e.relayout(&mut tree);
        let before = tree.get(id).unwrap().bounds.height;

        tree.get_mut(id)
            .unwrap()
            .properties
            .push(Property::new("title", Some("Hello".into())));
        e.relayout_branch(&mut tree, id);
        let after = tree.get(id).unwrap().bounds.height;
        assert_eq!(after - before, e.config.line_height);
    }

    #[test]
    fn child_grows_parent_and_is_placed_inside() {
        let (mut tree, parent) = single("Parent");
        let e = engine();
        e.relayout(&mut tree);
        let before = tree.get(parent).unwrap().bounds;

        let child = tree
            .insert_child(parent, Branch::leaf(Node::at("Child", 500.0, 500.0)))
            .unwrap();
        e.relayout_branch(&mut tree, child);
        let p = tree.get(parent).unwrap().bounds;
        let c = tree.get(child).unwrap().bounds;

        assert!(p.height > before.height);
        assert_eq!(c.x, p.x + e.config.indent);
        assert_eq!(c.y, p.y + e.config.header_height);
        assert!(c.x + c.width <= p.x + p.width);
        assert!(c.y + c.height <= p.y + p.height);
    }

    #[test]
    fn collapse_keeps_property_rows() {
        let (mut tree, parent) = single("Parent");
        tree.get_mut(parent)
            .unwrap()
            .properties
            .push(Property::new("id", None));
        tree.get_mut(parent).unwrap().content = "some text".into();
        tree.insert_child(parent, Branch::leaf(Node::at("Child", 0.0, 0.0)))
            .unwrap();
        let e = engine();
        e.relayout(&mut tree);
        let open = tree.get(parent).unwrap().bounds.height;

        tree.toggle_expanded(parent);
        e.relayout(&mut tree);
        let closed = tree.get(parent).unwrap().bounds.height;

        assert!(closed < open);
        assert_eq!(closed, e.config.header_height + e.config.line_height);
    }

    #[test]
    fn nested_children_ignore_their_own_collapse_flag() {
        let (mut tree, parent) = single("Parent");
        let child = tree.insert_child(parent, Branch::leaf(Node::at("Child", 0.0, 0.0))).unwrap();
        tree.insert_child(child, Branch::leaf(Node::at("Grandchild", 0.0, 0.0)))
            .unwrap();
        let e = engine();
        e.relayout(&mut tree);
        let open = tree.get(child).unwrap().bounds.height;

        tree.get_mut(child).unwrap().expanded = false;
        e.relayout(&mut tree);
        assert_eq!(tree.get(child).unwrap().bounds.height, open);
    }

    #[test]
    fn content_wraps_and_blank_lines_are_short() {
        let (mut tree, id) = single("Text");
        let e = engine();
        tree.get_mut(id).unwrap().content = "one\n\ntwo".into();
        e.relayout(&mut tree);
        let c = &e.config;
        let expected = c.header_height + 2.0 * c.line_height + c.empty_line_gap + c.closing_padding;
        assert_eq!(tree.get(id).unwrap().bounds.height, expected);

        let long = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor";
        tree.get_mut(id).unwrap().content = long.into();
        e.relayout(&mut tree);
        assert!(
            tree.get(id).unwrap().bounds.height
                > c.header_height + c.line_height + c.closing_padding
        );
    }

    #[test]
    fn events_add_a_fixed_block() {
        let (mut tree, id) = single("Button");
        let e = engine();
        tree.get_mut(id).unwrap().events.push(EventDescriptor {
            name: "onClick".into(),
            description: String::new(),
        });
        e.relayout(&mut tree);
        let c = &e.config;
        assert_eq!(
            tree.get(id).unwrap().bounds.height,
            c.header_height + c.event_block_height + c.closing_padding
        );
    }

    #[test]
    fn wrap_line_respects_width() {
        let m = MonospaceMeasure::default();
        let font = FontSpec::default();
        let rows = wrap_line("aaa bbb ccc", m.measure("aaa bbb", &font), &m, &font);
        assert_eq!(rows, vec!["aaa bbb".to_string(), "ccc".to_string()]);
        assert_eq!(wrap_line("", 10.0, &m, &font), vec![String::new()]);
    }
}
