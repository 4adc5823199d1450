//! Serializer for detached trees.
//!
//! Reconstructs markup text from the arena:
//!
//! - Text data is written as stored (it is kept escaped)
//! - Attribute values are escaped and double-quoted
//! - Valueless boolean attributes are written as just the name
//! - Childless void elements self-close with ` />`
//! - Nodes with `render == false` produce nothing

use indextree::NodeId;
use std::fmt::Write;

use crate::escape::escape_into;
use crate::node::NodeKind;
use crate::tree::DetachedTree;
use crate::vocabulary::Vocabulary;

/// Options for serialization.
#[derive(Clone, Debug, Default)]
pub struct SerializeOptions {
    /// Whether to sort attributes by name (default: false, map order).
    /// Enable this for deterministic output in snapshots.
    pub sort_attributes: bool,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable sorting attributes alphabetically.
    pub fn sort_attributes(mut self) -> Self {
        self.sort_attributes = true;
        self
    }
}

/// Serialize a node including its own framing.
pub fn outer_html(tree: &DetachedTree, node: NodeId, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, tree, opts);
    ser.write_node(node);
    out
}

/// Serialize only the children of a node.
pub fn inner_html(tree: &DetachedTree, node: NodeId, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, tree, opts);
    ser.write_children(node);
    out
}

/// Concatenate the outer markup of top-level nodes.
pub fn render_nodes(tree: &DetachedTree, nodes: &[NodeId], opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, tree, opts);
    for &node in nodes {
        ser.write_node(node);
    }
    out
}

struct Serializer<'a, W: Write> {
    out: &'a mut W,
    tree: &'a DetachedTree,
    vocabulary: &'a Vocabulary,
    options: &'a SerializeOptions,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(out: &'a mut W, tree: &'a DetachedTree, options: &'a SerializeOptions) -> Self {
        Self {
            out,
            tree,
            vocabulary: tree.vocabulary(),
            options,
        }
    }

    fn write_node(&mut self, node: NodeId) {
        let tree = self.tree;
        let data = tree.get(node);
        if !data.render {
            return;
        }

        match &data.kind {
            NodeKind::Text(text) => {
                let _ = write!(self.out, "{}", text);
            }
            NodeKind::Comment(text) => {
                let _ = write!(self.out, "<!--{}-->", text);
            }
            NodeKind::Directive(text) => {
                let _ = write!(self.out, "<{}>", text);
            }
            NodeKind::Cdata(_) => {
                let _ = write!(self.out, "<!CDATA ");
                self.write_children(node);
                let _ = write!(self.out, "]]>");
            }
            NodeKind::Fragment => self.write_children(node),
            NodeKind::Element(elem) => {
                let tag = &*elem.name;
                let _ = write!(self.out, "<{}", tag);

                if self.options.sort_attributes {
                    let mut attrs: Vec<_> = elem.attrs.iter().collect();
                    attrs.sort_by_key(|(k, _)| *k);
                    for (name, value) in attrs {
                        self.write_attr(name, value.as_deref());
                    }
                } else {
                    for (name, value) in &elem.attrs {
                        self.write_attr(name, value.as_deref());
                    }
                }

                let childless = tree.first_child(node).is_none();
                if childless && self.vocabulary.is_void_element(tag) {
                    let _ = write!(self.out, " />");
                    return;
                }

                let _ = write!(self.out, ">");
                self.write_children(node);
                let _ = write!(self.out, "</{}>", tag);
            }
        }
    }

    fn write_children(&mut self, node: NodeId) {
        let tree = self.tree;
        for child in tree.children(node) {
            self.write_node(child);
        }
    }

    fn write_attr(&mut self, name: &str, value: Option<&str>) {
        let _ = write!(self.out, " {}", name);
        match value {
            Some(value) => {
                let _ = self.out.write_str("=\"");
                let _ = escape_into(&mut *self.out, value);
                let _ = self.out.write_str("\"");
            }
            None if self.vocabulary.is_boolean_attribute(name) => {}
            None => {
                let _ = write!(self.out, "=\"\"");
            }
        }
    }
}

impl DetachedTree {
    /// Markup for `node` including its own tag or framing.
    pub fn outer_html(&self, node: NodeId) -> String {
        outer_html(self, node, &SerializeOptions::default())
    }

    /// Markup for the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        inner_html(self, node, &SerializeOptions::default())
    }

    /// Concatenated outer markup of `nodes`.
    pub fn render(&self, nodes: &[NodeId]) -> String {
        render_nodes(self, nodes, &SerializeOptions::default())
    }

    pub fn render_with(&self, nodes: &[NodeId], opts: &SerializeOptions) -> String {
        render_nodes(self, nodes, opts)
    }
}
