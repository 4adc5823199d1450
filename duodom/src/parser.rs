//! HTML parsing into a [`DetachedTree`] using html5ever's TreeSink.
//!
//! html5ever runs the full HTML5 tree construction algorithm, including its
//! error recovery. The sink below writes straight into the caller's arena and
//! converts what it is handed into this crate's node model:
//!
//! - text outside raw-text elements is stored escaped
//! - valueless boolean attributes become the present-without-value sentinel
//! - doctypes become `!DOCTYPE …` directives
//! - processing instructions become `?… ?` directives

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{
    ElemName, ElementFlags, NodeOrText, QuirksMode, TreeBuilderOpts, TreeSink,
};
use html5ever::{Attribute, LocalName, ParseOpts, QualName, local_name, ns, parse_document};
use indextree::NodeId;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::io::Read;

use crate::error::DomError;
use crate::escape::escape;
use crate::node::{Attributes, ElementData, Namespace, NodeData, NodeKind};
use crate::tree::DetachedTree;
use crate::vocabulary::Vocabulary;
use crate::{debug, trace};

/// Options for parsing.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Keep the document structure (doctype plus `<html>`) instead of
    /// flattening head and body content into a fragment (default: false).
    pub document: bool,
    /// Parse `<noscript>` content as raw text, like a browser with scripting
    /// on (default: true).
    pub scripting_enabled: bool,
    /// Ask html5ever for detailed parse error messages (default: false).
    pub exact_errors: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            document: false,
            scripting_enabled: true,
            exact_errors: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse as a whole document.
    pub fn document(mut self) -> Self {
        self.document = true;
        self
    }

    pub fn scripting_enabled(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    pub fn exact_errors(mut self) -> Self {
        self.exact_errors = true;
        self
    }

    fn to_html5ever(&self) -> ParseOpts {
        ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: self.scripting_enabled,
                exact_errors: self.exact_errors,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Parse markup into a new tree, returning it with the fragment host that
/// holds the top-level nodes.
pub fn parse(html: &str) -> (DetachedTree, NodeId) {
    let mut tree = DetachedTree::new();
    let root = tree.parse_string(html, &ParseOptions::default());
    (tree, root)
}

impl DetachedTree {
    /// Parse markup into this tree. Returns a fragment host whose children
    /// are the top-level nodes.
    pub fn parse_string(&mut self, html: &str, opts: &ParseOptions) -> NodeId {
        let sink = TreeBuilderSink::new(self, opts);
        parse_document(sink, opts.to_html5ever()).one(StrTendril::from(html))
    }

    /// Parse markup read from `reader`, which must yield UTF-8.
    pub fn parse_reader<R: Read>(
        &mut self,
        reader: &mut R,
        opts: &ParseOptions,
    ) -> Result<NodeId, DomError> {
        let sink = TreeBuilderSink::new(self, opts);
        parse_document(sink, opts.to_html5ever())
            .from_utf8()
            .read_from(reader)
            .map_err(|err| DomError::Io {
                message: err.to_string(),
            })
    }

    /// Parse markup and return its first top-level node, detached.
    pub fn parse_single(&mut self, html: &str) -> Option<NodeId> {
        let host = self.parse_string(html, &ParseOptions::default());
        let first = self.first_child(host);
        if let Some(first) = first {
            first.detach(&mut self.arena);
        }
        self.dispose(host);
        first
    }

    /// Parse markup and return its top-level nodes.
    ///
    /// The nodes stay under their fragment host, so their sibling links
    /// describe the parsed sequence.
    pub fn parse_nodes(&mut self, html: &str) -> Vec<NodeId> {
        let host = self.parse_string(html, &ParseOptions::default());
        self.children(host).collect()
    }

    /// Replace the children of `node` with the nodes parsed from `html`.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        let host = self.parse_string(html, &ParseOptions::default());
        let parsed: Vec<NodeId> = self.children(host).collect();
        let len = self.children(node).count();
        let result = self.splice(node, 0, len, parsed).map(drop);
        self.dispose(host);
        result
    }

    /// Replace `node` itself with the nodes parsed from `html`. Inert
    /// (returns false) if `node` has no parent.
    pub fn set_outer_html(&mut self, node: NodeId, html: &str) -> Result<bool, DomError> {
        let Some((parent, index)) = self.position(node) else {
            return Ok(false);
        };
        let host = self.parse_string(html, &ParseOptions::default());
        let parsed: Vec<NodeId> = self.children(host).collect();
        let result = self.splice(parent, index, 1, parsed);
        self.dispose(host);
        result.map(|_| true)
    }
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink that writes into a borrowed [`DetachedTree`].
struct TreeBuilderSink<'t> {
    tree: RefCell<&'t mut DetachedTree>,

    /// Parent of `<html>` and the doctype while parsing
    document: NodeId,

    document_mode: bool,
    scripting_enabled: bool,
    vocabulary: Vocabulary,
    errors: Cell<usize>,
}

impl<'t> TreeBuilderSink<'t> {
    fn new(tree: &'t mut DetachedTree, opts: &ParseOptions) -> Self {
        let vocabulary = *tree.vocabulary();
        let document = tree.create_fragment();
        Self {
            tree: RefCell::new(tree),
            document,
            document_mode: opts.document,
            scripting_enabled: opts.scripting_enabled,
            vocabulary,
            errors: Cell::new(0),
        }
    }

    /// Text as it is stored under `parent`: escaped unless the parent is an
    /// HTML element whose content the tokenizer leaves undecoded.
    fn stored_text(&self, tree: &DetachedTree, parent: Option<NodeId>, text: StrTendril) -> StrTendril {
        let raw = parent.is_some_and(|parent| self.is_raw_text_parent(tree.get(parent)));
        if raw {
            text
        } else {
            StrTendril::from(escape(&text))
        }
    }

    /// Foreign `<style>` or `<script>` content is decoded like any other
    /// text, and `<noscript>` is raw text only with scripting on.
    fn is_raw_text_parent(&self, parent: &NodeData) -> bool {
        let Some(elem) = parent.kind.as_element() else {
            return false;
        };
        if parent.ns != Namespace::Html {
            return false;
        }
        let name = &*elem.name;
        self.vocabulary.is_raw_text_element(name)
            || (self.scripting_enabled && name.eq_ignore_ascii_case("noscript"))
    }

    fn convert_attrs(&self, attrs: Vec<Attribute>) -> Attributes {
        attrs
            .into_iter()
            .map(|attr| {
                let name = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                    None => attr.name.local.to_string(),
                };
                let value = if attr.value.is_empty() && self.vocabulary.is_boolean_attribute(&name)
                {
                    None
                } else {
                    Some(attr.value)
                };
                (name, value)
            })
            .collect()
    }
}

/// Move `node` to the end of `host`.
fn adopt(tree: &mut DetachedTree, host: NodeId, node: NodeId) {
    node.detach(&mut tree.arena);
    host.append(node, &mut tree.arena);
}

impl TreeSink for TreeBuilderSink<'_> {
    type Handle = NodeId;
    type Output = NodeId;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let tree = self.tree.into_inner();
        debug!("parse finished with {} recovered errors", self.errors.get());

        if self.document_mode {
            return self.document;
        }

        // Flatten `<html>`, `<head>` and `<body>` into a fresh fragment host
        let host = tree.create_fragment();
        let top: Vec<NodeId> = self.document.children(&tree.arena).collect();
        for node in top {
            if tree.name_of(node).as_deref() != Some("html") {
                adopt(tree, host, node);
                continue;
            }
            let sections: Vec<NodeId> = node.children(&tree.arena).collect();
            for section in sections {
                match tree.name_of(section).as_deref() {
                    Some("head") | Some("body") => {
                        let content: Vec<NodeId> = section.children(&tree.arena).collect();
                        for child in content {
                            adopt(tree, host, child);
                        }
                    }
                    _ => adopt(tree, host, section),
                }
            }
        }
        tree.dispose(self.document);
        host
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        // html5ever recovers on its own; only count and log
        self.errors.set(self.errors.get() + 1);
        debug!("parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let tree = self.tree.borrow();
        let node = tree.get(*target);

        if let NodeKind::Element(elem) = &node.kind {
            let ns = match node.ns {
                Namespace::Html => ns!(html),
                Namespace::Svg => ns!(svg),
                Namespace::MathMl => ns!(mathml),
            };
            OwnedElemName(QualName {
                prefix: None,
                ns,
                local: LocalName::from(&*elem.name),
            })
        } else {
            OwnedElemName(QualName {
                prefix: None,
                ns: ns!(html),
                local: local_name!(""),
            })
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let elem = ElementData {
            name: StrTendril::from(&*name.local),
            attrs: self.convert_attrs(attrs),
        };
        let mut data = NodeData::new(NodeKind::Element(elem));
        data.ns = Namespace::from_url(&name.ns);
        trace!("create_element: {}", name.local);
        self.tree.borrow_mut().arena.new_node(data)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.tree
            .borrow_mut()
            .arena
            .new_node(NodeData::new(NodeKind::Comment(text)))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let directive = StrTendril::from(format!("?{} {}?", target, data));
        self.tree
            .borrow_mut()
            .arena
            .new_node(NodeData::new(NodeKind::Directive(directive)))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut tree = self.tree.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut tree.arena);
            }
            NodeOrText::AppendText(text) => {
                let text = self.stored_text(&tree, Some(*parent), text);

                // Merge with a preceding text node, as html5ever expects
                if let Some(last) = tree.last_child(*parent)
                    && let NodeKind::Text(existing) = &mut tree.get_mut(last).kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = tree.arena.new_node(NodeData::new(NodeKind::Text(text)));
                parent.append(text_node, &mut tree.arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut tree = self.tree.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, &mut tree.arena);
            }
            NodeOrText::AppendText(text) => {
                let parent = tree.parent(*sibling);
                let text = self.stored_text(&tree, parent, text);

                if let Some(prev) = tree.prev(*sibling)
                    && let NodeKind::Text(existing) = &mut tree.get_mut(prev).kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = tree.arena.new_node(NodeData::new(NodeKind::Text(text)));
                sibling.insert_before(text_node, &mut tree.arena);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.tree.borrow().parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut directive = format!("!DOCTYPE {}", name);
        if !public_id.is_empty() {
            directive.push_str(&format!(" PUBLIC \"{}\"", public_id));
        }
        if !system_id.is_empty() {
            if public_id.is_empty() {
                directive.push_str(" SYSTEM");
            }
            directive.push_str(&format!(" \"{}\"", system_id));
        }

        let mut tree = self.tree.borrow_mut();
        let node = tree
            .arena
            .new_node(NodeData::new(NodeKind::Directive(StrTendril::from(directive))));
        self.document.append(node, &mut tree.arena);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template content lives directly under the <template> element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let attrs = self.convert_attrs(attrs);
        let mut tree = self.tree.borrow_mut();
        if let Some(elem) = tree.get_mut(*target).kind.as_element_mut() {
            for (name, value) in attrs {
                elem.attrs.entry(name).or_insert(value);
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.tree.borrow_mut().arena);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut tree = self.tree.borrow_mut();
        let children: Vec<NodeId> = node.children(&tree.arena).collect();
        for child in children {
            child.detach(&mut tree.arena);
            new_parent.append(child, &mut tree.arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    #[test]
    fn test_fragment_mode_flattens_head_and_body() {
        let (tree, root) = parse("<title>T</title><p>Hello</p>");
        let top: Vec<_> = tree.children(root).collect();
        assert_eq!(top.len(), 2);
        assert_eq!(tree.name_of(top[0]).as_deref(), Some("title"));
        assert_eq!(tree.name_of(top[1]).as_deref(), Some("p"));
        assert_eq!(tree.node_type(root), NodeType::Fragment);
    }

    #[test]
    fn test_document_mode_keeps_doctype_and_html() {
        let mut tree = DetachedTree::new();
        let root = tree.parse_string(
            "<!DOCTYPE html><html><body></body></html>",
            &ParseOptions::new().document(),
        );
        let top: Vec<_> = tree.children(root).collect();
        assert_eq!(tree.data(top[0]), Some("!DOCTYPE html"));
        assert_eq!(tree.name_of(top[1]).as_deref(), Some("html"));
    }

    #[test]
    fn test_text_is_stored_escaped() {
        let (tree, root) = parse("<p>a &lt; b &amp; c</p>");
        let p = tree.first_child(root).unwrap();
        let text = tree.first_child(p).unwrap();
        assert_eq!(tree.data(text), Some("a &lt; b &amp; c"));
        assert_eq!(tree.get_text(p), "a < b & c");
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let (tree, root) = parse("<script>if (a < b) {}</script>");
        let script = tree.first_child(root).unwrap();
        let text = tree.first_child(script).unwrap();
        assert_eq!(tree.data(text), Some("if (a < b) {}"));
    }

    #[test]
    fn test_foreign_style_text_is_escaped() {
        let (tree, root) = parse("<svg><style>x &lt;b&gt; y</style></svg>");
        let svg = tree.first_child(root).unwrap();
        let style = tree.first_child(svg).unwrap();
        assert_eq!(tree.get(style).ns, Namespace::Svg);
        let text = tree.first_child(style).unwrap();
        assert_eq!(tree.data(text), Some("x &lt;b&gt; y"));
        assert_eq!(
            tree.inner_html(root),
            "<svg><style>x &lt;b&gt; y</style></svg>"
        );
    }

    #[test]
    fn test_noscript_follows_scripting_flag() {
        let html = "<noscript>a &lt; b</noscript>";

        let (tree, root) = parse(html);
        let noscript = tree.first_child(root).unwrap();
        let text = tree.first_child(noscript).unwrap();
        assert_eq!(tree.data(text), Some("a &lt; b"));
        assert_eq!(tree.inner_html(root), html);

        let mut tree = DetachedTree::new();
        let root = tree.parse_string(
            "<p><noscript>a &lt; b</noscript></p>",
            &ParseOptions::new().scripting_enabled(false),
        );
        let p = tree.first_child(root).unwrap();
        let noscript = tree.first_child(p).unwrap();
        let text = tree.first_child(noscript).unwrap();
        assert_eq!(tree.data(text), Some("a &lt; b"));
        assert_eq!(tree.get_text(noscript), "a < b");
    }

    #[test]
    fn test_plaintext_is_not_escaped() {
        let (tree, root) = parse("<plaintext>a &lt; b");
        let plaintext = tree.first_child(root).unwrap();
        let text = tree.first_child(plaintext).unwrap();
        assert_eq!(tree.data(text), Some("a &lt; b"));
    }

    #[test]
    fn test_boolean_attribute_sentinel() {
        let (tree, root) = parse(r#"<input disabled value="">"#);
        let input = tree.first_child(root).unwrap();
        let attrs = tree.attributes(input).unwrap();
        assert_eq!(attrs["disabled"], None);
        assert_eq!(attrs["value"].as_deref(), Some(""));
    }

    #[test]
    fn test_svg_namespace_recorded() {
        let (tree, root) = parse("<svg><circle r=\"1\"></circle></svg>");
        let svg = tree.first_child(root).unwrap();
        assert_eq!(tree.get(svg).ns, Namespace::Svg);
    }

    #[test]
    fn test_parse_single_detaches() {
        let mut tree = DetachedTree::new();
        let node = tree.parse_single("<b>1</b><i>2</i>").unwrap();
        assert_eq!(tree.name_of(node).as_deref(), Some("b"));
        assert_eq!(tree.parent(node), None);
        assert_eq!(tree.next(node), None);
        assert_eq!(tree.parse_single(""), None);
    }

    #[test]
    fn test_parse_nodes_keeps_sibling_links() {
        let mut tree = DetachedTree::new();
        let nodes = tree.parse_nodes("<b>1</b>text<i>2</i>");
        assert_eq!(nodes.len(), 3);
        assert_eq!(tree.next(nodes[0]), Some(nodes[1]));
        assert_eq!(tree.prev(nodes[2]), Some(nodes[1]));
    }

    #[test]
    fn test_parse_reader() {
        let mut tree = DetachedTree::new();
        let mut input: &[u8] = b"<p>from a reader</p>";
        let root = tree.parse_reader(&mut input, &ParseOptions::default()).unwrap();
        assert_eq!(tree.inner_html(root), "<p>from a reader</p>");
    }

    #[test]
    fn test_set_inner_and_outer_html() {
        let (mut tree, root) = parse("<div><span>old</span></div>");
        let div = tree.first_child(root).unwrap();
        tree.set_inner_html(div, "<em>new</em> text").unwrap();
        assert_eq!(tree.outer_html(div), "<div><em>new</em> text</div>");

        let em = tree.first_child(div).unwrap();
        assert!(tree.set_outer_html(em, "<b>x</b><b>y</b>").unwrap());
        assert_eq!(tree.outer_html(div), "<div><b>x</b><b>y</b> text</div>");
    }
}
