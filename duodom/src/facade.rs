//! One API over both backends.
//!
//! [`Markup`] owns a [`DetachedTree`] and, optionally, a host's live backend.
//! Node handles are [`AnyNode`]s that remember which backend they belong to,
//! and every call routes on that with a single match.

use indextree::NodeId;

use crate::backend::{MarkupBackend, NoLiveTree};
use crate::error::DomError;
use crate::node::{NodeConfig, NodeType};
use crate::query::{CompiledSelector, Query, SelectorMatcher};
use crate::style::{StyleMap, merge_properties, merge_property, parse_style, style_attribute};
use crate::tree::DetachedTree;
use crate::vocabulary::Vocabulary;

/// A node of either backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyNode<N = std::convert::Infallible> {
    Detached(NodeId),
    Live(N),
}

impl<N> AnyNode<N> {
    pub fn as_detached(&self) -> Option<NodeId> {
        match self {
            AnyNode::Detached(id) => Some(*id),
            AnyNode::Live(_) => None,
        }
    }

    pub fn as_live(&self) -> Option<&N> {
        match self {
            AnyNode::Detached(_) => None,
            AnyNode::Live(node) => Some(node),
        }
    }
}

impl<N> From<NodeId> for AnyNode<N> {
    fn from(id: NodeId) -> Self {
        AnyNode::Detached(id)
    }
}

/// A set of handles that all belong to one backend.
enum Batch<N> {
    Detached(Vec<NodeId>),
    Live(Vec<N>),
}

/// Split `nodes` by backend, failing if they are mixed. An empty slice
/// follows `parent`'s backend.
fn batch<N: Clone>(parent_is_live: bool, nodes: &[AnyNode<N>]) -> Result<Batch<N>, DomError> {
    if parent_is_live {
        nodes
            .iter()
            .map(|node| node.as_live().cloned().ok_or(DomError::BackendMismatch))
            .collect::<Result<Vec<_>, _>>()
            .map(Batch::Live)
    } else {
        nodes
            .iter()
            .map(|node| node.as_detached().ok_or(DomError::BackendMismatch))
            .collect::<Result<Vec<_>, _>>()
            .map(Batch::Detached)
    }
}

/// The markup facade.
///
/// Creation and parsing target the live backend when one is attached and the
/// detached tree otherwise. Everything else routes on the handles it is
/// given.
pub struct Markup<L: MarkupBackend = NoLiveTree> {
    tree: DetachedTree,
    live: Option<L>,
}

impl Default for Markup {
    fn default() -> Self {
        Self::new()
    }
}

impl Markup {
    /// A facade with only the detached backend.
    pub fn new() -> Self {
        Self {
            tree: DetachedTree::new(),
            live: None,
        }
    }
}

impl<L: MarkupBackend> Markup<L> {
    /// A facade that prefers `live` for new nodes.
    pub fn with_live(live: L) -> Self {
        Self {
            tree: DetachedTree::new(),
            live: Some(live),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.tree = DetachedTree::with_vocabulary(vocabulary);
        self
    }

    pub fn with_matcher(mut self, matcher: impl SelectorMatcher + 'static) -> Self {
        self.tree.set_matcher(matcher);
        self
    }

    pub fn detached(&self) -> &DetachedTree {
        &self.tree
    }

    pub fn detached_mut(&mut self) -> &mut DetachedTree {
        &mut self.tree
    }

    pub fn live(&self) -> Option<&L> {
        self.live.as_ref()
    }

    pub fn live_mut(&mut self) -> Option<&mut L> {
        self.live.as_mut()
    }

    fn host(&self) -> Result<&L, DomError> {
        self.live.as_ref().ok_or(DomError::NoLiveBackend)
    }

    fn host_mut(&mut self) -> Result<&mut L, DomError> {
        self.live.as_mut().ok_or(DomError::NoLiveBackend)
    }

    // =========================================================================
    // Creation and parsing
    // =========================================================================

    /// Create a node. Configured children must be detached nodes, so they
    /// cannot be combined with a live backend.
    pub fn create(&mut self, kind: &str, config: NodeConfig) -> Result<AnyNode<L::Node>, DomError> {
        match &mut self.live {
            Some(live) if config.children.is_empty() => live.create(kind, config).map(AnyNode::Live),
            Some(_) => Err(DomError::BackendMismatch),
            None => self.tree.create(kind, config).map(AnyNode::Detached),
        }
    }

    pub fn create_text(&mut self, text: &str) -> Result<AnyNode<L::Node>, DomError> {
        match &mut self.live {
            Some(live) => live.create_text(text).map(AnyNode::Live),
            None => Ok(AnyNode::Detached(self.tree.create_text(text))),
        }
    }

    /// Parse markup into top-level nodes.
    pub fn parse(&mut self, html: &str) -> Result<Vec<AnyNode<L::Node>>, DomError> {
        match &mut self.live {
            Some(live) => Ok(live.parse_nodes(html)?.into_iter().map(AnyNode::Live).collect()),
            None => Ok(self
                .tree
                .parse_nodes(html)
                .into_iter()
                .map(AnyNode::Detached)
                .collect()),
        }
    }

    pub fn parse_single(&mut self, html: &str) -> Result<Option<AnyNode<L::Node>>, DomError> {
        match &mut self.live {
            Some(live) => Ok(live.parse_single(html)?.map(AnyNode::Live)),
            None => Ok(self.tree.parse_single(html).map(AnyNode::Detached)),
        }
    }

    // =========================================================================
    // Introspection and navigation
    // =========================================================================

    /// Whether `node` is a live node of its backend.
    pub fn is_node(&self, node: &AnyNode<L::Node>) -> bool {
        match node {
            AnyNode::Detached(id) => self.tree.contains(*id),
            AnyNode::Live(node) => self
                .live
                .as_ref()
                .is_some_and(|live| live.contains(node).unwrap_or(false)),
        }
    }

    pub fn type_of(&self, node: &AnyNode<L::Node>) -> Result<NodeType, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.node_type(*id)),
            AnyNode::Live(node) => self.host()?.node_type(node),
        }
    }

    pub fn name_of(&self, node: &AnyNode<L::Node>) -> Result<Option<String>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.name_of(*id)),
            AnyNode::Live(node) => self.host()?.name_of(node),
        }
    }

    pub fn parent(&self, node: &AnyNode<L::Node>) -> Result<Option<AnyNode<L::Node>>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.parent(*id).map(AnyNode::Detached)),
            AnyNode::Live(node) => Ok(self.host()?.parent(node)?.map(AnyNode::Live)),
        }
    }

    pub fn children(&self, node: &AnyNode<L::Node>) -> Result<Vec<AnyNode<L::Node>>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.children(*id).map(AnyNode::Detached).collect()),
            AnyNode::Live(node) => Ok(self
                .host()?
                .children(node)?
                .into_iter()
                .map(AnyNode::Live)
                .collect()),
        }
    }

    pub fn first_child(&self, node: &AnyNode<L::Node>) -> Result<Option<AnyNode<L::Node>>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.first_child(*id).map(AnyNode::Detached)),
            AnyNode::Live(node) => Ok(self.host()?.first_child(node)?.map(AnyNode::Live)),
        }
    }

    pub fn last_child(&self, node: &AnyNode<L::Node>) -> Result<Option<AnyNode<L::Node>>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.last_child(*id).map(AnyNode::Detached)),
            AnyNode::Live(node) => Ok(self.host()?.last_child(node)?.map(AnyNode::Live)),
        }
    }

    pub fn prev(&self, node: &AnyNode<L::Node>) -> Result<Option<AnyNode<L::Node>>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.prev(*id).map(AnyNode::Detached)),
            AnyNode::Live(node) => Ok(self.host()?.prev(node)?.map(AnyNode::Live)),
        }
    }

    pub fn next(&self, node: &AnyNode<L::Node>) -> Result<Option<AnyNode<L::Node>>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.next(*id).map(AnyNode::Detached)),
            AnyNode::Live(node) => Ok(self.host()?.next(node)?.map(AnyNode::Live)),
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    pub fn splice(
        &mut self,
        parent: &AnyNode<L::Node>,
        index: usize,
        remove_count: usize,
        insertions: &[AnyNode<L::Node>],
    ) -> Result<Vec<AnyNode<L::Node>>, DomError> {
        match (parent, batch(matches!(parent, AnyNode::Live(_)), insertions)?) {
            (AnyNode::Detached(id), Batch::Detached(nodes)) => Ok(self
                .tree
                .splice(*id, index, remove_count, nodes)?
                .into_iter()
                .map(AnyNode::Detached)
                .collect()),
            (AnyNode::Live(node), Batch::Live(nodes)) => Ok(self
                .host_mut()?
                .splice(node, index, remove_count, &nodes)?
                .into_iter()
                .map(AnyNode::Live)
                .collect()),
            _ => Err(DomError::BackendMismatch),
        }
    }

    pub fn append_child(
        &mut self,
        parent: &AnyNode<L::Node>,
        child: &AnyNode<L::Node>,
    ) -> Result<(), DomError> {
        match (parent, child) {
            (AnyNode::Detached(p), AnyNode::Detached(c)) => self.tree.append_child(*p, *c),
            (AnyNode::Live(p), AnyNode::Live(c)) => self.host_mut()?.append_child(p, c),
            _ => Err(DomError::BackendMismatch),
        }
    }

    pub fn prepend_child(
        &mut self,
        parent: &AnyNode<L::Node>,
        child: &AnyNode<L::Node>,
    ) -> Result<(), DomError> {
        match (parent, child) {
            (AnyNode::Detached(p), AnyNode::Detached(c)) => self.tree.prepend_child(*p, *c),
            (AnyNode::Live(p), AnyNode::Live(c)) => self.host_mut()?.prepend_child(p, c),
            _ => Err(DomError::BackendMismatch),
        }
    }

    pub fn append_children(
        &mut self,
        parent: &AnyNode<L::Node>,
        children: &[AnyNode<L::Node>],
    ) -> Result<(), DomError> {
        match (parent, batch(matches!(parent, AnyNode::Live(_)), children)?) {
            (AnyNode::Detached(p), Batch::Detached(c)) => self.tree.append_children(*p, &c),
            (AnyNode::Live(p), Batch::Live(c)) => self.host_mut()?.append_children(p, &c),
            _ => Err(DomError::BackendMismatch),
        }
    }

    pub fn prepend_children(
        &mut self,
        parent: &AnyNode<L::Node>,
        children: &[AnyNode<L::Node>],
    ) -> Result<(), DomError> {
        match (parent, batch(matches!(parent, AnyNode::Live(_)), children)?) {
            (AnyNode::Detached(p), Batch::Detached(c)) => self.tree.prepend_children(*p, &c),
            (AnyNode::Live(p), Batch::Live(c)) => self.host_mut()?.prepend_children(p, &c),
            _ => Err(DomError::BackendMismatch),
        }
    }

    pub fn remove_child(
        &mut self,
        parent: &AnyNode<L::Node>,
        child: &AnyNode<L::Node>,
    ) -> Result<bool, DomError> {
        match (parent, child) {
            (AnyNode::Detached(p), AnyNode::Detached(c)) => self.tree.remove_child(*p, *c),
            (AnyNode::Live(p), AnyNode::Live(c)) => self.host_mut()?.remove_child(p, c),
            _ => Err(DomError::BackendMismatch),
        }
    }

    /// Insert `next` after `node`; false if `node` has no parent.
    pub fn append(
        &mut self,
        node: &AnyNode<L::Node>,
        next: &AnyNode<L::Node>,
    ) -> Result<bool, DomError> {
        match (node, next) {
            (AnyNode::Detached(n), AnyNode::Detached(x)) => self.tree.insert_after(*n, *x),
            (AnyNode::Live(n), AnyNode::Live(x)) => self.host_mut()?.insert_after(n, x),
            _ => Err(DomError::BackendMismatch),
        }
    }

    /// Insert `previous` before `node`; false if `node` has no parent.
    pub fn prepend(
        &mut self,
        node: &AnyNode<L::Node>,
        previous: &AnyNode<L::Node>,
    ) -> Result<bool, DomError> {
        match (node, previous) {
            (AnyNode::Detached(n), AnyNode::Detached(p)) => self.tree.insert_before(*n, *p),
            (AnyNode::Live(n), AnyNode::Live(p)) => self.host_mut()?.insert_before(n, p),
            _ => Err(DomError::BackendMismatch),
        }
    }

    pub fn replace(
        &mut self,
        node: &AnyNode<L::Node>,
        replacement: &AnyNode<L::Node>,
    ) -> Result<bool, DomError> {
        match (node, replacement) {
            (AnyNode::Detached(n), AnyNode::Detached(r)) => self.tree.replace(*n, *r),
            (AnyNode::Live(n), AnyNode::Live(r)) => self.host_mut()?.replace(n, r),
            _ => Err(DomError::BackendMismatch),
        }
    }

    pub fn remove(&mut self, node: &AnyNode<L::Node>) -> Result<bool, DomError> {
        match node {
            AnyNode::Detached(id) => self.tree.remove(*id),
            AnyNode::Live(node) => self.host_mut()?.remove(node),
        }
    }

    pub fn empty(&mut self, node: &AnyNode<L::Node>) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => self.tree.empty(*id),
            AnyNode::Live(node) => self.host_mut()?.empty(node),
        }
    }

    // =========================================================================
    // Text and attributes
    // =========================================================================

    pub fn get_text(&self, node: &AnyNode<L::Node>) -> Result<String, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.get_text(*id)),
            AnyNode::Live(node) => self.host()?.get_text(node),
        }
    }

    pub fn set_text(&mut self, node: &AnyNode<L::Node>, text: &str) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => self.tree.set_text(*id, text),
            AnyNode::Live(node) => self.host_mut()?.set_text(node, text),
        }
    }

    /// Get the text with `None`, set it with `Some`.
    pub fn text(
        &mut self,
        node: &AnyNode<L::Node>,
        text: Option<&str>,
    ) -> Result<Option<String>, DomError> {
        match text {
            None => self.get_text(node).map(Some),
            Some(text) => self.set_text(node, text).map(|_| None),
        }
    }

    pub fn get_attribute(
        &self,
        node: &AnyNode<L::Node>,
        name: &str,
    ) -> Result<Option<String>, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.get_attribute(*id, name).map(str::to_owned)),
            AnyNode::Live(node) => self.host()?.get_attribute(node, name),
        }
    }

    pub fn has_attribute(&self, node: &AnyNode<L::Node>, name: &str) -> Result<bool, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.has_attribute(*id, name)),
            AnyNode::Live(node) => self.host()?.has_attribute(node, name),
        }
    }

    pub fn set_attribute(
        &mut self,
        node: &AnyNode<L::Node>,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => {
                self.tree.set_attribute(*id, name, value);
                Ok(())
            }
            AnyNode::Live(node) => self.host_mut()?.set_attribute(node, name, value),
        }
    }

    pub fn set_boolean_attribute(
        &mut self,
        node: &AnyNode<L::Node>,
        name: &str,
        present: bool,
    ) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => {
                self.tree.set_boolean_attribute(*id, name, present);
                Ok(())
            }
            AnyNode::Live(node) => self.host_mut()?.set_boolean_attribute(node, name, present),
        }
    }

    pub fn remove_attribute(&mut self, node: &AnyNode<L::Node>, name: &str) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => {
                self.tree.remove_attribute(*id, name);
                Ok(())
            }
            AnyNode::Live(node) => self.host_mut()?.remove_attribute(node, name),
        }
    }

    /// Set several attributes, in the order given.
    pub fn set_attributes<'a>(
        &mut self,
        node: &AnyNode<L::Node>,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), DomError> {
        for (name, value) in attributes {
            self.set_attribute(node, name, value)?;
        }
        Ok(())
    }

    /// Get an attribute with `None`, set it with `Some`.
    pub fn attribute(
        &mut self,
        node: &AnyNode<L::Node>,
        name: &str,
        value: Option<&str>,
    ) -> Result<Option<String>, DomError> {
        match value {
            None => self.get_attribute(node, name),
            Some(value) => self.set_attribute(node, name, value).map(|_| None),
        }
    }

    pub fn add_class(&mut self, node: &AnyNode<L::Node>, class: &str) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => {
                self.tree.add_class(*id, class);
                Ok(())
            }
            AnyNode::Live(node) => self.host_mut()?.add_class(node, class),
        }
    }

    pub fn remove_class(&mut self, node: &AnyNode<L::Node>, class: &str) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => {
                self.tree.remove_class(*id, class);
                Ok(())
            }
            AnyNode::Live(node) => self.host_mut()?.remove_class(node, class),
        }
    }

    pub fn get_value(&self, node: &AnyNode<L::Node>) -> Result<Option<String>, DomError> {
        self.get_attribute(node, "value")
    }

    pub fn set_value(&mut self, node: &AnyNode<L::Node>, value: &str) -> Result<(), DomError> {
        self.set_attribute(node, "value", value)
    }

    /// Get the `value` attribute with `None`, set it with `Some`.
    pub fn value(
        &mut self,
        node: &AnyNode<L::Node>,
        value: Option<&str>,
    ) -> Result<Option<String>, DomError> {
        self.attribute(node, "value", value)
    }

    pub fn get_checked(&self, node: &AnyNode<L::Node>) -> Result<bool, DomError> {
        self.has_attribute(node, "checked")
    }

    pub fn set_checked(&mut self, node: &AnyNode<L::Node>, checked: bool) -> Result<(), DomError> {
        if checked {
            self.set_boolean_attribute(node, "checked", true)
        } else {
            self.remove_attribute(node, "checked")
        }
    }

    /// Read the checked state with `None`, write it with `Some`. Returns the
    /// resulting state.
    pub fn checked(
        &mut self,
        node: &AnyNode<L::Node>,
        checked: Option<bool>,
    ) -> Result<bool, DomError> {
        if let Some(checked) = checked {
            self.set_checked(node, checked)?;
        }
        self.get_checked(node)
    }

    // =========================================================================
    // Inline style
    // =========================================================================

    pub fn get_style(&self, node: &AnyNode<L::Node>) -> Result<StyleMap, DomError> {
        Ok(self
            .get_attribute(node, "style")?
            .map(|raw| parse_style(&raw))
            .unwrap_or_default())
    }

    pub fn get_style_property(
        &self,
        node: &AnyNode<L::Node>,
        name: &str,
    ) -> Result<Option<String>, DomError> {
        Ok(self.get_style(node)?.shift_remove(name))
    }

    /// Set one property; an empty value removes it.
    pub fn set_style(
        &mut self,
        node: &AnyNode<L::Node>,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let mut style = self.get_style(node)?;
        merge_property(&mut style, name, value);
        self.write_style(node, &style)
    }

    /// Merge `properties` into the inline style.
    pub fn set_styles(
        &mut self,
        node: &AnyNode<L::Node>,
        properties: &StyleMap,
    ) -> Result<(), DomError> {
        let mut style = self.get_style(node)?;
        merge_properties(&mut style, properties);
        self.write_style(node, &style)
    }

    /// Read the style map with `None`, merge into it with `Some`. Returns the
    /// resulting map.
    pub fn style(
        &mut self,
        node: &AnyNode<L::Node>,
        properties: Option<&StyleMap>,
    ) -> Result<StyleMap, DomError> {
        if let Some(properties) = properties {
            self.set_styles(node, properties)?;
        }
        self.get_style(node)
    }

    fn write_style(&mut self, node: &AnyNode<L::Node>, style: &StyleMap) -> Result<(), DomError> {
        match style_attribute(style) {
            Some(value) => self.set_attribute(node, "style", &value),
            None => self.remove_attribute(node, "style"),
        }
    }

    pub fn set_render(&mut self, node: &AnyNode<L::Node>, render: bool) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => {
                self.tree.set_render(*id, render);
                Ok(())
            }
            AnyNode::Live(node) => self.host_mut()?.set_render(node, render),
        }
    }

    // =========================================================================
    // Markup
    // =========================================================================

    pub fn outer_html(&self, node: &AnyNode<L::Node>) -> Result<String, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.outer_html(*id)),
            AnyNode::Live(node) => self.host()?.outer_html(node),
        }
    }

    pub fn inner_html(&self, node: &AnyNode<L::Node>) -> Result<String, DomError> {
        match node {
            AnyNode::Detached(id) => Ok(self.tree.inner_html(*id)),
            AnyNode::Live(node) => self.host()?.inner_html(node),
        }
    }

    /// Concatenated outer markup of `nodes`, which must share a backend.
    pub fn render(&self, nodes: &[AnyNode<L::Node>]) -> Result<String, DomError> {
        let live = nodes.first().is_some_and(|node| node.as_live().is_some());
        match batch(live, nodes)? {
            Batch::Detached(nodes) => Ok(self.tree.render(&nodes)),
            Batch::Live(nodes) => self.host()?.render(&nodes),
        }
    }

    pub fn get_html(&self, nodes: &[AnyNode<L::Node>]) -> Result<String, DomError> {
        self.render(nodes)
    }

    pub fn set_inner_html(&mut self, node: &AnyNode<L::Node>, html: &str) -> Result<(), DomError> {
        match node {
            AnyNode::Detached(id) => self.tree.set_inner_html(*id, html),
            AnyNode::Live(node) => self.host_mut()?.set_inner_html(node, html),
        }
    }

    pub fn set_outer_html(&mut self, node: &AnyNode<L::Node>, html: &str) -> Result<bool, DomError> {
        match node {
            AnyNode::Detached(id) => self.tree.set_outer_html(*id, html),
            AnyNode::Live(node) => self.host_mut()?.set_outer_html(node, html),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Compile a selector with the detached tree's matcher.
    pub fn selector_compile(&self, selector: &str) -> Result<Box<dyn CompiledSelector>, DomError> {
        self.tree.selector_compile(selector)
    }

    pub fn find_one<'q>(
        &self,
        root: &AnyNode<L::Node>,
        query: impl Into<Query<'q>>,
    ) -> Result<Option<AnyNode<L::Node>>, DomError> {
        match (root, query.into()) {
            (AnyNode::Detached(id), query) => Ok(self.tree.find_one(*id, query)?.map(AnyNode::Detached)),
            (AnyNode::Live(node), Query::Raw(selector)) => {
                Ok(self.host()?.find_one(node, selector)?.map(AnyNode::Live))
            }
            (AnyNode::Live(_), Query::Compiled(_)) => Err(self.compiled_on_live("find_one")),
        }
    }

    pub fn find_all<'q>(
        &self,
        root: &AnyNode<L::Node>,
        query: impl Into<Query<'q>>,
    ) -> Result<Vec<AnyNode<L::Node>>, DomError> {
        match (root, query.into()) {
            (AnyNode::Detached(id), query) => Ok(self
                .tree
                .find_all(*id, query)?
                .into_iter()
                .map(AnyNode::Detached)
                .collect()),
            (AnyNode::Live(node), Query::Raw(selector)) => Ok(self
                .host()?
                .find_all(node, selector)?
                .into_iter()
                .map(AnyNode::Live)
                .collect()),
            (AnyNode::Live(_), Query::Compiled(_)) => Err(self.compiled_on_live("find_all")),
        }
    }

    pub fn matches<'q>(
        &self,
        node: &AnyNode<L::Node>,
        query: impl Into<Query<'q>>,
    ) -> Result<bool, DomError> {
        match (node, query.into()) {
            (AnyNode::Detached(id), query) => self.tree.matches(*id, query),
            (AnyNode::Live(node), Query::Raw(selector)) => self.host()?.matches(node, selector),
            (AnyNode::Live(_), Query::Compiled(_)) => Err(self.compiled_on_live("matches")),
        }
    }

    /// Compiled selectors only understand detached trees.
    fn compiled_on_live(&self, operation: &str) -> DomError {
        match &self.live {
            Some(live) => DomError::unsupported(operation, live.backend_name()),
            None => DomError::NoLiveBackend,
        }
    }
}
