//! Backend capability interface.
//!
//! A backend is anything that can hold markup nodes: the arena-backed
//! [`DetachedTree`] or a host's live tree. Every operation has a default body
//! that reports [`DomError::Unsupported`], so a host implements only what its
//! tree can do.

use indextree::NodeId;
use std::convert::Infallible;
use std::fmt;

use crate::error::DomError;
use crate::node::{NodeConfig, NodeType};
use crate::tree::DetachedTree;

pub trait MarkupBackend {
    /// Handle to one node of this backend.
    type Node: Clone + fmt::Debug;

    /// Name used in [`DomError::Unsupported`].
    fn backend_name(&self) -> &'static str;

    fn unsupported<T>(&self, operation: &str) -> Result<T, DomError> {
        Err(DomError::unsupported(operation, self.backend_name()))
    }

    // Construction

    fn create(&mut self, _kind: &str, _config: NodeConfig) -> Result<Self::Node, DomError> {
        self.unsupported("create")
    }

    fn create_text(&mut self, _text: &str) -> Result<Self::Node, DomError> {
        self.unsupported("create_text")
    }

    /// Parse markup into top-level nodes.
    fn parse_nodes(&mut self, _html: &str) -> Result<Vec<Self::Node>, DomError> {
        self.unsupported("parse_nodes")
    }

    fn parse_single(&mut self, _html: &str) -> Result<Option<Self::Node>, DomError> {
        self.unsupported("parse_single")
    }

    // Introspection

    fn contains(&self, _node: &Self::Node) -> Result<bool, DomError> {
        self.unsupported("contains")
    }

    fn node_type(&self, _node: &Self::Node) -> Result<NodeType, DomError> {
        self.unsupported("node_type")
    }

    fn name_of(&self, _node: &Self::Node) -> Result<Option<String>, DomError> {
        self.unsupported("name_of")
    }

    // Navigation

    fn parent(&self, _node: &Self::Node) -> Result<Option<Self::Node>, DomError> {
        self.unsupported("parent")
    }

    fn children(&self, _node: &Self::Node) -> Result<Vec<Self::Node>, DomError> {
        self.unsupported("children")
    }

    fn first_child(&self, _node: &Self::Node) -> Result<Option<Self::Node>, DomError> {
        self.unsupported("first_child")
    }

    fn last_child(&self, _node: &Self::Node) -> Result<Option<Self::Node>, DomError> {
        self.unsupported("last_child")
    }

    fn prev(&self, _node: &Self::Node) -> Result<Option<Self::Node>, DomError> {
        self.unsupported("prev")
    }

    fn next(&self, _node: &Self::Node) -> Result<Option<Self::Node>, DomError> {
        self.unsupported("next")
    }

    // Structure

    fn splice(
        &mut self,
        _parent: &Self::Node,
        _index: usize,
        _remove_count: usize,
        _insertions: &[Self::Node],
    ) -> Result<Vec<Self::Node>, DomError> {
        self.unsupported("splice")
    }

    fn append_child(&mut self, _parent: &Self::Node, _child: &Self::Node) -> Result<(), DomError> {
        self.unsupported("append_child")
    }

    fn prepend_child(&mut self, _parent: &Self::Node, _child: &Self::Node) -> Result<(), DomError> {
        self.unsupported("prepend_child")
    }

    fn append_children(
        &mut self,
        _parent: &Self::Node,
        _children: &[Self::Node],
    ) -> Result<(), DomError> {
        self.unsupported("append_children")
    }

    fn prepend_children(
        &mut self,
        _parent: &Self::Node,
        _children: &[Self::Node],
    ) -> Result<(), DomError> {
        self.unsupported("prepend_children")
    }

    fn remove_child(&mut self, _parent: &Self::Node, _child: &Self::Node) -> Result<bool, DomError> {
        self.unsupported("remove_child")
    }

    fn insert_after(&mut self, _node: &Self::Node, _next: &Self::Node) -> Result<bool, DomError> {
        self.unsupported("insert_after")
    }

    fn insert_before(
        &mut self,
        _node: &Self::Node,
        _previous: &Self::Node,
    ) -> Result<bool, DomError> {
        self.unsupported("insert_before")
    }

    fn replace(&mut self, _node: &Self::Node, _replacement: &Self::Node) -> Result<bool, DomError> {
        self.unsupported("replace")
    }

    fn remove(&mut self, _node: &Self::Node) -> Result<bool, DomError> {
        self.unsupported("remove")
    }

    fn empty(&mut self, _node: &Self::Node) -> Result<(), DomError> {
        self.unsupported("empty")
    }

    // Text and attributes

    fn get_text(&self, _node: &Self::Node) -> Result<String, DomError> {
        self.unsupported("get_text")
    }

    fn set_text(&mut self, _node: &Self::Node, _text: &str) -> Result<(), DomError> {
        self.unsupported("set_text")
    }

    fn get_attribute(&self, _node: &Self::Node, _name: &str) -> Result<Option<String>, DomError> {
        self.unsupported("get_attribute")
    }

    fn has_attribute(&self, _node: &Self::Node, _name: &str) -> Result<bool, DomError> {
        self.unsupported("has_attribute")
    }

    fn set_attribute(&mut self, _node: &Self::Node, _name: &str, _value: &str) -> Result<(), DomError> {
        self.unsupported("set_attribute")
    }

    fn set_boolean_attribute(
        &mut self,
        _node: &Self::Node,
        _name: &str,
        _present: bool,
    ) -> Result<(), DomError> {
        self.unsupported("set_boolean_attribute")
    }

    fn remove_attribute(&mut self, _node: &Self::Node, _name: &str) -> Result<(), DomError> {
        self.unsupported("remove_attribute")
    }

    fn add_class(&mut self, _node: &Self::Node, _class: &str) -> Result<(), DomError> {
        self.unsupported("add_class")
    }

    fn remove_class(&mut self, _node: &Self::Node, _class: &str) -> Result<(), DomError> {
        self.unsupported("remove_class")
    }

    fn set_render(&mut self, _node: &Self::Node, _render: bool) -> Result<(), DomError> {
        self.unsupported("set_render")
    }

    // Markup

    fn outer_html(&self, _node: &Self::Node) -> Result<String, DomError> {
        self.unsupported("outer_html")
    }

    fn inner_html(&self, _node: &Self::Node) -> Result<String, DomError> {
        self.unsupported("inner_html")
    }

    fn render(&self, _nodes: &[Self::Node]) -> Result<String, DomError> {
        self.unsupported("render")
    }

    fn set_inner_html(&mut self, _node: &Self::Node, _html: &str) -> Result<(), DomError> {
        self.unsupported("set_inner_html")
    }

    fn set_outer_html(&mut self, _node: &Self::Node, _html: &str) -> Result<bool, DomError> {
        self.unsupported("set_outer_html")
    }

    // Queries

    fn find_one(&self, _root: &Self::Node, _selector: &str) -> Result<Option<Self::Node>, DomError> {
        self.unsupported("find_one")
    }

    fn find_all(&self, _root: &Self::Node, _selector: &str) -> Result<Vec<Self::Node>, DomError> {
        self.unsupported("find_all")
    }

    fn matches(&self, _node: &Self::Node, _selector: &str) -> Result<bool, DomError> {
        self.unsupported("matches")
    }
}

/// Placeholder live backend for a [`Markup`](crate::Markup) without one.
///
/// Its node type is uninhabited, so no live handle can ever exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLiveTree;

impl MarkupBackend for NoLiveTree {
    type Node = Infallible;

    fn backend_name(&self) -> &'static str {
        "none"
    }
}

impl MarkupBackend for DetachedTree {
    type Node = NodeId;

    fn backend_name(&self) -> &'static str {
        "detached"
    }

    fn create(&mut self, kind: &str, config: NodeConfig) -> Result<NodeId, DomError> {
        DetachedTree::create(self, kind, config)
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, DomError> {
        Ok(DetachedTree::create_text(self, text))
    }

    fn parse_nodes(&mut self, html: &str) -> Result<Vec<NodeId>, DomError> {
        Ok(DetachedTree::parse_nodes(self, html))
    }

    fn parse_single(&mut self, html: &str) -> Result<Option<NodeId>, DomError> {
        Ok(DetachedTree::parse_single(self, html))
    }

    fn contains(&self, node: &NodeId) -> Result<bool, DomError> {
        Ok(DetachedTree::contains(self, *node))
    }

    fn node_type(&self, node: &NodeId) -> Result<NodeType, DomError> {
        Ok(DetachedTree::node_type(self, *node))
    }

    fn name_of(&self, node: &NodeId) -> Result<Option<String>, DomError> {
        Ok(DetachedTree::name_of(self, *node))
    }

    fn parent(&self, node: &NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(DetachedTree::parent(self, *node))
    }

    fn children(&self, node: &NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(DetachedTree::children(self, *node).collect())
    }

    fn first_child(&self, node: &NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(DetachedTree::first_child(self, *node))
    }

    fn last_child(&self, node: &NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(DetachedTree::last_child(self, *node))
    }

    fn prev(&self, node: &NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(DetachedTree::prev(self, *node))
    }

    fn next(&self, node: &NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(DetachedTree::next(self, *node))
    }

    fn splice(
        &mut self,
        parent: &NodeId,
        index: usize,
        remove_count: usize,
        insertions: &[NodeId],
    ) -> Result<Vec<NodeId>, DomError> {
        DetachedTree::splice(self, *parent, index, remove_count, insertions)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        DetachedTree::append_child(self, *parent, *child)
    }

    fn prepend_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        DetachedTree::prepend_child(self, *parent, *child)
    }

    fn append_children(&mut self, parent: &NodeId, children: &[NodeId]) -> Result<(), DomError> {
        DetachedTree::append_children(self, *parent, children)
    }

    fn prepend_children(&mut self, parent: &NodeId, children: &[NodeId]) -> Result<(), DomError> {
        DetachedTree::prepend_children(self, *parent, children)
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<bool, DomError> {
        DetachedTree::remove_child(self, *parent, *child)
    }

    fn insert_after(&mut self, node: &NodeId, next: &NodeId) -> Result<bool, DomError> {
        DetachedTree::insert_after(self, *node, *next)
    }

    fn insert_before(&mut self, node: &NodeId, previous: &NodeId) -> Result<bool, DomError> {
        DetachedTree::insert_before(self, *node, *previous)
    }

    fn replace(&mut self, node: &NodeId, replacement: &NodeId) -> Result<bool, DomError> {
        DetachedTree::replace(self, *node, *replacement)
    }

    fn remove(&mut self, node: &NodeId) -> Result<bool, DomError> {
        DetachedTree::remove(self, *node)
    }

    fn empty(&mut self, node: &NodeId) -> Result<(), DomError> {
        DetachedTree::empty(self, *node)
    }

    fn get_text(&self, node: &NodeId) -> Result<String, DomError> {
        Ok(DetachedTree::get_text(self, *node))
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        DetachedTree::set_text(self, *node, text)
    }

    fn get_attribute(&self, node: &NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(DetachedTree::get_attribute(self, *node, name).map(str::to_owned))
    }

    fn has_attribute(&self, node: &NodeId, name: &str) -> Result<bool, DomError> {
        Ok(DetachedTree::has_attribute(self, *node, name))
    }

    // Attribute writes on non-tag nodes are inert, so the flags are dropped
    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        DetachedTree::set_attribute(self, *node, name, value);
        Ok(())
    }

    fn set_boolean_attribute(
        &mut self,
        node: &NodeId,
        name: &str,
        present: bool,
    ) -> Result<(), DomError> {
        DetachedTree::set_boolean_attribute(self, *node, name, present);
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        DetachedTree::remove_attribute(self, *node, name);
        Ok(())
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        DetachedTree::add_class(self, *node, class);
        Ok(())
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        DetachedTree::remove_class(self, *node, class);
        Ok(())
    }

    fn set_render(&mut self, node: &NodeId, render: bool) -> Result<(), DomError> {
        DetachedTree::set_render(self, *node, render);
        Ok(())
    }

    fn outer_html(&self, node: &NodeId) -> Result<String, DomError> {
        Ok(DetachedTree::outer_html(self, *node))
    }

    fn inner_html(&self, node: &NodeId) -> Result<String, DomError> {
        Ok(DetachedTree::inner_html(self, *node))
    }

    fn render(&self, nodes: &[NodeId]) -> Result<String, DomError> {
        Ok(DetachedTree::render(self, nodes))
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) -> Result<(), DomError> {
        DetachedTree::set_inner_html(self, *node, html)
    }

    fn set_outer_html(&mut self, node: &NodeId, html: &str) -> Result<bool, DomError> {
        DetachedTree::set_outer_html(self, *node, html)
    }

    fn find_one(&self, root: &NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        DetachedTree::find_one(self, *root, selector)
    }

    fn find_all(&self, root: &NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        DetachedTree::find_all(self, *root, selector)
    }

    fn matches(&self, node: &NodeId, selector: &str) -> Result<bool, DomError> {
        DetachedTree::matches(self, *node, selector)
    }
}
