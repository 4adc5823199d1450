//! Arena-backed detached tree.
//!
//! All nodes of a [`DetachedTree`] live in one `indextree` arena. The arena
//! owns the parent / previous-sibling / next-sibling links, and every
//! structural edit goes through [`DetachedTree::splice`], so those links stay
//! consistent no matter how the tree is edited.

use html5ever::tendril::StrTendril;
use indextree::{Arena, NodeId};
use std::fmt;

use crate::error::DomError;
use crate::escape::{escape, unescape};
use crate::node::{Attributes, NodeConfig, NodeData, NodeKind, NodeType};
use crate::query::SelectorMatcher;
use crate::style::{StyleMap, merge_properties, merge_property, parse_style, style_attribute};
use crate::vocabulary::Vocabulary;
use crate::{debug, trace};

/// Nodes to insert with [`DetachedTree::splice`]: one node, several, or none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Insertions(pub Vec<NodeId>);

impl From<NodeId> for Insertions {
    fn from(node: NodeId) -> Self {
        Insertions(vec![node])
    }
}

impl From<Option<NodeId>> for Insertions {
    fn from(node: Option<NodeId>) -> Self {
        Insertions(node.into_iter().collect())
    }
}

impl From<Vec<NodeId>> for Insertions {
    fn from(nodes: Vec<NodeId>) -> Self {
        Insertions(nodes)
    }
}

impl From<&[NodeId]> for Insertions {
    fn from(nodes: &[NodeId]) -> Self {
        Insertions(nodes.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for Insertions {
    fn from(nodes: [NodeId; N]) -> Self {
        Insertions(nodes.to_vec())
    }
}

impl From<()> for Insertions {
    fn from(_: ()) -> Self {
        Insertions(Vec::new())
    }
}

/// A markup tree that is plain data: no rendering surface behind it.
pub struct DetachedTree {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeData>,
    vocabulary: Vocabulary,
    matcher: Option<Box<dyn SelectorMatcher>>,
}

impl fmt::Debug for DetachedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetachedTree")
            .field("nodes", &self.arena.count())
            .field("vocabulary", &self.vocabulary)
            .field("matcher", &self.matcher.is_some())
            .finish()
    }
}

impl Default for DetachedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DetachedTree {
    pub fn new() -> Self {
        Self::with_vocabulary(Vocabulary::html())
    }

    pub fn with_vocabulary(vocabulary: Vocabulary) -> Self {
        Self {
            arena: Arena::new(),
            vocabulary,
            matcher: None,
        }
    }

    /// Install the selector-matcher collaborator used by raw-string queries.
    pub fn with_matcher(mut self, matcher: impl SelectorMatcher + 'static) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    pub fn set_matcher(&mut self, matcher: impl SelectorMatcher + 'static) {
        self.matcher = Some(Box::new(matcher));
    }

    /// Remove the installed matcher, returning it.
    pub fn take_matcher(&mut self) -> Option<Box<dyn SelectorMatcher>> {
        self.matcher.take()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub(crate) fn matcher(&self) -> Option<&dyn SelectorMatcher> {
        self.matcher.as_deref()
    }

    // =========================================================================
    // Node model
    // =========================================================================

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    /// Whether `id` names a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|node| !node.is_removed())
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.get(id).node_type()
    }

    /// Lower-cased tag name, for tag nodes.
    pub fn name_of(&self, id: NodeId) -> Option<String> {
        self.get(id).kind.as_element().map(|elem| elem.name_lower())
    }

    /// Raw payload of a text, comment, directive or cdata node.
    pub fn data(&self, id: NodeId) -> Option<&str> {
        self.get(id).kind.data()
    }

    /// Create a node.
    ///
    /// `kind` is one of the reserved kind names (`text`, `comment`,
    /// `directive`, `cdata`, `fragment`, `tag`); an empty kind makes a
    /// fragment and any other string makes a tag of that name.
    pub fn create(&mut self, kind: &str, config: NodeConfig) -> Result<NodeId, DomError> {
        if kind.is_empty() {
            return self.create_node(NodeType::Fragment, config);
        }
        match NodeType::from_name(kind) {
            Some(node_type) => self.create_node(node_type, config),
            None => self.create_node(
                NodeType::Tag,
                NodeConfig {
                    name: Some(kind.to_owned()),
                    ..config
                },
            ),
        }
    }

    /// Create a tag from a bare configuration, named `div` unless configured.
    pub fn create_element(&mut self, config: NodeConfig) -> Result<NodeId, DomError> {
        self.create_node(NodeType::Tag, config)
    }

    pub fn create_node(
        &mut self,
        node_type: NodeType,
        config: NodeConfig,
    ) -> Result<NodeId, DomError> {
        if !config.children.is_empty() && !node_type.is_container() {
            return Err(DomError::NotAContainer);
        }

        let mut data = NodeData::new(config.to_kind(node_type));
        data.render = config.render;
        let id = self.arena.new_node(data);
        trace!("created {} node {:?}", node_type, id);

        if !config.children.is_empty() {
            self.splice(id, 0, 0, config.children)?;
        }
        Ok(id)
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.arena.new_node(NodeData::new(NodeKind::Fragment))
    }

    /// Create a text node from unescaped text.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena
            .new_node(NodeData::new(NodeKind::Text(StrTendril::from(escape(text)))))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena
            .new_node(NodeData::new(NodeKind::Comment(StrTendril::from(text))))
    }

    /// Drop a detached node and its subtree from the arena.
    ///
    /// Nodes taken out of the tree by `remove`, `replace` or `splice` stay in
    /// the arena so they can be re-inserted; this frees them for good.
    pub fn dispose(&mut self, id: NodeId) {
        id.remove_subtree(&mut self.arena);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].first_child()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].last_child()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Parent of `id` and the position of `id` among its siblings.
    pub fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = parent.children(&self.arena).position(|child| child == id)?;
        Some((parent, index))
    }

    // =========================================================================
    // Tree splice
    // =========================================================================

    /// Remove `remove_count` children of `parent` starting at `index` and
    /// insert `insertions` in their place, as one update.
    ///
    /// `index` may equal the number of children only when nothing is removed
    /// (that appends). A removal running past the end is clamped. Inserted
    /// nodes attached elsewhere are moved. Nothing changes when an error is
    /// returned.
    ///
    /// Returns the removed nodes, detached but still in the arena; nodes that
    /// were removed and re-inserted by the same call are not listed.
    pub fn splice(
        &mut self,
        parent: NodeId,
        index: usize,
        remove_count: usize,
        insertions: impl Into<Insertions>,
    ) -> Result<Vec<NodeId>, DomError> {
        let Insertions(insertions) = insertions.into();

        if !self.node_type(parent).is_container() {
            return Err(DomError::NotAContainer);
        }

        let siblings: Vec<NodeId> = parent.children(&self.arena).collect();
        let len = siblings.len();
        if index > len || (index == len && remove_count > 0) {
            return Err(DomError::InvalidIndex { index, len });
        }

        // `ancestors` yields `parent` itself first
        if insertions
            .iter()
            .any(|&node| parent.ancestors(&self.arena).any(|ancestor| ancestor == node))
        {
            return Err(DomError::Cycle);
        }

        let end = index.saturating_add(remove_count).min(len);
        let anchor = siblings[end..]
            .iter()
            .copied()
            .find(|sibling| !insertions.contains(sibling));

        debug!(
            "splice: parent={:?}, index={}, removing={}, inserting={}, anchor={:?}",
            parent,
            index,
            end - index,
            insertions.len(),
            anchor
        );

        let mut removed = Vec::with_capacity(end - index);
        for &node in &siblings[index..end] {
            node.detach(&mut self.arena);
            if !insertions.contains(&node) {
                removed.push(node);
            }
        }

        for &node in &insertions {
            node.detach(&mut self.arena);
            let inserted = match anchor {
                Some(anchor) => anchor.checked_insert_before(node, &mut self.arena),
                None => parent.checked_append(node, &mut self.arena),
            };
            inserted.map_err(|_| DomError::Cycle)?;
        }

        Ok(removed)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let len = parent.children(&self.arena).count();
        self.splice(parent, len, 0, child).map(drop)
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.splice(parent, 0, 0, child).map(drop)
    }

    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), DomError> {
        let len = parent.children(&self.arena).count();
        self.splice(parent, len, 0, children).map(drop)
    }

    /// Insert `children` at the front of `parent`, keeping their order.
    pub fn prepend_children(
        &mut self,
        parent: NodeId,
        children: &[NodeId],
    ) -> Result<(), DomError> {
        self.splice(parent, 0, 0, children).map(drop)
    }

    /// Remove `child` from `parent`. Returns false if it is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, DomError> {
        match self.position(child) {
            Some((actual, index)) if actual == parent => {
                self.splice(parent, index, 1, ())?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Insert `next` right after `node`. Inert (returns false) if `node` has
    /// no parent.
    pub fn insert_after(&mut self, node: NodeId, next: NodeId) -> Result<bool, DomError> {
        let Some((parent, index)) = self.position(node) else {
            return Ok(false);
        };
        self.splice(parent, index + 1, 0, next)?;
        Ok(true)
    }

    /// Insert `previous` right before `node`. Inert (returns false) if `node`
    /// has no parent.
    pub fn insert_before(&mut self, node: NodeId, previous: NodeId) -> Result<bool, DomError> {
        let Some((parent, index)) = self.position(node) else {
            return Ok(false);
        };
        self.splice(parent, index, 0, previous)?;
        Ok(true)
    }

    /// Put `replacement` where `node` is. Inert (returns false) if `node` has
    /// no parent.
    pub fn replace(&mut self, node: NodeId, replacement: NodeId) -> Result<bool, DomError> {
        let Some((parent, index)) = self.position(node) else {
            return Ok(false);
        };
        self.splice(parent, index, 1, replacement)?;
        Ok(true)
    }

    /// Take `node` out of its parent. Inert (returns false) if it has none.
    pub fn remove(&mut self, node: NodeId) -> Result<bool, DomError> {
        let Some((parent, index)) = self.position(node) else {
            return Ok(false);
        };
        self.splice(parent, index, 1, ())?;
        Ok(true)
    }

    /// Remove all children; a text node has its data cleared instead.
    pub fn empty(&mut self, node: NodeId) -> Result<(), DomError> {
        if let NodeKind::Text(data) = &mut self.get_mut(node).kind {
            data.clear();
            return Ok(());
        }
        let len = node.children(&self.arena).count();
        if len > 0 {
            self.splice(node, 0, len, ())?;
        }
        Ok(())
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Unescaped text content of a node and its descendants.
    pub fn get_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(&mut out, id);
        out
    }

    fn collect_text(&self, out: &mut String, id: NodeId) {
        match &self.get(id).kind {
            NodeKind::Text(data) => out.push_str(&unescape(data)),
            NodeKind::Comment(_) | NodeKind::Directive(_) => {}
            NodeKind::Cdata(_) | NodeKind::Fragment | NodeKind::Element(_) => {
                for child in id.children(&self.arena) {
                    self.collect_text(out, child);
                }
            }
        }
    }

    /// Set the text of a node.
    ///
    /// A text node stores `text` escaped. A comment or directive stores it as
    /// its raw payload. Any other node has all of its children replaced by a
    /// single new text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        match &mut self.get_mut(id).kind {
            NodeKind::Text(data) => {
                *data = StrTendril::from(escape(text));
                Ok(())
            }
            NodeKind::Comment(data) | NodeKind::Directive(data) => {
                *data = StrTendril::from(text);
                Ok(())
            }
            NodeKind::Cdata(_) | NodeKind::Fragment | NodeKind::Element(_) => {
                let text_node = self.create_text(text);
                let len = id.children(&self.arena).count();
                self.splice(id, 0, len, text_node).map(drop)
            }
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.get(id).kind.as_element().map(|elem| &elem.attrs)
    }

    /// Attribute value; a boolean attribute present without a value reads
    /// as `""`.
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).kind.as_element()?.attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute. An empty value on a boolean attribute removes it.
    ///
    /// Returns false for nodes that are not tags.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        if value.is_empty() && self.vocabulary.is_boolean_attribute(name) {
            return self.remove_attribute(id, name) || self.get(id).kind.as_element().is_some();
        }
        match self.get_mut(id).kind.as_element_mut() {
            Some(elem) => {
                elem.attrs
                    .insert(name.to_owned(), Some(StrTendril::from(value)));
                true
            }
            None => false,
        }
    }

    /// Write a valueless attribute when `present`, remove it otherwise.
    pub fn set_boolean_attribute(&mut self, id: NodeId, name: &str, present: bool) -> bool {
        let Some(elem) = self.get_mut(id).kind.as_element_mut() else {
            return false;
        };
        if present {
            elem.attrs.insert(name.to_owned(), None);
        } else {
            elem.attrs.shift_remove(name);
        }
        true
    }

    /// Returns true if the attribute existed.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.get_mut(id)
            .kind
            .as_element_mut()
            .is_some_and(|elem| elem.attrs.shift_remove(name).is_some())
    }

    pub fn set_attributes<'a>(
        &mut self,
        id: NodeId,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> bool {
        let mut applied = true;
        for (name, value) in attributes {
            applied &= self.set_attribute(id, name, value);
        }
        applied
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let current = self.get_attribute(id, "class").unwrap_or("");
        if current.split_whitespace().any(|existing| existing == class) {
            return self.get(id).kind.as_element().is_some();
        }
        let updated = if current.trim().is_empty() {
            class.to_owned()
        } else {
            format!("{} {}", current.trim(), class)
        };
        self.set_attribute(id, "class", &updated)
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(current) = self.get_attribute(id, "class") else {
            return false;
        };
        let remaining: Vec<&str> = current
            .split_whitespace()
            .filter(|existing| *existing != class)
            .collect();
        let updated = remaining.join(" ");
        if updated.is_empty() {
            self.remove_attribute(id, "class");
            return true;
        }
        self.set_attribute(id, "class", &updated)
    }

    pub fn get_value(&self, id: NodeId) -> Option<&str> {
        self.get_attribute(id, "value")
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        self.set_attribute(id, "value", value)
    }

    pub fn get_checked(&self, id: NodeId) -> bool {
        self.has_attribute(id, "checked")
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> bool {
        self.set_boolean_attribute(id, "checked", checked)
    }

    // =========================================================================
    // Inline style
    // =========================================================================

    pub fn get_style(&self, id: NodeId) -> StyleMap {
        self.get_attribute(id, "style")
            .map(parse_style)
            .unwrap_or_default()
    }

    pub fn get_style_property(&self, id: NodeId, name: &str) -> Option<String> {
        self.get_style(id).shift_remove(name)
    }

    /// Set one style property; an empty value removes it.
    pub fn set_style(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let mut style = self.get_style(id);
        merge_property(&mut style, name, value);
        self.write_style(id, &style)
    }

    /// Merge `properties` into the inline style.
    pub fn set_styles(&mut self, id: NodeId, properties: &StyleMap) -> bool {
        let mut style = self.get_style(id);
        merge_properties(&mut style, properties);
        self.write_style(id, &style)
    }

    fn write_style(&mut self, id: NodeId, style: &StyleMap) -> bool {
        match style_attribute(style) {
            Some(value) => self.set_attribute(id, "style", &value),
            None => {
                self.remove_attribute(id, "style");
                self.get(id).kind.as_element().is_some()
            }
        }
    }

    /// Toggle whether the node (and its subtree) is serialized.
    pub fn set_render(&mut self, id: NodeId, render: bool) {
        self.get_mut(id).render = render;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_list(n: usize) -> (DetachedTree, NodeId, Vec<NodeId>) {
        let mut tree = DetachedTree::new();
        let ul = tree.create("ul", NodeConfig::new()).unwrap();
        let items: Vec<NodeId> = (0..n)
            .map(|_| tree.create("li", NodeConfig::new()).unwrap())
            .collect();
        tree.append_children(ul, &items).unwrap();
        (tree, ul, items)
    }

    fn assert_links(tree: &DetachedTree, parent: NodeId) {
        let children: Vec<NodeId> = tree.children(parent).collect();
        for (i, &child) in children.iter().enumerate() {
            assert_eq!(tree.parent(child), Some(parent));
            assert_eq!(tree.prev(child), i.checked_sub(1).map(|p| children[p]));
            assert_eq!(tree.next(child), children.get(i + 1).copied());
        }
    }

    #[test]
    fn test_create_kinds() {
        let mut tree = DetachedTree::new();
        let frag = tree.create("", NodeConfig::new()).unwrap();
        assert_eq!(tree.node_type(frag), NodeType::Fragment);

        let span = tree.create("SPAN", NodeConfig::new().name("ignored")).unwrap();
        assert_eq!(tree.node_type(span), NodeType::Tag);
        assert_eq!(tree.name_of(span).as_deref(), Some("span"));

        let tag = tree.create("tag", NodeConfig::new()).unwrap();
        assert_eq!(tree.name_of(tag).as_deref(), Some("div"));

        let plain = tree.create_element(NodeConfig::new().name("p")).unwrap();
        assert_eq!(tree.name_of(plain).as_deref(), Some("p"));

        let comment = tree.create("comment", NodeConfig::new().data("hi")).unwrap();
        assert_eq!(tree.data(comment), Some("hi"));
    }

    #[test]
    fn test_create_leaf_with_children_fails() {
        let mut tree = DetachedTree::new();
        let child = tree.create_text("x");
        let err = tree
            .create("text", NodeConfig::new().child(child))
            .unwrap_err();
        assert_eq!(err, DomError::NotAContainer);
    }

    #[test]
    fn test_splice_insert_middle() {
        let (mut tree, ul, items) = tree_with_list(3);
        let new = tree.create("li", NodeConfig::new()).unwrap();
        let removed = tree.splice(ul, 1, 0, new).unwrap();
        assert!(removed.is_empty());

        let children: Vec<_> = tree.children(ul).collect();
        assert_eq!(children, vec![items[0], new, items[1], items[2]]);
        assert_links(&tree, ul);
    }

    #[test]
    fn test_splice_replace_run() {
        let (mut tree, ul, items) = tree_with_list(4);
        let a = tree.create_text("a");
        let b = tree.create_text("b");
        let removed = tree.splice(ul, 1, 2, vec![a, b]).unwrap();

        assert_eq!(removed, vec![items[1], items[2]]);
        assert_eq!(tree.parent(items[1]), None);
        assert_eq!(tree.next(items[1]), None);
        let children: Vec<_> = tree.children(ul).collect();
        assert_eq!(children, vec![items[0], a, b, items[3]]);
        assert_links(&tree, ul);
    }

    #[test]
    fn test_splice_remove_only_repairs_neighbours() {
        let (mut tree, ul, items) = tree_with_list(3);
        tree.splice(ul, 1, 1, ()).unwrap();
        assert_eq!(tree.next(items[0]), Some(items[2]));
        assert_eq!(tree.prev(items[2]), Some(items[0]));
        assert_links(&tree, ul);
    }

    #[test]
    fn test_splice_append_at_len() {
        let (mut tree, ul, items) = tree_with_list(2);
        let new = tree.create_text("tail");
        tree.splice(ul, 2, 0, new).unwrap();
        assert_eq!(tree.last_child(ul), Some(new));
        assert_eq!(tree.prev(new), Some(items[1]));
        assert_links(&tree, ul);
    }

    #[test]
    fn test_splice_clamps_long_removal() {
        let (mut tree, ul, items) = tree_with_list(3);
        let removed = tree.splice(ul, 1, 10, ()).unwrap();
        assert_eq!(removed, vec![items[1], items[2]]);
        assert_eq!(tree.children(ul).count(), 1);
    }

    #[test]
    fn test_splice_invalid_index() {
        let (mut tree, ul, _) = tree_with_list(2);
        assert_eq!(
            tree.splice(ul, 3, 0, ()).unwrap_err(),
            DomError::InvalidIndex { index: 3, len: 2 }
        );
        assert_eq!(
            tree.splice(ul, 2, 1, ()).unwrap_err(),
            DomError::InvalidIndex { index: 2, len: 2 }
        );
        assert_eq!(tree.children(ul).count(), 2);
    }

    #[test]
    fn test_splice_rejects_cycle() {
        let (mut tree, ul, items) = tree_with_list(2);
        let outer = tree.create("div", NodeConfig::new()).unwrap();
        tree.append_child(outer, ul).unwrap();
        assert_eq!(tree.splice(items[0], 0, 0, outer).unwrap_err(), DomError::Cycle);

        let text = tree.create_text("leaf");
        tree.append_child(items[1], text).unwrap();
        assert_eq!(tree.splice(text, 0, 0, ()).unwrap_err(), DomError::NotAContainer);

        let inner = tree.create("span", NodeConfig::new()).unwrap();
        tree.append_child(items[0], inner).unwrap();
        assert_eq!(tree.splice(inner, 0, 0, ul).unwrap_err(), DomError::Cycle);
        assert_eq!(tree.splice(ul, 0, 0, ul).unwrap_err(), DomError::Cycle);
        assert_links(&tree, ul);
    }

    #[test]
    fn test_splice_moves_attached_node() {
        let (mut tree, ul, items) = tree_with_list(3);
        let ol = tree.create("ol", NodeConfig::new()).unwrap();
        tree.splice(ol, 0, 0, items[1]).unwrap();

        assert_eq!(tree.parent(items[1]), Some(ol));
        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![items[0], items[2]]);
        assert_links(&tree, ul);
        assert_links(&tree, ol);
    }

    #[test]
    fn test_splice_reorders_within_parent() {
        let (mut tree, ul, items) = tree_with_list(3);
        // move the last item to the front
        tree.splice(ul, 0, 0, items[2]).unwrap();
        assert_eq!(
            tree.children(ul).collect::<Vec<_>>(),
            vec![items[2], items[0], items[1]]
        );
        assert_links(&tree, ul);
    }

    #[test]
    fn test_sibling_helpers_are_inert_without_parent() {
        let mut tree = DetachedTree::new();
        let lone = tree.create("p", NodeConfig::new()).unwrap();
        let other = tree.create_text("x");
        assert!(!tree.remove(lone).unwrap());
        assert!(!tree.replace(lone, other).unwrap());
        assert!(!tree.insert_after(lone, other).unwrap());
        assert!(!tree.insert_before(lone, other).unwrap());
        assert_eq!(tree.parent(other), None);
    }

    #[test]
    fn test_insert_after_and_before() {
        let (mut tree, ul, items) = tree_with_list(2);
        let after = tree.create_text("after");
        let before = tree.create_text("before");
        assert!(tree.insert_after(items[0], after).unwrap());
        assert!(tree.insert_before(items[0], before).unwrap());
        assert_eq!(
            tree.children(ul).collect::<Vec<_>>(),
            vec![before, items[0], after, items[1]]
        );
        assert_links(&tree, ul);
    }

    #[test]
    fn test_replace_and_remove_child() {
        let (mut tree, ul, items) = tree_with_list(3);
        let new = tree.create("li", NodeConfig::new()).unwrap();
        assert!(tree.replace(items[1], new).unwrap());
        assert_eq!(tree.parent(items[1]), None);
        assert!(tree.remove_child(ul, items[0]).unwrap());
        assert!(!tree.remove_child(ul, items[0]).unwrap());
        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![new, items[2]]);
        assert_links(&tree, ul);
    }

    #[test]
    fn test_prepend_children_keeps_order() {
        let (mut tree, ul, items) = tree_with_list(1);
        let a = tree.create_text("a");
        let b = tree.create_text("b");
        tree.prepend_children(ul, &[a, b]).unwrap();
        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![a, b, items[0]]);
    }

    #[test]
    fn test_empty() {
        let (mut tree, ul, _) = tree_with_list(3);
        tree.empty(ul).unwrap();
        assert_eq!(tree.first_child(ul), None);

        let text = tree.create_text("gone");
        tree.empty(text).unwrap();
        assert_eq!(tree.data(text), Some(""));
    }

    #[test]
    fn test_text_is_stored_escaped() {
        let mut tree = DetachedTree::new();
        let p = tree.create("p", NodeConfig::new()).unwrap();
        tree.set_text(p, "a < b").unwrap();

        let child = tree.first_child(p).unwrap();
        assert_eq!(tree.data(child), Some("a &lt; b"));
        assert_eq!(tree.get_text(p), "a < b");
    }

    #[test]
    fn test_set_text_replaces_all_children() {
        let (mut tree, ul, items) = tree_with_list(3);
        tree.set_text(ul, "flat").unwrap();
        assert_eq!(tree.children(ul).count(), 1);
        assert_eq!(tree.parent(items[0]), None);
        assert_eq!(tree.get_text(ul), "flat");
    }

    #[test]
    fn test_get_text_skips_comments() {
        let mut tree = DetachedTree::new();
        let div = tree.create("div", NodeConfig::new()).unwrap();
        let a = tree.create_text("one ");
        let c = tree.create_comment("hidden");
        let b = tree.create_text("& two");
        tree.append_children(div, &[a, c, b]).unwrap();
        assert_eq!(tree.get_text(div), "one & two");
        assert_eq!(tree.get_text(c), "");
    }

    #[test]
    fn test_boolean_attribute_falsy_removes() {
        let mut tree = DetachedTree::new();
        let input = tree
            .create("input", NodeConfig::new().boolean_attr("disabled"))
            .unwrap();
        assert_eq!(tree.get_attribute(input, "disabled"), Some(""));

        assert!(tree.set_attribute(input, "disabled", ""));
        assert!(!tree.has_attribute(input, "disabled"));

        assert!(tree.set_attribute(input, "title", ""));
        assert_eq!(tree.get_attribute(input, "title"), Some(""));
    }

    #[test]
    fn test_attribute_setters_are_inert_on_text() {
        let mut tree = DetachedTree::new();
        let text = tree.create_text("x");
        assert!(!tree.set_attribute(text, "id", "a"));
        assert_eq!(tree.get_attribute(text, "id"), None);
        assert!(!tree.set_style(text, "color", "red"));
    }

    #[test]
    fn test_classes() {
        let mut tree = DetachedTree::new();
        let div = tree.create("div", NodeConfig::new()).unwrap();
        tree.add_class(div, "a");
        tree.add_class(div, "b");
        tree.add_class(div, "a");
        assert_eq!(tree.get_attribute(div, "class"), Some("a b"));
        tree.remove_class(div, "a");
        assert_eq!(tree.get_attribute(div, "class"), Some("b"));
        tree.remove_class(div, "b");
        assert!(!tree.has_attribute(div, "class"));
    }

    #[test]
    fn test_value_and_checked() {
        let mut tree = DetachedTree::new();
        let input = tree.create("input", NodeConfig::new()).unwrap();
        tree.set_value(input, "42");
        assert_eq!(tree.get_value(input), Some("42"));

        assert!(!tree.get_checked(input));
        tree.set_checked(input, true);
        assert!(tree.get_checked(input));
        assert_eq!(tree.attributes(input).unwrap()["checked"], None);
        tree.set_checked(input, false);
        assert!(!tree.get_checked(input));
    }

    #[test]
    fn test_style_accessors() {
        let mut tree = DetachedTree::new();
        let div = tree
            .create("div", NodeConfig::new().attr("style", "color: red; margin: 0"))
            .unwrap();
        assert_eq!(tree.get_style_property(div, "color").as_deref(), Some("red"));

        tree.set_style(div, "padding", "1px");
        assert_eq!(
            tree.get_attribute(div, "style"),
            Some("color:red;margin:0;padding:1px;")
        );

        tree.set_style(div, "color", "");
        let mut more = StyleMap::new();
        more.insert("margin".into(), "2px".into());
        tree.set_styles(div, &more);
        assert_eq!(tree.get_attribute(div, "style"), Some("margin:2px;padding:1px;"));

        tree.set_style(div, "margin", "");
        tree.set_style(div, "padding", "");
        assert!(!tree.has_attribute(div, "style"));
    }

    #[test]
    fn test_dispose_frees_subtree() {
        let (mut tree, ul, items) = tree_with_list(2);
        tree.remove(ul).unwrap();
        tree.dispose(ul);
        assert!(!tree.contains(ul));
        assert!(!tree.contains(items[0]));
    }
}
