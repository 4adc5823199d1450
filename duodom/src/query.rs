//! Selector queries.
//!
//! Selector syntax is not interpreted here. A [`SelectorMatcher`] installed on
//! the tree compiles selector strings; this module only walks the tree and
//! asks the compiled selector about each candidate.

use indextree::NodeId;
use std::fmt;
use std::ops::Deref;

use crate::error::DomError;
use crate::node::NodeType;
use crate::tree::DetachedTree;

/// Compiles selector strings into [`CompiledSelector`]s.
pub trait SelectorMatcher {
    /// Compile `selector`, failing with [`DomError::InvalidSelector`] when the
    /// matcher cannot make sense of it.
    fn compile(&self, selector: &str) -> Result<Box<dyn CompiledSelector>, DomError>;
}

/// A selector ready to be tested against nodes.
pub trait CompiledSelector {
    fn matches(&self, tree: &DetachedTree, node: NodeId) -> bool;
}

/// A selector as handed to a query: raw text or already compiled.
#[derive(Clone, Copy)]
pub enum Query<'q> {
    Raw(&'q str),
    Compiled(&'q dyn CompiledSelector),
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(selector) => f.debug_tuple("Raw").field(selector).finish(),
            Query::Compiled(_) => f.write_str("Compiled(..)"),
        }
    }
}

impl<'q> From<&'q str> for Query<'q> {
    fn from(selector: &'q str) -> Self {
        Query::Raw(selector)
    }
}

impl<'q> From<&'q String> for Query<'q> {
    fn from(selector: &'q String) -> Self {
        Query::Raw(selector)
    }
}

impl<'q> From<&'q dyn CompiledSelector> for Query<'q> {
    fn from(selector: &'q dyn CompiledSelector) -> Self {
        Query::Compiled(selector)
    }
}

impl<'q> From<&'q Box<dyn CompiledSelector>> for Query<'q> {
    fn from(selector: &'q Box<dyn CompiledSelector>) -> Self {
        Query::Compiled(selector.as_ref())
    }
}

/// A compiled selector, either compiled for this query or borrowed from the
/// caller.
enum Selector<'q> {
    Owned(Box<dyn CompiledSelector>),
    Borrowed(&'q dyn CompiledSelector),
}

impl<'q> Deref for Selector<'q> {
    type Target = dyn CompiledSelector + 'q;

    fn deref(&self) -> &Self::Target {
        match self {
            Selector::Owned(selector) => selector.as_ref(),
            Selector::Borrowed(selector) => *selector,
        }
    }
}

impl DetachedTree {
    /// Compile `selector` with the installed matcher.
    pub fn selector_compile(&self, selector: &str) -> Result<Box<dyn CompiledSelector>, DomError> {
        match self.matcher() {
            Some(matcher) => matcher.compile(selector),
            None => Err(DomError::unsupported("selector_compile", "detached")),
        }
    }

    fn resolve<'q>(&self, query: Query<'q>) -> Result<Selector<'q>, DomError> {
        match query {
            Query::Raw(selector) => self.selector_compile(selector).map(Selector::Owned),
            Query::Compiled(selector) => Ok(Selector::Borrowed(selector)),
        }
    }

    /// Tag descendants of `root` in document order, `root` excluded.
    fn candidates(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        root.descendants(&self.arena)
            .skip(1)
            .filter(|&node| self.node_type(node) == NodeType::Tag)
    }

    /// First matching descendant of `root`.
    pub fn find_one<'q>(
        &self,
        root: NodeId,
        query: impl Into<Query<'q>>,
    ) -> Result<Option<NodeId>, DomError> {
        let selector = self.resolve(query.into())?;
        Ok(self
            .candidates(root)
            .find(|&node| selector.matches(self, node)))
    }

    /// All matching descendants of `root`, in document order.
    pub fn find_all<'q>(
        &self,
        root: NodeId,
        query: impl Into<Query<'q>>,
    ) -> Result<Vec<NodeId>, DomError> {
        let selector = self.resolve(query.into())?;
        Ok(self
            .candidates(root)
            .filter(|&node| selector.matches(self, node))
            .collect())
    }

    pub fn matches<'q>(&self, node: NodeId, query: impl Into<Query<'q>>) -> Result<bool, DomError> {
        let selector = self.resolve(query.into())?;
        Ok(selector.matches(self, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    /// Matches elements by tag name; `*` matches every element.
    struct TagMatcher;

    struct TagSelector(String);

    impl SelectorMatcher for TagMatcher {
        fn compile(&self, selector: &str) -> Result<Box<dyn CompiledSelector>, DomError> {
            let selector = selector.trim();
            let valid = selector
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '*');
            if selector.is_empty() || !valid {
                return Err(DomError::InvalidSelector {
                    selector: selector.to_owned(),
                });
            }
            Ok(Box::new(TagSelector(selector.to_ascii_lowercase())))
        }
    }

    impl CompiledSelector for TagSelector {
        fn matches(&self, tree: &DetachedTree, node: NodeId) -> bool {
            self.0 == "*" || tree.name_of(node).as_deref() == Some(self.0.as_str())
        }
    }

    #[test]
    fn test_find_in_document_order() {
        let (mut tree, root) = parse("<div><p>1</p><section><p>2</p></section></div><p>3</p>");
        tree.set_matcher(TagMatcher);

        let all = tree.find_all(root, "p").unwrap();
        let texts: Vec<String> = all.iter().map(|&p| tree.get_text(p)).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);

        let first = tree.find_one(root, "p").unwrap().unwrap();
        assert_eq!(first, all[0]);
        assert_eq!(tree.find_one(root, "table").unwrap(), None);
    }

    #[test]
    fn test_root_is_excluded() {
        let (mut tree, root) = parse("<div><div></div></div>");
        tree.set_matcher(TagMatcher);
        let outer = tree.first_child(root).unwrap();
        assert_eq!(tree.find_all(outer, "div").unwrap().len(), 1);
        assert!(tree.matches(outer, "div").unwrap());
    }

    #[test]
    fn test_compiled_query_skips_matcher() {
        let (mut tree, root) = parse("<b></b><i></i>");
        tree.set_matcher(TagMatcher);
        let compiled = tree.selector_compile("i").unwrap();

        assert!(tree.take_matcher().is_some());
        let found = tree.find_one(root, &compiled).unwrap();
        assert_eq!(found.and_then(|n| tree.name_of(n)).as_deref(), Some("i"));
    }

    #[test]
    fn test_raw_query_without_matcher_is_unsupported() {
        let (tree, root) = parse("<b></b>");
        assert_eq!(
            tree.find_all(root, "b").unwrap_err(),
            DomError::Unsupported {
                operation: "selector_compile".into(),
                backend: "detached".into(),
            }
        );
    }

    #[test]
    fn test_invalid_selector_propagates() {
        let (mut tree, root) = parse("<b></b>");
        tree.set_matcher(TagMatcher);
        assert!(matches!(
            tree.find_one(root, "b > i"),
            Err(DomError::InvalidSelector { .. })
        ));
    }
}
