//! Markup tree toolkit built on indextree and html5ever.
//!
//! duodom provides:
//! - **Detached tree**: an arena-backed markup tree with consistent
//!   parent/sibling links under any edit, driven by a single splice primitive
//! - **Parsing**: browser-compatible HTML5 parsing via html5ever, straight
//!   into the arena
//! - **Serialization**: markup reconstruction with attribute escaping, boolean
//!   attributes, void elements and comment/directive/CDATA framing
//! - **Facade**: one API over the detached tree and a host-provided live tree
//!
//! # Example
//!
//! ```rust
//! use duodom::{NodeConfig, parse};
//!
//! let (mut tree, root) = parse(r#"<ul><li>one</li></ul>"#);
//! let ul = tree.first_child(root).unwrap();
//!
//! let li = tree.create("li", NodeConfig::new().attr("class", "new")).unwrap();
//! tree.set_text(li, "two & three").unwrap();
//! tree.append_child(ul, li).unwrap();
//!
//! assert_eq!(
//!     tree.outer_html(ul),
//!     r#"<ul><li>one</li><li class="new">two &amp; three</li></ul>"#
//! );
//! ```

mod tracing_macros;
#[allow(unused_imports)]
pub(crate) use tracing_macros::{debug, trace};

pub mod backend;
pub mod error;
pub mod escape;
pub mod facade;
pub mod node;
pub mod parser;
pub mod query;
pub mod serialize;
pub mod style;
pub mod tree;
pub mod vocabulary;

pub use indextree::NodeId;

pub use backend::{MarkupBackend, NoLiveTree};
pub use error::DomError;
pub use escape::{escape, escape_into, unescape};
pub use facade::{AnyNode, Markup};
pub use node::{Attributes, ElementData, Namespace, NodeConfig, NodeData, NodeKind, NodeType};
pub use parser::{ParseOptions, parse};
pub use query::{CompiledSelector, Query, SelectorMatcher};
pub use serialize::SerializeOptions;
pub use style::{
    StyleMap, merge_properties, merge_property, parse_style, render_style, style_attribute,
};
pub use tree::{DetachedTree, Insertions};
pub use vocabulary::Vocabulary;
