//! Node model: what lives in each arena slot of a [`DetachedTree`](crate::DetachedTree).

use facet::Facet;
use html5ever::tendril::StrTendril;
use indexmap::IndexMap;
use indextree::NodeId;
use std::fmt;

/// The six kinds of markup node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum NodeType {
    Text,
    Comment,
    Directive,
    Cdata,
    Fragment,
    Tag,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Text => "text",
            NodeType::Comment => "comment",
            NodeType::Directive => "directive",
            NodeType::Cdata => "cdata",
            NodeType::Fragment => "fragment",
            NodeType::Tag => "tag",
        }
    }

    /// Look up one of the reserved kind names. Anything else is a tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(NodeType::Text),
            "comment" => Some(NodeType::Comment),
            "directive" => Some(NodeType::Directive),
            "cdata" => Some(NodeType::Cdata),
            "fragment" => Some(NodeType::Fragment),
            "tag" => Some(NodeType::Tag),
            _ => None,
        }
    }

    /// Whether nodes of this kind may have children.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Tag | NodeType::Fragment | NodeType::Cdata)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XML namespace of an element, as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Facet)]
#[repr(u8)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/2000/svg" => Namespace::Svg,
            "http://www.w3.org/1998/Math/MathML" => Namespace::MathMl,
            _ => Namespace::Html,
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

/// Attribute map. Keys keep insertion order; a `None` value is a boolean
/// attribute present without a value.
pub type Attributes = IndexMap<String, Option<StrTendril>>;

/// Element data (tag name + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name as written; compare through [`ElementData::name_lower`].
    pub name: StrTendril,
    pub attrs: Attributes,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: StrTendril::from(name),
            attrs: Attributes::new(),
        }
    }

    pub fn name_lower(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Attribute value, with a boolean-present attribute reading as `""`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .get(name)
            .map(|value| value.as_ref().map_or("", |v| &**v))
    }
}

/// Per-kind payload. A variant carries only the fields its kind uses.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Text, stored escaped
    Text(StrTendril),
    Comment(StrTendril),
    /// `<{data}>`, e.g. `!DOCTYPE html`
    Directive(StrTendril),
    /// CDATA section; its rendered content comes from its children
    Cdata(StrTendril),
    Fragment,
    Element(ElementData),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::Directive(_) => NodeType::Directive,
            NodeKind::Cdata(_) => NodeType::Cdata,
            NodeKind::Fragment => NodeType::Fragment,
            NodeKind::Element(_) => NodeType::Tag,
        }
    }

    /// Raw payload of text, comment, directive and cdata nodes.
    pub fn data(&self) -> Option<&str> {
        match self {
            NodeKind::Text(data)
            | NodeKind::Comment(data)
            | NodeKind::Directive(data)
            | NodeKind::Cdata(data) => Some(&**data),
            NodeKind::Fragment | NodeKind::Element(_) => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut StrTendril> {
        match self {
            NodeKind::Text(data)
            | NodeKind::Comment(data)
            | NodeKind::Directive(data)
            | NodeKind::Cdata(data) => Some(data),
            NodeKind::Fragment | NodeKind::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub ns: Namespace,
    /// When false the node and its subtree serialize to nothing.
    pub render: bool,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ns: Namespace::Html,
            render: true,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}

/// Field overrides for [`DetachedTree::create`](crate::DetachedTree::create).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub name: Option<String>,
    pub attributes: Vec<(String, Option<String>)>,
    /// Stored verbatim; text data is expected in escaped form.
    pub data: Option<String>,
    pub children: Vec<NodeId>,
    pub render: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: None,
            attributes: Vec::new(),
            data: None,
            children: Vec::new(),
            render: true,
        }
    }
}

impl NodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), Some(value.into())));
        self
    }

    /// Add an attribute that is present without a value.
    pub fn boolean_attr(mut self, name: impl Into<String>) -> Self {
        self.attributes.push((name.into(), None));
        self
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn child(mut self, child: NodeId) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    /// Build the payload for a node of `node_type`.
    ///
    /// Tags fall back to `div` when no name is configured.
    pub(crate) fn to_kind(&self, node_type: NodeType) -> NodeKind {
        let data = || StrTendril::from(self.data.as_deref().unwrap_or(""));
        match node_type {
            NodeType::Text => NodeKind::Text(data()),
            NodeType::Comment => NodeKind::Comment(data()),
            NodeType::Directive => NodeKind::Directive(data()),
            NodeType::Cdata => NodeKind::Cdata(data()),
            NodeType::Fragment => NodeKind::Fragment,
            NodeType::Tag => {
                let mut elem = ElementData::new(self.name.as_deref().unwrap_or("div"));
                for (name, value) in &self.attributes {
                    elem.attrs
                        .insert(name.clone(), value.as_deref().map(StrTendril::from));
                }
                NodeKind::Element(elem)
            }
        }
    }
}
