//! Read-only element and attribute tables consulted by the serializer, the
//! parser sink and the attribute setters.

/// Attributes whose presence alone carries meaning. A valueless occurrence is
/// written as just the name.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "defer",
    "disabled",
    "hidden",
    "loop",
    "multiple",
    "open",
    "readonly",
    "required",
    "scoped",
    "selected",
];

/// Elements that never have content and self-close when childless.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "embed", "frame", "hr", "img", "input", "isindex",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text content the HTML tokenizer does not decode.
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// The set of tables a tree is serialized and edited against.
///
/// [`Vocabulary::html`] is the default; a custom vocabulary can be injected
/// with [`DetachedTree::with_vocabulary`](crate::DetachedTree::with_vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    pub boolean_attributes: &'static [&'static str],
    pub void_elements: &'static [&'static str],
    pub raw_text_elements: &'static [&'static str],
}

impl Vocabulary {
    pub const fn html() -> Self {
        Self {
            boolean_attributes: BOOLEAN_ATTRIBUTES,
            void_elements: VOID_ELEMENTS,
            raw_text_elements: RAW_TEXT_ELEMENTS,
        }
    }

    pub fn is_boolean_attribute(&self, name: &str) -> bool {
        contains_ignore_case(self.boolean_attributes, name)
    }

    pub fn is_void_element(&self, tag: &str) -> bool {
        contains_ignore_case(self.void_elements, tag)
    }

    pub fn is_raw_text_element(&self, tag: &str) -> bool {
        contains_ignore_case(self.raw_text_elements, tag)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::html()
    }
}

fn contains_ignore_case(table: &[&str], name: &str) -> bool {
    table.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_ignore_case() {
        let vocab = Vocabulary::html();
        assert!(vocab.is_void_element("BR"));
        assert!(vocab.is_boolean_attribute("Disabled"));
        assert!(vocab.is_raw_text_element("script"));
        assert!(vocab.is_raw_text_element("PLAINTEXT"));
        assert!(!vocab.is_void_element("div"));
        assert!(!vocab.is_boolean_attribute("value"));
    }
}
