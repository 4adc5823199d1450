//! Codec for the inline `style` attribute.

use indexmap::IndexMap;

/// Ordered property → value mapping of an inline style.
pub type StyleMap = IndexMap<String, String>;

/// Parse `name: value; name2: value2` into an ordered map.
///
/// Each declaration is split on its first `:`, with whitespace trimmed around
/// name and value. Blank declarations and declarations without a `:` are
/// skipped. A later duplicate overwrites the value but keeps the first
/// position.
pub fn parse_style(raw: &str) -> StyleMap {
    let mut style = StyleMap::new();

    for declaration in raw.split(';') {
        if declaration.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        style.insert(name.trim().to_owned(), value.trim().to_owned());
    }

    style
}

/// Render a style map as `name:value;` pairs in map order.
pub fn render_style(style: &StyleMap) -> String {
    let mut out = String::new();
    for (name, value) in style {
        out.push_str(name);
        out.push(':');
        out.push_str(value);
        out.push(';');
    }
    out
}

/// Set one property in `style`; an empty value removes it.
pub fn merge_property(style: &mut StyleMap, name: &str, value: &str) {
    if value.is_empty() {
        style.shift_remove(name);
    } else {
        style.insert(name.to_owned(), value.to_owned());
    }
}

/// Merge every property of `properties` into `style`, in order.
pub fn merge_properties(style: &mut StyleMap, properties: &StyleMap) {
    for (name, value) in properties {
        merge_property(style, name, value);
    }
}

/// The `style` attribute value for `style`, or `None` when the attribute
/// should be removed.
pub fn style_attribute(style: &StyleMap) -> Option<String> {
    if style.is_empty() {
        None
    } else {
        Some(render_style(style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tolerates_whitespace() {
        let style = parse_style(" color : red ;margin:0 auto;; ");
        assert_eq!(style.len(), 2);
        assert_eq!(style["color"], "red");
        assert_eq!(style["margin"], "0 auto");
    }

    #[test]
    fn test_parse_splits_on_first_colon() {
        let style = parse_style("background:url(http://example.com/a.png)");
        assert_eq!(style["background"], "url(http://example.com/a.png)");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_style("").is_empty());
        assert!(parse_style("   ").is_empty());
        assert!(parse_style("nocolon").is_empty());
    }

    #[test]
    fn test_render_keeps_order() {
        let mut style = StyleMap::new();
        style.insert("width".into(), "10px".into());
        style.insert("color".into(), "blue".into());
        assert_eq!(render_style(&style), "width:10px;color:blue;");
        assert_eq!(render_style(&StyleMap::new()), "");
    }

    #[test]
    fn test_render_then_parse_is_identity() {
        let mut style = StyleMap::new();
        style.insert("display".into(), "flex".into());
        style.insert("gap".into(), "4px".into());
        style.insert("font-family".into(), "serif".into());
        assert_eq!(parse_style(&render_style(&style)), style);
    }

    #[test]
    fn test_merge_policy() {
        let mut style = parse_style("color: red; width: 1px");
        merge_property(&mut style, "color", "");
        merge_property(&mut style, "margin", "0");
        assert_eq!(render_style(&style), "width:1px;margin:0;");

        let mut more = StyleMap::new();
        more.insert("width".into(), "".into());
        more.insert("margin".into(), "".into());
        merge_properties(&mut style, &more);
        assert!(style.is_empty());
        assert_eq!(style_attribute(&style), None);

        merge_property(&mut style, "color", "blue");
        assert_eq!(style_attribute(&style).as_deref(), Some("color:blue;"));
    }
}
