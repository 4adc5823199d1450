//! Escaping for the five reserved markup characters.
//!
//! Text node data is kept in escaped form, so `escape` runs when text is
//! written into the tree and `unescape` when it is read back out.

use std::fmt;

/// Reserved characters and the entities they are written as.
const ENTITIES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#039;"),
];

fn entity(c: char) -> Option<&'static str> {
    ENTITIES
        .iter()
        .find(|(reserved, _)| *reserved == c)
        .map(|(_, entity)| *entity)
}

/// Replace `& < > " '` with their entities in one pass.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_into(&mut out, text);
    out
}

/// Like [`escape`], writing into any `fmt::Write` sink.
pub fn escape_into<W: fmt::Write>(out: &mut W, text: &str) -> fmt::Result {
    let mut rest = text;
    while let Some((pos, escaped)) = rest
        .char_indices()
        .find_map(|(pos, c)| entity(c).map(|escaped| (pos, escaped)))
    {
        out.write_str(&rest[..pos])?;
        out.write_str(escaped)?;
        // every reserved character is one byte
        rest = &rest[pos + 1..];
    }
    out.write_str(rest)
}

/// Replace each of the five known entities with its character.
///
/// Single left-to-right pass: replaced output is never rescanned, so
/// `&amp;lt;` becomes `&lt;`. Unknown entities and stray `&` are copied as-is.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match ENTITIES
            .iter()
            .find(|(_, entity)| rest.starts_with(entity))
        {
            Some((c, entity)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_reserved() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_passes_other_text_through() {
        assert_eq!(escape("plain text, ünïcode"), "plain text, ünïcode");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        for s in ["a < b && c > d", "\"quoted\" 'single'", "&", "no entities"] {
            assert_eq!(unescape(&escape(s)), s);
        }
    }

    #[test]
    fn test_escape_into_writes_to_sink() {
        let mut out = String::from("<p title=\"");
        escape_into(&mut out, "x\"y").unwrap();
        assert_eq!(out, "<p title=\"x&quot;y");
    }

    #[test]
    fn test_every_entity_round_trips() {
        for (c, entity) in ENTITIES {
            assert_eq!(escape(&c.to_string()), entity);
            assert_eq!(unescape(entity), c.to_string());
        }
    }

    #[test]
    fn test_unescape_is_single_pass() {
        assert_eq!(unescape("&amp;lt;"), "&lt;");
        assert_eq!(unescape("&amp;amp;"), "&amp;");
    }

    #[test]
    fn test_unescape_leaves_unknown_entities() {
        assert_eq!(unescape("&nbsp;&copy; & x"), "&nbsp;&copy; & x");
        assert_eq!(unescape("trailing &"), "trailing &");
        assert_eq!(unescape("&#039;&#39;"), "'&#39;");
    }
}
