//! HTML serialization.

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Write an opening tag.
pub(crate) fn open_tag(
    out: &mut String,
    tag: &str,
    classes: &[String],
    attrs: &[(String, String)],
) {
    out.push('<');
    out.push_str(tag);
    if !classes.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_attr(&classes.join(" ")));
        out.push('"');
    }
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
}

/// Write a closing tag, unless the element is void.
pub(crate) fn close_tag(out: &mut String, tag: &str) {
    if is_void(tag) {
        return;
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr(r#"say "hi" it's"#), "say &quot;hi&quot; it&#39;s");
    }

    #[test]
    fn test_tags() {
        let mut out = String::new();
        open_tag(
            &mut out,
            "img",
            &["a".to_string(), "b".to_string()],
            &[("alt".to_string(), "x\"y".to_string())],
        );
        close_tag(&mut out, "img");
        assert_eq!(out, r#"<img class="a b" alt="x&quot;y">"#);

        let mut out = String::new();
        open_tag(&mut out, "p", &[], &[]);
        close_tag(&mut out, "p");
        assert_eq!(out, "<p></p>");
    }
}
