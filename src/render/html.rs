//! HTML serialisation of the render tree.

use std::fmt::Write;

use super::{Element, VNode};

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr"];

/// Serialises rendered nodes to an HTML fragment.
///
/// Text and attribute values are escaped; nothing else is added, so the
/// output can be embedded directly into a page.
#[must_use]
pub fn to_html(nodes: &[VNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &VNode) {
    match node {
        VNode::Text(text) => escape_into(out, text, false),
        VNode::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.tag);
    for (name, value) in &element.attrs {
        let _ = write!(out, " {name}=\"");
        escape_into(out, value, true);
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&element.tag) {
        return;
    }

    for child in &element.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{}>", element.tag);
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let node = VNode::Element(Element {
            tag: "a",
            attrs: vec![("href", "/x?a=1&b=\"2\"".to_string())],
            children: vec![VNode::Text("<b> & 'c'".to_string())],
        });
        assert_eq!(
            to_html(&[node]),
            "<a href=\"/x?a=1&amp;b=&quot;2&quot;\">&lt;b&gt; &amp; 'c'</a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node = VNode::Element(Element {
            tag: "br",
            attrs: Vec::new(),
            children: Vec::new(),
        });
        assert_eq!(to_html(&[node]), "<br>");
    }
}
