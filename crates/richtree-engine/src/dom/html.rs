//! Markup serialization for tree nodes.
//!
//! The emptiness rule compares a node's inner markup against the blank
//! placeholder, and tests assert on serialized trees, so the serializer
//! lives next to the node model rather than in a rendering layer.

use crate::dom::node::{Dom, NodeId, NodeKind};
use crate::dom::predicates::NBSP;

impl Dom {
    /// Serialized markup of the node's children (text content for a text
    /// node).
    pub fn inner_html(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Text(text) => escape_text(text),
            NodeKind::Element { children, .. } => {
                let mut out = String::new();
                for &child in children {
                    out.push_str(&self.outer_html(child));
                }
                out
            }
        }
    }

    /// Serialized markup of the node itself, including its tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Text(text) => escape_text(text),
            NodeKind::Element { tag, attrs, .. } => {
                let mut out = String::new();
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if !self.is_void(id) {
                    out.push_str(&self.inner_html(id));
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
                out
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            NBSP => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
