//! Node-kind predicates derived from the tag name.
//!
//! Everything here is a pure function over [`NodeKind`] and the tag
//! string; the editing layer never dispatches on anything else.

use crate::dom::node::{Dom, NodeId};

/// Minimal markup that keeps an otherwise-empty container
/// cursor-addressable.
pub const BLANK_HTML: &str = "<br>";

/// An empty, cursor-addressable paragraph.
pub const EMPTY_PARA: &str = "<p><br></p>";

/// Non-breaking space, treated as a space by the word-range walks.
pub const NBSP: char = '\u{a0}';

const VOID_TAGS: &[&str] = &[
    "br", "img", "hr", "iframe", "button", "input", "audio", "video",
];

impl Dom {
    /// Whether `id` is the editable root. Upward walks stop here.
    pub fn is_editable(&self, id: NodeId) -> bool {
        id == self.root()
    }

    fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    /// Void (self-closing) elements carry no children and no length.
    pub fn is_void(&self, id: NodeId) -> bool {
        match self.tag(id) {
            Some(tag) => VOID_TAGS.contains(&tag),
            None => false,
        }
    }

    pub fn is_br(&self, id: NodeId) -> bool {
        self.has_tag(id, "br")
    }

    pub fn is_hr(&self, id: NodeId) -> bool {
        self.has_tag(id, "hr")
    }

    pub fn is_anchor(&self, id: NodeId) -> bool {
        self.has_tag(id, "a")
    }

    /// Paragraph-like blocks: the direct targets of inline splitting.
    pub fn is_para(&self, id: NodeId) -> bool {
        if self.is_editable(id) {
            return false;
        }
        match self.tag(id) {
            Some("div") | Some("p") | Some("li") => true,
            Some(tag) => is_heading_tag(tag),
            None => false,
        }
    }

    pub fn is_heading(&self, id: NodeId) -> bool {
        self.tag(id).is_some_and(is_heading_tag)
    }

    pub fn is_li(&self, id: NodeId) -> bool {
        self.has_tag(id, "li")
    }

    /// Paragraph that is not a list item.
    pub fn is_pure_para(&self, id: NodeId) -> bool {
        self.is_para(id) && !self.is_li(id)
    }

    pub fn is_list(&self, id: NodeId) -> bool {
        matches!(self.tag(id), Some("ul") | Some("ol"))
    }

    pub fn is_table(&self, id: NodeId) -> bool {
        self.has_tag(id, "table")
    }

    pub fn is_cell(&self, id: NodeId) -> bool {
        matches!(self.tag(id), Some("td") | Some("th"))
    }

    pub fn is_row(&self, id: NodeId) -> bool {
        self.has_tag(id, "tr")
    }

    pub fn is_blockquote(&self, id: NodeId) -> bool {
        self.has_tag(id, "blockquote")
    }

    pub fn is_data(&self, id: NodeId) -> bool {
        self.has_tag(id, "data")
    }

    /// Containers whose children behave like a document body: block
    /// splitting roots at the nearest one of these.
    pub fn is_body_container(&self, id: NodeId) -> bool {
        self.is_cell(id) || self.is_blockquote(id) || self.is_editable(id)
    }

    /// Inline content: text, and every element that is not one of the
    /// block-shaped kinds.
    pub fn is_inline(&self, id: NodeId) -> bool {
        !self.is_body_container(id)
            && !self.is_list(id)
            && !self.is_hr(id)
            && !self.is_para(id)
            && !self.is_table(id)
            && !self.is_blockquote(id)
            && !self.is_data(id)
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        !self.is_inline(id)
    }

    /// Inline node that already lives inside a paragraph.
    pub fn is_para_inline(&self, id: NodeId) -> bool {
        self.is_inline(id) && self.ancestor(id, |d, n| d.is_para(n)).is_some()
    }

    /// The three-way emptiness rule. A node is empty when it has zero
    /// length, when its only content is the blank placeholder, or when it
    /// consists entirely of empty text and serializes to nothing.
    pub fn is_empty(&self, id: NodeId) -> bool {
        let len = self.node_len(id);
        if len == 0 {
            return true;
        }
        if !self.is_text(id) && len == 1 && self.inner_html(id) == BLANK_HTML {
            return true;
        }
        if self.children(id).iter().all(|&c| self.is_text(c)) && self.inner_html(id).is_empty() {
            return true;
        }
        false
    }

    /// Pads an empty, non-void element with the blank placeholder so it
    /// stays cursor-addressable.
    pub fn pad_blank_html(&mut self, id: NodeId) {
        if !self.is_element(id) || self.is_void(id) || self.node_len(id) != 0 {
            return;
        }
        let br = self.create_element("br");
        if self.append_child(id, br).is_err() {
            log::warn!("pad_blank_html: could not pad {id:?}");
        }
    }
}

fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "h7")
}
