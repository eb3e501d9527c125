//! Permissive markup-fragment parser.
//!
//! This is a fragment builder, not a conforming HTML parser: tags it does
//! not recognize become ordinary elements, comments are skipped, a
//! mismatched close tag pops up to its nearest open match (or is ignored),
//! and a stray `<` that starts no tag is treated as text. That is enough
//! for paste payloads and for building test fixtures.

use crate::dom::node::{Dom, NodeId};

/// Parses `markup` into detached nodes owned by `dom` and returns the
/// top-level nodes in document order.
pub fn parse_fragment(dom: &mut Dom, markup: &str) -> Vec<NodeId> {
    let mut roots: Vec<NodeId> = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut text = String::new();

    let bytes = markup.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if markup[i..].starts_with("<!--") {
                flush_text(dom, &mut stack, &mut roots, &mut text);
                i = match markup[i..].find("-->") {
                    Some(end) => i + end + 3,
                    None => bytes.len(),
                };
                continue;
            }
            if let Some((consumed, token)) = parse_tag(&markup[i..]) {
                flush_text(dom, &mut stack, &mut roots, &mut text);
                match token {
                    TagToken::Open {
                        tag,
                        attrs,
                        self_closing,
                    } => {
                        let node = dom.create_element(&tag);
                        for (name, value) in attrs {
                            dom.set_attr(node, &name, &value);
                        }
                        attach(dom, &stack, &mut roots, node);
                        if !self_closing && !dom.is_void(node) {
                            stack.push(node);
                        }
                    }
                    TagToken::Close(tag) => {
                        if let Some(at) = stack.iter().rposition(|&n| dom.tag(n) == Some(&*tag)) {
                            stack.truncate(at);
                        } else {
                            log::debug!("parse_fragment: ignoring unmatched </{tag}>");
                        }
                    }
                }
                i += consumed;
                continue;
            }
        }
        let ch = markup[i..].chars().next().unwrap_or('\u{fffd}');
        push_char(&mut text, &markup[i..], ch, &mut i);
    }
    flush_text(dom, &mut stack, &mut roots, &mut text);
    roots
}

/// Replaces the children of `node` with the parse of `markup`.
pub fn set_inner_html(dom: &mut Dom, node: NodeId, markup: &str) {
    dom.clear_children(node);
    let parsed = parse_fragment(dom, markup);
    dom.append_children(node, &parsed);
}

impl Dom {
    /// Builds a tree whose editable root is a `div` holding the parse of
    /// `markup`.
    pub fn from_html(markup: &str) -> Dom {
        let mut dom = Dom::new("div");
        let root = dom.root();
        let parsed = parse_fragment(&mut dom, markup);
        dom.append_children(root, &parsed);
        dom
    }
}

fn push_char(text: &mut String, rest: &str, ch: char, i: &mut usize) {
    if ch == '&' {
        if let Some((entity, len)) = parse_entity(rest) {
            text.push(entity);
            *i += len;
            return;
        }
    }
    text.push(ch);
    *i += ch.len_utf8();
}

fn flush_text(dom: &mut Dom, stack: &[NodeId], roots: &mut Vec<NodeId>, text: &mut String) {
    if text.is_empty() {
        return;
    }
    let node = dom.create_text(text);
    attach(dom, stack, roots, node);
    text.clear();
}

fn attach(dom: &mut Dom, stack: &[NodeId], roots: &mut Vec<NodeId>, node: NodeId) {
    match stack.last() {
        Some(&parent) => dom.append_children(parent, &[node]),
        None => roots.push(node),
    }
}

enum TagToken {
    Open {
        tag: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    Close(String),
}

/// Parses one tag starting at `<`. Returns the byte length consumed and
/// the token, or `None` when the input is not a tag.
fn parse_tag(input: &str) -> Option<(usize, TagToken)> {
    let bytes = input.as_bytes();
    let mut i = 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric()) {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let tag = input[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => return None,
            Some(b'>') => {
                i += 1;
                break;
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                self_closing = true;
                i += 2;
                break;
            }
            Some(_) => {
                let (len, attr) = parse_attr(&input[i..])?;
                i += len;
                if !closing {
                    attrs.push(attr);
                }
            }
        }
    }
    let token = if closing {
        TagToken::Close(tag)
    } else {
        TagToken::Open {
            tag,
            attrs,
            self_closing,
        }
    };
    Some((i, token))
}

fn parse_attr(input: &str) -> Option<(usize, (String, String))> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/')
    {
        i += 1;
    }
    if i == 0 {
        return None;
    }
    let name = input[..i].to_ascii_lowercase();
    if bytes.get(i) != Some(&b'=') {
        return Some((i, (name, String::new())));
    }
    i += 1;
    let quote = match bytes.get(i) {
        Some(&q @ (b'"' | b'\'')) => {
            i += 1;
            Some(q)
        }
        _ => None,
    };
    let value_start = i;
    match quote {
        Some(q) => {
            while i < bytes.len() && bytes[i] != q {
                i += 1;
            }
            let value = decode_entities(&input[value_start..i]);
            if i < bytes.len() {
                i += 1;
            }
            Some((i, (name, value)))
        }
        None => {
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                i += 1;
            }
            Some((i, (name, decode_entities(&input[value_start..i]))))
        }
    }
}

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let ch = input[i..].chars().next().unwrap_or('\u{fffd}');
        push_char(&mut out, &input[i..], ch, &mut i);
    }
    out
}

/// Parses one entity starting at `&`. Unknown entities stay literal.
fn parse_entity(input: &str) -> Option<(char, usize)> {
    let end = input.find(';').filter(|&e| e <= 12)?;
    let body = &input[1..end];
    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((ch, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip(markup: &str) -> String {
        let dom = Dom::from_html(markup);
        dom.inner_html(dom.root())
    }

    #[test]
    fn parses_nested_markup() {
        assert_eq!(
            round_trip("<p>hello <b>world</b></p>"),
            "<p>hello <b>world</b></p>"
        );
    }

    #[test]
    fn parses_attributes() {
        assert_eq!(
            round_trip("<a href=\"https://example.com\" target=_blank>x</a>"),
            "<a href=\"https://example.com\" target=\"_blank\">x</a>"
        );
    }

    #[test]
    fn void_and_self_closing_tags_take_no_children() {
        assert_eq!(round_trip("<p>a<br>b</p>"), "<p>a<br>b</p>");
        assert_eq!(round_trip("<p>a<br/>b</p>"), "<p>a<br>b</p>");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(round_trip("a &amp; b &lt;c&gt;"), "a &amp; b &lt;c&gt;");
        let dom = Dom::from_html("x&nbsp;y &#65; &#x42;");
        let text = dom.first_child(dom.root()).unwrap();
        assert_eq!(dom.text(text), Some("x\u{a0}y A B"));
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let dom = Dom::from_html("1 < 2");
        let text = dom.first_child(dom.root()).unwrap();
        assert_eq!(dom.text(text), Some("1 < 2"));
    }

    #[test]
    fn unmatched_close_tag_is_ignored() {
        assert_eq!(round_trip("<p>a</b>b</p>"), "<p>ab</p>");
    }

    #[test]
    fn mismatched_nesting_pops_to_match() {
        assert_eq!(round_trip("<p><b>a</p>b"), "<p><b>a</b></p>b");
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(round_trip("a<!-- note -->b"), "ab");
    }

    #[test]
    fn table_fixture() {
        assert_eq!(
            round_trip("<table><tr><td colspan=\"2\">a</td></tr></table>"),
            "<table><tr><td colspan=\"2\">a</td></tr></table>"
        );
    }

    #[test]
    fn set_inner_html_replaces_children() {
        let mut dom = Dom::from_html("<p>old</p>");
        let root = dom.root();
        set_inner_html(&mut dom, root, "<p><br></p>");
        assert_eq!(dom.inner_html(root), "<p><br></p>");
    }
}
