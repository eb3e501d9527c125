//! Ordered ranges over the document tree.
//!
//! A [`Range`] is a pair of boundary points with `start <= end` in
//! document order. Ranges are value types: every operation returns a new
//! range and leaves the receiver untouched, even the ones that edit the
//! tree. All editing entry points funnel through here.

use regex::Regex;

use crate::dom::{Dom, EMPTY_PARA, NodeId, parse_fragment, set_inner_html};
use crate::editing::bookmark::{Bookmark, BookmarkPoint, from_offset_path, make_offset_path};
use crate::editing::point::{
    Point, is_char_point, is_edge_point, is_left_edge_point, is_left_edge_point_of,
    is_right_edge_point, is_right_edge_point_of, is_space_point, is_visible_point, next_point,
    next_point_until, prev_point, prev_point_until, walk_point,
};
use crate::editing::selection::Selection;
use crate::editing::split::split_point;

/// Node-enumeration options for [`Range::nodes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFilter {
    /// Report the nearest matching ancestor of each visited node instead
    /// of the node itself.
    pub include_ancestor: bool,
    /// Report only nodes whose entire extent lies inside the range.
    pub fully_contains: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    pub fn new(start: Point, end: Point) -> Self {
        Range { start, end }
    }

    pub fn collapsed(point: Point) -> Self {
        Range {
            start: point,
            end: point,
        }
    }

    /// Range spanning `node` from the parent's perspective. Void and
    /// line-break endpoints are lifted to the parent, which is where a
    /// caret can actually sit.
    pub fn from_node(dom: &Dom, node: NodeId) -> Self {
        let mut sc = node;
        let mut so = 0;
        let mut ec = node;
        let mut eo = dom.node_len(node);
        if dom.is_void(sc) {
            so = dom.position(sc);
            sc = dom.parent(sc).unwrap_or(sc);
        }
        if dom.is_br(ec) {
            eo = dom.position(ec) + 1;
            ec = dom.parent(ec).unwrap_or(ec);
        }
        Range {
            start: Point::new(sc, so),
            end: Point::new(ec, eo),
        }
    }

    /// Collapsed range just before `node`.
    pub fn before_node(dom: &Dom, node: NodeId) -> Self {
        Self::from_node(dom, node).collapse(true)
    }

    /// Collapsed range just after `node`.
    pub fn after_node(dom: &Dom, node: NodeId) -> Self {
        Self::from_node(dom, node).collapse(false)
    }

    /// Orders a host selection into a range.
    pub fn from_selection(dom: &Dom, selection: &Selection) -> Self {
        if selection.is_forward(dom) {
            Range::new(selection.anchor, selection.focus)
        } else {
            Range::new(selection.focus, selection.anchor)
        }
    }

    pub fn from_bookmark(dom: &Dom, bookmark: &Bookmark) -> Self {
        let root = dom.root();
        Range {
            start: Point::new(
                from_offset_path(dom, root, &bookmark.start.path),
                bookmark.start.offset,
            ),
            end: Point::new(
                from_offset_path(dom, root, &bookmark.end.path),
                bookmark.end.offset,
            ),
        }
    }

    /// Resolves a paragraph-relative bookmark against the given
    /// paragraph run.
    pub fn from_para_bookmark(dom: &Dom, bookmark: &Bookmark, paras: &[NodeId]) -> Self {
        let first = paras.first().copied().unwrap_or(dom.root());
        let last = paras.last().copied().unwrap_or(dom.root());
        Range {
            start: Point::new(
                from_offset_path(dom, first, &bookmark.start.path),
                bookmark.start.offset,
            ),
            end: Point::new(
                from_offset_path(dom, last, &bookmark.end.path),
                bookmark.end.offset,
            ),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Collapses to the start (`true`) or end (`false`) point.
    pub fn collapse(&self, to_start: bool) -> Range {
        if to_start {
            Range::collapsed(self.start)
        } else {
            Range::collapsed(self.end)
        }
    }

    pub fn common_ancestor(&self, dom: &Dom) -> Option<NodeId> {
        dom.common_ancestor(self.start.node, self.end.node)
    }

    fn is_on(&self, dom: &Dom, pred: impl Fn(&Dom, NodeId) -> bool) -> bool {
        let start = dom.ancestor(self.start.node, |d, n| pred(d, n));
        start.is_some() && start == dom.ancestor(self.end.node, |d, n| pred(d, n))
    }

    pub fn is_on_anchor(&self, dom: &Dom) -> bool {
        self.is_on(dom, Dom::is_anchor)
    }

    pub fn is_on_cell(&self, dom: &Dom) -> bool {
        self.is_on(dom, Dom::is_cell)
    }

    pub fn is_on_list(&self, dom: &Dom) -> bool {
        self.is_on(dom, Dom::is_list)
    }

    pub fn is_on_data(&self, dom: &Dom) -> bool {
        self.is_on(dom, Dom::is_data)
    }

    /// Widens each endpoint independently to the nearest enclosing
    /// ancestor matching `pred`; endpoints with no such ancestor stay
    /// put.
    pub fn expand(&self, dom: &Dom, pred: impl Fn(&Dom, NodeId) -> bool) -> Range {
        let start_ancestor = dom.ancestor(self.start.node, |d, n| pred(d, n));
        let end_ancestor = dom.ancestor(self.end.node, |d, n| pred(d, n));
        let start = match start_ancestor {
            Some(node) => Point::new(node, 0),
            None => self.start,
        };
        let end = match end_ancestor {
            Some(node) => Point::new(node, dom.node_len(node)),
            None => self.end,
        };
        Range { start, end }
    }

    /// Moves both endpoints to the nearest visible (caret-addressable)
    /// points, end first; a collapsed range stays collapsed.
    pub fn normalize(&self, dom: &Dom) -> Range {
        let end = visible_point(dom, self.end, false);
        let start = if self.is_collapsed() {
            end
        } else {
            visible_point(dom, self.start, true)
        };
        Range { start, end }
    }

    /// Nodes touched by the range, in document order, filtered by `pred`.
    pub fn nodes(
        &self,
        dom: &Dom,
        pred: impl Fn(&Dom, NodeId) -> bool,
        filter: NodeFilter,
    ) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = Vec::new();
        let mut left_edge_nodes: Vec<NodeId> = Vec::new();
        walk_point(
            dom,
            self.start,
            self.end,
            |d, point| {
                if d.is_editable(point.node) {
                    return;
                }
                let node = if filter.fully_contains {
                    if is_left_edge_point(point) {
                        left_edge_nodes.push(point.node);
                    }
                    if is_right_edge_point(d, point) && left_edge_nodes.contains(&point.node) {
                        Some(point.node)
                    } else {
                        None
                    }
                } else if filter.include_ancestor {
                    d.ancestor(point.node, |dd, n| pred(dd, n))
                } else {
                    Some(point.node)
                };
                if let Some(n) = node {
                    if pred(d, n) && !nodes.contains(&n) {
                        nodes.push(n);
                    }
                }
            },
            true,
        );
        nodes
    }

    /// Plain text between the endpoints.
    pub fn text(&self, dom: &Dom) -> String {
        let mut out = String::new();
        let mut point = Some(self.start);
        let mut first = true;
        while let Some(p) = point {
            if !first && p.offset > 0 && dom.is_text(p.node) {
                if let Some(ch) = crate::editing::point::char_before(dom, p) {
                    out.push(ch);
                }
            }
            if p == self.end {
                break;
            }
            point = next_point(dom, p, false);
            first = false;
        }
        out
    }

    /// Splits the boundary text nodes so both endpoints land on node
    /// edges. Returns the adjusted range; the tree gains at most two
    /// text nodes.
    pub fn split_text(&self, dom: &mut Dom) -> Range {
        let same_container = self.start.node == self.end.node;
        let mut start = self.start;
        let mut end = self.end;
        if dom.is_text(end.node) && !is_edge_point(dom, end) {
            dom.split_text_node(end.node, end.offset).ok();
        }
        if dom.is_text(start.node) && !is_edge_point(dom, start) {
            if let Ok(right) = dom.split_text_node(start.node, start.offset) {
                if same_container {
                    end = Point::new(right, end.offset - start.offset);
                }
                start = Point::new(right, 0);
            }
        }
        Range { start, end }
    }

    /// Removes everything inside the range and returns the collapsed,
    /// normalized caret position. Parents left with nothing but removed
    /// content are dropped as well.
    pub fn delete_contents(&self, dom: &mut Dom) -> Range {
        if self.is_collapsed() {
            return *self;
        }
        let rng = self.split_text(dom);
        let nodes = rng.nodes(
            dom,
            |_, _| true,
            NodeFilter {
                fully_contains: true,
                ..NodeFilter::default()
            },
        );

        let point = prev_point_until(dom, rng.start, |_, p| !nodes.contains(&p.node))
            .unwrap_or(rng.start);

        let mut empty_parents: Vec<NodeId> = Vec::new();
        for &node in &nodes {
            if let Some(parent) = dom.parent(node) {
                if point.node != parent
                    && dom.node_len(parent) == 1
                    && !empty_parents.contains(&parent)
                {
                    empty_parents.push(parent);
                }
            }
            dom.remove(node, false);
        }
        for parent in empty_parents {
            dom.remove(parent, false);
        }

        Range::collapsed(point).normalize(dom)
    }

    /// Inserts `node` at the start point, splitting the surrounding tree
    /// as needed. Inline nodes replace the range content; block nodes
    /// ignore it.
    pub fn insert_node(&self, dom: &mut Dom, node: NodeId) -> NodeId {
        self.insert_node_with(dom, node, false)
    }

    fn insert_node_with(&self, dom: &mut Dom, node: NodeId, do_not_insert_para: bool) -> NodeId {
        let rng = if dom.is_text(node) || dom.is_inline(node) {
            self.wrap_body_inline_with_para(dom).delete_contents(dom)
        } else {
            *self
        };

        let info = split_point(dom, rng.start, dom.is_inline(node));
        match info.right_node {
            Some(right) => {
                dom.insert_before(node, right).ok();
                if dom.is_empty(right) && (do_not_insert_para || dom.is_para(node)) {
                    dom.remove(right, true);
                }
            }
            None => {
                dom.append_child(info.container, node).ok();
            }
        }
        node
    }

    /// Parses `markup` and inserts the resulting nodes at the start
    /// point, preserving their order. Returns the inserted top-level
    /// nodes.
    pub fn paste_html(&self, dom: &mut Dom, markup: &str) -> Vec<NodeId> {
        let mut children = parse_fragment(dom, markup.trim());
        // inserting back-to-front at a fixed point keeps document order
        children.reverse();
        let mut inserted = Vec::with_capacity(children.len());
        for child in children {
            let do_not_insert_para = !dom.is_inline(child);
            inserted.push(self.insert_node_with(dom, child, do_not_insert_para));
        }
        inserted.reverse();
        inserted
    }

    /// Ensures the start point sits inside a paragraph, wrapping loose
    /// inline runs (and filling an empty body container) first.
    pub(crate) fn wrap_body_inline_with_para(&self, dom: &mut Dom) -> Range {
        if dom.is_body_container(self.start.node) && dom.is_empty(self.start.node) {
            set_inner_html(dom, self.start.node, EMPTY_PARA);
            let first = dom.first_child(self.start.node).unwrap_or(self.start.node);
            return Range::collapsed(Point::new(first, 0));
        }

        let rng = self.normalize(dom);
        if dom.is_para_inline(rng.start.node) || dom.is_para(rng.start.node) {
            return rng;
        }

        let top_ancestor = if dom.is_inline(rng.start.node) {
            let ancestors = dom.list_ancestor(rng.start.node, |d, n| !d.is_inline(n));
            match ancestors.last().copied() {
                Some(last) if !dom.is_inline(last) => ancestors
                    .len()
                    .checked_sub(2)
                    .map(|i| ancestors[i])
                    .or_else(|| dom.child(rng.start.node, rng.start.offset)),
                other => other,
            }
        } else {
            let index = rng.start.offset.saturating_sub(1);
            dom.child(rng.start.node, index)
        };

        if let Some(top) = top_ancestor {
            let mut siblings = dom.list_prev(top, |d, n| !d.is_inline(n));
            siblings.reverse();
            if let Some(next) = dom.next_sibling(top) {
                siblings.extend(dom.list_next(next, |d, n| !d.is_inline(n)));
            }
            if let Some(&head) = siblings.first() {
                if let Ok(para) = dom.wrap(head, "p") {
                    dom.append_children(para, &siblings[1..]);
                }
            }
        }
        self.normalize(dom)
    }

    /// Expands the end point to the word around it; with `find_after`
    /// the range also extends forward to the end of the word.
    pub fn word_range(&self, dom: &Dom, find_after: bool) -> Range {
        let end = self.end;
        if !is_char_point(dom, end) {
            return *self;
        }
        let start = prev_point_until(dom, end, |d, p| !is_char_point(d, p)).unwrap_or(end);
        let end = if find_after {
            next_point_until(dom, end, |d, p| !is_char_point(d, p)).unwrap_or(end)
        } else {
            end
        };
        Range { start, end }
    }

    /// Expands the end point backward across words and spaces to the
    /// nearest non-text boundary.
    pub fn words_range(&self, dom: &Dom) -> Range {
        let not_text = |d: &Dom, p: Point| !is_char_point(d, p) && !is_space_point(d, p);
        let end = self.end;
        if not_text(dom, end) {
            return *self;
        }
        let start = prev_point_until(dom, end, not_text).unwrap_or(end);
        Range { start, end }
    }

    /// Walks backward from the end point looking for the longest trailing
    /// run fully matched by `regex`; `None` when the run does not match
    /// exactly.
    pub fn words_match_range(&self, dom: &Dom, regex: &Regex) -> Option<Range> {
        let end = self.end;
        let start = prev_point_until(dom, end, |d, p| {
            if !is_char_point(d, p) && !is_space_point(d, p) {
                return true;
            }
            let text = Range { start: p, end }.text(d);
            regex.find(&text).is_some_and(|m| m.start() == 0)
        })?;
        let rng = Range { start, end };
        let text = rng.text(dom);
        let matched = regex.find(&text)?;
        if matched.start() == 0 && matched.end() == text.len() {
            Some(rng)
        } else {
            None
        }
    }

    /// Root-relative bookmark for both endpoints.
    pub fn bookmark(&self, dom: &Dom) -> Bookmark {
        let root = dom.root();
        Bookmark {
            start: BookmarkPoint {
                path: make_offset_path(dom, root, self.start.node),
                offset: self.start.offset,
            },
            end: BookmarkPoint {
                path: make_offset_path(dom, root, self.end.node),
                offset: self.end.offset,
            },
        }
    }

    /// Bookmark relative to a paragraph run: the start path is anchored
    /// at the first paragraph, the end path at the last.
    pub fn para_bookmark(&self, dom: &Dom, paras: &[NodeId]) -> Bookmark {
        let first = paras.first().copied().unwrap_or(dom.root());
        let last = paras.last().copied().unwrap_or(dom.root());
        let mut start_path = make_offset_path(dom, first, self.start.node);
        if !start_path.is_empty() {
            start_path.remove(0);
        }
        let mut end_path = make_offset_path(dom, last, self.end.node);
        if !end_path.is_empty() {
            end_path.remove(0);
        }
        Bookmark {
            start: BookmarkPoint {
                path: start_path,
                offset: self.start.offset,
            },
            end: BookmarkPoint {
                path: end_path,
                offset: self.end.offset,
            },
        }
    }
}

/// Nearest caret-addressable point, searching in the given direction and
/// flipping at block edges flanked by existing content.
fn visible_point(dom: &Dom, point: Point, left_to_right: bool) -> Point {
    let mut left_to_right = left_to_right;
    if is_visible_point(dom, point) {
        let next_is_void = dom
            .next_sibling(point.node)
            .is_some_and(|n| dom.is_void(n));
        let prev_is_void = dom
            .prev_sibling(point.node)
            .is_some_and(|n| dom.is_void(n));
        if !is_edge_point(dom, point)
            || (is_right_edge_point(dom, point) && !left_to_right)
            || (is_left_edge_point(point) && left_to_right)
            || (is_right_edge_point(dom, point) && left_to_right && next_is_void)
            || (is_left_edge_point(point) && !left_to_right && prev_is_void)
            || (dom.is_block(point.node) && dom.is_empty(point.node))
        {
            return point;
        }
    }

    let block = dom.ancestor(point.node, |d, n| d.is_block(n));
    let has_right_node = !left_to_right
        && (block.is_some_and(|b| is_left_edge_point_of(dom, point, b))
            || prev_point(dom, point, false).is_some_and(|p| dom.is_void(p.node)));
    let has_left_node = left_to_right
        && (block.is_some_and(|b| is_right_edge_point_of(dom, point, b))
            || next_point(dom, point, false).is_some_and(|p| dom.is_void(p.node)));
    if has_right_node || has_left_node {
        if is_visible_point(dom, point) {
            return point;
        }
        left_to_right = !left_to_right;
    }

    let found = if left_to_right {
        next_point(dom, point, false)
            .and_then(|p| next_point_until(dom, p, |d, pt| is_visible_point(d, pt)))
    } else {
        prev_point(dom, point, false)
            .and_then(|p| prev_point_until(dom, p, |d, pt| is_visible_point(d, pt)))
    };
    found.unwrap_or(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first_text(dom: &Dom) -> NodeId {
        let p = dom.first_child(dom.root()).unwrap();
        dom.first_child(p).unwrap()
    }

    #[test]
    fn normalize_moves_element_points_into_text() {
        let dom = Dom::from_html("<p>ab</p>");
        let root = dom.root();
        let text = first_text(&dom);
        let rng = Range::collapsed(Point::new(root, 0)).normalize(&dom);
        assert_eq!(rng.start, Point::new(text, 0));
        let rng = Range::collapsed(Point::new(root, 1)).normalize(&dom);
        assert_eq!(rng.start, Point::new(text, 2));
    }

    #[test]
    fn text_reads_the_covered_characters() {
        let dom = Dom::from_html("<p>hello <b>world</b></p>");
        let text = first_text(&dom);
        let p = dom.first_child(dom.root()).unwrap();
        let b = dom.last_child(p).unwrap();
        let bt = dom.first_child(b).unwrap();
        let rng = Range::new(Point::new(text, 3), Point::new(bt, 2));
        assert_eq!(rng.text(&dom), "lo wo");
    }

    #[test]
    fn nodes_fully_contains_skips_partials() {
        let dom = Dom::from_html("<p>a<b>x</b>c</p>");
        let p = dom.first_child(dom.root()).unwrap();
        let rng = Range::new(Point::new(p, 0), Point::new(p, 3));
        let texts = rng.nodes(
            &dom,
            |d, n| d.is_text(n),
            NodeFilter {
                fully_contains: true,
                ..NodeFilter::default()
            },
        );
        let contents: Vec<_> = texts.iter().map(|&n| dom.text(n).unwrap()).collect();
        assert_eq!(contents, vec!["a", "x", "c"]);

        // a range starting inside "a" no longer fully contains it
        let a = dom.first_child(p).unwrap();
        let partial = Range::new(Point::new(a, 1), Point::new(p, 3));
        let texts = partial.nodes(
            &dom,
            |d, n| d.is_text(n),
            NodeFilter {
                fully_contains: true,
                ..NodeFilter::default()
            },
        );
        let contents: Vec<_> = texts.iter().map(|&n| dom.text(n).unwrap()).collect();
        assert_eq!(contents, vec!["x", "c"]);
    }

    #[test]
    fn expand_widens_to_the_enclosing_ancestor() {
        let dom = Dom::from_html("<p>ab</p><p>cd</p>");
        let root = dom.root();
        let p1 = dom.first_child(root).unwrap();
        let p2 = dom.last_child(root).unwrap();
        let t1 = dom.first_child(p1).unwrap();
        let t2 = dom.first_child(p2).unwrap();
        let rng = Range::new(Point::new(t1, 1), Point::new(t2, 1)).expand(&dom, Dom::is_para);
        assert_eq!(rng.start, Point::new(p1, 0));
        assert_eq!(rng.end, Point::new(p2, 1));
        // no matching ancestor leaves the endpoint alone
        let same = Range::collapsed(Point::new(t1, 1)).expand(&dom, Dom::is_cell);
        assert_eq!(same.start, Point::new(t1, 1));
    }

    #[test]
    fn delete_contents_removes_the_selection() {
        let mut dom = Dom::from_html("<p>hello world</p>");
        let text = first_text(&dom);
        let rng = Range::new(Point::new(text, 5), Point::new(text, 11));
        let caret = rng.delete_contents(&mut dom);
        assert_eq!(dom.inner_html(dom.root()), "<p>hello</p>");
        // the caret lands right after the surviving text
        assert!(caret.is_collapsed());
        assert_eq!(caret.start, Point::new(text, 5));
    }

    #[test]
    fn delete_contents_drops_emptied_wrappers() {
        let mut dom = Dom::from_html("<p>a<b>xy</b>c</p>");
        let p = dom.first_child(dom.root()).unwrap();
        let rng = Range::new(Point::new(p, 1), Point::new(p, 2));
        rng.delete_contents(&mut dom);
        assert_eq!(dom.inner_html(dom.root()), "<p>ac</p>");
    }

    #[test]
    fn paste_html_preserves_fragment_order() {
        let mut dom = Dom::from_html("<p>ab</p>");
        let text = first_text(&dom);
        let rng = Range::collapsed(Point::new(text, 1));
        rng.paste_html(&mut dom, "<b>X</b>Y");
        assert_eq!(dom.inner_html(dom.root()), "<p>a<b>X</b>Yb</p>");
    }

    #[test]
    fn insert_block_node_splits_the_paragraph() {
        let mut dom = Dom::from_html("<p>ab</p>");
        let text = first_text(&dom);
        let hr = dom.create_element("hr");
        Range::collapsed(Point::new(text, 1)).insert_node(&mut dom, hr);
        assert_eq!(dom.inner_html(dom.root()), "<p>a</p><hr><p>b</p>");
    }

    #[test]
    fn word_range_expands_to_word_edges() {
        let dom = Dom::from_html("<p>hello world</p>");
        let text = first_text(&dom);
        let rng = Range::collapsed(Point::new(text, 8)).word_range(&dom, true);
        assert_eq!(rng.text(&dom), "world");
        // a caret after a space does not expand
        let after_space = Range::collapsed(Point::new(text, 6));
        assert_eq!(after_space.word_range(&dom, true), after_space);
    }

    #[test]
    fn words_range_crosses_spaces() {
        let dom = Dom::from_html("<p>one two three</p>");
        let text = first_text(&dom);
        let rng = Range::collapsed(Point::new(text, 13)).words_range(&dom);
        assert_eq!(rng.start, Point::new(text, 0));
    }

    #[test]
    fn words_match_range_requires_a_full_match() {
        let dom = Dom::from_html("<p>hi @bob</p>");
        let text = first_text(&dom);
        let regex = Regex::new(r"@[a-z]+").unwrap();
        let rng = Range::collapsed(Point::new(text, 7))
            .words_match_range(&dom, &regex)
            .unwrap();
        assert_eq!(rng.text(&dom), "@bob");

        let plain = Dom::from_html("<p>hi bob</p>");
        let text = first_text(&plain);
        assert_eq!(
            Range::collapsed(Point::new(text, 6)).words_match_range(&plain, &regex),
            None
        );
    }

    #[test]
    fn bookmark_round_trips_through_serde() {
        let dom = Dom::from_html("<p>a</p><p><b>xy</b></p>");
        let root = dom.root();
        let p2 = dom.last_child(root).unwrap();
        let b = dom.first_child(p2).unwrap();
        let xy = dom.first_child(b).unwrap();
        let rng = Range::new(Point::new(xy, 1), Point::new(xy, 2));
        let bookmark = rng.bookmark(&dom);
        let json = serde_json::to_string(&bookmark).unwrap();
        let restored: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(Range::from_bookmark(&dom, &restored), rng);
    }

    #[test]
    fn para_bookmark_is_relative_to_the_run() {
        let dom = Dom::from_html("<p>ab</p><p>cd</p>");
        let root = dom.root();
        let p1 = dom.first_child(root).unwrap();
        let p2 = dom.last_child(root).unwrap();
        let t1 = dom.first_child(p1).unwrap();
        let t2 = dom.first_child(p2).unwrap();
        let rng = Range::new(Point::new(t1, 1), Point::new(t2, 1));
        let bookmark = rng.para_bookmark(&dom, &[p1, p2]);
        assert_eq!(bookmark.start.path, vec![0]);
        assert_eq!(bookmark.end.path, vec![0]);
        assert_eq!(Range::from_para_bookmark(&dom, &bookmark, &[p1, p2]), rng);
    }

    #[test]
    fn is_on_cell_needs_both_ends_in_one_cell() {
        let dom = Dom::from_html("<table><tr><td>a</td><td>b</td></tr></table>");
        let table = dom.first_child(dom.root()).unwrap();
        let tr = dom.first_child(table).unwrap();
        let td1 = dom.first_child(tr).unwrap();
        let td2 = dom.last_child(tr).unwrap();
        let a = dom.first_child(td1).unwrap();
        let b = dom.first_child(td2).unwrap();
        assert!(Range::collapsed(Point::new(a, 0)).is_on_cell(&dom));
        assert!(!Range::new(Point::new(a, 0), Point::new(b, 1)).is_on_cell(&dom));
    }
}
