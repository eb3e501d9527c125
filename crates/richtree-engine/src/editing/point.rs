//! Boundary points and the point-walk primitives.
//!
//! A [`Point`] addresses a position *between* things: between two
//! characters of a text node, or between two children of an element. All
//! range traversal, visibility checks, and word scans are built from the
//! `prev_point` / `next_point` steps defined here. Walks never fail: a
//! step off the editable root simply yields `None`.

use crate::dom::{Dom, NBSP, NodeId};

/// A boundary position: `offset` characters into a text node, or before
/// the `offset`-th child of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub node: NodeId,
    pub offset: usize,
}

impl Point {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Point { node, offset }
    }
}

pub fn is_same_point(a: Point, b: Point) -> bool {
    a == b
}

pub fn is_left_edge_point(point: Point) -> bool {
    point.offset == 0
}

pub fn is_right_edge_point(dom: &Dom, point: Point) -> bool {
    point.offset == dom.node_len(point.node)
}

pub fn is_edge_point(dom: &Dom, point: Point) -> bool {
    is_left_edge_point(point) || is_right_edge_point(dom, point)
}

/// Whether `node` sits on the leftmost path under `ancestor`.
pub fn is_left_edge_of(dom: &Dom, node: NodeId, ancestor: NodeId) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == ancestor {
            break;
        }
        if dom.position(n) != 0 {
            return false;
        }
        cur = dom.parent(n);
    }
    true
}

/// Whether `node` sits on the rightmost path under `ancestor`.
pub fn is_right_edge_of(dom: &Dom, node: NodeId, ancestor: NodeId) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == ancestor {
            break;
        }
        let Some(parent) = dom.parent(n) else {
            return false;
        };
        if dom.position(n) != dom.node_len(parent) - 1 {
            return false;
        }
        cur = Some(parent);
    }
    true
}

pub fn is_left_edge_point_of(dom: &Dom, point: Point, ancestor: NodeId) -> bool {
    is_left_edge_point(point) && is_left_edge_of(dom, point.node, ancestor)
}

pub fn is_right_edge_point_of(dom: &Dom, point: Point, ancestor: NodeId) -> bool {
    is_right_edge_point(dom, point) && is_right_edge_of(dom, point.node, ancestor)
}

/// The boundary point immediately before `point` in document order, or
/// `None` at the start of the editable root.
///
/// With `skip_inner_offset`, inner positions of the current node are
/// skipped in one step instead of character by character.
pub fn prev_point(dom: &Dom, point: Point, skip_inner_offset: bool) -> Option<Point> {
    let (node, offset) = if point.offset == 0 {
        if dom.is_editable(point.node) {
            return None;
        }
        let parent = dom.parent(point.node)?;
        (parent, dom.position(point.node))
    } else if dom.has_children(point.node) {
        let child = dom.child(point.node, point.offset - 1)?;
        (child, dom.node_len(child))
    } else {
        let offset = if skip_inner_offset { 0 } else { point.offset - 1 };
        (point.node, offset)
    };
    Some(Point::new(node, offset))
}

/// The boundary point immediately after `point` in document order, or
/// `None` at the end of the editable root.
///
/// Leaving the end of a node whose later siblings include a text node
/// steps straight to the start of that text node.
pub fn next_point(dom: &Dom, point: Point, skip_inner_offset: bool) -> Option<Point> {
    let (node, offset) = if dom.node_len(point.node) == point.offset {
        if dom.is_editable(point.node) {
            return None;
        }
        match next_text_sibling(dom, point.node) {
            Some(text) => (text, 0),
            None => {
                let parent = dom.parent(point.node)?;
                (parent, dom.position(point.node) + 1)
            }
        }
    } else if dom.has_children(point.node) {
        (dom.child(point.node, point.offset)?, 0)
    } else {
        let offset = if skip_inner_offset {
            dom.node_len(point.node)
        } else {
            point.offset + 1
        };
        (point.node, offset)
    };
    Some(Point::new(node, offset))
}

fn next_text_sibling(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let mut cur = dom.next_sibling(node);
    while let Some(n) = cur {
        if dom.is_text(n) {
            return Some(n);
        }
        cur = dom.next_sibling(n);
    }
    None
}

/// Forward step that hops over empty nodes instead of descending into
/// them. Used by [`walk_point`] so handlers never see positions inside
/// content that has no width.
pub fn next_point_with_empty_node(
    dom: &Dom,
    point: Point,
    skip_inner_offset: bool,
) -> Option<Point> {
    if dom.is_empty(point.node) {
        let node = dom.next_sibling(point.node)?;
        return Some(Point::new(node, 0));
    }
    if dom.node_len(point.node) == point.offset {
        if dom.is_editable(point.node) {
            return None;
        }
        let parent = dom.parent(point.node)?;
        if dom.is_editable(parent) {
            let node = dom.next_sibling(point.node)?;
            return Some(Point::new(node, 0));
        }
        return Some(Point::new(parent, dom.position(point.node) + 1));
    }
    if dom.has_children(point.node) {
        let child = dom.child(point.node, point.offset)?;
        if dom.is_empty(child) {
            return match dom.next_sibling(point.node) {
                Some(sibling) if !dom.is_empty(sibling) => Some(Point::new(sibling, 0)),
                _ => None,
            };
        }
        return Some(Point::new(child, 0));
    }
    let offset = if skip_inner_offset {
        dom.node_len(point.node)
    } else {
        point.offset + 1
    };
    Some(Point::new(point.node, offset))
}

/// Walks backward from `point` (inclusive) until `pred` matches.
pub fn prev_point_until(
    dom: &Dom,
    point: Point,
    mut pred: impl FnMut(&Dom, Point) -> bool,
) -> Option<Point> {
    let mut cur = Some(point);
    while let Some(p) = cur {
        if pred(dom, p) {
            return Some(p);
        }
        cur = prev_point(dom, p, false);
    }
    None
}

/// Walks forward from `point` (inclusive) until `pred` matches.
pub fn next_point_until(
    dom: &Dom,
    point: Point,
    mut pred: impl FnMut(&Dom, Point) -> bool,
) -> Option<Point> {
    let mut cur = Some(point);
    while let Some(p) = cur {
        if pred(dom, p) {
            return Some(p);
        }
        cur = next_point(dom, p, false);
    }
    None
}

/// Calls `handler` for every point from `start` to `end` inclusive, in
/// document order. With `skip_inner_offset`, inner offsets of nodes other
/// than the two endpoints are collapsed to a single step.
pub fn walk_point(
    dom: &Dom,
    start: Point,
    end: Point,
    mut handler: impl FnMut(&Dom, Point),
    skip_inner_offset: bool,
) {
    let mut point = Some(start);
    while let Some(p) = point {
        handler(dom, p);
        if p == end {
            break;
        }
        let skip = skip_inner_offset && start.node != p.node && end.node != p.node;
        point = next_point_with_empty_node(dom, p, skip);
    }
}

/// Whether a caret can rest at `point`: any text position, any childless
/// or empty node, and element positions flanked only by void elements.
pub fn is_visible_point(dom: &Dom, point: Point) -> bool {
    if dom.is_text(point.node) || !dom.has_children(point.node) || dom.is_empty(point.node) {
        return true;
    }
    let left = if point.offset == 0 {
        None
    } else {
        dom.child(point.node, point.offset - 1)
    };
    let right = dom.child(point.node, point.offset);
    left.is_none_or(|n| dom.is_void(n)) && right.is_none_or(|n| dom.is_void(n))
}

/// The character just before `point` within its text node.
pub fn char_before(dom: &Dom, point: Point) -> Option<char> {
    if point.offset == 0 {
        return None;
    }
    dom.text(point.node)?.chars().nth(point.offset - 1)
}

/// Point whose preceding character is a non-space character.
pub fn is_char_point(dom: &Dom, point: Point) -> bool {
    char_before(dom, point).is_some_and(|ch| ch != ' ' && ch != NBSP)
}

/// Point whose preceding character is a space or non-breaking space.
pub fn is_space_point(dom: &Dom, point: Point) -> bool {
    char_before(dom, point).is_some_and(|ch| ch == ' ' || ch == NBSP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prev_point_descends_into_previous_child() {
        let dom = Dom::from_html("<p>ab</p>");
        let root = dom.root();
        let p = dom.first_child(root).unwrap();
        let text = dom.first_child(p).unwrap();
        // before <p> from the root's end: lands at the end of <p>
        assert_eq!(
            prev_point(&dom, Point::new(root, 1), false),
            Some(Point::new(p, 1))
        );
        // inside the text node: character steps
        assert_eq!(
            prev_point(&dom, Point::new(text, 2), false),
            Some(Point::new(text, 1))
        );
        // offset 0 climbs to the parent
        assert_eq!(
            prev_point(&dom, Point::new(text, 0), false),
            Some(Point::new(p, 0))
        );
        assert_eq!(prev_point(&dom, Point::new(root, 0), false), None);
    }

    #[test]
    fn next_point_prefers_text_siblings() {
        let dom = Dom::from_html("<b>a</b>tail");
        let root = dom.root();
        let b = dom.first_child(root).unwrap();
        let tail = dom.last_child(root).unwrap();
        // at the end of <b>: jumps straight into the following text node
        assert_eq!(
            next_point(&dom, Point::new(b, 1), false),
            Some(Point::new(tail, 0))
        );
        assert_eq!(next_point(&dom, Point::new(root, 2), false), None);
    }

    #[test]
    fn prev_and_next_are_inverse_between_interior_points() {
        let dom = Dom::from_html("<p>ab<b>x</b></p>");
        let root = dom.root();
        let mut forward = vec![Point::new(root, 0)];
        while let Some(p) = next_point(&dom, *forward.last().unwrap(), false) {
            forward.push(p);
        }
        assert_eq!(forward.last(), Some(&Point::new(root, 1)));
        // every adjacent pair of the walk round-trips both ways
        for pair in forward.windows(2) {
            assert_eq!(next_point(&dom, pair[0], false), Some(pair[1]));
            assert_eq!(prev_point(&dom, pair[1], false), Some(pair[0]));
        }
    }

    #[test]
    fn until_walks_find_matching_points() {
        let dom = Dom::from_html("<p>a b</p>");
        let p = dom.first_child(dom.root()).unwrap();
        let text = dom.first_child(p).unwrap();
        let from = Point::new(text, 3);
        let found = prev_point_until(&dom, from, |d, pt| is_space_point(d, pt));
        assert_eq!(found, Some(Point::new(text, 2)));
        let none = prev_point_until(&dom, from, |d, pt| d.is_table(pt.node));
        assert_eq!(none, None);
    }

    #[test]
    fn walk_point_visits_in_document_order() {
        let dom = Dom::from_html("<p>ab</p>");
        let p = dom.first_child(dom.root()).unwrap();
        let text = dom.first_child(p).unwrap();
        let mut seen = Vec::new();
        walk_point(
            &dom,
            Point::new(text, 0),
            Point::new(text, 2),
            |_, pt| seen.push(pt.offset),
            false,
        );
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn visible_points() {
        let dom = Dom::from_html("<p>x</p><p><br></p>");
        let root = dom.root();
        let p1 = dom.first_child(root).unwrap();
        let text = dom.first_child(p1).unwrap();
        let p2 = dom.last_child(root).unwrap();
        assert!(is_visible_point(&dom, Point::new(text, 0)));
        // between two element children that are not void: not visible
        assert!(!is_visible_point(&dom, Point::new(root, 1)));
        // inside the blank-padded paragraph: flanked by <br> only
        assert!(is_visible_point(&dom, Point::new(p2, 0)));
        assert!(is_visible_point(&dom, Point::new(p2, 1)));
    }

    #[test]
    fn char_and_space_points() {
        let dom = Dom::from_html("<p>a\u{a0}b</p>");
        let p = dom.first_child(dom.root()).unwrap();
        let text = dom.first_child(p).unwrap();
        assert!(!is_char_point(&dom, Point::new(text, 0)));
        assert!(is_char_point(&dom, Point::new(text, 1)));
        assert!(is_space_point(&dom, Point::new(text, 2)));
        assert!(is_char_point(&dom, Point::new(text, 3)));
    }

    #[test]
    fn edge_of_checks_follow_the_spine() {
        let dom = Dom::from_html("<p><b>x</b><i>y</i></p>");
        let p = dom.first_child(dom.root()).unwrap();
        let b = dom.first_child(p).unwrap();
        let i = dom.last_child(p).unwrap();
        let bx = dom.first_child(b).unwrap();
        assert!(is_left_edge_of(&dom, bx, p));
        assert!(!is_left_edge_of(&dom, i, p));
        assert!(is_right_edge_of(&dom, i, p));
        assert!(!is_right_edge_of(&dom, b, p));
    }
}
