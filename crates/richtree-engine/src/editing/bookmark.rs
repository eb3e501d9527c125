//! Serializable range positions.
//!
//! A bookmark records an endpoint as the child-index path from a known
//! ancestor plus an offset, so a range can be stored, sent across a
//! process boundary, and re-resolved against a (possibly edited) tree.
//! Resolution clamps out-of-range steps instead of failing.

use serde::{Deserialize, Serialize};

use crate::dom::{Dom, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkPoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub start: BookmarkPoint,
    pub end: BookmarkPoint,
}

/// Child-index path from `ancestor` down to `node`.
///
/// When `ancestor` is not the editable root, its own position heads the
/// path; callers anchoring at a paragraph drop it (see
/// [`crate::editing::Range::para_bookmark`]).
pub fn make_offset_path(dom: &Dom, ancestor: NodeId, node: NodeId) -> Vec<usize> {
    let ancestors = dom.list_ancestor(node, |_, n| n == ancestor);
    ancestors.iter().rev().map(|&n| dom.position(n)).collect()
}

/// Resolves a child-index path from `ancestor`. Steps past the end of a
/// child list clamp to the last child; steps into a childless node stay
/// put.
pub fn from_offset_path(dom: &Dom, ancestor: NodeId, path: &[usize]) -> NodeId {
    let mut current = ancestor;
    for &offset in path {
        current = match dom.child(current, offset) {
            Some(child) => child,
            None => dom.last_child(current).unwrap_or(current),
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn offset_path_round_trips() {
        let dom = Dom::from_html("<p>a</p><p><b>x</b>y</p>");
        let root = dom.root();
        let p2 = dom.last_child(root).unwrap();
        let y = dom.last_child(p2).unwrap();
        let path = make_offset_path(&dom, root, y);
        assert_eq!(path, vec![1, 1]);
        assert_eq!(from_offset_path(&dom, root, &path), y);
    }

    #[test]
    fn resolution_clamps_stale_paths() {
        let dom = Dom::from_html("<p>a</p>");
        let root = dom.root();
        let p = dom.first_child(root).unwrap();
        let text = dom.first_child(p).unwrap();
        // a path recorded before the second paragraph was removed
        assert_eq!(from_offset_path(&dom, root, &[5, 0]), text);
        // descending into a childless node stays on it
        assert_eq!(from_offset_path(&dom, root, &[0, 0, 3]), text);
    }
}
