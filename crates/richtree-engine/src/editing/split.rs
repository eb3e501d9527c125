//! Structural splitting: single nodes, ancestor chains, and the
//! inline/block split used by content insertion.

use crate::dom::{Dom, NodeId};
use crate::editing::point::{Point, is_edge_point, is_left_edge_point, is_right_edge_point};

#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    /// Leave freshly split empty containers unpadded.
    pub skip_padding_blank: bool,
    /// At a node edge, reuse the existing boundary instead of producing
    /// an empty half.
    pub not_split_edge_point: bool,
    /// Remove halves that come out empty (implies skipping padding).
    pub discard_empty_splits: bool,
}

/// Splits a single node at `point`. The original keeps the left part;
/// the returned node starts the right part.
///
/// At a text-node edge (or any edge with `not_split_edge_point`) nothing
/// is created: the left edge returns the node itself and the right edge
/// returns its next sibling, which may not exist.
pub fn split_node(dom: &mut Dom, point: Point, options: SplitOptions) -> Option<NodeId> {
    let skip_padding = options.skip_padding_blank || options.discard_empty_splits;

    if is_edge_point(dom, point) && (dom.is_text(point.node) || options.not_split_edge_point) {
        if is_left_edge_point(point) {
            return Some(point.node);
        }
        return dom.next_sibling(point.node);
    }

    if dom.is_text(point.node) {
        return dom.split_text_node(point.node, point.offset).ok();
    }

    let clone = dom.clone_shallow(point.node);
    dom.insert_after(clone, point.node).ok()?;
    if let Some(child) = dom.child(point.node, point.offset) {
        let rest = dom.list_next(child, |_, _| false);
        dom.append_children(clone, &rest);
    }

    if !skip_padding {
        dom.pad_blank_html(point.node);
        dom.pad_blank_html(clone);
    }

    if options.discard_empty_splits {
        if dom.is_empty(point.node) {
            dom.remove(point.node, false);
        }
        if dom.is_empty(clone) {
            dom.remove(clone, false);
            return dom.next_sibling(point.node);
        }
    }
    Some(clone)
}

/// Splits the ancestor chain from `point` up to and including `root`.
/// Returns the node that starts the right-hand tree.
///
/// A right-edge point deep in the chain is first relocated to the start
/// of the nearest following sibling, so the split reuses the existing
/// boundary instead of cascading empty right halves.
pub fn split_tree(
    dom: &mut Dom,
    root: NodeId,
    point: Point,
    options: SplitOptions,
) -> Option<NodeId> {
    let mut point = point;
    let mut ancestors = dom.list_ancestor(point.node, |_, n| n == root);
    if ancestors.is_empty() {
        return None;
    }
    if ancestors.len() == 1 {
        return split_node(dom, point, options);
    }

    if ancestors.len() > 2 && point.offset != 0 && is_right_edge_point(dom, point) {
        let chain = &ancestors[..ancestors.len() - 1];
        let with_sibling = chain
            .iter()
            .copied()
            .find_map(|n| dom.next_sibling(n));
        // relocate only into an element's first child or a plain text run
        let node = with_sibling.and_then(|sibling| match dom.text(sibling) {
            Some(text) if !text.contains('\n') => Some(sibling),
            Some(_) => None,
            None => dom.first_child(sibling),
        });
        if let Some(node) = node {
            point = Point::new(node, 0);
            ancestors = dom.list_ancestor(point.node, |_, n| n == root);
        }
    }

    let mut iter = ancestors.into_iter();
    let mut acc = iter.next();
    for parent in iter {
        if acc == Some(point.node) {
            acc = split_node(dom, point, options);
        }
        let offset = match acc {
            Some(node) => dom.position(node),
            None => dom.node_len(parent),
        };
        acc = split_node(dom, Point::new(parent, offset), options);
    }
    acc
}

/// Result of [`split_point`]: the container that was split and the node
/// starting its right-hand part (absent when the point was already at a
/// reusable boundary).
#[derive(Debug, Clone, Copy)]
pub struct SplitPointResult {
    pub right_node: Option<NodeId>,
    pub container: NodeId,
}

/// Splits the tree around `point` for content insertion.
///
/// Inline insertion splits up to the enclosing paragraph; block insertion
/// splits up to the enclosing body container (cell, blockquote, or the
/// editable root).
pub fn split_point(dom: &mut Dom, point: Point, is_inline: bool) -> SplitPointResult {
    let pred = |d: &Dom, n: NodeId| {
        if is_inline {
            d.is_para(n)
        } else {
            d.is_body_container(n)
        }
    };
    let ancestors = dom.list_ancestor(point.node, pred);
    let top = ancestors.last().copied().unwrap_or(point.node);

    let (split_root, container) = if pred(dom, top) {
        let split_root = ancestors.len().checked_sub(2).map(|i| ancestors[i]);
        (split_root, top)
    } else {
        (Some(top), dom.parent(top).unwrap_or(top))
    };

    let mut right_node = split_root.and_then(|root| {
        split_tree(
            dom,
            root,
            point,
            SplitOptions {
                skip_padding_blank: is_inline,
                not_split_edge_point: is_inline,
                discard_empty_splits: false,
            },
        )
    });

    if right_node.is_none() && container == point.node {
        right_node = dom.child(point.node, point.offset);
    }

    SplitPointResult {
        right_node,
        container,
    }
}
