//! Host-selection capture.
//!
//! A [`Selection`] is what an embedding host reports: an anchor (where
//! the gesture started) and a focus (where it ended), either of which may
//! come first in document order. The editing layer works on ordered
//! [`Range`](crate::editing::Range)s, so the only job here is direction.

use std::cmp::Ordering;

use crate::dom::Dom;
use crate::editing::bookmark::make_offset_path;
use crate::editing::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Selection { anchor, focus }
    }

    /// A collapsed selection at `point`.
    pub fn caret(point: Point) -> Self {
        Selection {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Whether the anchor precedes (or equals) the focus in document
    /// order.
    pub fn is_forward(&self, dom: &Dom) -> bool {
        cmp_order(dom, self.anchor, self.focus) != Ordering::Greater
    }
}

/// Document-order comparison of two boundary points, by child-index path
/// from the editable root.
pub fn cmp_order(dom: &Dom, a: Point, b: Point) -> Ordering {
    let mut path_a = make_offset_path(dom, dom.root(), a.node);
    path_a.push(a.offset);
    let mut path_b = make_offset_path(dom, dom.root(), b.node);
    path_b.push(b.offset);
    path_a.cmp(&path_b)
}
