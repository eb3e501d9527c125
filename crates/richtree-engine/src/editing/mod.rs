/*!
 * # Editing Core Module
 *
 * Structural editing over the document tree, built in layers:
 *
 * ## Architecture Overview
 *
 * ### 1. Boundary Points
 * - A [`Point`] addresses a position between characters or between
 *   children, never a node itself
 * - `prev_point`/`next_point` define a total document-order walk; every
 *   higher operation (visibility, word scans, node enumeration) is a
 *   predicate over that walk
 * - Walks fail soft: stepping off the editable root yields `None`,
 *   never an error
 *
 * ### 2. Ranges
 * - A [`Range`] is an ordered pair of points and a value type: editing
 *   operations return new ranges instead of mutating the receiver
 * - [`Range::delete_contents`], [`Range::insert_node`] and
 *   [`Range::paste_html`] are the only mutation entry points hosts need
 * - [`Bookmark`]s serialize endpoints as child-index paths so ranges
 *   survive a save/load or undo round-trip
 *
 * ### 3. Tree Splitting
 * - [`split_node`]/[`split_tree`] cut a node or a whole ancestor chain
 *   at a point, padding or discarding empty halves by policy
 * - [`split_point`] picks the split root for inline vs. block insertion
 *
 * ### 4. Virtual Table Grid
 * - Table edits expand row/col spans into a logical grid first, then
 *   apply a per-coordinate action list to the real tree
 */

pub mod bookmark;
pub mod point;
pub mod range;
pub mod selection;
pub mod split;
pub mod table;

pub use bookmark::{Bookmark, BookmarkPoint, from_offset_path, make_offset_path};
pub use point::Point;
pub use range::{NodeFilter, Range};
pub use selection::Selection;
pub use split::{SplitOptions, SplitPointResult, split_node, split_point, split_tree};
pub use table::{
    CellAction, ColPos, GridAxis, GridRequest, RowPos, VirtualTable, add_col, add_row, delete_col,
    delete_row, delete_table,
};
