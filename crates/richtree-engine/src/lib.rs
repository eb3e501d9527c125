pub mod dom;
pub mod editing;

// Re-export key types for easier usage
pub use dom::{BLANK_HTML, Dom, DomError, EMPTY_PARA, NodeId, NodeKind};
pub use editing::{Bookmark, NodeFilter, Point, Range, Selection, SplitOptions};
