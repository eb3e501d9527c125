//! The document tree: arena, node capabilities, tag predicates, and
//! markup conversion.

mod builder;
mod html;
mod node;
mod predicates;

pub use builder::{parse_fragment, set_inner_html};
pub use node::{Dom, DomError, NodeId, NodeKind};
pub use predicates::{BLANK_HTML, EMPTY_PARA, NBSP};
