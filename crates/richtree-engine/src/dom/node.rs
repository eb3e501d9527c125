//! Arena-backed document tree and the node capability surface.
//!
//! The tree is a plain ownership hierarchy: every node is owned by the
//! arena, referenced by [`NodeId`], and linked to at most one parent. The
//! parent link is a non-owning back-reference used only for upward
//! queries. Removing a node detaches it from its parent but never frees
//! its slot, so any previously handed-out `NodeId` stays readable; a
//! detached node simply reports no parent. Callers that keep positions
//! across mutations (ranges, bookmarks) are responsible for re-deriving
//! them, the engine does not track invalidation.

use std::fmt;

use thiserror::Error;

/// Handle to a node inside a [`Dom`].
///
/// Ids are minted by one `Dom` and are meaningless in any other.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// The two node shapes the engine knows about.
///
/// There is deliberately no open-ended "kind" dispatch: everything the
/// editing layer needs is derived from the tag string by the predicate
/// functions in [`crate::dom::predicates`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element {
        /// Lower-cased tag name, e.g. `"p"`, `"td"`.
        tag: String,
        /// Attribute name/value pairs in document order.
        attrs: Vec<(String, String)>,
        /// Ordered child list. Offsets in boundary points index into this.
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// Structural misuse of the capability surface.
///
/// These are programmer-facing: position-walking and editing operations
/// never raise them for ordinary user interaction (those paths return
/// `None` or no-op instead, see the crate docs on failure semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("node {0:?} is not a text node")]
    NotAText(NodeId),
    #[error("node {0:?} has no parent")]
    Detached(NodeId),
    #[error("inserting {node:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: NodeId, node: NodeId },
    #[error("offset {offset} is out of bounds in {node:?}")]
    OffsetOutOfBounds { node: NodeId, offset: usize },
}

/// A mutable document tree with a designated editable root.
///
/// All structural editing in this crate happens through a `Dom`. The root
/// element plays the role of the host's editable container: upward walks
/// stop at it and it can never be split or removed.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Dom {
    /// Creates a tree holding a single empty root element.
    pub fn new(root_tag: &str) -> Self {
        let mut dom = Dom {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = dom.alloc(NodeKind::Element {
            tag: root_tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        });
        dom.root = root;
        dom
    }

    /// The editable root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData { parent: None, kind });
        id
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    /// Creates a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    // ---- queries ---------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Text(_))
    }

    /// Lower-cased tag name; `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Text content of a text node; `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(buf) = &mut self.node_mut(id).kind {
            *buf = text.to_string();
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// All attributes in document order; empty for text nodes.
    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            if let Some(entry) = attrs.iter_mut().find(|(n, _)| n == name) {
                entry.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            attrs.retain(|(n, _)| n != name);
        }
    }

    /// Child list of an element; empty for text nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Element { children, .. } => children,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Node length: character count for text, child count for elements.
    /// Boundary-point offsets are bounded by this.
    pub fn node_len(&self, id: NodeId) -> usize {
        match &self.node(id).kind {
            NodeKind::Element { children, .. } => children.len(),
            NodeKind::Text(text) => text.chars().count(),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Index of `id` in its parent's child list; 0 when detached.
    pub fn position(&self, id: NodeId) -> usize {
        match self.node(id).parent {
            Some(parent) => self
                .children(parent)
                .iter()
                .position(|&c| c == id)
                .unwrap_or(0),
            None => 0,
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        self.child(parent, self.position(id) + 1)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let pos = self.position(id);
        if pos == 0 { None } else { self.child(parent, pos - 1) }
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    // ---- structural mutation --------------------------------------------

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            if let NodeKind::Element { children, .. } = &mut self.node_mut(parent).kind {
                children.retain(|&c| c != id);
            }
            self.node_mut(id).parent = None;
        }
    }

    fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        if let NodeKind::Element { children, .. } = &mut self.node_mut(parent).kind {
            let index = index.min(children.len());
            children.insert(index, child);
        }
        self.node_mut(child).parent = Some(parent);
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.is_element(parent) {
            return Err(DomError::NotAnElement(parent));
        }
        if self.contains(child, parent) {
            return Err(DomError::WouldCycle {
                parent,
                node: child,
            });
        }
        Ok(())
    }

    /// Appends `child` as the last child of `parent`, detaching it from
    /// any previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        let at = self.children(parent).len();
        self.attach(parent, at, child);
        Ok(())
    }

    /// Appends each node in `ids`, in order, to `parent`. No-op for nodes
    /// that cannot be attached.
    pub fn append_children(&mut self, parent: NodeId, ids: &[NodeId]) {
        for &id in ids {
            if self.append_child(parent, id).is_err() {
                log::warn!("append_children: skipping unattachable {id:?}");
            }
        }
    }

    /// Inserts `new` immediately before `reference` under the same parent.
    pub fn insert_before(&mut self, new: NodeId, reference: NodeId) -> Result<(), DomError> {
        let parent = self.parent(reference).ok_or(DomError::Detached(reference))?;
        self.check_insertable(parent, new)?;
        let at = self.position(reference);
        self.attach(parent, at, new);
        Ok(())
    }

    /// Inserts `new` immediately after `reference` under the same parent.
    pub fn insert_after(&mut self, new: NodeId, reference: NodeId) -> Result<(), DomError> {
        let parent = self.parent(reference).ok_or(DomError::Detached(reference))?;
        self.check_insertable(parent, new)?;
        let at = self.position(reference) + 1;
        self.attach(parent, at, new);
        Ok(())
    }

    /// Detaches `id` from the tree. With `with_children` false, its
    /// children are promoted into its former position first.
    ///
    /// Removing a detached node (or the root) is a no-op.
    pub fn remove(&mut self, id: NodeId, with_children: bool) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if !with_children {
            let at = self.position(id);
            let children: Vec<NodeId> = self.children(id).to_vec();
            for (i, child) in children.into_iter().enumerate() {
                self.attach(parent, at + i, child);
            }
        }
        log::trace!("remove {id:?} (with_children: {with_children})");
        self.detach(id);
    }

    /// Detaches every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in children {
            self.detach(child);
        }
    }

    /// Clones tag, attributes, and text content, but never children.
    pub fn clone_shallow(&mut self, id: NodeId) -> NodeId {
        let kind = match &self.node(id).kind {
            NodeKind::Element { tag, attrs, .. } => NodeKind::Element {
                tag: tag.clone(),
                attrs: attrs.clone(),
                children: Vec::new(),
            },
            NodeKind::Text(text) => NodeKind::Text(text.clone()),
        };
        self.alloc(kind)
    }

    /// Splits a text node at a character offset. The original keeps the
    /// left half, the returned node holds the right half and is inserted
    /// as the next sibling (when the original is attached).
    pub fn split_text_node(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let Some(text) = self.text(id).map(str::to_string) else {
            return Err(DomError::NotAText(id));
        };
        let byte = char_to_byte(&text, offset)
            .ok_or(DomError::OffsetOutOfBounds { node: id, offset })?;
        let (left, right) = text.split_at(byte);
        let left = left.to_string();
        let right_id = self.create_text(right);
        self.set_text(id, &left);
        if self.parent(id).is_some() {
            self.insert_after(right_id, id)?;
        }
        Ok(right_id)
    }

    /// Replaces `node` with a fresh `tag` element carrying its children
    /// and inline style. Returns the replacement (or `node` itself when
    /// the tag already matches or the node is detached).
    pub fn replace(&mut self, node: NodeId, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        if self.tag(node) == Some(tag.as_str()) {
            return node;
        }
        if self.parent(node).is_none() {
            return node;
        }
        let new = self.create_element(&tag);
        if let Some(style) = self.attr(node, "style").map(str::to_string) {
            self.set_attr(new, "style", &style);
        }
        let children = self.children(node).to_vec();
        if self.insert_after(new, node).is_err() {
            return node;
        }
        self.append_children(new, &children);
        self.remove(node, true);
        new
    }

    /// Wraps `node` in a freshly created `tag` element occupying the
    /// node's former position.
    pub fn wrap(&mut self, node: NodeId, tag: &str) -> Result<NodeId, DomError> {
        if self.parent(node).is_none() {
            return Err(DomError::Detached(node));
        }
        let wrapper = self.create_element(tag);
        self.insert_before(wrapper, node)?;
        self.append_child(wrapper, node)?;
        Ok(wrapper)
    }

    // ---- ancestor / sibling walks ---------------------------------------

    /// Nearest node (including `node` itself) matching `pred`; the walk
    /// checks the editable root last and never climbs past it.
    pub fn ancestor(
        &self,
        node: NodeId,
        mut pred: impl FnMut(&Dom, NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if pred(self, n) {
                return Some(n);
            }
            if self.is_editable(n) {
                break;
            }
            cur = self.parent(n);
        }
        None
    }

    /// Ancestor chain from `node` upward (inclusive), excluding the
    /// editable root, stopping at (and including) the first node matching
    /// `until`.
    pub fn list_ancestor(
        &self,
        node: NodeId,
        until: impl Fn(&Dom, NodeId) -> bool,
    ) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        self.ancestor(node, |dom, n| {
            if !dom.is_editable(n) {
                ancestors.push(n);
            }
            until(dom, n)
        });
        ancestors
    }

    /// Topmost ancestor (excluding the editable root) matching `pred`.
    pub fn last_ancestor(
        &self,
        node: NodeId,
        pred: impl Fn(&Dom, NodeId) -> bool,
    ) -> Option<NodeId> {
        self.list_ancestor(node, |_, _| false)
            .into_iter()
            .filter(|&n| pred(self, n))
            .last()
    }

    /// Lowest common ancestor below the editable root. Returns `None`
    /// when the two nodes only meet at (or above) the root.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let ancestors = self.list_ancestor(a, |_, _| false);
        let mut cur = Some(b);
        while let Some(n) = cur {
            if ancestors.contains(&n) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    /// `node` and its previous siblings, in walk order, stopping before
    /// the first sibling matching `stop`.
    pub fn list_prev(&self, node: NodeId, stop: impl Fn(&Dom, NodeId) -> bool) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut cur = Some(node);
        while let Some(n) = cur {
            if stop(self, n) {
                break;
            }
            nodes.push(n);
            cur = self.prev_sibling(n);
        }
        nodes
    }

    /// `node` and its next siblings, in document order, stopping before
    /// the first sibling matching `stop`.
    pub fn list_next(&self, node: NodeId, stop: impl Fn(&Dom, NodeId) -> bool) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut cur = Some(node);
        while let Some(n) = cur {
            if stop(self, n) {
                break;
            }
            nodes.push(n);
            cur = self.next_sibling(n);
        }
        nodes
    }
}

/// Byte index of the `offset`-th character of `text`; `None` past the end.
pub(crate) fn char_to_byte(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    let mut count = 0;
    for (i, _) in text.char_indices() {
        if count == offset {
            return Some(i);
        }
        count += 1;
    }
    count += 1;
    if count > offset { Some(text.len()) } else { None }
}
