//! Arena-based DOM for captured page HTML.
//!
//! The host page owns the real document tree; this crate works on an arena
//! snapshot of it built by html5ever. Nodes live in a flat `Vec` and link to
//! each other by [`NodeId`], so traversal never fights the borrow checker.
//! The annotation contract only ever touches the `class` and `dir`
//! attributes of existing elements — nodes are created exclusively while
//! parsing (or by tests standing in for the host page's own mutations).

mod mutation;
mod tree_sink;

pub use mutation::{MutationKind, MutationRecord};
pub use tree_sink::DomSink;

use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, ParseOpts, QualName, ns};

use crate::pattern::Pattern;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Doctype { name: String },
    Element { name: QualName, attrs: Vec<Attribute> },
    Text(String),
    Comment(String),
}

/// A node in the arena: payload plus tree links.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Node {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// The DOM arena.
pub struct Dom {
    nodes: Vec<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create an empty DOM containing only the document node.
    pub fn new() -> Self {
        Dom {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// The document root.
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    // ------------------------------------------------------------------
    // Construction (used by the parser sink and by tests standing in for
    // the host page)
    // ------------------------------------------------------------------

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.push(Node::new(NodeData::Element { name, attrs }))
    }

    /// Create an element from a plain tag name, e.g. `"p"`.
    pub fn create_named_element(&mut self, tag: &str) -> NodeId {
        let name = QualName::new(None, ns!(html), LocalName::from(tag));
        self.create_element(name, Vec::new())
    }

    pub fn create_text(&mut self, contents: String) -> NodeId {
        self.push(Node::new(NodeData::Text(contents)))
    }

    pub fn create_comment(&mut self, contents: String) -> NodeId {
        self.push(Node::new(NodeData::Comment(contents)))
    }

    pub fn create_doctype(&mut self, name: String) -> NodeId {
        self.push(Node::new(NodeData::Doctype { name }))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let prev = self.get(parent).and_then(|n| n.last_child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
            node.prev_sibling = prev;
        }
        if let Some(prev_id) = prev {
            if let Some(node) = self.get_mut(prev_id) {
                node.next_sibling = Some(child);
            }
        }
        if let Some(node) = self.get_mut(parent) {
            if node.first_child.is_none() {
                node.first_child = Some(child);
            }
            node.last_child = Some(child);
        }
    }

    /// Append text, merging into a trailing text node when one exists.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.get(parent).and_then(|n| n.last_child)
            && let Some(node) = self.get_mut(last)
            && let NodeData::Text(contents) = &mut node.data
        {
            contents.push_str(text);
            return;
        }
        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Insert `node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        self.detach(node);
        let (parent, prev) = match self.get(sibling) {
            Some(s) => (s.parent, s.prev_sibling),
            None => return,
        };
        if let Some(n) = self.get_mut(node) {
            n.parent = parent;
            n.prev_sibling = prev;
            n.next_sibling = Some(sibling);
        }
        if let Some(s) = self.get_mut(sibling) {
            s.prev_sibling = Some(node);
        }
        match prev {
            Some(prev_id) => {
                if let Some(p) = self.get_mut(prev_id) {
                    p.next_sibling = Some(node);
                }
            }
            None => {
                if let Some(parent_id) = parent
                    && let Some(p) = self.get_mut(parent_id)
                {
                    p.first_child = Some(node);
                }
            }
        }
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        match prev {
            Some(prev_id) => {
                if let Some(p) = self.get_mut(prev_id) {
                    p.next_sibling = next;
                }
            }
            None => {
                if let Some(parent_id) = parent
                    && let Some(p) = self.get_mut(parent_id)
                {
                    p.first_child = next;
                }
            }
        }
        match next {
            Some(next_id) => {
                if let Some(n) = self.get_mut(next_id) {
                    n.prev_sibling = prev;
                }
            }
            None => {
                if let Some(parent_id) = parent
                    && let Some(p) = self.get_mut(parent_id)
                {
                    p.last_child = prev;
                }
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Direct children, in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.get(id).and_then(|n| n.first_child);
        std::iter::successors(first, move |&c| self.get(c).and_then(|n| n.next_sibling))
    }

    /// All descendants of `root` in document (pre-)order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(root).collect();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&a| self.parent(a))
    }

    // ------------------------------------------------------------------
    // Element accessors
    // ------------------------------------------------------------------

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.get(id),
            Some(Node {
                data: NodeData::Element { .. },
                ..
            })
        )
    }

    /// Local tag name of an element node, `None` for non-elements.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.get(id)?.data {
            NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
            _ => None,
        }
    }

    /// Attribute value by local name.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.get(id)?.data {
            NodeData::Element { ref attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(node) = self.get_mut(id) else { return };
        if let NodeData::Element { attrs, .. } = &mut node.data {
            if let Some(attr) = attrs.iter_mut().find(|a| a.name.local.as_ref() == name) {
                attr.value = value.to_string();
            } else {
                attrs.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(name)),
                    value: value.to_string(),
                });
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let Some(node) = self.get_mut(id) else { return };
        if let NodeData::Element { attrs, .. } = &mut node.data {
            attrs.retain(|a| a.name.local.as_ref() != name);
        }
    }

    /// Class tokens of an element.
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|v| v.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).contains(&class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let value = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &value);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        if !existing.split_ascii_whitespace().any(|c| c == class) {
            return;
        }
        let remaining: Vec<&str> = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect();
        if remaining.is_empty() {
            self.remove_attr(id, "class");
        } else {
            let value = remaining.join(" ");
            self.set_attr(id, "class", &value);
        }
    }

    // ------------------------------------------------------------------
    // Text extraction
    // ------------------------------------------------------------------

    /// Text belonging to the element itself: its direct text-node children
    /// only, with nested elements' text excluded.
    pub fn direct_text(&self, id: NodeId) -> String {
        let mut text = String::new();
        for child in self.children(id) {
            if let Some(Node {
                data: NodeData::Text(contents),
                ..
            }) = self.get(child)
            {
                text.push_str(contents);
            }
        }
        text
    }

    /// Full text of the subtree rooted at `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let Some(Node {
            data: NodeData::Text(contents),
            ..
        }) = self.get(id)
        {
            text.push_str(contents);
        }
        for desc in self.descendants(id) {
            if let Some(Node {
                data: NodeData::Text(contents),
                ..
            }) = self.get(desc)
            {
                text.push_str(contents);
            }
        }
        text
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First element with the given tag name, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.document())
            .find(|&id| self.element_name(id) == Some(tag))
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        self.find_by_tag("body")
    }

    /// Whether the element at `id` matches the pattern.
    pub fn matches(&self, id: NodeId, pattern: &Pattern) -> bool {
        pattern.matches(self, id)
    }

    /// Descendant elements of `root` matching the pattern, in document order.
    pub fn select(&self, root: NodeId, pattern: &Pattern) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| pattern.matches(self, id))
            .collect()
    }

    /// All element nodes in the document, in document order.
    pub fn all_elements(&self) -> Vec<NodeId> {
        self.descendants(self.document())
            .filter(|&id| self.is_element(id))
            .collect()
    }
}

/// Pre-order descendant iterator.
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children: Vec<NodeId> = self.dom.children(id).collect();
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}

/// Parse an HTML document into a [`Dom`].
pub fn parse_document(html: &str) -> Dom {
    let sink = DomSink::new();
    html5ever::parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
