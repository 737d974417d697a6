//! # AST Arena
//!
//! The wikitext AST is stored in a flat arena. Nodes are addressed by
//! [`NodeId`] and identity is the id itself: two structurally equal text nodes
//! are still two different nodes.
//!
//! ## Node shapes
//!
//! There are two shapes of node:
//!
//! - **Fixed-arity** nodes ([`NodeKind::Bold`], [`NodeKind::XmlElement`], ...)
//!   hold typed child slots. Their children are always [`NodeKind::List`]
//!   nodes.
//! - **List** nodes ([`NodeKind::List`]) are the containers. They hold an
//!   ordered, mutable sequence of child ids and are exclusively owned by the
//!   fixed-arity node that references them.
//!
//! ```text
//! Page
//! └── List ─┬─ Paragraph
//!           │  └── List ─┬─ Text("Hello ")
//!           │            └─ Bold
//!           │               └── List ── Text("world")
//!           ├─ Newline("\n")
//!           └─ HorizontalRule
//! ```
//!
//! ## Round-trip data
//!
//! Each node may carry [`RtData`]: literal glue interleaved with its child
//! slots. The arena enforces the contract that a node either has no
//! round-trip data or exactly `child_count() + 1` slots. List nodes never
//! carry round-trip data; they print as the concatenation of their children.
//!
//! Nodes are never freed. A node removed from its container stays in the
//! arena, unreachable from the root, and can be re-inserted elsewhere.

use crate::error::AstError;
use crate::rtd::RtData;

/// Index of a node in an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The payload of an AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root. `content` is the page's top-level container.
    Page { content: NodeId },
    /// Ordered container of child nodes.
    List(Vec<NodeId>),
    /// Paragraph of inline content.
    Paragraph { content: NodeId },
    Text(String),
    Newline(String),
    /// `'''bold'''`
    Bold { content: NodeId },
    /// `''italics''`
    Italics { content: NodeId },
    /// `----`
    HorizontalRule,
    /// `[[target]]` or `[[target|title]]`
    InternalLink { target: String, title: NodeId },
    /// `<name attrs>body</name>` or `<name attrs />`
    XmlElement {
        name: String,
        empty: bool,
        attributes: NodeId,
        body: NodeId,
    },
    /// ` name="value"` inside an element's attribute list.
    XmlAttribute {
        name: String,
        has_value: bool,
        value: NodeId,
    },
    /// `<!--content-->`
    XmlComment(String),
    /// `&#65;` or `&#x41;`
    XmlCharRef(u32),
    /// `&amp;`, with the character sequence it stands for.
    XmlEntityRef { name: String, resolved: String },
}

impl NodeKind {
    /// Short lower-case name of the node kind, used in diagnostics and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Page { .. } => "page",
            NodeKind::List(_) => "list",
            NodeKind::Paragraph { .. } => "paragraph",
            NodeKind::Text(_) => "text",
            NodeKind::Newline(_) => "newline",
            NodeKind::Bold { .. } => "bold",
            NodeKind::Italics { .. } => "italics",
            NodeKind::HorizontalRule => "hr",
            NodeKind::InternalLink { .. } => "internal-link",
            NodeKind::XmlElement { .. } => "xml-element",
            NodeKind::XmlAttribute { .. } => "xml-attribute",
            NodeKind::XmlComment(_) => "comment",
            NodeKind::XmlCharRef(_) => "char-ref",
            NodeKind::XmlEntityRef { .. } => "entity-ref",
        }
    }

    /// Child slots of a fixed-arity node, or the items of a list node.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Page { content }
            | NodeKind::Paragraph { content }
            | NodeKind::Bold { content }
            | NodeKind::Italics { content } => vec![*content],
            NodeKind::List(items) => items.clone(),
            NodeKind::InternalLink { title, .. } => vec![*title],
            NodeKind::XmlElement {
                attributes, body, ..
            } => vec![*attributes, *body],
            NodeKind::XmlAttribute { value, .. } => vec![*value],
            NodeKind::Text(_)
            | NodeKind::Newline(_)
            | NodeKind::HorizontalRule
            | NodeKind::XmlComment(_)
            | NodeKind::XmlCharRef(_)
            | NodeKind::XmlEntityRef { .. } => Vec::new(),
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            NodeKind::List(items) => items.len(),
            other => other.children().len(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::List(_))
    }
}

/// A node slot in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub kind: NodeKind,
    rtd: Option<RtData>,
}

impl AstNode {
    pub fn rtd(&self) -> Option<&RtData> {
        self.rtd.as_ref()
    }
}

/// Arena holding every node of one document.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<AstNode>,
    root: NodeId,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    /// Create an arena containing an empty page.
    pub fn new() -> Self {
        let mut ast = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let content = ast.new_list(Vec::new());
        ast.root = ast.alloc(NodeKind::Page { content });
        ast
    }

    /// The page node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The page's top-level container.
    pub fn page_content(&self) -> NodeId {
        match self.nodes[self.root.index()].kind {
            NodeKind::Page { content } => content,
            _ => unreachable!("the root of an arena is always a page"),
        }
    }

    /// Number of nodes ever allocated, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a synthesized node (no round-trip data).
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(AstNode { kind, rtd: None });
        id
    }

    /// Allocate a node with round-trip data, checking the slot contract.
    pub fn alloc_with_rtd(&mut self, kind: NodeKind, rtd: RtData) -> Result<NodeId, AstError> {
        let id = self.alloc(kind);
        self.set_rtd(id, Some(rtd))?;
        Ok(id)
    }

    /// Store a node produced by the parser. The parser always builds glue of
    /// the right shape, so the slot contract is only checked in debug builds.
    pub(crate) fn push_parsed(&mut self, kind: NodeKind, rtd: RtData) -> NodeId {
        debug_assert!(!kind.is_list() && rtd.len() == kind.child_count() + 1);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(AstNode {
            kind,
            rtd: Some(rtd),
        });
        id
    }

    /// Allocate a container holding `items`.
    pub fn new_list(&mut self, items: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::List(items))
    }

    pub fn get(&self, id: NodeId) -> Result<&AstNode, AstError> {
        self.nodes.get(id.index()).ok_or(AstError::UnknownNode(id))
    }

    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, AstError> {
        Ok(&self.get(id)?.kind)
    }

    pub fn kind_mut(&mut self, id: NodeId) -> Result<&mut NodeKind, AstError> {
        self.nodes
            .get_mut(id.index())
            .map(|n| &mut n.kind)
            .ok_or(AstError::UnknownNode(id))
    }

    /// Items of a container node.
    pub fn list(&self, id: NodeId) -> Result<&[NodeId], AstError> {
        match self.kind(id)? {
            NodeKind::List(items) => Ok(items),
            _ => Err(AstError::NotAContainer(id)),
        }
    }

    /// Mutable items of a container node.
    pub fn list_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, AstError> {
        match self.kind_mut(id)? {
            NodeKind::List(items) => Ok(items),
            _ => Err(AstError::NotAContainer(id)),
        }
    }

    pub fn rtd(&self, id: NodeId) -> Result<Option<&RtData>, AstError> {
        Ok(self.get(id)?.rtd.as_ref())
    }

    /// Replace a node's round-trip data, returning the previous record.
    ///
    /// Passing `None` clears the record and makes the node print in its
    /// synthesized form.
    pub fn set_rtd(&mut self, id: NodeId, rtd: Option<RtData>) -> Result<Option<RtData>, AstError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(AstError::UnknownNode(id))?;
        if let Some(rtd) = &rtd {
            if node.kind.is_list() {
                return Err(AstError::RtdOnContainer(id));
            }
            let expected = node.kind.child_count() + 1;
            if rtd.len() != expected {
                return Err(AstError::RtdSlotMismatch {
                    node: id,
                    expected,
                    found: rtd.len(),
                });
            }
        }
        Ok(std::mem::replace(&mut node.rtd, rtd))
    }

    pub fn clear_rtd(&mut self, id: NodeId) -> Result<Option<RtData>, AstError> {
        self.set_rtd(id, None)
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, AstError> {
        Ok(self.kind(id)?.children())
    }

    /// All nodes below `id` in depth-first pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, AstError> {
        let mut out = Vec::new();
        let mut stack = self.children(id)?;
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children = self.children(next)?;
            children.reverse();
            stack.extend(children);
        }
        Ok(out)
    }

    /// The container that directly holds `node`, searching below `from`.
    pub fn find_container(&self, from: NodeId, node: NodeId) -> Result<Option<NodeId>, AstError> {
        for candidate in std::iter::once(from).chain(self.descendants(from)?) {
            if let NodeKind::List(items) = self.kind(candidate)?
                && items.contains(&node)
            {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

impl Ast {
    /// Indented outline of the subtree at `id`, one node per line.
    ///
    /// Used by tests and the command-line `dump` output. Round-trip data is
    /// not shown.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Ok(kind) = self.kind(id) else {
            out.push_str(&format!("{:indent$}<missing {id}>\n", "", indent = depth * 2));
            return;
        };
        let detail = match kind {
            NodeKind::Text(text) | NodeKind::Newline(text) | NodeKind::XmlComment(text) => {
                format!(" {text:?}")
            }
            NodeKind::InternalLink { target, .. } => format!(" {target}"),
            NodeKind::XmlElement { name, .. } => format!(" <{name}>"),
            NodeKind::XmlAttribute { name, .. } => format!(" {name}"),
            NodeKind::XmlCharRef(code) => format!(" {code}"),
            NodeKind::XmlEntityRef { name, .. } => format!(" {name}"),
            _ => String::new(),
        };
        out.push_str(&format!(
            "{:indent$}{}{detail}\n",
            "",
            kind.name(),
            indent = depth * 2
        ));
        for child in kind.children() {
            self.dump_into(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_arena_has_empty_page() {
        let ast = Ast::new();
        assert!(matches!(ast.kind(ast.root()).unwrap(), NodeKind::Page { .. }));
        assert_eq!(ast.list(ast.page_content()).unwrap(), &[] as &[NodeId]);
    }

    #[test]
    fn rtd_slot_count_must_match_children() {
        let mut ast = Ast::new();
        let content = ast.new_list(vec![]);
        let bold = ast.alloc(NodeKind::Bold { content });

        let err = ast
            .set_rtd(bold, Some(RtData::from_slots(["'''"])))
            .unwrap_err();
        assert_eq!(
            err,
            AstError::RtdSlotMismatch {
                node: bold,
                expected: 2,
                found: 1
            }
        );
        assert!(ast.rtd(bold).unwrap().is_none());

        ast.set_rtd(bold, Some(RtData::from_slots(["'''", "'''"])))
            .unwrap();
        assert_eq!(ast.rtd(bold).unwrap().unwrap().len(), 2);
    }

    #[test]
    fn lists_refuse_rtd() {
        let mut ast = Ast::new();
        let list = ast.new_list(vec![]);
        assert_eq!(
            ast.set_rtd(list, Some(RtData::from_slots([""]))),
            Err(AstError::RtdOnContainer(list))
        );
    }

    #[test]
    fn list_access_on_leaf_is_an_error() {
        let mut ast = Ast::new();
        let text = ast.alloc(NodeKind::Text("x".into()));
        assert_eq!(ast.list(text), Err(AstError::NotAContainer(text)));
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut ast = Ast::new();
        let a = ast.alloc(NodeKind::Text("a".into()));
        let inner = ast.new_list(vec![a]);
        let bold = ast.alloc(NodeKind::Bold { content: inner });
        let b = ast.alloc(NodeKind::Text("b".into()));
        let content = ast.page_content();
        ast.list_mut(content).unwrap().extend([bold, b]);

        assert_eq!(
            ast.descendants(ast.root()).unwrap(),
            vec![content, bold, inner, a, b]
        );
        assert_eq!(ast.find_container(ast.root(), a).unwrap(), Some(inner));
        assert_eq!(ast.find_container(ast.root(), b).unwrap(), Some(content));
    }
}
