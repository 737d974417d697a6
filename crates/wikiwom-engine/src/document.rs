//! # WOM Document
//!
//! The document owns both trees: the AST arena, which is what gets printed,
//! and the WOM node table layered over it. Every WOM element points at the
//! AST node that represents it:
//!
//! ```text
//! WOM                          AST
//! Page ─────────────────────── Page
//! ├── Body ─────────────────── List (page content)
//! │   └── Italics (generic) ── XmlElement <i>
//! │       └── Text ─────────── Text
//! └── Category "Foo" ───────── InternalLink [[Category:Foo]] (+ more analogs)
//! ```
//!
//! An element is either *native* (backed by the dedicated wikitext node,
//! e.g. `''x''`) or *generic* (backed by an `XmlElement`, e.g. `<i>x</i>`).
//! Native elements are promoted to generic the first time an attribute that
//! has to be written as XML is set on them.
//!
//! Categories are the exception: they are backed by every category link on
//! the page that names them (their *analogs*), the most recently added one
//! being canonical.
//!
//! Nodes created through the `create_*` methods start detached and are
//! attached with the child operations in [`content`](crate::content).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use wikiwom_config::WikiConfig;
use wikiwom_syntax::printer::print_document;
use wikiwom_syntax::{Ast, NodeId, NodeKind};

use crate::attributes::Attribute;
use crate::attributes::descriptors;
use crate::error::{Result, WomError};
use crate::toolbox;
use crate::validate;

/// Index of a node in a [`WomDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WomId(u32);

impl WomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WomKind {
    Page,
    Body,
    Paragraph,
    Bold,
    Italics,
    HorizontalRule,
    Div,
    /// `[[target]]` link to another page
    PageLink,
    Text,
    Comment,
    Category,
    /// XML element kept as-is because no WOM type exists for it
    Opaque,
}

/// The DOM-level type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WomNodeType {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
}

impl WomKind {
    pub fn node_name(self) -> &'static str {
        match self {
            WomKind::Page => "page",
            WomKind::Body => "body",
            WomKind::Paragraph => "p",
            WomKind::Bold => "b",
            WomKind::Italics => "i",
            WomKind::HorizontalRule => "hr",
            WomKind::Div => "div",
            WomKind::PageLink => "link",
            WomKind::Text => "#text",
            WomKind::Comment => "#comment",
            WomKind::Category => "category",
            WomKind::Opaque => "#opaque",
        }
    }

    pub fn node_type(self) -> WomNodeType {
        match self {
            WomKind::Page => WomNodeType::Document,
            WomKind::Text => WomNodeType::Text,
            WomKind::Comment => WomNodeType::Comment,
            _ => WomNodeType::Element,
        }
    }

    /// Tag used for the generic representation.
    pub(crate) fn tag(self) -> Option<&'static str> {
        match self {
            WomKind::Paragraph => Some("p"),
            WomKind::Bold => Some("b"),
            WomKind::Italics => Some("i"),
            WomKind::HorizontalRule => Some("hr"),
            WomKind::Div => Some("div"),
            _ => None,
        }
    }
}

/// The AST node an element is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRepr {
    /// Dedicated wikitext syntax
    Native(NodeId),
    /// An `XmlElement`
    Generic(NodeId),
}

impl ElementRepr {
    pub fn node(self) -> NodeId {
        match self {
            ElementRepr::Native(id) | ElementRepr::Generic(id) => id,
        }
    }
}

/// One category link backing a category element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CategoryAnalog {
    pub container: NodeId,
    pub link: NodeId,
}

#[derive(Debug, Clone)]
pub(crate) struct WomNode {
    pub kind: WomKind,
    pub parent: Option<WomId>,
    pub children: Vec<WomId>,
    /// `None` for categories, which are backed by their analogs instead
    pub repr: Option<ElementRepr>,
    pub attributes: Vec<Attribute>,
    pub analogs: Vec<CategoryAnalog>,
}

/// A page as an editable object model synchronized with its wikitext AST.
#[derive(Debug, Clone)]
pub struct WomDocument {
    pub(crate) ast: Ast,
    pub(crate) config: WikiConfig,
    pub(crate) nodes: Vec<WomNode>,
    pub(crate) page: WomId,
    pub(crate) body: WomId,
    /// Attached categories by lower-cased name
    pub(crate) categories: BTreeMap<String, WomId>,
    /// Every category link that backs a category element
    pub(crate) category_links: HashMap<NodeId, WomId>,
}

impl WomDocument {
    /// An empty page.
    pub fn new(config: WikiConfig, title: &str) -> Result<Self> {
        Self::with_ast(Ast::new(), config, title)
    }

    /// Page and body over an existing AST; the body is left empty.
    pub(crate) fn with_ast(ast: Ast, config: WikiConfig, title: &str) -> Result<Self> {
        let title = title.trim();
        validate::check_valid_title(Some(title))?;

        let (root, content) = (ast.root(), ast.page_content());
        let mut doc = Self {
            ast,
            config,
            nodes: Vec::new(),
            page: WomId(0),
            body: WomId(0),
            categories: BTreeMap::new(),
            category_links: HashMap::new(),
        };
        doc.page = doc.alloc(WomKind::Page, Some(ElementRepr::Native(root)));
        doc.body = doc.alloc(WomKind::Body, Some(ElementRepr::Native(content)));
        doc.nodes[doc.body.index()].parent = Some(doc.page);
        doc.nodes[doc.page.index()].children.push(doc.body);
        doc.set_attribute_unchecked(doc.page, "title", title)?;
        Ok(doc)
    }

    pub(crate) fn alloc(&mut self, kind: WomKind, repr: Option<ElementRepr>) -> WomId {
        let id = WomId(self.nodes.len() as u32);
        self.nodes.push(WomNode {
            kind,
            parent: None,
            children: Vec::new(),
            repr,
            attributes: Vec::new(),
            analogs: Vec::new(),
        });
        id
    }

    pub(crate) fn node(&self, id: WomId) -> Result<&WomNode> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| WomError::invariant(format!("unknown WOM node {id}")))
    }

    pub(crate) fn node_mut(&mut self, id: WomId) -> Result<&mut WomNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| WomError::invariant(format!("unknown WOM node {id}")))
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn page(&self) -> WomId {
        self.page
    }

    pub fn body(&self) -> WomId {
        self.body
    }

    pub fn kind(&self, id: WomId) -> Result<WomKind> {
        Ok(self.node(id)?.kind)
    }

    pub fn parent(&self, id: WomId) -> Result<Option<WomId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: WomId) -> Result<&[WomId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn node_type(&self, id: WomId) -> Result<WomNodeType> {
        Ok(self.kind(id)?.node_type())
    }

    /// The element name; opaque elements report the tag they were read from.
    pub fn node_name(&self, id: WomId) -> Result<String> {
        let kind = self.kind(id)?;
        if kind == WomKind::Opaque
            && let NodeKind::XmlElement { name, .. } = self.ast.kind(self.native_node(id)?)?
        {
            return Ok(name.clone());
        }
        Ok(kind.node_name().to_string())
    }

    /// The AST node currently representing `id`.
    ///
    /// For a category this is its canonical analog, or `None` once the
    /// category has been removed from the page.
    pub fn as_ast_node(&self, id: WomId) -> Result<Option<NodeId>> {
        let node = self.node(id)?;
        Ok(match node.repr {
            Some(repr) => Some(repr.node()),
            None => node.analogs.last().map(|analog| analog.link),
        })
    }

    pub fn is_generic(&self, id: WomId) -> Result<bool> {
        Ok(matches!(self.node(id)?.repr, Some(ElementRepr::Generic(_))))
    }

    /// The backing node of a non-category element.
    pub(crate) fn native_node(&self, id: WomId) -> Result<NodeId> {
        self.node(id)?
            .repr
            .map(ElementRepr::node)
            .ok_or_else(|| WomError::invariant(format!("{id} has no single backing AST node")))
    }

    pub(crate) fn generic_node(&self, id: WomId) -> Result<NodeId> {
        match self.node(id)?.repr {
            Some(ElementRepr::Generic(node)) => Ok(node),
            _ => Err(WomError::invariant(format!("{id} is not a generic element"))),
        }
    }

    /// Whether `ancestor` is `id` or lies on its parent chain.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: WomId, id: WomId) -> Result<bool> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return Ok(true);
            }
            cursor = self.parent(current)?;
        }
        Ok(false)
    }

    /// All nodes below `id` in document order, excluding `id`.
    pub fn descendants(&self, id: WomId) -> Result<Vec<WomId>> {
        let mut out = Vec::new();
        let mut stack: Vec<WomId> = self.children(id)?.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next)?.iter().rev());
        }
        Ok(out)
    }

    /// Elements with the given node name, in document order.
    pub fn elements_by_name(&self, name: &str) -> Result<Vec<WomId>> {
        let mut out = Vec::new();
        for id in self.descendants(self.page)? {
            if self.node_name(id)?.eq_ignore_ascii_case(name) {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Print the AST back to wikitext.
    pub fn to_wikitext(&self) -> Result<String> {
        Ok(print_document(&self.ast)?)
    }

    /// Indented outline of the WOM, one node per line with its attributes.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(self.page, 0, &mut out);
        out
    }

    fn dump_into(&self, id: WomId, depth: usize, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        let name = self
            .node_name(id)
            .unwrap_or_else(|_| node.kind.node_name().to_string());
        out.push_str(&format!("{:indent$}{name}", "", indent = depth * 2));
        match node.kind {
            WomKind::Text | WomKind::Comment => {
                if let Ok(text) = self.text_content(id) {
                    out.push_str(&format!(" {text:?}"));
                }
            }
            _ => {
                for attr in &node.attributes {
                    out.push_str(&format!(" {}={:?}", attr.name, attr.value));
                }
            }
        }
        if matches!(node.repr, Some(ElementRepr::Generic(_))) {
            out.push_str(" (xml)");
        }
        out.push('\n');
        for child in &node.children {
            self.dump_into(*child, depth + 1, out);
        }
    }

    /// Text of a text node, or the comment text of a comment node.
    pub fn text_content(&self, id: WomId) -> Result<String> {
        let node = self.native_node(id)?;
        match (self.kind(id)?, self.ast.kind(node)?) {
            (WomKind::Comment, NodeKind::XmlComment(text)) => Ok(text.clone()),
            (WomKind::Text, _) => toolbox::to_text(&self.ast, node),
            (kind, _) => Err(WomError::unsupported(format!(
                "<{}> has no text content",
                kind.node_name()
            ))),
        }
    }
}

// =============================================================================
// Node creation

impl WomDocument {
    fn create_native(&mut self, kind: WomKind, ast_kind: NodeKind) -> Result<WomId> {
        let node = self.ast.alloc(ast_kind);
        toolbox::add_rtd(&mut self.ast, node)?;
        Ok(self.alloc(kind, Some(ElementRepr::Native(node))))
    }

    pub fn create_paragraph(&mut self) -> Result<WomId> {
        let content = self.ast.new_list(Vec::new());
        self.create_native(WomKind::Paragraph, NodeKind::Paragraph { content })
    }

    pub fn create_bold(&mut self) -> Result<WomId> {
        let content = self.ast.new_list(Vec::new());
        self.create_native(WomKind::Bold, NodeKind::Bold { content })
    }

    pub fn create_italics(&mut self) -> Result<WomId> {
        let content = self.ast.new_list(Vec::new());
        self.create_native(WomKind::Italics, NodeKind::Italics { content })
    }

    pub fn create_horizontal_rule(&mut self) -> Result<WomId> {
        self.create_native(WomKind::HorizontalRule, NodeKind::HorizontalRule)
    }

    /// `<div>` has no wikitext syntax, so it is always generic.
    pub fn create_div(&mut self) -> Result<WomId> {
        let attributes = self.ast.new_list(Vec::new());
        let body = self.ast.new_list(Vec::new());
        let node = self.ast.alloc(NodeKind::XmlElement {
            name: "div".to_string(),
            empty: false,
            attributes,
            body,
        });
        toolbox::add_rtd(&mut self.ast, node)?;
        Ok(self.alloc(WomKind::Div, Some(ElementRepr::Generic(node))))
    }

    pub fn create_page_link(&mut self, target: &str) -> Result<WomId> {
        let Some(target) = descriptors::link_target(self, self.page, target)? else {
            return Err(WomError::validation("a page link needs a target"));
        };
        let title = self.ast.new_list(Vec::new());
        let id = self.create_native(
            WomKind::PageLink,
            NodeKind::InternalLink {
                target: target.clone(),
                title,
            },
        )?;
        self.set_attribute_unchecked(id, "target", &target)?;
        Ok(id)
    }

    pub fn create_text(&mut self, text: &str) -> Result<WomId> {
        let node = self.ast.alloc(NodeKind::Text(text.to_string()));
        Ok(self.alloc(WomKind::Text, Some(ElementRepr::Native(node))))
    }

    pub fn create_comment(&mut self, text: &str) -> Result<WomId> {
        validate::check_valid_comment_text(text)?;
        self.create_native(WomKind::Comment, NodeKind::XmlComment(text.to_string()))
    }
}
