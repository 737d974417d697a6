//! # Child Operations
//!
//! DOM-style structural edits on the WOM, each mirrored onto the AST
//! container that holds the parent's children:
//!
//! | parent                   | AST container                      |
//! |--------------------------|------------------------------------|
//! | body                     | the page content list              |
//! | native p / b / i         | the node's content list            |
//! | page link                | the link title list                |
//! | generic element          | the `XmlElement` body list         |
//!
//! Every check (content model, membership, attachment) runs before the AST
//! is touched, and the AST is edited before the WOM so that a failing AST
//! operation leaves the WOM as it was.
//!
//! Removing or replacing a subtree that holds category links moves those
//! categories to the end of the page instead of dropping them.

use log::debug;
use wikiwom_syntax::{Ast, NodeId, NodeKind};

use crate::document::{ElementRepr, WomDocument, WomId, WomKind};
use crate::error::{Result, WomError};
use crate::toolbox;
use crate::validate;

/// Which children an element accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel {
    /// Block and inline content
    Flow,
    Inline,
    /// Inline content except further links
    LinkTitle,
    /// No children at all
    Empty,
}

impl ContentModel {
    /// `None` for nodes whose children cannot be edited through the child
    /// operations: the page, categories and leaves.
    pub fn of(kind: WomKind) -> Option<ContentModel> {
        match kind {
            WomKind::Body | WomKind::Div => Some(ContentModel::Flow),
            WomKind::Paragraph | WomKind::Bold | WomKind::Italics => Some(ContentModel::Inline),
            WomKind::PageLink => Some(ContentModel::LinkTitle),
            WomKind::HorizontalRule => Some(ContentModel::Empty),
            WomKind::Page
            | WomKind::Category
            | WomKind::Text
            | WomKind::Comment
            | WomKind::Opaque => None,
        }
    }

    pub fn accepts(self, kind: WomKind) -> bool {
        let inline = matches!(
            kind,
            WomKind::Text | WomKind::Comment | WomKind::Bold | WomKind::Italics | WomKind::Opaque
        );
        match self {
            ContentModel::Flow => {
                inline
                    || matches!(
                        kind,
                        WomKind::PageLink
                            | WomKind::Paragraph
                            | WomKind::HorizontalRule
                            | WomKind::Div
                    )
            }
            ContentModel::Inline => inline || kind == WomKind::PageLink,
            ContentModel::LinkTitle => inline,
            ContentModel::Empty => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Position {
    First,
    Last,
    Before(WomId),
    After(WomId),
}

/// Turn a native paragraph, bold, italics or rule node into the equivalent
/// `XmlElement`.
///
/// The content items move into the new element's body and the old content
/// list is left empty. The caller is responsible for putting the new node
/// where the old one was.
pub fn native_to_generic(ast: &mut Ast, kind: WomKind, native: NodeId) -> Result<NodeId> {
    let tag = kind.tag().ok_or_else(|| {
        WomError::invariant(format!("<{}> has no XML form", kind.node_name()))
    })?;
    let content = match ast.kind(native)? {
        NodeKind::Paragraph { content }
        | NodeKind::Bold { content }
        | NodeKind::Italics { content } => Some(*content),
        NodeKind::HorizontalRule => None,
        other => {
            return Err(WomError::invariant(format!(
                "cannot convert a {} node to <{tag}>",
                other.name()
            )));
        }
    };
    let (items, empty) = match content {
        Some(content) => (std::mem::take(ast.list_mut(content)?), false),
        None => (Vec::new(), true),
    };
    let attributes = ast.new_list(Vec::new());
    let body = ast.new_list(items);
    let element = ast.alloc(NodeKind::XmlElement {
        name: tag.to_string(),
        empty,
        attributes,
        body,
    });
    ast.set_rtd(element, Some(toolbox::xml_element_rtd(tag, empty)))?;
    Ok(element)
}

impl WomDocument {
    /// The AST list holding the children of `parent`.
    pub(crate) fn child_container(&self, parent: WomId) -> Result<NodeId> {
        let node = self.node(parent)?;
        let container = match (node.kind, node.repr) {
            (WomKind::Body, Some(ElementRepr::Native(list))) => Some(list),
            (_, Some(ElementRepr::Generic(element))) => match self.ast.kind(element)? {
                NodeKind::XmlElement { body, .. } => Some(*body),
                _ => None,
            },
            (_, Some(ElementRepr::Native(native))) => match self.ast.kind(native)? {
                NodeKind::Paragraph { content }
                | NodeKind::Bold { content }
                | NodeKind::Italics { content } => Some(*content),
                NodeKind::InternalLink { title, .. } => Some(*title),
                _ => None,
            },
            (_, None) => None,
        };
        container.ok_or_else(|| WomError::invariant(format!("{parent} has no child container")))
    }

    fn content_model(&self, parent: WomId) -> Result<ContentModel> {
        let kind = self.kind(parent)?;
        match kind {
            WomKind::Page => Err(WomError::unsupported(
                "the page's children are its body and its categories",
            )),
            WomKind::Category => Err(WomError::unsupported("categories have no children")),
            _ => ContentModel::of(kind).ok_or_else(|| {
                WomError::ContentModel(format!("<{}> cannot have children", kind.node_name()))
            }),
        }
    }

    fn check_insertable(&self, parent: WomId, child: WomId) -> Result<()> {
        let model = self.content_model(parent)?;
        let kind = self.kind(child)?;
        match kind {
            WomKind::Category => {
                return Err(WomError::unsupported(
                    "categories are added through the page's category operations",
                ));
            }
            WomKind::Page | WomKind::Body => {
                return Err(WomError::unsupported(format!(
                    "<{}> cannot be moved",
                    kind.node_name()
                )));
            }
            _ => {}
        }
        if self.parent(child)?.is_some() {
            return Err(WomError::unsupported(format!(
                "{child} is already attached; remove it first"
            )));
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(WomError::validation(format!(
                "cannot insert {child} into its own subtree"
            )));
        }
        if !model.accepts(kind) {
            return Err(WomError::ContentModel(format!(
                "<{}> does not accept <{}>",
                self.kind(parent)?.node_name(),
                kind.node_name()
            )));
        }
        Ok(())
    }

    fn child_index(&self, parent: WomId, child: WomId) -> Result<usize> {
        self.children(parent)?
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| WomError::validation(format!("{child} is not a child of {parent}")))
    }

    fn insert(&mut self, parent: WomId, child: WomId, position: Position) -> Result<()> {
        self.check_insertable(parent, child)?;
        let index = match position {
            Position::First => 0,
            Position::Last => self.children(parent)?.len(),
            Position::Before(reference) => self.child_index(parent, reference)?,
            Position::After(reference) => self.child_index(parent, reference)? + 1,
        };

        let container = self.child_container(parent)?;
        let node = self.native_node(child)?;
        match position {
            Position::First => toolbox::prepend(&mut self.ast, container, node)?,
            Position::Last => toolbox::append(&mut self.ast, container, node)?,
            Position::Before(reference) => {
                let reference = self.native_node(reference)?;
                toolbox::insert_before(&mut self.ast, container, node, reference)?
            }
            Position::After(reference) => {
                let reference = self.native_node(reference)?;
                toolbox::insert_after(&mut self.ast, container, node, reference)?
            }
        }

        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.refresh_glue(parent)
    }

    pub fn append_child(&mut self, parent: WomId, child: WomId) -> Result<()> {
        self.insert(parent, child, Position::Last)
    }

    pub fn prepend_child(&mut self, parent: WomId, child: WomId) -> Result<()> {
        self.insert(parent, child, Position::First)
    }

    /// Insert `child` right before `reference`, which must be a child of
    /// `parent`.
    pub fn insert_before(&mut self, parent: WomId, child: WomId, reference: WomId) -> Result<()> {
        self.insert(parent, child, Position::Before(reference))
    }

    pub fn insert_after(&mut self, parent: WomId, child: WomId, reference: WomId) -> Result<()> {
        self.insert(parent, child, Position::After(reference))
    }

    /// Detach `child` from `parent`. The node stays valid and can be
    /// inserted again.
    pub fn remove_child(&mut self, parent: WomId, child: WomId) -> Result<()> {
        self.content_model(parent)?;
        let index = self.child_index(parent, child)?;
        let container = self.child_container(parent)?;
        let node = self.native_node(child)?;
        toolbox::remove(&mut self.ast, container, node)?;

        self.node_mut(parent)?.children.remove(index);
        self.node_mut(child)?.parent = None;
        self.refresh_glue(parent)?;
        self.reattach_categories_below(node)
    }

    /// Put `new` in the place of `old`, which must be a child of `parent`.
    pub fn replace_child(&mut self, parent: WomId, new: WomId, old: WomId) -> Result<()> {
        self.check_insertable(parent, new)?;
        let index = self.child_index(parent, old)?;
        let container = self.child_container(parent)?;
        let (old_node, new_node) = (self.native_node(old)?, self.native_node(new)?);
        toolbox::replace(&mut self.ast, container, old_node, new_node)?;

        self.node_mut(parent)?.children[index] = new;
        self.node_mut(new)?.parent = Some(parent);
        self.node_mut(old)?.parent = None;
        self.refresh_glue(parent)?;
        self.reattach_categories_below(old_node)
    }

    /// Fix up glue that depends on whether a container is empty: `<x />`
    /// must become `<x></x>` once it has children, and a link title needs a
    /// pipe exactly when it is non-empty.
    fn refresh_glue(&mut self, parent: WomId) -> Result<()> {
        let Some(repr) = self.node(parent)?.repr else {
            return Ok(());
        };
        let node = repr.node();
        match self.ast.kind(node)? {
            NodeKind::XmlElement {
                name, empty: true, body, ..
            } if !self.ast.list(*body)?.is_empty() => {
                let rtd = toolbox::xml_element_rtd(name, false);
                if let NodeKind::XmlElement { empty, .. } = self.ast.kind_mut(node)? {
                    *empty = false;
                }
                self.ast.set_rtd(node, Some(rtd))?;
            }
            NodeKind::InternalLink { target, title } => {
                let titled = !self.ast.list(*title)?.is_empty();
                let piped = self
                    .ast
                    .rtd(node)?
                    .and_then(|rtd| rtd.slot(0))
                    .is_some_and(|head| head.ends_with('|'));
                if titled != piped {
                    let rtd = toolbox::internal_link_rtd(target, titled);
                    self.ast.set_rtd(node, Some(rtd))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Switch a native element to its XML representation, in place.
    ///
    /// Attributes already in the store are written to the new element. An
    /// element that is already generic is left alone.
    pub fn promote(&mut self, id: WomId) -> Result<()> {
        let node = self.node(id)?;
        let native = match node.repr {
            Some(ElementRepr::Native(native)) => native,
            Some(ElementRepr::Generic(_)) => return Ok(()),
            None => {
                return Err(WomError::unsupported(format!(
                    "<{}> has no XML form",
                    node.kind.node_name()
                )));
            }
        };
        let (kind, parent) = (node.kind, node.parent);
        let container = parent.map(|p| self.child_container(p)).transpose()?;
        let old_content = self.child_container(id).ok();

        let element = native_to_generic(&mut self.ast, kind, native)?;
        if let Some(container) = container {
            toolbox::replace(&mut self.ast, container, native, element)?;
        }
        self.node_mut(id)?.repr = Some(ElementRepr::Generic(element));
        if let Some(old_content) = old_content {
            let body = self.child_container(id)?;
            self.move_analogs(old_content, body);
        }
        debug!("Converted <{}> {id} to its XML form", kind.node_name());
        self.write_pending_attributes(id)
    }

    /// Replace the text of a text node.
    ///
    /// Text read from a line break or a character reference is backed by that
    /// node; it is swapped for a plain text node.
    pub fn set_text(&mut self, id: WomId, text: &str) -> Result<()> {
        if self.kind(id)? != WomKind::Text {
            return Err(WomError::unsupported(format!(
                "<{}> is not a text node",
                self.kind(id)?.node_name()
            )));
        }
        let node = self.native_node(id)?;
        if let NodeKind::Text(current) = self.ast.kind_mut(node)? {
            *current = text.to_string();
            return Ok(());
        }

        let container = self
            .parent(id)?
            .map(|parent| self.child_container(parent))
            .transpose()?;
        let replacement = self.ast.alloc(NodeKind::Text(text.to_string()));
        if let Some(container) = container {
            toolbox::replace(&mut self.ast, container, node, replacement)?;
        }
        self.node_mut(id)?.repr = Some(ElementRepr::Native(replacement));
        Ok(())
    }

    pub fn set_comment_text(&mut self, id: WomId, text: &str) -> Result<()> {
        if self.kind(id)? != WomKind::Comment {
            return Err(WomError::unsupported(format!(
                "<{}> is not a comment",
                self.kind(id)?.node_name()
            )));
        }
        validate::check_valid_comment_text(text)?;
        let node = self.native_node(id)?;
        if let NodeKind::XmlComment(current) = self.ast.kind_mut(node)? {
            *current = text.to_string();
        }
        self.ast.set_rtd(node, Some(toolbox::comment_rtd(text)))?;
        Ok(())
    }
}
