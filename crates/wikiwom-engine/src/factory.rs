//! # Factory - Building the WOM From an AST
//!
//! One pass over the page content creates a WOM node for every AST node that
//! has a WOM counterpart, wiring it to that node. Native syntax becomes a
//! native element, recognized XML elements become generic elements, and
//! their XML attributes are adopted into the attribute store as they are,
//! without verification, since the AST is the source of truth.
//!
//! Some AST nodes deliberately get no WOM node:
//!
//! - links with unparsable targets and image links are logged and skipped,
//! - category links are collected and, once the walk is done, merged into
//!   one category element per case-insensitive name.
//!
//! The factory does not enforce content models: whatever the parser accepted
//! is represented as is.

use log::{debug, trace, warn};
use wikiwom_config::{LinkTargetType, WikiConfig};
use wikiwom_syntax::{Ast, NodeId, NodeKind, parse};

use crate::document::{ElementRepr, WomDocument, WomId, WomKind};
use crate::error::{Result, WomError};
use crate::toolbox;

/// Treatment of XML elements without a WOM type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedElements {
    /// Fail the build with [`WomError::UnsupportedElement`].
    #[default]
    Fail,
    /// Keep the element as an opaque leaf that prints unchanged.
    Preserve,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub unsupported_elements: UnsupportedElements,
}

impl WomDocument {
    /// Parse wikitext and build its WOM.
    pub fn parse(text: &str, config: WikiConfig, title: &str) -> Result<Self> {
        Self::from_ast(parse(text), config, title)
    }

    pub fn from_ast(ast: Ast, config: WikiConfig, title: &str) -> Result<Self> {
        Self::from_ast_with(ast, config, title, &BuildOptions::default())
    }

    pub fn from_ast_with(
        ast: Ast,
        config: WikiConfig,
        title: &str,
        options: &BuildOptions,
    ) -> Result<Self> {
        let mut doc = Self::with_ast(ast, config, title)?;
        let content = doc.ast.page_content();
        let body = doc.body;

        let mut factory = Factory {
            doc: &mut doc,
            options,
            pending: Vec::new(),
        };
        factory.children(body, content)?;

        let pending = std::mem::take(&mut factory.pending);
        for link in pending {
            doc.register_category_link(&link.name, link.container, link.link)?;
        }
        debug!(
            "Built WOM with {} nodes and {} categories",
            doc.nodes.len(),
            doc.categories.len()
        );
        Ok(doc)
    }
}

struct PendingCategory {
    name: String,
    container: NodeId,
    link: NodeId,
}

struct Factory<'a> {
    doc: &'a mut WomDocument,
    options: &'a BuildOptions,
    pending: Vec<PendingCategory>,
}

impl Factory<'_> {
    fn children(&mut self, parent: WomId, container: NodeId) -> Result<()> {
        let items = self.doc.ast.list(container)?.to_vec();
        for item in items {
            if let Some(child) = self.node(item, container)? {
                self.doc.node_mut(child)?.parent = Some(parent);
                self.doc.node_mut(parent)?.children.push(child);
            }
        }
        Ok(())
    }

    fn node(&mut self, node: NodeId, container: NodeId) -> Result<Option<WomId>> {
        let kind = self.doc.ast.kind(node)?.clone();
        trace!("Building WOM node for {} {node}", kind.name());
        let native = Some(ElementRepr::Native(node));
        let id = match kind {
            NodeKind::Text(_)
            | NodeKind::Newline(_)
            | NodeKind::XmlCharRef(_)
            | NodeKind::XmlEntityRef { .. } => self.doc.alloc(WomKind::Text, native),
            NodeKind::XmlComment(_) => self.doc.alloc(WomKind::Comment, native),
            NodeKind::HorizontalRule => self.doc.alloc(WomKind::HorizontalRule, native),
            NodeKind::Paragraph { content } => self.element(WomKind::Paragraph, native, content)?,
            NodeKind::Bold { content } => self.element(WomKind::Bold, native, content)?,
            NodeKind::Italics { content } => self.element(WomKind::Italics, native, content)?,
            NodeKind::InternalLink { target, title } => {
                return self.link(node, container, &target, title);
            }
            NodeKind::XmlElement {
                name,
                attributes,
                body,
                ..
            } => return self.xml_element(node, &name, attributes, body),
            NodeKind::Page { .. } | NodeKind::List(_) | NodeKind::XmlAttribute { .. } => {
                return Err(WomError::invariant(format!(
                    "unexpected {} node {node} in content",
                    kind.name()
                )));
            }
        };
        Ok(Some(id))
    }

    fn element(
        &mut self,
        kind: WomKind,
        repr: Option<ElementRepr>,
        content: NodeId,
    ) -> Result<WomId> {
        let id = self.doc.alloc(kind, repr);
        self.children(id, content)?;
        Ok(id)
    }

    fn link(
        &mut self,
        node: NodeId,
        container: NodeId,
        target: &str,
        title: NodeId,
    ) -> Result<Option<WomId>> {
        let parsed = match self.doc.config.parse_target(target) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Skipping link {node}: {err}");
                return Ok(None);
            }
        };
        if self.doc.config.is_category(&parsed) {
            self.pending.push(PendingCategory {
                name: parsed.title,
                container,
                link: node,
            });
            return Ok(None);
        }
        if self.doc.config.classify(&parsed) == LinkTargetType::Image {
            warn!("Skipping image link {node} to `{target}`");
            return Ok(None);
        }

        let id = self.element(WomKind::PageLink, Some(ElementRepr::Native(node)), title)?;
        self.doc.set_attribute_unchecked(id, "target", target.trim())?;
        Ok(Some(id))
    }

    fn xml_element(
        &mut self,
        node: NodeId,
        name: &str,
        attributes: NodeId,
        body: NodeId,
    ) -> Result<Option<WomId>> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "p" => WomKind::Paragraph,
            "hr" => WomKind::HorizontalRule,
            "b" => WomKind::Bold,
            "i" => WomKind::Italics,
            "div" => WomKind::Div,
            _ => return self.opaque(node, name),
        };

        let id = self.doc.alloc(kind, Some(ElementRepr::Generic(node)));
        for attr in self.doc.ast.list(attributes)?.to_vec() {
            let NodeKind::XmlAttribute {
                name,
                has_value,
                value,
            } = self.doc.ast.kind(attr)?.clone()
            else {
                return Err(WomError::invariant(format!(
                    "attribute list of {node} holds a non-attribute"
                )));
            };
            let text = if has_value {
                toolbox::to_text(&self.doc.ast, value)?
            } else {
                name.clone()
            };
            self.doc.adopt_attribute(id, &name, &text, attr)?;
        }
        self.children(id, body)?;
        Ok(Some(id))
    }

    fn opaque(&mut self, node: NodeId, name: &str) -> Result<Option<WomId>> {
        if self.options.unsupported_elements == UnsupportedElements::Fail {
            return Err(WomError::UnsupportedElement {
                node,
                name: name.to_string(),
            });
        }
        debug!("Preserving unsupported element <{name}> {node}");

        for inner in self.doc.ast.descendants(node)? {
            let Some(category) = self.doc.link_category_name(inner)? else {
                continue;
            };
            let container = self.doc.ast.find_container(node, inner)?.ok_or_else(|| {
                WomError::invariant(format!("category link {inner} has no container"))
            })?;
            self.pending.push(PendingCategory {
                name: category,
                container,
                link: inner,
            });
        }
        Ok(Some(
            self.doc
                .alloc(WomKind::Opaque, Some(ElementRepr::Generic(node))),
        ))
    }
}
