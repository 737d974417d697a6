//! Programmatic construction of pages.
//!
//! ```
//! use wikiwom_engine::builder::{Content, PageBuilder};
//!
//! let doc = PageBuilder::new("Sandbox")
//!     .content(Content::paragraph([
//!         Content::text("Hello "),
//!         Content::bold([Content::text("world")]),
//!     ]))
//!     .category("Examples")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     doc.to_wikitext().unwrap(),
//!     "\n\nHello '''world'''[[Category:Examples]]"
//! );
//! ```

use wikiwom_config::WikiConfig;

use crate::document::{WomDocument, WomId};
use crate::error::Result;

/// A subtree to be created under the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Comment(String),
    Paragraph(Vec<Content>),
    Bold(Vec<Content>),
    Italics(Vec<Content>),
    Div(Vec<Content>),
    HorizontalRule,
    Link { target: String, title: Vec<Content> },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    pub fn paragraph(items: impl IntoIterator<Item = Content>) -> Self {
        Content::Paragraph(items.into_iter().collect())
    }

    pub fn bold(items: impl IntoIterator<Item = Content>) -> Self {
        Content::Bold(items.into_iter().collect())
    }

    pub fn italics(items: impl IntoIterator<Item = Content>) -> Self {
        Content::Italics(items.into_iter().collect())
    }

    pub fn link(target: impl Into<String>) -> Self {
        Content::Link {
            target: target.into(),
            title: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageBuilder {
    config: WikiConfig,
    title: String,
    namespace: Option<String>,
    path: Option<String>,
    body: Vec<Content>,
    categories: Vec<String>,
}

impl PageBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            config: WikiConfig::default(),
            title: title.into(),
            namespace: None,
            path: None,
            body: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn config(mut self, config: WikiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn content(mut self, content: Content) -> Self {
        self.body.push(content);
        self
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(name.into());
        self
    }

    /// Create the document, validating every value on the way.
    pub fn build(self) -> Result<WomDocument> {
        let mut doc = WomDocument::new(self.config, &self.title)?;
        if let Some(namespace) = &self.namespace {
            doc.set_namespace(Some(namespace))?;
        }
        if let Some(path) = &self.path {
            doc.set_path(Some(path))?;
        }
        let body = doc.body();
        for content in &self.body {
            let child = create(&mut doc, content)?;
            doc.append_child(body, child)?;
        }
        for name in &self.categories {
            doc.add_category(name)?;
        }
        Ok(doc)
    }
}

fn create(doc: &mut WomDocument, content: &Content) -> Result<WomId> {
    let (id, items) = match content {
        Content::Text(text) => return doc.create_text(text),
        Content::Comment(text) => return doc.create_comment(text),
        Content::HorizontalRule => return doc.create_horizontal_rule(),
        Content::Paragraph(items) => (doc.create_paragraph()?, items),
        Content::Bold(items) => (doc.create_bold()?, items),
        Content::Italics(items) => (doc.create_italics()?, items),
        Content::Div(items) => (doc.create_div()?, items),
        Content::Link { target, title } => (doc.create_page_link(target)?, title),
    };
    for item in items {
        let child = create(doc, item)?;
        doc.append_child(id, child)?;
    }
    Ok(id)
}
