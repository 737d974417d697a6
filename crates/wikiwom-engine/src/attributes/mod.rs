//! # Attributes
//!
//! Every attribute a WOM element can carry is governed by exactly one
//! [`AttributeDescriptor`], looked up by name in static tables:
//!
//! ```text
//! element-specific table  →  universal table  →  generic catch-all
//!   (hr: align, size, ...)    (id, class, ...)     (anything, CDATA)
//! ```
//!
//! Elements that cannot be written as XML (the page, categories, page links)
//! have no universal or generic fallback, so unknown names are rejected.
//!
//! The manager in [`manager`] runs every write through the same pipeline:
//! resolve → verify → normalize → sync into the AST → commit → custom action.

pub mod descriptors;
pub mod manager;
pub mod verifiers;

use wikiwom_syntax::NodeId;

use crate::document::{WomDocument, WomId, WomKind};
use crate::error::Result;

/// How whitespace in a value is normalized before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Tabs and line breaks become spaces.
    Cdata,
    /// As `Cdata`, then runs of spaces collapse and the ends are trimmed.
    NonCdata,
}

/// Checks a new value and returns what should be stored, `None` meaning the
/// attribute is to be removed.
pub type Verify = fn(&WomDocument, WomId, &str) -> Result<Option<String>>;

/// Runs after a value has been committed, with the old and new values.
pub type CustomAction = fn(&mut WomDocument, WomId, Option<&str>, Option<&str>) -> Result<()>;

/// Policy record for one attribute name.
#[derive(Debug)]
pub struct AttributeDescriptor {
    pub name: &'static str,
    pub verify: Verify,
    pub normalization: Normalization,
    pub removable: bool,
    pub sync_to_ast: bool,
    pub custom_action: Option<CustomAction>,
}

/// One entry of an element's attribute store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute {
    /// Lower-cased name
    pub name: String,
    /// Normalized value
    pub value: String,
    /// Backing `XmlAttribute` node when the element is generic
    pub ast: Option<NodeId>,
}

/// Read-only view of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeView {
    pub name: String,
    pub value: String,
    /// The AST attribute node carrying the value, if any
    pub ast_node: Option<NodeId>,
}

impl From<&Attribute> for AttributeView {
    fn from(attr: &Attribute) -> Self {
        Self {
            name: attr.name.clone(),
            value: attr.value.clone(),
            ast_node: attr.ast,
        }
    }
}

pub fn normalize(mode: Normalization, value: &str) -> String {
    let cdata: String = value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect();
    match mode {
        Normalization::Cdata => cdata,
        Normalization::NonCdata => cdata.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// The descriptor governing `name` on an element of `kind`.
pub fn resolve(kind: WomKind, name: &str) -> Option<&'static AttributeDescriptor> {
    let name = name.to_ascii_lowercase();
    let (specific, open): (&[AttributeDescriptor], bool) = match kind {
        WomKind::Page => (descriptors::PAGE, false),
        WomKind::Paragraph => (descriptors::PARAGRAPH, true),
        WomKind::Div => (descriptors::DIV, true),
        WomKind::HorizontalRule => (descriptors::HORIZONTAL_RULE, true),
        WomKind::Bold | WomKind::Italics => (&[], true),
        WomKind::PageLink => (descriptors::PAGE_LINK, false),
        WomKind::Category => (descriptors::CATEGORY, false),
        WomKind::Body | WomKind::Text | WomKind::Comment | WomKind::Opaque => (&[], false),
    };
    if let Some(descriptor) = specific.iter().find(|d| d.name == name) {
        return Some(descriptor);
    }
    if !open {
        return None;
    }
    descriptors::UNIVERSAL
        .iter()
        .find(|d| d.name == name)
        .or(Some(&descriptors::GENERIC))
}
