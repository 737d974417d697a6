//! # wikiwom-engine
//!
//! The Wiki Object Model (WOM): a DOM-style, editable view of a wikitext page
//! that is kept synchronized with the round-trippable AST produced by
//! [`wikiwom_syntax`]. Every WOM edit is applied to the AST in the same call,
//! so printing the AST always yields the edited page, and everything that
//! was not edited keeps its original spelling.
//!
//! ```
//! use wikiwom_config::WikiConfig;
//! use wikiwom_engine::WomDocument;
//!
//! let mut doc = WomDocument::parse("''x'' [[Category:Foo]]", WikiConfig::default(), "Demo").unwrap();
//! let italics = doc.elements_by_name("i").unwrap()[0];
//! doc.set_attribute(italics, "style", "color:red").unwrap();
//! doc.rename_category("foo", "Bar").unwrap();
//!
//! assert_eq!(
//!     doc.to_wikitext().unwrap(),
//!     "<i style=\"color:red\">x</i> [[Category:Bar]]"
//! );
//! ```
//!
//! ## Module Structure
//!
//! - [`document`] - node table, queries and node creation
//! - [`factory`] - building a WOM over a parsed AST
//! - [`content`] - child operations and native-to-generic conversion
//! - [`attributes`] - descriptor tables and the attribute pipeline
//! - [`category`] - page categories and their link analogs
//! - [`accessors`] - typed properties over the attribute store
//! - [`toolbox`] - AST list surgery and canonical glue
//! - [`validate`] - value validators
//! - [`builder`] - building pages from scratch

pub mod accessors;
pub mod attributes;
pub mod builder;
pub mod category;
pub mod content;
pub mod document;
pub mod error;
pub mod factory;
pub mod toolbox;
pub mod validate;

pub use accessors::{HorizAlign, ValueWithUnit};
pub use attributes::AttributeView;
pub use content::{ContentModel, native_to_generic};
pub use document::{ElementRepr, WomDocument, WomId, WomKind, WomNodeType};
pub use error::{Result, WomError};
pub use factory::{BuildOptions, UnsupportedElements};
