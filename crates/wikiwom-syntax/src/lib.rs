//! # wikiwom-syntax
//!
//! The wikitext abstract syntax tree that the Wiki Object Model is kept in
//! sync with, plus a parser and printer for a practical subset of wikitext.
//!
//! ## Round-Trip Data
//!
//! The AST drops surface details a plain syntax tree would lose: whether bold
//! was written `'''x'''` or `<b>x</b>`, the quotes around an attribute value,
//! the whitespace inside a tag. Each node may carry [`RtData`], the literal
//! glue printed around its children, so an unedited parse prints back
//! byte for byte:
//!
//! ```
//! use wikiwom_syntax::{parse, printer::print_document};
//!
//! let input = "<div  class='x'>''a''&amp;b</div >\n";
//! let ast = parse(input);
//! assert_eq!(print_document(&ast).unwrap(), input);
//! ```
//!
//! A node built by an edit has no round-trip data and prints in a canonical
//! synthesized form instead.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Ast arena → Printer → Text
//!               (Logos)          (recursive descent)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! wikiwom-syntax/
//! ├── lib.rs        # This file - public API
//! ├── ast.rs        # NodeId, NodeKind, Ast arena
//! ├── rtd.rs        # RtData glue records
//! ├── error.rs      # AstError
//! ├── printer.rs    # AST → wikitext
//! ├── lexer.rs      # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs    # Parser struct, parse()
//!     ├── block.rs  # paragraphs, rules, block tags
//!     ├── inline.rs # emphasis, links, tags, comments, references
//!     └── tag.rs    # start/end tag scanners
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod rtd;

pub use ast::{Ast, AstNode, NodeId, NodeKind};
pub use error::AstError;
pub use parser::parse;
pub use rtd::RtData;
