//! # Printer - Serializing an AST Back to Wikitext
//!
//! Nodes carrying round-trip data print their glue interleaved with their
//! children, which reproduces the parsed input byte for byte. Nodes without
//! round-trip data were synthesized by an edit and print in a canonical form:
//!
//! | Node | Synthesized form |
//! |------|------------------|
//! | bold | `'''content'''` |
//! | italics | `''content''` |
//! | horizontal rule | `----` |
//! | internal link | `[[target]]` / `[[target\|title]]` |
//! | XML element | `<name attrs>body</name>` / `<name attrs />` |
//! | XML attribute | ` name="value"` / ` name` |
//! | comment | `<!--text-->` |
//! | char / entity ref | `&#65;` / `&amp;` |

use crate::ast::{Ast, NodeId, NodeKind};
use crate::error::AstError;

/// Serialize the subtree rooted at `id`.
pub fn print(ast: &Ast, id: NodeId) -> Result<String, AstError> {
    let mut printer = Printer {
        ast,
        out: String::new(),
    };
    printer.node(id)?;
    Ok(printer.out)
}

/// Serialize the whole page.
pub fn print_document(ast: &Ast) -> Result<String, AstError> {
    print(ast, ast.root())
}

struct Printer<'a> {
    ast: &'a Ast,
    out: String,
}

impl Printer<'_> {
    fn node(&mut self, id: NodeId) -> Result<(), AstError> {
        let ast = self.ast;
        let kind = ast.kind(id)?;
        if let Some(rtd) = ast.rtd(id)? {
            for (i, child) in kind.children().into_iter().enumerate() {
                self.out.push_str(rtd.slot(i).unwrap_or_default());
                self.node(child)?;
            }
            self.out
                .push_str(rtd.slot(kind.child_count()).unwrap_or_default());
            return Ok(());
        }

        match kind {
            NodeKind::Page { content } | NodeKind::Paragraph { content } => self.node(*content)?,
            NodeKind::List(items) => {
                for item in items {
                    self.node(*item)?;
                }
            }
            NodeKind::Text(text) | NodeKind::Newline(text) => self.out.push_str(text),
            NodeKind::Bold { content } => self.wrap("'''", *content, "'''")?,
            NodeKind::Italics { content } => self.wrap("''", *content, "''")?,
            NodeKind::HorizontalRule => self.out.push_str("----"),
            NodeKind::InternalLink { target, title } => {
                self.out.push_str("[[");
                self.out.push_str(target);
                if !ast.list(*title)?.is_empty() {
                    self.out.push('|');
                    self.node(*title)?;
                }
                self.out.push_str("]]");
            }
            NodeKind::XmlElement {
                name,
                empty,
                attributes,
                body,
            } => {
                self.out.push('<');
                self.out.push_str(name);
                self.node(*attributes)?;
                if *empty {
                    self.out.push_str(" />");
                } else {
                    self.out.push('>');
                    self.node(*body)?;
                    self.out.push_str("</");
                    self.out.push_str(name);
                    self.out.push('>');
                }
            }
            NodeKind::XmlAttribute {
                name,
                has_value,
                value,
            } => {
                self.out.push(' ');
                self.out.push_str(name);
                if *has_value {
                    self.wrap("=\"", *value, "\"")?;
                }
            }
            NodeKind::XmlComment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            NodeKind::XmlCharRef(code) => {
                self.out.push_str(&format!("&#{code};"));
            }
            NodeKind::XmlEntityRef { name, .. } => {
                self.out.push('&');
                self.out.push_str(name);
                self.out.push(';');
            }
        }
        Ok(())
    }

    fn wrap(&mut self, open: &str, content: NodeId, close: &str) -> Result<(), AstError> {
        self.out.push_str(open);
        self.node(content)?;
        self.out.push_str(close);
        Ok(())
    }
}
