//! # Block-Level Grammar
//!
//! The page content is a flat sequence of:
//!
//! | Source | Node |
//! |--------|------|
//! | `----` at line start | horizontal rule |
//! | `<div>`, `<p>`, `<hr>`, ... at line start | XML element |
//! | line ending | newline |
//! | anything else | paragraph |
//!
//! A paragraph runs until a line ending that is followed by a blank line, a
//! rule, a block tag, or the end of input. That final line ending is not part
//! of the paragraph; it lands in the page content as a newline node.

use super::tag::{self, StartTag};
use super::{Parser, inline};
use crate::ast::NodeKind;
use crate::lexer::TokenKind;

const BLOCK_TAGS: &[&str] = &[
    "blockquote",
    "center",
    "div",
    "dl",
    "hr",
    "ol",
    "p",
    "pre",
    "table",
    "ul",
];

/// Parse the whole token stream into the page content.
pub(super) fn document(p: &mut Parser<'_, '_>) {
    let mut items = Vec::new();
    while !p.at_end() {
        if p.at(TokenKind::Newline) {
            let text = p.bump();
            items.push(p.ast.alloc(NodeKind::Newline(text.to_string())));
        } else if p.at(TokenKind::Dashes) && p.at_line_start() {
            let raw = p.bump();
            items.push(p.leaf(NodeKind::HorizontalRule, raw));
        } else if let Some(start) = block_tag_at(p, 0) {
            items.push(inline::element(p, start));
        } else {
            items.push(paragraph(p));
        }
    }

    let content = p.ast.page_content();
    if let Ok(list) = p.ast.list_mut(content) {
        *list = items;
    }
}

fn paragraph(p: &mut Parser<'_, '_>) -> crate::ast::NodeId {
    let items = inline::run(p);
    let content = p.ast.new_list(items);
    p.node(NodeKind::Paragraph { content }, ["", ""])
}

/// Whether the newline at the current position ends the paragraph.
pub(super) fn paragraph_ends_here(p: &Parser<'_, '_>) -> bool {
    match p.nth(1) {
        None | Some(TokenKind::Newline) | Some(TokenKind::Dashes) => true,
        Some(TokenKind::Lt) => block_tag_at(p, 1).is_some(),
        _ => false,
    }
}

/// A block-level start tag beginning at the token n ahead.
fn block_tag_at<'input>(p: &Parser<'_, 'input>, n: usize) -> Option<StartTag<'input>> {
    if p.nth(n) != Some(TokenKind::Lt) {
        return None;
    }
    let start = tag::start_tag(p.source(), p.nth_offset(n))?;
    let name = start.name.to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str()).then_some(start)
}
