//! # Inline-Level Grammar
//!
//! Inline parsing is driven by the current token:
//!
//! | Token | Construct |
//! |-------|-----------|
//! | `'''` / `''` | bold / italics |
//! | `[[` | internal link, if `]]` follows on the same line |
//! | `<!--` | comment, up to `-->` or end of input |
//! | `<` | start tag, stray end tag, or plain text |
//! | `&amp;` / `&#65;` | entity / char reference, if it resolves |
//! | line ending | newline node |
//! | (other) | text, merged with neighbouring text |
//!
//! Emphasis never spans a line ending. Tag bodies do, including blank lines.

use super::tag::{self, AttrScan, StartTag};
use super::{Open, Parser, Run, block};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::lexer::{TokenKind, lex};
use crate::rtd::RtData;

const VOID_TAGS: &[&str] = &["br", "hr"];

/// Parse inline content until a token closes one of the open constructs.
pub(super) fn run(p: &mut Parser<'_, '_>) -> Vec<NodeId> {
    let mut run = Run::default();
    while !p.at_end() && !should_stop(p) {
        inline_element(p, &mut run);
    }
    run.finish(&mut p.ast)
}

fn should_stop(p: &Parser<'_, '_>) -> bool {
    match p.current() {
        Some(TokenKind::Newline) => match p.open.last() {
            Some(Open::Bold | Open::Italics | Open::LinkTitle) => true,
            Some(Open::Tag(_)) => false,
            None => block::paragraph_ends_here(p),
        },
        Some(TokenKind::LinkClose) => p.is_open(&Open::LinkTitle),
        Some(TokenKind::Bold) => p.is_open(&Open::Bold),
        Some(TokenKind::Italics) => p.is_open(&Open::Italics),
        Some(TokenKind::Lt) => tag::end_tag(p.source(), p.offset())
            .is_some_and(|end| p.is_open(&Open::Tag(end.name.to_ascii_lowercase()))),
        _ => false,
    }
}

fn inline_element(p: &mut Parser<'_, '_>, run: &mut Run) {
    match p.current() {
        Some(TokenKind::Bold) => emphasis(p, run, Open::Bold),
        Some(TokenKind::Italics) => emphasis(p, run, Open::Italics),
        Some(TokenKind::LinkOpen) => link(p, run),
        Some(TokenKind::CommentOpen) => comment(p, run),
        Some(TokenKind::Lt) => markup(p, run),
        Some(kind @ (TokenKind::CharRef | TokenKind::EntityRef)) => {
            let raw = p.bump();
            match reference(kind, raw) {
                Some(node) => {
                    let id = p.leaf(node, raw);
                    run.push(&mut p.ast, id);
                }
                None => run.text(raw),
            }
        }
        Some(TokenKind::Newline) => {
            let text = p.bump();
            let id = p.ast.alloc(NodeKind::Newline(text.to_string()));
            run.push(&mut p.ast, id);
        }
        _ => {
            let text = p.bump();
            run.text(text);
        }
    }
}

fn emphasis(p: &mut Parser<'_, '_>, run: &mut Run, open: Open) {
    let closer = match open {
        Open::Bold => TokenKind::Bold,
        _ => TokenKind::Italics,
    };
    let marker = p.bump();
    p.open.push(open.clone());
    let items = self::run(p);
    p.open.pop();
    let close = if p.at(closer) { p.bump() } else { "" };

    let content = p.ast.new_list(items);
    let kind = match open {
        Open::Bold => NodeKind::Bold { content },
        _ => NodeKind::Italics { content },
    };
    let id = p.node(kind, [marker, close]);
    run.push(&mut p.ast, id);
}

fn link(p: &mut Parser<'_, '_>, run: &mut Run) {
    if p.find_on_line(TokenKind::LinkClose).is_none() {
        let text = p.bump();
        run.text(text);
        return;
    }

    let mut head = p.bump().to_string();
    let mut target = String::new();
    while !p.at_end() && !p.at(TokenKind::Pipe) && !p.at(TokenKind::LinkClose) {
        target.push_str(p.bump());
    }
    head.push_str(&target);

    let title_items = if p.at(TokenKind::Pipe) {
        head.push_str(p.bump());
        p.open.push(Open::LinkTitle);
        let items = self::run(p);
        p.open.pop();
        items
    } else {
        Vec::new()
    };
    let close = if p.at(TokenKind::LinkClose) {
        p.bump()
    } else {
        ""
    };

    let title = p.ast.new_list(title_items);
    let id = p.node(NodeKind::InternalLink { target, title }, [head.as_str(), close]);
    run.push(&mut p.ast, id);
}

fn comment(p: &mut Parser<'_, '_>, run: &mut Run) {
    let source = p.source();
    let start = p.offset();
    let body = start + "<!--".len();
    let (text, end) = match source[body..].find("-->") {
        Some(i) => (&source[body..body + i], body + i + "-->".len()),
        None => (&source[body..], source.len()),
    };
    p.skip_to(end);
    let id = p.leaf(NodeKind::XmlComment(text.to_string()), &source[start..end]);
    run.push(&mut p.ast, id);
}

fn markup(p: &mut Parser<'_, '_>, run: &mut Run) {
    let source = p.source();
    let offset = p.offset();
    if let Some(start) = tag::start_tag(source, offset) {
        let id = element(p, start);
        run.push(&mut p.ast, id);
    } else if let Some(end) = tag::end_tag(source, offset) {
        // end tags of open elements never get here, see should_stop
        p.skip_to(end.end_offset);
        run.text(end.raw);
    } else {
        let text = p.bump();
        run.text(text);
    }
}

/// Parse an element whose start tag has already been scanned.
pub(super) fn element(p: &mut Parser<'_, '_>, start: StartTag<'_>) -> NodeId {
    p.skip_to(start.end_offset);
    let name = start.name.to_ascii_lowercase();

    let attributes: Vec<NodeId> = start.attributes.iter().map(|a| attribute(p, a)).collect();
    let attributes = p.ast.new_list(attributes);

    let empty = start.self_closing || VOID_TAGS.contains(&name.as_str());
    let (items, close) = if empty {
        (Vec::new(), "")
    } else {
        p.open.push(Open::Tag(name.clone()));
        let items = run(p);
        p.open.pop();
        let close = match tag::end_tag(p.source(), p.offset()) {
            Some(end) if p.at(TokenKind::Lt) && end.name.eq_ignore_ascii_case(&name) => {
                p.skip_to(end.end_offset);
                end.raw
            }
            _ => "",
        };
        (items, close)
    };
    let body = p.ast.new_list(items);

    let head = format!("<{}", start.name);
    p.node(
        NodeKind::XmlElement {
            name: start.name.to_string(),
            empty,
            attributes,
            body,
        },
        [head.as_str(), start.end, close],
    )
}

fn attribute(p: &mut Parser<'_, '_>, scan: &AttrScan<'_>) -> NodeId {
    let items = scan
        .value
        .map(|raw| value_nodes(&mut p.ast, raw))
        .unwrap_or_default();
    let value = p.ast.new_list(items);
    p.node(
        NodeKind::XmlAttribute {
            name: scan.name.to_string(),
            has_value: scan.value.is_some(),
            value,
        },
        [scan.prefix, scan.suffix],
    )
}

/// Split a raw attribute value into text and reference nodes.
fn value_nodes(ast: &mut Ast, raw: &str) -> Vec<NodeId> {
    let mut run = Run::default();
    for token in lex(raw) {
        match reference(token.kind, token.text) {
            Some(node) => {
                let id = ast.push_parsed(node, RtData::from_slots([token.text]));
                run.push(ast, id);
            }
            None => run.text(token.text),
        }
    }
    run.finish(ast)
}

/// The reference node a `&...;` token stands for, if it resolves.
fn reference(kind: TokenKind, raw: &str) -> Option<NodeKind> {
    match kind {
        TokenKind::CharRef => {
            let digits = raw.strip_prefix("&#")?.strip_suffix(';')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)?;
            Some(NodeKind::XmlCharRef(code))
        }
        TokenKind::EntityRef => {
            let resolved = html_escape::decode_html_entities(raw);
            if resolved == raw {
                return None;
            }
            let name = raw.strip_prefix('&')?.strip_suffix(';')?;
            Some(NodeKind::XmlEntityRef {
                name: name.to_string(),
                resolved: resolved.into_owned(),
            })
        }
        _ => None,
    }
}
