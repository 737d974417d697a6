//! # Parser - Building the AST From Tokens
//!
//! A recursive-descent parser over the token stream produced by
//! [`lex`](crate::lexer::lex). It builds nodes directly into an [`Ast`]
//! arena and records the exact source glue of every construct as round-trip
//! data, so printing an unedited parse reproduces the input byte for byte.
//!
//! ## Context Stack
//!
//! Inline constructs nest (`''a '''b''' c''`, `<b>[[x|''y'']]</b>`). The
//! parser keeps a stack of open constructs; an inline run stops at any token
//! that would close one of them, and the construct that owns it consumes the
//! closer. A construct that never sees its closer is still produced, with an
//! empty closing glue slot, so nothing is lost.
//!
//! ## Module Structure
//!
//! - [`block`] - page-level structure: paragraphs, rules, block tags
//! - [`inline`] - emphasis, links, tags, comments, references
//! - [`tag`] - source-level scanners for `<tag ...>` and `</tag>`

mod block;
mod inline;
pub mod tag;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::lexer::{Token, TokenKind, lex};
use crate::rtd::RtData;

/// Parse wikitext into an AST arena.
///
/// ```
/// use wikiwom_syntax::{parse, printer::print_document};
///
/// let input = "Hello '''world'''\n\n----\n";
/// let ast = parse(input);
/// assert_eq!(print_document(&ast).unwrap(), input);
/// ```
pub fn parse(input: &str) -> Ast {
    let tokens = lex(input);
    let mut parser = Parser::new(input, &tokens);
    block::document(&mut parser);
    parser.ast
}

/// A construct whose closer has not been seen yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Open {
    Bold,
    Italics,
    LinkTitle,
    /// Lower-cased tag name
    Tag(String),
}

/// The parser state machine.
///
/// Grammar functions receive `&mut Parser` and use its methods to inspect
/// tokens (`current()`, `nth()`, `at()`, `at_end()`), consume them (`bump()`,
/// `skip_to()`) and allocate nodes (`leaf()`, `node()`).
pub(crate) struct Parser<'t, 'input> {
    source: &'input str,
    tokens: &'t [Token<'input>],
    pos: usize,
    pub(crate) ast: Ast,
    pub(crate) open: Vec<Open>,
}

impl<'t, 'input> Parser<'t, 'input> {
    pub(crate) fn new(source: &'input str, tokens: &'t [Token<'input>]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            ast: Ast::new(),
            open: Vec::new(),
        }
    }

    pub(crate) fn source(&self) -> &'input str {
        self.source
    }

    /// Current token kind, or `None` at end of input.
    pub(crate) fn current(&self) -> Option<TokenKind> {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub(crate) fn nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    /// Byte offset of the token n ahead, or the source length past the end.
    pub(crate) fn nth_offset(&self, n: usize) -> usize {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.offset)
            .unwrap_or(self.source.len())
    }

    pub(crate) fn offset(&self) -> usize {
        self.nth_offset(0)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume the current token, returning its text.
    pub(crate) fn bump(&mut self) -> &'input str {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                token.text
            }
            None => "",
        }
    }

    /// Consume every token that starts before `offset`.
    pub(crate) fn skip_to(&mut self, offset: usize) {
        while self.tokens.get(self.pos).is_some_and(|t| t.offset < offset) {
            self.pos += 1;
        }
    }

    /// Check if we're at the start of a line (after newline or at start).
    pub(crate) fn at_line_start(&self) -> bool {
        self.pos == 0
            || self
                .tokens
                .get(self.pos - 1)
                .is_some_and(|t| t.kind == TokenKind::Newline)
    }

    /// Index (relative to the current position) of the first `kind` token
    /// before the next newline.
    pub(crate) fn find_on_line(&self, kind: TokenKind) -> Option<usize> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .take_while(|t| t.kind != TokenKind::Newline)
            .position(|t| t.kind == kind)
    }

    /// Allocate a parsed node with its glue.
    pub(crate) fn node<const N: usize>(&mut self, kind: NodeKind, glue: [&str; N]) -> NodeId {
        debug_assert_eq!(kind.child_count() + 1, N);
        self.ast.push_parsed(kind, RtData::from_slots(glue))
    }

    /// Allocate a parsed leaf whose only glue is its raw source text.
    pub(crate) fn leaf(&mut self, kind: NodeKind, raw: &str) -> NodeId {
        self.node(kind, [raw])
    }

    pub(crate) fn is_open(&self, open: &Open) -> bool {
        self.open.contains(open)
    }
}

/// Accumulates the items of an inline run, merging adjacent text.
#[derive(Default)]
pub(crate) struct Run {
    items: Vec<NodeId>,
    text: String,
}

impl Run {
    pub(crate) fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push(&mut self, ast: &mut Ast, node: NodeId) {
        self.flush(ast);
        self.items.push(node);
    }

    fn flush(&mut self, ast: &mut Ast) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.items.push(ast.alloc(NodeKind::Text(text)));
        }
    }

    pub(crate) fn finish(mut self, ast: &mut Ast) -> Vec<NodeId> {
        self.flush(ast);
        self.items
    }
}
