//! # Lexer - Tokenizing Wikitext Source
//!
//! The first stage of [`parse`](crate::parse): breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token, so concatenating the
//! token texts gives back the original:
//!
//! ```
//! use wikiwom_syntax::lexer::lex;
//!
//! let input = "''Hello'' [[World|there]]\n";
//! let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer does not know whether `<` opens a tag
//! or is a stray less-than sign, or whether `----` sits at the start of a
//! line. Multi-character markers that are unambiguous at the character level
//! get their own kinds:
//!
//! - `''` / `'''` → [`TokenKind::Italics`] / [`TokenKind::Bold`]. Longer runs
//!   split into a sequence of these (`'''''` is bold followed by italics).
//! - `[[` / `]]` → link brackets
//! - `<!--` → comment opener
//! - `&name;`, `&#65;`, `&#x41;` → references
//! - `----` and longer → [`TokenKind::Dashes`]
//!
//! Everything else becomes `Text` runs or single-character `Punct` tokens.
//! Tag interiors (`<b class="x">`) are scanned by the parser straight from
//! the source because quoting rules do not fit a context-free token stream.

use std::ops::Range;

use logos::Logos;

/// Token kinds produced by the Logos lexer.
///
/// `#[logos(skip r"")]` skips nothing: every character is matched by some
/// rule below.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `'''`
    #[token("'''")]
    Bold,

    /// `''`
    #[token("''")]
    Italics,

    /// `[[`
    #[token("[[")]
    LinkOpen,

    /// `]]`
    #[token("]]")]
    LinkClose,

    #[token("|")]
    Pipe,

    /// `<!--`
    #[token("<!--")]
    CommentOpen,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    /// `&#65;` or `&#x41;`
    #[regex(r"&#([0-9]+|[xX][0-9a-fA-F]+);")]
    CharRef,

    /// `&amp;`
    #[regex(r"&[A-Za-z][A-Za-z0-9]*;")]
    EntityRef,

    /// Four or more dashes; a rule when at line start
    #[regex(r"-{4,}")]
    Dashes,

    /// A single special character that did not form a longer marker
    #[regex(r"[\r'\[\]&-]")]
    Punct,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^ \t\r\n'\[\]|<>&-]+")]
    Text,
}

/// A lexed token with its kind, text slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.text.len()
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        // Logos error means unrecognized input - treat as Text
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_text_and_whitespace() {
        assert_eq!(
            kinds("hello  world"),
            vec![TokenKind::Text, TokenKind::Whitespace, TokenKind::Text]
        );
    }

    #[rstest]
    #[case("''", vec![TokenKind::Italics])]
    #[case("'''", vec![TokenKind::Bold])]
    #[case("'''''", vec![TokenKind::Bold, TokenKind::Italics])]
    #[case("''''", vec![TokenKind::Bold, TokenKind::Punct])]
    #[case("'", vec![TokenKind::Punct])]
    fn lex_apostrophe_runs(#[case] input: &str, #[case] expected: Vec<TokenKind>) {
        assert_eq!(kinds(input), expected);
    }

    #[rstest]
    #[case("&amp;", TokenKind::EntityRef)]
    #[case("&#65;", TokenKind::CharRef)]
    #[case("&#x41;", TokenKind::CharRef)]
    #[case("----", TokenKind::Dashes)]
    #[case("------", TokenKind::Dashes)]
    #[case("<!--", TokenKind::CommentOpen)]
    #[case("[[", TokenKind::LinkOpen)]
    #[case("]]", TokenKind::LinkClose)]
    #[case("\r\n", TokenKind::Newline)]
    fn lex_single_token(#[case] input: &str, #[case] expected: TokenKind) {
        assert_eq!(kinds(input), vec![expected]);
    }

    #[test]
    fn lone_ampersand_is_punct() {
        assert_eq!(
            kinds("a & b"),
            vec![
                TokenKind::Text,
                TokenKind::Whitespace,
                TokenKind::Punct,
                TokenKind::Whitespace,
                TokenKind::Text
            ]
        );
    }

    #[test]
    fn offsets_track_bytes() {
        let tokens = lex("ab <c>");
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 2, 3, 4, 5]);
        assert_eq!(tokens[3].span(), 4..5);
    }

    #[test]
    fn lex_is_lossless() {
        let input = "<div class=\"a\">x &amp; y</div>\n----\n[[Category:Foo|k]] ''' ok\r\n";
        let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(reconstructed, input);
    }
}
