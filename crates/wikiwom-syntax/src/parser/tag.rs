//! Scanning of XML-style tags straight from the source text.
//!
//! Tags cannot be tokenized context-free (a quoted attribute value may hold
//! `>` or `''`), so the parser hands the byte offset of a `<` to these
//! scanners and skips the tokens they cover. A tag always ends with `>`,
//! which is a token of its own, so the scanned range ends on a token boundary.

/// One attribute of a scanned start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrScan<'a> {
    /// Attribute name as written
    pub name: &'a str,
    /// Everything before the value: leading whitespace, name, `=`, opening quote
    pub prefix: &'a str,
    /// Raw value between the quotes, `None` for a valueless attribute
    pub value: Option<&'a str>,
    /// Closing quote, empty for unquoted or valueless attributes
    pub suffix: &'a str,
}

/// A scanned start tag `<name attrs>` or `<name attrs />`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    /// Tag name as written
    pub name: &'a str,
    pub attributes: Vec<AttrScan<'a>>,
    /// Trailing whitespace plus `>` or `/>`
    pub end: &'a str,
    pub self_closing: bool,
    /// Byte offset just past the tag
    pub end_offset: usize,
}

/// A scanned end tag `</name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag<'a> {
    pub name: &'a str,
    pub raw: &'a str,
    pub end_offset: usize,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn name(&mut self) -> Option<&'a str> {
        if !self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(self.eat_while(|b| b.is_ascii_alphanumeric()))
    }

    fn whitespace(&mut self) -> &'a str {
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
    }
}

fn is_attr_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

/// Scan a start tag beginning at `offset`, which must point at `<`.
pub fn start_tag(src: &str, offset: usize) -> Option<StartTag<'_>> {
    let mut c = Cursor {
        src,
        pos: offset,
    };
    if !c.eat(b'<') {
        return None;
    }
    let name = c.name()?;
    let mut attributes = Vec::new();
    loop {
        let ws_start = c.pos;
        let ws = c.whitespace();
        match c.peek()? {
            b'>' => {
                c.pos += 1;
                return Some(StartTag {
                    name,
                    attributes,
                    end: &src[ws_start..c.pos],
                    self_closing: false,
                    end_offset: c.pos,
                });
            }
            b'/' => {
                c.pos += 1;
                if !c.eat(b'>') {
                    return None;
                }
                return Some(StartTag {
                    name,
                    attributes,
                    end: &src[ws_start..c.pos],
                    self_closing: true,
                    end_offset: c.pos,
                });
            }
            b if is_attr_name_byte(b) && !ws.is_empty() => {
                attributes.push(attribute(&mut c, ws_start)?);
            }
            _ => return None,
        }
    }
}

fn attribute<'a>(c: &mut Cursor<'a>, start: usize) -> Option<AttrScan<'a>> {
    let name = c.eat_while(is_attr_name_byte);
    let after_name = c.pos;
    c.whitespace();
    if !c.eat(b'=') {
        c.pos = after_name;
        return Some(AttrScan {
            name,
            prefix: &c.src[start..after_name],
            value: None,
            suffix: "",
        });
    }
    c.whitespace();
    match c.peek()? {
        quote @ (b'"' | b'\'') => {
            c.pos += 1;
            let prefix = &c.src[start..c.pos];
            let value = c.eat_while(|b| b != quote);
            let suffix_start = c.pos;
            if !c.eat(quote) {
                return None;
            }
            Some(AttrScan {
                name,
                prefix,
                value: Some(value),
                suffix: &c.src[suffix_start..c.pos],
            })
        }
        _ => {
            let prefix = &c.src[start..c.pos];
            let value = c.eat_while(|b| {
                !matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'"' | b'\'' | b'<' | b'=')
            });
            if value.is_empty() || (value.ends_with('/') && c.peek() == Some(b'>')) {
                return None;
            }
            Some(AttrScan {
                name,
                prefix,
                value: Some(value),
                suffix: "",
            })
        }
    }
}

/// Scan an end tag beginning at `offset`, which must point at `<`.
pub fn end_tag(src: &str, offset: usize) -> Option<EndTag<'_>> {
    let mut c = Cursor {
        src,
        pos: offset,
    };
    if !(c.eat(b'<') && c.eat(b'/')) {
        return None;
    }
    let name = c.name()?;
    c.whitespace();
    if !c.eat(b'>') {
        return None;
    }
    Some(EndTag {
        name,
        raw: &src[offset..c.pos],
        end_offset: c.pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn start_tag_with_mixed_attributes() {
        let src = "<div class=\"a b\" data-x='1' hidden id=y >";
        let tag = start_tag(src, 0).unwrap();
        assert_eq!(tag.name, "div");
        assert_eq!(tag.end, " >");
        assert!(!tag.self_closing);
        assert_eq!(tag.end_offset, src.len());

        let prefixes: Vec<_> = tag.attributes.iter().map(|a| a.prefix).collect();
        assert_eq!(prefixes, vec![" class=\"", " data-x='", " hidden", " id="]);
        let values: Vec<_> = tag.attributes.iter().map(|a| a.value).collect();
        assert_eq!(values, vec![Some("a b"), Some("1"), None, Some("y")]);
        let suffixes: Vec<_> = tag.attributes.iter().map(|a| a.suffix).collect();
        assert_eq!(suffixes, vec!["\"", "'", "", ""]);
    }

    #[test]
    fn self_closing_tag() {
        let tag = start_tag("<hr noshade />", 0).unwrap();
        assert!(tag.self_closing);
        assert_eq!(tag.end, " />");
        assert_eq!(tag.attributes[0].name, "noshade");
    }

    #[test]
    fn quoted_value_may_contain_gt() {
        let tag = start_tag("<b title=\"a>b\">", 0).unwrap();
        assert_eq!(tag.attributes[0].value, Some("a>b"));
    }

    #[test]
    fn malformed_tags_are_rejected() {
        assert_eq!(start_tag("< b>", 0), None);
        assert_eq!(start_tag("<b", 0), None);
        assert_eq!(start_tag("<b title=\"open>", 0), None);
        assert_eq!(start_tag("<b class=>", 0), None);
    }

    #[test]
    fn end_tag_tolerates_trailing_whitespace() {
        let tag = end_tag("x</B >", 1).unwrap();
        assert_eq!(tag.name, "B");
        assert_eq!(tag.raw, "</B >");
        assert_eq!(tag.end_offset, 6);
        assert_eq!(end_tag("</ b>", 0), None);
    }
}
