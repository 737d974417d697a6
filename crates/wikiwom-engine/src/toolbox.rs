//! # Toolbox - AST Surgery and Glue Templates
//!
//! Identity-based editing of AST containers. Every operation that has to
//! locate an existing node requires it to be present exactly once; otherwise
//! it returns [`WomError::InvariantViolation`] and leaves the container as it
//! was. Inserting a node that is already in the container is rejected the
//! same way.
//!
//! The second half of the module holds the canonical round-trip glue for
//! nodes synthesized by edits, and the conversions between attribute values
//! and the text/reference nodes that carry them in the AST.

use wikiwom_syntax::{Ast, NodeId, NodeKind, RtData};

use crate::error::{Result, WomError};

/// Position of `node` in `container`, requiring exactly one occurrence.
pub fn find_index(ast: &Ast, container: NodeId, node: NodeId) -> Result<usize> {
    let items = ast.list(container)?;
    let mut hits = items.iter().enumerate().filter(|(_, id)| **id == node);
    match (hits.next(), hits.next()) {
        (Some((index, _)), None) => Ok(index),
        (None, _) => Err(WomError::invariant(format!(
            "node {node} is not in container {container}"
        ))),
        (Some(_), Some(_)) => Err(WomError::invariant(format!(
            "node {node} appears more than once in container {container}"
        ))),
    }
}

fn ensure_absent(ast: &Ast, container: NodeId, node: NodeId) -> Result<()> {
    if ast.list(container)?.contains(&node) {
        return Err(WomError::invariant(format!(
            "node {node} is already in container {container}"
        )));
    }
    Ok(())
}

/// Put `new` where `old` was.
pub fn replace(ast: &mut Ast, container: NodeId, old: NodeId, new: NodeId) -> Result<()> {
    let index = find_index(ast, container, old)?;
    if new != old {
        ensure_absent(ast, container, new)?;
    }
    ast.list_mut(container)?[index] = new;
    Ok(())
}

pub fn remove(ast: &mut Ast, container: NodeId, node: NodeId) -> Result<()> {
    let index = find_index(ast, container, node)?;
    ast.list_mut(container)?.remove(index);
    Ok(())
}

pub fn insert_before(ast: &mut Ast, container: NodeId, node: NodeId, before: NodeId) -> Result<()> {
    let index = find_index(ast, container, before)?;
    ensure_absent(ast, container, node)?;
    ast.list_mut(container)?.insert(index, node);
    Ok(())
}

pub fn insert_after(ast: &mut Ast, container: NodeId, node: NodeId, after: NodeId) -> Result<()> {
    let index = find_index(ast, container, after)?;
    ensure_absent(ast, container, node)?;
    ast.list_mut(container)?.insert(index + 1, node);
    Ok(())
}

pub fn prepend(ast: &mut Ast, container: NodeId, node: NodeId) -> Result<()> {
    ensure_absent(ast, container, node)?;
    ast.list_mut(container)?.insert(0, node);
    Ok(())
}

pub fn append(ast: &mut Ast, container: NodeId, node: NodeId) -> Result<()> {
    ensure_absent(ast, container, node)?;
    ast.list_mut(container)?.push(node);
    Ok(())
}

// =============================================================================
// Canonical glue

pub fn xml_element_rtd(name: &str, empty: bool) -> RtData {
    if empty {
        RtData::from_slots([format!("<{name}"), " />".to_string(), String::new()])
    } else {
        RtData::from_slots([format!("<{name}"), ">".to_string(), format!("</{name}>")])
    }
}

pub fn xml_attribute_rtd(name: &str, has_value: bool) -> RtData {
    if has_value {
        RtData::from_slots([format!(" {name}=\""), "\"".to_string()])
    } else {
        RtData::from_slots([format!(" {name}"), String::new()])
    }
}

pub fn bold_rtd() -> RtData {
    RtData::from_slots(["'''", "'''"])
}

pub fn italics_rtd() -> RtData {
    RtData::from_slots(["''", "''"])
}

pub fn internal_link_rtd(target: &str, titled: bool) -> RtData {
    let head = if titled {
        format!("[[{target}|")
    } else {
        format!("[[{target}")
    };
    RtData::from_slots([head, "]]".to_string()])
}

pub fn comment_rtd(text: &str) -> RtData {
    RtData::from_slots([format!("<!--{text}-->")])
}

/// A rule has to sit on a line of its own.
pub fn horizontal_rule_rtd() -> RtData {
    RtData::from_slots(["\n----\n"])
}

/// A new paragraph is separated from whatever precedes it by a blank line.
pub fn paragraph_rtd() -> RtData {
    RtData::from_slots(["\n\n", ""])
}

/// Regenerate a node's glue from the canonical template for its kind.
///
/// XML elements also regenerate the glue of their attributes. Kinds without
/// a template (text, lists, references, the page) are left alone.
pub fn add_rtd(ast: &mut Ast, node: NodeId) -> Result<()> {
    let rtd = match ast.kind(node)? {
        NodeKind::XmlElement {
            name,
            empty,
            attributes,
            ..
        } => {
            let (rtd, attributes) = (xml_element_rtd(name, *empty), *attributes);
            for attr in ast.list(attributes)?.to_vec() {
                add_rtd(ast, attr)?;
            }
            rtd
        }
        NodeKind::XmlAttribute {
            name, has_value, ..
        } => xml_attribute_rtd(name, *has_value),
        NodeKind::Bold { .. } => bold_rtd(),
        NodeKind::Italics { .. } => italics_rtd(),
        NodeKind::InternalLink { target, title } => {
            internal_link_rtd(target, !ast.list(*title)?.is_empty())
        }
        NodeKind::XmlComment(text) => comment_rtd(text),
        NodeKind::HorizontalRule => horizontal_rule_rtd(),
        NodeKind::Paragraph { .. } => paragraph_rtd(),
        _ => return Ok(()),
    };
    ast.set_rtd(node, Some(rtd))?;
    Ok(())
}

// =============================================================================
// Text and attribute values

/// Plain text of a text-like node, or of every item of a container.
///
/// Comments contribute nothing; references contribute the character(s) they
/// stand for.
pub fn to_text(ast: &Ast, node: NodeId) -> Result<String> {
    Ok(match ast.kind(node)? {
        NodeKind::Text(text) | NodeKind::Newline(text) => text.clone(),
        NodeKind::XmlComment(_) => String::new(),
        NodeKind::XmlCharRef(code) => char::from_u32(*code).map(String::from).unwrap_or_default(),
        NodeKind::XmlEntityRef { resolved, .. } => resolved.clone(),
        NodeKind::List(items) => {
            let mut out = String::new();
            for item in items {
                out.push_str(&to_text(ast, *item)?);
            }
            out
        }
        other => {
            return Err(WomError::invariant(format!(
                "cannot convert a {} node to text",
                other.name()
            )));
        }
    })
}

/// Split an attribute value into AST nodes that print back safely inside
/// double quotes: `"`, `<` and `&` become entity references.
pub fn encode_value(ast: &mut Ast, value: &str) -> Vec<NodeId> {
    let mut items = Vec::new();
    let mut text = String::new();
    for ch in value.chars() {
        let entity = match ch {
            '"' => "quot",
            '<' => "lt",
            '&' => "amp",
            _ => {
                text.push(ch);
                continue;
            }
        };
        if !text.is_empty() {
            items.push(ast.alloc(NodeKind::Text(std::mem::take(&mut text))));
        }
        items.push(ast.alloc(NodeKind::XmlEntityRef {
            name: entity.to_string(),
            resolved: ch.to_string(),
        }));
    }
    if !text.is_empty() {
        items.push(ast.alloc(NodeKind::Text(text)));
    }
    items
}
