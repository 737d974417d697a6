//! Static descriptor tables, one per element kind.

use wikiwom_config::{LinkTargetType, WikiConfig};
use wikiwom_syntax::NodeKind;

use super::verifiers;
use super::{AttributeDescriptor, Normalization};
use crate::category::category_key;
use crate::document::{WomDocument, WomId};
use crate::error::{Result, WomError};
use crate::toolbox;
use crate::validate;

const fn synced(
    name: &'static str,
    verify: super::Verify,
    normalization: Normalization,
) -> AttributeDescriptor {
    AttributeDescriptor {
        name,
        verify,
        normalization,
        removable: true,
        sync_to_ast: true,
        custom_action: None,
    }
}

/// Attributes every XML-expressible element understands.
pub static UNIVERSAL: &[AttributeDescriptor] = &[
    synced("id", verifiers::id, Normalization::NonCdata),
    synced("class", verifiers::any, Normalization::NonCdata),
    synced("style", verifiers::any, Normalization::NonCdata),
    synced("title", verifiers::any, Normalization::NonCdata),
    synced("lang", verifiers::lang, Normalization::NonCdata),
    synced("dir", verifiers::dir, Normalization::NonCdata),
];

/// Fallback for any other name on an XML-expressible element.
pub static GENERIC: AttributeDescriptor = synced("*", verifiers::any, Normalization::Cdata);

pub static PAGE: &[AttributeDescriptor] = &[
    AttributeDescriptor {
        name: "title",
        verify: page_title,
        normalization: Normalization::NonCdata,
        removable: false,
        sync_to_ast: false,
        custom_action: None,
    },
    AttributeDescriptor {
        name: "namespace",
        verify: page_namespace,
        normalization: Normalization::NonCdata,
        removable: true,
        sync_to_ast: false,
        custom_action: None,
    },
    AttributeDescriptor {
        name: "path",
        verify: page_path,
        normalization: Normalization::NonCdata,
        removable: true,
        sync_to_ast: false,
        custom_action: None,
    },
];

pub static PARAGRAPH: &[AttributeDescriptor] = &[synced(
    "align",
    verifiers::align_lcrj,
    Normalization::NonCdata,
)];

pub static DIV: &[AttributeDescriptor] = &[synced(
    "align",
    verifiers::align_lcrj,
    Normalization::NonCdata,
)];

pub static HORIZONTAL_RULE: &[AttributeDescriptor] = &[
    synced("align", verifiers::align_lcr, Normalization::NonCdata),
    synced("noshade", verifiers::noshade, Normalization::NonCdata),
    synced("size", verifiers::pixels, Normalization::NonCdata),
    synced("width", verifiers::length, Normalization::NonCdata),
];

pub static PAGE_LINK: &[AttributeDescriptor] = &[AttributeDescriptor {
    name: "target",
    verify: link_target,
    normalization: Normalization::NonCdata,
    removable: false,
    sync_to_ast: false,
    custom_action: Some(retarget_link),
}];

pub static CATEGORY: &[AttributeDescriptor] = &[AttributeDescriptor {
    name: "name",
    verify: category_name,
    normalization: Normalization::NonCdata,
    removable: false,
    sync_to_ast: false,
    custom_action: Some(rename_category),
}];

fn page_title(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    let value = value.trim();
    validate::check_valid_title(Some(value))?;
    Ok(Some(value.to_string()))
}

fn page_namespace(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    validate::check_valid_namespace(Some(value.trim()))
}

fn page_path(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    validate::check_valid_path(Some(value.trim()))
}

/// A page link may point anywhere except at a category or an image; those
/// have dedicated node types.
pub(crate) fn link_target(doc: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    let value = value.trim();
    validate::check_valid_target(Some(value))?;
    let target = doc
        .config()
        .parse_target(value)
        .map_err(|err| WomError::validation(err.to_string()))?;
    if doc.config().is_category(&target) {
        return Err(WomError::validation(format!(
            "`{value}` is a category; use the page's category operations"
        )));
    }
    if doc.config().classify(&target) == LinkTargetType::Image {
        return Err(WomError::validation(format!(
            "`{value}` links an image, not a page"
        )));
    }
    Ok(Some(value.to_string()))
}

fn retarget_link(
    doc: &mut WomDocument,
    id: WomId,
    old: Option<&str>,
    new: Option<&str>,
) -> Result<()> {
    let Some(new) = new else {
        return Ok(());
    };
    if old == Some(new) {
        return Ok(());
    }
    let link = doc.native_node(id)?;
    match doc.ast.kind_mut(link)? {
        NodeKind::InternalLink { target, .. } => *target = new.to_string(),
        other => {
            return Err(WomError::invariant(format!(
                "page link is backed by a {} node",
                other.name()
            )));
        }
    }
    toolbox::add_rtd(&mut doc.ast, link)
}

fn category_name(doc: &WomDocument, id: WomId, value: &str) -> Result<Option<String>> {
    let value = WikiConfig::normalize_title(value);
    validate::check_valid_category(Some(&value))?;
    let current = doc.get_attribute(id, "name")?;
    let same = current.is_some_and(|current| category_key(current) == category_key(&value));
    if !same && doc.parent(id)?.is_some() && doc.has_category(&value) {
        return Err(WomError::NameCollision(value));
    }
    Ok(Some(value))
}

fn rename_category(
    doc: &mut WomDocument,
    id: WomId,
    old: Option<&str>,
    new: Option<&str>,
) -> Result<()> {
    match new {
        Some(new) => doc.rename_category_links(id, old, new),
        None => Ok(()),
    }
}
