//! Typed getters and setters over the string attribute store.

use std::fmt;
use std::str::FromStr;

use crate::document::{WomDocument, WomId, WomKind};
use crate::error::{Result, WomError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl HorizAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            HorizAlign::Left => "left",
            HorizAlign::Center => "center",
            HorizAlign::Right => "right",
            HorizAlign::Justify => "justify",
        }
    }
}

impl FromStr for HorizAlign {
    type Err = WomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(HorizAlign::Left),
            "center" => Ok(HorizAlign::Center),
            "right" => Ok(HorizAlign::Right),
            "justify" => Ok(HorizAlign::Justify),
            _ => Err(WomError::validation(format!("`{s}` is not an alignment"))),
        }
    }
}

impl fmt::Display for HorizAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A length: plain or `px` numbers are pixels, `%` numbers are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueWithUnit {
    Pixels(u32),
    Percent(u32),
}

impl FromStr for ValueWithUnit {
    type Err = WomError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (number, percent) = match trimmed.strip_suffix('%') {
            Some(number) => (number, true),
            None => (trimmed.strip_suffix("px").unwrap_or(trimmed), false),
        };
        let value: u32 = number
            .trim_end()
            .parse()
            .map_err(|_| WomError::validation(format!("`{s}` is not a length")))?;
        Ok(if percent {
            ValueWithUnit::Percent(value)
        } else {
            ValueWithUnit::Pixels(value)
        })
    }
}

impl fmt::Display for ValueWithUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueWithUnit::Pixels(px) => write!(f, "{px}"),
            ValueWithUnit::Percent(pc) => write!(f, "{pc}%"),
        }
    }
}

impl WomDocument {
    fn expect_kind(&self, id: WomId, kinds: &[WomKind]) -> Result<()> {
        let kind = self.kind(id)?;
        if kinds.contains(&kind) {
            Ok(())
        } else {
            Err(WomError::unsupported(format!(
                "<{}> has no such property",
                kind.node_name()
            )))
        }
    }

    fn set_or_remove(&mut self, id: WomId, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.set_attribute(id, name, value)?,
            None => self.remove_attribute(id, name)?,
        };
        Ok(())
    }

    // -- page ------------------------------------------------------------

    pub fn title(&self) -> Result<String> {
        self.get_attribute(self.page, "title")?
            .map(str::to_string)
            .ok_or_else(|| WomError::invariant("page has no title"))
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.set_attribute(self.page, "title", title)?;
        Ok(())
    }

    pub fn namespace(&self) -> Result<Option<&str>> {
        self.get_attribute(self.page, "namespace")
    }

    pub fn set_namespace(&mut self, namespace: Option<&str>) -> Result<()> {
        self.set_or_remove(self.page, "namespace", namespace)
    }

    pub fn path(&self) -> Result<Option<&str>> {
        self.get_attribute(self.page, "path")
    }

    pub fn set_path(&mut self, path: Option<&str>) -> Result<()> {
        self.set_or_remove(self.page, "path", path)
    }

    // -- alignment and rules --------------------------------------------------

    /// Alignment of a paragraph, div or rule. Values adopted from the source
    /// that are not valid alignments read as `None`.
    pub fn align(&self, id: WomId) -> Result<Option<HorizAlign>> {
        self.expect_kind(
            id,
            &[WomKind::Paragraph, WomKind::Div, WomKind::HorizontalRule],
        )?;
        Ok(self
            .get_attribute(id, "align")?
            .and_then(|value| value.parse().ok()))
    }

    pub fn set_align(&mut self, id: WomId, align: Option<HorizAlign>) -> Result<()> {
        self.set_or_remove(id, "align", align.map(HorizAlign::as_str))
    }

    pub fn noshade(&self, id: WomId) -> Result<bool> {
        self.expect_kind(id, &[WomKind::HorizontalRule])?;
        Ok(self.get_attribute(id, "noshade")?.is_some())
    }

    pub fn set_noshade(&mut self, id: WomId, noshade: bool) -> Result<()> {
        self.expect_kind(id, &[WomKind::HorizontalRule])?;
        self.set_or_remove(id, "noshade", noshade.then_some("noshade"))
    }

    pub fn size(&self, id: WomId) -> Result<Option<ValueWithUnit>> {
        self.expect_kind(id, &[WomKind::HorizontalRule])?;
        Ok(self
            .get_attribute(id, "size")?
            .and_then(|value| value.parse().ok()))
    }

    pub fn set_size(&mut self, id: WomId, pixels: Option<u32>) -> Result<()> {
        self.expect_kind(id, &[WomKind::HorizontalRule])?;
        let value = pixels.map(|px| ValueWithUnit::Pixels(px).to_string());
        self.set_or_remove(id, "size", value.as_deref())
    }

    pub fn width(&self, id: WomId) -> Result<Option<ValueWithUnit>> {
        self.expect_kind(id, &[WomKind::HorizontalRule])?;
        Ok(self
            .get_attribute(id, "width")?
            .and_then(|value| value.parse().ok()))
    }

    pub fn set_width(&mut self, id: WomId, width: Option<ValueWithUnit>) -> Result<()> {
        self.expect_kind(id, &[WomKind::HorizontalRule])?;
        let value = width.map(|w| w.to_string());
        self.set_or_remove(id, "width", value.as_deref())
    }

    // -- links and categories ---------------------------------------------

    pub fn link_target(&self, id: WomId) -> Result<String> {
        self.expect_kind(id, &[WomKind::PageLink])?;
        self.get_attribute(id, "target")?
            .map(str::to_string)
            .ok_or_else(|| WomError::invariant(format!("link {id} has no target")))
    }

    pub fn set_link_target(&mut self, id: WomId, target: &str) -> Result<()> {
        self.expect_kind(id, &[WomKind::PageLink])?;
        self.set_attribute(id, "target", target)?;
        Ok(())
    }

    pub fn category_name(&self, id: WomId) -> Result<String> {
        self.expect_kind(id, &[WomKind::Category])?;
        self.get_attribute(id, "name")?
            .map(str::to_string)
            .ok_or_else(|| WomError::invariant(format!("category {id} has no name")))
    }

    pub fn set_category_name(&mut self, id: WomId, name: &str) -> Result<()> {
        self.expect_kind(id, &[WomKind::Category])?;
        self.set_attribute(id, "name", name)?;
        Ok(())
    }

    // -- universal attributes -----------------------------------------------

    pub fn element_id(&self, id: WomId) -> Result<Option<&str>> {
        self.get_attribute(id, "id")
    }

    pub fn set_element_id(&mut self, id: WomId, value: Option<&str>) -> Result<()> {
        self.set_or_remove(id, "id", value)
    }

    pub fn class(&self, id: WomId) -> Result<Option<&str>> {
        self.get_attribute(id, "class")
    }

    pub fn set_class(&mut self, id: WomId, value: Option<&str>) -> Result<()> {
        self.set_or_remove(id, "class", value)
    }

    pub fn style(&self, id: WomId) -> Result<Option<&str>> {
        self.get_attribute(id, "style")
    }

    pub fn set_style(&mut self, id: WomId, value: Option<&str>) -> Result<()> {
        self.set_or_remove(id, "style", value)
    }
}
