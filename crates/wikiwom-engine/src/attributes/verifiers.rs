//! Element-independent value checks, in the shape of [`Verify`](super::Verify).

use std::sync::LazyLock;

use regex::Regex;

use crate::accessors::{HorizAlign, ValueWithUnit};
use crate::document::{WomDocument, WomId};
use crate::error::{Result, WomError};

static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{1,8}(?:-[A-Za-z0-9]{1,8})*$").expect("language tag pattern")
});

pub fn any(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    Ok(Some(value.to_string()))
}

pub fn id(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(WomError::validation(format!("`{value}` is not a valid id")));
    }
    Ok(Some(value.to_string()))
}

pub fn lang(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    let value = value.trim();
    if !LANGUAGE_TAG.is_match(value) {
        return Err(WomError::validation(format!("`{value}` is not a language tag")));
    }
    Ok(Some(value.to_string()))
}

/// Case-insensitive match against a fixed set; the stored value is the
/// lower-cased spelling.
pub fn one_of(value: &str, allowed: &[&str]) -> Result<Option<String>> {
    let lowered = value.trim().to_ascii_lowercase();
    if allowed.contains(&lowered.as_str()) {
        Ok(Some(lowered))
    } else {
        Err(WomError::validation(format!(
            "`{value}` is not one of {}",
            allowed.join(", ")
        )))
    }
}

pub fn dir(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    one_of(value, &["ltr", "rtl"])
}

fn alignment(value: &str, allow_justify: bool) -> Result<Option<String>> {
    match value.parse::<HorizAlign>() {
        Ok(HorizAlign::Justify) if !allow_justify => Err(WomError::validation(
            "`justify` is not allowed here".to_string(),
        )),
        Ok(align) => Ok(Some(align.as_str().to_string())),
        Err(_) => Err(WomError::validation(format!("`{value}` is not an alignment"))),
    }
}

/// `left`, `center` or `right`.
pub fn align_lcr(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    alignment(value, false)
}

/// `left`, `center`, `right` or `justify`.
pub fn align_lcrj(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    alignment(value, true)
}

/// `noshade` is a boolean attribute whose only value is its own name.
pub fn noshade(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    one_of(value, &["noshade"])
}

pub fn pixels(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    match value.parse::<ValueWithUnit>() {
        Ok(px @ ValueWithUnit::Pixels(_)) => Ok(Some(px.to_string())),
        _ => Err(WomError::validation(format!(
            "`{value}` is not a length in pixels"
        ))),
    }
}

/// Pixels or a percentage.
pub fn length(_: &WomDocument, _: WomId, value: &str) -> Result<Option<String>> {
    value
        .parse::<ValueWithUnit>()
        .map(|length| Some(length.to_string()))
        .map_err(|_| WomError::validation(format!("`{value}` is not a length")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use wikiwom_config::WikiConfig;

    fn doc() -> WomDocument {
        WomDocument::new(WikiConfig::default(), "Test").unwrap()
    }

    #[rstest]
    #[case("LEFT", Some("left"))]
    #[case(" center ", Some("center"))]
    #[case("justify", None)]
    #[case("middle", None)]
    fn lcr(#[case] value: &str, #[case] expected: Option<&str>) {
        let doc = doc();
        let page = doc.page();
        assert_eq!(
            align_lcr(&doc, page, value).ok().flatten().as_deref(),
            expected
        );
    }

    #[test]
    fn justify_is_accepted_where_allowed() {
        let doc = doc();
        assert_eq!(
            align_lcrj(&doc, doc.page(), "Justify").unwrap().as_deref(),
            Some("justify")
        );
    }

    #[rstest]
    #[case("10", true)]
    #[case("10px", true)]
    #[case("50%", false)]
    #[case("-3", false)]
    #[case("wide", false)]
    fn pixel_values(#[case] value: &str, #[case] ok: bool) {
        let doc = doc();
        assert_eq!(pixels(&doc, doc.page(), value).is_ok(), ok);
    }

    #[test]
    fn lengths_accept_percentages() {
        let doc = doc();
        assert_eq!(
            length(&doc, doc.page(), "50%").unwrap().as_deref(),
            Some("50%")
        );
        assert_eq!(
            length(&doc, doc.page(), "12px").unwrap().as_deref(),
            Some("12")
        );
    }

    #[test]
    fn ids_and_languages() {
        let doc = doc();
        let page = doc.page();
        assert!(id(&doc, page, "intro").is_ok());
        assert!(id(&doc, page, "two words").is_err());
        assert!(id(&doc, page, "").is_err());
        assert!(lang(&doc, page, "en-GB").is_ok());
        assert!(lang(&doc, page, "english please").is_err());
        assert_eq!(dir(&doc, page, "RTL").unwrap().as_deref(), Some("rtl"));
        assert!(noshade(&doc, page, "yes").is_err());
    }
}
