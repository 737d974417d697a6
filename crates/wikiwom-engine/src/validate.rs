//! Value validators shared by the attribute descriptors.
//!
//! Validators taking an `Option<&str>` treat `None` as an attempt to remove
//! the value.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, WomError};

const TITLE_CLASS: &str = r"[^\x00-\x1F\x7F\x{FFFD}<>{}|\[\]:/]";

static VALID_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{TITLE_CLASS}+$")).expect("title pattern"));

/// Titles plus `#`, which would turn the rest of the name into a fragment.
static VALID_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\x00-\x1F\x7F\x{FFFD}<>{}|\[\]:/#]+$").expect("category pattern")
});

static VALID_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\x00-\x1F\x7F\x{FFFD}<>{}|\[\]/]+$").expect("target pattern")
});

static VALID_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{TITLE_CLASS}+/)*(?:{TITLE_CLASS}+)?$")).expect("path pattern")
});

static XML_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_:][A-Za-z0-9_:.\-]*$").expect("xml name pattern"));

pub fn check_valid_title(title: Option<&str>) -> Result<()> {
    let title = title.ok_or_else(|| WomError::unsupported("cannot remove attribute `title`"))?;
    if !VALID_TITLE.is_match(title) {
        return Err(WomError::validation(format!("invalid title `{title}`")));
    }
    Ok(())
}

pub fn check_valid_category(category: Option<&str>) -> Result<()> {
    let category =
        category.ok_or_else(|| WomError::unsupported("cannot remove attribute `category`"))?;
    if !VALID_CATEGORY.is_match(category) {
        return Err(WomError::validation(format!("invalid category `{category}`")));
    }
    Ok(())
}

/// An empty namespace means "no namespace".
pub fn check_valid_namespace(namespace: Option<&str>) -> Result<Option<String>> {
    match namespace {
        None | Some("") => Ok(None),
        Some(ns) if VALID_TITLE.is_match(ns) => Ok(Some(ns.to_string())),
        Some(ns) => Err(WomError::validation(format!("invalid namespace `{ns}`"))),
    }
}

/// Titles separated by `/`; a trailing slash is dropped and an empty path
/// means "no path".
pub fn check_valid_path(path: Option<&str>) -> Result<Option<String>> {
    match path {
        None | Some("") => Ok(None),
        Some(path) if VALID_PATH.is_match(path) => {
            Ok(Some(path.strip_suffix('/').unwrap_or(path).to_string()))
        }
        Some(path) => Err(WomError::validation(format!("invalid path `{path}`"))),
    }
}

pub fn check_valid_target(target: Option<&str>) -> Result<()> {
    let target = target.ok_or_else(|| WomError::unsupported("cannot remove target attribute"))?;
    if !VALID_TARGET.is_match(target) {
        return Err(WomError::validation(format!("invalid target `{target}`")));
    }
    Ok(())
}

pub fn check_valid_xml_name(name: &str) -> Result<()> {
    if !XML_NAME.is_match(name) {
        return Err(WomError::validation(format!("`{name}` is not a valid XML name")));
    }
    Ok(())
}

/// XML comment text may not contain `--` or end with `-`.
pub fn check_valid_comment_text(text: &str) -> Result<()> {
    if text.contains("--") || text.ends_with('-') {
        return Err(WomError::validation(format!(
            "`{text}` is not valid XML comment text"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Main Page", true)]
    #[case("Ünïcødé", true)]
    #[case("a:b", false)]
    #[case("a/b", false)]
    #[case("a|b", false)]
    #[case("a\tb", false)]
    #[case("", false)]
    fn titles(#[case] title: &str, #[case] valid: bool) {
        assert_eq!(check_valid_title(Some(title)).is_ok(), valid);
    }

    #[rstest]
    #[case("Foo bar", true)]
    #[case("Foo_bar", true)]
    #[case("A#b", false)]
    #[case("#b", false)]
    #[case("a:b", false)]
    #[case("a|b", false)]
    fn categories(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(check_valid_category(Some(name)).is_ok(), valid);
    }

    #[test]
    fn removing_mandatory_values_is_unsupported() {
        assert!(matches!(
            check_valid_title(None),
            Err(WomError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            check_valid_category(None),
            Err(WomError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            check_valid_target(None),
            Err(WomError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn targets_may_carry_a_namespace() {
        assert!(check_valid_target(Some("Help:Contents")).is_ok());
        assert!(check_valid_target(Some("a[b")).is_err());
    }

    #[rstest]
    #[case(Some(""), Ok(None))]
    #[case(None, Ok(None))]
    #[case(Some("a/b/"), Ok(Some("a/b".to_string())))]
    #[case(Some("a"), Ok(Some("a".to_string())))]
    fn paths(#[case] path: Option<&str>, #[case] expected: Result<Option<String>>) {
        assert_eq!(check_valid_path(path), expected);
    }

    #[test]
    fn invalid_path() {
        assert!(check_valid_path(Some("a//b")).is_err());
        assert!(check_valid_path(Some("a:b/c")).is_err());
    }

    #[test]
    fn namespaces() {
        assert_eq!(check_valid_namespace(Some("")), Ok(None));
        assert_eq!(
            check_valid_namespace(Some("Help")),
            Ok(Some("Help".to_string()))
        );
        assert!(check_valid_namespace(Some("a:b")).is_err());
    }

    #[rstest]
    #[case("style", true)]
    #[case("data-x", true)]
    #[case("xml:lang", true)]
    #[case("1a", false)]
    #[case("a b", false)]
    fn xml_names(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(check_valid_xml_name(name).is_ok(), valid);
    }

    #[test]
    fn comment_text() {
        assert!(check_valid_comment_text(" fine ").is_ok());
        assert!(check_valid_comment_text("a--b").is_err());
        assert!(check_valid_comment_text("a-").is_err());
    }
}
