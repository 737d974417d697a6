use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkTargetError {
    #[error("link target {target:?} has an empty title")]
    EmptyTitle { target: String },

    #[error("link target {target:?} contains illegal character {ch:?}")]
    IllegalCharacter { target: String, ch: char },
}

/// A namespace: numeric id, canonical name and accepted aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Namespace {
    fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            aliases: Vec::new(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        let wanted = normalize_name(name).to_lowercase();
        std::iter::once(&self.name)
            .chain(&self.aliases)
            .any(|n| normalize_name(n).to_lowercase() == wanted)
    }
}

/// How a link target is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTargetType {
    Page,
    Image,
}

/// A parsed `[[...]]` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub namespace: i32,
    pub title: String,
    pub fragment: Option<String>,
    /// `[[:Category:Foo]]` links to the category page instead of tagging it
    pub leading_colon: bool,
}

/// Namespace table and link classification of one wiki.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    pub category_namespace: i32,
    pub image_namespaces: Vec<i32>,
    pub namespaces: Vec<Namespace>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        let mut file = Namespace::new(6, "File");
        file.aliases.push("Image".to_string());
        Self {
            category_namespace: 14,
            image_namespaces: vec![-2, 6],
            namespaces: vec![
                Namespace::new(-2, "Media"),
                Namespace::new(-1, "Special"),
                Namespace::new(0, ""),
                Namespace::new(1, "Talk"),
                Namespace::new(2, "User"),
                Namespace::new(4, "Project"),
                file,
                Namespace::new(8, "MediaWiki"),
                Namespace::new(10, "Template"),
                Namespace::new(12, "Help"),
                Namespace::new(14, "Category"),
            ],
        }
    }
}

impl WikiConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: WikiConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// The spelling a title has once parsed from a link: underscores read as
    /// spaces and surrounding whitespace is dropped.
    pub fn normalize_title(title: &str) -> String {
        normalize_name(title)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/wikiwom");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Look a namespace up by name or alias, ignoring case and treating
    /// underscores as spaces.
    pub fn resolve(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.matches(name))
    }

    pub fn namespace(&self, id: i32) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.id == id)
    }

    pub fn category_namespace(&self) -> Option<&Namespace> {
        self.namespace(self.category_namespace)
    }

    /// Canonical name of the category namespace, used when synthesizing
    /// category links.
    pub fn category_prefix(&self) -> &str {
        self.category_namespace()
            .map(|ns| ns.name.as_str())
            .unwrap_or("Category")
    }

    /// Split a link target into namespace, title and fragment.
    pub fn parse_target(&self, target: &str) -> Result<LinkTarget, LinkTargetError> {
        let trimmed = target.trim();
        let (leading_colon, rest) = match trimmed.strip_prefix(':') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let (rest, fragment) = match rest.split_once('#') {
            Some((page, fragment)) => (page, Some(fragment.to_string())),
            None => (rest, None),
        };

        let (namespace, title) = match rest.split_once(':') {
            Some((prefix, title)) => match self.resolve(prefix) {
                Some(ns) if !prefix.trim().is_empty() => (ns.id, title),
                _ => (0, rest),
            },
            None => (0, rest),
        };

        let title = normalize_name(title);
        if title.is_empty() && fragment.is_none() {
            return Err(LinkTargetError::EmptyTitle {
                target: target.to_string(),
            });
        }
        if let Some(ch) = title.chars().find(|c| is_illegal_title_char(*c)) {
            return Err(LinkTargetError::IllegalCharacter {
                target: target.to_string(),
                ch,
            });
        }

        Ok(LinkTarget {
            namespace,
            title,
            fragment,
            leading_colon,
        })
    }

    pub fn classify(&self, target: &LinkTarget) -> LinkTargetType {
        if !target.leading_colon && self.image_namespaces.contains(&target.namespace) {
            LinkTargetType::Image
        } else {
            LinkTargetType::Page
        }
    }

    /// Whether the target tags the page with a category.
    pub fn is_category(&self, target: &LinkTarget) -> bool {
        !target.leading_colon && target.namespace == self.category_namespace
    }
}

fn normalize_name(name: &str) -> String {
    name.replace('_', " ").trim().to_string()
}

fn is_illegal_title_char(c: char) -> bool {
    matches!(c, '<' | '>' | '[' | ']' | '{' | '}' | '|' | '\u{FFFD}') || c.is_control()
}
