//! # Categories
//!
//! A category is a page-level element backed by every `[[Category:X]]` link
//! on the page that names it, compared case-insensitively. The links are its
//! *analogs*; the last one recorded is canonical and is what
//! [`WomDocument::as_ast_node`] reports.
//!
//! Categories are never attached through the generic child operations. The
//! page owns them and they are managed here:
//!
//! - adding one appends a synthesized link to the end of the page,
//! - renaming one rewrites the canonical link and drops the other analogs,
//! - removing one deletes every analog and leaves a standalone node,
//! - removing a subtree that holds analogs re-creates the link at the end
//!   of the page.

use log::debug;
use wikiwom_config::WikiConfig;
use wikiwom_syntax::{NodeId, NodeKind};

use crate::document::{CategoryAnalog, WomDocument, WomId, WomKind};
use crate::error::{Result, WomError};
use crate::toolbox;
use crate::validate;

impl WomDocument {
    /// Attached categories in the order they were added.
    pub fn categories(&self) -> Vec<WomId> {
        self.nodes[self.page.index()]
            .children
            .iter()
            .copied()
            .filter(|id| *id != self.body)
            .collect()
    }

    pub fn category(&self, name: &str) -> Option<WomId> {
        self.categories.get(&category_key(name)).copied()
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    /// Tag the page with a new category.
    pub fn add_category(&mut self, name: &str) -> Result<WomId> {
        let name = WikiConfig::normalize_title(name);
        validate::check_valid_category(Some(&name))?;
        if self.has_category(&name) {
            return Err(WomError::NameCollision(name));
        }

        let id = self.alloc(WomKind::Category, None);
        self.set_attribute_unchecked(id, "name", &name)?;
        let analog = self.append_category_link(&name)?;
        self.attach_category(id, &name, analog)?;
        debug!("Added category `{name}`");
        Ok(id)
    }

    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<()> {
        let id = self
            .category(old)
            .ok_or_else(|| WomError::validation(format!("no category called `{old}`")))?;
        self.set_attribute(id, "name", new)?;
        Ok(())
    }

    /// Remove a category and every link backing it. The returned node stays
    /// valid but is no longer part of the page.
    pub fn remove_category(&mut self, name: &str) -> Result<WomId> {
        let id = self
            .category(name)
            .ok_or_else(|| WomError::validation(format!("no category called `{name}`")))?;
        self.drop_analogs(id, None)?;

        let key = self.stored_category_key(id)?;
        self.categories.remove(&key);
        self.nodes[self.page.index()].children.retain(|c| *c != id);
        self.node_mut(id)?.parent = None;
        debug!("Removed category `{name}`");
        Ok(id)
    }

    /// The category links backing a category, canonical one last.
    pub fn category_analogs(&self, id: WomId) -> Result<Vec<NodeId>> {
        if self.kind(id)? != WomKind::Category {
            return Err(WomError::unsupported(format!("{id} is not a category")));
        }
        Ok(self.node(id)?.analogs.iter().map(|a| a.link).collect())
    }

    fn stored_category_key(&self, id: WomId) -> Result<String> {
        let name = self
            .get_attribute(id, "name")?
            .ok_or_else(|| WomError::invariant(format!("category {id} has no name")))?;
        Ok(category_key(name))
    }

    fn attach_category(&mut self, id: WomId, name: &str, analog: CategoryAnalog) -> Result<()> {
        self.category_links.insert(analog.link, id);
        self.node_mut(id)?.analogs.push(analog);
        self.node_mut(id)?.parent = Some(self.page);
        self.nodes[self.page.index()].children.push(id);
        self.categories.insert(category_key(name), id);
        Ok(())
    }

    /// Remove every analog except `keep` from its container.
    fn drop_analogs(&mut self, id: WomId, keep: Option<NodeId>) -> Result<()> {
        let analogs = std::mem::take(&mut self.node_mut(id)?.analogs);
        for analog in analogs {
            if Some(analog.link) == keep {
                self.node_mut(id)?.analogs.push(analog);
                continue;
            }
            toolbox::remove(&mut self.ast, analog.container, analog.link)?;
            self.category_links.remove(&analog.link);
        }
        Ok(())
    }

    /// Synthesize `[[Category:name]]` at the end of the page content.
    fn append_category_link(&mut self, name: &str) -> Result<CategoryAnalog> {
        let target = format!("{}:{name}", self.config.category_prefix());
        let title = self.ast.new_list(Vec::new());
        let link = self.ast.alloc(NodeKind::InternalLink { target, title });
        toolbox::add_rtd(&mut self.ast, link)?;
        let container = self.ast.page_content();
        toolbox::append(&mut self.ast, container, link)?;
        Ok(CategoryAnalog { container, link })
    }

    /// The category a link tags the page with, if it is a category link.
    pub(crate) fn link_category_name(&self, link: NodeId) -> Result<Option<String>> {
        let NodeKind::InternalLink { target, .. } = self.ast.kind(link)? else {
            return Ok(None);
        };
        Ok(self
            .config
            .parse_target(target)
            .ok()
            .filter(|target| self.config.is_category(target))
            .map(|target| target.title))
    }

    /// Record a category link found while building the WOM.
    ///
    /// Links naming the same category are merged into one element; the name
    /// is spelled the way the latest link spells it.
    pub(crate) fn register_category_link(
        &mut self,
        name: &str,
        container: NodeId,
        link: NodeId,
    ) -> Result<WomId> {
        let analog = CategoryAnalog { container, link };
        if let Some(id) = self.category(name) {
            self.category_links.insert(link, id);
            self.node_mut(id)?.analogs.push(analog);
            self.set_attribute_unchecked(id, "name", name)?;
            return Ok(id);
        }
        let id = self.alloc(WomKind::Category, None);
        self.set_attribute_unchecked(id, "name", name)?;
        self.attach_category(id, name, analog)?;
        Ok(id)
    }

    /// Rewrite the canonical link of a renamed category and drop the others.
    pub(crate) fn rename_category_links(
        &mut self,
        id: WomId,
        old: Option<&str>,
        new: &str,
    ) -> Result<()> {
        let Some(canonical) = self.node(id)?.analogs.last().copied() else {
            return Ok(());
        };
        if self.link_category_name(canonical.link)?.as_deref() == Some(new) {
            return Ok(());
        }

        let target_name = format!("{}:{new}", self.config.category_prefix());
        match self.ast.kind_mut(canonical.link)? {
            NodeKind::InternalLink { target, .. } => *target = target_name,
            other => {
                return Err(WomError::invariant(format!(
                    "category is backed by a {} node",
                    other.name()
                )));
            }
        }
        toolbox::add_rtd(&mut self.ast, canonical.link)?;
        self.drop_analogs(id, Some(canonical.link))?;

        if let Some(old) = old {
            self.categories.remove(&category_key(old));
        }
        self.categories.insert(category_key(new), id);
        debug!("Renamed category `{}` to `{new}`", old.unwrap_or_default());
        Ok(())
    }

    /// Re-create the links of categories whose analogs lie in a subtree that
    /// was just cut out of the page.
    pub(crate) fn reattach_categories_below(&mut self, node: NodeId) -> Result<()> {
        let mut found = Vec::new();
        for candidate in std::iter::once(node).chain(self.ast.descendants(node)?) {
            if let Some(id) = self.category_links.get(&candidate)
                && !found.contains(id)
            {
                found.push(*id);
            }
        }
        for id in found {
            let name = self
                .get_attribute(id, "name")?
                .ok_or_else(|| WomError::invariant(format!("category {id} has no name")))?
                .to_string();
            self.drop_analogs(id, None)?;
            let analog = self.append_category_link(&name)?;
            self.category_links.insert(analog.link, id);
            self.node_mut(id)?.analogs.push(analog);
            debug!("Moved category `{name}` to the end of the page");
        }
        Ok(())
    }

    /// Point analogs recorded in `from` at `to` after its items moved.
    pub(crate) fn move_analogs(&mut self, from: NodeId, to: NodeId) {
        for node in &mut self.nodes {
            for analog in &mut node.analogs {
                if analog.container == from {
                    analog.container = to;
                }
            }
        }
    }
}

/// Index key under which two spellings of one category collide: `Foo_bar`,
/// `foo bar` and `FOO  BAR` all name the same category.
pub(crate) fn category_key(name: &str) -> String {
    WikiConfig::normalize_title(name)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
