//! The attribute pipeline.
//!
//! A write resolves its descriptor, lets it verify and rewrite the value,
//! normalizes whitespace and, for synced attributes, mirrors the value into
//! an `XmlAttribute` of the element's generic representation before it is
//! committed to the store. Everything that can reject the write runs before
//! the first mutation.

use log::{debug, warn};
use wikiwom_syntax::{NodeId, NodeKind};

use super::{Attribute, AttributeDescriptor, AttributeView, normalize, resolve};
use crate::document::{WomDocument, WomId};
use crate::error::{Result, WomError};
use crate::toolbox;
use crate::validate;

impl WomDocument {
    fn descriptor(&self, id: WomId, name: &str) -> Result<&'static AttributeDescriptor> {
        let kind = self.kind(id)?;
        resolve(kind, name).ok_or_else(|| {
            WomError::validation(format!(
                "<{}> does not support attribute `{name}`",
                kind.node_name()
            ))
        })
    }

    pub fn get_attribute(&self, id: WomId, name: &str) -> Result<Option<&str>> {
        let key = name.to_ascii_lowercase();
        Ok(self
            .node(id)?
            .attributes
            .iter()
            .find(|attr| attr.name == key)
            .map(|attr| attr.value.as_str()))
    }

    /// The attribute as a node, including the AST node mirroring it.
    pub fn attribute_node(&self, id: WomId, name: &str) -> Result<Option<AttributeView>> {
        let key = name.to_ascii_lowercase();
        Ok(self
            .node(id)?
            .attributes
            .iter()
            .find(|attr| attr.name == key)
            .map(AttributeView::from))
    }

    pub fn attributes(&self, id: WomId) -> Result<Vec<AttributeView>> {
        Ok(self
            .node(id)?
            .attributes
            .iter()
            .map(AttributeView::from)
            .collect())
    }

    /// Set an attribute, returning the previous value.
    ///
    /// A verifier may turn the write into a removal (an empty page namespace,
    /// for instance). Setting a synced attribute on a natively represented
    /// element first converts it to its generic XML form.
    pub fn set_attribute(&mut self, id: WomId, name: &str, value: &str) -> Result<Option<String>> {
        let descriptor = self.descriptor(id, name)?;
        let Some(verified) = (descriptor.verify)(self, id, value)? else {
            return self.remove_attribute(id, name);
        };
        let value = normalize(descriptor.normalization, &verified);
        let old = self.commit_attribute(id, descriptor, name, value.clone())?;
        if let Some(action) = descriptor.custom_action {
            action(self, id, old.as_deref(), Some(&value))?;
        }
        Ok(old)
    }

    /// Set an attribute without verification or custom action.
    ///
    /// Used while building the WOM, where the AST is the source of truth and
    /// rejecting a value would lose it.
    pub fn set_attribute_unchecked(
        &mut self,
        id: WomId,
        name: &str,
        value: &str,
    ) -> Result<Option<String>> {
        let descriptor = self.descriptor(id, name)?;
        let value = normalize(descriptor.normalization, value);
        self.commit_attribute(id, descriptor, name, value)
    }

    pub fn remove_attribute(&mut self, id: WomId, name: &str) -> Result<Option<String>> {
        let descriptor = self.descriptor(id, name)?;
        if !descriptor.removable {
            return Err(WomError::unsupported(format!(
                "attribute `{name}` cannot be removed"
            )));
        }
        let key = name.to_ascii_lowercase();
        let Some(index) = self.node(id)?.attributes.iter().position(|a| a.name == key) else {
            return Ok(None);
        };
        if let Some(attr) = self.node(id)?.attributes[index].ast {
            let (list, _) = self.xml_attribute_lists(id)?;
            toolbox::remove(&mut self.ast, list, attr)?;
        }
        let old = self.node_mut(id)?.attributes.remove(index);
        if let Some(action) = descriptor.custom_action {
            action(self, id, Some(&old.value), None)?;
        }
        Ok(Some(old.value))
    }

    fn commit_attribute(
        &mut self,
        id: WomId,
        descriptor: &AttributeDescriptor,
        name: &str,
        value: String,
    ) -> Result<Option<String>> {
        let key = name.to_ascii_lowercase();
        let existing = self
            .node(id)?
            .attributes
            .iter()
            .position(|attr| attr.name == key);

        let mut ast = self.stored_ast(id, existing)?;
        if descriptor.sync_to_ast {
            validate::check_valid_xml_name(&key)?;
            self.promote(id)?;
            let current = self.stored_ast(id, existing)?;
            ast = Some(self.write_xml_attribute(id, &key, &value, current)?);
        }

        let attributes = &mut self.node_mut(id)?.attributes;
        Ok(match existing {
            Some(index) => {
                let attr = &mut attributes[index];
                attr.ast = ast;
                Some(std::mem::replace(&mut attr.value, value))
            }
            None => {
                attributes.push(Attribute {
                    name: key,
                    value,
                    ast,
                });
                None
            }
        })
    }

    fn stored_ast(&self, id: WomId, index: Option<usize>) -> Result<Option<NodeId>> {
        Ok(index.and_then(|i| self.node(id).ok()?.attributes.get(i)?.ast))
    }

    /// The attribute list of the generic element backing `id`, and the
    /// element itself.
    fn xml_attribute_lists(&self, id: WomId) -> Result<(NodeId, NodeId)> {
        let element = self.generic_node(id)?;
        match self.ast.kind(element)? {
            NodeKind::XmlElement { attributes, .. } => Ok((*attributes, element)),
            other => Err(WomError::invariant(format!(
                "generic element is backed by a {} node",
                other.name()
            ))),
        }
    }

    /// Mirror a value into the AST, updating `existing` in place when given.
    fn write_xml_attribute(
        &mut self,
        id: WomId,
        name: &str,
        value: &str,
        existing: Option<NodeId>,
    ) -> Result<NodeId> {
        let (list, element) = self.xml_attribute_lists(id)?;
        let items = toolbox::encode_value(&mut self.ast, value);

        if let Some(attr) = existing {
            let (value_list, quoted) = match self.ast.kind(attr)? {
                NodeKind::XmlAttribute {
                    value, has_value, ..
                } => {
                    let quoted = *has_value
                        && self
                            .ast
                            .rtd(attr)?
                            .and_then(|rtd| rtd.slot(0))
                            .is_some_and(|head| head.ends_with('"'));
                    (*value, quoted)
                }
                other => {
                    return Err(WomError::invariant(format!(
                        "attribute is backed by a {} node",
                        other.name()
                    )));
                }
            };
            *self.ast.list_mut(value_list)? = items;
            if let NodeKind::XmlAttribute { has_value, .. } = self.ast.kind_mut(attr)? {
                *has_value = true;
            }
            if !quoted {
                self.ast
                    .set_rtd(attr, Some(toolbox::xml_attribute_rtd(name, true)))?;
            }
            debug!("Updated attribute `{name}` of element {element}");
            return Ok(attr);
        }

        let value = self.ast.new_list(items);
        let attr = self.ast.alloc(NodeKind::XmlAttribute {
            name: name.to_string(),
            has_value: true,
            value,
        });
        self.ast
            .set_rtd(attr, Some(toolbox::xml_attribute_rtd(name, true)))?;
        toolbox::append(&mut self.ast, list, attr)?;
        debug!("Added attribute `{name}` to element {element}");
        Ok(attr)
    }

    /// Write every synced attribute that has no AST node yet. Called right
    /// after an element became generic.
    pub(crate) fn write_pending_attributes(&mut self, id: WomId) -> Result<()> {
        let pending: Vec<(usize, String, String)> = self
            .node(id)?
            .attributes
            .iter()
            .enumerate()
            .filter(|(_, attr)| attr.ast.is_none())
            .filter(|(_, attr)| {
                resolve(self.nodes[id.index()].kind, &attr.name).is_some_and(|d| d.sync_to_ast)
            })
            .map(|(i, attr)| (i, attr.name.clone(), attr.value.clone()))
            .collect();
        for (index, name, value) in pending {
            let attr = self.write_xml_attribute(id, &name, &value, None)?;
            self.node_mut(id)?.attributes[index].ast = Some(attr);
        }
        Ok(())
    }

    /// Record an attribute read from the AST without writing anything back.
    pub(crate) fn adopt_attribute(
        &mut self,
        id: WomId,
        name: &str,
        value: &str,
        ast: NodeId,
    ) -> Result<()> {
        let Some(descriptor) = resolve(self.kind(id)?, name) else {
            warn!("Ignoring attribute `{name}` without a descriptor on {id}");
            return Ok(());
        };
        let key = name.to_ascii_lowercase();
        let value = normalize(descriptor.normalization, value);
        let node = self.node_mut(id)?;
        if node.attributes.iter().any(|attr| attr.name == key) {
            warn!("Ignoring duplicate attribute `{key}`");
            return Ok(());
        }
        node.attributes.push(Attribute {
            name: key,
            value,
            ast: Some(ast),
        });
        Ok(())
    }
}
