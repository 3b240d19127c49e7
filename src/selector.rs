//! Selection of the classes that receive a generated factory.

use crate::errors::{Error, Result};
use crate::index::names::{lookup_key, trim_separators};
use crate::index::{ClassIndex, ClassInfo, ClassKind};

/// Validated set of scan targets. Every entry names a class or interface
/// declared in the index, or a supertype some indexed class refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTypes {
    names: Vec<String>,
}

impl TargetTypes {
    /// Validate `names` against `index`, failing on the first unknown type.
    pub fn resolve(index: &ClassIndex, names: &[String]) -> Result<Self> {
        let mut resolved: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let target = match index.get(name) {
                Some(known) if matches!(known.kind, ClassKind::Class | ClassKind::Interface) => {
                    known.name.clone()
                }
                None if index.is_referenced(name) => {
                    tracing::debug!(scan_target = %name, "Scan target declared outside the source directories");
                    trim_separators(name.trim()).to_string()
                }
                _ => return Err(Error::UnknownScanTarget(name.clone())),
            };
            let key = lookup_key(&target);
            if !resolved.iter().any(|existing| lookup_key(existing) == key) {
                resolved.push(target);
            }
        }
        Ok(Self { names: resolved })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First target `class` is a strict subtype of.
    pub fn matched_by<'a>(&'a self, index: &ClassIndex, class: &ClassInfo) -> Option<&'a str> {
        self.names
            .iter()
            .find(|target| index.is_subclass_of(class, target))
            .map(String::as_str)
    }
}

/// Instantiable classes that are a subtype of at least one target, in
/// index order. An empty target set selects nothing.
pub fn select<'a>(index: &'a ClassIndex, targets: &TargetTypes) -> Vec<&'a ClassInfo> {
    index
        .classes()
        .filter(|class| {
            if !index.is_instantiable(class) {
                return false;
            }
            match targets.matched_by(index, class) {
                Some(target) => {
                    tracing::debug!(class = %class.name, target, "Selected for factory generation");
                    true
                }
                None => false,
            }
        })
        .collect()
}
