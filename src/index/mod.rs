//! Class index over a set of PHP source directories.
//!
//! The index maps every discoverable class-like declaration to its reflection
//! metadata and answers the hierarchy questions the selector asks. Iteration
//! is always in sorted (case-insensitive) name order so downstream output is
//! deterministic.

pub mod names;
pub mod parser;
pub mod reflection;
pub mod walker;

use crate::errors::{Error, Result};
use names::lookup_key;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

pub use reflection::{ClassInfo, ClassKind, Constructor, Parameter, Visibility};

#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    classes: BTreeMap<String, ClassInfo>,
    files: Vec<PathBuf>,
}

impl ClassIndex {
    /// Scan `dirs` for PHP files and reflect every declaration they contain.
    pub fn build(dirs: &[PathBuf], exclude: &[String]) -> Result<Self> {
        let files = walker::find_source_files(dirs, exclude)?;
        tracing::debug!(files = files.len(), "Indexing source files");

        let reflected = files
            .par_iter()
            .map(|file| reflect_path(file))
            .collect::<Result<Vec<_>>>()?;

        let mut index = Self::from_classes(reflected.into_iter().flatten())?;
        index.files = files;
        tracing::info!(
            classes = index.len(),
            files = index.files.len(),
            "Class index rebuilt"
        );
        Ok(index)
    }

    /// Build an index from already reflected declarations.
    pub fn from_classes(classes: impl IntoIterator<Item = ClassInfo>) -> Result<Self> {
        let mut map: BTreeMap<String, ClassInfo> = BTreeMap::new();
        for class in classes {
            let key = lookup_key(&class.name);
            if let Some(existing) = map.get(&key) {
                return Err(Error::AmbiguousClass {
                    class: class.name,
                    first: existing.file.clone(),
                    second: class.file,
                });
            }
            map.insert(key, class);
        }
        Ok(Self {
            classes: map,
            files: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Files that were scanned, sorted.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(&lookup_key(name))
    }

    /// True when some indexed declaration names `name` as its parent or
    /// as an implemented or extended interface.
    pub fn is_referenced(&self, name: &str) -> bool {
        let key = lookup_key(name);
        self.classes
            .values()
            .any(|class| direct_supertypes(class).any(|supertype| lookup_key(supertype) == key))
    }

    /// All indexed declarations in sorted name order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    /// The constructor a `new` expression would call: the class's own, or the
    /// nearest ancestor's.
    pub fn constructor_of<'a>(&'a self, class: &'a ClassInfo) -> Option<&'a Constructor> {
        self.ancestors(class)
            .into_iter()
            .find_map(|c| c.constructor.as_ref())
    }

    /// Concrete class whose effective constructor, if any, is public.
    pub fn is_instantiable(&self, class: &ClassInfo) -> bool {
        class.kind == ClassKind::Class
            && !class.is_abstract
            && self
                .constructor_of(class)
                .map(|ctor| ctor.visibility == Visibility::Public)
                .unwrap_or(true)
    }

    /// Strict subtype check through parents, interfaces and interface
    /// inheritance. A type is never a subclass of itself.
    pub fn is_subclass_of(&self, class: &ClassInfo, target: &str) -> bool {
        self.supertypes(class).contains(&lookup_key(target))
    }

    /// Lookup keys of every known or referenced supertype of `class`.
    pub fn supertypes(&self, class: &ClassInfo) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&str> = direct_supertypes(class).collect();

        while let Some(name) = queue.pop_front() {
            let key = lookup_key(name);
            if !seen.insert(key) {
                continue;
            }
            if let Some(known) = self.get(name) {
                queue.extend(direct_supertypes(known));
            }
        }

        seen
    }

    /// Source files of the class and every known ancestor and interface.
    pub fn ancestry_files(&self, class: &ClassInfo) -> BTreeSet<PathBuf> {
        let mut files: BTreeSet<PathBuf> = self
            .supertypes(class)
            .iter()
            .filter_map(|key| self.classes.get(key))
            .map(|c| c.file.clone())
            .collect();
        files.insert(class.file.clone());
        files
    }

    /// The class followed by its parent chain, stopping at unknown or
    /// cyclic parents.
    fn ancestors<'a>(&'a self, class: &'a ClassInfo) -> Vec<&'a ClassInfo> {
        let mut chain = vec![class];
        let mut seen = BTreeSet::from([lookup_key(&class.name)]);
        let mut current = class;

        while let Some(parent) = current.parent.as_deref().and_then(|p| self.get(p)) {
            if !seen.insert(lookup_key(&parent.name)) {
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain
    }
}

fn direct_supertypes(class: &ClassInfo) -> impl Iterator<Item = &str> {
    class
        .parent
        .as_deref()
        .into_iter()
        .chain(class.interfaces.iter().map(String::as_str))
}

fn reflect_path(file: &Path) -> Result<Vec<ClassInfo>> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| Error::parse(file, format!("Cannot read source: {e}")))?;
    let ast = parser::parse_source(&content, file)?;
    Ok(reflection::reflect_file(&ast))
}
