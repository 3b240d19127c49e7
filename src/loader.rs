//! Runtime loading of generated artifacts.
//!
//! [`Autoloader`] stands in for the host's type-resolution machinery: an
//! owned, explicitly created value holding the installed resolvers and the
//! types defined so far. Dropping it tears everything down. Nothing touches
//! the file system until a type is actually requested.
//!
//! [`ProxyLoader`] is the resolver for generated factories: it maps a type
//! under the proxy namespace to `{dir}/{BaseName}.php` and declines
//! everything else.

use crate::codegen::naming::base_name_in_namespace;
use crate::errors::{Error, Result};
use crate::registry::artifact_path;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Hook consulted for a type name nobody has defined yet.
pub trait TypeResolver: Send + Sync {
    /// Identity used to keep registration idempotent.
    fn id(&self) -> String;

    /// File defining `type_name`, or `None` to let other resolvers try.
    fn resolve(&self, type_name: &str) -> Option<PathBuf>;
}

/// A type whose defining file has been loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedType {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Unregistered,
    Registered,
}

pub struct Autoloader {
    hooks_supported: bool,
    resolvers: Vec<Box<dyn TypeResolver>>,
    // lower-cased type name -> loaded definition
    defined: HashMap<String, LoadedType>,
}

impl Default for Autoloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Autoloader {
    pub fn new() -> Self {
        Self {
            hooks_supported: true,
            resolvers: Vec::new(),
            defined: HashMap::new(),
        }
    }

    /// A host without the ability to install resolution hooks.
    pub fn without_hook_support() -> Self {
        Self {
            hooks_supported: false,
            ..Self::new()
        }
    }

    /// Install `resolver`. Returns `false` when an identical resolver is
    /// already installed.
    pub fn register(&mut self, resolver: Box<dyn TypeResolver>) -> Result<bool> {
        if !self.hooks_supported {
            return Err(Error::Unsupported(
                "type resolution hooks are not available".to_string(),
            ));
        }
        if self.is_registered(&resolver.id()) {
            return Ok(false);
        }
        tracing::debug!(resolver = %resolver.id(), "Installing type resolver");
        self.resolvers.push(resolver);
        Ok(true)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.resolvers.iter().any(|r| r.id() == id)
    }

    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_defined(&self, type_name: &str) -> bool {
        self.defined.contains_key(&type_key(type_name))
    }

    /// Resolve `type_name`, consulting resolvers in registration order the
    /// first time it is requested. `Ok(None)` means no resolver knew it.
    pub fn load(&mut self, type_name: &str) -> Result<Option<&LoadedType>> {
        let key = type_key(type_name);
        if self.defined.contains_key(&key) {
            return Ok(self.defined.get(&key));
        }

        let Some(path) = self.resolvers.iter().find_map(|r| r.resolve(type_name)) else {
            return Ok(None);
        };
        let source = fs::read_to_string(&path)?;
        tracing::debug!(type_name, path = %path.display(), "Loaded generated type");

        let loaded = LoadedType {
            name: type_name.trim_start_matches('\\').to_string(),
            path,
            source,
        };
        Ok(Some(self.defined.entry(key).or_insert(loaded)))
    }
}

fn type_key(type_name: &str) -> String {
    type_name.trim_start_matches('\\').to_ascii_lowercase()
}

/// Resolver mapping proxy-namespace types to generated artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyLoader {
    dir: PathBuf,
    namespace: String,
}

impl ProxyLoader {
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            namespace: namespace.into(),
        }
    }

    /// Install a proxy loader for `dir` and `namespace` into `host`.
    /// Registering the same pair twice leaves a single hook.
    pub fn register(host: &mut Autoloader, dir: &Path, namespace: &str) -> Result<()> {
        let loader = Self::new(dir, namespace);
        if host.register(Box::new(loader))? {
            tracing::info!(dir = %dir.display(), namespace, "Proxy loader registered");
        }
        Ok(())
    }

    pub fn state(&self, host: &Autoloader) -> LoaderState {
        if host.is_registered(&self.id()) {
            LoaderState::Registered
        } else {
            LoaderState::Unregistered
        }
    }
}

impl TypeResolver for ProxyLoader {
    fn id(&self) -> String {
        format!("proxy:{}:{}", self.dir.display(), self.namespace)
    }

    fn resolve(&self, type_name: &str) -> Option<PathBuf> {
        let base_name = base_name_in_namespace(&self.namespace, type_name)?;
        let file = artifact_path(&self.dir, &base_name);
        file.is_file().then_some(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const FACTORY: &str = "AppServiceFoo___GeneratedFactoryInterface";

    fn proxy_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(format!("{FACTORY}.php")), "<?php\n").unwrap();
        dir
    }

    struct CountingResolver {
        calls: Arc<AtomicUsize>,
        path: PathBuf,
    }

    impl TypeResolver for CountingResolver {
        fn id(&self) -> String {
            "counting".to_string()
        }

        fn resolve(&self, _type_name: &str) -> Option<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(self.path.clone())
        }
    }

    #[test]
    fn test_loads_type_in_namespace() {
        let dir = proxy_dir();
        let mut host = Autoloader::new();
        ProxyLoader::register(&mut host, dir.path(), "Gen").unwrap();

        let loaded = host.load(&format!("Gen\\{FACTORY}")).unwrap().unwrap();
        assert_eq!(loaded.path, dir.path().join(format!("{FACTORY}.php")));
        assert_eq!(loaded.source, "<?php\n");
        assert!(host.is_defined(&format!("\\gen\\{FACTORY}")));
    }

    #[test]
    fn test_declines_type_outside_namespace() {
        let dir = proxy_dir();
        let loader = ProxyLoader::new(dir.path(), "Gen");
        assert_eq!(loader.resolve(&format!("Other\\{FACTORY}")), None);
        assert_eq!(loader.resolve(&format!("GenX\\{FACTORY}")), None);
    }

    #[test]
    fn test_missing_file_leaves_type_unresolved() {
        let dir = proxy_dir();
        let mut host = Autoloader::new();
        ProxyLoader::register(&mut host, dir.path(), "Gen").unwrap();

        assert!(host.load("Gen\\Missing___GeneratedFactoryInterface").unwrap().is_none());
    }

    #[test]
    fn test_registration_is_idempotent() {
        let dir = proxy_dir();
        let mut host = Autoloader::new();
        let loader = ProxyLoader::new(dir.path(), "Gen");
        assert_eq!(loader.state(&host), LoaderState::Unregistered);

        ProxyLoader::register(&mut host, dir.path(), "Gen").unwrap();
        ProxyLoader::register(&mut host, dir.path(), "Gen").unwrap();

        assert_eq!(host.resolver_count(), 1);
        assert_eq!(loader.state(&host), LoaderState::Registered);
    }

    #[test]
    fn test_unsupported_host_fails_registration() {
        let mut host = Autoloader::without_hook_support();
        let result = ProxyLoader::register(&mut host, Path::new("/proxies"), "Gen");
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_defined_types_are_not_resolved_again() {
        let dir = proxy_dir();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut host = Autoloader::new();
        host.register(Box::new(CountingResolver {
            calls: calls.clone(),
            path: dir.path().join(format!("{FACTORY}.php")),
        }))
        .unwrap();

        host.load("Any\\Type").unwrap();
        host.load("any\\type").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
