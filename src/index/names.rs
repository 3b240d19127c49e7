//! Name resolution for class references inside one PHP namespace scope.

use std::collections::HashMap;

pub const NAMESPACE_SEPARATOR: char = '\\';

/// The namespace a declaration lives in plus the `use` imports visible to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameScope {
    namespace: String,
    // lower-cased alias -> fully-qualified target
    imports: HashMap<String, String>,
}

impl NameScope {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: trim_separators(&namespace.into()).to_string(),
            imports: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Import `target` under `alias`, or under its last segment when no alias is given.
    pub fn add_import(&mut self, target: &str, alias: Option<&str>) {
        let target = trim_separators(target);
        if target.is_empty() {
            return;
        }
        let alias = alias.unwrap_or_else(|| short_name(target));
        self.imports
            .insert(alias.to_ascii_lowercase(), target.to_string());
    }

    /// Prefix a declared (unqualified) name with the current namespace.
    pub fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, name)
        }
    }

    /// Resolve a class reference to its fully-qualified name.
    pub fn resolve(&self, name: &str) -> String {
        let name = name.trim();
        if let Some(fully_qualified) = name.strip_prefix(NAMESPACE_SEPARATOR) {
            return fully_qualified.to_string();
        }

        if let Some((head, rest)) = name.split_once(NAMESPACE_SEPARATOR) {
            if head.eq_ignore_ascii_case("namespace") {
                return self.qualify(rest);
            }
            if let Some(target) = self.imports.get(&head.to_ascii_lowercase()) {
                return format!("{target}{NAMESPACE_SEPARATOR}{rest}");
            }
            return self.qualify(name);
        }

        match self.imports.get(&name.to_ascii_lowercase()) {
            Some(target) => target.clone(),
            None => self.qualify(name),
        }
    }
}

pub fn trim_separators(name: &str) -> &str {
    name.trim_matches(NAMESPACE_SEPARATOR)
}

/// Last segment of a qualified name.
pub fn short_name(name: &str) -> &str {
    name.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(name)
}

/// Key used for case-insensitive class lookups.
pub fn lookup_key(name: &str) -> String {
    trim_separators(name).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_namespace() {
        let scope = NameScope::new("App\\Service");
        assert_eq!(scope.resolve("Foo"), "App\\Service\\Foo");
        assert_eq!(scope.resolve("Sub\\Foo"), "App\\Service\\Sub\\Foo");
    }

    #[test]
    fn test_resolve_fully_qualified() {
        let scope = NameScope::new("App");
        assert_eq!(scope.resolve("\\Vendor\\Base"), "Vendor\\Base");
    }

    #[test]
    fn test_resolve_imports_case_insensitively() {
        let mut scope = NameScope::new("App");
        scope.add_import("Vendor\\Lib\\Base", None);
        scope.add_import("\\Vendor\\Contracts", Some("C"));
        assert_eq!(scope.resolve("base"), "Vendor\\Lib\\Base");
        assert_eq!(scope.resolve("c\\Service"), "Vendor\\Contracts\\Service");
    }

    #[test]
    fn test_resolve_namespace_keyword() {
        let scope = NameScope::new("App");
        assert_eq!(scope.resolve("namespace\\Foo"), "App\\Foo");
    }

    #[test]
    fn test_global_namespace_leaves_names_alone() {
        let scope = NameScope::new("");
        assert_eq!(scope.qualify("Foo"), "Foo");
        assert_eq!(scope.resolve("Foo"), "Foo");
    }

    #[test]
    fn test_lookup_key() {
        assert_eq!(lookup_key("\\App\\Foo"), "app\\foo");
        assert_eq!(short_name("App\\Foo"), "Foo");
    }
}
