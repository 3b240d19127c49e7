//! Deterministic names of generated artifacts.
//!
//! Stripping separators is not injective for every conceivable input
//! (`A\BC` and `AB\C` collide); well-formed class names are assumed.

use crate::index::names::{trim_separators, NAMESPACE_SEPARATOR};

/// Suffix marking a generated factory interface.
pub const FACTORY_SUFFIX: &str = "___GeneratedFactoryInterface";

/// Shared marker interface every generated factory extends.
pub const MARKER_INTERFACE: &str = "IGeneratedFactory";

/// Host source file extension.
pub const SOURCE_EXTENSION: &str = "php";

pub const DEFAULT_PROXY_NAMESPACE: &str = "AutoFactory\\Proxies";

/// Artifact name for a class: its FQN without separators plus the suffix.
pub fn artifact_name(class_fqn: &str) -> String {
    let mut name = strip_separators(class_fqn);
    name.push_str(FACTORY_SUFFIX);
    name
}

pub fn strip_separators(name: &str) -> String {
    name.chars().filter(|c| *c != NAMESPACE_SEPARATOR).collect()
}

/// Fully-qualified name of an artifact inside the proxy namespace.
pub fn qualified_name(namespace: &str, artifact: &str) -> String {
    let namespace = trim_separators(namespace);
    if namespace.is_empty() {
        artifact.to_string()
    } else {
        format!("{namespace}{NAMESPACE_SEPARATOR}{artifact}")
    }
}

/// Artifact base name for a requested type, if the type lives under
/// `namespace`. The namespace must be followed by a separator, so `GenX\Foo`
/// is not under `Gen`.
pub fn base_name_in_namespace(namespace: &str, type_name: &str) -> Option<String> {
    let namespace = trim_separators(namespace);
    let type_name = type_name.trim_start_matches(NAMESPACE_SEPARATOR);

    let rest = if namespace.is_empty() {
        type_name
    } else {
        let head = type_name.get(..namespace.len())?;
        if !head.eq_ignore_ascii_case(namespace) {
            return None;
        }
        type_name[namespace.len()..].strip_prefix(NAMESPACE_SEPARATOR)?
    };

    let base = strip_separators(rest);
    (!base.is_empty()).then_some(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_strips_separators() {
        assert_eq!(
            artifact_name("App\\Service\\Foo"),
            "AppServiceFoo___GeneratedFactoryInterface"
        );
        assert_eq!(artifact_name("\\Foo"), "Foo___GeneratedFactoryInterface");
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("\\Gen\\", "X"), "Gen\\X");
        assert_eq!(qualified_name("", "X"), "X");
    }

    #[test]
    fn test_base_name_in_namespace() {
        assert_eq!(
            base_name_in_namespace("Gen", "Gen\\AppServiceFoo___GeneratedFactoryInterface"),
            Some("AppServiceFoo___GeneratedFactoryInterface".to_string())
        );
        assert_eq!(
            base_name_in_namespace("Gen", "\\gen\\Sub\\Thing"),
            Some("SubThing".to_string())
        );
        assert_eq!(base_name_in_namespace("Gen", "GenX\\Foo"), None);
        assert_eq!(base_name_in_namespace("Gen", "App\\Foo"), None);
        assert_eq!(base_name_in_namespace("Gen", "Gen"), None);
        assert_eq!(base_name_in_namespace("Gen", "Gen\\"), None);
    }

    #[test]
    fn test_distinct_classes_get_distinct_names() {
        assert_ne!(artifact_name("App\\Foo"), artifact_name("App\\Bar"));
        // Known limitation: separator placement is not preserved.
        assert_eq!(artifact_name("A\\BC"), artifact_name("AB\\C"));
    }
}
