//! Factory interface generation.
//!
//! Turns a selected class and its builtin constructor parameters into a
//! [`GeneratedArtifact`]: a PHP file holding one interface that extends the
//! shared marker and declares a single `create` method.

pub mod model;
pub mod naming;
pub mod printer;

use crate::index::{ClassInfo, Parameter};
use model::{DocBlock, InterfaceDecl, MethodDecl, ParamDecl, PhpFile};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const FACTORY_METHOD: &str = "create";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Class the factory creates; `None` for the marker interface
    pub class_name: Option<String>,
    pub name: String,
    pub namespace: String,
    pub file: PhpFile,
    /// Source files whose changes invalidate this artifact
    pub dependencies: BTreeSet<PathBuf>,
}

impl GeneratedArtifact {
    pub fn qualified_name(&self) -> String {
        naming::qualified_name(&self.namespace, &self.name)
    }

    pub fn source(&self) -> String {
        self.file.to_string()
    }
}

/// Build the factory interface for `class` from its builtin parameters.
pub fn generate_factory(
    class: &ClassInfo,
    builtin: &[Parameter],
    namespace: &str,
    dependencies: BTreeSet<PathBuf>,
) -> GeneratedArtifact {
    let name = naming::artifact_name(&class.name);
    let marker = naming::qualified_name(namespace, naming::MARKER_INTERFACE);

    let method = MethodDecl::new(FACTORY_METHOD)
        .with_parameters(builtin.iter().map(param_decl).collect())
        .returns(class.name.clone())
        .with_doc(parameter_doc(builtin));

    GeneratedArtifact {
        class_name: Some(class.name.clone()),
        file: PhpFile::new(namespace)
            .with_interface(InterfaceDecl::new(name.clone()).extends(marker).with_method(method)),
        name,
        namespace: namespace.to_string(),
        dependencies,
    }
}

/// The shared marker interface, emitted alongside the factories.
pub fn generate_marker(namespace: &str) -> GeneratedArtifact {
    GeneratedArtifact {
        class_name: None,
        name: naming::MARKER_INTERFACE.to_string(),
        namespace: namespace.to_string(),
        file: PhpFile::new(namespace).with_interface(InterfaceDecl::new(naming::MARKER_INTERFACE)),
        dependencies: BTreeSet::new(),
    }
}

fn param_decl(parameter: &Parameter) -> ParamDecl {
    ParamDecl {
        name: parameter.name.clone(),
        type_hint: parameter.type_hint.clone(),
        default_value: parameter.default_value.clone(),
        by_reference: parameter.by_reference,
        variadic: parameter.variadic,
    }
}

/// `@param` lines documenting each parameter's effective type.
fn parameter_doc(parameters: &[Parameter]) -> DocBlock {
    let mut doc = DocBlock::default();
    for parameter in parameters {
        doc.push(format!("@param {} ${}", doc_type(parameter), parameter.name));
    }
    doc
}

fn doc_type(parameter: &Parameter) -> String {
    let declared = parameter.type_hint.as_deref().map(str::trim);
    let mut doc_type = match declared {
        Some(hint) => hint.trim_start_matches('?').to_string(),
        None => "mixed".to_string(),
    };

    let nullable = declared.map(|hint| hint.starts_with('?')).unwrap_or(false)
        || (parameter.is_optional() && parameter.defaults_to_null());
    let mentions_null = doc_type
        .split('|')
        .any(|atom| atom.trim().eq_ignore_ascii_case("null"));
    if nullable && !mentions_null {
        doc_type.push_str("|null");
    }
    doc_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Constructor, Visibility};
    use pretty_assertions::assert_eq;

    fn foo() -> ClassInfo {
        ClassInfo::class("App\\Service\\Foo").in_file("src/Foo.php")
    }

    #[test]
    fn test_factory_structure() {
        let builtin = vec![
            Parameter::new("a").with_type("int"),
            Parameter::new("b").with_type("string").with_default("\"x\""),
        ];
        let artifact = generate_factory(&foo(), &builtin, "Gen", BTreeSet::new());

        assert_eq!(artifact.name, "AppServiceFoo___GeneratedFactoryInterface");
        assert_eq!(
            artifact.qualified_name(),
            "Gen\\AppServiceFoo___GeneratedFactoryInterface"
        );
        let interface = &artifact.file.interfaces[0];
        assert_eq!(interface.extends, vec!["Gen\\IGeneratedFactory"]);
        assert_eq!(interface.methods.len(), 1);

        let method = &interface.methods[0];
        assert_eq!(method.name, "create");
        assert_eq!(method.return_type.as_deref(), Some("App\\Service\\Foo"));
        let rendered: Vec<String> = method.parameters.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["int $a", "string $b = \"x\""]);
        assert_eq!(method.doc.lines, vec!["@param int $a", "@param string $b"]);
    }

    #[test]
    fn test_doc_marks_null_defaults() {
        let builtin = vec![
            Parameter::new("untyped"),
            Parameter::new("fallback").with_default("NULL"),
            Parameter::new("name").with_type("string").with_default("null"),
            Parameter::new("limit").with_type("?int"),
            Parameter::new("either").with_type("int|null").with_default("null"),
        ];
        let artifact = generate_factory(&foo(), &builtin, "Gen", BTreeSet::new());

        assert_eq!(
            artifact.file.interfaces[0].methods[0].doc.lines,
            vec![
                "@param mixed $untyped",
                "@param mixed|null $fallback",
                "@param string|null $name",
                "@param int|null $limit",
                "@param int|null $either",
            ]
        );
    }

    #[test]
    fn test_null_default_before_required_parameter_is_not_documented_as_null() {
        let ctor = Constructor::new(
            Visibility::Public,
            vec![
                Parameter::new("a").with_type("int").with_default("null"),
                Parameter::new("b").with_type("int"),
                Parameter::new("c").with_type("string").with_default("null"),
            ],
        );
        let artifact = generate_factory(&foo(), &ctor.parameters, "Gen", BTreeSet::new());

        assert_eq!(
            artifact.file.interfaces[0].methods[0].doc.lines,
            vec!["@param int $a", "@param int $b", "@param string|null $c"]
        );
    }

    #[test]
    fn test_factory_without_parameters_has_no_doc() {
        let artifact = generate_factory(&foo(), &[], "Gen", BTreeSet::new());
        let expected = "<?php\n\
            declare(strict_types=1);\n\
            \n\
            namespace Gen;\n\
            \n\
            interface AppServiceFoo___GeneratedFactoryInterface extends IGeneratedFactory\n\
            {\n\
            \tpublic function create(): \\App\\Service\\Foo;\n\
            }\n";
        assert_eq!(artifact.source(), expected);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let builtin = vec![Parameter::new("a").with_type("int")];
        let first = generate_factory(&foo(), &builtin, "Gen", BTreeSet::new()).source();
        let second = generate_factory(&foo(), &builtin, "Gen", BTreeSet::new()).source();
        assert_eq!(first, second);
    }

    #[test]
    fn test_marker_interface() {
        let marker = generate_marker("Gen");
        assert_eq!(marker.qualified_name(), "Gen\\IGeneratedFactory");
        assert!(marker.class_name.is_none());
        assert!(marker.file.interfaces[0].methods.is_empty());
    }
}
