//! Structured model of a generated PHP source file.
//!
//! Artifacts are assembled from these types and rendered by the printer, so
//! tests can compare structure rather than text.

use crate::index::names::NAMESPACE_SEPARATOR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpFile {
    pub strict_types: bool,
    pub namespace: String,
    pub interfaces: Vec<InterfaceDecl>,
}

impl PhpFile {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            strict_types: true,
            namespace: namespace.into(),
            interfaces: Vec::new(),
        }
    }

    pub fn with_interface(mut self, interface: InterfaceDecl) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Shortest spelling of `fqn` valid inside this file's namespace.
    pub fn relative_name(&self, fqn: &str) -> String {
        if !self.namespace.is_empty() {
            if let Some(rest) = fqn
                .strip_prefix(self.namespace.as_str())
                .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
            {
                if !rest.contains(NAMESPACE_SEPARATOR) {
                    return rest.to_string();
                }
            }
        }
        format!("{NAMESPACE_SEPARATOR}{fqn}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    /// Fully-qualified names of extended interfaces
    pub extends: Vec<String>,
    pub methods: Vec<MethodDecl>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, fqn: impl Into<String>) -> Self {
        self.extends.push(fqn.into());
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub doc: DocBlock,
    pub parameters: Vec<ParamDecl>,
    /// Fully-qualified class name returned
    pub return_type: Option<String>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: DocBlock::default(),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParamDecl>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn returns(mut self, fqn: impl Into<String>) -> Self {
        self.return_type = Some(fqn.into());
        self
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub type_hint: Option<String>,
    pub default_value: Option<String>,
    pub by_reference: bool,
    pub variadic: bool,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            default_value: None,
            by_reference: false,
            variadic: false,
        }
    }

    pub fn with_type(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

/// Documentation comment, one entry per line without the `*` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub lines: Vec<String>,
}

impl DocBlock {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_name_inside_namespace() {
        let file = PhpFile::new("Gen");
        assert_eq!(file.relative_name("Gen\\IGeneratedFactory"), "IGeneratedFactory");
        assert_eq!(file.relative_name("Gen\\Sub\\Thing"), "\\Gen\\Sub\\Thing");
        assert_eq!(file.relative_name("Generic\\Foo"), "\\Generic\\Foo");
        assert_eq!(file.relative_name("App\\Foo"), "\\App\\Foo");
    }

    #[test]
    fn test_relative_name_in_global_namespace() {
        let file = PhpFile::new("");
        assert_eq!(file.relative_name("Foo"), "\\Foo");
    }
}
