//! Static reflection of PHP class-like declarations.
//!
//! Walks the tree-sitter AST of one file and extracts the metadata the
//! generator needs: the declared name, kind, heritage and constructor.

use super::names::{trim_separators, NameScope, NAMESPACE_SEPARATOR};
use super::parser::{has_parse_errors, node_line, node_text, PhpAst};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// A constructor parameter as declared in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Declared type text, `None` when untyped
    pub type_hint: Option<String>,
    /// Default value expression, with class and constant names fully qualified
    pub default_value: Option<String>,
    pub by_reference: bool,
    pub variadic: bool,
    /// Callers may omit it: every later parameter has a default too
    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            default_value: None,
            by_reference: false,
            variadic: false,
            optional: false,
        }
    }

    pub fn with_type(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self.optional = true;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// True when the default value is the `null` literal.
    pub fn defaults_to_null(&self) -> bool {
        self.default_value
            .as_deref()
            .map(|value| value.trim().eq_ignore_ascii_case("null"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    pub visibility: Visibility,
    pub parameters: Vec<Parameter>,
}

impl Constructor {
    /// A parameter with a default is only optional when no required
    /// parameter follows it; a variadic one always is.
    pub fn new(visibility: Visibility, mut parameters: Vec<Parameter>) -> Self {
        let mut trailing = true;
        for parameter in parameters.iter_mut().rev() {
            trailing &= parameter.default_value.is_some() || parameter.variadic;
            parameter.optional = trailing;
        }
        Self {
            visibility,
            parameters,
        }
    }
}

/// Reflection metadata for one class-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Fully-qualified name without a leading separator
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub parent: Option<String>,
    /// Implemented interfaces, or extended interfaces for an interface
    pub interfaces: Vec<String>,
    pub constructor: Option<Constructor>,
    pub file: PathBuf,
    pub line: usize,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: trim_separators(&name.into()).to_string(),
            kind,
            is_abstract: false,
            parent: None,
            interfaces: Vec::new(),
            constructor: None,
            file: PathBuf::new(),
            line: 0,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(trim_separators(&parent.into()).to_string());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces
            .push(trim_separators(&interface.into()).to_string());
        self
    }

    pub fn with_constructor(mut self, visibility: Visibility, parameters: Vec<Parameter>) -> Self {
        self.constructor = Some(Constructor::new(visibility, parameters));
        self
    }

    pub fn in_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = file.as_ref().to_path_buf();
        self
    }
}

/// Extract every top-level class-like declaration from a parsed file.
pub fn reflect_file(ast: &PhpAst) -> Vec<ClassInfo> {
    if has_parse_errors(&ast.tree) {
        tracing::warn!(
            file = %ast.path.display(),
            "Source contains syntax errors, reflecting recoverable declarations only"
        );
    }

    let mut classes = Vec::new();
    let mut scope = NameScope::default();
    collect_declarations(ast.tree.root_node(), ast, &mut scope, &mut classes);
    classes
}

fn collect_declarations(node: Node, ast: &PhpAst, scope: &mut NameScope, out: &mut Vec<ClassInfo>) {
    let src = ast.source.as_str();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "namespace_definition" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, src))
                    .unwrap_or_default();
                match child.child_by_field_name("body") {
                    Some(body) => {
                        let mut inner = NameScope::new(name);
                        collect_declarations(body, ast, &mut inner, out);
                    }
                    None => *scope = NameScope::new(name),
                }
            }
            "namespace_use_declaration" => add_imports(child, src, scope),
            "class_declaration" | "interface_declaration" | "trait_declaration"
            | "enum_declaration" => {
                if let Some(class) = reflect_class(child, ast, scope) {
                    out.push(class);
                }
            }
            _ => {}
        }
    }
}

fn add_imports(declaration: Node, src: &str, scope: &mut NameScope) {
    // `use function` / `use const` import no classes
    if declaration.child_by_field_name("type").is_some() || has_token(declaration, "function")
        || has_token(declaration, "const")
    {
        return;
    }

    let mut group_prefix: Option<&str> = None;
    let mut cursor = declaration.walk();
    for child in declaration.named_children(&mut cursor) {
        match child.kind() {
            "namespace_name" | "qualified_name" => group_prefix = Some(node_text(&child, src)),
            "namespace_use_clause" => add_import_clause(child, src, None, scope),
            "namespace_use_group" => {
                let mut group_cursor = child.walk();
                for clause in child.named_children(&mut group_cursor) {
                    if clause.kind().starts_with("namespace_use") {
                        add_import_clause(clause, src, group_prefix, scope);
                    }
                }
            }
            _ => {}
        }
    }
}

fn add_import_clause(clause: Node, src: &str, prefix: Option<&str>, scope: &mut NameScope) {
    if has_token(clause, "function") || has_token(clause, "const") {
        return;
    }

    let mut names = Vec::new();
    let mut aliasing = None;
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "name" | "qualified_name" | "namespace_name" => names.push(node_text(&child, src)),
            "namespace_aliasing_clause" => {
                aliasing = child
                    .named_child(0)
                    .map(|alias| node_text(&alias, src));
            }
            _ => {}
        }
    }

    let Some(target) = names.first() else {
        return;
    };
    let alias = clause
        .child_by_field_name("alias")
        .map(|alias| node_text(&alias, src))
        .or(aliasing)
        .or_else(|| (names.len() > 1).then(|| names[names.len() - 1]));

    let target = match prefix {
        Some(prefix) => format!("{}\\{}", trim_separators(prefix), trim_separators(target)),
        None => target.to_string(),
    };
    scope.add_import(&target, alias);
}

fn reflect_class(node: Node, ast: &PhpAst, scope: &NameScope) -> Option<ClassInfo> {
    let src = ast.source.as_str();
    let kind = match node.kind() {
        "class_declaration" => ClassKind::Class,
        "interface_declaration" => ClassKind::Interface,
        "trait_declaration" => ClassKind::Trait,
        _ => ClassKind::Enum,
    };
    let name = node_text(&node.child_by_field_name("name")?, src);

    let mut class = ClassInfo::new(scope.qualify(name), kind).in_file(&ast.path);
    class.line = node_line(&node);

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "abstract_modifier" => class.is_abstract = true,
            "base_clause" => {
                let names = heritage_names(child, src, scope);
                if kind == ClassKind::Interface {
                    class.interfaces.extend(names);
                } else {
                    class.parent = names.into_iter().next();
                }
            }
            "class_interface_clause" => class.interfaces.extend(heritage_names(child, src, scope)),
            "declaration_list" | "enum_declaration_list" => {
                let declaring = DeclaringClass {
                    scope,
                    name: &class.name,
                    parent: class.parent.as_deref(),
                };
                let constructor = find_constructor(child, src, &declaring);
                class.constructor = constructor;
            }
            _ => {}
        }
    }

    Some(class)
}

fn heritage_names(clause: Node, src: &str, scope: &NameScope) -> Vec<String> {
    let mut cursor = clause.walk();
    clause
        .named_children(&mut cursor)
        .filter(|child| matches!(child.kind(), "name" | "qualified_name"))
        .map(|child| scope.resolve(node_text(&child, src)))
        .collect()
}

/// Names needed to qualify expressions written inside a class body.
struct DeclaringClass<'a> {
    scope: &'a NameScope,
    name: &'a str,
    parent: Option<&'a str>,
}

fn find_constructor(body: Node, src: &str, declaring: &DeclaringClass) -> Option<Constructor> {
    let mut cursor = body.walk();
    let method = body.named_children(&mut cursor).find(|member| {
        member.kind() == "method_declaration"
            && member
                .child_by_field_name("name")
                .map(|name| node_text(&name, src).eq_ignore_ascii_case("__construct"))
                .unwrap_or(false)
    })?;

    let mut visibility = Visibility::Public;
    let mut parameters = Vec::new();
    let mut method_cursor = method.walk();
    for child in method.named_children(&mut method_cursor) {
        match child.kind() {
            "visibility_modifier" => {
                visibility = match node_text(&child, src).to_ascii_lowercase().as_str() {
                    "private" => Visibility::Private,
                    "protected" => Visibility::Protected,
                    _ => Visibility::Public,
                }
            }
            "formal_parameters" => {
                let mut param_cursor = child.walk();
                parameters = child
                    .named_children(&mut param_cursor)
                    .filter_map(|param| reflect_parameter(param, src, declaring))
                    .collect();
            }
            _ => {}
        }
    }

    Some(Constructor::new(visibility, parameters))
}

fn reflect_parameter(node: Node, src: &str, declaring: &DeclaringClass) -> Option<Parameter> {
    if !matches!(
        node.kind(),
        "simple_parameter" | "variadic_parameter" | "property_promotion_parameter"
    ) {
        return None;
    }

    let name_node = node.child_by_field_name("name")?;
    let name = node_text(&name_node, src)
        .trim_start_matches(|c: char| c == '&' || c == '$' || c.is_whitespace())
        .to_string();

    let mut cursor = node.walk();
    let by_reference = name_node.kind() == "by_ref"
        || node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "reference_modifier");

    Some(Parameter {
        name,
        type_hint: node
            .child_by_field_name("type")
            .map(|t| node_text(&t, src).to_string()),
        default_value: node
            .child_by_field_name("default_value")
            .map(|d| qualified_expression(d, src, declaring)),
        by_reference,
        variadic: node.kind() == "variadic_parameter",
        optional: false,
    })
}

/// Source text of a constant expression with every class reference and
/// qualified constant rewritten to a fully-qualified name, so it means the
/// same thing in another namespace. Unqualified constants are left alone and
/// fall back to the global namespace.
fn qualified_expression(node: Node, src: &str, declaring: &DeclaringClass) -> String {
    let mut edits = Vec::new();
    collect_name_edits(node, src, declaring, &mut edits);

    let text = node_text(&node, src);
    let base = node.start_byte();
    let mut qualified = String::with_capacity(text.len());
    let mut last = 0;
    for (range, replacement) in edits {
        qualified.push_str(&text[last..range.start - base]);
        qualified.push_str(&replacement);
        last = range.end - base;
    }
    qualified.push_str(&text[last..]);
    qualified
}

fn collect_name_edits(
    node: Node,
    src: &str,
    declaring: &DeclaringClass,
    edits: &mut Vec<(Range<usize>, String)>,
) {
    let mut cursor = node.walk();
    match node.kind() {
        "class_constant_access_expression" | "object_creation_expression" => {
            let is_new = node.kind() == "object_creation_expression";
            for (i, child) in node.named_children(&mut cursor).enumerate() {
                if i == 0 {
                    match class_reference(child, src, declaring) {
                        Some(name) => edits.push((child.byte_range(), name)),
                        None => collect_name_edits(child, src, declaring, edits),
                    }
                } else if is_new {
                    collect_name_edits(child, src, declaring, edits);
                }
            }
        }
        "qualified_name" => {
            let name = declaring.scope.resolve(node_text(&node, src));
            edits.push((node.byte_range(), format!("{NAMESPACE_SEPARATOR}{name}")));
        }
        _ => {
            for child in node.named_children(&mut cursor) {
                collect_name_edits(child, src, declaring, edits);
            }
        }
    }
}

/// Fully-qualified form of the class named by `node`, if it names one.
fn class_reference(node: Node, src: &str, declaring: &DeclaringClass) -> Option<String> {
    if !matches!(node.kind(), "name" | "qualified_name" | "relative_scope") {
        return None;
    }
    let text = node_text(&node, src).trim();
    let name = match text.to_ascii_lowercase().as_str() {
        "self" | "static" => declaring.name.to_string(),
        "parent" => declaring.parent?.to_string(),
        _ => declaring.scope.resolve(text),
    };
    Some(format!("{NAMESPACE_SEPARATOR}{name}"))
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind().eq_ignore_ascii_case(token));
    found
}
