//! Constructor parameter classification.
//!
//! A parameter is *builtin* when it is untyped or typed only with scalar,
//! array or callable-like types; the factory's caller supplies those. Every
//! other parameter is *delegated* to the container and disappears from the
//! generated signature.

use crate::index::{ClassIndex, ClassInfo, Parameter};

const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "array", "callable", "iterable", "object", "mixed", "void",
    "null", "false", "true", "never", "resource",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterRole {
    Builtin,
    Delegated,
}

/// Split of one constructor's parameters, each side in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedParameters {
    pub builtin: Vec<Parameter>,
    pub delegated: Vec<Parameter>,
}

pub fn is_builtin_type_name(name: &str) -> bool {
    let name = name.trim();
    BUILTIN_TYPES.iter().any(|b| b.eq_ignore_ascii_case(name))
}

/// True when every member of a (possibly nullable, union, intersection or
/// DNF) type expression is a builtin type.
pub fn is_builtin_type(type_hint: &str) -> bool {
    let atoms: Vec<&str> = type_hint
        .split(|c: char| matches!(c, '|' | '&' | '(' | ')' | '?'))
        .map(str::trim)
        .filter(|atom| !atom.is_empty())
        .collect();

    !atoms.is_empty() && atoms.iter().all(|atom| is_builtin_type_name(atom))
}

pub fn classify_parameter(parameter: &Parameter) -> ParameterRole {
    match parameter.type_hint.as_deref() {
        None => ParameterRole::Builtin,
        Some(hint) if is_builtin_type(hint) => ParameterRole::Builtin,
        Some(_) => ParameterRole::Delegated,
    }
}

pub fn classify_parameters(parameters: &[Parameter]) -> ClassifiedParameters {
    parameters
        .iter()
        .fold(ClassifiedParameters::default(), |mut acc, parameter| {
            match classify_parameter(parameter) {
                ParameterRole::Builtin => acc.builtin.push(parameter.clone()),
                ParameterRole::Delegated => acc.delegated.push(parameter.clone()),
            }
            acc
        })
}

/// Classify the effective constructor of `class`; a class without one has
/// no parameters at all.
pub fn classify_class(index: &ClassIndex, class: &ClassInfo) -> ClassifiedParameters {
    index
        .constructor_of(class)
        .map(|ctor| classify_parameters(&ctor.parameters))
        .unwrap_or_default()
}
