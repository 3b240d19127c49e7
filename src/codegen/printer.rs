//! Deterministic PHP rendering of the code model.

use super::model::{DocBlock, InterfaceDecl, MethodDecl, ParamDecl, PhpFile};
use std::fmt::{self, Display, Formatter, Write};

const INDENT: &str = "\t";

impl Display for PhpFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("<?php\n")?;
        if self.strict_types {
            f.write_str("declare(strict_types=1);\n")?;
        }
        if !self.namespace.is_empty() {
            write!(f, "\nnamespace {};\n", self.namespace)?;
        }
        for interface in &self.interfaces {
            f.write_char('\n')?;
            write_interface(f, self, interface)?;
        }
        Ok(())
    }
}

fn write_interface(f: &mut Formatter<'_>, file: &PhpFile, interface: &InterfaceDecl) -> fmt::Result {
    write!(f, "interface {}", interface.name)?;
    if !interface.extends.is_empty() {
        let extends: Vec<String> = interface
            .extends
            .iter()
            .map(|fqn| file.relative_name(fqn))
            .collect();
        write!(f, " extends {}", extends.join(", "))?;
    }
    f.write_str("\n{\n")?;
    for (i, method) in interface.methods.iter().enumerate() {
        if i > 0 {
            f.write_char('\n')?;
        }
        write_method(f, file, method)?;
    }
    f.write_str("}\n")
}

fn write_method(f: &mut Formatter<'_>, file: &PhpFile, method: &MethodDecl) -> fmt::Result {
    write_doc(f, &method.doc)?;
    let parameters: Vec<String> = method.parameters.iter().map(ToString::to_string).collect();
    write!(
        f,
        "{INDENT}public function {}({})",
        method.name,
        parameters.join(", ")
    )?;
    if let Some(return_type) = &method.return_type {
        write!(f, ": {}", file.relative_name(return_type))?;
    }
    f.write_str(";\n")
}

fn write_doc(f: &mut Formatter<'_>, doc: &DocBlock) -> fmt::Result {
    if doc.is_empty() {
        return Ok(());
    }
    writeln!(f, "{INDENT}/**")?;
    for line in &doc.lines {
        writeln!(f, "{INDENT} * {line}")?;
    }
    writeln!(f, "{INDENT} */")
}

impl Display for ParamDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(type_hint) = &self.type_hint {
            write!(f, "{type_hint} ")?;
        }
        if self.by_reference {
            f.write_char('&')?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        write!(f, "${}", self.name)?;
        if let Some(default) = &self.default_value {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}
