//! Tree-sitter parser integration for PHP
//!
//! Provides parsing using the tree-sitter PHP grammar (files starting with `<?php`).

use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Language as TsLanguage, Node, Parser, Tree};

/// Parsed PHP source file
pub struct PhpAst {
    pub tree: Tree,
    pub path: PathBuf,
    pub source: String,
}

fn get_language() -> TsLanguage {
    tree_sitter_php::LANGUAGE_PHP.into()
}

/// Parse PHP source code into a tree-sitter AST
pub fn parse_source(content: &str, path: &Path) -> Result<PhpAst> {
    let mut parser = Parser::new();

    parser
        .set_language(&get_language())
        .map_err(|e| Error::parse(path, format!("Failed to set tree-sitter language: {e}")))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::parse(path, "Failed to parse source code"))?;

    Ok(PhpAst {
        tree,
        path: path.to_path_buf(),
        source: content.to_string(),
    })
}

/// Check if a parse tree has errors
pub fn has_parse_errors(tree: &Tree) -> bool {
    tree.root_node().has_error()
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}
