//! AST parsing infrastructure for Codenav
//!
//! Tree-sitter based symbol extraction. Python gets the structured strategy
//! in [`python`]; every other bundled grammar goes through [`outline`].

pub mod node_types;
pub mod outline;
pub mod python;

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::error::IndexError;
use crate::models::symbol::Language;

pub use node_types::{OutlineRule, Role, grammar, outline_languages, outline_rules};

/// Parse `content` with the grammar for `language`
pub fn parse(language: Language, content: &str) -> Result<Tree, IndexError> {
    let ts_language = grammar(language).ok_or(IndexError::UnsupportedLanguage(language))?;

    let mut parser = Parser::new();
    parser
        .set_language(&ts_language)
        .map_err(|e| IndexError::Parser {
            language,
            message: e.to_string(),
        })?;

    parser
        .parse(content, None)
        .ok_or_else(|| IndexError::Parser {
            language,
            message: "parser returned no tree".to_string(),
        })
}

/// Source text of a node
pub(crate) fn node_text(node: Node<'_>, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

/// 1-based line of the first error or missing node
pub(crate) fn first_error_line(root: Node<'_>) -> Option<u32> {
    if !root.has_error() {
        return None;
    }

    let mut cursor = root.walk();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row as u32 + 1);
        }
        if node.has_error() {
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    Some(root.start_position().row as u32 + 1)
}

/// Reject trees with syntax errors
pub(crate) fn check_syntax(tree: &Tree, path: &Path) -> Result<(), IndexError> {
    match first_error_line(tree.root_node()) {
        Some(line) => Err(IndexError::Syntax {
            path: path.to_path_buf(),
            line,
        }),
        None => Ok(()),
    }
}
