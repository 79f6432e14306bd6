//! Structured Python extraction
//!
//! Classes anywhere in the module, their directly defined methods, and every
//! function that is not nested inside a class. Methods and functions carry
//! parameters, decorators and docstrings; classes also carry base types.

use std::path::Path;

use tree_sitter::Node;

use super::{check_syntax, node_text, parse};
use crate::error::IndexError;
use crate::models::symbol::{Language, Location, SymbolKind, SymbolRecord};

/// Extract symbols from Python source, sorted by line
pub fn extract(path: &Path, content: &str) -> Result<Vec<SymbolRecord>, IndexError> {
    let tree = parse(Language::Python, content)?;
    check_syntax(&tree, path)?;

    let source = content.as_bytes();
    let mut symbols = Vec::new();
    let mut stack = vec![tree.root_node()];
    let mut cursor = tree.walk();

    while let Some(node) = stack.pop() {
        match node.kind() {
            "class_definition" => {
                symbols.extend(class_symbols(node, path, source));
            }
            "function_definition" if !has_class_ancestor(node) => {
                symbols.push(function_symbol(node, path, source, None));
            }
            _ => {}
        }
        stack.extend(node.named_children(&mut cursor));
    }

    // the stack visits siblings in reverse; stable sort restores source order
    symbols.sort_by_key(|s| (s.line(), s.column()));
    Ok(symbols)
}

fn location(node: Node<'_>, path: &Path) -> Location {
    let pos = node.start_position();
    Location::new(path, pos.row as u32 + 1, pos.column as u32)
}

fn name_of(node: Node<'_>, source: &[u8]) -> String {
    node.child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or_default()
}

fn has_class_ancestor(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "class_definition" {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn class_symbols(node: Node<'_>, path: &Path, source: &[u8]) -> Vec<SymbolRecord> {
    let name = name_of(node, source);
    let methods: Vec<Node<'_>> = node
        .child_by_field_name("body")
        .map(direct_methods)
        .unwrap_or_default();

    let method_records: Vec<SymbolRecord> = methods
        .iter()
        .map(|m| function_symbol(*m, path, source, Some(&name)))
        .collect();

    let class = SymbolRecord::new(name, SymbolKind::Class, location(node, path))
        .with_children(method_records.iter().map(|m| m.name.clone()).collect())
        .with_decorators(decorators(node, source))
        .with_doc_comment(node.child_by_field_name("body").and_then(|b| docstring(b, source)))
        .with_base_types(base_types(node, source));

    std::iter::once(class).chain(method_records).collect()
}

/// `def` statements directly in a class body, decorated or not
fn direct_methods(body: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter_map(|child| match child.kind() {
            "function_definition" => Some(child),
            "decorated_definition" => child
                .child_by_field_name("definition")
                .filter(|d| d.kind() == "function_definition"),
            _ => None,
        })
        .collect()
}

fn function_symbol(
    node: Node<'_>,
    path: &Path,
    source: &[u8],
    class: Option<&str>,
) -> SymbolRecord {
    let kind = if class.is_some() {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    };

    SymbolRecord::new(name_of(node, source), kind, location(node, path))
        .with_parent(class.map(str::to_string))
        .with_parameters(
            node.child_by_field_name("parameters")
                .map(|p| parameters(p, source))
                .unwrap_or_default(),
        )
        .with_decorators(decorators(node, source))
        .with_doc_comment(node.child_by_field_name("body").and_then(|b| docstring(b, source)))
}

/// Positional parameters, then `*args`, then `**kwargs`; keyword-only
/// parameters are left out
fn parameters(node: Node<'_>, source: &[u8]) -> Vec<String> {
    let mut positional = Vec::new();
    let mut var_positional = None;
    let mut var_keyword = None;
    let mut keyword_only = false;

    let mut cursor = node.walk();
    for param in node.named_children(&mut cursor) {
        // typed `*args: T` / `**kw: T` wrap the splat pattern
        let inner = if param.kind() == "typed_parameter" {
            param.named_child(0).unwrap_or(param)
        } else {
            param
        };

        match inner.kind() {
            "identifier" if !keyword_only => positional.push(node_text(inner, source)),
            "default_parameter" | "typed_default_parameter" if !keyword_only => {
                positional.push(name_of(inner, source));
            }
            "list_splat_pattern" => {
                keyword_only = true;
                if let Some(id) = inner.named_child(0) {
                    var_positional = Some(format!("*{}", node_text(id, source)));
                }
            }
            "dictionary_splat_pattern" => {
                if let Some(id) = inner.named_child(0) {
                    var_keyword = Some(format!("**{}", node_text(id, source)));
                }
            }
            "keyword_separator" => keyword_only = true,
            _ => {}
        }
    }

    positional.extend(var_positional);
    positional.extend(var_keyword);
    positional
}

/// Decorator names from a wrapping `decorated_definition`; call arguments are dropped
fn decorators(node: Node<'_>, source: &[u8]) -> Vec<String> {
    let Some(parent) = node.parent().filter(|p| p.kind() == "decorated_definition") else {
        return Vec::new();
    };

    let mut cursor = parent.walk();
    parent
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .filter_map(|d| d.named_child(0))
        .map(|expr| match expr.kind() {
            "call" => expr
                .child_by_field_name("function")
                .map(|f| node_text(f, source))
                .unwrap_or_default(),
            _ => node_text(expr, source),
        })
        .collect()
}

fn base_types(node: Node<'_>, source: &[u8]) -> Vec<String> {
    let Some(args) = node.child_by_field_name("superclasses") else {
        return Vec::new();
    };

    let mut cursor = args.walk();
    args.named_children(&mut cursor)
        .filter(|a| !matches!(a.kind(), "keyword_argument" | "comment"))
        .map(|a| node_text(a, source))
        .collect()
}

/// First statement of a body if it is a string literal
fn docstring(body: Node<'_>, source: &[u8]) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }
    Some(clean_docstring(&node_text(string, source)))
}

fn strip_quotes(literal: &str) -> &str {
    let body = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner;
        }
    }
    body
}

/// Strip quotes, then drop the common indentation of continuation lines
fn clean_docstring(literal: &str) -> String {
    let text = strip_quotes(literal).replace('\t', "        ");
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim().to_string();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = vec![first];
    out.extend(
        rest.iter()
            .map(|l| l.get(indent..).unwrap_or("").trim_end().to_string()),
    );

    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}
