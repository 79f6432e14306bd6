//! Outline extraction for non-Python languages
//!
//! Produces name, kind, line, parent and children only. Column is always 0.

use std::path::Path;

use tree_sitter::Node;

use super::node_types::{Role, find_rule};
use super::{node_text, parse};
use crate::error::IndexError;
use crate::models::symbol::{Language, Location, SymbolKind, SymbolRecord};

/// One outline entry before it becomes a [`SymbolRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub name: String,
    pub kind: SymbolKind,
    pub line: u32,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

/// Enclosing scope while walking
#[derive(Clone)]
struct Scope {
    name: String,
    /// Index of the emitted container, `None` for extensions and receivers
    item: Option<usize>,
}

/// Extract the outline of a file and convert it to records, sorted by line
pub fn extract(
    path: &Path,
    content: &str,
    language: Language,
) -> Result<Vec<SymbolRecord>, IndexError> {
    let items = outline(content, language)?;
    let mut records: Vec<SymbolRecord> = items
        .into_iter()
        .map(|item| {
            SymbolRecord::new(item.name, item.kind, Location::new(path, item.line, 0))
                .with_parent(item.parent)
                .with_children(item.children)
        })
        .collect();

    records.sort_by_key(|r| r.line());
    Ok(records)
}

/// Generic outline: containers with their members, plus top-level functions
pub fn outline(content: &str, language: Language) -> Result<Vec<OutlineItem>, IndexError> {
    let tree = parse(language, content)?;
    let source = content.as_bytes();

    let mut items = Vec::new();
    let mut detached = Vec::new();
    visit(
        tree.root_node(),
        None,
        language,
        source,
        &mut items,
        &mut detached,
    );
    attach_detached(&mut items, detached);

    Ok(items)
}

fn visit(
    node: Node<'_>,
    scope: Option<&Scope>,
    language: Language,
    source: &[u8],
    items: &mut Vec<OutlineItem>,
    detached: &mut Vec<usize>,
) {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();

    for child in children {
        let Some(rule) = find_rule(language, child.kind()) else {
            visit(child, scope, language, source, items, detached);
            continue;
        };

        match rule.role {
            Role::Container => {
                let Some(kind) = refine_kind(child, rule.kind, language) else {
                    continue;
                };
                let Some(name) = symbol_name(child, language, source) else {
                    visit(child, scope, language, source, items, detached);
                    continue;
                };

                let index = push(items, scope, name.clone(), kind, child);
                let inner = Scope {
                    name,
                    item: Some(index),
                };
                visit(child, Some(&inner), language, source, items, detached);
            }
            Role::Extension => {
                let Some(name) = extension_target(child, source) else {
                    continue;
                };
                let inner = Scope { name, item: None };
                visit(child, Some(&inner), language, source, items, detached);
            }
            Role::Callable => {
                let Some(name) = symbol_name(child, language, source) else {
                    continue;
                };
                let kind = if scope.is_some() {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                };
                let index = push(items, scope, name, kind, child);
                if scope.is_some_and(|s| s.item.is_none()) {
                    detached.push(index);
                }
            }
            Role::ReceiverMethod => {
                let Some(name) = symbol_name(child, language, source) else {
                    continue;
                };
                let receiver = go_receiver_type(child, source).map(|name| Scope { name, item: None });
                let kind = if receiver.is_some() {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                };
                let index = push(items, receiver.as_ref(), name, kind, child);
                if receiver.is_some() {
                    detached.push(index);
                }
            }
        }
    }
}

fn push(
    items: &mut Vec<OutlineItem>,
    scope: Option<&Scope>,
    name: String,
    kind: SymbolKind,
    node: Node<'_>,
) -> usize {
    if let Some(container) = scope.and_then(|s| s.item) {
        items[container].children.push(name.clone());
    }

    items.push(OutlineItem {
        name,
        kind,
        line: node.start_position().row as u32 + 1,
        parent: scope.map(|s| s.name.clone()),
        children: Vec::new(),
    });
    items.len() - 1
}

/// Members defined away from their type (Rust `impl`, Go receivers) join the
/// first type of that name in the same file
fn attach_detached(items: &mut [OutlineItem], detached: Vec<usize>) {
    for index in detached {
        let Some(parent) = items[index].parent.clone() else {
            continue;
        };
        let name = items[index].name.clone();
        if let Some(owner) = items
            .iter_mut()
            .find(|i| i.kind.is_type() && i.name == parent)
        {
            owner.children.push(name);
        }
    }
}

/// Go declares structs and interfaces through the same `type_spec`
fn refine_kind(node: Node<'_>, kind: SymbolKind, language: Language) -> Option<SymbolKind> {
    if language != Language::Go || node.kind() != "type_spec" {
        return Some(kind);
    }
    match node.child_by_field_name("type")?.kind() {
        "struct_type" => Some(SymbolKind::Struct),
        "interface_type" => Some(SymbolKind::Interface),
        _ => None,
    }
}

fn symbol_name(node: Node<'_>, language: Language, source: &[u8]) -> Option<String> {
    if language == Language::Cpp && node.kind() == "function_definition" {
        return cpp_declarator_name(node, source);
    }

    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(name, source)).filter(|n| !n.is_empty());
    }

    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| {
        let kind = c.kind();
        kind.ends_with("identifier") || kind == "constant" || kind == "word"
    });
    found
        .map(|n| node_text(n, source))
        .filter(|n| !n.is_empty())
}

/// Follow `declarator` fields down to the function name
fn cpp_declarator_name(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "qualified_identifier" => {
                let name = current.child_by_field_name("name")?;
                return Some(node_text(name, source));
            }
            kind if kind.ends_with("identifier")
                || kind == "destructor_name"
                || kind == "operator_name" =>
            {
                return Some(node_text(current, source));
            }
            _ => current = current.child_by_field_name("declarator")?,
        }
    }
}

/// Type an `impl` block belongs to, without generic arguments
fn extension_target(node: Node<'_>, source: &[u8]) -> Option<String> {
    let ty = node.child_by_field_name("type")?;
    let ty = match ty.kind() {
        "generic_type" => ty.child_by_field_name("type")?,
        _ => ty,
    };
    Some(node_text(ty, source)).filter(|n| !n.is_empty())
}

/// `func (s *Server) Run()` -> `Server`
fn go_receiver_type(node: Node<'_>, source: &[u8]) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    let param = receiver
        .named_children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;

    let mut ty = param.child_by_field_name("type")?;
    loop {
        match ty.kind() {
            "pointer_type" => ty = ty.named_child(0)?,
            "generic_type" => ty = ty.child_by_field_name("type")?,
            _ => return Some(node_text(ty, source)),
        }
    }
}
