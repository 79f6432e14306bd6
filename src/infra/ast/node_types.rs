//! Tree-sitter outline rules
//!
//! Node types are taken from each grammar's `src/node-types.json`. A rule says
//! what symbol a node becomes and whether its subtree holds members.

use crate::models::symbol::{Language, SymbolKind};

/// How a matched node takes part in the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Emitted; callables inside become its members
    Container,
    /// Not emitted; callables inside attach to the type it names (Rust `impl`)
    Extension,
    /// Function at top level, method inside a container
    Callable,
    /// Method whose owner is named by a receiver parameter (Go)
    ReceiverMethod,
}

#[derive(Debug, Clone, Copy)]
pub struct OutlineRule {
    pub node_type: &'static str,
    pub kind: SymbolKind,
    pub role: Role,
}

impl OutlineRule {
    const fn container(node_type: &'static str, kind: SymbolKind) -> Self {
        Self {
            node_type,
            kind,
            role: Role::Container,
        }
    }

    const fn extension(node_type: &'static str) -> Self {
        Self {
            node_type,
            kind: SymbolKind::Unknown,
            role: Role::Extension,
        }
    }

    const fn callable(node_type: &'static str) -> Self {
        Self {
            node_type,
            kind: SymbolKind::Function,
            role: Role::Callable,
        }
    }

    const fn receiver_method(node_type: &'static str) -> Self {
        Self {
            node_type,
            kind: SymbolKind::Method,
            role: Role::ReceiverMethod,
        }
    }
}

/// Grammar used to parse a language, `None` when no grammar is bundled
pub fn grammar(language: Language) -> Option<tree_sitter::Language> {
    match language {
        Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
        // TSX is a superset of TypeScript
        Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
        Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
        Language::Go => Some(tree_sitter_go::LANGUAGE.into()),
        Language::Java => Some(tree_sitter_java::LANGUAGE.into()),
        Language::Kotlin => Some(tree_sitter_kotlin_sg::LANGUAGE.into()),
        Language::Cpp => Some(tree_sitter_cpp::LANGUAGE.into()),
        Language::CSharp => Some(tree_sitter_c_sharp::LANGUAGE.into()),
        Language::Bash => Some(tree_sitter_bash::LANGUAGE.into()),
        Language::Ruby => Some(tree_sitter_ruby::LANGUAGE.into()),
        Language::Lua => Some(tree_sitter_lua::LANGUAGE.into()),
        Language::PHP => Some(tree_sitter_php::LANGUAGE_PHP.into()),
        Language::Unknown => None,
    }
}

/// Outline rules for a language (Python uses the structured strategy instead)
pub fn outline_rules(language: Language) -> &'static [OutlineRule] {
    match language {
        Language::TypeScript => TYPESCRIPT,
        Language::JavaScript => JAVASCRIPT,
        Language::Rust => RUST,
        Language::Go => GO,
        Language::Java => JAVA,
        Language::Kotlin => KOTLIN,
        Language::Cpp => CPP,
        Language::CSharp => CSHARP,
        Language::Bash => BASH,
        Language::Ruby => RUBY,
        Language::Lua => LUA,
        Language::PHP => PHP,
        Language::Python | Language::Unknown => &[],
    }
}

pub fn find_rule(language: Language, node_type: &str) -> Option<&'static OutlineRule> {
    outline_rules(language)
        .iter()
        .find(|r| r.node_type == node_type)
}

/// Languages the outline strategy understands
pub fn outline_languages() -> impl Iterator<Item = Language> {
    Language::all()
        .iter()
        .copied()
        .filter(|l| !outline_rules(*l).is_empty())
}

// tree-sitter-typescript/tsx/src/node-types.json
const TYPESCRIPT: &[OutlineRule] = &[
    OutlineRule::container("class_declaration", SymbolKind::Class),
    OutlineRule::container("abstract_class_declaration", SymbolKind::Class),
    OutlineRule::container("interface_declaration", SymbolKind::Interface),
    OutlineRule::container("enum_declaration", SymbolKind::Enum),
    OutlineRule::callable("function_declaration"),
    OutlineRule::callable("generator_function_declaration"),
    OutlineRule::callable("method_definition"),
];

// tree-sitter-javascript/src/node-types.json
const JAVASCRIPT: &[OutlineRule] = &[
    OutlineRule::container("class_declaration", SymbolKind::Class),
    OutlineRule::callable("function_declaration"),
    OutlineRule::callable("generator_function_declaration"),
    OutlineRule::callable("method_definition"),
];

// tree-sitter-rust/src/node-types.json
const RUST: &[OutlineRule] = &[
    OutlineRule::container("struct_item", SymbolKind::Struct),
    OutlineRule::container("enum_item", SymbolKind::Enum),
    OutlineRule::container("trait_item", SymbolKind::Trait),
    OutlineRule::extension("impl_item"),
    OutlineRule::callable("function_item"),
    OutlineRule::callable("function_signature_item"),
];

// tree-sitter-go/src/node-types.json
// `type_spec` is refined to struct or interface from its `type` field
const GO: &[OutlineRule] = &[
    OutlineRule::container("type_spec", SymbolKind::Struct),
    OutlineRule::callable("function_declaration"),
    OutlineRule::receiver_method("method_declaration"),
];

// tree-sitter-java/src/node-types.json
const JAVA: &[OutlineRule] = &[
    OutlineRule::container("class_declaration", SymbolKind::Class),
    OutlineRule::container("interface_declaration", SymbolKind::Interface),
    OutlineRule::container("enum_declaration", SymbolKind::Enum),
    OutlineRule::container("record_declaration", SymbolKind::Class),
    OutlineRule::callable("method_declaration"),
    OutlineRule::callable("constructor_declaration"),
];

// tree-sitter-kotlin-sg/src/node-types.json
const KOTLIN: &[OutlineRule] = &[
    OutlineRule::container("class_declaration", SymbolKind::Class),
    OutlineRule::container("object_declaration", SymbolKind::Class),
    OutlineRule::callable("function_declaration"),
];

// tree-sitter-cpp/src/node-types.json
const CPP: &[OutlineRule] = &[
    OutlineRule::container("class_specifier", SymbolKind::Class),
    OutlineRule::container("struct_specifier", SymbolKind::Struct),
    OutlineRule::container("enum_specifier", SymbolKind::Enum),
    OutlineRule::callable("function_definition"),
];

// tree-sitter-c-sharp/src/node-types.json
const CSHARP: &[OutlineRule] = &[
    OutlineRule::container("class_declaration", SymbolKind::Class),
    OutlineRule::container("interface_declaration", SymbolKind::Interface),
    OutlineRule::container("struct_declaration", SymbolKind::Struct),
    OutlineRule::container("enum_declaration", SymbolKind::Enum),
    OutlineRule::callable("method_declaration"),
    OutlineRule::callable("constructor_declaration"),
];

// tree-sitter-bash/src/node-types.json
const BASH: &[OutlineRule] = &[OutlineRule::callable("function_definition")];

// tree-sitter-ruby/src/node-types.json
const RUBY: &[OutlineRule] = &[
    OutlineRule::container("class", SymbolKind::Class),
    OutlineRule::container("module", SymbolKind::Class),
    OutlineRule::callable("method"),
    OutlineRule::callable("singleton_method"),
];

// tree-sitter-lua/src/node-types.json
const LUA: &[OutlineRule] = &[OutlineRule::callable("function_declaration")];

// tree-sitter-php/php/src/node-types.json
const PHP: &[OutlineRule] = &[
    OutlineRule::container("class_declaration", SymbolKind::Class),
    OutlineRule::container("interface_declaration", SymbolKind::Interface),
    OutlineRule::container("trait_declaration", SymbolKind::Trait),
    OutlineRule::container("enum_declaration", SymbolKind::Enum),
    OutlineRule::callable("function_definition"),
    OutlineRule::callable("method_declaration"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_outline_language_has_grammar() {
        for language in outline_languages() {
            assert!(grammar(language).is_some(), "{:?}", language);
        }
    }

    #[test]
    fn test_python_is_not_outlined() {
        assert!(outline_rules(Language::Python).is_empty());
        assert!(grammar(Language::Python).is_some());
        assert!(grammar(Language::Unknown).is_none());
    }

    #[test]
    fn test_outline_languages() {
        let languages: Vec<_> = outline_languages().collect();
        assert_eq!(languages.len(), 12);
        assert!(!languages.contains(&Language::Python));
    }

    #[test]
    fn test_find_rule() {
        let rule = find_rule(Language::Rust, "impl_item").unwrap();
        assert_eq!(rule.role, Role::Extension);

        let rule = find_rule(Language::Go, "method_declaration").unwrap();
        assert_eq!(rule.role, Role::ReceiverMethod);

        assert!(find_rule(Language::Rust, "let_declaration").is_none());
    }

    #[test]
    fn test_rule_node_types_exist_in_grammar() {
        for language in outline_languages() {
            let ts_lang = grammar(language).unwrap();
            for rule in outline_rules(language) {
                assert_ne!(
                    ts_lang.id_for_node_kind(rule.node_type, true),
                    0,
                    "{:?}: {}",
                    language,
                    rule.node_type
                );
            }
        }
    }
}
