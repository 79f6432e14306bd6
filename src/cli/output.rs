//! Output formatting for CLI commands

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Value, json};

use crate::models::symbol::{Reference, SymbolRecord};

/// Output context for consistent formatting across commands
///
/// Every command prints exactly one JSON document through this context.
#[derive(Debug, Clone)]
pub struct OutputContext {
    /// Project root for relative path calculation
    root: PathBuf,
}

impl OutputContext {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Convert an absolute path to relative (if within project root)
    pub fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }

    /// JSON view of a symbol; optional fields are left out when empty
    pub fn symbol(&self, record: &SymbolRecord) -> Value {
        let mut value = json!({
            "name": record.name,
            "qualified_name": record.qualified_name(),
            "kind": record.kind,
            "icon": record.kind.icon(),
            "signature": record.signature(),
            "file": self.relative_path(record.file()),
            "line": record.line(),
            "column": record.column(),
        });

        if let Some(obj) = value.as_object_mut() {
            if let Some(parent) = record.parent() {
                obj.insert("parent".to_string(), json!(parent));
            }
            let lists = [
                ("children", &record.children),
                ("parameters", &record.parameters),
                ("decorators", &record.decorators),
                ("base_types", &record.base_types),
            ];
            for (key, list) in lists {
                if !list.is_empty() {
                    obj.insert(key.to_string(), json!(list));
                }
            }
            if let Some(doc) = &record.doc_comment {
                obj.insert("doc_comment".to_string(), json!(doc));
            }
        }

        value
    }

    pub fn reference(&self, reference: &Reference) -> Value {
        json!({
            "file": self.relative_path(&reference.file),
            "line": reference.line,
            "column": reference.column,
            "context": reference.context,
        })
    }

    /// Print a successful response with flat structure (data fields at top level)
    pub fn print_success_flat<T: Serialize>(&self, data: T) {
        let mut response = serde_json::to_value(data).unwrap_or(json!({}));
        if let Some(obj) = response.as_object_mut() {
            obj.insert("success".to_string(), json!(true));
        }
        print_json(&response);
    }

    /// Print an error response
    pub fn print_error(&self, message: &str) {
        let response = json!({
            "success": false,
            "error": message
        });
        print_json(&response);
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}
