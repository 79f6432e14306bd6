//! Symbol model definitions
//!
//! Core types for representing indexed code symbols and textual references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One named code entity and where it is defined.
///
/// The qualified name is derived from `parent` and `name` and is only
/// recomputed through [`SymbolRecord::with_parent`], so the two can never drift.
#[derive(Debug, Clone)]
pub struct SymbolRecord {
    pub name: String,
    pub kind: SymbolKind,
    pub location: Location,
    parent: Option<String>,
    pub children: Vec<String>,
    pub parameters: Vec<String>,
    pub decorators: Vec<String>,
    pub doc_comment: Option<String>,
    pub base_types: Vec<String>,
    qualified_name: String,
}

impl SymbolRecord {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: Location) -> Self {
        let name = name.into();
        Self {
            qualified_name: name.clone(),
            name,
            kind,
            location,
            parent: None,
            children: Vec::new(),
            parameters: Vec::new(),
            decorators: Vec::new(),
            doc_comment: None,
            base_types: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent.filter(|p| !p.is_empty());
        self.qualified_name = Self::compute_qualified_name(self.parent.as_deref(), &self.name);
        self
    }

    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_decorators(mut self, decorators: Vec<String>) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn with_doc_comment(mut self, doc: Option<String>) -> Self {
        self.doc_comment = doc;
        self
    }

    pub fn with_base_types(mut self, base_types: Vec<String>) -> Self {
        self.base_types = base_types;
        self
    }

    fn compute_qualified_name(parent: Option<&str>, name: &str) -> String {
        match parent {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.to_string(),
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn file(&self) -> &Path {
        &self.location.file
    }

    pub fn line(&self) -> u32 {
        self.location.line
    }

    pub fn column(&self) -> u32 {
        self.location.column
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// `name(a, b)` for callables, the bare name for everything else
    pub fn signature(&self) -> String {
        if self.kind.is_callable() {
            format!("{}({})", self.name, self.parameters.join(", "))
        } else {
            self.name.clone()
        }
    }
}

impl PartialEq for SymbolRecord {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
            && self.location.file == other.location.file
            && self.location.line == other.location.line
    }
}

impl Eq for SymbolRecord {}

impl Hash for SymbolRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified_name.hash(state);
        self.location.file.hash(state);
        self.location.line.hash(state);
    }
}

impl fmt::Display for SymbolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self
            .location
            .file
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        write!(
            f,
            "{} ({}) at {}:{}",
            self.qualified_name, self.kind, file, self.location.line
        )
    }
}

/// Symbol classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Function,
    Method,
    Variable,
    Constant,
    Interface,
    Struct,
    Enum,
    Trait,
    #[default]
    Unknown,
}

impl SymbolKind {
    /// Check if this is a type definition
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Struct | Self::Enum | Self::Trait
        )
    }

    /// Check if this is callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function | Self::Method)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Class => "📦",
            Self::Function => "🔧",
            Self::Method => "⚙️",
            Self::Variable => "📊",
            Self::Constant => "🔒",
            Self::Interface => "📋",
            Self::Struct => "🏗️",
            Self::Enum => "🔢",
            Self::Trait => "🎯",
            Self::Unknown => "📄",
        }
    }

    /// Parse symbol kind from string with fallback to Unknown
    pub fn from_str_loose(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Trait => "trait",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SymbolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "function" | "fn" => Ok(Self::Function),
            "method" => Ok(Self::Method),
            "variable" | "var" => Ok(Self::Variable),
            "constant" | "const" => Ok(Self::Constant),
            "interface" => Ok(Self::Interface),
            "struct" => Ok(Self::Struct),
            "enum" => Ok(Self::Enum),
            "trait" => Ok(Self::Trait),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown symbol kind: {}", s)),
        }
    }
}

/// How a file is turned into symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Full syntax-tree extraction with parameters, decorators and docstrings
    Structured,
    /// Name/kind/line outline only
    Outline,
}

impl ParseStrategy {
    /// Extensions missing from the table fall back to the outline strategy
    pub fn for_path(path: &Path) -> Self {
        match Language::from_path(path) {
            Language::Python => Self::Structured,
            _ => Self::Outline,
        }
    }
}

/// Languages with a parsing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Rust,
    Go,
    JavaScript,
    TypeScript,
    Java,
    Kotlin,
    Cpp,
    CSharp,
    Ruby,
    PHP,
    Lua,
    Bash,

    #[default]
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Self::Python,
            "rs" => Self::Rust,
            "go" => Self::Go,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            "java" => Self::Java,
            "kt" | "kts" => Self::Kotlin,
            "c" | "cpp" | "cc" | "cxx" | "h" | "hpp" | "hxx" => Self::Cpp,
            "cs" => Self::CSharp,
            "rb" | "rake" => Self::Ruby,
            "php" => Self::PHP,
            "lua" => Self::Lua,
            "sh" | "bash" => Self::Bash,
            _ => Self::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Get file extensions for this language
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py", "pyi"],
            Self::Rust => &["rs"],
            Self::Go => &["go"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::TypeScript => &["ts", "tsx", "mts", "cts"],
            Self::Java => &["java"],
            Self::Kotlin => &["kt", "kts"],
            Self::Cpp => &["c", "cpp", "cc", "cxx", "h", "hpp", "hxx"],
            Self::CSharp => &["cs"],
            Self::Ruby => &["rb", "rake"],
            Self::PHP => &["php"],
            Self::Lua => &["lua"],
            Self::Bash => &["sh", "bash"],
            Self::Unknown => &[],
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Ruby => "ruby",
            Self::PHP => "php",
            Self::Lua => "lua",
            Self::Bash => "bash",
            Self::Unknown => "plaintext",
        }
    }

    /// Get all supported languages (excluding Unknown)
    pub fn all() -> &'static [Self] {
        &[
            Self::Python,
            Self::Rust,
            Self::Go,
            Self::JavaScript,
            Self::TypeScript,
            Self::Java,
            Self::Kotlin,
            Self::Cpp,
            Self::CSharp,
            Self::Ruby,
            Self::PHP,
            Self::Lua,
            Self::Bash,
        ]
    }

    /// Get all supported file extensions
    pub fn all_extensions() -> Vec<&'static str> {
        Self::all()
            .iter()
            .flat_map(|l| l.extensions().iter().copied())
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "rust" | "rs" => Ok(Self::Rust),
            "go" | "golang" => Ok(Self::Go),
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "java" => Ok(Self::Java),
            "kotlin" | "kt" => Ok(Self::Kotlin),
            "cpp" | "c++" | "c" => Ok(Self::Cpp),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            "ruby" | "rb" => Ok(Self::Ruby),
            "php" => Ok(Self::PHP),
            "lua" => Ok(Self::Lua),
            "bash" | "sh" | "shell" => Ok(Self::Bash),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Source code location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    /// File path
    pub file: PathBuf,

    /// Line (1-indexed)
    pub line: u32,

    /// Column (0-indexed)
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A whole-word textual occurrence of a symbol name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub file: PathBuf,
    /// 1-indexed
    pub line: u32,
    /// 0-indexed, in characters
    pub column: u32,
    /// Trimmed source line
    pub context: String,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}
