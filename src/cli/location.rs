//! `FILE:LINE[:COLUMN]` arguments for cursor-based commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::models::symbol::Location;

/// A position typed on the command line; line and column are both 1-indexed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl ParsedLocation {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("Location cannot be empty");
        }

        let (file_part, rest) = Self::split_path_and_position(input)?;
        let (line, column) = Self::parse_position(rest)?;

        Ok(Self {
            file: PathBuf::from(file_part),
            line,
            column,
        })
    }

    fn split_path_and_position(input: &str) -> Result<(&str, &str)> {
        let is_windows = input.len() > 2
            && input.as_bytes().get(1) == Some(&b':')
            && input.as_bytes()[0].is_ascii_alphabetic();
        let search_start = if is_windows { 2 } else { 0 };

        let split = input[search_start..]
            .char_indices()
            .filter(|&(_, ch)| ch == ':')
            .map(|(i, _)| search_start + i)
            .find(|&pos| {
                input[pos + 1..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit() || c == '-')
            });

        let Some(pos) = split else {
            bail!("Invalid location format. Expected: file:line[:column]\nExample: app/models.py:10:5")
        };
        if input[pos + 1..].starts_with('-') {
            bail!("Invalid line number: negative values not allowed (1-indexed)");
        }

        Ok((&input[..pos], &input[pos + 1..]))
    }

    fn parse_position(rest: &str) -> Result<(u32, u32)> {
        let mut parts = rest.splitn(2, ':');

        let line_str = parts.next().unwrap_or_default();
        let line: u32 = line_str
            .parse()
            .with_context(|| format!("Invalid line number '{line_str}'"))?;

        let column: u32 = match parts.next() {
            Some(col_str) => col_str
                .parse()
                .with_context(|| format!("Invalid column number '{col_str}'"))?,
            None => 1,
        };

        if line == 0 {
            bail!("Line number must be >= 1 (got 0)");
        }
        if column == 0 {
            bail!("Column number must be >= 1 (got 0)");
        }

        Ok((line, column))
    }

    /// Resolve the file against `root` and reject paths that escape it
    pub fn resolve(&self, root: &Path) -> Result<Self> {
        let file = if self.file.is_absolute() {
            self.file.clone()
        } else {
            root.join(&self.file)
        };

        let canonical = file
            .canonicalize()
            .map_err(|_| anyhow::anyhow!("File not found: {}", file.display()))?;
        let canonical_root = root
            .canonicalize()
            .context("Failed to resolve project root")?;

        if !canonical.starts_with(&canonical_root) {
            bail!(
                "Access denied: {} is outside project boundary",
                self.file.display()
            );
        }

        Ok(Self {
            file: canonical,
            ..self.clone()
        })
    }

    /// Check the position against the file text
    pub fn validate_position_with_content(&self, content: &str) -> Result<()> {
        let lines: Vec<&str> = content.split('\n').collect();

        let Some(line_content) = lines.get(self.line as usize - 1) else {
            bail!(
                "Line {} exceeds file length ({} lines)",
                self.line,
                lines.len()
            );
        };

        let chars = line_content.trim_end_matches('\r').chars().count();
        if self.column as usize > chars + 1 {
            bail!(
                "Column {} exceeds line length ({} chars) at line {}",
                self.column,
                chars,
                self.line
            );
        }

        Ok(())
    }

    /// Index-side cursor: the column becomes 0-indexed
    pub fn cursor(&self) -> Location {
        Location::new(self.file.clone(), self.line, self.column - 1)
    }
}

impl std::fmt::Display for ParsedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_location() {
        let loc = ParsedLocation::parse("app/models.py:10:5").unwrap();
        assert_eq!(loc.file, PathBuf::from("app/models.py"));
        assert_eq!(loc.line, 10);
        assert_eq!(loc.column, 5);
    }

    #[test]
    fn test_parse_without_column() {
        let loc = ParsedLocation::parse("app/models.py:10").unwrap();
        assert_eq!(loc.line, 10);
        assert_eq!(loc.column, 1);
    }

    #[test]
    fn test_parse_windows_path() {
        let loc = ParsedLocation::parse("C:\\work\\models.py:3:2").unwrap();
        assert_eq!(loc.file, PathBuf::from("C:\\work\\models.py"));
        assert_eq!(loc.line, 3);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ParsedLocation::parse("").is_err());
        assert!(ParsedLocation::parse("models.py").is_err());
        assert!(ParsedLocation::parse("models.py:0:1").is_err());
        assert!(ParsedLocation::parse("models.py:1:0").is_err());
        assert!(ParsedLocation::parse("models.py:1:x").is_err());

        let err = ParsedLocation::parse("models.py:-5:1").unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_cursor_is_zero_based_column() {
        let loc = ParsedLocation::parse("a.py:4:7").unwrap();
        let cursor = loc.cursor();
        assert_eq!(cursor.line, 4);
        assert_eq!(cursor.column, 6);
    }

    #[test]
    fn test_validate_position_with_content() {
        let content = "line1\nline2\nline3";
        let ok = ParsedLocation::parse("a.py:2:6").unwrap();
        assert!(ok.validate_position_with_content(content).is_ok());

        let past_end = ParsedLocation::parse("a.py:10:1").unwrap();
        assert!(past_end.validate_position_with_content(content).is_err());

        let wide = ParsedLocation::parse("a.py:1:8").unwrap();
        assert!(wide.validate_position_with_content(content).is_err());
    }

    #[test]
    fn test_resolve_inside_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();

        let loc = ParsedLocation::parse("a.py:1:1").unwrap();
        let resolved = loc.resolve(temp.path()).unwrap();
        assert!(resolved.file.is_absolute());
        assert_eq!(resolved.line, 1);

        let missing = ParsedLocation::parse("nope.py:1:1").unwrap();
        assert!(missing.resolve(temp.path()).is_err());
    }

    #[test]
    fn test_resolve_rejects_outside_root() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("project");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.py"), "x = 1\n").unwrap();

        let loc = ParsedLocation::parse("../secret.py:1").unwrap();
        let err = loc.resolve(&root).unwrap_err();
        assert!(err.to_string().contains("outside project"));
    }

    #[test]
    fn test_display() {
        let loc = ParsedLocation::parse("app/models.py:10:5").unwrap();
        assert_eq!(loc.to_string(), "app/models.py:10:5");
    }
}
