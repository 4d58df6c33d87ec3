//! Source locations attached to symbol bindings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A 1-based line/column position within a source file.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

/// The span of source text a symbol binding originated from.
///
/// Carried on export/import symbol entries so diagnostics can point back
/// at the declaration site. Optional everywhere it appears; synthetic
/// bindings have no location.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SourceLocation {
    /// The file the binding was declared in.
    pub file_path: PathBuf,
    /// Start of the declaration span.
    pub start: Position,
    /// End of the declaration span.
    pub end: Position,
}

impl SourceLocation {
    /// Creates a single-line location spanning the given columns.
    pub fn on_line(file_path: impl Into<PathBuf>, line: u32, start: u32, end: u32) -> Self {
        Self {
            file_path: file_path.into(),
            start: Position {
                line,
                column: start,
            },
            end: Position { line, column: end },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_line_builds_span() {
        let loc = SourceLocation::on_line("src/a.js", 3, 1, 10);
        assert_eq!(loc.file_path, PathBuf::from("src/a.js"));
        assert_eq!(loc.start.line, 3);
        assert_eq!(loc.end.column, 10);
    }

    #[test]
    fn serde_roundtrip() {
        let loc = SourceLocation::on_line("src/b.js", 1, 5, 9);
        let json = serde_json::to_string(&loc).unwrap();
        let back: SourceLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, back);
    }
}
