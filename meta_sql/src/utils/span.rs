//! Source location tracking
//!
//! Every token and every AST node carries a [`Span`]. Statement nodes copy the
//! span of their leading keyword, so error reports point at the statement start.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number in characters (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Position after consuming `ch`
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self::new(self.offset + 1, self.line + 1, 1)
        } else {
            Self::new(self.offset + ch.len_utf8(), self.line, self.column + 1)
        }
    }

    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, Self::advance)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive
    pub start: Position,
    /// Exclusive
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Empty span at `pos`, used for end of input
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.offset >= self.start.offset && pos.offset < self.end.offset
    }

    /// Source text under this span, or `None` if it does not fit `input`
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start.offset..self.end.offset)
    }

    /// Placeholder for synthesized nodes
    pub fn dummy() -> Self {
        Self::point(Position::start())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source string for diagnostics
#[derive(Debug, Clone)]
pub struct SourceMap {
    source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Line and column for a byte offset; offsets past the end clamp to the end
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count();

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Text of a 1-based line without its newline
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        let idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        self.source
            .get(start..end)
            .map(|line| line.trim_end_matches('\r'))
    }

    /// Render `message` with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut out = format!("error: {}\n  --> {}\n", message, span.start);

        if let Some(line) = self.get_line(span.start.line) {
            let gutter = span.start.line.to_string();
            let pad = " ".repeat(gutter.len());
            let width = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column) as usize
            } else {
                line.chars().count() + 1 - span.start.column as usize
            };

            out.push_str(&format!("{} |\n", pad));
            out.push_str(&format!("{} | {}\n", gutter, line));
            out.push_str(&format!(
                "{} | {}{}\n",
                pad,
                " ".repeat(span.start.column.saturating_sub(1) as usize),
                "^".repeat(width.max(1))
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let pos = Position::start().advance_str("ab\ncd");
        assert_eq!(pos, Position::new(5, 2, 3));
    }

    #[test]
    fn merge_covers_both() {
        let a = Span::new(Position::new(0, 1, 1), Position::new(4, 1, 5));
        let b = Span::new(Position::new(10, 1, 11), Position::new(12, 1, 13));
        let merged = a.merge(b);
        assert_eq!(merged.start.offset, 0);
        assert_eq!(merged.end.offset, 12);
        assert_eq!(merged.len(), 12);
    }

    #[test]
    fn source_map_positions() {
        let map = SourceMap::new("SHOW TABLES;\nUSE dfs.tmp;");
        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(13), Position::new(13, 2, 1));
        assert_eq!(map.position_at(17), Position::new(17, 2, 5));
        assert_eq!(map.get_line(2), Some("USE dfs.tmp;"));
        assert_eq!(map.get_line(3), None);
        assert_eq!(map.get_line(0), None);
    }

    #[test]
    fn format_error_underlines_span() {
        let map = SourceMap::new("DROP STORAGE");
        let span = Span::new(Position::new(5, 1, 6), Position::new(12, 1, 13));
        let rendered = map.format_error(&span, "expected identifier");

        assert!(rendered.contains("--> 1:6"));
        assert!(rendered.contains("1 | DROP STORAGE"));
        assert!(rendered.contains("|      ^^^^^^^\n"));
    }

    #[test]
    fn slice_out_of_range_is_none() {
        let span = Span::new(Position::new(2, 1, 3), Position::new(20, 1, 21));
        assert_eq!(span.slice("short"), None);
    }
}
