use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A half-open byte range within one `SourceFile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Line/column position, 1-based, matching editor conventions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Immutable owner of one source file's bytes. Spans derived from a `SourceFile`
/// borrow nothing from it directly (they carry a byte range plus a cheap
/// `Arc`-shared name and line index), so spans outlive any particular parse call.
#[derive(Clone, Debug)]
pub struct SourceFile {
    name: Arc<str>,
    text: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text: String = text.into();
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            name: Arc::from(name.into()),
            text: Arc::from(text),
            line_starts: Arc::from(line_starts),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn slice(&self, range: ByteRange) -> &str {
        &self.text[range.start..range.end]
    }

    /// Binary search over cached line-start offsets: O(log lines), not O(bytes).
    pub fn line_column(&self, byte_offset: usize) -> LineColumn {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        let column = self.text[line_start..byte_offset.min(self.text.len())]
            .chars()
            .count()
            + 1;
        LineColumn { line: line_idx + 1, column }
    }

    pub fn line_text(&self, line: usize) -> &str {
        let idx = line.saturating_sub(1);
        let start = *self.line_starts.get(idx).unwrap_or(&self.text.len());
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|e| e.saturating_sub(1))
            .unwrap_or(self.text.len());
        self.text.get(start..end.max(start)).unwrap_or("")
    }

    pub fn span(&self, range: ByteRange) -> Span {
        Span { file: self.clone(), range }
    }
}

/// A span is a file plus a byte range; it carries everything needed to render
/// a caret diagnostic without re-walking the file.
#[derive(Clone, Debug)]
pub struct Span {
    file: SourceFile,
    range: ByteRange,
}

impl Span {
    pub fn file_name(&self) -> &str {
        self.file.name()
    }

    pub fn text(&self) -> &str {
        self.file.slice(self.range)
    }

    pub fn start(&self) -> LineColumn {
        self.file.line_column(self.range.start)
    }

    pub fn end(&self) -> LineColumn {
        self.file.line_column(self.range.end)
    }

    pub fn range(&self) -> ByteRange {
        self.range
    }

    pub fn line_text(&self) -> &str {
        self.file.line_text(self.start().line)
    }

    /// The smallest span covering both `self` and `other`. Used to build a
    /// span for a multi-token construct from its first and last tokens.
    pub fn join(&self, other: &Span) -> Span {
        Span {
            file: self.file.clone(),
            range: ByteRange::new(self.range.start.min(other.range.start), self.range.end.max(other.range.end)),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.name(), self.start())
    }
}
