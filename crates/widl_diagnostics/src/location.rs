use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A serializable snapshot of a `Span`'s position, independent of the
/// `SourceFile` it came from. Diagnostics store this rather than a live
/// `Span` so a `DiagnosticCollection` can be serialized on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl SourceLocation {
    pub fn from_span(span: &Span) -> Self {
        let start = span.start();
        Self {
            file: span.file_name().to_string(),
            line: start.line,
            column: start.column,
            length: span.range().len(),
        }
    }
}
