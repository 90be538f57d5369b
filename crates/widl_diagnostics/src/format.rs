use crate::diagnostic::Diagnostic;
use crate::span::SourceFile;

/// Renders a compact, caret-annotated diagnostic body for CLI output.
/// Example:
/// at 3:15: expected ';'
/// using corp.mem;
///               ^
pub fn render_caret(file: &SourceFile, d: &Diagnostic) -> String {
    let mut out = String::new();
    let (line, col, len) = match d.location.as_ref() {
        Some(loc) => (loc.line, loc.column, loc.length),
        None => (1usize, 1usize, 0usize),
    };
    let line_text = file.line_text(line);
    out.push_str(&format!("at {}:{}: {}\n", line, col, d.message));
    out.push_str(line_text);
    out.push('\n');
    let caret_count = len.max(1);
    out.push_str(&" ".repeat(col.saturating_sub(1)));
    out.push_str(&"^".repeat(caret_count));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;

    #[test]
    fn renders_caret_under_span() {
        let file = SourceFile::new("test.widl", "using io;\nconst X uint32 = -1;\n");
        let span = file.span(crate::span::ByteRange::new(27, 29));
        let d = Diagnostic::new(DiagnosticCode::WE03001, Some(&span), &["-1".into(), "uint32".into()]);
        let rendered = render_caret(&file, &d);
        assert!(rendered.contains("^^"));
        assert!(rendered.starts_with("at 2:18:"));
    }
}
