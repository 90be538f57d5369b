use miette::{LabeledSpan, NamedSource, Report, SourceOffset, SourceSpan};
use widl_diagnostics::{Diagnostic, Reporter, SourceFile};

/// Renders one diagnostic as a `miette::Report` carrying its own labeled
/// source snippet, recovering a byte offset from the diagnostic's
/// line/column via `SourceOffset::from_location` since `SourceLocation`
/// itself doesn't carry one.
fn to_miette_report(file: Option<&SourceFile>, diagnostic: &Diagnostic) -> Report {
    let message = diagnostic.message.clone();
    let report = match (&diagnostic.location, file) {
        (Some(loc), Some(file)) => {
            let start = SourceOffset::from_location(file.text(), loc.line, loc.column);
            let span = SourceSpan::new(start, loc.length.max(1).into());
            let label = LabeledSpan::at(span, message.clone());
            miette::miette!(labels = vec![label], "{message}")
        }
        _ => miette::miette!("{message}"),
    };
    match file {
        Some(file) => report.with_source_code(NamedSource::new(file.name().to_string(), file.text().to_string())),
        None => report,
    }
}

/// Renders every diagnostic in `reporter` against whichever of `files`
/// matches its recorded file name, falling back to a bare message if the
/// file isn't in the set (cross-library diagnostics have no local source).
pub fn render_all(files: &[SourceFile], reporter: &Reporter) -> Vec<Report> {
    reporter
        .diagnostics()
        .iter()
        .map(|d| {
            let file = d.location.as_ref().and_then(|loc| files.iter().find(|f| f.name() == loc.file));
            to_miette_report(file, d)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use widl_diagnostics::DiagnosticCode;

    #[test]
    fn renders_a_labeled_report_for_a_located_diagnostic() {
        let file = SourceFile::new("widget.widl", "const X uint32 = -1;\n");
        let span = file.span(widl_diagnostics::ByteRange::new(17, 19));
        let mut reporter = Reporter::new();
        reporter.report(DiagnosticCode::WE03001, Some(&span), &["-1".into(), "uint32".into()]);
        let reports = render_all(std::slice::from_ref(&file), &reporter);
        assert_eq!(reports.len(), 1);
        assert!(format!("{:?}", reports[0]).contains("uint32"));
    }

    #[test]
    fn falls_back_to_a_bare_message_without_a_matching_file() {
        let mut reporter = Reporter::new();
        reporter.report(DiagnosticCode::WE02001, None, &["corp.example".to_string()]);
        let reports = render_all(&[], &reporter);
        assert_eq!(reports.len(), 1);
    }
}
