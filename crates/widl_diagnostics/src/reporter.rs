use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::DiagnosticSeverity;
use crate::span::Span;

/// Accumulates diagnostics in emission order. Diagnostics never abort
/// compilation; every fallible phase reports into this and keeps going.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    warnings_as_errors: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_warnings_as_errors(&mut self, on: bool) {
        self.warnings_as_errors = on;
    }

    pub fn report(&mut self, code: DiagnosticCode, span: Option<&Span>, args: &[String]) {
        let mut d = Diagnostic::new(code, span, args);
        if self.warnings_as_errors && d.severity == DiagnosticSeverity::Warning {
            d.promote_to_error();
        }
        self.diagnostics.push(d);
    }

    pub fn error(&mut self, code: DiagnosticCode, span: &Span, args: &[String]) {
        self.report(code, Some(span), args);
    }

    pub fn warning(&mut self, code: DiagnosticCode, span: &Span, args: &[String]) {
        self.report(code, Some(span), args);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == DiagnosticSeverity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Takes a snapshot a caller can later ask "did any new error/warning
    /// show up since this checkpoint", without cloning the whole log.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            error_count_at: self.error_count(),
            warning_count_at: self.warning_count(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    error_count_at: usize,
    warning_count_at: usize,
}

impl Checkpoint {
    pub fn no_new_errors(&self, reporter: &Reporter) -> bool {
        reporter.error_count() == self.error_count_at
    }

    pub fn no_new_warnings(&self, reporter: &Reporter) -> bool {
        reporter.warning_count() == self.warning_count_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_detects_new_errors() {
        let mut r = Reporter::new();
        r.report(DiagnosticCode::WE02003, None, &["x".into()]);
        let cp = r.checkpoint();
        assert!(cp.no_new_errors(&r));
        r.report(DiagnosticCode::WE02003, None, &["y".into()]);
        assert!(!cp.no_new_errors(&r));
    }

    #[test]
    fn checkpoint_detects_new_warnings() {
        let mut r = Reporter::new();
        r.report(DiagnosticCode::WW02001, None, &[]);
        let cp = r.checkpoint();
        assert!(cp.no_new_warnings(&r));
        r.report(DiagnosticCode::WW02001, None, &[]);
        assert!(!cp.no_new_warnings(&r));
    }

    #[test]
    fn warnings_as_errors_promotes_severity() {
        let mut r = Reporter::new();
        r.set_warnings_as_errors(true);
        r.report(DiagnosticCode::WW02001, None, &[]);
        assert_eq!(r.error_count(), 1);
        assert_eq!(r.warning_count(), 0);
    }
}
