use crate::code::DiagnosticCode;
use crate::location::SourceLocation;
use crate::severity::DiagnosticSeverity;
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Substitutes each `{}` in `template`, left to right, with the corresponding
/// argument. Diagnostic templates are plain `&'static str`s (not `format!`
/// literals) because the code table is built by a macro from a value, so the
/// substitution has to happen at runtime.
fn format_with_args(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'}') {
            chars.next();
            if let Some(arg) = args.next() {
                out.push_str(arg);
            } else {
                out.push_str("{}");
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, span: Option<&Span>, args: &[String]) -> Self {
        Self {
            severity: code.severity(),
            message: format_with_args(code.default_message(), args),
            location: span.map(SourceLocation::from_span),
            code,
        }
    }

    pub fn promote_to_error(&mut self) {
        self.severity = DiagnosticSeverity::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_substitution_is_left_to_right() {
        let s = format_with_args("{} cannot be interpreted as type {}", &["-42".into(), "uint64".into()]);
        assert_eq!(s, "-42 cannot be interpreted as type uint64");
    }

    #[test]
    fn missing_args_leave_placeholder() {
        let s = format_with_args("{} and {}", &["only-one".into()]);
        assert_eq!(s, "only-one and {}");
    }
}
