use std::collections::HashSet;
use strsim::normalized_levenshtein;
use widl_diagnostics::{DiagnosticCode, Reporter};
use widl_syntax::{attribute, AttributeList};

pub const KNOWN_ATTRIBUTES: &[&str] =
    &["doc", "discoverable", "transport", "selector", "maxbytes", "maxhandles", "unknown", "fordeprecatedcbindings"];

pub const KNOWN_TRANSPORTS: &[&str] = &["Channel", "Syscall", "Driver"];

/// Where each known attribute is allowed to appear. `doc` has no entry here
/// and is accepted everywhere, mirroring how a doc comment can annotate any
/// declaration or member.
const PLACEMENT: &[(&str, &[&str])] = &[
    ("discoverable", &["protocol"]),
    ("transport", &["protocol"]),
    ("selector", &["method"]),
    ("maxbytes", &["struct", "table", "union"]),
    ("maxhandles", &["struct", "table", "union"]),
    ("fordeprecatedcbindings", &["protocol", "struct", "table", "union"]),
    ("unknown", &["member"]),
];

/// Rejects a known attribute placed on a declaration or member kind it
/// doesn't apply to, e.g. `@selector` on a struct rather than a method.
pub fn check_placement(attrs: &AttributeList, kind: &str, reporter: &mut Reporter) {
    for a in attrs {
        let lower = a.name.text.to_ascii_lowercase();
        if let Some((_, allowed)) = PLACEMENT.iter().find(|(name, _)| *name == lower) {
            if !allowed.contains(&kind) {
                reporter.report(DiagnosticCode::WE04003, Some(&a.span), &[a.name.text.clone(), kind.to_string()]);
            }
        }
    }
}

/// Below this normalized-Levenshtein similarity, an unrecognized attribute
/// is reported plainly rather than with a "did you mean" suggestion; a low
/// score means the nearest known name is probably not what was intended.
const SUGGESTION_THRESHOLD: f64 = 0.6;

pub fn check_duplicates(attrs: &AttributeList, reporter: &mut Reporter) {
    let mut seen = HashSet::new();
    for a in attrs {
        let key = a.name.text.to_ascii_lowercase();
        if !seen.insert(key) {
            reporter.report(DiagnosticCode::WE04004, Some(&a.span), &[a.name.text.clone()]);
        }
    }
}

pub fn check_unknown(attrs: &AttributeList, reporter: &mut Reporter) {
    for a in attrs {
        let lower = a.name.text.to_ascii_lowercase();
        if KNOWN_ATTRIBUTES.contains(&lower.as_str()) {
            continue;
        }
        let best = KNOWN_ATTRIBUTES
            .iter()
            .map(|k| (*k, normalized_levenshtein(&lower, k)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        match best {
            Some((name, score)) if score > SUGGESTION_THRESHOLD => {
                reporter.report(DiagnosticCode::WW04002, Some(&a.span), &[a.name.text.clone(), name.to_string()]);
            }
            _ => reporter.report(DiagnosticCode::WW04001, Some(&a.span), &[a.name.text.clone()]),
        }
    }
}

/// Checks a `@transport("Channel,Driver")`-style argument against the known
/// transport list; a comma-separated list means a protocol is reachable
/// over more than one transport.
pub fn check_transport(attrs: &AttributeList, reporter: &mut Reporter) {
    let Some(attr) = attribute::find(attrs, "transport") else { return };
    let Some(arg) = &attr.arg else { return };
    let widl_syntax::LiteralValue::Str(value) = &arg.value else { return };
    for token in value.split(',') {
        let token = token.trim();
        if !KNOWN_TRANSPORTS.contains(&token) {
            reporter.report(DiagnosticCode::WE04007, Some(&arg.span), &[token.to_string()]);
        }
    }
}

/// `@selector` provides a fixed wire selector string, overriding the
/// SHA-256-derived ordinal that would otherwise be computed.
pub fn selector_override(attrs: &AttributeList) -> Option<String> {
    let attr = attribute::find(attrs, "selector")?;
    match &attr.arg.as_ref()?.value {
        widl_syntax::LiteralValue::Str(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn is_resource_attribute_present(attrs: &AttributeList) -> bool {
    attribute::find(attrs, "discoverable").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use widl_diagnostics::{ByteRange, SourceFile};
    use widl_syntax::{Attribute, Ident};

    fn attr(name: &str) -> Attribute {
        let file = SourceFile::new("t", name);
        let span = file.span(ByteRange::new(0, name.len()));
        Attribute { name: Ident::new(name, span.clone()), arg: None, span }
    }

    #[test]
    fn flags_near_miss_with_suggestion() {
        let mut reporter = Reporter::new();
        check_unknown(&vec![attr("selectorr")], &mut reporter);
        assert_eq!(reporter.warning_count(), 1);
    }

    #[test]
    fn flags_duplicate_attribute() {
        let mut reporter = Reporter::new();
        check_duplicates(&vec![attr("doc"), attr("Doc")], &mut reporter);
        assert!(reporter.has_errors());
    }

    #[test]
    fn rejects_selector_on_a_non_method_declaration() {
        let mut reporter = Reporter::new();
        check_placement(&vec![attr("selector")], "struct", &mut reporter);
        assert!(reporter.has_errors());
    }

    #[test]
    fn accepts_maxbytes_on_a_table() {
        let mut reporter = Reporter::new();
        check_placement(&vec![attr("maxbytes")], "table", &mut reporter);
        assert!(!reporter.has_errors());
    }

    #[test]
    fn accepts_doc_on_anything() {
        let mut reporter = Reporter::new();
        check_placement(&vec![attr("doc")], "const", &mut reporter);
        assert!(!reporter.has_errors());
    }
}
