use crate::LibraryShapes;
use widl_analysis::Library;
use widl_diagnostics::{DiagnosticCode, Reporter};
use widl_syntax::attribute;
use widl_syntax::LiteralValue;

/// Attribute constraints that can only be checked once a declaration's
/// typeshape is known: `MaxBytes` bounds the total wire size (inline plus
/// out-of-line), `MaxHandles` bounds the handle count. This is phase 7 of
/// the pipeline, run after typeshape (phase 6) over every declaration.
pub fn check(library: &Library, shapes: &LibraryShapes, reporter: &mut Reporter) {
    for &id in &library.topological_order {
        let decl = library.decl(id);
        let attrs = decl.attributes();

        if let Some(attr) = attribute::find(attrs, "maxbytes") {
            if let Some(limit) = numeric_arg(attr) {
                let shape = shapes.envelope_shapes.get(&id).copied().unwrap_or(crate::TypeShape::PENDING);
                let total = shape.inline_size.saturating_add(shape.out_of_line);
                if total > limit {
                    reporter.report(DiagnosticCode::WE04005, Some(&attr.span), &[limit.to_string(), total.to_string()]);
                }
            }
        }

        if let Some(attr) = attribute::find(attrs, "maxhandles") {
            if let Some(limit) = numeric_arg(attr) {
                let shape = shapes.envelope_shapes.get(&id).copied().unwrap_or(crate::TypeShape::PENDING);
                if shape.handles > limit {
                    reporter.report(DiagnosticCode::WE04006, Some(&attr.span), &[limit.to_string(), shape.handles.to_string()]);
                }
            }
        }
    }
}

fn numeric_arg(attr: &widl_syntax::Attribute) -> Option<u32> {
    let lit = attr.arg.as_ref()?;
    match &lit.value {
        LiteralValue::Numeric(text) => text.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widl_analysis::testing::TestLibrary;

    #[test]
    fn reports_oversized_struct() {
        let t = TestLibrary::compile(
            "test.bounds",
            "library test.bounds;\n@maxbytes(4)\nstruct Big { value uint64; };\n",
        );
        assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
        let shapes = crate::compute_library_shapes(&t.library, &t.typespace);
        let mut reporter = widl_diagnostics::Reporter::new();
        check(&t.library, &shapes, &mut reporter);
        assert!(reporter.has_errors());
    }
}
