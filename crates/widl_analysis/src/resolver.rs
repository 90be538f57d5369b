use crate::library::{DeclId, Library};
use crate::libraries::Libraries;
use widl_diagnostics::{DiagnosticCode, Reporter};
use widl_syntax::CompoundIdentifier;

/// What a dotted reference named. `*Member` variants point at a bits/enum
/// member rather than the declaration itself (`Color.RED`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    Local(DeclId),
    Foreign { library: String, id: DeclId },
    LocalMember { decl: DeclId, member: String },
    ForeignMember { library: String, decl: DeclId, member: String },
}

/// Resolves a dotted reference against the three places a name can live, in
/// the order declarations bind:
///
///  a. a bare name declared in `library` itself;
///  b. `Alias.Name` or `imported.library.Name`, naming a declaration
///     exported by one of `library`'s imports;
///  c. `Decl.Member`, naming a member of a bits/enum declared locally or
///     (via the two-part form above) in an imported library.
///
/// Marks the resolved import's `used` flag so unused-import detection can
/// run after the whole library is compiled.
pub fn resolve(library: &mut Library, libraries: &Libraries, reference: &CompoundIdentifier, reporter: &mut Reporter) -> Option<ResolvedRef> {
    if reference.is_simple() {
        let name = reference.last();
        if let Some(id) = library.name_to_id.get(name) {
            return Some(ResolvedRef::Local(*id));
        }
        reporter.report(DiagnosticCode::WE02003, Some(&reference.span), &[reference.to_string()]);
        return None;
    }

    let (head, rest) = reference.parts.split_first().expect("compound identifier always has at least one part");

    // `Decl.Member` against a local bits/enum declaration.
    if rest.len() == 1 {
        if let Some(id) = library.name_to_id.get(head) {
            return Some(ResolvedRef::LocalMember { decl: *id, member: rest[0].clone() });
        }
    }

    let mut candidates: Vec<ResolvedRef> = Vec::new();
    let matching_usings: Vec<usize> = library
        .usings
        .iter()
        .enumerate()
        .filter(|(_, u)| u.alias.as_deref() == Some(head.as_str()) || (u.alias.is_none() && u.library_name == *head))
        .map(|(i, _)| i)
        .collect();

    for &idx in &matching_usings {
        let lib_name = library.usings[idx].library_name.clone();
        let Some(foreign) = libraries.get(&lib_name) else { continue };
        match rest.len() {
            1 => {
                if let Some(id) = foreign.name_to_id.get(&rest[0]) {
                    candidates.push(ResolvedRef::Foreign { library: lib_name.clone(), id: *id });
                }
            }
            2 => {
                if let Some(id) = foreign.name_to_id.get(&rest[0]) {
                    candidates.push(ResolvedRef::ForeignMember { library: lib_name.clone(), decl: *id, member: rest[1].clone() });
                }
            }
            _ => {}
        }
    }

    if candidates.len() > 1 {
        let names: Vec<String> = matching_usings.iter().map(|&i| library.usings[i].library_name.clone()).collect();
        reporter.report(DiagnosticCode::WE02004, Some(&reference.span), &[reference.to_string(), names.join(", ")]);
        return None;
    }

    if let Some(found) = candidates.into_iter().next() {
        if let Some(&idx) = matching_usings.first() {
            library.usings[idx].used = true;
        }
        return Some(found);
    }

    reporter.report(DiagnosticCode::WE02003, Some(&reference.span), &[reference.to_string()]);
    None
}

/// Reports `WE02005` for every `using` that `resolve` never touched.
pub fn check_unused_imports(library: &Library, reporter: &mut Reporter) {
    for using in &library.usings {
        if !using.used {
            reporter.report(DiagnosticCode::WE02005, Some(&using.span), &[using.library_name.clone()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widl_diagnostics::{ByteRange, SourceFile};

    fn ident(parts: &[&str]) -> CompoundIdentifier {
        let file = SourceFile::new("t", "x");
        CompoundIdentifier::new(parts.iter().map(|s| s.to_string()).collect(), file.span(ByteRange::new(0, 1)))
    }

    #[test]
    fn unknown_bare_name_is_reported() {
        let mut reporter = Reporter::new();
        let mut library = crate::library::consume("t".into(), vec![], &mut reporter);
        let libraries = Libraries::new();
        let r = resolve(&mut library, &libraries, &ident(&["Missing"]), &mut reporter);
        assert!(r.is_none());
        assert!(reporter.has_errors());
    }
}
