use crate::library::{CompiledDecl, Library};
use crate::libraries::Libraries;
use crate::resolver::{self, ResolvedRef};
use crate::typespace::{PrimitiveType, Type, Typespace};
use widl_diagnostics::{DiagnosticCode, Reporter};
use widl_syntax::{Constant, CompoundIdentifier, Literal, LiteralValue};

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Int(i128),
    Float(f64),
    Bool(bool),
    Str(String),
}

fn describe(target: &Type) -> String {
    match target {
        Type::Primitive(p) => format!("{p:?}").to_lowercase(),
        Type::Str { .. } => "string".to_string(),
        Type::Vector { .. } => "vector".to_string(),
        Type::Array { .. } => "array".to_string(),
        Type::Handle { .. } => "handle".to_string(),
        Type::Identifier { .. } => "identifier".to_string(),
        Type::ClientEnd { .. } => "client end".to_string(),
        Type::ServerEnd { .. } => "server end".to_string(),
    }
}

/// Bits/enum decls (and aliases to them) coerce numeric literals against
/// their underlying integer type, not against the identifier type itself.
fn resolve_underlying(target: &Type, library: &Library, typespace: &Typespace) -> Option<PrimitiveType> {
    match target {
        Type::Primitive(p) => Some(*p),
        Type::Identifier { decl, .. } => match library.compiled(*decl) {
            Some(CompiledDecl::Bits { underlying, .. }) | Some(CompiledDecl::Enum { underlying, .. }) => {
                match typespace.get(*underlying) {
                    Type::Primitive(p) => Some(*p),
                    _ => None,
                }
            }
            _ => None,
        },
        _ => None,
    }
}

fn evaluate_literal(lit: &Literal, target: &Type, library: &Library, typespace: &Typespace, reporter: &mut Reporter) -> Option<ConstantValue> {
    match &lit.value {
        LiteralValue::Str(s) => {
            if let Type::Str { bound, .. } = target {
                let len = s.chars().count() as u32;
                if let Some(b) = bound {
                    if len > *b {
                        reporter.report(DiagnosticCode::WE03003, Some(&lit.span), &[s.clone(), "string".to_string()]);
                        return None;
                    }
                }
                return Some(ConstantValue::Str(s.clone()));
            }
            reporter.report(DiagnosticCode::WE03001, Some(&lit.span), &[format!("\"{s}\""), describe(target)]);
            None
        }
        LiteralValue::Bool(b) => {
            if matches!(target, Type::Primitive(PrimitiveType::Bool)) {
                return Some(ConstantValue::Bool(*b));
            }
            reporter.report(DiagnosticCode::WE03001, Some(&lit.span), &[b.to_string(), describe(target)]);
            None
        }
        LiteralValue::Numeric(text) => {
            let Some(p) = resolve_underlying(target, library, typespace) else {
                reporter.report(DiagnosticCode::WE03001, Some(&lit.span), &[text.clone(), describe(target)]);
                return None;
            };
            if p.is_float() {
                match text.parse::<f64>() {
                    Ok(v) => Some(ConstantValue::Float(v)),
                    Err(_) => {
                        reporter.report(DiagnosticCode::WE03001, Some(&lit.span), &[text.clone(), describe(target)]);
                        None
                    }
                }
            } else {
                match text.parse::<i128>() {
                    Ok(v) => {
                        let (min, max) = p.int_range();
                        if p.is_unsigned() && v < 0 {
                            reporter.report(DiagnosticCode::WE03002, Some(&lit.span), &[text.clone(), describe(target)]);
                            None
                        } else if v < min || v > max {
                            reporter.report(DiagnosticCode::WE03002, Some(&lit.span), &[text.clone(), describe(target)]);
                            None
                        } else {
                            Some(ConstantValue::Int(v))
                        }
                    }
                    Err(_) => {
                        reporter.report(DiagnosticCode::WE03001, Some(&lit.span), &[text.clone(), describe(target)]);
                        None
                    }
                }
            }
        }
    }
}

fn lookup_member(compiled: Option<&CompiledDecl>, member: &str) -> Option<ConstantValue> {
    match compiled {
        Some(CompiledDecl::Bits { members, .. }) | Some(CompiledDecl::Enum { members, .. }) => {
            members.iter().find(|(n, _)| n == member).map(|(_, v)| v.clone())
        }
        _ => None,
    }
}

fn evaluate_identifier(
    reference: &CompoundIdentifier,
    library: &mut Library,
    libraries: &Libraries,
    reporter: &mut Reporter,
) -> Option<ConstantValue> {
    let resolved = resolver::resolve(library, libraries, reference, reporter)?;
    match resolved {
        ResolvedRef::Local(id) => match library.compiled(id) {
            Some(CompiledDecl::Const { value, .. }) => Some(value.clone()),
            _ => lookup_member(library.compiled(id), reference.last()),
        },
        ResolvedRef::Foreign { library: lib_name, id } => {
            let foreign = libraries.get(&lib_name)?;
            match foreign.compiled(id) {
                Some(CompiledDecl::Const { value, .. }) => Some(value.clone()),
                other => lookup_member(other, reference.last()),
            }
        }
        ResolvedRef::LocalMember { decl, member } => lookup_member(library.compiled(decl), &member),
        ResolvedRef::ForeignMember { library: lib_name, decl, member } => {
            let foreign = libraries.get(&lib_name)?;
            lookup_member(foreign.compiled(decl), &member)
        }
    }
}

/// Resolves a constant expression against `target`. Identifier references
/// and binary-or both require `library` mutably: resolving a dotted name
/// may mark a `using` import as used.
pub fn evaluate(
    constant: &Constant,
    target: &Type,
    library: &mut Library,
    libraries: &Libraries,
    typespace: &Typespace,
    reporter: &mut Reporter,
) -> Option<ConstantValue> {
    match constant {
        Constant::Literal(lit) => evaluate_literal(lit, target, library, typespace, reporter),
        Constant::Identifier(reference) => evaluate_identifier(reference, library, libraries, reporter),
        Constant::BinaryOr { left, right, span } => {
            let l = evaluate(left, target, library, libraries, typespace, reporter)?;
            let r = evaluate(right, target, library, libraries, typespace, reporter)?;
            match (l, r) {
                (ConstantValue::Int(a), ConstantValue::Int(b)) => Some(ConstantValue::Int(a | b)),
                _ => {
                    reporter.report(DiagnosticCode::WE03005, Some(span), &["bitwise-or requires both operands to be integral bits values".to_string()]);
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widl_diagnostics::{ByteRange, SourceFile};

    #[test]
    fn rejects_negative_literal_for_unsigned_target() {
        let mut reporter = Reporter::new();
        let library = crate::library::consume("t".into(), vec![], &mut reporter);
        let typespace = Typespace::new();
        let f = SourceFile::new("t", "-1");
        let lit = Literal { value: LiteralValue::Numeric("-1".to_string()), span: f.span(ByteRange::new(0, 2)) };
        let v = evaluate_literal(&lit, &Type::Primitive(PrimitiveType::Uint32), &library, &typespace, &mut reporter);
        assert!(v.is_none());
        assert!(reporter.has_errors());
    }

    #[test]
    fn accepts_in_range_literal() {
        let mut reporter = Reporter::new();
        let library = crate::library::consume("t".into(), vec![], &mut reporter);
        let typespace = Typespace::new();
        let f = SourceFile::new("t", "42");
        let lit = Literal { value: LiteralValue::Numeric("42".to_string()), span: f.span(ByteRange::new(0, 2)) };
        let v = evaluate_literal(&lit, &Type::Primitive(PrimitiveType::Uint32), &library, &typespace, &mut reporter);
        assert_eq!(v, Some(ConstantValue::Int(42)));
        assert!(!reporter.has_errors());
    }
}
