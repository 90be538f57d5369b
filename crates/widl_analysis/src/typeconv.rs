use crate::constant::{evaluate, ConstantValue};
use crate::library::{CompiledDecl, Library};
use crate::libraries::Libraries;
use crate::resolver::{resolve, ResolvedRef};
use crate::typespace::{HandleSubtype, PrimitiveType, Type, TypeId, Typespace};
use widl_diagnostics::{DiagnosticCode, Reporter};
use widl_syntax::TypeConstructor;

fn eval_bound(size: &Option<Box<widl_syntax::Constant>>, library: &mut Library, libraries: &Libraries, typespace: &mut Typespace, reporter: &mut Reporter) -> Option<u32> {
    let c = size.as_ref()?;
    let target = Type::Primitive(PrimitiveType::Uint32);
    match evaluate(c, &target, library, libraries, typespace, reporter)? {
        ConstantValue::Int(v) if v >= 0 => Some(v as u32),
        _ => None,
    }
}

/// Canonicalizes a raw `TypeConstructor` into an interned `Type`. Built-in
/// type names (`string`, `vector`, `array`, `handle`, `client_end`,
/// `server_end`, the numeric primitives) are recognized by name rather than
/// being reserved keywords, so a user declaration can never shadow them:
/// this function always checks the built-in table before falling through to
/// `library`'s own name scope.
pub fn resolve_type(tc: &TypeConstructor, library: &mut Library, libraries: &Libraries, typespace: &mut Typespace, reporter: &mut Reporter) -> Option<TypeId> {
    if tc.name.is_simple() {
        let name = tc.name.last();

        if let Some(p) = PrimitiveType::from_name(name) {
            if tc.nullable {
                reporter.report(DiagnosticCode::WE03004, Some(&tc.span), &[name.to_string()]);
            }
            return Some(typespace.intern(Type::Primitive(p)));
        }

        if name == "string" {
            let bound = eval_bound(&tc.size, library, libraries, typespace, reporter);
            return Some(typespace.intern(Type::Str { bound, nullable: tc.nullable }));
        }

        if name == "vector" {
            let element_tc = tc.element_type.as_deref()?;
            let element_id = resolve_type(element_tc, library, libraries, typespace, reporter)?;
            let element = typespace.get(element_id).clone();
            let bound = eval_bound(&tc.size, library, libraries, typespace, reporter);
            return Some(typespace.intern(Type::Vector { element: Box::new(element), bound, nullable: tc.nullable }));
        }

        if name == "array" {
            let element_tc = tc.element_type.as_deref()?;
            let element_id = resolve_type(element_tc, library, libraries, typespace, reporter)?;
            let element = typespace.get(element_id).clone();
            let size = match eval_bound(&tc.size, library, libraries, typespace, reporter) {
                Some(s) => s,
                None => {
                    reporter.report(DiagnosticCode::WE03005, Some(&tc.span), &["array requires an explicit size".to_string()]);
                    return None;
                }
            };
            return Some(typespace.intern(Type::Array { element: Box::new(element), size }));
        }

        if name == "handle" {
            let subtype = tc
                .handle_subtype
                .as_ref()
                .and_then(|i| HandleSubtype::from_name(&i.text))
                .unwrap_or(HandleSubtype::Handle);
            return Some(typespace.intern(Type::Handle { subtype, nullable: tc.nullable }));
        }

        if name == "client_end" || name == "server_end" {
            let protocol_tc = tc.element_type.as_deref()?;
            let protocol_id = resolve_protocol(protocol_tc, library, libraries, reporter)?;
            return Some(typespace.intern(if name == "client_end" {
                Type::ClientEnd { protocol: protocol_id, nullable: tc.nullable }
            } else {
                Type::ServerEnd { protocol: protocol_id, nullable: tc.nullable }
            }));
        }
    }

    // Not a built-in: a reference to a user declaration (struct/table/union/
    // bits/enum/type alias). Aliases are transparent: resolving one yields
    // the alias's own already-resolved `TypeId` directly.
    match resolve(library, libraries, &tc.name, reporter)? {
        ResolvedRef::Local(id) => {
            if let Some(CompiledDecl::TypeAlias { target }) = library.compiled(id) {
                return Some(*target);
            }
            if tc.nullable && !decl_is_nullable_capable(library.compiled(id)) {
                reporter.report(DiagnosticCode::WE03004, Some(&tc.span), &[tc.name.to_string()]);
            }
            Some(typespace.intern(Type::Identifier { decl: id, nullable: tc.nullable }))
        }
        ResolvedRef::Foreign { library: lib_name, id } => {
            let foreign = libraries.get(&lib_name)?;
            if let Some(CompiledDecl::TypeAlias { target }) = foreign.compiled(id) {
                return Some(*target);
            }
            Some(typespace.intern(Type::Identifier { decl: id, nullable: tc.nullable }))
        }
        ResolvedRef::LocalMember { .. } | ResolvedRef::ForeignMember { .. } => {
            reporter.report(DiagnosticCode::WE03005, Some(&tc.span), &[tc.name.to_string()]);
            None
        }
    }
}

fn decl_is_nullable_capable(compiled: Option<&CompiledDecl>) -> bool {
    matches!(compiled, Some(CompiledDecl::Struct { .. }) | Some(CompiledDecl::Union { .. }) | None)
}

fn resolve_protocol(tc: &TypeConstructor, library: &mut Library, libraries: &Libraries, reporter: &mut Reporter) -> Option<crate::library::DeclId> {
    match resolve(library, libraries, &tc.name, reporter)? {
        ResolvedRef::Local(id) => Some(id),
        ResolvedRef::Foreign { id, .. } => Some(id),
        _ => {
            reporter.report(DiagnosticCode::WE03005, Some(&tc.span), &[tc.name.to_string()]);
            None
        }
    }
}
