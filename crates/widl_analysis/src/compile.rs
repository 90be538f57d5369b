use crate::graph::DeclGraph;
use crate::library::{CompiledDecl, CompiledMethod, CompiledOrdinalMember, CompiledStructMember, DeclId, Library};
use crate::libraries::Libraries;
use crate::resolver::{self, ResolvedRef};
use crate::typespace::{PrimitiveType, Type, Typespace};
use crate::{attributes, constant, ordinal, typeconv};
use std::collections::HashSet;
use widl_diagnostics::{DiagnosticCode, Reporter};
use widl_syntax::{attribute, Decl, OrdinalMemberBody, StructMember};

fn decl_kind(decl: &Decl) -> &'static str {
    match decl {
        Decl::Const { .. } => "const",
        Decl::Bits { .. } => "bits",
        Decl::Enum { .. } => "enum",
        Decl::Struct { .. } => "struct",
        Decl::Table { .. } => "table",
        Decl::Union { .. } => "union",
        Decl::Protocol { .. } => "protocol",
        Decl::Service { .. } => "service",
        Decl::TypeAlias { .. } => "type_alias",
        Decl::ResourceDefinition { .. } => "resource_definition",
    }
}

fn compile_struct_members(members: &[StructMember], library: &mut Library, libraries: &Libraries, typespace: &mut Typespace, reporter: &mut Reporter) -> Vec<CompiledStructMember> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for m in members {
        if !seen.insert(m.name.text.clone()) {
            reporter.report(DiagnosticCode::WE02002, Some(&m.span), &[m.name.text.clone(), "struct".to_string()]);
            continue;
        }
        attributes::check_duplicates(&m.attributes, reporter);
        attributes::check_unknown(&m.attributes, reporter);
        attributes::check_placement(&m.attributes, "member", reporter);
        let Some(tid) = typeconv::resolve_type(&m.ty, library, libraries, typespace, reporter) else { continue };
        let default = match &m.default {
            Some(c) => {
                let target = typespace.get(tid).clone();
                constant::evaluate(c, &target, library, libraries, typespace, reporter)
            }
            None => None,
        };
        out.push(CompiledStructMember { name: m.name.text.clone(), ty: tid, default });
    }
    out
}

fn resolve_protocol_ref(tc: &widl_syntax::TypeConstructor, library: &mut Library, libraries: &Libraries, reporter: &mut Reporter) -> Option<DeclId> {
    match resolver::resolve(library, libraries, &tc.name, reporter)? {
        ResolvedRef::Local(id) => Some(id),
        ResolvedRef::Foreign { id, .. } => Some(id),
        _ => {
            reporter.report(DiagnosticCode::WE03005, Some(&tc.span), &[tc.name.to_string()]);
            None
        }
    }
}

fn compile_decl(id: DeclId, library: &mut Library, libraries: &Libraries, typespace: &mut Typespace, reporter: &mut Reporter) {
    let decl = library.decl(id).clone();
    attributes::check_duplicates(decl.attributes(), reporter);
    attributes::check_unknown(decl.attributes(), reporter);
    attributes::check_placement(decl.attributes(), decl_kind(&decl), reporter);

    let compiled = match &decl {
        Decl::Const { ty, value, .. } => typeconv::resolve_type(ty, library, libraries, typespace, reporter).and_then(|tid| {
            let target = typespace.get(tid).clone();
            constant::evaluate(value, &target, library, libraries, typespace, reporter).map(|v| CompiledDecl::Const { ty: tid, value: v })
        }),

        Decl::Bits { name, underlying, strictness, members, .. } => compile_value_decl(name.text.as_str(), underlying, *strictness, members, true, library, libraries, typespace, reporter),
        Decl::Enum { name, underlying, strictness, members, .. } => compile_value_decl(name.text.as_str(), underlying, *strictness, members, false, library, libraries, typespace, reporter),

        Decl::Struct { members, resource, .. } => {
            let out = compile_struct_members(members, library, libraries, typespace, reporter);
            Some(CompiledDecl::Struct { members: out, resource: *resource })
        }

        Decl::Table { members, resource, .. } => {
            compile_ordinal_members(members, library, libraries, typespace, reporter).map(|out| CompiledDecl::Table { members: out, resource: *resource })
        }

        Decl::Union { members, strictness, resource, .. } => {
            compile_ordinal_members(members, library, libraries, typespace, reporter).map(|out| CompiledDecl::Union { members: out, strictness: *strictness, resource: *resource })
        }

        Decl::Protocol { name, methods, composes, attributes: attrs, .. } => {
            attributes::check_transport(attrs, reporter);
            let ordinals = ordinal::assign_ordinals(&library.name.clone(), &name.text, methods, reporter);
            let mut composed_from = Vec::new();
            for c in composes {
                if let Some(id) = resolve_protocol_ref(&widl_syntax::TypeConstructor::simple(c.clone(), c.span.clone()), library, libraries, reporter) {
                    composed_from.push(id);
                }
            }
            let mut out_methods = Vec::new();
            for (method, (mname, mselector, mordinal)) in methods.iter().zip(ordinals.iter()) {
                attributes::check_duplicates(&method.attributes, reporter);
                attributes::check_unknown(&method.attributes, reporter);
                attributes::check_placement(&method.attributes, "method", reporter);
                let request = method.request.as_ref().map(|m| compile_struct_members(m, library, libraries, typespace, reporter));
                let response = method.response.as_ref().map(|m| compile_struct_members(m, library, libraries, typespace, reporter));
                let error = method.error.as_ref().and_then(|tc| typeconv::resolve_type(tc, library, libraries, typespace, reporter));
                out_methods.push(CompiledMethod { name: mname.clone(), selector: mselector.clone(), ordinal: *mordinal, request, response, error, attributes: method.attributes.clone() });
            }
            Some(CompiledDecl::Protocol { methods: out_methods, composed_from })
        }

        Decl::Service { members, .. } => {
            let mut out = Vec::new();
            for m in members {
                if let Some(id) = resolve_protocol_ref(&m.protocol, library, libraries, reporter) {
                    out.push((m.name.text.clone(), id));
                }
            }
            Some(CompiledDecl::Service { members: out })
        }

        Decl::TypeAlias { target, .. } => typeconv::resolve_type(target, library, libraries, typespace, reporter).map(|t| CompiledDecl::TypeAlias { target: t }),

        Decl::ResourceDefinition { underlying, properties, .. } => typeconv::resolve_type(underlying, library, libraries, typespace, reporter).map(|u| {
            let mut props = Vec::new();
            for p in properties {
                if let Some(tid) = typeconv::resolve_type(&p.ty, library, libraries, typespace, reporter) {
                    props.push((p.name.text.clone(), tid));
                }
            }
            CompiledDecl::ResourceDefinition { underlying: u, properties: props }
        }),
    };

    library.compiled[id.0 as usize] = compiled;
}

#[allow(clippy::too_many_arguments)]
fn compile_value_decl(
    decl_name: &str,
    underlying: &Option<widl_syntax::TypeConstructor>,
    strictness: widl_syntax::Strictness,
    members: &[widl_syntax::ValueMember],
    is_bits: bool,
    library: &mut Library,
    libraries: &Libraries,
    typespace: &mut Typespace,
    reporter: &mut Reporter,
) -> Option<CompiledDecl> {
    let underlying_id = match underlying {
        Some(tc) => typeconv::resolve_type(tc, library, libraries, typespace, reporter)?,
        None => typespace.intern(Type::Primitive(PrimitiveType::Uint32)),
    };
    if is_bits {
        if let Type::Primitive(p) = typespace.get(underlying_id) {
            if !p.is_unsigned() {
                reporter.report(DiagnosticCode::WE03006, None, &[decl_name.to_string()]);
            }
        }
    }
    let target = typespace.get(underlying_id).clone();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut unknown_member = None;
    for m in members {
        attributes::check_duplicates(&m.attributes, reporter);
        attributes::check_placement(&m.attributes, "member", reporter);
        if !seen.insert(m.name.text.clone()) {
            reporter.report(DiagnosticCode::WE02002, Some(&m.span), &[m.name.text.clone(), decl_name.to_string()]);
            continue;
        }
        if !is_bits && attribute::find(&m.attributes, "unknown").is_some() {
            unknown_member = Some(m.name.text.clone());
        }
        if let Some(v) = constant::evaluate(&m.value, &target, library, libraries, typespace, reporter) {
            out.push((m.name.text.clone(), v));
        }
    }

    Some(if is_bits {
        CompiledDecl::Bits { underlying: underlying_id, strictness, members: out, resource: false }
    } else {
        CompiledDecl::Enum { underlying: underlying_id, strictness, members: out, unknown_member, resource: false }
    })
}

fn compile_ordinal_members(members: &[widl_syntax::OrdinalMember], library: &mut Library, libraries: &Libraries, typespace: &mut Typespace, reporter: &mut Reporter) -> Option<Vec<CompiledOrdinalMember>> {
    let mut seen_ordinals = HashSet::new();
    let mut seen_names = HashSet::new();
    let mut out = Vec::new();
    for m in members {
        if m.ordinal == 0 || !seen_ordinals.insert(m.ordinal) {
            reporter.report(DiagnosticCode::WE02002, Some(&m.ordinal_span), &[m.ordinal.to_string(), "member ordinal".to_string()]);
            continue;
        }
        attributes::check_duplicates(&m.attributes, reporter);
        attributes::check_placement(&m.attributes, "member", reporter);
        match &m.body {
            OrdinalMemberBody::Reserved => out.push(CompiledOrdinalMember::Reserved(m.ordinal)),
            OrdinalMemberBody::Used { name, ty } => {
                if !seen_names.insert(name.text.clone()) {
                    reporter.report(DiagnosticCode::WE02002, Some(&m.span), &[name.text.clone(), "member".to_string()]);
                    continue;
                }
                if let Some(tid) = typeconv::resolve_type(ty, library, libraries, typespace, reporter) {
                    out.push(CompiledOrdinalMember::Used { ordinal: m.ordinal, name: name.text.clone(), ty: tid });
                }
            }
        }
    }
    Some(out)
}

/// Runs phases 3-5 of the pipeline over an already-`consume`d library:
/// computes the local declaration graph and a dependency-respecting compile
/// order (phase 5, moved earlier here since later phases need it), compiles
/// every declaration in that order (phase 3: constants, attributes, types),
/// then reports unused imports.
pub fn compile_library(mut library: Library, libraries: &Libraries, typespace: &mut Typespace, reporter: &mut Reporter) -> Library {
    let name_to_id = library.name_to_id.clone();
    let order = {
        let decls: Vec<(DeclId, &Decl)> = library.id_range().map(|id| (id, library.decl(id))).collect();
        let graph = DeclGraph::build(&decls, &name_to_id);
        graph.compute_order(|id| library.decl(id).span().clone(), reporter)
    };
    log::debug!("{}: ordered {} declaration(s) for compilation", library.name, order.len());
    library.topological_order = order.clone();

    for id in order {
        compile_decl(id, &mut library, libraries, typespace, reporter);
    }
    log::debug!("{}: compiled all declarations", library.name);

    resolver::check_unused_imports(&library, reporter);
    library
}
