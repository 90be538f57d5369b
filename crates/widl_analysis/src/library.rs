use crate::constant::ConstantValue;
use crate::typespace::TypeId;
use std::collections::HashMap;
use widl_diagnostics::{DiagnosticCode, Reporter, Span};
use widl_syntax::{AttributeList, Decl, SourceTree, Strictness};

/// Arena index into `Library::raw_decls` / `Library::compiled`. Stable for
/// the lifetime of the library; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

#[derive(Debug, Clone)]
pub struct CompiledStructMember {
    pub name: String,
    pub ty: TypeId,
    pub default: Option<ConstantValue>,
}

#[derive(Debug, Clone)]
pub enum CompiledOrdinalMember {
    Reserved(u64),
    Used { ordinal: u64, name: String, ty: TypeId },
}

#[derive(Debug, Clone)]
pub struct CompiledMethod {
    pub name: String,
    pub selector: String,
    pub ordinal: u64,
    pub request: Option<Vec<CompiledStructMember>>,
    pub response: Option<Vec<CompiledStructMember>>,
    pub error: Option<TypeId>,
    pub attributes: AttributeList,
}

/// A declaration after constant evaluation and type canonicalization. Each
/// variant mirrors its `widl_syntax::Decl` counterpart with `TypeConstructor`
/// replaced by `TypeId` and `Constant` replaced by `ConstantValue`.
#[derive(Debug, Clone)]
pub enum CompiledDecl {
    Const {
        ty: TypeId,
        value: ConstantValue,
    },
    Bits {
        underlying: TypeId,
        strictness: Strictness,
        members: Vec<(String, ConstantValue)>,
        resource: bool,
    },
    Enum {
        underlying: TypeId,
        strictness: Strictness,
        members: Vec<(String, ConstantValue)>,
        unknown_member: Option<String>,
        resource: bool,
    },
    Struct {
        members: Vec<CompiledStructMember>,
        resource: bool,
    },
    Table {
        members: Vec<CompiledOrdinalMember>,
        resource: bool,
    },
    Union {
        members: Vec<CompiledOrdinalMember>,
        strictness: Strictness,
        resource: bool,
    },
    Protocol {
        methods: Vec<CompiledMethod>,
        composed_from: Vec<DeclId>,
    },
    Service {
        members: Vec<(String, DeclId)>,
    },
    TypeAlias {
        target: TypeId,
    },
    ResourceDefinition {
        underlying: TypeId,
        properties: Vec<(String, TypeId)>,
    },
}

#[derive(Debug, Clone)]
pub struct ResolvedUsing {
    pub library_name: String,
    pub alias: Option<String>,
    pub span: Span,
    pub used: bool,
}

/// One compiled library: its own declarations in a single name scope, the
/// libraries it imports, and (once compiled) a deterministic topological
/// declaration order.
pub struct Library {
    pub name: String,
    pub raw_decls: Vec<Decl>,
    pub compiled: Vec<Option<CompiledDecl>>,
    pub name_to_id: HashMap<String, DeclId>,
    pub usings: Vec<ResolvedUsing>,
    pub topological_order: Vec<DeclId>,
}

impl Library {
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.raw_decls[id.0 as usize]
    }

    pub fn compiled(&self, id: DeclId) -> Option<&CompiledDecl> {
        self.compiled[id.0 as usize].as_ref()
    }

    pub fn id_range(&self) -> impl Iterator<Item = DeclId> {
        (0..self.raw_decls.len() as u32).map(DeclId)
    }

    pub fn fully_qualified_name(&self, id: DeclId) -> String {
        format!("{}/{}", self.name, self.decl(id).name().text)
    }
}

/// Merges every file's parse into one library: folds declarations into a
/// single name scope (duplicates are an error) and collects `using` lines
/// (duplicate or self imports are an error). Declaration order within a
/// file is preserved by insertion order into `raw_decls`.
pub fn consume(library_name: String, trees: Vec<SourceTree>, reporter: &mut Reporter) -> Library {
    let mut raw_decls = Vec::new();
    let mut name_to_id = HashMap::new();
    let mut usings = Vec::new();
    let mut seen_imports: HashMap<String, Span> = HashMap::new();

    for tree in trees {
        for using in &tree.usings {
            let imported = using.path.to_string();
            if imported == library_name {
                reporter.report(DiagnosticCode::WE02007, Some(&using.span), &[imported.clone()]);
                continue;
            }
            if let Some(first) = seen_imports.get(&imported) {
                let _ = first;
                reporter.report(DiagnosticCode::WE02006, Some(&using.span), &[imported.clone()]);
                continue;
            }
            seen_imports.insert(imported.clone(), using.span.clone());
            usings.push(ResolvedUsing {
                library_name: imported,
                alias: using.alias.as_ref().map(|a| a.text.clone()),
                span: using.span.clone(),
                used: false,
            });
        }

        if let (Some(first_decl), Some(last_using)) = (tree.declarations.first(), tree.usings.last()) {
            if first_decl.span().range().start < last_using.span.range().start {
                reporter.report(DiagnosticCode::WW02001, Some(&last_using.span), &[]);
            }
        }

        for decl in tree.declarations {
            let name = decl.name().text.clone();
            if let Some(existing) = name_to_id.get(&name) {
                let existing_id: &DeclId = existing;
                let _ = existing_id;
                reporter.report(DiagnosticCode::WE02001, Some(decl.span()), &[name.clone()]);
                continue;
            }
            let id = DeclId(raw_decls.len() as u32);
            name_to_id.insert(name, id);
            raw_decls.push(decl);
        }
    }

    let compiled = vec![None; raw_decls.len()];
    Library { name: library_name, raw_decls, compiled, name_to_id, usings, topological_order: Vec::new() }
}
