use crate::attribute::AttributeList;
use crate::constant::Constant;
use crate::name::{CompoundIdentifier, Ident};
use crate::node::ast_node::AstNode;
use crate::node::dyn_node_ref::DynNodeRef;
use crate::type_constructor::TypeConstructor;
use std::any::Any;
use widl_diagnostics::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    Strict,
    Flexible,
}

#[derive(Debug, Clone)]
pub struct ValueMember {
    pub name: Ident,
    pub value: Constant,
    pub attributes: AttributeList,
    pub doc: Option<String>,
    pub span: Span,
}

impl AstNode for ValueMember {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.name));
        push(DynNodeRef(&self.value));
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.name.text.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StructMember {
    pub name: Ident,
    pub ty: TypeConstructor,
    pub default: Option<Constant>,
    pub attributes: AttributeList,
    pub doc: Option<String>,
    pub span: Span,
}

impl AstNode for StructMember {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.name));
        push(DynNodeRef(&self.ty));
        if let Some(d) = &self.default {
            push(DynNodeRef(d));
        }
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.name.text.clone())
    }
}

#[derive(Debug, Clone)]
pub enum OrdinalMemberBody {
    Reserved,
    Used { name: Ident, ty: TypeConstructor },
}

/// One table or union member, keyed by its source-written ordinal literal.
/// The ordinal is validated for positivity/contiguity during consume.
#[derive(Debug, Clone)]
pub struct OrdinalMember {
    pub ordinal: u64,
    pub ordinal_span: Span,
    pub body: OrdinalMemberBody,
    pub attributes: AttributeList,
    pub doc: Option<String>,
    pub span: Span,
}

impl AstNode for OrdinalMember {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        if let OrdinalMemberBody::Used { name, ty } = &self.body {
            push(DynNodeRef(name));
            push(DynNodeRef(ty));
        }
    }

    fn node_label_value(&self) -> Option<String> {
        match &self.body {
            OrdinalMemberBody::Reserved => Some(format!("{}: reserved", self.ordinal)),
            OrdinalMemberBody::Used { name, .. } => Some(format!("{}: {}", self.ordinal, name.text)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: Ident,
    pub attributes: AttributeList,
    pub request: Option<Vec<StructMember>>,
    pub response: Option<Vec<StructMember>>,
    pub error: Option<TypeConstructor>,
    pub doc: Option<String>,
    pub span: Span,
}

impl AstNode for Method {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.name));
        for m in self.request.iter().flatten() {
            push(DynNodeRef(m));
        }
        for m in self.response.iter().flatten() {
            push(DynNodeRef(m));
        }
        if let Some(e) = &self.error {
            push(DynNodeRef(e));
        }
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.name.text.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ServiceMember {
    pub name: Ident,
    pub protocol: TypeConstructor,
    pub attributes: AttributeList,
    pub doc: Option<String>,
    pub span: Span,
}

impl AstNode for ServiceMember {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.name));
        push(DynNodeRef(&self.protocol));
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.name.text.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ResourceProperty {
    pub name: Ident,
    pub ty: TypeConstructor,
    pub span: Span,
}

impl AstNode for ResourceProperty {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.name));
        push(DynNodeRef(&self.ty));
    }
}

/// A top-level declaration exactly as parsed, before name resolution or
/// type canonicalization. Every variant carries a name, its own span, and
/// an attribute list; per-kind fields follow the shapes the language
/// actually allows.
#[derive(Debug, Clone)]
pub enum Decl {
    Const {
        name: Ident,
        ty: TypeConstructor,
        value: Constant,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    Bits {
        name: Ident,
        underlying: Option<TypeConstructor>,
        strictness: Strictness,
        members: Vec<ValueMember>,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    Enum {
        name: Ident,
        underlying: Option<TypeConstructor>,
        strictness: Strictness,
        members: Vec<ValueMember>,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    Struct {
        name: Ident,
        members: Vec<StructMember>,
        resource: bool,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    Table {
        name: Ident,
        members: Vec<OrdinalMember>,
        resource: bool,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    Union {
        name: Ident,
        members: Vec<OrdinalMember>,
        strictness: Strictness,
        resource: bool,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    Protocol {
        name: Ident,
        methods: Vec<Method>,
        composes: Vec<CompoundIdentifier>,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    Service {
        name: Ident,
        members: Vec<ServiceMember>,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    TypeAlias {
        name: Ident,
        target: TypeConstructor,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
    ResourceDefinition {
        name: Ident,
        underlying: TypeConstructor,
        properties: Vec<ResourceProperty>,
        attributes: AttributeList,
        doc: Option<String>,
        span: Span,
    },
}

impl Decl {
    pub fn name(&self) -> &Ident {
        match self {
            Decl::Const { name, .. }
            | Decl::Bits { name, .. }
            | Decl::Enum { name, .. }
            | Decl::Struct { name, .. }
            | Decl::Table { name, .. }
            | Decl::Union { name, .. }
            | Decl::Protocol { name, .. }
            | Decl::Service { name, .. }
            | Decl::TypeAlias { name, .. }
            | Decl::ResourceDefinition { name, .. } => name,
        }
    }

    pub fn attributes(&self) -> &AttributeList {
        match self {
            Decl::Const { attributes, .. }
            | Decl::Bits { attributes, .. }
            | Decl::Enum { attributes, .. }
            | Decl::Struct { attributes, .. }
            | Decl::Table { attributes, .. }
            | Decl::Union { attributes, .. }
            | Decl::Protocol { attributes, .. }
            | Decl::Service { attributes, .. }
            | Decl::TypeAlias { attributes, .. }
            | Decl::ResourceDefinition { attributes, .. } => attributes,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Decl::Const { span, .. }
            | Decl::Bits { span, .. }
            | Decl::Enum { span, .. }
            | Decl::Struct { span, .. }
            | Decl::Table { span, .. }
            | Decl::Union { span, .. }
            | Decl::Protocol { span, .. }
            | Decl::Service { span, .. }
            | Decl::TypeAlias { span, .. }
            | Decl::ResourceDefinition { span, .. } => span,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Const { .. } => "const",
            Decl::Bits { .. } => "bits",
            Decl::Enum { .. } => "enum",
            Decl::Struct { .. } => "struct",
            Decl::Table { .. } => "table",
            Decl::Union { .. } => "union",
            Decl::Protocol { .. } => "protocol",
            Decl::Service { .. } => "service",
            Decl::TypeAlias { .. } => "type alias",
            Decl::ResourceDefinition { .. } => "resource definition",
        }
    }
}

impl AstNode for Decl {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(self.name()));
        match self {
            Decl::Const { ty, value, .. } => {
                push(DynNodeRef(ty));
                push(DynNodeRef(value));
            }
            Decl::Bits { underlying, members, .. } | Decl::Enum { underlying, members, .. } => {
                if let Some(u) = underlying {
                    push(DynNodeRef(u));
                }
                for m in members {
                    push(DynNodeRef(m));
                }
            }
            Decl::Struct { members, .. } => {
                for m in members {
                    push(DynNodeRef(m));
                }
            }
            Decl::Table { members, .. } | Decl::Union { members, .. } => {
                for m in members {
                    push(DynNodeRef(m));
                }
            }
            Decl::Protocol { methods, composes, .. } => {
                for m in methods {
                    push(DynNodeRef(m));
                }
                for c in composes {
                    push(DynNodeRef(c));
                }
            }
            Decl::Service { members, .. } => {
                for m in members {
                    push(DynNodeRef(m));
                }
            }
            Decl::TypeAlias { target, .. } => push(DynNodeRef(target)),
            Decl::ResourceDefinition { underlying, properties, .. } => {
                push(DynNodeRef(underlying));
                for p in properties {
                    push(DynNodeRef(p));
                }
            }
        }
    }

    fn node_kind(&self) -> &'static str {
        self.kind_name()
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.name().text.clone())
    }
}

#[derive(Debug, Clone)]
pub struct LibraryDeclaration {
    pub path: CompoundIdentifier,
    pub attributes: AttributeList,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Using {
    pub path: CompoundIdentifier,
    pub alias: Option<Ident>,
    pub span: Span,
}

impl AstNode for Using {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.path));
        if let Some(a) = &self.alias {
            push(DynNodeRef(a));
        }
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.path.to_string())
    }
}

/// The raw parse of a single source file: one library declaration, its
/// imports, and the declarations found in this file (a library spans many
/// files; the consumer merges them).
#[derive(Debug, Clone)]
pub struct SourceTree {
    pub library: LibraryDeclaration,
    pub usings: Vec<Using>,
    pub declarations: Vec<Decl>,
}

impl AstNode for SourceTree {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.library.path));
        for u in &self.usings {
            push(DynNodeRef(u));
        }
        for d in &self.declarations {
            push(DynNodeRef(d));
        }
    }

    fn node_kind(&self) -> &'static str {
        "SourceTree"
    }
}
