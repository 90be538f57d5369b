use crate::constant::Constant;
use crate::name::{CompoundIdentifier, Ident};
use crate::node::ast_node::AstNode;
use crate::node::dyn_node_ref::DynNodeRef;
use std::any::Any;
use widl_diagnostics::Span;

/// A type reference as written in source, with its four optional parameter
/// slots. Each slot may come from the use site or be pre-bound by a type
/// alias; the analysis phase rejects a slot bound twice along that chain.
#[derive(Debug, Clone)]
pub struct TypeConstructor {
    pub name: CompoundIdentifier,
    pub element_type: Option<Box<TypeConstructor>>,
    pub size: Option<Box<Constant>>,
    pub handle_subtype: Option<Ident>,
    pub handle_rights: Option<Box<Constant>>,
    pub nullable: bool,
    pub span: Span,
}

impl TypeConstructor {
    pub fn simple(name: CompoundIdentifier, span: Span) -> Self {
        Self {
            name,
            element_type: None,
            size: None,
            handle_subtype: None,
            handle_rights: None,
            nullable: false,
            span,
        }
    }
}

impl AstNode for TypeConstructor {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.name));
        if let Some(e) = &self.element_type {
            push(DynNodeRef(e.as_ref()));
        }
        if let Some(s) = &self.size {
            push(DynNodeRef(s.as_ref()));
        }
        if let Some(h) = &self.handle_subtype {
            push(DynNodeRef(h));
        }
        if let Some(r) = &self.handle_rights {
            push(DynNodeRef(r.as_ref()));
        }
    }

    fn node_kind(&self) -> &'static str {
        "TypeConstructor"
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.name.to_string())
    }
}
