use crate::literal::Literal;
use crate::name::Ident;
use crate::node::ast_node::AstNode;
use crate::node::dyn_node_ref::DynNodeRef;
use std::any::Any;
use widl_diagnostics::Span;

/// A single `@name("arg")`-style attribute occurrence, attached to a
/// declaration, member, or method.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: Ident,
    pub arg: Option<Literal>,
    pub span: Span,
}

impl AstNode for Attribute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn children<'a>(&'a self, push: &mut dyn FnMut(DynNodeRef<'a>)) {
        push(DynNodeRef(&self.name));
        if let Some(arg) = &self.arg {
            push(DynNodeRef(arg));
        }
    }

    fn node_kind(&self) -> &'static str {
        "Attribute"
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.name.text.clone())
    }
}

pub type AttributeList = Vec<Attribute>;

pub fn find<'a>(attrs: &'a AttributeList, name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|a| a.name.text.eq_ignore_ascii_case(name))
}
