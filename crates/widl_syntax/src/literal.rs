use crate::node::ast_node::AstNode;
use std::any::Any;
use widl_diagnostics::Span;

#[derive(Debug, Clone)]
pub enum LiteralValue {
    Numeric(String),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub value: LiteralValue,
    pub span: Span,
}

impl AstNode for Literal {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn node_kind(&self) -> &'static str {
        "Literal"
    }

    fn node_label_value(&self) -> Option<String> {
        Some(match &self.value {
            LiteralValue::Numeric(s) => s.clone(),
            LiteralValue::Str(s) => format!("\"{s}\""),
            LiteralValue::Bool(b) => b.to_string(),
        })
    }
}
