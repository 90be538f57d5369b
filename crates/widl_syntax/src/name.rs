use crate::node::ast_node::AstNode;
use std::any::Any;
use std::fmt;
use widl_diagnostics::Span;

/// A single, unqualified identifier as it appeared in source.
#[derive(Debug, Clone)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

impl Ident {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self { text: text.into(), span }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl AstNode for Ident {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn node_kind(&self) -> &'static str {
        "Ident"
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.text.clone())
    }
}

/// A dotted reference as written in source, e.g. `corp.mem.Buffer` or a
/// bare `Buffer`. Resolution into a library-qualified name happens later.
#[derive(Debug, Clone)]
pub struct CompoundIdentifier {
    pub parts: Vec<String>,
    pub span: Span,
}

impl CompoundIdentifier {
    pub fn new(parts: Vec<String>, span: Span) -> Self {
        Self { parts, span }
    }

    pub fn is_simple(&self) -> bool {
        self.parts.len() == 1
    }

    pub fn last(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for CompoundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

impl AstNode for CompoundIdentifier {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn node_kind(&self) -> &'static str {
        "CompoundIdentifier"
    }

    fn node_label_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}
