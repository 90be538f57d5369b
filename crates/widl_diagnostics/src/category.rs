use serde::{Deserialize, Serialize};

/// Groups a `DiagnosticCode` into the taxonomy the compiler checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Syntax,
    Name,
    Type,
    Attribute,
    Ordinal,
    Layout,
    Configuration,
}
