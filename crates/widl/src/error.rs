use thiserror::Error;

/// Host-facing failures that are not themselves diagnostics: they reject an
/// API call outright rather than accumulating in a `Reporter`. A
/// `DiagnosticCode` is a compiled-away semantic complaint about a library's
/// own source; a `CompileError` is a registry-level misuse the caller must
/// notice immediately.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("library `{0}` is already registered in this session")]
    DuplicateLibrary(String),

    #[error("library `{0}` was never compiled in this session")]
    UnknownLibrary(String),

    #[error("failed to serialize IR for `{0}`: {1}")]
    Serialize(String, #[source] serde_json::Error),
}
