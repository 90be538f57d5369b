//! Host-facing entry point for the widlc semantic core: ties parsing
//! (`widl_parser`), library consumption and compilation (`widl_analysis`),
//! wire typeshape computation and attribute-limit checking
//! (`widl_typeshape`), and JSON IR emission (`widl_ir`) into the seven-phase
//! pipeline of one `Session::compile_library` call per library.

mod error;
mod render;
mod session;

pub use error::CompileError;
pub use render::render_all;
pub use session::Session;

pub use widl_analysis::{Library, Libraries, Typespace};
pub use widl_diagnostics::{Diagnostic, DiagnosticCode, Reporter, SourceFile};
pub use widl_typeshape::{LibraryShapes, TypeShape, WireFormat};
