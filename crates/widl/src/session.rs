use crate::error::CompileError;
use std::collections::HashMap;
use widl_analysis::library::consume;
use widl_analysis::{Library, Libraries, Typespace};
use widl_diagnostics::{Reporter, SourceFile};
use widl_typeshape::{compute_library_shapes, LibraryShapes};

/// A process-wide compile session: a `Libraries` registry plus the
/// typeshapes and source files produced alongside each compiled library,
/// kept around so later `using` declarations and diagnostic rendering can
/// find them by name.
#[derive(Default)]
pub struct Session {
    libraries: Libraries,
    typespaces: HashMap<String, Typespace>,
    shapes: HashMap<String, LibraryShapes>,
    files: HashMap<String, Vec<SourceFile>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the full pipeline over one library: parse every source file
    /// (phase 1), resolve `using`s and compile every declaration in
    /// dependency order (phases 2-5), compute both wire typeshapes (phase
    /// 6), then check the typeshape-dependent attribute constraints
    /// (phase 7). Libraries a `using` depends on must already have been
    /// compiled in this session. Diagnostics never abort the pipeline; they
    /// accumulate in `reporter` regardless of how far compilation got.
    pub fn compile_library(&mut self, name: &str, sources: &[(&str, &str)], reporter: &mut Reporter) -> Result<(), CompileError> {
        if self.libraries.get(name).is_some() {
            return Err(CompileError::DuplicateLibrary(name.to_string()));
        }

        log::info!("compiling library {name}");
        let files: Vec<SourceFile> = sources.iter().map(|(file_name, text)| SourceFile::new((*file_name).to_string(), *text)).collect();
        let trees = files.iter().map(|file| widl_parser::parse_file(file.clone(), reporter)).collect();

        let library = consume(name.to_string(), trees, reporter);
        log::debug!("{name}: consumed {} declaration(s)", library.raw_decls.len());

        let mut typespace = Typespace::new();
        let library = widl_analysis::compile_library(library, &self.libraries, &mut typespace, reporter);
        log::debug!("{name}: compiled in dependency order");

        let shapes = compute_library_shapes(&library, &typespace);
        widl_typeshape::constraints::check(&library, &shapes, reporter);

        self.libraries.insert(library, reporter);
        self.typespaces.insert(name.to_string(), typespace);
        self.shapes.insert(name.to_string(), shapes);
        self.files.insert(name.to_string(), files);
        Ok(())
    }

    pub fn library(&self, name: &str) -> Option<&Library> {
        self.libraries.get(name)
    }

    pub fn shapes(&self, name: &str) -> Option<&LibraryShapes> {
        self.shapes.get(name)
    }

    pub fn files(&self, name: &str) -> &[SourceFile] {
        self.files.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Renders the compiled library's IR (phases 1-6 plus JSON emission) as
    /// a compact JSON string. Does not include phase 7's attribute-limit
    /// diagnostics, since those live on the `Reporter` passed to
    /// `compile_library`, not in the IR tree itself.
    pub fn ir_json(&self, name: &str) -> Result<String, CompileError> {
        let library = self.library(name).ok_or_else(|| CompileError::UnknownLibrary(name.to_string()))?;
        let typespace = self.typespaces.get(name).ok_or_else(|| CompileError::UnknownLibrary(name.to_string()))?;
        widl_ir::to_json(library, typespace).map_err(|e| CompileError::Serialize(name.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_minimal_library_and_emits_ir() {
        let mut session = Session::new();
        let mut reporter = Reporter::new();
        session
            .compile_library(
                "corp.example",
                &[("example.widl", "library corp.example;\n\nstruct Point {\n x int32;\n y int32;\n};\n")],
                &mut reporter,
            )
            .unwrap();
        assert!(!reporter.has_errors(), "{:?}", reporter.diagnostics());
        assert!(session.library("corp.example").is_some());
        let json = session.ir_json("corp.example").unwrap();
        assert!(json.contains("\"Point\""));
    }

    #[test]
    fn rejects_recompiling_the_same_library_name() {
        let mut session = Session::new();
        let mut reporter = Reporter::new();
        session.compile_library("dup", &[("a.widl", "library dup;\n")], &mut reporter).unwrap();
        let err = session.compile_library("dup", &[("b.widl", "library dup;\n")], &mut reporter).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateLibrary(n) if n == "dup"));
    }

    #[test]
    fn a_dependent_library_can_see_an_earlier_one() {
        let mut session = Session::new();
        let mut reporter = Reporter::new();
        session.compile_library("base", &[("base.widl", "library base;\n\nstruct Point {\n x int32;\n y int32;\n};\n")], &mut reporter).unwrap();
        session
            .compile_library("user", &[("user.widl", "library user;\n\nusing base;\n\nstruct Widget {\n origin base.Point;\n};\n")], &mut reporter)
            .unwrap();
        assert!(!reporter.has_errors(), "{:?}", reporter.diagnostics());
    }
}
