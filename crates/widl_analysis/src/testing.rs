use crate::compile::compile_library;
use crate::library::{consume, Library};
use crate::libraries::Libraries;
use crate::typespace::Typespace;
use widl_diagnostics::{Reporter, SourceFile};

/// Drives a whole-library compile from an inline source string, the way
/// the corpus's own compiler harnesses build a fixture without touching
/// disk. Only available behind the `testing` feature.
pub struct TestLibrary {
    pub library: Library,
    pub typespace: Typespace,
    pub reporter: Reporter,
}

impl TestLibrary {
    pub fn compile(name: &str, source: &str) -> Self {
        Self::compile_with_deps(name, source, &Libraries::new())
    }

    pub fn compile_with_deps(name: &str, source: &str, libraries: &Libraries) -> Self {
        let mut reporter = Reporter::new();
        let file = SourceFile::new(format!("{name}.widl"), source);
        let tree = widl_parser::parse_file(file, &mut reporter);
        let library = consume(name.to_string(), vec![tree], &mut reporter);
        let mut typespace = Typespace::new();
        let library = compile_library(library, libraries, &mut typespace, &mut reporter);
        Self { library, typespace, reporter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_minimal_library() {
        let t = TestLibrary::compile(
            "test.min",
            r#"
            library test.min;

            const MAX_SIZE uint32 = 256;

            struct Point {
                x int32;
                y int32;
            };
            "#,
        );
        assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
        assert_eq!(t.library.raw_decls.len(), 2);
    }

    #[test]
    fn reports_unknown_reference() {
        let t = TestLibrary::compile(
            "test.bad",
            r#"
            library test.bad;

            struct Widget {
                size Missing;
            };
            "#,
        );
        assert!(t.reporter.has_errors());
    }

    #[test]
    fn detects_self_referential_struct() {
        let t = TestLibrary::compile(
            "test.cycle",
            r#"
            library test.cycle;

            struct Node {
                next Node;
            };
            "#,
        );
        assert!(t.reporter.has_errors());
    }

    #[test]
    fn assigns_distinct_method_ordinals() {
        let t = TestLibrary::compile(
            "test.proto",
            r#"
            library test.proto;

            protocol Calculator {
                Add(a int32, b int32) -> (sum int32);
                Subtract(a int32, b int32) -> (difference int32);
            };
            "#,
        );
        assert!(!t.reporter.has_errors(), "{:?}", t.reporter.diagnostics());
        let id = *t.library.name_to_id.get("Calculator").unwrap();
        let Some(crate::library::CompiledDecl::Protocol { methods, .. }) = t.library.compiled(id) else { panic!("not a protocol") };
        assert_eq!(methods.len(), 2);
        assert_ne!(methods[0].ordinal, methods[1].ordinal);
        assert_ne!(methods[0].ordinal, 0);
    }
}
