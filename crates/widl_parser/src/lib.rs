mod keywords;
mod lexer;
mod numeric;
mod parser;

pub use lexer::Lexer;
pub use parser::Parser;

use widl_diagnostics::{Reporter, SourceFile};
use widl_syntax::SourceTree;

/// Parses one source file into a raw syntax tree, reporting lexical and
/// syntactic errors into `reporter` rather than failing fast.
pub fn parse_file(file: SourceFile, reporter: &mut Reporter) -> SourceTree {
    let lexer = Lexer::new(file, reporter);
    let parser = Parser::new(lexer);
    parser.parse_source_tree()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_small_library() {
        let src = r#"
library corp.example;

using io;

/// A point in space.
struct Point {
    x int32;
    y int32;
};

const MAX_POINTS uint32 = 16;

type Meters = uint32;

protocol PointStore {
    Add(p Point) -> (ok bool);
};
"#;
        let file = SourceFile::new("example.widl", src);
        let mut reporter = Reporter::new();
        let tree = parse_file(file, &mut reporter);
        assert!(!reporter.has_errors(), "{:?}", reporter.diagnostics());
        assert_eq!(tree.library.path.to_string(), "corp.example");
        assert_eq!(tree.usings.len(), 1);
        assert_eq!(tree.declarations.len(), 4);
    }

    #[test]
    fn parses_a_negative_numeric_constant() {
        let src = "library t;\n\nconst A int64 = -42;\n";
        let file = SourceFile::new("t.widl", src);
        let mut reporter = Reporter::new();
        let tree = parse_file(file, &mut reporter);
        assert!(!reporter.has_errors(), "{:?}", reporter.diagnostics());
        let widl_syntax::Decl::Const { value, .. } = &tree.declarations[0] else { panic!("not a const") };
        let widl_syntax::Constant::Literal(lit) = value else { panic!("not a literal") };
        let widl_syntax::LiteralValue::Numeric(text) = &lit.value else { panic!("not numeric") };
        assert_eq!(text, "-42");
    }

    #[test]
    fn recovers_after_a_syntax_error() {
        let src = r#"
library bad;

const A uint32 = ;

const B uint32 = 5;
"#;
        let file = SourceFile::new("bad.widl", src);
        let mut reporter = Reporter::new();
        let tree = parse_file(file, &mut reporter);
        assert!(reporter.has_errors());
        assert_eq!(tree.declarations.len(), 1);
        assert_eq!(tree.declarations[0].name().text, "B");
    }
}
