use crate::keywords;
use crate::numeric;
use widl_diagnostics::{ByteRange, DiagnosticCode, Reporter, SourceFile};
use widl_syntax::{Punctuation, Token, TokenKind, Trivia, TriviaKind};

/// Produces tokens one at a time from a source file, attaching the
/// whitespace/comment trivia that preceded each token. Doc comments
/// (`///`) are their own token kind rather than trivia, since the parser
/// attaches them to the following declaration.
pub struct Lexer<'r> {
    file: SourceFile,
    pos: usize,
    reporter: &'r mut Reporter,
}

impl<'r> Lexer<'r> {
    pub fn new(file: SourceFile, reporter: &'r mut Reporter) -> Self {
        Self { file, pos: 0, reporter }
    }

    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    pub fn report(&mut self, code: DiagnosticCode, span: &widl_diagnostics::Span, args: &[String]) {
        self.reporter.report(code, Some(span), args);
    }

    fn rest(&self) -> &str {
        &self.file.text()[self.pos..]
    }

    fn bump(&mut self, len: usize) -> ByteRange {
        let start = self.pos;
        self.pos += len;
        ByteRange::new(start, self.pos)
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes whitespace and `//` line comments, returning them as trivia.
    /// Stops right before a `///` doc comment so the caller can tokenize it.
    fn scan_trivia(&mut self) -> Vec<Trivia> {
        let mut trivia = Vec::new();
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if rest.starts_with("///") {
                break;
            }
            if rest.starts_with("//") {
                let len = rest.find('\n').unwrap_or(rest.len());
                let range = self.bump(len);
                trivia.push(Trivia { kind: TriviaKind::LineComment, span: self.file.span(range) });
                continue;
            }
            let ws_len = rest.chars().take_while(|c| c.is_whitespace()).map(|c| c.len_utf8()).sum::<usize>();
            if ws_len > 0 {
                let range = self.bump(ws_len);
                trivia.push(Trivia { kind: TriviaKind::Whitespace, span: self.file.span(range) });
                continue;
            }
            break;
        }
        trivia
    }

    fn scan_identifier_len(rest: &str) -> usize {
        rest.chars()
            .enumerate()
            .take_while(|(i, c)| if *i == 0 { c.is_ascii_alphabetic() || *c == '_' } else { c.is_ascii_alphanumeric() || *c == '_' })
            .count()
    }

    fn scan_string_len(rest: &str) -> Option<usize> {
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;
        if first != '"' {
            return None;
        }
        for (i, c) in chars {
            if c == '"' {
                return Some(i + 1);
            }
        }
        None
    }

    /// Pulls the next token, or `None` once the file is exhausted.
    pub fn next_token(&mut self) -> Option<Token> {
        let leading_trivia = self.scan_trivia();
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }

        if rest.starts_with("///") {
            let len = rest.find('\n').unwrap_or(rest.len());
            let range = self.bump(len);
            return Some(Token { kind: TokenKind::DocComment, span: self.file.span(range), leading_trivia });
        }

        let c = self.peek_char().unwrap();

        if c.is_ascii_alphabetic() || c == '_' {
            let len = Self::scan_identifier_len(rest);
            let range = self.bump(len);
            let text = self.file.slice(range);
            let kind = match keywords::lookup(text) {
                Some(kw) => TokenKind::Keyword(kw),
                None => TokenKind::Identifier,
            };
            return Some(Token { kind, span: self.file.span(range), leading_trivia });
        }

        if c.is_ascii_digit() {
            if let Some(len) = numeric::scan(rest) {
                let range = self.bump(len);
                return Some(Token { kind: TokenKind::NumericLiteral, span: self.file.span(range), leading_trivia });
            }
        }

        if c == '"' {
            if let Some(len) = Self::scan_string_len(rest) {
                let range = self.bump(len);
                return Some(Token { kind: TokenKind::StringLiteral, span: self.file.span(range), leading_trivia });
            }
            let range = self.bump(rest.len());
            let span = self.file.span(range);
            self.reporter.report(DiagnosticCode::WE01003, Some(&span), &["string".into()]);
            return Some(Token { kind: TokenKind::Invalid, span, leading_trivia });
        }

        if rest.starts_with("->") {
            let range = self.bump(2);
            return Some(Token { kind: TokenKind::Punctuation(Punctuation::Arrow), span: self.file.span(range), leading_trivia });
        }

        let punct = match c {
            '(' => Some(Punctuation::LParen),
            ')' => Some(Punctuation::RParen),
            '{' => Some(Punctuation::LBrace),
            '}' => Some(Punctuation::RBrace),
            '<' => Some(Punctuation::LAngle),
            '>' => Some(Punctuation::RAngle),
            '[' => Some(Punctuation::LBracket),
            ']' => Some(Punctuation::RBracket),
            ';' => Some(Punctuation::Semicolon),
            ':' => Some(Punctuation::Colon),
            ',' => Some(Punctuation::Comma),
            '.' => Some(Punctuation::Dot),
            '=' => Some(Punctuation::Equals),
            '?' => Some(Punctuation::Question),
            '|' => Some(Punctuation::Pipe),
            '@' => Some(Punctuation::At),
            '-' => Some(Punctuation::Minus),
            _ => None,
        };
        if let Some(p) = punct {
            let range = self.bump(c.len_utf8());
            return Some(Token { kind: TokenKind::Punctuation(p), span: self.file.span(range), leading_trivia });
        }

        let range = self.bump(c.len_utf8());
        let span = self.file.span(range);
        self.reporter.report(DiagnosticCode::WE01002, Some(&span), &[c.to_string()]);
        Some(Token { kind: TokenKind::Invalid, span, leading_trivia })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let file = SourceFile::new("t.widl", src);
        let mut reporter = Reporter::new();
        let mut lexer = Lexer::new(file, &mut reporter);
        let mut out = Vec::new();
        while let Some(t) = lexer.next_token() {
            out.push(t);
        }
        out
    }

    #[test]
    fn lexes_library_declaration() {
        let toks = tokens("library corp.mem;\n");
        assert_eq!(toks.len(), 4);
        assert!(matches!(toks[0].kind, TokenKind::Keyword(widl_syntax::Keyword::Library)));
        assert!(matches!(toks[1].kind, TokenKind::Identifier));
        assert_eq!(toks[1].text(), "corp");
    }

    #[test]
    fn doc_comment_is_its_own_token() {
        let toks = tokens("/// does a thing\nconst X uint32 = 1;");
        assert!(matches!(toks[0].kind, TokenKind::DocComment));
    }

    #[test]
    fn minus_is_its_own_punctuation_token() {
        let toks = tokens("-42");
        assert!(matches!(toks[0].kind, TokenKind::Punctuation(widl_syntax::Punctuation::Minus)));
        assert!(matches!(toks[1].kind, TokenKind::NumericLiteral));
    }

    #[test]
    fn invalid_character_is_reported() {
        let file = SourceFile::new("t.widl", "const X uint32 = 1 # 2;");
        let mut reporter = Reporter::new();
        let mut lexer = Lexer::new(file, &mut reporter);
        while lexer.next_token().is_some() {}
        assert!(reporter.has_errors());
    }
}
