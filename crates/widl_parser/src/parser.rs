use crate::lexer::Lexer;
use widl_diagnostics::{DiagnosticCode, Span};
use widl_syntax::{
    Attribute, AttributeList, CompoundIdentifier, Constant, Decl, Ident, Keyword, LibraryDeclaration,
    Literal, LiteralValue, Method, OrdinalMember, OrdinalMemberBody, Punctuation, ResourceProperty,
    ServiceMember, SourceTree, Strictness, StructMember, Token, TokenKind, TypeConstructor, Using,
    ValueMember,
};

const DECL_START_KEYWORDS: &[Keyword] = &[
    Keyword::Const,
    Keyword::Bits,
    Keyword::Enum,
    Keyword::Struct,
    Keyword::Table,
    Keyword::Union,
    Keyword::Protocol,
    Keyword::Service,
    Keyword::Type,
    Keyword::Resource,
    Keyword::Strict,
    Keyword::Flexible,
    Keyword::Using,
];

/// LL(1)-with-one-extra-token-of-lookahead recursive-descent parser. A
/// syntax error reports once and synchronizes to the next declaration
/// boundary rather than aborting the whole parse.
pub struct Parser<'r> {
    lexer: Lexer<'r>,
    current: Option<Token>,
    lookahead: Option<Token>,
}

impl<'r> Parser<'r> {
    pub fn new(mut lexer: Lexer<'r>) -> Self {
        let current = lexer.next_token();
        let lookahead = lexer.next_token();
        Self { lexer, current, lookahead }
    }

    fn bump(&mut self) -> Option<Token> {
        let next = self.lexer.next_token();
        let new_current = self.lookahead.take();
        self.lookahead = next;
        std::mem::replace(&mut self.current, new_current)
    }

    fn kind(&self) -> Option<&TokenKind> {
        self.current.as_ref().map(|t| &t.kind)
    }

    fn kind2(&self) -> Option<&TokenKind> {
        self.lookahead.as_ref().map(|t| &t.kind)
    }

    fn span(&self) -> Option<Span> {
        self.current.as_ref().map(|t| t.span.clone())
    }

    fn doc_from(&self, token: &Token) -> Option<String> {
        Some(token.text().trim_start_matches('/').trim().to_string())
    }

    fn at_punct(&self, p: Punctuation) -> bool {
        matches!(self.kind(), Some(TokenKind::Punctuation(pp)) if *pp == p)
    }

    fn at_keyword(&self, k: Keyword) -> bool {
        matches!(self.kind(), Some(TokenKind::Keyword(kk)) if *kk == k)
    }

    fn keyword2(&self) -> Option<Keyword> {
        match self.kind2() {
            Some(TokenKind::Keyword(k)) => Some(*k),
            _ => None,
        }
    }

    fn report_here(&mut self, code: DiagnosticCode, args: &[String]) {
        if let Some(span) = self.span() {
            self.lexer.report(code, &span, args);
        }
    }

    fn unexpected(&mut self, expected: &str) {
        let found = self.current.as_ref().map(|t| t.text().to_string()).unwrap_or_else(|| "end of file".to_string());
        self.report_here(DiagnosticCode::WE01001, &[found, expected.to_string()]);
    }

    fn expect_punct(&mut self, p: Punctuation) -> Option<Token> {
        if self.at_punct(p) {
            self.bump()
        } else {
            self.unexpected(&format!("{p:?}"));
            None
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> Option<Token> {
        if self.at_keyword(k) {
            self.bump()
        } else {
            self.unexpected(&format!("{k:?}"));
            None
        }
    }

    fn expect_identifier(&mut self) -> Option<Ident> {
        if matches!(self.kind(), Some(TokenKind::Identifier)) {
            let tok = self.bump()?;
            Some(Ident::new(tok.text().to_string(), tok.span))
        } else {
            self.unexpected("identifier");
            None
        }
    }

    fn expect_numeric_literal(&mut self) -> Option<Token> {
        if matches!(self.kind(), Some(TokenKind::NumericLiteral)) {
            self.bump()
        } else {
            self.unexpected("numeric literal");
            None
        }
    }

    fn parse_compound_identifier(&mut self) -> Option<CompoundIdentifier> {
        let first = self.expect_identifier()?;
        let mut parts = vec![first.text.clone()];
        let mut span = first.span.clone();
        while self.at_punct(Punctuation::Dot) {
            self.bump();
            let next = self.expect_identifier()?;
            span = span.join(&next.span);
            parts.push(next.text);
        }
        Some(CompoundIdentifier::new(parts, span))
    }

    /// Skips tokens until the start of the next declaration (or EOF), so one
    /// syntax error does not prevent the rest of the file from parsing.
    fn synchronize(&mut self) {
        loop {
            match self.kind() {
                None => return,
                Some(TokenKind::Keyword(k)) if DECL_START_KEYWORDS.contains(k) => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn collect_doc_and_attributes(&mut self) -> (Option<String>, AttributeList) {
        let mut doc = None;
        if matches!(self.kind(), Some(TokenKind::DocComment)) {
            let tok = self.bump().unwrap();
            doc = self.doc_from(&tok);
        }
        let mut attributes = Vec::new();
        while self.at_punct(Punctuation::At) {
            if let Some(attr) = self.parse_attribute() {
                attributes.push(attr);
            } else {
                break;
            }
        }
        (doc, attributes)
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let at = self.expect_punct(Punctuation::At)?;
        let name = self.expect_identifier()?;
        let mut end_span = name.span.clone();
        let arg = if self.at_punct(Punctuation::LParen) {
            self.bump();
            let lit = self.parse_literal()?;
            end_span = lit.span.clone();
            let rparen = self.expect_punct(Punctuation::RParen)?;
            end_span = rparen.span;
            Some(lit)
        } else {
            None
        };
        Some(Attribute { name, arg, span: at.span.join(&end_span) })
    }

    fn parse_literal(&mut self) -> Option<Literal> {
        match self.kind() {
            Some(TokenKind::StringLiteral) => {
                let tok = self.bump()?;
                let text = tok.text();
                let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or("").to_string();
                Some(Literal { value: LiteralValue::Str(inner), span: tok.span })
            }
            Some(TokenKind::NumericLiteral) => {
                let tok = self.bump()?;
                Some(Literal { value: LiteralValue::Numeric(tok.text().to_string()), span: tok.span })
            }
            Some(TokenKind::Punctuation(Punctuation::Minus)) => {
                let minus = self.bump()?;
                let tok = self.expect_numeric_literal()?;
                let span = minus.span.join(&tok.span);
                Some(Literal { value: LiteralValue::Numeric(format!("-{}", tok.text())), span })
            }
            Some(TokenKind::Keyword(Keyword::True)) => {
                let tok = self.bump()?;
                Some(Literal { value: LiteralValue::Bool(true), span: tok.span })
            }
            Some(TokenKind::Keyword(Keyword::False)) => {
                let tok = self.bump()?;
                Some(Literal { value: LiteralValue::Bool(false), span: tok.span })
            }
            _ => {
                self.unexpected("literal");
                None
            }
        }
    }

    fn parse_constant_primary(&mut self) -> Option<Constant> {
        match self.kind() {
            Some(TokenKind::Identifier) => Some(Constant::Identifier(self.parse_compound_identifier()?)),
            _ => Some(Constant::Literal(self.parse_literal()?)),
        }
    }

    fn parse_constant(&mut self) -> Option<Constant> {
        let left = self.parse_constant_primary()?;
        if self.at_punct(Punctuation::Pipe) {
            self.bump();
            let right = self.parse_constant()?;
            let span = left.span().join(right.span());
            return Some(Constant::BinaryOr { left: Box::new(left), right: Box::new(right), span });
        }
        Some(left)
    }

    /// Parses a type-constructor reference with its optional `<elem>[:size]`
    /// and `?` nullability suffix. Handle subtype/rights are written as a
    /// second angle-bracket argument (`handle<channel>`), kept simple since
    /// only the handle family needs it.
    fn parse_type_constructor(&mut self) -> Option<TypeConstructor> {
        let name = self.parse_compound_identifier()?;
        let mut span = name.span.clone();
        let mut element_type = None;
        let mut handle_subtype = None;
        if self.at_punct(Punctuation::LAngle) {
            self.bump();
            if name.last().eq_ignore_ascii_case("handle") {
                let subtype = self.expect_identifier()?;
                handle_subtype = Some(subtype);
            } else {
                element_type = Some(Box::new(self.parse_type_constructor()?));
            }
            let rangle = self.expect_punct(Punctuation::RAngle)?;
            span = span.join(&rangle.span);
        }
        let mut size = None;
        if self.at_punct(Punctuation::Colon) {
            self.bump();
            let c = self.parse_constant()?;
            span = span.join(c.span());
            size = Some(Box::new(c));
        }
        let mut nullable = false;
        if self.at_punct(Punctuation::Question) {
            let q = self.bump()?;
            span = span.join(&q.span);
            nullable = true;
        }
        Some(TypeConstructor { name, element_type, size, handle_subtype, handle_rights: None, nullable, span })
    }

    fn parse_strictness(&mut self) -> Strictness {
        if self.at_keyword(Keyword::Strict) {
            self.bump();
            Strictness::Strict
        } else if self.at_keyword(Keyword::Flexible) {
            self.bump();
            Strictness::Flexible
        } else {
            Strictness::Strict
        }
    }

    fn parse_value_member(&mut self) -> Option<ValueMember> {
        let (doc, attributes) = self.collect_doc_and_attributes();
        let name = self.expect_identifier()?;
        self.expect_punct(Punctuation::Equals)?;
        let value = self.parse_constant()?;
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        Some(ValueMember { span: name.span.join(&semi.span), name, value, attributes, doc })
    }

    fn parse_struct_member(&mut self) -> Option<StructMember> {
        let (doc, attributes) = self.collect_doc_and_attributes();
        let name = self.expect_identifier()?;
        let ty = self.parse_type_constructor()?;
        let default = if self.at_punct(Punctuation::Equals) {
            self.bump();
            Some(self.parse_constant()?)
        } else {
            None
        };
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        Some(StructMember { span: name.span.join(&semi.span), name, ty, default, attributes, doc })
    }

    fn parse_ordinal_member(&mut self) -> Option<OrdinalMember> {
        let (doc, attributes) = self.collect_doc_and_attributes();
        let ordinal_tok = match self.kind() {
            Some(TokenKind::NumericLiteral) => self.bump()?,
            _ => {
                self.unexpected("ordinal");
                return None;
            }
        };
        let ordinal: u64 = ordinal_tok.text().parse().unwrap_or(0);
        self.expect_punct(Punctuation::Colon)?;
        let body = if self.at_keyword(Keyword::Reserved) {
            self.bump();
            OrdinalMemberBody::Reserved
        } else {
            let name = self.expect_identifier()?;
            let ty = self.parse_type_constructor()?;
            OrdinalMemberBody::Used { name, ty }
        };
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        Some(OrdinalMember {
            ordinal,
            ordinal_span: ordinal_tok.span.clone(),
            body,
            attributes,
            doc,
            span: ordinal_tok.span.join(&semi.span),
        })
    }

    fn parse_member_block<T>(&mut self, mut one: impl FnMut(&mut Self) -> Option<T>) -> Option<(Vec<T>, Span)> {
        let lbrace = self.expect_punct(Punctuation::LBrace)?;
        let mut members = Vec::new();
        while !self.at_punct(Punctuation::RBrace) && self.current.is_some() {
            match one(self) {
                Some(m) => members.push(m),
                None => {
                    self.synchronize_member();
                }
            }
        }
        let rbrace = self.expect_punct(Punctuation::RBrace)?;
        let mut span = lbrace.span.join(&rbrace.span);
        if self.at_punct(Punctuation::Semicolon) {
            let semi = self.bump().unwrap();
            span = span.join(&semi.span);
        }
        Some((members, span))
    }

    fn synchronize_member(&mut self) {
        while !self.at_punct(Punctuation::Semicolon) && !self.at_punct(Punctuation::RBrace) && self.current.is_some() {
            self.bump();
        }
        if self.at_punct(Punctuation::Semicolon) {
            self.bump();
        }
    }

    fn parse_const_decl(&mut self, doc: Option<String>, attributes: AttributeList, kw: Token) -> Option<Decl> {
        let name = self.expect_identifier()?;
        let ty = self.parse_type_constructor()?;
        self.expect_punct(Punctuation::Equals)?;
        let value = self.parse_constant()?;
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        Some(Decl::Const { span: kw.span.join(&semi.span), name, ty, value, attributes, doc })
    }

    fn parse_bits_or_enum(&mut self, doc: Option<String>, attributes: AttributeList, start: Token, strictness: Strictness, is_bits: bool) -> Option<Decl> {
        let name = self.expect_identifier()?;
        let underlying = if self.at_punct(Punctuation::Colon) {
            self.bump();
            Some(self.parse_type_constructor()?)
        } else {
            None
        };
        let (members, block_span) = self.parse_member_block(Self::parse_value_member)?;
        let span = start.span.join(&block_span);
        Some(if is_bits {
            Decl::Bits { name, underlying, strictness, members, attributes, doc, span }
        } else {
            Decl::Enum { name, underlying, strictness, members, attributes, doc, span }
        })
    }

    fn parse_struct_decl(&mut self, doc: Option<String>, attributes: AttributeList, start: Token, resource: bool) -> Option<Decl> {
        let name = self.expect_identifier()?;
        let (members, block_span) = self.parse_member_block(Self::parse_struct_member)?;
        Some(Decl::Struct { span: start.span.join(&block_span), name, members, resource, attributes, doc })
    }

    fn parse_table_decl(&mut self, doc: Option<String>, attributes: AttributeList, start: Token, resource: bool) -> Option<Decl> {
        let name = self.expect_identifier()?;
        let (members, block_span) = self.parse_member_block(Self::parse_ordinal_member)?;
        Some(Decl::Table { span: start.span.join(&block_span), name, members, resource, attributes, doc })
    }

    fn parse_union_decl(&mut self, doc: Option<String>, attributes: AttributeList, start: Token, strictness: Strictness, resource: bool) -> Option<Decl> {
        let name = self.expect_identifier()?;
        let (members, block_span) = self.parse_member_block(Self::parse_ordinal_member)?;
        Some(Decl::Union { span: start.span.join(&block_span), name, members, strictness, resource, attributes, doc })
    }

    fn parse_method(&mut self) -> Option<Method> {
        let (doc, attributes) = self.collect_doc_and_attributes();
        let name = self.expect_identifier()?;
        self.expect_punct(Punctuation::LParen)?;
        let request = if !self.at_punct(Punctuation::RParen) {
            Some(self.parse_comma_struct_members()?)
        } else {
            None
        };
        let rparen = self.expect_punct(Punctuation::RParen)?;
        let mut end_span = rparen.span.clone();
        let mut response = None;
        let mut error = None;
        if self.at_punct(Punctuation::Arrow) {
            self.bump();
            self.expect_punct(Punctuation::LParen)?;
            if !self.at_punct(Punctuation::RParen) {
                response = Some(self.parse_comma_struct_members()?);
            }
            let rparen2 = self.expect_punct(Punctuation::RParen)?;
            end_span = rparen2.span;
            if matches!(self.kind(), Some(TokenKind::Identifier)) && self.current.as_ref().unwrap().text() == "error" {
                self.bump();
                let ty = self.parse_type_constructor()?;
                end_span = ty.span.clone();
                error = Some(ty);
            }
        }
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        end_span = semi.span;
        Some(Method { span: name.span.join(&end_span), name, attributes, request, response, error, doc })
    }

    /// A parenthesized, comma-separated member list (method request/response),
    /// written like struct members but without the trailing `;` per member.
    fn parse_comma_struct_members(&mut self) -> Option<Vec<StructMember>> {
        let mut members = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let ty = self.parse_type_constructor()?;
            members.push(StructMember {
                span: name.span.join(&ty.span),
                name,
                ty,
                default: None,
                attributes: Vec::new(),
                doc: None,
            });
            if self.at_punct(Punctuation::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        Some(members)
    }

    fn parse_protocol_decl(&mut self, doc: Option<String>, attributes: AttributeList, start: Token) -> Option<Decl> {
        let name = self.expect_identifier()?;
        let lbrace = self.expect_punct(Punctuation::LBrace)?;
        let mut methods = Vec::new();
        let mut composes = Vec::new();
        while !self.at_punct(Punctuation::RBrace) && self.current.is_some() {
            if self.at_keyword(Keyword::Compose) {
                self.bump();
                match self.parse_compound_identifier() {
                    Some(id) => composes.push(id),
                    None => {
                        self.synchronize_member();
                        continue;
                    }
                }
                if self.at_punct(Punctuation::Semicolon) {
                    self.bump();
                }
                continue;
            }
            match self.parse_method() {
                Some(m) => methods.push(m),
                None => self.synchronize_member(),
            }
        }
        let rbrace = self.expect_punct(Punctuation::RBrace)?;
        let mut span = start.span.join(&rbrace.span);
        if self.at_punct(Punctuation::Semicolon) {
            let semi = self.bump().unwrap();
            span = span.join(&semi.span);
        }
        Some(Decl::Protocol { span, name, methods, composes, attributes, doc })
    }

    fn parse_service_member(&mut self) -> Option<ServiceMember> {
        let (doc, attributes) = self.collect_doc_and_attributes();
        let name = self.expect_identifier()?;
        let protocol = self.parse_type_constructor()?;
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        Some(ServiceMember { span: name.span.join(&semi.span), name, protocol, attributes, doc })
    }

    fn parse_service_decl(&mut self, doc: Option<String>, attributes: AttributeList, start: Token) -> Option<Decl> {
        let name = self.expect_identifier()?;
        let (members, block_span) = self.parse_member_block(Self::parse_service_member)?;
        Some(Decl::Service { span: start.span.join(&block_span), name, members, attributes, doc })
    }

    fn parse_type_alias_decl(&mut self, doc: Option<String>, attributes: AttributeList, start: Token) -> Option<Decl> {
        let name = self.expect_identifier()?;
        self.expect_punct(Punctuation::Equals)?;
        let target = self.parse_type_constructor()?;
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        Some(Decl::TypeAlias { span: start.span.join(&semi.span), name, target, attributes, doc })
    }

    fn parse_resource_property(&mut self) -> Option<ResourceProperty> {
        let name = self.expect_identifier()?;
        let ty = self.parse_type_constructor()?;
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        Some(ResourceProperty { span: name.span.join(&semi.span), name, ty })
    }

    fn parse_resource_definition_decl(&mut self, doc: Option<String>, attributes: AttributeList, start: Token) -> Option<Decl> {
        let name = self.expect_identifier()?;
        self.expect_punct(Punctuation::Colon)?;
        let underlying = self.parse_type_constructor()?;
        let (properties, block_span) = self.parse_member_block(Self::parse_resource_property)?;
        Some(Decl::ResourceDefinition { span: start.span.join(&block_span), name, underlying, properties, attributes, doc })
    }

    fn parse_using(&mut self, doc: Option<String>, attributes: AttributeList, using_kw: Token) -> Option<Using> {
        let _ = (doc, attributes);
        let path = self.parse_compound_identifier()?;
        let mut end_span = path.span.clone();
        let alias = if self.at_keyword(Keyword::As) {
            self.bump();
            let a = self.expect_identifier()?;
            end_span = a.span.clone();
            Some(a)
        } else {
            None
        };
        let semi = self.expect_punct(Punctuation::Semicolon)?;
        end_span = semi.span;
        Some(Using { span: using_kw.span.join(&end_span), path, alias })
    }

    pub fn parse_source_tree(mut self) -> SourceTree {
        let (lib_doc, lib_attrs) = self.collect_doc_and_attributes();
        let library = match self.expect_keyword(Keyword::Library) {
            Some(kw) => {
                let path = self.parse_compound_identifier();
                let semi = self.expect_punct(Punctuation::Semicolon);
                let path = path.unwrap_or_else(|| CompoundIdentifier::new(vec![], kw.span.clone()));
                let end = semi.map(|s| s.span).unwrap_or_else(|| path.span.clone());
                LibraryDeclaration { span: kw.span.join(&end), path, attributes: lib_attrs }
            }
            None => {
                self.synchronize();
                LibraryDeclaration {
                    path: CompoundIdentifier::new(vec![], self.span().unwrap_or_else(|| self.eof_span())),
                    attributes: lib_attrs,
                    span: self.span().unwrap_or_else(|| self.eof_span()),
                }
            }
        };
        let _ = lib_doc;

        let mut usings = Vec::new();
        let mut declarations = Vec::new();
        while self.current.is_some() {
            let (doc, attributes) = self.collect_doc_and_attributes();
            if self.at_keyword(Keyword::Using) {
                let kw = self.bump().unwrap();
                match self.parse_using(doc, attributes, kw) {
                    Some(u) => usings.push(u),
                    None => self.synchronize(),
                }
                continue;
            }
            if self.current.is_none() {
                break;
            }
            // re-attach doc/attributes already consumed by re-entering a specialized path
            let decl = self.parse_declaration_with(doc, attributes);
            match decl {
                Some(d) => declarations.push(d),
                None => self.synchronize(),
            }
        }

        SourceTree { library, usings, declarations }
    }

    fn eof_span(&self) -> Span {
        self.lexer.file().span(widl_diagnostics::ByteRange::new(
            self.lexer.file().text().len(),
            self.lexer.file().text().len(),
        ))
    }

    /// Same as `parse_declaration` but takes doc/attributes already consumed
    /// by the top-level loop (which must peek past them to distinguish a
    /// `using` line from a declaration).
    fn parse_declaration_with(&mut self, doc: Option<String>, attributes: AttributeList) -> Option<Decl> {
        let resource_prefix = if self.at_keyword(Keyword::Resource)
            && matches!(self.keyword2(), Some(Keyword::Struct) | Some(Keyword::Table) | Some(Keyword::Union))
        {
            self.bump()
        } else {
            None
        };
        let strictness_prefix = if self.at_keyword(Keyword::Strict) || self.at_keyword(Keyword::Flexible) {
            let is_strict = self.at_keyword(Keyword::Strict);
            let tok = self.bump()?;
            Some((tok, if is_strict { Strictness::Strict } else { Strictness::Flexible }))
        } else {
            None
        };
        let resource = resource_prefix.is_some();
        let start = resource_prefix
            .or_else(|| strictness_prefix.as_ref().map(|(t, _)| t.clone()))
            .or_else(|| self.current.clone())?;

        match self.kind() {
            Some(TokenKind::Keyword(Keyword::Const)) => {
                let kw = self.bump()?;
                self.parse_const_decl(doc, attributes, kw)
            }
            Some(TokenKind::Keyword(Keyword::Bits)) => {
                self.bump();
                let strictness = strictness_prefix.map(|(_, s)| s).unwrap_or(Strictness::Strict);
                self.parse_bits_or_enum(doc, attributes, start, strictness, true)
            }
            Some(TokenKind::Keyword(Keyword::Enum)) => {
                self.bump();
                let strictness = strictness_prefix.map(|(_, s)| s).unwrap_or(Strictness::Strict);
                self.parse_bits_or_enum(doc, attributes, start, strictness, false)
            }
            Some(TokenKind::Keyword(Keyword::Struct)) => {
                self.bump();
                self.parse_struct_decl(doc, attributes, start, resource)
            }
            Some(TokenKind::Keyword(Keyword::Table)) => {
                self.bump();
                self.parse_table_decl(doc, attributes, start, resource)
            }
            Some(TokenKind::Keyword(Keyword::Union)) => {
                self.bump();
                let strictness = strictness_prefix.map(|(_, s)| s).unwrap_or(Strictness::Strict);
                self.parse_union_decl(doc, attributes, start, strictness, resource)
            }
            Some(TokenKind::Keyword(Keyword::Protocol)) => {
                self.bump();
                self.parse_protocol_decl(doc, attributes, start)
            }
            Some(TokenKind::Keyword(Keyword::Service)) => {
                self.bump();
                self.parse_service_decl(doc, attributes, start)
            }
            Some(TokenKind::Keyword(Keyword::Type)) => {
                self.bump();
                self.parse_type_alias_decl(doc, attributes, start)
            }
            Some(TokenKind::Keyword(Keyword::Resource)) => {
                self.bump();
                self.parse_resource_definition_decl(doc, attributes, start)
            }
            _ => {
                self.unexpected("declaration");
                None
            }
        }
    }
}
