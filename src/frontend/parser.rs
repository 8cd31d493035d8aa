// src/frontend/parser.rs

use crate::errors::{LexerError, ParserError};
use crate::frontend::{Lexer, Span, Token, TokenType, ast::*};

/// Parser for the declaration level of a Go source file.
///
/// Only the package clause, imports and type declarations are kept.
/// Function, method, variable and constant declarations are skipped by
/// matching their brackets, so their bodies never need to be understood.
pub struct Parser<'src> {
    pub(super) source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    lexer_errors: Vec<LexerError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let mut tokens = lexer.tokenize();
        // Bad tokens are already reported by the lexer
        tokens.retain(|token| token.ty != TokenType::Error);
        Self {
            source,
            tokens,
            pos: 0,
            lexer_errors: lexer.take_errors(),
        }
    }

    /// Errors collected while tokenizing.
    pub fn take_lexer_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.lexer_errors)
    }

    /// Parse a whole source file.
    pub fn parse_file(&mut self) -> Result<SourceFile, ParserError> {
        self.skip_semicolons();
        if !self.check(TokenType::KwPackage) {
            return Err(ParserError::ExpectedPackageClause {
                found: self.current().lexeme.clone(),
                span: self.current().span.into(),
            });
        }
        self.advance();
        let package = self.ident()?;
        self.end_decl()?;

        let mut imports = Vec::new();
        self.skip_semicolons();
        while self.match_token(TokenType::KwImport) {
            if self.match_token(TokenType::LParen) {
                loop {
                    self.skip_semicolons();
                    if self.check(TokenType::RParen) {
                        break;
                    }
                    imports.push(self.import_spec()?);
                    if !self.match_token(TokenType::Semicolon) {
                        break;
                    }
                }
                self.consume(TokenType::RParen)?;
            } else {
                imports.push(self.import_spec()?);
            }
            self.end_decl()?;
            self.skip_semicolons();
        }

        let mut types = Vec::new();
        loop {
            match self.current().ty {
                TokenType::Eof => break,
                TokenType::Semicolon => self.advance(),
                TokenType::KwType => {
                    self.type_decl(&mut types)?;
                    self.end_decl()?;
                }
                TokenType::KwFunc | TokenType::KwVar | TokenType::KwConst => {
                    self.skip_decl()?;
                }
                _ => return Err(self.unexpected()),
            }
        }

        Ok(SourceFile {
            package,
            imports,
            types,
        })
    }

    fn import_spec(&mut self) -> Result<ImportSpec, ParserError> {
        let start = self.current().span;
        let name = match self.current().ty {
            TokenType::Dot => {
                self.advance();
                ImportName::Dot
            }
            TokenType::Identifier if self.current().lexeme == "_" => {
                self.advance();
                ImportName::Blank
            }
            TokenType::Identifier => ImportName::Named(self.ident()?),
            _ => ImportName::Default,
        };

        let token = self.current().clone();
        let path = match token.ty {
            TokenType::StringLiteral | TokenType::RawStringLiteral => unquote(&token.lexeme),
            _ => {
                return Err(ParserError::ExpectedImportPath {
                    found: token.lexeme,
                    span: token.span.into(),
                });
            }
        };
        self.advance();

        Ok(ImportSpec {
            name,
            path,
            span: start.merge(token.span),
        })
    }

    /// `type X T` or `type ( X T; Y U )`
    fn type_decl(&mut self, out: &mut Vec<TypeSpec>) -> Result<(), ParserError> {
        self.consume(TokenType::KwType)?;
        if self.match_token(TokenType::LParen) {
            loop {
                self.skip_semicolons();
                if self.check(TokenType::RParen) {
                    break;
                }
                out.push(self.type_spec()?);
                if !self.match_token(TokenType::Semicolon) {
                    break;
                }
            }
            self.consume(TokenType::RParen)?;
        } else {
            out.push(self.type_spec()?);
        }
        Ok(())
    }

    fn type_spec(&mut self) -> Result<TypeSpec, ParserError> {
        let name = self.ident()?;
        let type_params = if self.check(TokenType::LBracket) && self.starts_type_params() {
            self.type_params()?
        } else {
            Vec::new()
        };
        let alias = self.match_token(TokenType::Assign);
        let ty = self.parse_type()?;
        let span = name.span.merge(ty.span);
        Ok(TypeSpec {
            name,
            type_params,
            alias,
            ty,
            span,
        })
    }

    /// Tell `type A[T any] ...` apart from the array type `type A [N]int`.
    fn starts_type_params(&self) -> bool {
        if self.peek_nth(1).ty != TokenType::Identifier {
            return false;
        }
        matches!(
            self.peek_nth(2).ty,
            TokenType::Identifier
                | TokenType::Comma
                | TokenType::Tilde
                | TokenType::Star
                | TokenType::LBracket
                | TokenType::Arrow
                | TokenType::KwInterface
                | TokenType::KwFunc
                | TokenType::KwMap
                | TokenType::KwChan
                | TokenType::KwStruct
        )
    }

    fn type_params(&mut self) -> Result<Vec<TypeParam>, ParserError> {
        self.consume(TokenType::LBracket)?;
        let mut params = Vec::new();
        while !self.check(TokenType::RBracket) {
            let mut names = vec![self.ident()?];
            while self.match_token(TokenType::Comma) {
                names.push(self.ident()?);
            }
            let constraint = self.type_elem()?;
            params.extend(names.into_iter().map(|name| TypeParam {
                name,
                constraint: constraint.clone(),
            }));
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.consume(TokenType::RBracket)?;
        Ok(params)
    }

    /// Skip a func, var or const declaration up to its terminating `;`.
    fn skip_decl(&mut self) -> Result<(), ParserError> {
        let mut open: Vec<Token> = Vec::new();
        loop {
            let token = self.current().clone();
            match token.ty {
                TokenType::Eof => {
                    return match open.pop() {
                        Some(unclosed) => Err(ParserError::Unbalanced {
                            open: unclosed.lexeme,
                            span: unclosed.span.into(),
                        }),
                        None => Ok(()),
                    };
                }
                TokenType::Semicolon if open.is_empty() => {
                    self.advance();
                    return Ok(());
                }
                TokenType::LParen | TokenType::LBracket | TokenType::LBrace => {
                    open.push(token);
                }
                TokenType::RParen | TokenType::RBracket | TokenType::RBrace => {
                    let closes = open.pop().is_some_and(|o| {
                        matches!(
                            (o.ty, token.ty),
                            (TokenType::LParen, TokenType::RParen)
                                | (TokenType::LBracket, TokenType::RBracket)
                                | (TokenType::LBrace, TokenType::RBrace)
                        )
                    });
                    if !closes {
                        return Err(ParserError::UnexpectedToken {
                            token: token.lexeme,
                            span: token.span.into(),
                        });
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // Token stream helpers

    pub(super) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(super) fn peek_nth(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advance to the next token
    pub(super) fn advance(&mut self) {
        if self.current().ty != TokenType::Eof {
            self.pos += 1;
        }
    }

    /// Check if the current token matches the given type
    pub(super) fn check(&self, ty: TokenType) -> bool {
        self.current().ty == ty
    }

    /// Consume the current token if it matches, otherwise return false
    pub(super) fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given type, or return an error
    pub(super) fn consume(&mut self, ty: TokenType) -> Result<Span, ParserError> {
        if self.check(ty) {
            let span = self.current().span;
            self.advance();
            Ok(span)
        } else {
            Err(ParserError::ExpectedToken {
                expected: ty.as_str().to_string(),
                found: self.found(),
                span: self.current().span.into(),
            })
        }
    }

    pub(super) fn ident(&mut self) -> Result<Ident, ParserError> {
        if self.check(TokenType::Identifier) {
            let token = self.current();
            let ident = Ident::new(token.lexeme.clone(), token.span);
            self.advance();
            Ok(ident)
        } else {
            Err(ParserError::ExpectedIdentifier {
                found: self.found(),
                span: self.current().span.into(),
            })
        }
    }

    pub(super) fn unexpected(&self) -> ParserError {
        ParserError::UnexpectedToken {
            token: self.found(),
            span: self.current().span.into(),
        }
    }

    /// Lexeme of the current token, or its kind when it has none
    pub(super) fn found(&self) -> String {
        let token = self.current();
        if token.ty == TokenType::Semicolon && token.lexeme != ";" {
            "newline".to_string()
        } else if token.lexeme.is_empty() {
            token.ty.as_str().to_string()
        } else {
            token.lexeme.clone()
        }
    }

    pub(super) fn skip_semicolons(&mut self) {
        while self.match_token(TokenType::Semicolon) {}
    }

    /// A declaration ends at `;`, or right before `)` or end of file.
    fn end_decl(&mut self) -> Result<(), ParserError> {
        if self.match_token(TokenType::Semicolon)
            || self.check(TokenType::Eof)
            || self.check(TokenType::RParen)
        {
            Ok(())
        } else {
            Err(ParserError::ExpectedToken {
                expected: ";".to_string(),
                found: self.found(),
                span: self.current().span.into(),
            })
        }
    }
}

/// Strip the quotes from a string literal.
fn unquote(literal: &str) -> String {
    let mut chars = literal.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        let mut parser = Parser::new(source);
        let file = parser.parse_file().expect("parse should succeed");
        assert!(parser.take_lexer_errors().is_empty());
        file
    }

    fn parse_err(source: &str) -> ParserError {
        Parser::new(source)
            .parse_file()
            .expect_err("parse should fail")
    }

    #[test]
    fn parse_package_clause() {
        let file = parse("package greet\n");
        assert_eq!(file.package.name, "greet");
        assert!(file.imports.is_empty());
        assert!(file.types.is_empty());
    }

    #[test]
    fn missing_package_clause() {
        let err = parse_err("type A int\n");
        assert!(matches!(err, ParserError::ExpectedPackageClause { .. }));
    }

    #[test]
    fn parse_import_forms() {
        let file = parse(
            r#"package p

import "fmt"
import (
	ctx "context"
	_ "embed"
	. "strings"
	`net/http`
)
"#,
        );
        let paths: Vec<_> = file.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, ["fmt", "context", "embed", "strings", "net/http"]);
        assert_eq!(file.imports[0].name, ImportName::Default);
        assert!(matches!(&file.imports[1].name, ImportName::Named(id) if id.name == "ctx"));
        assert_eq!(file.imports[2].name, ImportName::Blank);
        assert_eq!(file.imports[3].name, ImportName::Dot);
        assert_eq!(file.import_for("ctx").map(|i| i.path.as_str()), Some("context"));
        assert_eq!(file.import_for("http").map(|i| i.path.as_str()), Some("net/http"));
    }

    #[test]
    fn import_path_must_be_string() {
        let err = parse_err("package p\nimport fmt\n");
        assert!(matches!(err, ParserError::ExpectedImportPath { .. }));
    }

    #[test]
    fn parse_grouped_type_decls() {
        let file = parse(
            "package p\n\ntype (\n\tA int\n\tB = string\n)\n\ntype C []A\n",
        );
        let names: Vec<_> = file.types.iter().map(|t| t.name.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!(!file.types[0].alias);
        assert!(file.types[1].alias);
    }

    #[test]
    fn skips_funcs_vars_and_consts() {
        let file = parse(
            r#"package p

const Max = 10

var (
	x = struct{ a int }{a: 1}
	y = map[string]int{"a": 1}
)

func (g *impl) Greet(name string) string {
	if name == "" {
		return "hi"
	}
	return "hello " + name
}

type Greeter interface {
	Greet(name string) string
}

func helper[T any](v T) T { return v }
"#,
        );
        assert_eq!(file.types.len(), 1);
        assert_eq!(file.types[0].name.name, "Greeter");
    }

    #[test]
    fn unbalanced_function_body() {
        let err = parse_err("package p\nfunc f() {\n");
        assert!(matches!(err, ParserError::Unbalanced { open, .. } if open == "{"));
    }

    #[test]
    fn mismatched_closing_bracket() {
        let err = parse_err("package p\nfunc f() { ) }\n");
        assert!(matches!(err, ParserError::UnexpectedToken { .. }));
    }

    #[test]
    fn type_params_and_array_types() {
        let file = parse("package p\ntype List[T any] []T\ntype Buf [N]byte\ntype Pair[K comparable, V any] struct{}\n");
        assert_eq!(file.types[0].type_params.len(), 1);
        assert!(file.types[1].type_params.is_empty());
        assert!(matches!(file.types[1].ty.kind, TypeExprKind::Array { ref len, .. } if len == "N"));
        let names: Vec<_> = file.types[2]
            .type_params
            .iter()
            .map(|p| p.name.name.as_str())
            .collect();
        assert_eq!(names, ["K", "V"]);
    }

    #[test]
    fn stray_token_at_top_level() {
        let err = parse_err("package p\n+\n");
        assert!(matches!(err, ParserError::UnexpectedToken { .. }));
    }

    #[test]
    fn lexer_errors_are_collected() {
        let mut parser = Parser::new("package p\ntype A int @\n");
        let _ = parser.parse_file();
        assert_eq!(parser.take_lexer_errors().len(), 1);
    }
}
