// src/frontend/parse_type.rs
//
// Type expressions, signatures and parameter lists.

use super::{Span, TokenType};
use super::ast::*;
use super::parser::Parser;
use crate::errors::ParserError;

/// One comma-separated entry of a parameter list before grouping.
enum ParamEntry {
    /// A lone identifier: a name or a type, depending on its neighbours
    Bare(Ident),
    Named {
        name: Ident,
        ty: TypeExpr,
        variadic: bool,
    },
    Typed {
        ty: TypeExpr,
        variadic: bool,
    },
}

impl<'src> Parser<'src> {
    /// Parse a type expression
    pub(super) fn parse_type(&mut self) -> Result<TypeExpr, ParserError> {
        let token = self.current().clone();
        let start = token.span;
        match token.ty {
            TokenType::Identifier => self.type_name(),
            TokenType::Star => {
                self.advance();
                let elem = self.parse_type()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(TypeExprKind::Pointer(Box::new(elem)), span))
            }
            TokenType::LBracket => {
                self.advance();
                if self.match_token(TokenType::RBracket) {
                    let elem = self.parse_type()?;
                    let span = start.merge(elem.span);
                    return Ok(TypeExpr::new(TypeExprKind::Slice(Box::new(elem)), span));
                }
                let len = self.array_len()?;
                let elem = self.parse_type()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Array {
                        len,
                        elem: Box::new(elem),
                    },
                    span,
                ))
            }
            TokenType::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                let end = self.consume(TokenType::RParen)?;
                Ok(TypeExpr::new(
                    TypeExprKind::Paren(Box::new(inner)),
                    start.merge(end),
                ))
            }
            TokenType::Arrow => {
                self.advance();
                self.consume(TokenType::KwChan)?;
                let elem = self.parse_type()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Chan {
                        dir: ChanDir::Recv,
                        elem: Box::new(elem),
                    },
                    span,
                ))
            }
            TokenType::KwChan => {
                self.advance();
                let dir = if self.match_token(TokenType::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type()?;
                let span = start.merge(elem.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Chan {
                        dir,
                        elem: Box::new(elem),
                    },
                    span,
                ))
            }
            TokenType::KwMap => {
                self.advance();
                self.consume(TokenType::LBracket)?;
                let key = self.parse_type()?;
                self.consume(TokenType::RBracket)?;
                let value = self.parse_type()?;
                let span = start.merge(value.span);
                Ok(TypeExpr::new(
                    TypeExprKind::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                    span,
                ))
            }
            TokenType::KwFunc => {
                self.advance();
                let sig = self.signature()?;
                let span = start.merge(sig.span);
                Ok(TypeExpr::new(TypeExprKind::Func(sig), span))
            }
            TokenType::KwInterface => self.interface_type(),
            TokenType::KwStruct => self.struct_type(),
            _ => Err(ParserError::ExpectedType {
                found: self.found(),
                span: token.span.into(),
            }),
        }
    }

    /// `Name`, `pkg.Name`, optionally followed by type arguments
    fn type_name(&mut self) -> Result<TypeExpr, ParserError> {
        let first = self.ident()?;
        let (package, name) = if self.match_token(TokenType::Dot) {
            (Some(first), self.ident()?)
        } else {
            (None, first)
        };
        let start = package.as_ref().map_or(name.span, |p| p.span);
        let mut span = start.merge(name.span);

        let mut args = Vec::new();
        if self.match_token(TokenType::LBracket) {
            while !self.check(TokenType::RBracket) {
                args.push(self.parse_type()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            span = span.merge(self.consume(TokenType::RBracket)?);
        }

        Ok(TypeExpr::new(
            TypeExprKind::Named {
                package,
                name,
                args,
            },
            span,
        ))
    }

    /// Skip an array length expression, keeping its source text.
    /// Expects the opening `[` to be consumed already.
    fn array_len(&mut self) -> Result<String, ParserError> {
        let open = self.previous().clone();
        let start = self.current().span.start;
        let mut depth = 0usize;
        loop {
            match self.current().ty {
                TokenType::Eof => {
                    return Err(ParserError::Unbalanced {
                        open: open.lexeme,
                        span: open.span.into(),
                    });
                }
                TokenType::LBracket | TokenType::LParen | TokenType::LBrace => depth += 1,
                TokenType::RParen | TokenType::RBrace => depth = depth.saturating_sub(1),
                TokenType::RBracket if depth == 0 => {
                    let end = self.current().span.start;
                    self.advance();
                    return Ok(self.source[start..end].trim().to_string());
                }
                TokenType::RBracket => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// A type-set element: `~T`, `A | B`, or a plain type
    pub(super) fn type_elem(&mut self) -> Result<TypeExpr, ParserError> {
        let mut terms = vec![self.type_term()?];
        while self.match_token(TokenType::Pipe) {
            terms.push(self.type_term()?);
        }
        if terms.len() == 1 {
            return Ok(terms.remove(0));
        }
        let span = terms[0].span.merge(terms[terms.len() - 1].span);
        Ok(TypeExpr::new(TypeExprKind::Union(terms), span))
    }

    fn type_term(&mut self) -> Result<TypeExpr, ParserError> {
        let start = self.current().span;
        if self.match_token(TokenType::Tilde) {
            let ty = self.parse_type()?;
            let span = start.merge(ty.span);
            return Ok(TypeExpr::new(TypeExprKind::Tilde(Box::new(ty)), span));
        }
        self.parse_type()
    }

    fn interface_type(&mut self) -> Result<TypeExpr, ParserError> {
        let start = self.consume(TokenType::KwInterface)?;
        self.consume(TokenType::LBrace)?;
        let mut elems = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check(TokenType::RBrace) {
                break;
            }
            if self.check(TokenType::Identifier) && self.peek_nth(1).ty == TokenType::LParen {
                let name = self.ident()?;
                let sig = self.signature()?;
                elems.push(InterfaceElem::Method { name, sig });
            } else {
                elems.push(InterfaceElem::Embed(self.type_elem()?));
            }
            if !self.match_token(TokenType::Semicolon) {
                break;
            }
        }
        let end = self.consume(TokenType::RBrace)?;
        Ok(TypeExpr::new(
            TypeExprKind::Interface(elems),
            start.merge(end),
        ))
    }

    fn struct_type(&mut self) -> Result<TypeExpr, ParserError> {
        let start = self.consume(TokenType::KwStruct)?;
        self.consume(TokenType::LBrace)?;
        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check(TokenType::RBrace) {
                break;
            }
            fields.push(self.field_decl()?);
            if !self.match_token(TokenType::Semicolon) {
                break;
            }
        }
        let end = self.consume(TokenType::RBrace)?;
        Ok(TypeExpr::new(TypeExprKind::Struct(fields), start.merge(end)))
    }

    fn field_decl(&mut self) -> Result<FieldDecl, ParserError> {
        let embedded = match self.current().ty {
            TokenType::Star => true,
            TokenType::Identifier => match self.peek_nth(1).ty {
                TokenType::Dot
                | TokenType::Semicolon
                | TokenType::RBrace
                | TokenType::StringLiteral
                | TokenType::RawStringLiteral => true,
                TokenType::LBracket => !self.bracket_then_type(1),
                _ => false,
            },
            _ => false,
        };

        let (names, ty) = if embedded {
            (Vec::new(), self.parse_type()?)
        } else {
            let mut names = vec![self.ident()?];
            while self.match_token(TokenType::Comma) {
                names.push(self.ident()?);
            }
            (names, self.parse_type()?)
        };

        let tag = match self.current().ty {
            TokenType::StringLiteral | TokenType::RawStringLiteral => {
                let tag = self.current().lexeme.clone();
                self.advance();
                Some(tag)
            }
            _ => None,
        };

        Ok(FieldDecl { names, ty, tag })
    }

    /// Whether the `[` at `offset` closes into a type, as in `name [2]int`,
    /// rather than being the end of `Generic[int]`.
    fn bracket_then_type(&self, offset: usize) -> bool {
        let mut depth = 0usize;
        let mut n = offset;
        loop {
            match self.peek_nth(n).ty {
                TokenType::Eof => return false,
                TokenType::LBracket | TokenType::LParen | TokenType::LBrace => depth += 1,
                TokenType::RParen | TokenType::RBrace => depth = depth.saturating_sub(1),
                TokenType::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.peek_nth(n + 1).ty.starts_type();
                    }
                }
                _ => {}
            }
            n += 1;
        }
    }

    /// `(params) results`, with the `func` keyword or method name already consumed
    pub(super) fn signature(&mut self) -> Result<FuncSig, ParserError> {
        let start = self.consume(TokenType::LParen)?;
        let params = self.param_list()?;
        let mut end = self.previous().span;

        let results = if self.match_token(TokenType::LParen) {
            let results = self.param_list()?;
            end = self.previous().span;
            if let Some(variadic) = results.iter().find(|r| r.variadic) {
                return Err(ParserError::UnexpectedToken {
                    token: "...".to_string(),
                    span: variadic.ty.span.into(),
                });
            }
            results
        } else if self.current().ty.starts_type() {
            let ty = self.parse_type()?;
            end = ty.span;
            vec![ParamDecl {
                name: None,
                ty,
                variadic: false,
            }]
        } else {
            Vec::new()
        };

        Ok(FuncSig {
            params,
            results,
            span: start.merge(end),
        })
    }

    /// Parse entries up to and including the closing `)`, then resolve
    /// Go's grouping of names and types.
    fn param_list(&mut self) -> Result<Vec<ParamDecl>, ParserError> {
        let open = self.previous().span;
        let mut entries = Vec::new();
        while !self.check(TokenType::RParen) {
            entries.push(self.param_entry()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        let close = self.consume(TokenType::RParen)?;
        group_params(entries, open.merge(close))
    }

    fn param_entry(&mut self) -> Result<ParamEntry, ParserError> {
        if self.match_token(TokenType::Ellipsis) {
            return Ok(ParamEntry::Typed {
                ty: self.parse_type()?,
                variadic: true,
            });
        }
        if !self.check(TokenType::Identifier) {
            return Ok(ParamEntry::Typed {
                ty: self.parse_type()?,
                variadic: false,
            });
        }

        let named = match self.peek_nth(1).ty {
            TokenType::Comma | TokenType::RParen => {
                return Ok(ParamEntry::Bare(self.ident()?));
            }
            TokenType::Dot => false,
            TokenType::LBracket => {
                self.peek_nth(2).ty == TokenType::RBracket || self.bracket_then_type(1)
            }
            TokenType::Ellipsis => true,
            other => other.starts_type(),
        };

        if !named {
            return Ok(ParamEntry::Typed {
                ty: self.parse_type()?,
                variadic: false,
            });
        }

        let name = self.ident()?;
        let variadic = self.match_token(TokenType::Ellipsis);
        let ty = self.parse_type()?;
        Ok(ParamEntry::Named { name, ty, variadic })
    }
}

fn group_params(
    entries: Vec<ParamEntry>,
    list_span: Span,
) -> Result<Vec<ParamDecl>, ParserError> {
    let has_names = entries
        .iter()
        .any(|entry| matches!(entry, ParamEntry::Named { .. }));

    if !has_names {
        return Ok(entries
            .into_iter()
            .map(|entry| match entry {
                ParamEntry::Bare(ident) => {
                    let span = ident.span;
                    ParamDecl {
                        name: None,
                        ty: TypeExpr::new(
                            TypeExprKind::Named {
                                package: None,
                                name: ident,
                                args: Vec::new(),
                            },
                            span,
                        ),
                        variadic: false,
                    }
                }
                ParamEntry::Typed { ty, variadic } | ParamEntry::Named { ty, variadic, .. } => {
                    ParamDecl {
                        name: None,
                        ty,
                        variadic,
                    }
                }
            })
            .collect());
    }

    let mut params = Vec::with_capacity(entries.len());
    let mut pending: Vec<Ident> = Vec::new();
    for entry in entries {
        match entry {
            ParamEntry::Bare(ident) => pending.push(ident),
            ParamEntry::Named { name, ty, variadic } => {
                for pending_name in pending.drain(..) {
                    params.push(ParamDecl {
                        name: Some(pending_name),
                        ty: ty.clone(),
                        variadic: false,
                    });
                }
                params.push(ParamDecl {
                    name: Some(name),
                    ty,
                    variadic,
                });
            }
            ParamEntry::Typed { .. } => {
                return Err(ParserError::MixedParameters {
                    span: list_span.into(),
                });
            }
        }
    }
    if let Some(dangling) = pending.first() {
        return Err(ParserError::MissingParameterType {
            span: dangling.span.into(),
        });
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use crate::errors::ParserError;
    use crate::frontend::ast::*;
    use crate::frontend::parser::Parser;

    fn parse_type_decl(decl: &str) -> TypeExpr {
        let source = format!("package p\n\n{decl}\n");
        let mut file = Parser::new(&source)
            .parse_file()
            .expect("parse should succeed");
        file.types.remove(0).ty
    }

    fn parse_err(decl: &str) -> ParserError {
        let source = format!("package p\n\n{decl}\n");
        Parser::new(&source)
            .parse_file()
            .expect_err("parse should fail")
    }

    fn methods(ty: &TypeExpr) -> Vec<(&str, &FuncSig)> {
        let TypeExprKind::Interface(elems) = &ty.kind else {
            panic!("expected interface, got {:?}", ty.kind);
        };
        elems
            .iter()
            .filter_map(|elem| match elem {
                InterfaceElem::Method { name, sig } => Some((name.name.as_str(), sig)),
                InterfaceElem::Embed(_) => None,
            })
            .collect()
    }

    fn param_names(sig: &FuncSig) -> Vec<Option<&str>> {
        sig.params
            .iter()
            .map(|p| p.name.as_ref().map(|n| n.name.as_str()))
            .collect()
    }

    #[test]
    fn interface_with_methods() {
        let ty = parse_type_decl(
            "type Greeter interface {\n\tGreet(name string) string\n\tClose() error\n}",
        );
        let methods = methods(&ty);
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].0, "Greet");
        assert_eq!(param_names(methods[0].1), [Some("name")]);
        assert_eq!(methods[0].1.results.len(), 1);
        assert_eq!(methods[1].0, "Close");
        assert!(methods[1].1.params.is_empty());
    }

    #[test]
    fn single_line_interface() {
        let ty = parse_type_decl("type Closer interface{ Close() error }");
        assert_eq!(methods(&ty).len(), 1);
    }

    #[test]
    fn grouped_parameter_names() {
        let ty = parse_type_decl("type A interface {\n\tM(a, b int, s string) (n int, err error)\n}");
        let (_, sig) = methods(&ty)[0];
        assert_eq!(param_names(sig), [Some("a"), Some("b"), Some("s")]);
        assert_eq!(sig.params[0].ty, sig.params[1].ty);
        let results: Vec<_> = sig
            .results
            .iter()
            .map(|r| r.name.as_ref().map(|n| n.name.as_str()))
            .collect();
        assert_eq!(results, [Some("n"), Some("err")]);
    }

    #[test]
    fn unnamed_parameters_are_types() {
        let ty = parse_type_decl("type A interface {\n\tM(int, context.Context, List[int]) (int, error)\n}");
        let (_, sig) = methods(&ty)[0];
        assert_eq!(param_names(sig), [None, None, None]);
        assert!(matches!(
            &sig.params[1].ty.kind,
            TypeExprKind::Named { package: Some(pkg), name, .. }
                if pkg.name == "context" && name.name == "Context"
        ));
        assert!(matches!(
            &sig.params[2].ty.kind,
            TypeExprKind::Named { args, .. } if args.len() == 1
        ));
    }

    #[test]
    fn named_array_and_slice_parameters() {
        let ty = parse_type_decl("type A interface {\n\tM(a [4]byte, b []string, c map[string]int)\n}");
        let (_, sig) = methods(&ty)[0];
        assert_eq!(param_names(sig), [Some("a"), Some("b"), Some("c")]);
        assert!(matches!(&sig.params[0].ty.kind, TypeExprKind::Array { len, .. } if len == "4"));
        assert!(matches!(sig.params[1].ty.kind, TypeExprKind::Slice(_)));
        assert!(matches!(sig.params[2].ty.kind, TypeExprKind::Map { .. }));
    }

    #[test]
    fn variadic_parameters() {
        let ty = parse_type_decl(
            "type L interface {\n\tLog(format string, args ...any)\n\tAll(...int)\n}",
        );
        let methods = methods(&ty);
        assert!(methods[0].1.is_variadic());
        assert_eq!(param_names(methods[0].1), [Some("format"), Some("args")]);
        assert!(methods[1].1.is_variadic());
        assert_eq!(param_names(methods[1].1), [None]);
    }

    #[test]
    fn variadic_result_is_rejected() {
        let err = parse_err("type A interface {\n\tM() (...int)\n}");
        assert!(matches!(err, ParserError::UnexpectedToken { .. }));
    }

    #[test]
    fn mixed_parameters_are_rejected() {
        let err = parse_err("type A interface {\n\tM(a int, []string)\n}");
        assert!(matches!(err, ParserError::MixedParameters { .. }));
    }

    #[test]
    fn trailing_name_without_type() {
        let err = parse_err("type A interface {\n\tM(a int, b)\n}");
        assert!(matches!(err, ParserError::MissingParameterType { .. }));
    }

    #[test]
    fn func_and_channel_types() {
        let ty = parse_type_decl(
            "type A interface {\n\tWatch(cb func(int) error, in <-chan int, out chan<- string) chan struct{}\n}",
        );
        let (_, sig) = methods(&ty)[0];
        assert!(matches!(&sig.params[0].ty.kind, TypeExprKind::Func(f) if f.results.len() == 1));
        assert!(matches!(
            sig.params[1].ty.kind,
            TypeExprKind::Chan { dir: ChanDir::Recv, .. }
        ));
        assert!(matches!(
            sig.params[2].ty.kind,
            TypeExprKind::Chan { dir: ChanDir::Send, .. }
        ));
        assert!(matches!(
            sig.results[0].ty.kind,
            TypeExprKind::Chan { dir: ChanDir::Both, .. }
        ));
    }

    #[test]
    fn func_param_without_results() {
        let ty = parse_type_decl("type A interface {\n\tEach(fn func(), n int)\n}");
        let (_, sig) = methods(&ty)[0];
        assert_eq!(param_names(sig), [Some("fn"), Some("n")]);
        assert!(matches!(&sig.params[0].ty.kind, TypeExprKind::Func(f) if f.results.is_empty()));
    }

    #[test]
    fn embedded_interfaces_and_type_sets() {
        let ty = parse_type_decl(
            "type A interface {\n\tio.Reader\n\tStringer\n\t~int | ~string\n}",
        );
        let TypeExprKind::Interface(elems) = &ty.kind else {
            panic!("expected interface");
        };
        assert_eq!(elems.len(), 3);
        assert!(matches!(
            &elems[0],
            InterfaceElem::Embed(TypeExpr { kind: TypeExprKind::Named { package: Some(_), .. }, .. })
        ));
        assert!(matches!(
            &elems[2],
            InterfaceElem::Embed(TypeExpr { kind: TypeExprKind::Union(terms), .. }) if terms.len() == 2
        ));
    }

    #[test]
    fn struct_fields_and_embeds() {
        let ty = parse_type_decl(
            "type S struct {\n\tsync.Mutex\n\t*Base\n\ta, b int `json:\"a\"`\n\tbuf [8]byte\n\tList[int]\n}",
        );
        let TypeExprKind::Struct(fields) = &ty.kind else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 5);
        assert!(fields[0].names.is_empty());
        assert!(fields[1].names.is_empty());
        assert_eq!(fields[2].names.len(), 2);
        assert_eq!(fields[2].tag.as_deref(), Some("`json:\"a\"`"));
        assert_eq!(fields[3].names[0].name, "buf");
        assert!(fields[4].names.is_empty());
    }

    #[test]
    fn expected_type_error() {
        let err = parse_err("type A interface {\n\tM(a int) +\n}");
        assert!(matches!(
            err,
            ParserError::ExpectedToken { .. } | ParserError::ExpectedType { .. }
        ));
    }
}
