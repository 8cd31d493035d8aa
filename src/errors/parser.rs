// src/errors/parser.rs
//! Parser errors (E1xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ParserError {
    #[error("expected package clause, found '{found}'")]
    #[diagnostic(code(E1001), help("every Go file starts with 'package <name>'"))]
    ExpectedPackageClause {
        found: String,
        #[label("expected 'package'")]
        span: SourceSpan,
    },

    #[error("expected '{expected}', found '{found}'")]
    #[diagnostic(code(E1002))]
    ExpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("unexpected token '{token}'")]
    #[diagnostic(code(E1003))]
    UnexpectedToken {
        token: String,
        #[label("unexpected")]
        span: SourceSpan,
    },

    #[error("expected type, found '{found}'")]
    #[diagnostic(code(E1004))]
    ExpectedType {
        found: String,
        #[label("expected type")]
        span: SourceSpan,
    },

    #[error("expected identifier, found '{found}'")]
    #[diagnostic(code(E1005))]
    ExpectedIdentifier {
        found: String,
        #[label("expected identifier")]
        span: SourceSpan,
    },

    #[error("mixed named and unnamed parameters")]
    #[diagnostic(
        code(E1006),
        help("either name every parameter or none of them")
    )]
    MixedParameters {
        #[label("in this parameter list")]
        span: SourceSpan,
    },

    #[error("missing parameter type")]
    #[diagnostic(code(E1007))]
    MissingParameterType {
        #[label("parameter has no type")]
        span: SourceSpan,
    },

    #[error("unbalanced '{open}'")]
    #[diagnostic(code(E1008))]
    Unbalanced {
        open: String,
        #[label("opened here and never closed")]
        span: SourceSpan,
    },

    #[error("import path must be a string, found '{found}'")]
    #[diagnostic(code(E1009))]
    ExpectedImportPath {
        found: String,
        #[label("expected import path")]
        span: SourceSpan,
    },
}
