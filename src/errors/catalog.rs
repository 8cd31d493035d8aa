// src/errors/catalog.rs
//! Errors loading a package directory (E2xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::{LexerError, ParserError};

/// A lexer or parser error inside one source file
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SyntaxError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),
}

/// A malformed `//go:build` line. Offsets are into the file's source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("unexpected '{found}' in build constraint")]
    Unexpected { found: String, at: usize },

    #[error("build constraint ends early")]
    UnexpectedEnd { at: usize },

    #[error("more than one //go:build line")]
    Multiple { at: usize, len: usize },
}

impl ConstraintError {
    pub fn span(&self) -> SourceSpan {
        match self {
            Self::Unexpected { found, at } => (*at, found.len()).into(),
            Self::UnexpectedEnd { at } => (*at, 0).into(),
            Self::Multiple { at, len } => (*at, *len).into(),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum CatalogError {
    #[error("cannot read package directory '{dir}'")]
    #[diagnostic(code(E2001))]
    ReadDir {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no Go source files in '{dir}'")]
    #[diagnostic(
        code(E2002),
        help("point --dir at the directory that declares the interface")
    )]
    NoGoFiles { dir: String },

    #[error("cannot read '{path}'")]
    #[diagnostic(code(E2003))]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax errors in '{file}'")]
    #[diagnostic(code(E2004))]
    Syntax {
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[related]
        errors: Vec<SyntaxError>,
    },

    #[error("found packages '{first}' ({first_file}) and '{second}' ({second_file}) in one directory")]
    #[diagnostic(
        code(E2005),
        help("every non-test file of the directory must declare the same package")
    )]
    MultiplePackages {
        first: String,
        first_file: String,
        second: String,
        second_file: String,
    },

    #[error("type '{name}' is declared more than once")]
    #[diagnostic(code(E2006))]
    DuplicateType {
        name: String,
        previous_file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("redeclared here, first declared in {previous_file}")]
        span: SourceSpan,
    },

    #[error("invalid file pattern for '{dir}'")]
    #[diagnostic(code(E2007))]
    Pattern {
        dir: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid build constraint in '{file}'")]
    #[diagnostic(code(E2008))]
    BuildConstraint {
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: SourceSpan,
        reason: ConstraintError,
    },

    #[error("build constraints exclude all Go files in '{dir}'")]
    #[diagnostic(
        code(E2009),
        help("set GOOS, GOARCH or --tags to select the files to load")
    )]
    AllFilesExcluded { dir: String },
}
