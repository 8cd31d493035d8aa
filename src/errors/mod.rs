// src/errors/mod.rs
//! Structured error reporting for middlewarer.
//!
//! Every stage has its own error enum with stable diagnostic codes:
//! - E0xxx: Go lexer
//! - E1xxx: Go parser
//! - E2xxx: loading the package directory
//! - E3xxx: method-set extraction
//! - E4xxx: synthesis planning
//! - E5xxx: writing the generated file

#![allow(unused_assignments)] // False positives from thiserror derive

pub mod catalog;
pub mod lexer;
pub mod model;
pub mod output;
pub mod parser;
pub mod plan;
pub mod report;

pub use catalog::{CatalogError, ConstraintError, SyntaxError};
pub use lexer::LexerError;
pub use model::ModelError;
pub use output::OutputError;
pub use parser::ParserError;
pub use plan::PlanError;
pub use report::{render_to_stderr, render_to_string, render_to_writer};

use miette::Diagnostic;
use thiserror::Error;

/// Any failure of a generation run
#[derive(Error, Debug, Diagnostic)]
pub enum GenerateError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Output(#[from] OutputError),
}
