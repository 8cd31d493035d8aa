// src/errors/plan.rs
//! Synthesis planning errors (E4xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum PlanError {
    /// `first` and `second` describe the clashing members: a method, a
    /// method's hook field or the delegate field.
    #[error("{first} and {second} both map to the middleware member '{field}'")]
    #[diagnostic(
        code(E4001),
        help(
            "the middleware struct has a delegate field, a hook field per method and every method; \
             their names must differ after case folding and Unicode normalization"
        )
    )]
    DuplicateFieldName {
        field: String,
        first: String,
        second: String,
    },
}
