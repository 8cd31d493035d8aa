// src/errors/output.rs
//! Errors writing or checking the generated file (E5xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum OutputError {
    #[error("cannot create a temporary file in '{dir}'")]
    #[diagnostic(code(E5001))]
    CreateTemp {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{path}'")]
    #[diagnostic(code(E5002))]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot move the generated file into place at '{path}'")]
    #[diagnostic(code(E5003))]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write to stdout")]
    #[diagnostic(code(E5004))]
    Stdout {
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is out of date")]
    #[diagnostic(code(E5005), help("run again without --check to regenerate it"))]
    Stale { path: String },

    #[error("'{path}' does not exist")]
    #[diagnostic(code(E5006), help("run again without --check to generate it"))]
    Missing { path: String },
}
