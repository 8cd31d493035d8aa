// src/errors/model.rs
//! Method-set extraction errors (E3xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ModelError {
    #[error("type '{name}' not found in package '{package}'")]
    #[diagnostic(code(E3001))]
    TargetNotFound { name: String, package: String },

    #[error("'{name}' is a {kind}, not an interface")]
    #[diagnostic(code(E3002))]
    NotAnInterface { name: String, kind: String },

    #[error("method '{method}' of '{interface}' is declared with different signatures")]
    #[diagnostic(
        code(E3003),
        help("embedded interfaces may only repeat a method with an identical signature")
    )]
    AmbiguousMethod { interface: String, method: String },

    #[error("cannot resolve '{embed}' embedded in '{interface}'")]
    #[diagnostic(
        code(E3004),
        help("only interfaces of the same package and well-known standard interfaces can be embedded")
    )]
    UnresolvedEmbed { interface: String, embed: String },

    #[error("interface '{name}' embeds itself")]
    #[diagnostic(code(E3005))]
    RecursiveEmbed { name: String },

    #[error("interface '{name}' is not supported: {reason}")]
    #[diagnostic(code(E3006))]
    UnsupportedInterface { name: String, reason: String },

    #[error("unknown package '{qualifier}' in '{context}'")]
    #[diagnostic(code(E3007), help("add an import for '{qualifier}'"))]
    UnknownPackage { qualifier: String, context: String },
}
