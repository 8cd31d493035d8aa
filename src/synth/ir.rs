// src/synth/ir.rs
//! The handful of Go statements and expressions generated bodies use.

use crate::model::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    /// `x.name`
    Field(Box<Expr>, String),
    /// `callee(args)`, with `...` after the last argument when `spread`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        spread: bool,
    },
    /// `x != nil`
    NotNil(Box<Expr>),
    /// `&x`
    AddressOf(Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Field(Box::new(self), name.into())
    }

    pub fn call(self, args: Vec<Expr>, spread: bool) -> Self {
        Expr::Call {
            callee: Box::new(self),
            args,
            spread,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `if cond { then }`
    If { cond: Expr, then: Vec<Stmt> },
    /// `var name ty`
    Var { name: String, ty: TypeRef },
    /// `a, b = value`
    Assign { targets: Vec<Expr>, value: Expr },
    /// `a, b := value`
    Define { names: Vec<String>, value: Expr },
    Expr(Expr),
    /// `return a, b`
    Return(Vec<Expr>),
}
