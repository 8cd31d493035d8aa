// src/frontend/ast.rs

use crate::frontend::Span;

/// An identifier with its location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// The declarations of one Go source file that matter for type lookup.
///
/// Function, variable and constant declarations are skipped by the parser.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<TypeSpec>,
}

impl SourceFile {
    /// Find the import a qualifier refers to in this file.
    pub fn import_for(&self, qualifier: &str) -> Option<&ImportSpec> {
        self.imports
            .iter()
            .find(|import| import.qualifier().as_deref() == Some(qualifier))
    }
}

/// How an import binds its package in the file scope
#[derive(Debug, Clone, PartialEq)]
pub enum ImportName {
    /// `import "fmt"`
    Default,
    /// `import f "fmt"`
    Named(Ident),
    /// `import . "fmt"`
    Dot,
    /// `import _ "fmt"`
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub name: ImportName,
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    /// The identifier that qualifies this package's names, if any.
    pub fn qualifier(&self) -> Option<String> {
        match &self.name {
            ImportName::Default => Some(default_package_name(&self.path)),
            ImportName::Named(ident) => Some(ident.name.clone()),
            ImportName::Dot | ImportName::Blank => None,
        }
    }
}

/// Best guess at a package's name from its import path.
///
/// `github.com/x/y/v2` is package `y`, `gopkg.in/yaml.v3` is `yaml` and
/// `github.com/x/go-cmp` is `cmp`.
pub fn default_package_name(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    let is_major_version = last.len() > 1
        && last.starts_with('v')
        && last[1..].bytes().all(|b| b.is_ascii_digit());
    if is_major_version && let Some(previous) = segments.next() {
        last = previous;
    }
    let last = last.split('.').next().unwrap_or(last);
    let last = last.rsplit('-').next().unwrap_or(last);
    last.to_string()
}

/// `type Name[T any] = ...` or `type Name ...`
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: Ident,
    pub constraint: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Short description used in diagnostics ("struct", "map", ...)
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            TypeExprKind::Named { .. } => "named type",
            TypeExprKind::Pointer(_) => "pointer",
            TypeExprKind::Slice(_) => "slice",
            TypeExprKind::Array { .. } => "array",
            TypeExprKind::Map { .. } => "map",
            TypeExprKind::Chan { .. } => "channel",
            TypeExprKind::Func(_) => "func",
            TypeExprKind::Interface(_) => "interface",
            TypeExprKind::Struct(_) => "struct",
            TypeExprKind::Paren(inner) => inner.describe(),
            TypeExprKind::Union(_) | TypeExprKind::Tilde(_) => "type set",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// `Name`, `pkg.Name`, `Name[Args]`
    Named {
        package: Option<Ident>,
        name: Ident,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    /// `[len]T`; the length is kept as written
    Array { len: String, elem: Box<TypeExpr> },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Func(FuncSig),
    Interface(Vec<InterfaceElem>),
    Struct(Vec<FieldDecl>),
    Paren(Box<TypeExpr>),
    /// `A | B` in a type set
    Union(Vec<TypeExpr>),
    /// `~T` in a type set
    Tilde(Box<TypeExpr>),
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncSig {
    pub params: Vec<ParamDecl>,
    pub results: Vec<ParamDecl>,
    pub span: Span,
}

impl FuncSig {
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }
}

/// One parameter or result after name grouping is resolved, so
/// `(a, b int)` yields two entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: Option<Ident>,
    pub ty: TypeExpr,
    /// `...T`; `ty` is the element type `T`
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: Ident, sig: FuncSig },
    /// Embedded interface or type-set element
    Embed(TypeExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Empty for an embedded field
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    /// Raw tag literal including its quotes
    pub tag: Option<String>,
}
