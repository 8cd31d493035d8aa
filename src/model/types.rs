// src/model/types.rs

use std::collections::BTreeMap;

pub use crate::frontend::ast::ChanDir;

/// A resolved Go type, ready to be written back out.
///
/// Named types carry the import path of their package (`None` for the
/// package being wrapped and for predeclared types). Two `TypeRef`s are
/// the same type exactly when they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named {
        package: Option<String>,
        name: String,
        args: Vec<TypeRef>,
    },
    Pointer(Box<TypeRef>),
    Slice(Box<TypeRef>),
    Array {
        len: String,
        elem: Box<TypeRef>,
    },
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeRef>,
    },
    Func(Signature),
    Interface {
        methods: Vec<(String, Signature)>,
        embeds: Vec<TypeRef>,
    },
    Struct(Vec<StructField>),
}

impl TypeRef {
    /// A predeclared or package-local name without type arguments
    pub fn local(name: impl Into<String>) -> Self {
        TypeRef::Named {
            package: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Import paths of every package this type mentions, in visit order.
    pub fn packages<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeRef::Named { package, args, .. } => {
                if let Some(path) = package {
                    out.push(path);
                }
                for arg in args {
                    arg.packages(out);
                }
            }
            TypeRef::Pointer(elem) | TypeRef::Slice(elem) => elem.packages(out),
            TypeRef::Array { elem, .. } | TypeRef::Chan { elem, .. } => elem.packages(out),
            TypeRef::Map { key, value } => {
                key.packages(out);
                value.packages(out);
            }
            TypeRef::Func(sig) => sig.packages(out),
            TypeRef::Interface { methods, embeds } => {
                for (_, sig) in methods {
                    sig.packages(out);
                }
                for embed in embeds {
                    embed.packages(out);
                }
            }
            TypeRef::Struct(fields) => {
                for field in fields {
                    field.ty.packages(out);
                }
            }
        }
    }
}

/// Parameter and result types of a func type or method.
///
/// Names are not part of a signature's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    pub params: Vec<TypeRef>,
    pub results: Vec<TypeRef>,
    /// The last parameter is `...T`; its entry in `params` is `T`
    pub variadic: bool,
}

impl Signature {
    pub fn packages<'a>(&'a self, out: &mut Vec<&'a str>) {
        for ty in self.params.iter().chain(&self.results) {
            ty.packages(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    /// Empty for an embedded field
    pub names: Vec<String>,
    pub ty: TypeRef,
    pub tag: Option<String>,
}

/// A method parameter. The name is kept only for readable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<TypeRef>,
    pub variadic: bool,
}

impl MethodSpec {
    /// The method's type, without parameter names
    pub fn signature(&self) -> Signature {
        Signature {
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
            results: self.results.clone(),
            variadic: self.variadic,
        }
    }
}

/// An imported package a signature refers to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PackageRef {
    pub path: String,
    /// Qualifier to use for the package
    pub name: String,
    /// The source imported the package under an explicit name
    pub aliased: bool,
}

/// The flattened method set of one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSpec {
    pub name: String,
    /// Name of the package that declares the interface
    pub package: String,
    pub methods: Vec<MethodSpec>,
    /// Every package mentioned by a method signature, keyed by import path
    pub imports: BTreeMap<String, PackageRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualified(path: &str, name: &str) -> TypeRef {
        TypeRef::Named {
            package: Some(path.to_string()),
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    #[test]
    fn signature_ignores_param_names() {
        let method = |name: &str| MethodSpec {
            name: "Read".to_string(),
            params: vec![Param {
                name: Some(name.to_string()),
                ty: TypeRef::Slice(Box::new(TypeRef::local("byte"))),
            }],
            results: vec![TypeRef::local("int"), TypeRef::local("error")],
            variadic: false,
        };
        assert_eq!(method("p").signature(), method("buf").signature());
    }

    #[test]
    fn packages_are_collected_from_nested_types() {
        let ty = TypeRef::Map {
            key: Box::new(TypeRef::local("string")),
            value: Box::new(TypeRef::Func(Signature {
                params: vec![qualified("context", "Context")],
                results: vec![TypeRef::Pointer(Box::new(qualified("net/http", "Request")))],
                variadic: false,
            })),
        };
        let mut paths = Vec::new();
        ty.packages(&mut paths);
        assert_eq!(paths, ["context", "net/http"]);
    }
}
