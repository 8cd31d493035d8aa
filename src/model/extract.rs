// src/model/extract.rs
//! Flattening a declared interface into its ordered method set.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::types::*;
use crate::catalog::{Decl, Package, builtins};
use crate::errors::ModelError;
use crate::frontend::ast::{
    FuncSig, ImportName, InterfaceElem, SourceFile, TypeExpr, TypeExprKind, TypeSpec,
    default_package_name,
};

/// Where a declaration lives: the package, the file (for its imports) and
/// the import path of the package, `None` for the package being wrapped.
#[derive(Clone, Copy)]
struct Scope<'a> {
    package: &'a Package,
    file: &'a SourceFile,
    path: Option<&'static str>,
}

/// Key of an interface on the embedding stack
type EmbedKey = (Option<&'static str>, String);

struct Extractor {
    interface: String,
    methods: Vec<MethodSpec>,
    index: FxHashMap<String, usize>,
    imports: BTreeMap<String, PackageRef>,
    stack: Vec<EmbedKey>,
}

/// Extract the method set of interface `name` declared in `package`.
#[tracing::instrument(skip(package), fields(package = package.name()))]
pub fn extract(package: &Package, name: &str) -> Result<InterfaceSpec, ModelError> {
    let decl = package
        .lookup(name)
        .ok_or_else(|| ModelError::TargetNotFound {
            name: name.to_string(),
            package: package.name().to_string(),
        })?;

    let mut extractor = Extractor {
        interface: name.to_string(),
        methods: Vec::new(),
        index: FxHashMap::default(),
        imports: BTreeMap::new(),
        stack: vec![(None, name.to_string())],
    };

    let scope = Scope {
        package,
        file: decl.file,
        path: None,
    };
    let (scope, elems) = extractor.underlying_interface(scope, decl.spec)?;
    extractor.flatten(scope, elems)?;

    // Embeds resolved through an import need not leave a reference behind
    let mut used = Vec::new();
    for method in &extractor.methods {
        for param in &method.params {
            param.ty.packages(&mut used);
        }
        for result in &method.results {
            result.packages(&mut used);
        }
    }
    extractor.imports.retain(|path, _| used.contains(&path.as_str()));

    tracing::debug!(
        methods = extractor.methods.len(),
        imports = extractor.imports.len(),
        "extracted method set"
    );
    Ok(InterfaceSpec {
        name: name.to_string(),
        package: package.name().to_string(),
        methods: extractor.methods,
        imports: extractor.imports,
    })
}

impl Extractor {
    /// Follow aliases and defined types until an interface body is reached.
    fn underlying_interface<'a>(
        &mut self,
        scope: Scope<'a>,
        spec: &'a TypeSpec,
    ) -> Result<(Scope<'a>, &'a [InterfaceElem]), ModelError> {
        let mut scope = scope;
        let mut spec = spec;
        let mut seen: Vec<EmbedKey> = Vec::new();
        loop {
            let kind = unparen(&spec.ty);
            if !spec.type_params.is_empty() {
                return Err(match kind {
                    TypeExprKind::Interface(_) => ModelError::UnsupportedInterface {
                        name: spec.name.name.clone(),
                        reason: "generic interfaces cannot be wrapped".to_string(),
                    },
                    _ => ModelError::NotAnInterface {
                        name: spec.name.name.clone(),
                        kind: spec.ty.describe().to_string(),
                    },
                });
            }
            match kind {
                TypeExprKind::Interface(elems) => return Ok((scope, elems.as_slice())),
                TypeExprKind::Named {
                    package: qualifier,
                    name,
                    args,
                } if args.is_empty() => {
                    let key = (scope.path, spec.name.name.clone());
                    if seen.contains(&key) {
                        return Err(ModelError::RecursiveEmbed {
                            name: spec.name.name.clone(),
                        });
                    }
                    seen.push(key);

                    let qualifier = qualifier.as_ref().map(|q| q.name.as_str());
                    let Some((next_scope, decl)) = self.resolve_decl(scope, qualifier, &name.name)?
                    else {
                        if qualifier.is_none() && builtins::is_predeclared_type(&name.name) {
                            return Err(ModelError::NotAnInterface {
                                name: spec.name.name.clone(),
                                kind: format!("type defined as {}", name.name),
                            });
                        }
                        return Err(ModelError::UnresolvedEmbed {
                            interface: spec.name.name.clone(),
                            embed: display_name(qualifier, &name.name),
                        });
                    };
                    scope = next_scope;
                    spec = decl.spec;
                }
                _ => {
                    return Err(ModelError::NotAnInterface {
                        name: spec.name.name.clone(),
                        kind: spec.ty.describe().to_string(),
                    });
                }
            }
        }
    }

    /// Append the methods of `elems` in order, splicing embedded interfaces
    /// in at the position they are embedded.
    fn flatten<'a>(&mut self, scope: Scope<'a>, elems: &'a [InterfaceElem]) -> Result<(), ModelError> {
        for elem in elems {
            match elem {
                InterfaceElem::Method { name, sig } => {
                    let method = self.method(scope, &name.name, sig)?;
                    self.add(method)?;
                }
                InterfaceElem::Embed(ty) => self.embed(scope, ty)?,
            }
        }
        Ok(())
    }

    fn embed<'a>(&mut self, scope: Scope<'a>, ty: &'a TypeExpr) -> Result<(), ModelError> {
        match unparen(ty) {
            TypeExprKind::Interface(elems) => self.flatten(scope, elems),
            TypeExprKind::Named { args, name, .. } if !args.is_empty() => {
                Err(self.unsupported(format!(
                    "embedding the generic instantiation '{}' is not supported",
                    name.name
                )))
            }
            TypeExprKind::Named {
                package: qualifier,
                name,
                ..
            } => {
                let qualifier = qualifier.as_ref().map(|q| q.name.as_str());
                if qualifier.is_none() && name.name == "any" {
                    return Ok(());
                }
                if qualifier.is_none() && builtins::is_predeclared_type(&name.name) {
                    return Err(self.unsupported(format!(
                        "it embeds '{}', which makes it a constraint",
                        name.name
                    )));
                }

                let Some((embed_scope, decl)) = self.resolve_decl(scope, qualifier, &name.name)?
                else {
                    return Err(ModelError::UnresolvedEmbed {
                        interface: self.interface.clone(),
                        embed: display_name(qualifier, &name.name),
                    });
                };

                let key = (embed_scope.path, decl.spec.name.name.clone());
                if self.stack.contains(&key) {
                    return Err(ModelError::RecursiveEmbed {
                        name: decl.spec.name.name.clone(),
                    });
                }
                self.stack.push(key);

                let (body_scope, elems) = match self.underlying_interface(embed_scope, decl.spec) {
                    Ok(found) => found,
                    Err(ModelError::NotAnInterface { name, kind }) => {
                        return Err(self.unsupported(format!(
                            "it embeds '{name}', which is a {kind}"
                        )));
                    }
                    Err(e) => return Err(e),
                };
                self.flatten(body_scope, elems)?;
                self.stack.pop();
                Ok(())
            }
            TypeExprKind::Union(_) | TypeExprKind::Tilde(_) => {
                Err(self.unsupported("it declares a type set".to_string()))
            }
            _ => Err(self.unsupported(format!("it embeds a {}", ty.describe()))),
        }
    }

    /// Add a method, merging a repeat with an identical signature.
    fn add(&mut self, method: MethodSpec) -> Result<(), ModelError> {
        if let Some(&existing) = self.index.get(&method.name) {
            if self.methods[existing].signature() == method.signature() {
                tracing::debug!(method = %method.name, "merged repeated method");
                return Ok(());
            }
            return Err(ModelError::AmbiguousMethod {
                interface: self.interface.clone(),
                method: method.name,
            });
        }
        self.index.insert(method.name.clone(), self.methods.len());
        self.methods.push(method);
        Ok(())
    }

    fn method(&mut self, scope: Scope<'_>, name: &str, sig: &FuncSig) -> Result<MethodSpec, ModelError> {
        let params = sig
            .params
            .iter()
            .map(|param| {
                Ok(Param {
                    name: param.name.as_ref().map(|n| n.name.clone()),
                    ty: self.resolve_type(scope, &param.ty)?,
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        let results = sig
            .results
            .iter()
            .map(|result| self.resolve_type(scope, &result.ty))
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(MethodSpec {
            name: name.to_string(),
            params,
            results,
            variadic: sig.is_variadic(),
        })
    }

    fn signature(&mut self, scope: Scope<'_>, sig: &FuncSig) -> Result<Signature, ModelError> {
        let params = sig
            .params
            .iter()
            .map(|p| self.resolve_type(scope, &p.ty))
            .collect::<Result<Vec<_>, ModelError>>()?;
        let results = sig
            .results
            .iter()
            .map(|r| self.resolve_type(scope, &r.ty))
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(Signature {
            params,
            results,
            variadic: sig.is_variadic(),
        })
    }

    /// Turn a source type expression into a `TypeRef`, replacing
    /// qualifiers by import paths.
    fn resolve_type(&mut self, scope: Scope<'_>, ty: &TypeExpr) -> Result<TypeRef, ModelError> {
        let resolved = match &ty.kind {
            TypeExprKind::Named {
                package: qualifier,
                name,
                args,
            } => {
                let args = args
                    .iter()
                    .map(|arg| self.resolve_type(scope, arg))
                    .collect::<Result<Vec<_>, ModelError>>()?;
                let package = match qualifier {
                    Some(qualifier) => Some(self.import_path(scope, &qualifier.name, &name.name)?),
                    None => match scope.path {
                        // Names declared by a built-in package belong to it
                        Some(path) if scope.package.lookup(&name.name).is_some() => {
                            self.record_builtin(path);
                            Some(path.to_string())
                        }
                        _ => None,
                    },
                };
                TypeRef::Named {
                    package,
                    name: name.name.clone(),
                    args,
                }
            }
            TypeExprKind::Pointer(elem) => TypeRef::Pointer(Box::new(self.resolve_type(scope, elem)?)),
            TypeExprKind::Slice(elem) => TypeRef::Slice(Box::new(self.resolve_type(scope, elem)?)),
            TypeExprKind::Array { len, elem } => TypeRef::Array {
                len: len.clone(),
                elem: Box::new(self.resolve_type(scope, elem)?),
            },
            TypeExprKind::Map { key, value } => TypeRef::Map {
                key: Box::new(self.resolve_type(scope, key)?),
                value: Box::new(self.resolve_type(scope, value)?),
            },
            TypeExprKind::Chan { dir, elem } => TypeRef::Chan {
                dir: *dir,
                elem: Box::new(self.resolve_type(scope, elem)?),
            },
            TypeExprKind::Func(sig) => TypeRef::Func(self.signature(scope, sig)?),
            TypeExprKind::Interface(elems) => {
                let mut methods = Vec::new();
                let mut embeds = Vec::new();
                for elem in elems {
                    match elem {
                        InterfaceElem::Method { name, sig } => {
                            methods.push((name.name.clone(), self.signature(scope, sig)?));
                        }
                        InterfaceElem::Embed(embed) => embeds.push(self.resolve_type(scope, embed)?),
                    }
                }
                TypeRef::Interface { methods, embeds }
            }
            TypeExprKind::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| {
                        Ok(StructField {
                            names: field.names.iter().map(|n| n.name.clone()).collect(),
                            ty: self.resolve_type(scope, &field.ty)?,
                            tag: field.tag.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, ModelError>>()?;
                TypeRef::Struct(fields)
            }
            TypeExprKind::Paren(inner) => self.resolve_type(scope, inner)?,
            TypeExprKind::Union(_) | TypeExprKind::Tilde(_) => {
                return Err(self.unsupported("a signature uses a type set".to_string()));
            }
        };
        Ok(resolved)
    }

    /// Find the declaration a (possibly qualified) name refers to from `scope`.
    fn resolve_decl<'a>(
        &mut self,
        scope: Scope<'a>,
        qualifier: Option<&str>,
        name: &str,
    ) -> Result<Option<(Scope<'a>, Decl<'a>)>, ModelError> {
        let (package, path): (&'a Package, Option<&'static str>) = match qualifier {
            None => {
                if let Some(decl) = scope.package.lookup(name) {
                    return Ok(Some((
                        Scope {
                            file: decl.file,
                            ..scope
                        },
                        decl,
                    )));
                }
                (builtins::universe(), None)
            }
            Some(qualifier) => {
                let path = self.import_path(scope, qualifier, name)?;
                match builtins::PATHS.iter().find(|known| **known == path) {
                    Some(known) => match builtins::package(known) {
                        Some(package) => (package, Some(*known)),
                        None => return Ok(None),
                    },
                    None => return Ok(None),
                }
            }
        };

        Ok(package.lookup(name).map(|decl| {
            (
                Scope {
                    package,
                    file: decl.file,
                    path,
                },
                decl,
            )
        }))
    }

    /// Resolve a qualifier through the imports of the scope's file and
    /// remember the package for the generated import block.
    fn import_path(&mut self, scope: Scope<'_>, qualifier: &str, name: &str) -> Result<String, ModelError> {
        let import = scope
            .file
            .import_for(qualifier)
            .ok_or_else(|| ModelError::UnknownPackage {
                qualifier: qualifier.to_string(),
                context: format!("{qualifier}.{name}"),
            })?;

        let aliased = matches!(import.name, ImportName::Named(_));
        let package_name = if aliased {
            qualifier.to_string()
        } else {
            default_package_name(&import.path)
        };
        self.imports
            .entry(import.path.clone())
            .or_insert_with(|| PackageRef {
                path: import.path.clone(),
                name: package_name,
                aliased,
            });
        Ok(import.path.clone())
    }

    fn record_builtin(&mut self, path: &str) {
        self.imports
            .entry(path.to_string())
            .or_insert_with(|| PackageRef {
                path: path.to_string(),
                name: default_package_name(path),
                aliased: false,
            });
    }

    fn unsupported(&self, reason: String) -> ModelError {
        ModelError::UnsupportedInterface {
            name: self.interface.clone(),
            reason,
        }
    }
}

fn unparen(ty: &TypeExpr) -> &TypeExprKind {
    match &ty.kind {
        TypeExprKind::Paren(inner) => unparen(inner),
        kind => kind,
    }
}

fn display_name(qualifier: Option<&str>, name: &str) -> String {
    match qualifier {
        Some(qualifier) => format!("{qualifier}.{name}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(source: &str) -> Package {
        Package::from_sources([("a.go", source)]).expect("package parses")
    }

    fn method_names(spec: &InterfaceSpec) -> Vec<&str> {
        spec.methods.iter().map(|m| m.name.as_str()).collect()
    }

    fn named(package: Option<&str>, name: &str) -> TypeRef {
        TypeRef::Named {
            package: package.map(str::to_string),
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    #[test]
    fn extract_simple_interface() {
        let pkg = package("package greet\n\ntype Greeter interface {\n\tGreet(name string) string\n}\n");
        let spec = extract(&pkg, "Greeter").expect("extract");
        assert_eq!(spec.name, "Greeter");
        assert_eq!(spec.package, "greet");
        assert_eq!(spec.methods.len(), 1);
        let greet = &spec.methods[0];
        assert_eq!(greet.name, "Greet");
        assert_eq!(greet.params[0].name.as_deref(), Some("name"));
        assert_eq!(greet.params[0].ty, TypeRef::local("string"));
        assert_eq!(greet.results, [TypeRef::local("string")]);
        assert!(!greet.variadic);
        assert!(spec.imports.is_empty());
    }

    #[test]
    fn target_not_found() {
        let pkg = package("package p\n");
        let err = extract(&pkg, "Missing").expect_err("missing");
        assert_eq!(
            err,
            ModelError::TargetNotFound {
                name: "Missing".to_string(),
                package: "p".to_string()
            }
        );
    }

    #[test]
    fn struct_is_not_an_interface() {
        let pkg = package("package p\n\ntype Config struct {\n\tName string\n}\n");
        let err = extract(&pkg, "Config").expect_err("struct");
        assert_eq!(
            err,
            ModelError::NotAnInterface {
                name: "Config".to_string(),
                kind: "struct".to_string()
            }
        );
    }

    #[test]
    fn embedded_methods_are_spliced_in_place() {
        let pkg = package(
            "package p\n\ntype Base interface {\n\tB1()\n\tB2()\n}\n\ntype Full interface {\n\tFirst()\n\tBase\n\tLast()\n}\n",
        );
        let spec = extract(&pkg, "Full").expect("extract");
        assert_eq!(method_names(&spec), ["First", "B1", "B2", "Last"]);
    }

    #[test]
    fn declaration_order_not_alphabetical() {
        let pkg = package("package p\n\ntype S interface {\n\tZed()\n\tAlpha()\n\tMid()\n}\n");
        let spec = extract(&pkg, "S").expect("extract");
        assert_eq!(method_names(&spec), ["Zed", "Alpha", "Mid"]);
    }

    #[test]
    fn anonymous_interface_embed_is_flattened() {
        let pkg = package("package p\n\ntype S interface {\n\tinterface{ Inner() }\n\tOuter()\n}\n");
        let spec = extract(&pkg, "S").expect("extract");
        assert_eq!(method_names(&spec), ["Inner", "Outer"]);
    }

    #[test]
    fn identical_repeats_are_merged() {
        let pkg = package(
            "package p\n\nimport \"io\"\n\ntype RWC interface {\n\tio.ReadCloser\n\tio.WriteCloser\n}\n",
        );
        let spec = extract(&pkg, "RWC").expect("extract");
        assert_eq!(method_names(&spec), ["Read", "Close", "Write"]);
        // io itself is never mentioned by the flattened signatures
        assert!(spec.imports.is_empty());
    }

    #[test]
    fn conflicting_repeats_are_ambiguous() {
        let pkg = package(
            "package p\n\ntype A interface {\n\tDo() error\n}\n\ntype B interface {\n\tA\n\tDo() string\n}\n",
        );
        let err = extract(&pkg, "B").expect_err("ambiguous");
        assert_eq!(
            err,
            ModelError::AmbiguousMethod {
                interface: "B".to_string(),
                method: "Do".to_string()
            }
        );
    }

    #[test]
    fn error_embed_comes_from_universe() {
        let pkg = package("package p\n\ntype Failure interface {\n\terror\n\tCode() int\n}\n");
        let spec = extract(&pkg, "Failure").expect("extract");
        assert_eq!(method_names(&spec), ["Error", "Code"]);
        assert_eq!(spec.methods[0].results, [TypeRef::local("string")]);
    }

    #[test]
    fn builtin_package_names_are_qualified() {
        let pkg = package(
            "package p\n\nimport myio \"io\"\n\ntype Sink interface {\n\tmyio.ReaderFrom\n}\n",
        );
        let spec = extract(&pkg, "Sink").expect("extract");
        let read_from = &spec.methods[0];
        assert_eq!(read_from.params[0].ty, named(Some("io"), "Reader"));
        // The qualifier chosen in the source is reused
        let io = &spec.imports["io"];
        assert_eq!(io.name, "myio");
        assert!(io.aliased);
    }

    #[test]
    fn qualified_types_resolve_through_file_imports() {
        let pkg = Package::from_sources([
            (
                "a.go",
                "package p\n\nimport ctx \"context\"\n\ntype Service interface {\n\tRun(c ctx.Context) error\n}\n",
            ),
            ("b.go", "package p\n\nimport \"net/http\"\n\ntype H interface {\n\tServe(r *http.Request)\n}\n"),
        ])
        .expect("package parses");

        let spec = extract(&pkg, "Service").expect("extract");
        assert_eq!(spec.methods[0].params[0].ty, named(Some("context"), "Context"));
        assert_eq!(
            spec.imports["context"],
            PackageRef {
                path: "context".to_string(),
                name: "ctx".to_string(),
                aliased: true
            }
        );

        let spec = extract(&pkg, "H").expect("extract");
        assert_eq!(
            spec.methods[0].params[0].ty,
            TypeRef::Pointer(Box::new(named(Some("net/http"), "Request")))
        );
        assert_eq!(spec.imports["net/http"].name, "http");
    }

    #[test]
    fn context_embed_imports_time() {
        let pkg = package("package p\n\nimport \"context\"\n\ntype C interface {\n\tcontext.Context\n}\n");
        let spec = extract(&pkg, "C").expect("extract");
        assert_eq!(method_names(&spec), ["Deadline", "Done", "Err", "Value"]);
        assert_eq!(spec.imports.keys().collect::<Vec<_>>(), ["time"]);
    }

    #[test]
    fn only_referenced_imports_are_kept() {
        let pkg = package(
            "package p\n\nimport (\n\t\"io\"\n\t\"time\"\n\t\"net/http\"\n)\n\ntype S interface {\n\tio.Closer\n\tWait(d time.Duration)\n\tHeader() http.Header\n}\n",
        );
        let spec = extract(&pkg, "S").expect("extract");
        assert_eq!(spec.imports.keys().collect::<Vec<_>>(), ["net/http", "time"]);
    }

    #[test]
    fn unknown_qualifier() {
        let pkg = package("package p\n\ntype S interface {\n\tGet() http.Header\n}\n");
        let err = extract(&pkg, "S").expect_err("unknown package");
        assert!(matches!(err, ModelError::UnknownPackage { ref qualifier, .. } if qualifier == "http"));
    }

    #[test]
    fn unresolved_embeds() {
        let pkg = package("package p\n\nimport \"net/http\"\n\ntype S interface {\n\tMissing\n}\n\ntype T interface {\n\thttp.Handler\n}\n");
        assert!(matches!(
            extract(&pkg, "S"),
            Err(ModelError::UnresolvedEmbed { ref embed, .. }) if embed == "Missing"
        ));
        assert!(matches!(
            extract(&pkg, "T"),
            Err(ModelError::UnresolvedEmbed { ref embed, .. }) if embed == "http.Handler"
        ));
    }

    #[test]
    fn recursive_embeds() {
        let pkg = package("package p\n\ntype A interface {\n\tB\n}\n\ntype B interface {\n\tA\n}\n");
        assert!(matches!(extract(&pkg, "A"), Err(ModelError::RecursiveEmbed { .. })));
    }

    #[test]
    fn aliases_and_defined_types_are_followed() {
        let pkg = package(
            "package p\n\ntype Base interface {\n\tRun()\n}\n\ntype Alias = Base\n\ntype Defined Base\n\ntype Err = error\n",
        );
        assert_eq!(method_names(&extract(&pkg, "Alias").expect("alias")), ["Run"]);
        assert_eq!(method_names(&extract(&pkg, "Defined").expect("defined")), ["Run"]);
        assert_eq!(method_names(&extract(&pkg, "Err").expect("error alias")), ["Error"]);
    }

    #[test]
    fn unsupported_interfaces() {
        let pkg = package(
            "package p\n\ntype Gen[T any] interface {\n\tGet() T\n}\n\ntype Num interface {\n\t~int | ~float64\n}\n\ntype Cmp interface {\n\tcomparable\n}\n\ntype Data struct{}\n\ntype Mixed interface {\n\tData\n}\n",
        );
        for name in ["Gen", "Num", "Cmp", "Mixed"] {
            assert!(
                matches!(extract(&pkg, name), Err(ModelError::UnsupportedInterface { .. })),
                "{name} should be unsupported"
            );
        }
    }

    #[test]
    fn empty_interface_and_any_embed() {
        let pkg = package("package p\n\ntype Empty interface{}\n\ntype AnyOf interface {\n\tany\n}\n");
        assert!(extract(&pkg, "Empty").expect("empty").methods.is_empty());
        assert!(extract(&pkg, "AnyOf").expect("any").methods.is_empty());
    }

    #[test]
    fn variadic_methods() {
        let pkg = package("package p\n\ntype Logger interface {\n\tLogf(format string, args ...any)\n}\n");
        let spec = extract(&pkg, "Logger").expect("extract");
        let logf = &spec.methods[0];
        assert!(logf.variadic);
        assert_eq!(logf.params[1].ty, TypeRef::local("any"));
    }
}
