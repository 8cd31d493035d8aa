// src/catalog/mod.rs
//! Loading a Go package directory into a scope of type declarations.

pub mod builtins;
pub mod constraint;

use std::path::{Path, PathBuf};

use miette::NamedSource;
use rustc_hash::FxHashMap;

use crate::errors::{CatalogError, SyntaxError};
use crate::frontend::Parser;
use crate::frontend::ast::{SourceFile, TypeSpec};

pub use constraint::BuildContext;

/// Origin named in diagnostics for packages built from in-memory sources
const IN_MEMORY: &str = "<in-memory sources>";

/// One parsed file of a package
#[derive(Debug)]
pub struct PackageFile {
    pub path: String,
    pub ast: SourceFile,
}

/// A type declaration together with the file that declares it.
/// The file's imports give meaning to the declaration's qualifiers.
#[derive(Debug, Clone, Copy)]
pub struct Decl<'a> {
    pub file: &'a SourceFile,
    pub spec: &'a TypeSpec,
}

/// The type declarations of a single Go package
#[derive(Debug)]
pub struct Package {
    name: String,
    files: Vec<PackageFile>,
    scope: FxHashMap<String, (usize, usize)>,
}

impl Package {
    /// Load the non-test `.go` files directly inside `dir` that `build`
    /// selects.
    #[tracing::instrument(skip_all, fields(dir = %dir.display(), goos = %build.goos, goarch = %build.goarch))]
    pub fn load(dir: &Path, build: &BuildContext) -> Result<Self, CatalogError> {
        let paths = discover(dir)?;
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let text = std::fs::read_to_string(&path).map_err(|source| CatalogError::ReadFile {
                path: path.display().to_string(),
                source,
            })?;
            sources.push((path.display().to_string(), text));
        }
        tracing::debug!(files = sources.len(), "read package sources");

        Self::from_sources_in(&dir.display().to_string(), build, sources)
    }

    /// Build a package from `(file name, source)` pairs for the host
    /// platform.
    pub fn from_sources<N, S>(sources: impl IntoIterator<Item = (N, S)>) -> Result<Self, CatalogError>
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self::from_sources_in(IN_MEMORY, &BuildContext::host(), sources)
    }

    /// Build a package from the `(file name, source)` pairs that `build`
    /// selects. `origin` names the sources in diagnostics.
    pub fn from_sources_in<N, S>(
        origin: &str,
        build: &BuildContext,
        sources: impl IntoIterator<Item = (N, S)>,
    ) -> Result<Self, CatalogError>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let mut files: Vec<PackageFile> = Vec::new();
        let mut texts: Vec<String> = Vec::new();
        let mut excluded = 0usize;

        for (path, text) in sources {
            let path: String = path.into();
            let text: String = text.into();

            let file_name = Path::new(&path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(path.as_str());
            let included = build
                .includes(file_name, &text)
                .map_err(|reason| CatalogError::BuildConstraint {
                    file: path.clone(),
                    src: NamedSource::new(&path, text.clone()),
                    span: reason.span(),
                    reason,
                })?;
            if !included {
                tracing::debug!(file = %path, "excluded by build constraints");
                excluded += 1;
                continue;
            }

            let ast = parse_file(&path, &text)?;

            if let Some(first) = files.first()
                && first.ast.package.name != ast.package.name
            {
                return Err(CatalogError::MultiplePackages {
                    first: first.ast.package.name.clone(),
                    first_file: first.path.clone(),
                    second: ast.package.name,
                    second_file: path,
                });
            }

            files.push(PackageFile { path, ast });
            texts.push(text);
        }

        let Some(first) = files.first() else {
            let dir = origin.to_string();
            return Err(if excluded > 0 {
                CatalogError::AllFilesExcluded { dir }
            } else {
                CatalogError::NoGoFiles { dir }
            });
        };
        let name = first.ast.package.name.clone();

        let mut scope: FxHashMap<String, (usize, usize)> = FxHashMap::default();
        for (file_index, file) in files.iter().enumerate() {
            for (type_index, spec) in file.ast.types.iter().enumerate() {
                if spec.name.name == "_" {
                    continue;
                }
                if let Some(&(previous, _)) = scope.get(&spec.name.name) {
                    return Err(CatalogError::DuplicateType {
                        name: spec.name.name.clone(),
                        previous_file: files[previous].path.clone(),
                        src: NamedSource::new(&file.path, texts[file_index].clone()),
                        span: spec.name.span.into(),
                    });
                }
                scope.insert(spec.name.name.clone(), (file_index, type_index));
            }
        }

        tracing::debug!(package = %name, types = scope.len(), "built package scope");
        Ok(Self { name, files, scope })
    }

    /// Package name from the package clause
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[PackageFile] {
        &self.files
    }

    /// Find a package-level type declaration by name
    pub fn lookup(&self, name: &str) -> Option<Decl<'_>> {
        let &(file_index, type_index) = self.scope.get(name)?;
        let file = &self.files[file_index].ast;
        Some(Decl {
            file,
            spec: &file.types[type_index],
        })
    }
}

/// Parse one file, collecting every lexer error, or the parser error when
/// the tokens were clean.
fn parse_file(path: &str, text: &str) -> Result<SourceFile, CatalogError> {
    let mut parser = Parser::new(text);
    let result = parser.parse_file();
    let lexer_errors = parser.take_lexer_errors();

    let errors: Vec<SyntaxError> = if !lexer_errors.is_empty() {
        lexer_errors.into_iter().map(SyntaxError::from).collect()
    } else {
        match result {
            Ok(ast) => return Ok(ast),
            Err(e) => vec![SyntaxError::from(e)],
        }
    };

    tracing::debug!(file = path, errors = errors.len(), "syntax errors");
    Err(CatalogError::Syntax {
        file: path.to_string(),
        src: NamedSource::new(path, text.to_string()),
        errors,
    })
}

/// Sorted non-test `.go` files directly inside `dir`. Names starting with
/// `_` or `.` are ignored, as `go build` ignores them.
fn discover(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    // glob skips unreadable directories silently
    std::fs::read_dir(dir).map_err(|source| CatalogError::ReadDir {
        dir: dir.display().to_string(),
        source,
    })?;

    let pattern = format!(
        "{}/*.go",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern).map_err(|source| CatalogError::Pattern {
        dir: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    !name.ends_with("_test.go") && !name.starts_with(['_', '.'])
                })
        })
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn linux() -> BuildContext {
        BuildContext::new("linux", "amd64")
    }

    fn write(dir: &Path, name: &str, text: &str) {
        std::fs::write(dir.join(name), text).expect("write test file");
    }

    #[test]
    fn load_skips_test_and_non_go_files() {
        let dir = TempDir::new().expect("create temp dir");
        write(dir.path(), "b.go", "package greet\n\ntype B int\n");
        write(dir.path(), "a.go", "package greet\n\ntype A interface{}\n");
        write(dir.path(), "a_test.go", "package greet_test\n");
        write(dir.path(), "_scratch.go", "package scratch\n");
        write(dir.path(), ".hidden.go", "package hidden\n");
        write(dir.path(), "notes.txt", "not go");

        let package = Package::load(dir.path(), &linux()).expect("load package");
        assert_eq!(package.name(), "greet");
        let files: Vec<_> = package
            .files()
            .iter()
            .map(|f| Path::new(&f.path).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, ["a.go", "b.go"]);
        assert!(package.lookup("A").is_some());
        assert!(package.lookup("B").is_some());
        assert!(package.lookup("C").is_none());
    }

    #[test]
    fn load_empty_directory() {
        let dir = TempDir::new().expect("create temp dir");
        let err = Package::load(dir.path(), &linux()).expect_err("no go files");
        assert!(matches!(err, CatalogError::NoGoFiles { .. }));
    }

    #[test]
    fn load_missing_directory() {
        let dir = TempDir::new().expect("create temp dir");
        let err = Package::load(&dir.path().join("missing"), &linux()).expect_err("missing dir");
        assert!(matches!(err, CatalogError::ReadDir { .. }));
    }

    #[test]
    fn load_directory_with_glob_characters() {
        let dir = TempDir::new().expect("create temp dir");
        let odd = dir.path().join("pkg[1]");
        std::fs::create_dir(&odd).expect("create dir");
        write(&odd, "a.go", "package odd\n");
        let package = Package::load(&odd, &linux()).expect("load package");
        assert_eq!(package.name(), "odd");
    }

    #[test]
    fn multiple_package_names() {
        let err = Package::from_sources([
            ("a.go", "package one\n"),
            ("b.go", "package two\n"),
        ])
        .expect_err("two packages");
        assert!(matches!(
            err,
            CatalogError::MultiplePackages { ref first, ref second, .. } if first == "one" && second == "two"
        ));
    }

    #[test]
    fn duplicate_type_across_files() {
        let err = Package::from_sources([
            ("a.go", "package p\ntype A int\n"),
            ("b.go", "package p\ntype A string\n"),
        ])
        .expect_err("duplicate type");
        assert!(matches!(
            err,
            CatalogError::DuplicateType { ref name, ref previous_file, .. } if name == "A" && previous_file == "a.go"
        ));
    }

    #[test]
    fn syntax_errors_are_reported_per_file() {
        let err = Package::from_sources([("bad.go", "package p\ntype A interface {\n")])
            .expect_err("syntax error");
        let CatalogError::Syntax { file, errors, .. } = err else {
            panic!("expected syntax error, got {err:?}");
        };
        assert_eq!(file, "bad.go");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SyntaxError::Parser(_)));
    }

    #[test]
    fn lexer_errors_take_precedence() {
        let err = Package::from_sources([("bad.go", "package p\ntype A \"open\n type B ` \n")])
            .expect_err("lexer errors");
        let CatalogError::Syntax { errors, .. } = err else {
            panic!("expected syntax error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, SyntaxError::Lexer(_))));
    }

    #[test]
    fn ignored_generator_is_left_out() {
        let package = Package::from_sources_in(
            "greet",
            &linux(),
            [
                ("gen.go", "//go:build ignore\n\npackage main\n\ntype handle int\n"),
                ("greet.go", "package greet\n\ntype Greeter interface{}\n"),
            ],
        )
        .expect("generator is excluded");
        assert_eq!(package.name(), "greet");
        assert_eq!(package.files().len(), 1);
        assert!(package.lookup("handle").is_none());
    }

    #[test]
    fn platform_files_are_selected_by_name() {
        let sources = [
            ("h_linux.go", "package p\n\ntype handle int\n"),
            ("h_windows.go", "package p\n\ntype handle uintptr\n"),
        ];
        let on_linux = Package::from_sources_in("p", &linux(), sources).expect("linux build");
        assert_eq!(on_linux.files()[0].path, "h_linux.go");
        let on_windows = Package::from_sources_in("p", &BuildContext::new("windows", "amd64"), sources)
            .expect("windows build");
        assert_eq!(on_windows.files()[0].path, "h_windows.go");
        assert_eq!(on_windows.files().len(), 1);
    }

    #[test]
    fn tags_select_between_variants() {
        let sources = [
            ("a.go", "//go:build enterprise\n\npackage p\n\ntype Edition interface{ Pro() }\n"),
            ("b.go", "//go:build !enterprise\n\npackage p\n\ntype Edition interface{}\n"),
        ];
        let community = Package::from_sources_in("p", &linux(), sources).expect("default build");
        assert_eq!(community.files()[0].path, "b.go");
        let enterprise = Package::from_sources_in("p", &linux().with_tags(["enterprise"]), sources)
            .expect("tagged build");
        assert_eq!(enterprise.files()[0].path, "a.go");
    }

    #[test]
    fn every_file_excluded() {
        let err = Package::from_sources_in(
            "pkg",
            &linux(),
            [("gen.go", "//go:build ignore\npackage main\n")],
        )
        .expect_err("nothing left");
        assert!(matches!(err, CatalogError::AllFilesExcluded { ref dir } if dir == "pkg"));
    }

    #[test]
    fn malformed_build_line_is_reported() {
        let err = Package::from_sources_in(
            "pkg",
            &linux(),
            [("bad.go", "//go:build linux &&\npackage p\n")],
        )
        .expect_err("bad constraint");
        let CatalogError::BuildConstraint { file, span, .. } = err else {
            panic!("expected a build constraint error, got {err:?}");
        };
        assert_eq!(file, "bad.go");
        assert_eq!(span.offset(), 19);
    }

    #[test]
    fn in_memory_packages_need_sources() {
        let err = Package::from_sources(Vec::<(&str, &str)>::new()).expect_err("no sources");
        assert!(matches!(err, CatalogError::NoGoFiles { ref dir } if dir == "<in-memory sources>"));
    }
}
