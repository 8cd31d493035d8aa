// src/synth/mod.rs
//! Synthesis planning: from a method set to the structured units of the
//! generated file.
//!
//! A [`Plan`] holds, in output order, one constructor, one carrier type,
//! one [`HookTypeUnit`] per method and one [`MethodImplUnit`] per method.
//! Nothing here produces text; the emitter renders the plan.

pub mod ir;
pub mod naming;
mod planner;

pub use planner::plan;

use rustc_hash::FxHashSet;

use crate::model::{PackageRef, TypeRef};
use ir::Stmt;

/// A named, typed slot: a parameter or a receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub ty: TypeRef,
    /// Written as `...T`; `ty` is the element type
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Vec<String>,
    pub receiver: Option<Binding>,
    pub name: String,
    pub params: Vec<Binding>,
    pub results: Vec<TypeRef>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
}

/// `type Name struct { ... }`. Groups are separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub doc: Vec<String>,
    pub name: String,
    pub groups: Vec<Vec<FieldDef>>,
}

impl StructDecl {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.groups.iter().flatten()
    }
}

/// `type Name <ty>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub doc: Vec<String>,
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorUnit {
    pub func: FuncDecl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierTypeUnit {
    pub decl: StructDecl,
}

/// The hook types of one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookTypeUnit {
    pub method: String,
    pub before: TypeDecl,
    pub after: TypeDecl,
    pub hooks: StructDecl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodImplUnit {
    pub method: String,
    pub func: FuncDecl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisUnit {
    Constructor(ConstructorUnit),
    Carrier(CarrierTypeUnit),
    HookTypes(HookTypeUnit),
    Method(MethodImplUnit),
}

/// One import of the generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    /// Qualifier used for the package in the generated file
    pub name: String,
    /// Whether the import spells out `name`
    pub explicit: bool,
}

/// Imports of the generated file, sorted by path, with unique qualifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    imports: Vec<Import>,
}

impl ImportTable {
    /// Assign qualifiers in path order. A qualifier that is already used
    /// (or is `reserved`) gets a numeric suffix: `name2`, `name3`, ...
    pub fn new<'a>(
        packages: impl IntoIterator<Item = &'a PackageRef>,
        reserved: &[&str],
    ) -> Self {
        let mut packages: Vec<&PackageRef> = packages.into_iter().collect();
        packages.sort_by(|a, b| a.path.cmp(&b.path));

        let mut taken: FxHashSet<String> = reserved.iter().map(|r| r.to_string()).collect();
        let mut imports = Vec::with_capacity(packages.len());
        for package in packages {
            let mut name = package.name.clone();
            let mut suffix = 2;
            while taken.contains(&name) {
                name = format!("{}{suffix}", package.name);
                suffix += 1;
            }
            let renamed = name != package.name;
            if renamed {
                tracing::debug!(path = %package.path, qualifier = %name, "renamed import");
            }
            taken.insert(name.clone());
            imports.push(Import {
                path: package.path.clone(),
                name,
                explicit: package.aliased || renamed,
            });
        }
        Self { imports }
    }

    pub fn qualifier(&self, path: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|import| import.path == path)
            .map(|import| import.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.imports.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }
}

/// Everything needed to render the generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub package: String,
    pub imports: ImportTable,
    pub units: Vec<SynthesisUnit>,
}

impl Plan {
    pub fn constructor(&self) -> Option<&ConstructorUnit> {
        self.units.iter().find_map(|unit| match unit {
            SynthesisUnit::Constructor(c) => Some(c),
            _ => None,
        })
    }

    pub fn carrier(&self) -> Option<&CarrierTypeUnit> {
        self.units.iter().find_map(|unit| match unit {
            SynthesisUnit::Carrier(c) => Some(c),
            _ => None,
        })
    }

    pub fn hook_types(&self) -> impl Iterator<Item = &HookTypeUnit> {
        self.units.iter().filter_map(|unit| match unit {
            SynthesisUnit::HookTypes(h) => Some(h),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodImplUnit> {
        self.units.iter().filter_map(|unit| match unit {
            SynthesisUnit::Method(m) => Some(m),
            _ => None,
        })
    }
}
