// src/synth/naming.rs
//! Names of everything the generated file declares.

use rustc_hash::FxHashSet;
use unicode_normalization::UnicodeNormalization;

use crate::model::TypeRef;

/// Receiver of the generated methods
pub const RECEIVER: &str = "m";
/// Short-circuit flag returned by before-hooks
pub const SKIP: &str = "skip";
/// Carrier field holding the wrapped implementation
pub const WRAPPED: &str = "wrapped";
/// Constructor parameter names
pub const TO_WRAP: &str = "toWrap";
pub const WRAPPER: &str = "wrapper";
/// Fields of a hooks struct
pub const BEFORE: &str = "Before";
pub const AFTER: &str = "After";

pub fn carrier(interface: &str) -> String {
    format!("{interface}Middleware")
}

pub fn constructor(interface: &str) -> String {
    format!("Wrap{interface}")
}

pub fn hook_field(method: &str) -> String {
    format!("{method}Hook")
}

pub fn before_func(method: &str) -> String {
    format!("{method}BeforeFunc")
}

pub fn after_func(method: &str) -> String {
    format!("{method}AfterFunc")
}

pub fn hooks_struct(method: &str) -> String {
    format!("{method}Hooks")
}

/// Local holding result `index` inside a generated method
pub fn result(index: usize) -> String {
    format!("r{index}")
}

/// Key under which two field names count as the same: NFC, then lowercase.
pub fn collision_key(name: &str) -> String {
    name.nfc().collect::<String>().to_lowercase()
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Whether `name` is a usable Go identifier (not blank, not a keyword)
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && name != "_"
        && !KEYWORDS.contains(&name)
}

/// Allocator for the local identifiers of one generated function.
#[derive(Debug, Default)]
pub struct LocalNames {
    taken: FxHashSet<String>,
}

impl LocalNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as used. Returns false if it already was.
    pub fn claim(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_string())
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Claim `base`, or `base` followed by as many `_` as needed.
    pub fn fresh(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        while !self.claim(&name) {
            name.push('_');
        }
        name
    }

    /// Claim every unqualified type name `ty` mentions, so no local
    /// shadows a type the function body needs.
    pub fn reserve_type_names(&mut self, ty: &TypeRef) {
        match ty {
            TypeRef::Named {
                package,
                name,
                args,
            } => {
                if package.is_none() {
                    self.claim(name);
                }
                for arg in args {
                    self.reserve_type_names(arg);
                }
            }
            TypeRef::Pointer(elem) | TypeRef::Slice(elem) => self.reserve_type_names(elem),
            TypeRef::Array { elem, .. } | TypeRef::Chan { elem, .. } => {
                self.reserve_type_names(elem)
            }
            TypeRef::Map { key, value } => {
                self.reserve_type_names(key);
                self.reserve_type_names(value);
            }
            TypeRef::Func(sig) => {
                for ty in sig.params.iter().chain(&sig.results) {
                    self.reserve_type_names(ty);
                }
            }
            TypeRef::Interface { methods, embeds } => {
                for (_, sig) in methods {
                    for ty in sig.params.iter().chain(&sig.results) {
                        self.reserve_type_names(ty);
                    }
                }
                for embed in embeds {
                    self.reserve_type_names(embed);
                }
            }
            TypeRef::Struct(fields) => {
                for field in fields {
                    self.reserve_type_names(&field.ty);
                }
            }
        }
    }
}
