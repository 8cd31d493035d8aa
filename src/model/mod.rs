// src/model/mod.rs
//! The method-set model the synthesis planner works from.

mod extract;
pub mod types;

pub use extract::extract;
pub use types::{ChanDir, InterfaceSpec, MethodSpec, PackageRef, Param, Signature, StructField, TypeRef};

use crate::catalog::Package;
use crate::errors::ModelError;

/// Something that can describe the interfaces of one compilation unit.
pub trait InterfaceSource {
    /// Name of the compilation unit's package
    fn package_name(&self) -> &str;

    /// Resolve `name` to its flattened method set.
    fn interface(&self, name: &str) -> Result<InterfaceSpec, ModelError>;
}

impl InterfaceSource for Package {
    fn package_name(&self) -> &str {
        self.name()
    }

    fn interface(&self, name: &str) -> Result<InterfaceSpec, ModelError> {
        extract(self, name)
    }
}
