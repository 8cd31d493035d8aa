// src/lib.rs
//! Generates middleware wrappers for Go interfaces.
//!
//! A run loads the Go package in a directory ([`catalog`]), extracts the
//! method set of the target interface ([`model`]), plans the generated
//! declarations ([`synth`]) and renders them ([`emit`]).

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod emit;
pub mod errors;
pub mod frontend;
pub mod model;
pub mod output;
pub mod synth;

pub use config::{Config, OutputTarget};
pub use emit::Provenance;
pub use errors::GenerateError;
pub use model::InterfaceSource;
pub use output::Artifact;

use catalog::{BuildContext, Package};

/// Generate the wrapper for `config.target` and decide where it goes.
///
/// Nothing is written; the caller writes or checks the returned artifact.
#[tracing::instrument(skip_all, fields(target = %config.target, dir = %config.dir.display()))]
pub fn run(config: &Config) -> Result<Artifact, GenerateError> {
    let build = BuildContext::host().with_tags(config.tags.iter().cloned());
    let package = Package::load(&config.dir, &build)?;
    let provenance = Provenance::new(config.invocation.iter().cloned());
    let text = generate(&package, &config.target, &provenance)?;
    Ok(Artifact {
        text,
        destination: config.destination(),
    })
}

/// Generate the text of the wrapper for interface `target` of `source`.
pub fn generate(
    source: &dyn InterfaceSource,
    target: &str,
    provenance: &Provenance,
) -> Result<String, GenerateError> {
    let spec = source.interface(target)?;
    tracing::debug!(
        package = source.package_name(),
        methods = spec.methods.len(),
        "extracted method set"
    );
    let plan = synth::plan(&spec)?;
    Ok(emit::emit(&plan, provenance))
}
