// src/config.rs
//! Run configuration, independent of how it was parsed.

use std::path::{Path, PathBuf};

/// Where the generated file goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// `<dir>/<lowercased target>_middleware.go`
    Default,
    File(PathBuf),
}

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name of the interface to wrap
    pub target: String,
    /// Directory of the Go package declaring it
    pub dir: PathBuf,
    pub output: OutputTarget,
    /// Compare with the existing file instead of writing it
    pub check: bool,
    /// Build tags that select files by their `//go:build` lines
    pub tags: Vec<String>,
    /// Arguments recorded in the provenance header
    pub invocation: Vec<String>,
}

impl Config {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            dir: PathBuf::from("."),
            output: OutputTarget::Stdout,
            check: false,
            tags: Vec::new(),
            invocation: Vec::new(),
        }
    }

    /// File the artifact is written to, or `None` for stdout.
    pub fn destination(&self) -> Option<PathBuf> {
        match &self.output {
            OutputTarget::Stdout => None,
            OutputTarget::Default => Some(default_output(&self.dir, &self.target)),
            OutputTarget::File(path) => Some(path.clone()),
        }
    }
}

pub fn default_output(dir: &Path, target: &str) -> PathBuf {
    dir.join(format!("{}_middleware.go", target.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_has_no_destination() {
        let config = Config::new("Greeter");
        assert_eq!(config.destination(), None);
        assert_eq!(config.dir, PathBuf::from("."));
    }

    #[test]
    fn default_destination_is_derived_from_target() {
        let config = Config {
            dir: PathBuf::from("pkg/greet"),
            output: OutputTarget::Default,
            ..Config::new("HTTPGreeter")
        };
        assert_eq!(
            config.destination(),
            Some(PathBuf::from("pkg/greet/httpgreeter_middleware.go"))
        );
    }

    #[test]
    fn explicit_file_is_used_as_given() {
        let config = Config {
            output: OutputTarget::File(PathBuf::from("out/wrap.go")),
            ..Config::new("Greeter")
        };
        assert_eq!(config.destination(), Some(PathBuf::from("out/wrap.go")));
    }
}
