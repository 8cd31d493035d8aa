// src/cli/args.rs

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::commands::version::version_string;
use crate::config::{Config, OutputTarget};

/// Color output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Generate hookable middleware wrappers for Go interfaces
#[derive(Parser, Debug)]
#[command(name = "middlewarer")]
#[command(version = version_string())]
#[command(about = "Generate middleware wrappers for Go interfaces", long_about = None)]
pub struct Cli {
    /// Name of the interface to wrap
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub target: String,

    /// Write to FILE instead of stdout; without FILE, write
    /// <dir>/<type>_middleware.go
    #[arg(short, long, value_name = "FILE", num_args = 0..=1)]
    pub output: Option<Option<PathBuf>>,

    /// Directory of the Go package declaring the interface
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Comma-separated build tags, as for `go build -tags`
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Don't write; fail if the output file is missing or out of date
    #[arg(long, requires = "output")]
    pub check: bool,

    /// Color output: auto, always, never
    #[arg(long, hide = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

impl Cli {
    /// Convert parsed arguments into a run configuration. `invocation` is
    /// recorded in the generated file's header, minus `--check`, so a
    /// checked file compares equal to the one a plain run writes.
    pub fn into_config(self, mut invocation: Vec<String>) -> Config {
        invocation.retain(|arg| arg != "--check");
        let output = match self.output {
            None => OutputTarget::Stdout,
            Some(None) => OutputTarget::Default,
            Some(Some(path)) => OutputTarget::File(path),
        };
        Config {
            target: self.target,
            dir: self.dir,
            output,
            check: self.check,
            tags: self.tags,
            invocation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Config {
        let cli = Cli::try_parse_from(std::iter::once("middlewarer").chain(args.iter().copied()))
            .expect("arguments parse");
        cli.into_config(args.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_stdout_and_current_dir() {
        let config = parse(&["-t", "Greeter"]);
        assert_eq!(config.target, "Greeter");
        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(config.dir, PathBuf::from("."));
        assert!(!config.check);
        assert_eq!(config.invocation, ["-t", "Greeter"]);
    }

    #[test]
    fn bare_output_flag_uses_default_file() {
        let config = parse(&["--type", "Greeter", "-o"]);
        assert_eq!(config.output, OutputTarget::Default);
        let config = parse(&["-o", "-t", "Greeter", "-d", "pkg"]);
        assert_eq!(config.output, OutputTarget::Default);
        assert_eq!(
            config.destination(),
            Some(PathBuf::from("pkg/greeter_middleware.go"))
        );
    }

    #[test]
    fn output_file_and_check() {
        let config = parse(&["-t", "Greeter", "-o", "wrap.go", "--check"]);
        assert_eq!(config.output, OutputTarget::File(PathBuf::from("wrap.go")));
        assert!(config.check);
        assert_eq!(config.invocation, ["-t", "Greeter", "-o", "wrap.go"]);
    }

    #[test]
    fn tags_are_comma_separated() {
        let config = parse(&["-t", "Greeter", "--tags", "enterprise,debug"]);
        assert_eq!(config.tags, ["enterprise", "debug"]);
        assert!(parse(&["-t", "Greeter"]).tags.is_empty());
    }

    #[test]
    fn type_is_required() {
        assert!(Cli::try_parse_from(["middlewarer"]).is_err());
    }

    #[test]
    fn check_requires_output() {
        assert!(Cli::try_parse_from(["middlewarer", "-t", "Greeter", "--check"]).is_err());
    }
}
