// src/emit/mod.rs
//! Renders a [`Plan`] as Go source.
//!
//! The plan is turned into a `pretty` document (see `printer`), rendered with
//! spaces and then re-indented with tabs, so the text is what `gofmt` would
//! print for the same declarations.

pub mod config;
mod printer;

pub use config::{CANONICAL, EmitConfig};

use pretty::{Arena, DocAllocator};

use crate::synth::Plan;

/// Name written into the provenance header
pub const TOOL: &str = "middlewarer";

/// Invocation recorded in the header of the generated file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Command-line arguments after the program name
    pub args: Vec<String>,
}

impl Provenance {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `// Code generated by "middlewarer <args>"; DO NOT EDIT.`
    pub fn header(&self) -> String {
        let mut command = TOOL.to_string();
        for arg in &self.args {
            command.push(' ');
            command.push_str(arg);
        }
        format!("// Code generated by \"{command}\"; DO NOT EDIT.")
    }
}

/// Render `plan` as the text of the generated file.
#[tracing::instrument(skip_all, fields(package = %plan.package))]
pub fn emit(plan: &Plan, provenance: &Provenance) -> String {
    let config = CANONICAL;
    let arena = Arena::new();
    let doc = arena
        .text(provenance.header())
        .append(arena.hardline())
        .append(arena.hardline())
        .append(printer::print_plan(&arena, plan));

    let mut rendered = String::new();
    doc.render_fmt(config.max_line_width as usize, &mut rendered)
        .expect("render to string cannot fail");

    let mut output = rendered
        .lines()
        .map(|line| config.retab(line))
        .collect::<Vec<_>>()
        .join("\n");
    output.push('\n');

    tracing::debug!(bytes = output.len(), "emitted");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Package;
    use crate::model::InterfaceSource;
    use crate::synth;

    fn generate(source: &str, target: &str, args: &[&str]) -> String {
        let package =
            Package::from_sources([("src.go", source)]).expect("test package parses");
        let spec = package.interface(target).expect("interface extracts");
        let plan = synth::plan(&spec).expect("interface plans");
        emit(&plan, &Provenance::new(args.iter().copied()))
    }

    #[test]
    fn greeter() {
        let out = generate(
            "package greet\n\ntype Greeter interface {\n\tGreet(name string) string\n}\n",
            "Greeter",
            &["-t", "Greeter"],
        );
        let expected = r#"// Code generated by "middlewarer -t Greeter"; DO NOT EDIT.

package greet

// WrapGreeter returns toWrap wrapped in the hooks configured on wrapper.
func WrapGreeter(toWrap Greeter, wrapper GreeterMiddleware) Greeter {
	wrapper.wrapped = toWrap
	return &wrapper
}

// GreeterMiddleware wraps an implementation of Greeter and runs the configured hooks around each of its methods.
type GreeterMiddleware struct {
	wrapped Greeter

	GreetHook GreetHooks
}

// GreetBeforeFunc runs before the wrapped Greet call and may replace its arguments.
// Returning true as the last value skips the call and returns the given results.
type GreetBeforeFunc func(string) (string, string, bool)

// GreetAfterFunc runs after the wrapped Greet call and returns the results to hand back to the caller.
type GreetAfterFunc func(string, string) string

// GreetHooks holds the optional hooks run around Greet.
type GreetHooks struct {
	Before GreetBeforeFunc
	After  GreetAfterFunc
}

// Greet calls the wrapped Greeter, running GreetHook around the call.
func (m *GreeterMiddleware) Greet(name string) string {
	if m.GreetHook.Before != nil {
		var r0 string
		var skip bool
		name, r0, skip = m.GreetHook.Before(name)
		if skip {
			return r0
		}
	}
	r0 := m.wrapped.Greet(name)
	if m.GreetHook.After != nil {
		r0 = m.GreetHook.After(name, r0)
	}
	return r0
}
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_interface_keeps_constructor_and_carrier() {
        let out = generate("package p\n\ntype Nothing interface{}\n", "Nothing", &[]);
        let expected = r#"// Code generated by "middlewarer"; DO NOT EDIT.

package p

// WrapNothing returns toWrap wrapped in the hooks configured on wrapper.
func WrapNothing(toWrap Nothing, wrapper NothingMiddleware) Nothing {
	wrapper.wrapped = toWrap
	return &wrapper
}

// NothingMiddleware wraps an implementation of Nothing and runs the configured hooks around each of its methods.
type NothingMiddleware struct {
	wrapped Nothing
}
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn imports_and_observer_hooks() {
        let source = "package store\n\n\
            import (\n\t\"context\"\n\tstdio \"io\"\n)\n\n\
            type Store interface {\n\
            \tClose()\n\
            \tLoad(ctx context.Context, w stdio.Writer, keys ...string) error\n\
            }\n";
        let out = generate(source, "Store", &["-t", "Store", "-o"]);

        assert!(out.starts_with(
            "// Code generated by \"middlewarer -t Store -o\"; DO NOT EDIT.\n\n\
             package store\n\n\
             import (\n\t\"context\"\n\tstdio \"io\"\n)\n\n"
        ));
        assert!(out.contains("type CloseBeforeFunc func() bool\n"));
        assert!(out.contains("type CloseAfterFunc func()\n"));
        assert!(out.contains(
            "type LoadBeforeFunc func(context.Context, stdio.Writer, ...string) (context.Context, stdio.Writer, []string, error, bool)\n"
        ));
        assert!(out.contains(
            "type LoadAfterFunc func(context.Context, stdio.Writer, []string, error) error\n"
        ));
        assert!(out.contains(
            "\t\tctx, w, keys, r0, skip = m.LoadHook.Before(ctx, w, keys...)\n"
        ));
        assert!(out.contains("\tr0 := m.wrapped.Load(ctx, w, keys...)\n"));
        assert!(out.contains("\t\tr0 = m.LoadHook.After(ctx, w, keys, r0)\n"));
        assert!(out.contains(
            "func (m *StoreMiddleware) Close() {\n\
             \tif m.CloseHook.Before != nil {\n\
             \t\tvar skip bool\n\
             \t\tskip = m.CloseHook.Before()\n\
             \t\tif skip {\n\
             \t\t\treturn\n\
             \t\t}\n\
             \t}\n\
             \tm.wrapped.Close()\n\
             \tif m.CloseHook.After != nil {\n\
             \t\tm.CloseHook.After()\n\
             \t}\n\
             }\n"
        ));
        assert!(out.ends_with("}\n"));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn output_is_deterministic() {
        let source = "package p\n\ntype S interface {\n\tB(x int) (int, error)\n\tA()\n}\n";
        assert_eq!(generate(source, "S", &[]), generate(source, "S", &[]));
    }

    #[test]
    fn header_reproduces_arguments() {
        let provenance = Provenance::new(["-t", "Greeter", "-o", "out.go"]);
        assert_eq!(
            provenance.header(),
            "// Code generated by \"middlewarer -t Greeter -o out.go\"; DO NOT EDIT."
        );
    }
}
