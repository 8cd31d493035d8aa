//! Plan to pretty::Doc conversion.

mod decl;
mod stmt;
mod types;

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::synth::{ImportTable, Plan, SynthesisUnit};

use super::config::CANONICAL;
use decl::{print_func_decl, print_struct_decl, print_type_decl};

/// Width of one nesting level while rendering; `retab` turns it into a tab
pub(super) const INDENT: isize = CANONICAL.indent_width as isize;

/// Package clause, imports and every unit of the plan, separated by blank
/// lines.
pub fn print_plan<'a>(arena: &'a Arena<'a>, plan: &Plan) -> DocBuilder<'a, Arena<'a>> {
    let mut sections = vec![arena.text(format!("package {}", plan.package))];
    if !plan.imports.is_empty() {
        sections.push(print_imports(arena, &plan.imports));
    }
    sections.extend(
        plan.units
            .iter()
            .map(|unit| print_unit(arena, unit, &plan.imports)),
    );
    arena.intersperse(sections, blank_line(arena))
}

fn blank_line<'a>(arena: &'a Arena<'a>) -> DocBuilder<'a, Arena<'a>> {
    arena.hardline().append(arena.hardline())
}

/// `import "path"` for a single package, a parenthesised block otherwise.
fn print_imports<'a>(arena: &'a Arena<'a>, imports: &ImportTable) -> DocBuilder<'a, Arena<'a>> {
    let specs: Vec<_> = imports
        .iter()
        .map(|import| {
            if import.explicit {
                arena.text(format!("{} \"{}\"", import.name, import.path))
            } else {
                arena.text(format!("\"{}\"", import.path))
            }
        })
        .collect();

    if specs.len() == 1 {
        return arena.text("import ").append(arena.concat(specs));
    }
    arena
        .text("import (")
        .append(
            arena
                .hardline()
                .append(arena.intersperse(specs, arena.hardline()))
                .nest(INDENT),
        )
        .append(arena.hardline())
        .append(arena.text(")"))
}

fn print_unit<'a>(
    arena: &'a Arena<'a>,
    unit: &SynthesisUnit,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    match unit {
        SynthesisUnit::Constructor(constructor) => print_func_decl(arena, &constructor.func, imports),
        SynthesisUnit::Carrier(carrier) => print_struct_decl(arena, &carrier.decl, imports),
        SynthesisUnit::HookTypes(hooks) => print_type_decl(arena, &hooks.before, imports)
            .append(blank_line(arena))
            .append(print_type_decl(arena, &hooks.after, imports))
            .append(blank_line(arena))
            .append(print_struct_decl(arena, &hooks.hooks, imports)),
        SynthesisUnit::Method(method) => print_func_decl(arena, &method.func, imports),
    }
}
