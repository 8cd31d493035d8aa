//! Type printing.

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::frontend::ast::default_package_name;
use crate::model::{ChanDir, Signature, StructField, TypeRef};
use crate::synth::ImportTable;

/// Print a type, qualifying package-level names through `imports`.
pub(super) fn print_type<'a>(
    arena: &'a Arena<'a>,
    ty: &TypeRef,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    match ty {
        TypeRef::Named {
            package,
            name,
            args,
        } => {
            let qualified = match package {
                Some(path) => {
                    let qualifier = imports
                        .qualifier(path)
                        .map(str::to_string)
                        .unwrap_or_else(|| default_package_name(path));
                    arena.text(format!("{qualifier}.{name}"))
                }
                None => arena.text(name.clone()),
            };
            if args.is_empty() {
                qualified
            } else {
                qualified
                    .append(arena.text("["))
                    .append(print_type_list(arena, args, imports))
                    .append(arena.text("]"))
            }
        }
        TypeRef::Pointer(elem) => arena.text("*").append(print_type(arena, elem, imports)),
        TypeRef::Slice(elem) => arena.text("[]").append(print_type(arena, elem, imports)),
        TypeRef::Array { len, elem } => arena
            .text(format!("[{len}]"))
            .append(print_type(arena, elem, imports)),
        TypeRef::Map { key, value } => arena
            .text("map[")
            .append(print_type(arena, key, imports))
            .append(arena.text("]"))
            .append(print_type(arena, value, imports)),
        TypeRef::Chan { dir, elem } => {
            let keyword = match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            };
            // `chan (<-chan T)` is not `chan<- chan T`
            let needs_parens = *dir == ChanDir::Both
                && matches!(**elem, TypeRef::Chan { dir: ChanDir::Recv, .. });
            let elem_doc = print_type(arena, elem, imports);
            let elem_doc = if needs_parens {
                arena.text("(").append(elem_doc).append(arena.text(")"))
            } else {
                elem_doc
            };
            arena.text(keyword).append(elem_doc)
        }
        TypeRef::Func(sig) => arena.text("func").append(print_signature(arena, sig, imports)),
        TypeRef::Interface { methods, embeds } => {
            if methods.is_empty() && embeds.is_empty() {
                return arena.text("interface{}");
            }
            let elems = methods
                .iter()
                .map(|(name, sig)| arena.text(name.clone()).append(print_signature(arena, sig, imports)))
                .chain(embeds.iter().map(|embed| print_type(arena, embed, imports)));
            arena
                .text("interface{ ")
                .append(arena.intersperse(elems, arena.text("; ")))
                .append(arena.text(" }"))
        }
        TypeRef::Struct(fields) => {
            if fields.is_empty() {
                return arena.text("struct{}");
            }
            let fields = fields.iter().map(|field| print_struct_field(arena, field, imports));
            arena
                .text("struct{ ")
                .append(arena.intersperse(fields, arena.text("; ")))
                .append(arena.text(" }"))
        }
    }
}

fn print_struct_field<'a>(
    arena: &'a Arena<'a>,
    field: &StructField,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    let names = if field.names.is_empty() {
        arena.nil()
    } else {
        arena.text(format!("{} ", field.names.join(", ")))
    };
    let tag = match &field.tag {
        Some(tag) => arena.text(format!(" {tag}")),
        None => arena.nil(),
    };
    names.append(print_type(arena, &field.ty, imports)).append(tag)
}

/// `(A, B, ...C) R` or `(A) (R1, R2)`, without the `func` keyword.
pub(super) fn print_signature<'a>(
    arena: &'a Arena<'a>,
    sig: &Signature,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    let last = sig.params.len().saturating_sub(1);
    let params = sig.params.iter().enumerate().map(|(i, ty)| {
        let doc = print_type(arena, ty, imports);
        if sig.variadic && i == last {
            arena.text("...").append(doc)
        } else {
            doc
        }
    });
    arena
        .text("(")
        .append(arena.intersperse(params, arena.text(", ")))
        .append(arena.text(")"))
        .append(print_results(arena, &sig.results, imports))
}

/// Result list of a signature, including the leading space.
pub(super) fn print_results<'a>(
    arena: &'a Arena<'a>,
    results: &[TypeRef],
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    match results {
        [] => arena.nil(),
        [single] => arena.text(" ").append(print_type(arena, single, imports)),
        _ => arena
            .text(" (")
            .append(print_type_list(arena, results, imports))
            .append(arena.text(")")),
    }
}

fn print_type_list<'a>(
    arena: &'a Arena<'a>,
    types: &[TypeRef],
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    let docs = types.iter().map(|ty| print_type(arena, ty, imports));
    arena.intersperse(docs, arena.text(", "))
}
