//! Declaration printing.

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::synth::{Binding, FieldDef, FuncDecl, ImportTable, StructDecl, TypeDecl};

use super::INDENT;
use super::stmt::print_block;
use super::types::{print_results, print_type};

/// `// line` comments above a declaration, each followed by a newline.
fn print_doc<'a>(arena: &'a Arena<'a>, doc: &[String]) -> DocBuilder<'a, Arena<'a>> {
    arena.concat(
        doc.iter()
            .map(|line| arena.text(format!("// {line}")).append(arena.hardline())),
    )
}

fn print_binding<'a>(
    arena: &'a Arena<'a>,
    binding: &Binding,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    let prefix = if binding.variadic { " ..." } else { " " };
    arena
        .text(format!("{}{prefix}", binding.name))
        .append(print_type(arena, &binding.ty, imports))
}

/// Print a function or method declaration with its body.
pub(super) fn print_func_decl<'a>(
    arena: &'a Arena<'a>,
    func: &FuncDecl,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    let receiver = match &func.receiver {
        Some(receiver) => arena
            .text("(")
            .append(print_binding(arena, receiver, imports))
            .append(arena.text(") ")),
        None => arena.nil(),
    };
    let params = func
        .params
        .iter()
        .map(|param| print_binding(arena, param, imports));

    print_doc(arena, &func.doc)
        .append(arena.text("func "))
        .append(receiver)
        .append(arena.text(func.name.clone()))
        .append(arena.text("("))
        .append(arena.intersperse(params, arena.text(", ")))
        .append(arena.text(")"))
        .append(print_results(arena, &func.results, imports))
        .append(arena.text(" "))
        .append(print_block(arena, &func.body, imports))
}

/// `type Name <ty>`
pub(super) fn print_type_decl<'a>(
    arena: &'a Arena<'a>,
    decl: &TypeDecl,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    print_doc(arena, &decl.doc)
        .append(arena.text(format!("type {} ", decl.name)))
        .append(print_type(arena, &decl.ty, imports))
}

/// Print a struct declaration. Field types line up within each group.
pub(super) fn print_struct_decl<'a>(
    arena: &'a Arena<'a>,
    decl: &StructDecl,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    let header = print_doc(arena, &decl.doc).append(arena.text(format!("type {} struct {{", decl.name)));
    if decl.fields().next().is_none() {
        return header.append(arena.hardline()).append(arena.text("}"));
    }

    let groups = decl
        .groups
        .iter()
        .filter(|group| !group.is_empty())
        .map(|group| print_field_group(arena, group, imports));
    let body = arena.intersperse(groups, arena.hardline().append(arena.hardline()));

    header
        .append(arena.hardline().append(body).nest(INDENT))
        .append(arena.hardline())
        .append(arena.text("}"))
}

fn print_field_group<'a>(
    arena: &'a Arena<'a>,
    group: &[FieldDef],
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    let width = group
        .iter()
        .map(|field| field.name.chars().count())
        .max()
        .unwrap_or(0);
    let fields = group.iter().map(|field| {
        let padding = width - field.name.chars().count() + 1;
        arena
            .text(format!("{}{}", field.name, " ".repeat(padding)))
            .append(print_type(arena, &field.ty, imports))
    });
    arena.intersperse(fields, arena.hardline())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeRef;
    use crate::synth::ir::{Expr, Stmt};

    fn render<'a>(doc: DocBuilder<'a, Arena<'a>>) -> String {
        let mut out = String::new();
        doc.render_fmt(100, &mut out)
            .expect("render to string cannot fail");
        // Blank lines inside a nest carry the indentation
        out.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
    }

    fn field(name: &str, ty: &str) -> FieldDef {
        FieldDef {
            name: name.to_string(),
            ty: TypeRef::local(ty),
        }
    }

    #[test]
    fn struct_fields_align_per_group() {
        let arena = Arena::new();
        let decl = StructDecl {
            doc: vec!["Doc line.".to_string()],
            name: "LoggerMiddleware".to_string(),
            groups: vec![
                vec![field("wrapped", "Logger")],
                vec![
                    field("LogHook", "LogHooks"),
                    field("FlushHook", "FlushHooks"),
                ],
            ],
        };
        let out = render(print_struct_decl(&arena, &decl, &ImportTable::default()));
        assert_eq!(
            out,
            "// Doc line.\n\
             type LoggerMiddleware struct {\n    \
             wrapped Logger\n\n    \
             LogHook   LogHooks\n    \
             FlushHook FlushHooks\n\
             }"
        );
    }

    #[test]
    fn empty_struct_breaks_its_braces() {
        let arena = Arena::new();
        let decl = StructDecl {
            doc: Vec::new(),
            name: "Empty".to_string(),
            groups: vec![Vec::new()],
        };
        let out = render(print_struct_decl(&arena, &decl, &ImportTable::default()));
        assert_eq!(out, "type Empty struct {\n}");
    }

    #[test]
    fn methods_print_receiver_and_variadic_params() {
        let arena = Arena::new();
        let func = FuncDecl {
            doc: Vec::new(),
            receiver: Some(Binding {
                name: "m".to_string(),
                ty: TypeRef::Pointer(Box::new(TypeRef::local("LoggerMiddleware"))),
                variadic: false,
            }),
            name: "Log".to_string(),
            params: vec![
                Binding {
                    name: "format".to_string(),
                    ty: TypeRef::local("string"),
                    variadic: false,
                },
                Binding {
                    name: "args".to_string(),
                    ty: TypeRef::local("any"),
                    variadic: true,
                },
            ],
            results: Vec::new(),
            body: vec![Stmt::Expr(Expr::ident("m").field("wrapped").field("Log").call(
                vec![Expr::ident("format"), Expr::ident("args")],
                true,
            ))],
        };
        let out = render(print_func_decl(&arena, &func, &ImportTable::default()));
        assert_eq!(
            out,
            "func (m *LoggerMiddleware) Log(format string, args ...any) {\n    \
             m.wrapped.Log(format, args...)\n\
             }"
        );
    }
}
