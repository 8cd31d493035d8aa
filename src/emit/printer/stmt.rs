//! Statement and expression printing for generated bodies.

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::synth::ImportTable;
use crate::synth::ir::{Expr, Stmt};

use super::INDENT;
use super::types::print_type;

pub(super) fn print_expr<'a>(arena: &'a Arena<'a>, expr: &Expr) -> DocBuilder<'a, Arena<'a>> {
    match expr {
        Expr::Ident(name) => arena.text(name.clone()),
        Expr::Field(target, name) => print_expr(arena, target)
            .append(arena.text("."))
            .append(arena.text(name.clone())),
        Expr::Call {
            callee,
            args,
            spread,
        } => {
            let args = args.iter().map(|arg| print_expr(arena, arg));
            let spread = if *spread { arena.text("...") } else { arena.nil() };
            print_expr(arena, callee)
                .append(arena.text("("))
                .append(arena.intersperse(args, arena.text(", ")))
                .append(spread)
                .append(arena.text(")"))
        }
        Expr::NotNil(inner) => print_expr(arena, inner).append(arena.text(" != nil")),
        Expr::AddressOf(inner) => arena.text("&").append(print_expr(arena, inner)),
    }
}

fn print_expr_list<'a>(arena: &'a Arena<'a>, exprs: &[Expr]) -> DocBuilder<'a, Arena<'a>> {
    let docs = exprs.iter().map(|expr| print_expr(arena, expr));
    arena.intersperse(docs, arena.text(", "))
}

pub(super) fn print_stmt<'a>(
    arena: &'a Arena<'a>,
    stmt: &Stmt,
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    match stmt {
        Stmt::If { cond, then } => arena
            .text("if ")
            .append(print_expr(arena, cond))
            .append(arena.text(" "))
            .append(print_block(arena, then, imports)),
        Stmt::Var { name, ty } => arena
            .text(format!("var {name} "))
            .append(print_type(arena, ty, imports)),
        Stmt::Assign { targets, value } => print_expr_list(arena, targets)
            .append(arena.text(" = "))
            .append(print_expr(arena, value)),
        Stmt::Define { names, value } => arena
            .text(names.join(", "))
            .append(arena.text(" := "))
            .append(print_expr(arena, value)),
        Stmt::Expr(expr) => print_expr(arena, expr),
        Stmt::Return(values) if values.is_empty() => arena.text("return"),
        Stmt::Return(values) => arena.text("return ").append(print_expr_list(arena, values)),
    }
}

/// `{`, one statement per line one level deeper, `}`
pub(super) fn print_block<'a>(
    arena: &'a Arena<'a>,
    stmts: &[Stmt],
    imports: &ImportTable,
) -> DocBuilder<'a, Arena<'a>> {
    if stmts.is_empty() {
        return arena.text("{}");
    }
    let body = arena.intersperse(
        stmts.iter().map(|stmt| print_stmt(arena, stmt, imports)),
        arena.hardline(),
    );
    arena
        .text("{")
        .append(arena.hardline().append(body).nest(INDENT))
        .append(arena.hardline())
        .append(arena.text("}"))
}
