//! Node lookups over the closed AST.

use crate::ast::{Arg, ClassRef, Expr, MethodName, Stmt};

/// First `return` statement of a function body in source order.
///
/// Nested function-likes (closures, arrow functions) are not entered: a
/// `return` inside them belongs to a different function.
pub fn find_first_return_scoped(stmts: &[Stmt]) -> Option<Option<&Expr>> {
    for stmt in stmts {
        match stmt {
            Stmt::Return(expr) => return Some(expr.as_ref()),
            Stmt::Expression(_) => {}
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                if let Some(found) = find_first_return_scoped(then_branch) {
                    return Some(found);
                }
                if let Some(found) = else_branch.as_deref().and_then(find_first_return_scoped) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// First method call in pre-order: the outermost call of a chain is found
/// before the calls it is built on.
pub fn find_first_method_call(expr: &Expr) -> Option<&Expr> {
    let mut found = None;
    walk_expr(expr, &mut |node| {
        if found.is_none() && matches!(node, Expr::MethodCall { .. }) {
            found = Some(node);
        }
    });
    found
}

/// Visit `expr` and every expression below it in pre-order, including the
/// bodies of closures.
pub fn walk_expr<'a, F: FnMut(&'a Expr)>(expr: &'a Expr, f: &mut F) {
    f(expr);
    match expr {
        Expr::Variable(_) | Expr::String(_) | Expr::Int(_) | Expr::Other => {}
        Expr::ClassConstFetch { class, .. } => walk_class_ref(class, f),
        Expr::MethodCall { var, name, args } => {
            walk_expr(var, f);
            walk_method_name(name, f);
            walk_args(args, f);
        }
        Expr::StaticCall { class, name, args } => {
            walk_class_ref(class, f);
            walk_method_name(name, f);
            walk_args(args, f);
        }
        Expr::FuncCall { args, .. } => walk_args(args, f),
        Expr::PropertyFetch { var, .. } => walk_expr(var, f),
        Expr::New { class, args } => {
            walk_class_ref(class, f);
            walk_args(args, f);
        }
        Expr::Assign { var, value } => {
            walk_expr(var, f);
            walk_expr(value, f);
        }
        Expr::Closure { body } => walk_stmts(body, f),
        Expr::ArrowFunction { expr } => walk_expr(expr, f),
    }
}

fn walk_stmts<'a, F: FnMut(&'a Expr)>(stmts: &'a [Stmt], f: &mut F) {
    for stmt in stmts {
        match stmt {
            Stmt::Return(Some(expr)) | Stmt::Expression(expr) => walk_expr(expr, f),
            Stmt::Return(None) => {}
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                walk_expr(cond, f);
                walk_stmts(then_branch, f);
                if let Some(else_branch) = else_branch {
                    walk_stmts(else_branch, f);
                }
            }
        }
    }
}

fn walk_class_ref<'a, F: FnMut(&'a Expr)>(class: &'a ClassRef, f: &mut F) {
    if let ClassRef::Expr(expr) = class {
        walk_expr(expr, f);
    }
}

fn walk_method_name<'a, F: FnMut(&'a Expr)>(name: &'a MethodName, f: &mut F) {
    if let MethodName::Expr(expr) = name {
        walk_expr(expr, f);
    }
}

fn walk_args<'a, F: FnMut(&'a Expr)>(args: &'a [Arg], f: &mut F) {
    for arg in args {
        walk_expr(&arg.value, f);
    }
}
