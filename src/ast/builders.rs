//! Shorthand constructors for synthesized nodes

use super::nodes::*;

pub fn ident_expr(name: impl Into<String>) -> Expr {
    Expr::Ident(Ident::new(name))
}

pub fn str_lit(value: impl Into<String>) -> Expr {
    Expr::Lit(Lit::Str(Str::new(value)))
}

pub fn bool_lit(value: bool) -> Expr {
    Expr::Lit(Lit::Bool(value))
}

/// `obj.prop`
pub fn member_expr(obj: Expr, prop: impl Into<String>) -> Expr {
    Expr::Member(MemberExpr {
        obj: Box::new(obj),
        prop: MemberProp::Ident(Ident::new(prop)),
        optional: false,
    })
}

/// Builds `a.b.c` from a dotted path.
pub fn path_expr(path: &str) -> Expr {
    let mut segments = path.split('.');
    let head = ident_expr(segments.next().unwrap_or_default());
    segments.fold(head, |obj, segment| member_expr(obj, segment))
}

pub fn call_expr(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        callee: Box::new(callee),
        args: args.into_iter().map(ExprOrSpread::new).collect(),
        optional: false,
    })
}

pub fn assign_expr(target: Expr, value: Expr) -> Expr {
    Expr::Assign(AssignExpr {
        op: AssignOp::Assign,
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(Box::new(expr))
}

/// `target = value;`
pub fn assign_stmt(target: Expr, value: Expr) -> Stmt {
    expr_stmt(assign_expr(target, value))
}

/// `kind name = init;`
pub fn var_stmt(kind: VarKind, name: impl Into<String>, init: Expr) -> Stmt {
    Stmt::Decl(Decl::Var(VarDecl {
        kind,
        decls: vec![VarDeclarator {
            name: Pat::Ident(Ident::new(name)),
            init: Some(Box::new(init)),
        }],
    }))
}
