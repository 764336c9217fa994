//! Hook detection inside one component body

use super::SIGNATURE_FN;
use crate::ast::builders::{call_expr, expr_stmt, ident_expr};
use crate::ast::fold::Fold;
use crate::ast::{BlockStmt, Decl, Expr, MemberExpr, MemberProp, Stmt};

const BUILTIN_HOOKS: &[&str] = &[
    "useState",
    "useReducer",
    "useEffect",
    "useLayoutEffect",
    "useMemo",
    "useCallback",
    "useRef",
    "useContext",
    "useImperativeHandle",
    "useDebugValue",
];

/// Any callee starting with `use` is treated as a hook.
fn is_hook_name(name: &str) -> bool {
    name.starts_with("use")
}

/// Folds one candidate item, stopping at the first block it reaches: the
/// component body. Hook calls among that block's direct statements are
/// counted, and `__s();` is prepended when there are any.
#[derive(Debug, Default)]
pub(super) struct ComponentScan {
    seen_body: bool,
    pub(super) empty_body: bool,
    pub(super) builtin_hooks: usize,
    pub(super) custom_hooks: usize,
}

impl ComponentScan {
    pub(super) fn has_hooks(&self) -> bool {
        self.builtin_hooks + self.custom_hooks > 0
    }

    fn count_hooks(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.count_call(expr),
            Stmt::Decl(Decl::Var(var)) => {
                for declarator in &var.decls {
                    if let Some(init) = &declarator.init {
                        self.count_call(init);
                    }
                }
            }
            _ => {}
        }
    }

    fn count_call(&mut self, expr: &Expr) {
        let Expr::Call(call) = expr else {
            return;
        };
        let name = match call.callee.as_ref() {
            Expr::Ident(ident) => &ident.sym,
            Expr::Member(MemberExpr {
                prop: MemberProp::Ident(prop),
                ..
            }) => &prop.sym,
            _ => return,
        };
        if BUILTIN_HOOKS.contains(&name.as_str()) {
            self.builtin_hooks += 1;
        } else if is_hook_name(name) {
            self.custom_hooks += 1;
        }
    }
}

impl Fold for ComponentScan {
    fn fold_block_stmt(&mut self, mut block: BlockStmt) -> BlockStmt {
        if self.seen_body {
            return block;
        }
        self.seen_body = true;
        self.empty_body = block.stmts.is_empty();

        for stmt in &block.stmts {
            self.count_hooks(stmt);
        }
        if self.has_hooks() {
            block
                .stmts
                .insert(0, expr_stmt(call_expr(ident_expr(SIGNATURE_FN), Vec::new())));
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ident, Pat, VarDecl, VarDeclarator, VarKind};

    #[test]
    fn test_hook_names() {
        assert!(is_hook_name("useCustomHook"));
        assert!(is_hook_name("usefulData"));
        assert!(!is_hook_name("fetchData"));
        assert!(!is_hook_name("reuse"));
    }

    #[test]
    fn test_any_use_prefixed_call_is_a_custom_hook() {
        let body = BlockStmt {
            stmts: vec![
                Stmt::Decl(Decl::Var(VarDecl {
                    kind: VarKind::Const,
                    decls: vec![VarDeclarator {
                        name: Pat::Ident(Ident::new("d")),
                        init: Some(Box::new(call_expr(ident_expr("usefulData"), Vec::new()))),
                    }],
                })),
                expr_stmt(call_expr(ident_expr("useState"), Vec::new())),
            ],
        };
        let mut scan = ComponentScan::default();
        let body = scan.fold_block_stmt(body);
        assert_eq!(scan.custom_hooks, 1);
        assert_eq!(scan.builtin_hooks, 1);
        assert_eq!(
            body.stmts[0],
            expr_stmt(call_expr(ident_expr(SIGNATURE_FN), Vec::new()))
        );
    }
}
