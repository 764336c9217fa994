//! Owning tree rewriter
//!
//! A [`Fold`] consumes a node and returns its replacement. Every method has a
//! default that rebuilds the node from folded children via the matching `walk_*`
//! function, so an implementation overrides only the node kinds it cares about
//! and calls the walker when it still wants the default descent.
//!
//! ```text
//! impl Fold for Renamer {
//!     fn fold_ident(&mut self, ident: Ident) -> Ident { ... }
//! }
//! let program = Renamer.fold_program(program);
//! ```

use super::nodes::*;

pub trait Fold {
    fn fold_program(&mut self, program: Program) -> Program {
        walk_program(self, program)
    }

    fn fold_module_item(&mut self, item: ModuleItem) -> ModuleItem {
        walk_module_item(self, item)
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        walk_stmt(self, stmt)
    }

    fn fold_block_stmt(&mut self, block: BlockStmt) -> BlockStmt {
        walk_block_stmt(self, block)
    }

    fn fold_decl(&mut self, decl: Decl) -> Decl {
        walk_decl(self, decl)
    }

    fn fold_function(&mut self, function: Function) -> Function {
        walk_function(self, function)
    }

    fn fold_class(&mut self, class: Class) -> Class {
        walk_class(self, class)
    }

    fn fold_pat(&mut self, pat: Pat) -> Pat {
        walk_pat(self, pat)
    }

    fn fold_expr(&mut self, expr: Expr) -> Expr {
        walk_expr(self, expr)
    }

    fn fold_jsx_element(&mut self, element: JsxElement) -> JsxElement {
        walk_jsx_element(self, element)
    }
}

fn fold_boxed<F: Fold + ?Sized>(folder: &mut F, expr: Box<Expr>) -> Box<Expr> {
    Box::new(folder.fold_expr(*expr))
}

fn fold_args<F: Fold + ?Sized>(folder: &mut F, args: Vec<ExprOrSpread>) -> Vec<ExprOrSpread> {
    args.into_iter()
        .map(|arg| ExprOrSpread {
            spread: arg.spread,
            expr: fold_boxed(folder, arg.expr),
        })
        .collect()
}

fn fold_prop_name<F: Fold + ?Sized>(folder: &mut F, key: PropName) -> PropName {
    match key {
        PropName::Computed(expr) => PropName::Computed(fold_boxed(folder, expr)),
        other => other,
    }
}

pub fn walk_program<F: Fold + ?Sized>(folder: &mut F, program: Program) -> Program {
    Program {
        body: program
            .body
            .into_iter()
            .map(|item| folder.fold_module_item(item))
            .collect(),
    }
}

pub fn walk_module_item<F: Fold + ?Sized>(folder: &mut F, item: ModuleItem) -> ModuleItem {
    match item {
        ModuleItem::Import(import) => ModuleItem::Import(import),
        ModuleItem::Stmt(stmt) => ModuleItem::Stmt(folder.fold_stmt(stmt)),
        ModuleItem::Export(export) => ModuleItem::Export(match export {
            ExportDecl::Decl(decl) => ExportDecl::Decl(folder.fold_decl(decl)),
            ExportDecl::Default(DefaultExport::Fn(f)) => ExportDecl::Default(DefaultExport::Fn(FnExpr {
                ident: f.ident,
                function: folder.fold_function(f.function),
            })),
            ExportDecl::Default(DefaultExport::Class(c)) => {
                ExportDecl::Default(DefaultExport::Class(ClassExpr {
                    ident: c.ident,
                    class: folder.fold_class(c.class),
                }))
            }
            ExportDecl::Default(DefaultExport::Expr(expr)) => {
                ExportDecl::Default(DefaultExport::Expr(fold_boxed(folder, expr)))
            }
            other => other,
        }),
    }
}

pub fn walk_stmt<F: Fold + ?Sized>(folder: &mut F, stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::Block(block) => Stmt::Block(folder.fold_block_stmt(block)),
        Stmt::Decl(decl) => Stmt::Decl(folder.fold_decl(decl)),
        Stmt::Expr(expr) => Stmt::Expr(fold_boxed(folder, expr)),
        Stmt::Return(arg) => Stmt::Return(arg.map(|e| fold_boxed(folder, e))),
        Stmt::If(if_stmt) => Stmt::If(IfStmt {
            test: fold_boxed(folder, if_stmt.test),
            cons: Box::new(folder.fold_stmt(*if_stmt.cons)),
            alt: if_stmt.alt.map(|alt| Box::new(folder.fold_stmt(*alt))),
        }),
        Stmt::Throw(expr) => Stmt::Throw(fold_boxed(folder, expr)),
        Stmt::Empty => Stmt::Empty,
    }
}

pub fn walk_block_stmt<F: Fold + ?Sized>(folder: &mut F, block: BlockStmt) -> BlockStmt {
    BlockStmt {
        stmts: block
            .stmts
            .into_iter()
            .map(|stmt| folder.fold_stmt(stmt))
            .collect(),
    }
}

pub fn walk_decl<F: Fold + ?Sized>(folder: &mut F, decl: Decl) -> Decl {
    match decl {
        Decl::Var(var) => Decl::Var(VarDecl {
            kind: var.kind,
            decls: var
                .decls
                .into_iter()
                .map(|d| VarDeclarator {
                    name: folder.fold_pat(d.name),
                    init: d.init.map(|e| fold_boxed(folder, e)),
                })
                .collect(),
        }),
        Decl::Fn(f) => Decl::Fn(FnDecl {
            ident: f.ident,
            function: folder.fold_function(f.function),
        }),
        Decl::Class(c) => Decl::Class(ClassDecl {
            ident: c.ident,
            class: folder.fold_class(c.class),
        }),
        Decl::TsType(ident) => Decl::TsType(ident),
    }
}

pub fn walk_function<F: Fold + ?Sized>(folder: &mut F, function: Function) -> Function {
    Function {
        params: function
            .params
            .into_iter()
            .map(|p| folder.fold_pat(p))
            .collect(),
        body: folder.fold_block_stmt(function.body),
        is_async: function.is_async,
    }
}

pub fn walk_class<F: Fold + ?Sized>(folder: &mut F, class: Class) -> Class {
    Class {
        super_class: class.super_class.map(|e| fold_boxed(folder, e)),
        members: class
            .members
            .into_iter()
            .map(|member| match member {
                ClassMember::Method {
                    key,
                    function,
                    is_static,
                } => ClassMember::Method {
                    key: fold_prop_name(folder, key),
                    function: folder.fold_function(function),
                    is_static,
                },
                ClassMember::Property {
                    key,
                    value,
                    is_static,
                } => ClassMember::Property {
                    key: fold_prop_name(folder, key),
                    value: value.map(|e| fold_boxed(folder, e)),
                    is_static,
                },
            })
            .collect(),
    }
}

pub fn walk_pat<F: Fold + ?Sized>(folder: &mut F, pat: Pat) -> Pat {
    match pat {
        Pat::Ident(ident) => Pat::Ident(ident),
        Pat::Array(elems) => Pat::Array(elems.into_iter().map(|p| folder.fold_pat(p)).collect()),
        Pat::Object(props) => Pat::Object(
            props
                .into_iter()
                .map(|prop| match prop {
                    ObjectPatProp::KeyValue { key, value } => ObjectPatProp::KeyValue {
                        key: fold_prop_name(folder, key),
                        value: folder.fold_pat(value),
                    },
                    ObjectPatProp::Shorthand { ident, default } => ObjectPatProp::Shorthand {
                        ident,
                        default: default.map(|e| fold_boxed(folder, e)),
                    },
                    ObjectPatProp::Rest(inner) => {
                        ObjectPatProp::Rest(Box::new(folder.fold_pat(*inner)))
                    }
                })
                .collect(),
        ),
        Pat::Assign { left, right } => Pat::Assign {
            left: Box::new(folder.fold_pat(*left)),
            right: fold_boxed(folder, right),
        },
        Pat::Rest(inner) => Pat::Rest(Box::new(folder.fold_pat(*inner))),
    }
}

pub fn walk_expr<F: Fold + ?Sized>(folder: &mut F, expr: Expr) -> Expr {
    match expr {
        Expr::This | Expr::Ident(_) | Expr::Lit(_) => expr,
        Expr::Array(elems) => Expr::Array(fold_args(folder, elems)),
        Expr::Object(props) => Expr::Object(
            props
                .into_iter()
                .map(|prop| match prop {
                    PropOrSpread::Spread(e) => PropOrSpread::Spread(fold_boxed(folder, e)),
                    PropOrSpread::Prop(Prop::KeyValue { key, value }) => {
                        PropOrSpread::Prop(Prop::KeyValue {
                            key: fold_prop_name(folder, key),
                            value: fold_boxed(folder, value),
                        })
                    }
                    PropOrSpread::Prop(Prop::Shorthand(ident)) => {
                        PropOrSpread::Prop(Prop::Shorthand(ident))
                    }
                })
                .collect(),
        ),
        Expr::Fn(f) => Expr::Fn(FnExpr {
            ident: f.ident,
            function: folder.fold_function(f.function),
        }),
        Expr::Arrow(arrow) => Expr::Arrow(ArrowExpr {
            params: arrow.params.into_iter().map(|p| folder.fold_pat(p)).collect(),
            body: match arrow.body {
                ArrowBody::Block(block) => ArrowBody::Block(folder.fold_block_stmt(block)),
                ArrowBody::Expr(e) => ArrowBody::Expr(fold_boxed(folder, e)),
            },
            is_async: arrow.is_async,
        }),
        Expr::Class(c) => Expr::Class(ClassExpr {
            ident: c.ident,
            class: folder.fold_class(c.class),
        }),
        Expr::Call(call) => Expr::Call(CallExpr {
            callee: fold_boxed(folder, call.callee),
            args: fold_args(folder, call.args),
            optional: call.optional,
        }),
        Expr::New(new) => Expr::New(NewExpr {
            callee: fold_boxed(folder, new.callee),
            args: new.args.map(|args| fold_args(folder, args)),
        }),
        Expr::Member(member) => Expr::Member(MemberExpr {
            obj: fold_boxed(folder, member.obj),
            prop: match member.prop {
                MemberProp::Computed(e) => MemberProp::Computed(fold_boxed(folder, e)),
                prop => prop,
            },
            optional: member.optional,
        }),
        Expr::Unary(unary) => Expr::Unary(UnaryExpr {
            op: unary.op,
            arg: fold_boxed(folder, unary.arg),
        }),
        Expr::Bin(bin) => Expr::Bin(BinExpr {
            op: bin.op,
            left: fold_boxed(folder, bin.left),
            right: fold_boxed(folder, bin.right),
        }),
        Expr::Cond(cond) => Expr::Cond(CondExpr {
            test: fold_boxed(folder, cond.test),
            cons: fold_boxed(folder, cond.cons),
            alt: fold_boxed(folder, cond.alt),
        }),
        Expr::Assign(assign) => Expr::Assign(AssignExpr {
            op: assign.op,
            target: fold_boxed(folder, assign.target),
            value: fold_boxed(folder, assign.value),
        }),
        Expr::Jsx(element) => Expr::Jsx(folder.fold_jsx_element(element)),
    }
}

pub fn walk_jsx_element<F: Fold + ?Sized>(folder: &mut F, element: JsxElement) -> JsxElement {
    JsxElement {
        name: element.name,
        attrs: element
            .attrs
            .into_iter()
            .map(|attr| match attr {
                JsxAttr::Spread(e) => JsxAttr::Spread(fold_boxed(folder, e)),
                JsxAttr::Named { name, value } => JsxAttr::Named {
                    name,
                    value: value.map(|value| match value {
                        JsxAttrValue::Expr(e) => JsxAttrValue::Expr(fold_boxed(folder, e)),
                        JsxAttrValue::Element(el) => {
                            JsxAttrValue::Element(Box::new(folder.fold_jsx_element(*el)))
                        }
                        str_value => str_value,
                    }),
                },
            })
            .collect(),
        children: element
            .children
            .into_iter()
            .map(|child| match child {
                JsxChild::Expr(e) => JsxChild::Expr(e.map(|e| fold_boxed(folder, e))),
                JsxChild::Element(el) => JsxChild::Element(Box::new(folder.fold_jsx_element(*el))),
                text => text,
            })
            .collect(),
        self_closing: element.self_closing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{call_expr, expr_stmt, ident_expr};

    struct Renamer;

    impl Fold for Renamer {
        fn fold_expr(&mut self, expr: Expr) -> Expr {
            match walk_expr(self, expr) {
                Expr::Ident(ident) if ident.sym == "old" => ident_expr("new"),
                other => other,
            }
        }
    }

    #[test]
    fn test_default_walk_reaches_nested_expressions() {
        let program = Program {
            body: vec![ModuleItem::Stmt(expr_stmt(call_expr(
                ident_expr("f"),
                vec![ident_expr("old")],
            )))],
        };

        let folded = Renamer.fold_program(program);
        assert_eq!(
            folded.body,
            vec![ModuleItem::Stmt(expr_stmt(call_expr(
                ident_expr("f"),
                vec![ident_expr("new")],
            )))]
        );
    }
}
