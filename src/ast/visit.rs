//! Read-only tree traversal
//!
//! The borrowing counterpart of [`Fold`](super::fold::Fold): methods default to
//! walking into children, implementations override what they want to observe.

use super::nodes::*;

pub trait Visit {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program)
    }

    fn visit_module_item(&mut self, item: &ModuleItem) {
        walk_module_item(self, item)
    }

    fn visit_import_decl(&mut self, _import: &ImportDecl) {}

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt)
    }

    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl)
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        self.visit_class(&decl.class)
    }

    fn visit_function(&mut self, function: &Function) {
        walk_function(self, function)
    }

    fn visit_class(&mut self, class: &Class) {
        walk_class(self, class)
    }

    fn visit_pat(&mut self, pat: &Pat) {
        walk_pat(self, pat)
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr)
    }

    fn visit_jsx_element(&mut self, element: &JsxElement) {
        walk_jsx_element(self, element)
    }
}

fn visit_prop_name<V: Visit + ?Sized>(visitor: &mut V, key: &PropName) {
    if let PropName::Computed(expr) = key {
        visitor.visit_expr(expr);
    }
}

pub fn walk_program<V: Visit + ?Sized>(visitor: &mut V, program: &Program) {
    for item in &program.body {
        visitor.visit_module_item(item);
    }
}

pub fn walk_module_item<V: Visit + ?Sized>(visitor: &mut V, item: &ModuleItem) {
    match item {
        ModuleItem::Import(import) => visitor.visit_import_decl(import),
        ModuleItem::Stmt(stmt) => visitor.visit_stmt(stmt),
        ModuleItem::Export(ExportDecl::Decl(decl)) => visitor.visit_decl(decl),
        ModuleItem::Export(ExportDecl::Default(DefaultExport::Fn(f))) => {
            visitor.visit_function(&f.function)
        }
        ModuleItem::Export(ExportDecl::Default(DefaultExport::Class(c))) => {
            visitor.visit_class(&c.class)
        }
        ModuleItem::Export(ExportDecl::Default(DefaultExport::Expr(expr))) => {
            visitor.visit_expr(expr)
        }
        ModuleItem::Export(ExportDecl::Named { .. } | ExportDecl::All { .. }) => {}
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Block(block) => visitor.visit_block_stmt(block),
        Stmt::Decl(decl) => visitor.visit_decl(decl),
        Stmt::Expr(expr) | Stmt::Throw(expr) => visitor.visit_expr(expr),
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                visitor.visit_expr(arg);
            }
        }
        Stmt::If(if_stmt) => {
            visitor.visit_expr(&if_stmt.test);
            visitor.visit_stmt(&if_stmt.cons);
            if let Some(alt) = &if_stmt.alt {
                visitor.visit_stmt(alt);
            }
        }
        Stmt::Empty => {}
    }
}

pub fn walk_decl<V: Visit + ?Sized>(visitor: &mut V, decl: &Decl) {
    match decl {
        Decl::Var(var) => {
            for declarator in &var.decls {
                visitor.visit_pat(&declarator.name);
                if let Some(init) = &declarator.init {
                    visitor.visit_expr(init);
                }
            }
        }
        Decl::Fn(f) => visitor.visit_function(&f.function),
        Decl::Class(c) => visitor.visit_class_decl(c),
        Decl::TsType(_) => {}
    }
}

pub fn walk_function<V: Visit + ?Sized>(visitor: &mut V, function: &Function) {
    for param in &function.params {
        visitor.visit_pat(param);
    }
    visitor.visit_block_stmt(&function.body);
}

pub fn walk_class<V: Visit + ?Sized>(visitor: &mut V, class: &Class) {
    if let Some(super_class) = &class.super_class {
        visitor.visit_expr(super_class);
    }
    for member in &class.members {
        match member {
            ClassMember::Method { key, function, .. } => {
                visit_prop_name(visitor, key);
                visitor.visit_function(function);
            }
            ClassMember::Property { key, value, .. } => {
                visit_prop_name(visitor, key);
                if let Some(value) = value {
                    visitor.visit_expr(value);
                }
            }
        }
    }
}

pub fn walk_pat<V: Visit + ?Sized>(visitor: &mut V, pat: &Pat) {
    match pat {
        Pat::Ident(_) => {}
        Pat::Array(elems) => {
            for elem in elems {
                visitor.visit_pat(elem);
            }
        }
        Pat::Object(props) => {
            for prop in props {
                match prop {
                    ObjectPatProp::KeyValue { key, value } => {
                        visit_prop_name(visitor, key);
                        visitor.visit_pat(value);
                    }
                    ObjectPatProp::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            visitor.visit_expr(default);
                        }
                    }
                    ObjectPatProp::Rest(inner) => visitor.visit_pat(inner),
                }
            }
        }
        Pat::Assign { left, right } => {
            visitor.visit_pat(left);
            visitor.visit_expr(right);
        }
        Pat::Rest(inner) => visitor.visit_pat(inner),
    }
}

pub fn walk_expr<V: Visit + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::This | Expr::Ident(_) | Expr::Lit(_) => {}
        Expr::Array(elems) => {
            for elem in elems {
                visitor.visit_expr(&elem.expr);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                match prop {
                    PropOrSpread::Spread(e) => visitor.visit_expr(e),
                    PropOrSpread::Prop(Prop::KeyValue { key, value }) => {
                        visit_prop_name(visitor, key);
                        visitor.visit_expr(value);
                    }
                    PropOrSpread::Prop(Prop::Shorthand(_)) => {}
                }
            }
        }
        Expr::Fn(f) => visitor.visit_function(&f.function),
        Expr::Arrow(arrow) => {
            for param in &arrow.params {
                visitor.visit_pat(param);
            }
            match &arrow.body {
                ArrowBody::Block(block) => visitor.visit_block_stmt(block),
                ArrowBody::Expr(e) => visitor.visit_expr(e),
            }
        }
        Expr::Class(c) => visitor.visit_class(&c.class),
        Expr::Call(call) => {
            visitor.visit_expr(&call.callee);
            for arg in &call.args {
                visitor.visit_expr(&arg.expr);
            }
        }
        Expr::New(new) => {
            visitor.visit_expr(&new.callee);
            for arg in new.args.iter().flatten() {
                visitor.visit_expr(&arg.expr);
            }
        }
        Expr::Member(member) => {
            visitor.visit_expr(&member.obj);
            if let MemberProp::Computed(e) = &member.prop {
                visitor.visit_expr(e);
            }
        }
        Expr::Unary(unary) => visitor.visit_expr(&unary.arg),
        Expr::Bin(bin) => {
            visitor.visit_expr(&bin.left);
            visitor.visit_expr(&bin.right);
        }
        Expr::Cond(cond) => {
            visitor.visit_expr(&cond.test);
            visitor.visit_expr(&cond.cons);
            visitor.visit_expr(&cond.alt);
        }
        Expr::Assign(assign) => {
            visitor.visit_expr(&assign.target);
            visitor.visit_expr(&assign.value);
        }
        Expr::Jsx(element) => visitor.visit_jsx_element(element),
    }
}

pub fn walk_jsx_element<V: Visit + ?Sized>(visitor: &mut V, element: &JsxElement) {
    for attr in &element.attrs {
        match attr {
            JsxAttr::Spread(e) => visitor.visit_expr(e),
            JsxAttr::Named { value, .. } => match value {
                Some(JsxAttrValue::Expr(e)) => visitor.visit_expr(e),
                Some(JsxAttrValue::Element(el)) => visitor.visit_jsx_element(el),
                Some(JsxAttrValue::Str(_)) | None => {}
            },
        }
    }
    for child in &element.children {
        match child {
            JsxChild::Expr(Some(e)) => visitor.visit_expr(e),
            JsxChild::Element(el) => visitor.visit_jsx_element(el),
            JsxChild::Expr(None) | JsxChild::Text(_) => {}
        }
    }
}
