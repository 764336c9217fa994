//! JavaScript printer
//!
//! Prints statements one per line with four-space indentation. Parentheses are
//! inserted from operator precedence, so the tree never needs to remember them.

use crate::ast::*;

const INDENT: &str = "    ";

// Binding powers used when deciding on parentheses.
const ASSIGN: u8 = 2;
const CONDITIONAL: u8 = 3;
const UNARY: u8 = 16;
const POSTFIX: u8 = 18;
const PRIMARY: u8 = 20;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign(_) | Expr::Arrow(_) => ASSIGN,
        Expr::Cond(_) => CONDITIONAL,
        Expr::Bin(bin) => bin.op.precedence(),
        Expr::Unary(_) => UNARY,
        Expr::Call(_) | Expr::New(_) | Expr::Member(_) => POSTFIX,
        _ => PRIMARY,
    }
}

/// Expressions that would be read as a declaration or block at statement start.
fn starts_ambiguously(expr: &Expr) -> bool {
    match expr {
        Expr::Object(_) | Expr::Fn(_) | Expr::Class(_) => true,
        Expr::Call(call) => starts_ambiguously(&call.callee),
        Expr::Member(member) => starts_ambiguously(&member.obj),
        Expr::Bin(bin) => starts_ambiguously(&bin.left),
        Expr::Cond(cond) => starts_ambiguously(&cond.test),
        Expr::Assign(assign) => starts_ambiguously(&assign.target),
        _ => false,
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Double-quoted JavaScript string literal for `value`.
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Default)]
pub(crate) struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub(crate) fn new() -> Self {
        Printer::default()
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn w(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn line_start(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Writes pre-formatted source, re-indented to the current level.
    pub(crate) fn raw(&mut self, text: &str) {
        for line in text.lines() {
            if !line.is_empty() {
                self.line_start();
                self.w(line);
            }
            self.newline();
        }
    }

    pub(crate) fn module_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::Stmt(stmt) => self.stmt(stmt),
            ModuleItem::Import(import) => self.import(import),
            ModuleItem::Export(export) => self.export(export),
        }
    }

    fn import(&mut self, import: &ImportDecl) {
        if import.type_only {
            return;
        }
        self.line_start();
        self.w("import ");

        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();
        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Default(local) => default = Some(local),
                ImportSpecifier::Namespace(local) => namespace = Some(local),
                ImportSpecifier::Named { local, imported } => named.push((local, imported)),
            }
        }

        let mut clauses = Vec::new();
        if let Some(local) = default {
            clauses.push(local.sym.clone());
        }
        if let Some(local) = namespace {
            clauses.push(format!("* as {}", local.sym));
        }
        if !named.is_empty() {
            let list: Vec<String> = named
                .iter()
                .map(|(local, imported)| match imported {
                    Some(imported) => format!("{} as {}", imported.sym, local.sym),
                    None => local.sym.clone(),
                })
                .collect();
            clauses.push(format!("{{ {} }}", list.join(", ")));
        }
        if !clauses.is_empty() {
            self.w(&clauses.join(", "));
            self.w(" from ");
        }
        self.str_lit(&import.source);
        self.w(";");
        self.newline();
    }

    fn export(&mut self, export: &ExportDecl) {
        match export {
            ExportDecl::Decl(Decl::TsType(_)) => {}
            ExportDecl::Decl(decl) => {
                self.line_start();
                self.w("export ");
                self.decl(decl);
                self.newline();
            }
            ExportDecl::Default(default) => {
                self.line_start();
                self.w("export default ");
                match default {
                    DefaultExport::Fn(f) => self.function(f.ident.as_ref(), &f.function),
                    DefaultExport::Class(c) => self.class(c.ident.as_ref(), &c.class),
                    DefaultExport::Expr(expr) => {
                        self.statement_expr(expr);
                        self.w(";");
                    }
                }
                self.newline();
            }
            ExportDecl::Named { specifiers, source } => {
                self.line_start();
                let list: Vec<String> = specifiers
                    .iter()
                    .map(|s| match &s.exported {
                        Some(exported) => format!("{} as {}", s.local.sym, exported.sym),
                        None => s.local.sym.clone(),
                    })
                    .collect();
                if list.is_empty() {
                    self.w("export {}");
                } else {
                    self.w(&format!("export {{ {} }}", list.join(", ")));
                }
                if let Some(source) = source {
                    self.w(" from ");
                    self.str_lit(source);
                }
                self.w(";");
                self.newline();
            }
            ExportDecl::All { source } => {
                self.line_start();
                self.w("export * from ");
                self.str_lit(source);
                self.w(";");
                self.newline();
            }
        }
    }

    pub(crate) fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Empty | Stmt::Decl(Decl::TsType(_)) => {}
            Stmt::Block(block) => {
                self.line_start();
                self.block(&block.stmts);
                self.newline();
            }
            Stmt::Decl(decl) => {
                self.line_start();
                self.decl(decl);
                self.newline();
            }
            Stmt::Expr(expr) => {
                self.line_start();
                self.statement_expr(expr);
                self.w(";");
                self.newline();
            }
            Stmt::Return(arg) => {
                self.line_start();
                self.w("return");
                if let Some(arg) = arg {
                    self.w(" ");
                    self.expr(arg, 0);
                }
                self.w(";");
                self.newline();
            }
            Stmt::If(if_stmt) => {
                self.line_start();
                self.if_stmt(if_stmt);
                self.newline();
            }
            Stmt::Throw(arg) => {
                self.line_start();
                self.w("throw ");
                self.expr(arg, 0);
                self.w(";");
                self.newline();
            }
        }
    }

    fn statement_expr(&mut self, expr: &Expr) {
        if starts_ambiguously(expr) {
            self.w("(");
            self.expr(expr, 0);
            self.w(")");
        } else {
            self.expr(expr, 0);
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.w("if (");
        self.expr(&if_stmt.test, 0);
        self.w(") ");
        self.braced(&if_stmt.cons);
        if let Some(alt) = &if_stmt.alt {
            self.w(" else ");
            match alt.as_ref() {
                Stmt::If(nested) => self.if_stmt(nested),
                other => self.braced(other),
            }
        }
    }

    fn braced(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(&block.stmts),
            other => self.block(std::slice::from_ref(other)),
        }
    }

    /// `{ ... }` starting at the cursor, closing brace on its own line.
    fn block(&mut self, stmts: &[Stmt]) {
        let printable: Vec<&Stmt> = stmts
            .iter()
            .filter(|s| !matches!(s, Stmt::Empty | Stmt::Decl(Decl::TsType(_))))
            .collect();
        if printable.is_empty() {
            self.w("{}");
            return;
        }
        self.w("{");
        self.newline();
        self.indent += 1;
        for stmt in printable {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.line_start();
        self.w("}");
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var) => {
                self.var_decl(var);
                self.w(";");
            }
            Decl::Fn(f) => self.function(Some(&f.ident), &f.function),
            Decl::Class(c) => self.class(Some(&c.ident), &c.class),
            Decl::TsType(_) => {}
        }
    }

    fn var_decl(&mut self, var: &VarDecl) {
        self.w(var.kind.as_str());
        self.w(" ");
        for (i, declarator) in var.decls.iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.pat(&declarator.name);
            if let Some(init) = &declarator.init {
                self.w(" = ");
                self.expr(init, ASSIGN);
            }
        }
    }

    fn params(&mut self, params: &[Pat]) {
        self.w("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.pat(param);
        }
        self.w(")");
    }

    fn function(&mut self, name: Option<&Ident>, function: &Function) {
        if function.is_async {
            self.w("async ");
        }
        self.w("function");
        if let Some(name) = name {
            self.w(" ");
            self.w(&name.sym);
        }
        self.params(&function.params);
        self.w(" ");
        self.block(&function.body.stmts);
    }

    fn class(&mut self, name: Option<&Ident>, class: &Class) {
        self.w("class");
        if let Some(name) = name {
            self.w(" ");
            self.w(&name.sym);
        }
        if let Some(super_class) = &class.super_class {
            self.w(" extends ");
            self.expr(super_class, POSTFIX);
        }
        if class.members.is_empty() {
            self.w(" {}");
            return;
        }
        self.w(" {");
        self.newline();
        self.indent += 1;
        for member in &class.members {
            self.line_start();
            match member {
                ClassMember::Method {
                    key,
                    function,
                    is_static,
                } => {
                    if *is_static {
                        self.w("static ");
                    }
                    if function.is_async {
                        self.w("async ");
                    }
                    self.prop_name(key);
                    self.params(&function.params);
                    self.w(" ");
                    self.block(&function.body.stmts);
                }
                ClassMember::Property {
                    key,
                    value,
                    is_static,
                } => {
                    if *is_static {
                        self.w("static ");
                    }
                    self.prop_name(key);
                    if let Some(value) = value {
                        self.w(" = ");
                        self.expr(value, ASSIGN);
                    }
                    self.w(";");
                }
            }
            self.newline();
        }
        self.indent -= 1;
        self.line_start();
        self.w("}");
    }

    fn pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(ident) => self.w(&ident.sym),
            Pat::Array(elems) => {
                self.w("[");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.w(", ");
                    }
                    self.pat(elem);
                }
                self.w("]");
            }
            Pat::Object(props) => {
                if props.is_empty() {
                    self.w("{}");
                    return;
                }
                self.w("{ ");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.w(", ");
                    }
                    match prop {
                        ObjectPatProp::KeyValue { key, value } => {
                            self.prop_name(key);
                            self.w(": ");
                            self.pat(value);
                        }
                        ObjectPatProp::Shorthand { ident, default } => {
                            self.w(&ident.sym);
                            if let Some(default) = default {
                                self.w(" = ");
                                self.expr(default, ASSIGN);
                            }
                        }
                        ObjectPatProp::Rest(inner) => {
                            self.w("...");
                            self.pat(inner);
                        }
                    }
                }
                self.w(" }");
            }
            Pat::Assign { left, right } => {
                self.pat(left);
                self.w(" = ");
                self.expr(right, ASSIGN);
            }
            Pat::Rest(inner) => {
                self.w("...");
                self.pat(inner);
            }
        }
    }

    fn prop_name(&mut self, key: &PropName) {
        match key {
            PropName::Ident(ident) => self.w(&ident.sym),
            PropName::Str(s) => self.str_lit(s),
            PropName::Num(n) => self.w(n),
            PropName::Computed(expr) => {
                self.w("[");
                self.expr(expr, ASSIGN);
                self.w("]");
            }
        }
    }

    fn str_lit(&mut self, s: &Str) {
        match &s.raw {
            Some(raw) => self.w(raw),
            None => self.w(&quote(&s.value)),
        }
    }

    fn args(&mut self, args: &[ExprOrSpread]) {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            if arg.spread {
                self.w("...");
            }
            self.expr(&arg.expr, ASSIGN);
        }
    }

    pub(crate) fn expr(&mut self, expr: &Expr, min_precedence: u8) {
        if precedence(expr) < min_precedence {
            self.w("(");
            self.expr_inner(expr);
            self.w(")");
        } else {
            self.expr_inner(expr);
        }
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::This => self.w("this"),
            Expr::Ident(ident) => self.w(&ident.sym),
            Expr::Lit(lit) => match lit {
                Lit::Str(s) => self.str_lit(s),
                Lit::Num(n) => self.w(n),
                Lit::Bool(b) => self.w(if *b { "true" } else { "false" }),
                Lit::Null => self.w("null"),
                Lit::Template(raw) => {
                    self.w("`");
                    self.w(raw);
                    self.w("`");
                }
            },
            Expr::Array(elems) => {
                self.w("[");
                self.args(elems);
                self.w("]");
            }
            Expr::Object(props) => self.object(props),
            Expr::Fn(f) => self.function(f.ident.as_ref(), &f.function),
            Expr::Arrow(arrow) => {
                if arrow.is_async {
                    self.w("async ");
                }
                self.params(&arrow.params);
                self.w(" => ");
                match &arrow.body {
                    ArrowBody::Block(block) => self.block(&block.stmts),
                    ArrowBody::Expr(body) if starts_ambiguously(body) => {
                        self.w("(");
                        self.expr(body, 0);
                        self.w(")");
                    }
                    ArrowBody::Expr(body) => self.expr(body, ASSIGN),
                }
            }
            Expr::Class(c) => self.class(c.ident.as_ref(), &c.class),
            Expr::Call(call) => {
                self.expr(&call.callee, POSTFIX);
                if call.optional {
                    self.w("?.");
                }
                self.w("(");
                self.args(&call.args);
                self.w(")");
            }
            Expr::New(new) => {
                self.w("new ");
                if matches!(new.callee.as_ref(), Expr::Call(_)) {
                    self.w("(");
                    self.expr(&new.callee, 0);
                    self.w(")");
                } else {
                    self.expr(&new.callee, POSTFIX);
                }
                self.w("(");
                if let Some(args) = &new.args {
                    self.args(args);
                }
                self.w(")");
            }
            Expr::Member(member) => {
                self.expr(&member.obj, POSTFIX);
                match &member.prop {
                    MemberProp::Ident(prop) => {
                        self.w(if member.optional { "?." } else { "." });
                        self.w(&prop.sym);
                    }
                    MemberProp::Computed(prop) => {
                        if member.optional {
                            self.w("?.");
                        }
                        self.w("[");
                        self.expr(prop, 0);
                        self.w("]");
                    }
                }
            }
            Expr::Unary(unary) => {
                self.w(unary.op.as_str());
                let doubled_sign = matches!(
                    (unary.op, unary.arg.as_ref()),
                    (UnaryOp::Minus | UnaryOp::Plus, Expr::Unary(UnaryExpr { op: UnaryOp::Minus | UnaryOp::Plus, .. }))
                );
                if unary.op.is_word() || doubled_sign {
                    self.w(" ");
                }
                self.expr(&unary.arg, UNARY);
            }
            Expr::Bin(bin) => {
                let own = bin.op.precedence();
                // `??` may not be mixed with `||`/`&&` without parentheses
                let floor = if bin.op == BinaryOp::NullishCoalescing {
                    BinaryOp::LogicalAnd.precedence() + 1
                } else {
                    own
                };
                self.expr(&bin.left, floor);
                self.w(" ");
                self.w(bin.op.as_str());
                self.w(" ");
                self.expr(&bin.right, floor.max(own + 1));
            }
            Expr::Cond(cond) => {
                self.expr(&cond.test, CONDITIONAL + 1);
                self.w(" ? ");
                self.expr(&cond.cons, ASSIGN);
                self.w(" : ");
                self.expr(&cond.alt, ASSIGN);
            }
            Expr::Assign(assign) => {
                self.expr(&assign.target, POSTFIX);
                self.w(" ");
                self.w(assign.op.as_str());
                self.w(" ");
                self.expr(&assign.value, ASSIGN);
            }
            Expr::Jsx(element) => self.jsx(element),
        }
    }

    fn object(&mut self, props: &[PropOrSpread]) {
        if props.is_empty() {
            self.w("{}");
            return;
        }
        self.w("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            match prop {
                PropOrSpread::Spread(expr) => {
                    self.w("...");
                    self.expr(expr, ASSIGN);
                }
                PropOrSpread::Prop(Prop::Shorthand(ident)) => self.w(&ident.sym),
                PropOrSpread::Prop(Prop::KeyValue { key, value }) => {
                    self.prop_name(key);
                    self.w(": ");
                    self.expr(value, ASSIGN);
                }
            }
        }
        self.w(" }");
    }

    fn jsx(&mut self, element: &JsxElement) {
        let name = element.name.as_deref().unwrap_or("");
        self.w("<");
        self.w(name);
        for attr in &element.attrs {
            self.w(" ");
            match attr {
                JsxAttr::Spread(expr) => {
                    self.w("{...");
                    self.expr(expr, ASSIGN);
                    self.w("}");
                }
                JsxAttr::Named { name, value } => {
                    self.w(name);
                    match value {
                        None => {}
                        Some(JsxAttrValue::Str(s)) => {
                            self.w("=");
                            self.str_lit(s);
                        }
                        Some(JsxAttrValue::Expr(expr)) => {
                            self.w("={");
                            self.expr(expr, ASSIGN);
                            self.w("}");
                        }
                        Some(JsxAttrValue::Element(el)) => {
                            self.w("=");
                            self.jsx(el);
                        }
                    }
                }
            }
        }
        if element.self_closing {
            self.w(" />");
            return;
        }
        self.w(">");
        for child in &element.children {
            match child {
                JsxChild::Text(text) => self.w(text),
                JsxChild::Expr(None) => self.w("{}"),
                JsxChild::Expr(Some(expr)) => {
                    self.w("{");
                    self.expr(expr, ASSIGN);
                    self.w("}");
                }
                JsxChild::Element(el) => self.jsx(el),
            }
        }
        self.w("</");
        self.w(name);
        self.w(">");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    fn print_expr(expr: &Expr) -> String {
        let mut printer = Printer::new();
        printer.expr(expr, 0);
        printer.finish()
    }

    fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Bin(BinExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    #[test]
    fn test_parenthesizes_by_precedence() {
        let sum = bin(BinaryOp::Add, ident_expr("a"), ident_expr("b"));
        let product = bin(BinaryOp::Mul, sum, ident_expr("c"));
        assert_eq!(print_expr(&product), "(a + b) * c");

        let right_nested = bin(
            BinaryOp::Sub,
            ident_expr("a"),
            bin(BinaryOp::Sub, ident_expr("b"), ident_expr("c")),
        );
        assert_eq!(print_expr(&right_nested), "a - (b - c)");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c\n"), r#""a\"b\\c\n""#);
    }

    #[test]
    fn test_statement_start_object_is_wrapped() {
        let mut printer = Printer::new();
        printer.stmt(&expr_stmt(Expr::Object(Vec::new())));
        assert_eq!(printer.finish(), "({});\n");
    }

    #[test]
    fn test_arrow_body_starting_with_object_is_wrapped() {
        let object = Expr::Object(vec![PropOrSpread::Prop(Prop::KeyValue {
            key: PropName::Ident(Ident::new("a")),
            value: Box::new(bool_lit(true)),
        })]);
        let arrow = |body: Expr| {
            Expr::Arrow(ArrowExpr {
                params: Vec::new(),
                body: ArrowBody::Expr(Box::new(body)),
                is_async: false,
            })
        };
        assert_eq!(print_expr(&arrow(object.clone())), "() => ({ a: true })");
        assert_eq!(
            print_expr(&arrow(member_expr(object, "a"))),
            "() => ({ a: true }.a)"
        );
        assert_eq!(print_expr(&arrow(ident_expr("a"))), "() => a");
    }

    #[test]
    fn test_nested_blocks_indent() {
        let mut printer = Printer::new();
        printer.stmt(&Stmt::Decl(Decl::Fn(FnDecl {
            ident: Ident::new("f"),
            function: Function {
                params: vec![Pat::Ident(Ident::new("x"))],
                body: BlockStmt {
                    stmts: vec![Stmt::Return(Some(Box::new(ident_expr("x"))))],
                },
                is_async: false,
            },
        })));
        assert_eq!(printer.finish(), "function f(x) {\n    return x;\n}\n");
    }
}
