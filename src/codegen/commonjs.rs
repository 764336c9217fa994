//! ES module syntax lowered to CommonJS
//!
//! Imports turn into `require` calls bound to a module object plus one `const`
//! alias per imported name. Exported declarations get their `exports.name = ...`
//! assignment right after the statement that declares them. Bare `export { a }`
//! lists and `export default a` refer to bindings that may be declared further
//! down, so their assignments are collected and emitted at the end of the body.
//!
//! Generated module bindings never reuse a name bound at the top level of the
//! source.

use std::collections::{BTreeSet, HashSet};

use super::helpers::Helper;
use crate::ast::builders::*;
use crate::ast::*;
use crate::error::GenerationDiagnostic;

pub(crate) struct CommonJsModule {
    pub(crate) body: Vec<Stmt>,
    pub(crate) helpers: BTreeSet<Helper>,
    pub(crate) has_exports: bool,
}

pub(crate) fn lower(
    program: Program,
    external_helpers: bool,
) -> Result<CommonJsModule, GenerationDiagnostic> {
    let mut lowering = Lowering {
        external_helpers,
        helpers: BTreeSet::new(),
        exported: HashSet::new(),
        bindings: top_level_names(&program),
        re_exports_all: false,
        body: Vec::new(),
        deferred: Vec::new(),
    };
    for item in program.body {
        lowering.item(item)?;
    }
    lowering.body.append(&mut lowering.deferred);
    Ok(CommonJsModule {
        has_exports: lowering.re_exports_all || !lowering.exported.is_empty(),
        body: lowering.body,
        helpers: lowering.helpers,
    })
}

struct Lowering {
    external_helpers: bool,
    helpers: BTreeSet<Helper>,
    exported: HashSet<String>,
    bindings: HashSet<String>,
    re_exports_all: bool,
    body: Vec<Stmt>,
    /// Export assignments that reference a local binding by name.
    deferred: Vec<Stmt>,
}

/// Every name the source binds at module scope.
fn top_level_names(program: &Program) -> HashSet<String> {
    let mut names = HashSet::new();
    for item in &program.body {
        match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) | ModuleItem::Export(ExportDecl::Decl(decl)) => {
                names.extend(decl.bound_names().into_iter().map(|i| i.sym.clone()));
            }
            ModuleItem::Export(ExportDecl::Default(DefaultExport::Fn(FnExpr {
                ident: Some(ident),
                ..
            })))
            | ModuleItem::Export(ExportDecl::Default(DefaultExport::Class(ClassExpr {
                ident: Some(ident),
                ..
            }))) => {
                names.insert(ident.sym.clone());
            }
            ModuleItem::Import(import) => {
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Default(local)
                        | ImportSpecifier::Namespace(local)
                        | ImportSpecifier::Named { local, .. } => local,
                    };
                    names.insert(local.sym.clone());
                }
            }
            _ => {}
        }
    }
    names
}

fn require(source: &Str) -> Expr {
    call_expr(ident_expr("require"), vec![str_lit(source.value.clone())])
}

/// `_name` derived from the last segment of a module specifier.
fn binding_base(source: &str) -> String {
    let segment = source.rsplit('/').next().unwrap_or(source);
    let stem = segment.split('.').next().unwrap_or(segment);
    let sanitized: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "_module".to_string()
    } else {
        format!("_{}", sanitized)
    }
}

impl Lowering {
    fn item(&mut self, item: ModuleItem) -> Result<(), GenerationDiagnostic> {
        match item {
            ModuleItem::Stmt(stmt) => self.body.push(stmt),
            ModuleItem::Import(import) => self.import(import),
            ModuleItem::Export(export) => self.export(export)?,
        }
        Ok(())
    }

    fn helper_call(&mut self, helper: Helper, args: Vec<Expr>) -> Expr {
        self.helpers.insert(helper);
        let callee = if self.external_helpers {
            member_expr(ident_expr(helper.name()), "_")
        } else {
            ident_expr(helper.name())
        };
        call_expr(callee, args)
    }

    fn module_binding(&mut self, source: &str) -> String {
        let base = binding_base(source);
        let mut name = base.clone();
        let mut n = 1;
        // `bindings` is seeded with the source's own top-level names
        while !self.bindings.insert(name.clone()) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        name
    }

    fn import(&mut self, import: ImportDecl) {
        if import.type_only {
            return;
        }
        if import.specifiers.is_empty() {
            self.body.push(expr_stmt(require(&import.source)));
            return;
        }

        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();
        for specifier in import.specifiers {
            match specifier {
                ImportSpecifier::Default(local) => default = Some(local),
                ImportSpecifier::Namespace(local) => namespace = Some(local),
                ImportSpecifier::Named { local, imported } => {
                    let imported = imported.unwrap_or_else(|| local.clone());
                    named.push((local, imported));
                }
            }
        }

        let required = require(&import.source);
        let init = if namespace.is_some() || (default.is_some() && !named.is_empty()) {
            self.helper_call(Helper::InteropRequireWildcard, vec![required])
        } else if default.is_some() {
            self.helper_call(Helper::InteropRequireDefault, vec![required])
        } else {
            required
        };

        let binding = match namespace {
            Some(local) => local.sym,
            None => self.module_binding(&import.source.value),
        };
        self.body.push(var_stmt(VarKind::Const, binding.clone(), init));

        if let Some(local) = default {
            let value = member_expr(ident_expr(binding.clone()), "default");
            self.body.push(var_stmt(VarKind::Const, local.sym, value));
        }
        for (local, imported) in named {
            let value = member_expr(ident_expr(binding.clone()), imported.sym);
            self.body.push(var_stmt(VarKind::Const, local.sym, value));
        }
    }

    fn export(&mut self, export: ExportDecl) -> Result<(), GenerationDiagnostic> {
        match export {
            ExportDecl::Decl(decl) => {
                let names: Vec<String> = decl
                    .bound_names()
                    .into_iter()
                    .map(|ident| ident.sym.clone())
                    .collect();
                self.body.push(Stmt::Decl(decl));
                for name in names {
                    self.export_binding(&name, ident_expr(name.clone()))?;
                }
            }
            ExportDecl::Default(DefaultExport::Fn(f)) => match f.ident {
                Some(ident) => {
                    let name = ident.sym.clone();
                    self.body.push(Stmt::Decl(Decl::Fn(FnDecl {
                        ident,
                        function: f.function,
                    })));
                    self.export_binding("default", ident_expr(name))?;
                }
                None => self.export_binding(
                    "default",
                    Expr::Fn(FnExpr {
                        ident: None,
                        function: f.function,
                    }),
                )?,
            },
            ExportDecl::Default(DefaultExport::Class(c)) => match c.ident {
                Some(ident) => {
                    let name = ident.sym.clone();
                    self.body.push(Stmt::Decl(Decl::Class(ClassDecl {
                        ident,
                        class: c.class,
                    })));
                    self.export_binding("default", ident_expr(name))?;
                }
                None => self.export_binding(
                    "default",
                    Expr::Class(ClassExpr {
                        ident: None,
                        class: c.class,
                    }),
                )?,
            },
            ExportDecl::Default(DefaultExport::Expr(expr)) => match *expr {
                Expr::Ident(ident) => self.defer_export("default", Expr::Ident(ident))?,
                expr => self.export_binding("default", expr)?,
            },
            ExportDecl::Named {
                specifiers,
                source: None,
            } => {
                for specifier in specifiers {
                    let exported = specifier.exported_name().sym.clone();
                    self.defer_export(&exported, ident_expr(specifier.local.sym))?;
                }
            }
            ExportDecl::Named {
                specifiers,
                source: Some(source),
            } => {
                let binding = self.module_binding(&source.value);
                self.body
                    .push(var_stmt(VarKind::Const, binding.clone(), require(&source)));
                for specifier in specifiers {
                    let exported = specifier.exported_name().sym.clone();
                    let value = member_expr(ident_expr(binding.clone()), specifier.local.sym);
                    self.export_binding(&exported, value)?;
                }
            }
            ExportDecl::All { source } => {
                let call = self.helper_call(
                    Helper::ExportStar,
                    vec![require(&source), ident_expr("exports")],
                );
                self.body.push(expr_stmt(call));
                self.re_exports_all = true;
            }
        }
        Ok(())
    }

    fn export_binding(&mut self, name: &str, value: Expr) -> Result<(), GenerationDiagnostic> {
        let stmt = self.export_stmt(name, value)?;
        self.body.push(stmt);
        Ok(())
    }

    fn defer_export(&mut self, name: &str, value: Expr) -> Result<(), GenerationDiagnostic> {
        let stmt = self.export_stmt(name, value)?;
        self.deferred.push(stmt);
        Ok(())
    }

    fn export_stmt(&mut self, name: &str, value: Expr) -> Result<Stmt, GenerationDiagnostic> {
        if !self.exported.insert(name.to_string()) {
            return Err(GenerationDiagnostic::new(format!(
                "duplicate export '{}'",
                name
            )));
        }
        Ok(assign_stmt(member_expr(ident_expr("exports"), name), value))
    }
}
