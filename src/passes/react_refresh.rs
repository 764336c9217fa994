//! Fast-refresh instrumentation
//!
//! Finds the components a module defines at top level and registers each with
//! the refresh runtime, so editing the module swaps the components in place
//! without losing their state. For a module defining `App`, the output looks
//! like:
//!
//! ```text
//! var __prevRefreshReg = global.$RefreshReg$;
//! var __prevRefreshSig = global.$RefreshSig$;
//! global.$RefreshReg$ = global.$RefreshRuntime$.getRegisterFunction();
//! global.$RefreshSig$ = global.$RefreshRuntime$.getCreateSignatureFunction();
//! var __s = global.$RefreshSig$();
//! function App() {
//!     __s();
//!     const [n, setN] = useState(0);
//!     ...
//! }
//! __s(App, "<module id>:App", false);
//! global.$RefreshReg$(App, "App");
//! global.$RefreshRuntime$.getContext(App).accept();
//! global.$RefreshReg$ = __prevRefreshReg;
//! global.$RefreshSig$ = __prevRefreshSig;
//! ```
//!
//! The two signature lines and the `__s` calls only appear when some component
//! calls hooks. Modules without components are left untouched.

mod component;
mod ignored;

use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

use super::{Pass, PassParams, RunContext};
use crate::ast::builders::*;
use crate::ast::fold::Fold;
use crate::ast::*;
use crate::error::{ConfigError, PassError};
use component::ComponentScan;

const REGISTER_REF: &str = "global.$RefreshReg$";
const SIGNATURE_REF: &str = "global.$RefreshSig$";
const GET_REGISTER_FN: &str = "global.$RefreshRuntime$.getRegisterFunction";
const GET_SIGNATURE_FN: &str = "global.$RefreshRuntime$.getCreateSignatureFunction";
const GET_CONTEXT_FN: &str = "global.$RefreshRuntime$.getContext";
const PREV_REGISTER: &str = "__prevRefreshReg";
const PREV_SIGNATURE: &str = "__prevRefreshSig";
pub(crate) const SIGNATURE_FN: &str = "__s";

/// A component name starts with an uppercase letter.
pub fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_uppercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReactRefreshOptions {
    /// Prefix of component signature ids. Defaults to the run id.
    #[serde(default, alias = "module_id", alias = "moduleid")]
    pub module_id: Option<String>,
    #[serde(default, alias = "skip_env_check", alias = "skipenvcheck")]
    pub skip_env_check: bool,
}

impl ReactRefreshOptions {
    pub fn from_params(params: &PassParams) -> Result<Self, ConfigError> {
        serde_json::from_value(serde_json::Value::Object(params.clone())).map_err(|err| {
            ConfigError::InvalidPassOptions {
                pass: "react-refresh".to_string(),
                message: err.to_string(),
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReactRefresh {
    options: ReactRefreshOptions,
}

impl ReactRefresh {
    pub fn new(options: ReactRefreshOptions) -> Self {
        ReactRefresh { options }
    }
}

impl Pass for ReactRefresh {
    fn name(&self) -> &str {
        "react-refresh"
    }

    fn apply(&self, program: Program, ctx: &RunContext) -> Result<Program, PassError> {
        if !(self.options.skip_env_check || ctx.skip_env_checks || ctx.is_development()) {
            return Err(PassError::new(format!(
                "react-refresh transform should only be enabled in development environment \
                 (current: {}). If you want to override this check, pass `skipEnvCheck` as \
                 pass options.",
                ctx.env.as_deref().unwrap_or("unset")
            )));
        }

        let module_id = match &self.options.module_id {
            Some(id) => id.clone(),
            None => ctx.run_id.to_string(),
        };
        Ok(instrument(program, &module_id))
    }
}

struct Component {
    name: String,
    has_hooks: bool,
    has_custom_hooks: bool,
}

/// Name of the component a top-level item would define, if it has the shape
/// of one.
fn candidate_name(item: &ModuleItem) -> Option<&str> {
    let decl = match item {
        ModuleItem::Stmt(Stmt::Decl(decl)) | ModuleItem::Export(ExportDecl::Decl(decl)) => decl,
        ModuleItem::Export(ExportDecl::Default(DefaultExport::Fn(f))) => {
            return f.ident.as_ref().map(|ident| ident.sym.as_str());
        }
        _ => return None,
    };
    match decl {
        Decl::Fn(f) => Some(f.ident.sym.as_str()),
        Decl::Var(var) if var.decls.len() == 1 => {
            let declarator = &var.decls[0];
            match (&declarator.name, declarator.init.as_deref()) {
                (Pat::Ident(ident), Some(Expr::Fn(_) | Expr::Arrow(_) | Expr::Call(_))) => {
                    Some(ident.sym.as_str())
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Rewrites `program` to register its components under `module_id`.
pub fn instrument(program: Program, module_id: &str) -> Program {
    let ignored = ignored::collect(&program);
    let mut registered: HashSet<String> = HashSet::new();
    let mut components = Vec::new();
    let mut body = Vec::with_capacity(program.body.len());

    for item in program.body {
        let candidate = candidate_name(&item)
            .filter(|name| {
                is_component_name(name) && !ignored.contains(*name) && !registered.contains(*name)
            })
            .map(str::to_string);
        let Some(name) = candidate else {
            body.push(item);
            continue;
        };

        let mut scan = ComponentScan::default();
        let item = scan.fold_module_item(item);
        if !scan.empty_body {
            debug!(component = %name, hooks = scan.has_hooks(), "registering component");
            registered.insert(name.clone());
            components.push(Component {
                name,
                has_hooks: scan.has_hooks(),
                has_custom_hooks: scan.custom_hooks > 0,
            });
        }
        body.push(item);
    }

    if components.is_empty() {
        return Program { body };
    }

    let mut prologue = vec![
        var_stmt(VarKind::Var, PREV_REGISTER, path_expr(REGISTER_REF)),
        var_stmt(VarKind::Var, PREV_SIGNATURE, path_expr(SIGNATURE_REF)),
        assign_stmt(path_expr(REGISTER_REF), call_expr(path_expr(GET_REGISTER_FN), Vec::new())),
    ];
    if components.iter().any(|c| c.has_hooks) {
        prologue.push(assign_stmt(
            path_expr(SIGNATURE_REF),
            call_expr(path_expr(GET_SIGNATURE_FN), Vec::new()),
        ));
        prologue.push(var_stmt(
            VarKind::Var,
            SIGNATURE_FN,
            call_expr(path_expr(SIGNATURE_REF), Vec::new()),
        ));
    }

    let mut epilogue = Vec::new();
    for component in &components {
        let name = component.name.as_str();
        if component.has_hooks {
            epilogue.push(expr_stmt(call_expr(
                ident_expr(SIGNATURE_FN),
                vec![
                    ident_expr(name),
                    str_lit(format!("{}:{}", module_id, name)),
                    bool_lit(component.has_custom_hooks),
                ],
            )));
        }
        epilogue.push(expr_stmt(call_expr(
            path_expr(REGISTER_REF),
            vec![ident_expr(name), str_lit(name)],
        )));
        let context = call_expr(path_expr(GET_CONTEXT_FN), vec![ident_expr(name)]);
        epilogue.push(expr_stmt(call_expr(member_expr(context, "accept"), Vec::new())));
    }
    epilogue.push(assign_stmt(path_expr(REGISTER_REF), ident_expr(PREV_REGISTER)));
    epilogue.push(assign_stmt(path_expr(SIGNATURE_REF), ident_expr(PREV_SIGNATURE)));

    let body = prologue
        .into_iter()
        .map(ModuleItem::Stmt)
        .chain(body)
        .chain(epilogue.into_iter().map(ModuleItem::Stmt))
        .collect();
    Program { body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::RunId;
    use serde_json::json;

    #[test]
    fn test_component_names() {
        assert!(is_component_name("App"));
        assert!(is_component_name("Ürün"));
        assert!(!is_component_name("app"));
        assert!(!is_component_name(""));
    }

    #[test]
    fn test_options_accept_both_spellings() {
        let camel = json!({ "moduleId": "m", "skipEnvCheck": true });
        let snake = json!({ "module_id": "m", "skip_env_check": true });
        for value in [camel, snake] {
            let options = ReactRefreshOptions::from_params(value.as_object().unwrap()).unwrap();
            assert_eq!(options.module_id.as_deref(), Some("m"));
            assert!(options.skip_env_check);
        }
        let unknown = json!({ "module": "m" });
        assert!(ReactRefreshOptions::from_params(unknown.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_env_check() {
        let pass = ReactRefresh::default();
        let production = RunContext::new(RunId::new("1")).env(Some("production".into()));
        let err = pass.apply(Program::default(), &production).unwrap_err();
        assert!(err.message.contains("skipEnvCheck"));
        assert!(err.message.contains("production"));

        let development = RunContext::new(RunId::new("1")).env(Some("development".into()));
        assert!(pass.apply(Program::default(), &development).is_ok());
        assert!(pass
            .apply(Program::default(), &production.skip_env_checks(true))
            .is_ok());
    }
}
