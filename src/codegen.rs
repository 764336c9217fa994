//! Code generation
//!
//! [`CodeGenerator`] is the seam the engine emits through; [`Emitter`] is the
//! built-in implementation. Generation runs in three steps:
//!
//! 1. JSX lowering (classic mode) or nothing (preserve mode)
//! 2. module lowering: CommonJS rewrites imports and exports, ES modules keep them
//! 3. printing, with runtime helpers placed at the top of CommonJS output

mod commonjs;
mod helpers;
mod jsx;
mod printer;

use std::fmt;
use std::str::FromStr;

use crate::ast::builders::{bool_lit, call_expr, expr_stmt, ident_expr, member_expr, str_lit};
use crate::ast::{Expr, Ident, Lit, Program, Prop, PropName, PropOrSpread, Stmt, Str};
use crate::error::{ConfigError, GenerationDiagnostic};
use printer::Printer;

/// Output packaging convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleFormat {
    #[default]
    CommonJs,
    EsModule,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::CommonJs => "commonjs",
            ModuleFormat::EsModule => "esmodule",
        }
    }
}

impl FromStr for ModuleFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commonjs" | "cjs" => Ok(ModuleFormat::CommonJs),
            "esmodule" | "es6" | "esm" => Ok(ModuleFormat::EsModule),
            other => Err(ConfigError::UnknownModuleFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How JSX nodes reach the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsxMode {
    /// Lower to `pragma(type, props, ...children)` calls.
    Classic { pragma: String, pragma_frag: String },
    /// Print JSX back as written.
    Preserve,
}

impl Default for JsxMode {
    fn default() -> Self {
        JsxMode::Classic {
            pragma: "React.createElement".to_string(),
            pragma_frag: "React.Fragment".to_string(),
        }
    }
}

pub const DEFAULT_HELPERS_MODULE: &str = "@swc/helpers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub module: ModuleFormat,
    pub jsx: JsxMode,
    /// Require helpers from `helpers_module` instead of inlining them.
    pub external_helpers: bool,
    pub helpers_module: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            module: ModuleFormat::default(),
            jsx: JsxMode::default(),
            external_helpers: true,
            helpers_module: DEFAULT_HELPERS_MODULE.to_string(),
        }
    }
}

/// Turns a final program into source text.
pub trait CodeGenerator: Send + Sync {
    fn generate(
        &self,
        program: Program,
        options: &GenerateOptions,
    ) -> Result<String, GenerationDiagnostic>;
}

/// The built-in JavaScript emitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Emitter;

impl CodeGenerator for Emitter {
    fn generate(
        &self,
        program: Program,
        options: &GenerateOptions,
    ) -> Result<String, GenerationDiagnostic> {
        let program = match &options.jsx {
            JsxMode::Classic {
                pragma,
                pragma_frag,
            } => jsx::lower(program, pragma, pragma_frag)?,
            JsxMode::Preserve => program,
        };

        let mut printer = Printer::new();
        match options.module {
            ModuleFormat::EsModule => {
                for item in &program.body {
                    printer.module_item(item);
                }
            }
            ModuleFormat::CommonJs => {
                let module = commonjs::lower(program, options.external_helpers)?;
                printer.stmt(&expr_stmt(Expr::Lit(Lit::Str(Str {
                    value: "use strict".to_string(),
                    raw: Some("\"use strict\"".to_string()),
                }))));
                if module.has_exports {
                    printer.stmt(&es_module_marker());
                }
                helpers::emit(
                    &mut printer,
                    &module.helpers,
                    options.external_helpers,
                    &options.helpers_module,
                );
                for stmt in &module.body {
                    printer.stmt(stmt);
                }
            }
        }
        Ok(printer.finish())
    }
}

/// `Object.defineProperty(exports, "__esModule", { value: true });`
fn es_module_marker() -> Stmt {
    let descriptor = Expr::Object(vec![PropOrSpread::Prop(Prop::KeyValue {
        key: PropName::Ident(Ident::new("value")),
        value: Box::new(bool_lit(true)),
    })]);
    expr_stmt(call_expr(
        member_expr(ident_expr("Object"), "defineProperty"),
        vec![
            ident_expr("exports"),
            str_lit("__esModule"),
            descriptor,
        ],
    ))
}
