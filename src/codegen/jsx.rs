//! Classic JSX lowering
//!
//! `<Tag a="1" {...rest}>text{x}</Tag>` becomes
//! `pragma(Tag, { a: "1", ...rest }, "text", x)`. Lowercase and dashed tag names
//! are intrinsic and passed as strings; fragments use the fragment pragma.

use super::printer::is_identifier;
use crate::ast::builders::{bool_lit, call_expr, path_expr, str_lit};
use crate::ast::fold::{walk_expr, Fold};
use crate::ast::*;
use crate::error::GenerationDiagnostic;

pub(crate) fn lower(
    program: Program,
    pragma: &str,
    pragma_frag: &str,
) -> Result<Program, GenerationDiagnostic> {
    validate_pragma(pragma)?;
    validate_pragma(pragma_frag)?;
    let mut lowering = JsxLowering {
        pragma,
        pragma_frag,
    };
    Ok(lowering.fold_program(program))
}

fn validate_pragma(pragma: &str) -> Result<(), GenerationDiagnostic> {
    if pragma.split('.').all(is_identifier) {
        Ok(())
    } else {
        Err(GenerationDiagnostic::new(format!(
            "invalid JSX pragma '{}'",
            pragma
        )))
    }
}

struct JsxLowering<'a> {
    pragma: &'a str,
    pragma_frag: &'a str,
}

impl Fold for JsxLowering<'_> {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match walk_expr(self, expr) {
            Expr::Jsx(element) => self.element(element),
            other => other,
        }
    }
}

impl JsxLowering<'_> {
    fn element(&self, element: JsxElement) -> Expr {
        let tag = match &element.name {
            None => path_expr(self.pragma_frag),
            Some(name) => tag_expr(name),
        };
        let mut args = vec![tag, self.props(element.attrs)];
        args.extend(element.children.into_iter().filter_map(|c| self.child(c)));
        call_expr(path_expr(self.pragma), args)
    }

    fn props(&self, attrs: Vec<JsxAttr>) -> Expr {
        if attrs.is_empty() {
            return Expr::Lit(Lit::Null);
        }
        let props = attrs
            .into_iter()
            .map(|attr| match attr {
                JsxAttr::Spread(expr) => PropOrSpread::Spread(expr),
                JsxAttr::Named { name, value } => {
                    let value = match value {
                        None => bool_lit(true),
                        Some(JsxAttrValue::Str(s)) => Expr::Lit(Lit::Str(s)),
                        Some(JsxAttrValue::Expr(expr)) => *expr,
                        Some(JsxAttrValue::Element(el)) => self.element(*el),
                    };
                    PropOrSpread::Prop(Prop::KeyValue {
                        key: prop_key(name),
                        value: Box::new(value),
                    })
                }
            })
            .collect();
        Expr::Object(props)
    }

    fn child(&self, child: JsxChild) -> Option<Expr> {
        match child {
            JsxChild::Text(raw) => normalize_text(&raw).map(str_lit),
            JsxChild::Expr(expr) => expr.map(|e| *e),
            JsxChild::Element(el) => Some(self.element(*el)),
        }
    }
}

fn tag_expr(name: &str) -> Expr {
    let intrinsic = name.contains('-')
        || (!name.contains('.') && name.starts_with(|c: char| c.is_ascii_lowercase()));
    if intrinsic {
        str_lit(name)
    } else {
        path_expr(name)
    }
}

fn prop_key(name: String) -> PropName {
    if is_identifier(&name) {
        PropName::Ident(Ident::new(name))
    } else {
        PropName::Str(Str::new(name))
    }
}

/// Collapses JSX text the way React does: lines are trimmed, lines that are
/// only whitespace vanish, the rest are joined with one space.
pub(crate) fn normalize_text(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;
    let mut parts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.trim_end_matches('\r');
        let mut trimmed = line;
        if i != 0 {
            trimmed = trimmed.trim_start_matches([' ', '\t']);
        }
        if i != last {
            trimmed = trimmed.trim_end_matches([' ', '\t']);
        }
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::ident_expr;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Count: "), Some("Count: ".to_string()));
        assert_eq!(normalize_text("\n    \n  "), None);
        assert_eq!(
            normalize_text("\n  Hello\n  world  \n"),
            Some("Hello world".to_string())
        );
    }

    #[test]
    fn test_tag_expressions() {
        assert_eq!(tag_expr("div"), str_lit("div"));
        assert_eq!(tag_expr("my-element"), str_lit("my-element"));
        assert_eq!(tag_expr("View"), ident_expr("View"));
        assert_eq!(tag_expr("ui.Button"), path_expr("ui.Button"));
    }

    #[test]
    fn test_rejects_invalid_pragma() {
        let err = lower(Program::default(), "h(", "Fragment").unwrap_err();
        assert!(err.message.contains("h("));
    }
}
