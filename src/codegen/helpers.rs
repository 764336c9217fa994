//! Runtime interop helpers used by CommonJS output

use std::collections::BTreeSet;

use super::printer::Printer;
use crate::ast::builders::{call_expr, ident_expr, str_lit, var_stmt};
use crate::ast::VarKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Helper {
    InteropRequireDefault,
    InteropRequireWildcard,
    ExportStar,
}

impl Helper {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Helper::InteropRequireDefault => "_interop_require_default",
            Helper::InteropRequireWildcard => "_interop_require_wildcard",
            Helper::ExportStar => "_export_star",
        }
    }

    fn definition(&self) -> &'static str {
        match self {
            Helper::InteropRequireDefault => {
                "function _interop_require_default(obj) {\n    return obj && obj.__esModule ? obj : { default: obj };\n}"
            }
            Helper::InteropRequireWildcard => concat!(
                "function _interop_require_wildcard(obj) {\n",
                "    if (obj && obj.__esModule) return obj;\n",
                "    var newObj = { default: obj };\n",
                "    if (obj != null) {\n",
                "        for (var key in obj) {\n",
                "            if (key !== \"default\" && Object.prototype.hasOwnProperty.call(obj, key)) newObj[key] = obj[key];\n",
                "        }\n",
                "    }\n",
                "    return newObj;\n",
                "}"
            ),
            Helper::ExportStar => concat!(
                "function _export_star(from, to) {\n",
                "    Object.keys(from).forEach(function(k) {\n",
                "        if (k !== \"default\" && !Object.prototype.hasOwnProperty.call(to, k)) {\n",
                "            Object.defineProperty(to, k, { enumerable: true, get: function() { return from[k]; } });\n",
                "        }\n",
                "    });\n",
                "    return from;\n",
                "}"
            ),
        }
    }
}

/// Prints a `require` per helper, or each helper's definition when inlined.
pub(crate) fn emit(
    printer: &mut Printer,
    helpers: &BTreeSet<Helper>,
    external: bool,
    helpers_module: &str,
) {
    for helper in helpers {
        if external {
            let path = format!("{}/_/{}", helpers_module, helper.name());
            let require = call_expr(ident_expr("require"), vec![str_lit(path)]);
            printer.stmt(&var_stmt(VarKind::Const, helper.name(), require));
        } else {
            printer.raw(helper.definition());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_helpers_are_required_from_module() {
        let mut printer = Printer::new();
        let helpers = BTreeSet::from([Helper::InteropRequireDefault]);
        emit(&mut printer, &helpers, true, "@swc/helpers");
        assert_eq!(
            printer.finish(),
            "const _interop_require_default = require(\"@swc/helpers/_/_interop_require_default\");\n"
        );
    }

    #[test]
    fn test_inlined_helpers_are_defined_once_each() {
        let mut printer = Printer::new();
        let helpers = BTreeSet::from([Helper::ExportStar, Helper::InteropRequireWildcard]);
        emit(&mut printer, &helpers, false, "@swc/helpers");
        let out = printer.finish();
        assert_eq!(out.matches("function _interop_require_wildcard(").count(), 1);
        assert_eq!(out.matches("function _export_star(").count(), 1);
        assert!(out.find("_interop_require_wildcard") < out.find("_export_star"));
    }
}
