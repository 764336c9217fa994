//! Names that look like components but must never be registered
//!
//! Components imported from other modules are registered by their own module,
//! and class components are not supported by the refresh runtime.

use std::collections::HashSet;

use super::is_component_name;
use crate::ast::visit::Visit;
use crate::ast::{ClassDecl, ImportDecl, ImportSpecifier, Program};

pub(super) fn collect(program: &Program) -> HashSet<String> {
    let mut collector = IgnoredNames::default();
    collector.visit_program(program);
    collector.names
}

#[derive(Default)]
struct IgnoredNames {
    names: HashSet<String>,
}

impl IgnoredNames {
    fn add(&mut self, name: &str) {
        if is_component_name(name) {
            self.names.insert(name.to_string());
        }
    }
}

impl Visit for IgnoredNames {
    fn visit_import_decl(&mut self, import: &ImportDecl) {
        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Default(local) | ImportSpecifier::Named { local, .. } => {
                    self.add(&local.sym)
                }
                ImportSpecifier::Namespace(_) => {}
            }
        }
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        self.add(&decl.ident.sym);
        self.visit_class(&decl.class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ChumskyParser, SourceParser};
    use crate::source::Dialect;

    #[test]
    fn test_collects_imports_and_classes() {
        let program = ChumskyParser
            .parse(
                "import Default, { Named, helper, Other as Alias } from 'lib';\n\
                 import * as Everything from 'all';\n\
                 class Legacy extends Component {}\n\
                 function wrap() { class Inner {} }\n",
                Dialect::tsx(),
            )
            .unwrap();
        let mut names: Vec<String> = collect(&program).into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["Alias", "Default", "Inner", "Legacy", "Named"]);
    }
}
