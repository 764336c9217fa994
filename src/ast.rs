//! Program tree for the accepted TSX subset
//!
//! Parsing produces a [`Program`], passes rewrite it with [`fold::Fold`] or
//! inspect it with [`visit::Visit`], and code generation prints it back out.

pub mod builders;
pub mod fold;
mod nodes;
pub mod visit;

pub use nodes::*;

/// Names bound by a pattern, in source order.
pub fn bound_names(pat: &Pat) -> Vec<&Ident> {
    let mut names = Vec::new();
    collect_bound_names(pat, &mut names);
    names
}

fn collect_bound_names<'a>(pat: &'a Pat, out: &mut Vec<&'a Ident>) {
    match pat {
        Pat::Ident(ident) => out.push(ident),
        Pat::Array(elems) => elems.iter().for_each(|p| collect_bound_names(p, out)),
        Pat::Object(props) => {
            for prop in props {
                match prop {
                    ObjectPatProp::KeyValue { value, .. } => collect_bound_names(value, out),
                    ObjectPatProp::Shorthand { ident, .. } => out.push(ident),
                    ObjectPatProp::Rest(inner) => collect_bound_names(inner, out),
                }
            }
        }
        Pat::Assign { left, .. } => collect_bound_names(left, out),
        Pat::Rest(inner) => collect_bound_names(inner, out),
    }
}

impl Decl {
    /// Runtime bindings introduced by the declaration. Type-only declarations bind nothing.
    pub fn bound_names(&self) -> Vec<&Ident> {
        match self {
            Decl::Var(var) => var.decls.iter().flat_map(|d| bound_names(&d.name)).collect(),
            Decl::Fn(f) => vec![&f.ident],
            Decl::Class(c) => vec![&c.ident],
            Decl::TsType(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_names_walks_nested_patterns() {
        let pat = Pat::Object(vec![
            ObjectPatProp::Shorthand {
                ident: Ident::new("a"),
                default: None,
            },
            ObjectPatProp::KeyValue {
                key: PropName::Ident(Ident::new("b")),
                value: Pat::Array(vec![
                    Pat::Ident(Ident::new("c")),
                    Pat::Rest(Box::new(Pat::Ident(Ident::new("d")))),
                ]),
            },
        ]);

        let names: Vec<&str> = bound_names(&pat).iter().map(|i| i.sym.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }
}
