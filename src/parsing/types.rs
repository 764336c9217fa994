//! TypeScript type annotations
//!
//! Types are recognised and discarded; the tree never stores them.

use chumsky::prelude::*;
use chumsky::BoxedParser;

use super::lexical::{number, string_lit, sym, word, ParserError};

/// Any type expression: references with type arguments, unions and
/// intersections, arrays, tuples, object and function types, literal types.
pub(crate) fn ts_type() -> BoxedParser<'static, char, (), ParserError> {
    recursive(|ty| {
        let type_args = ty
            .clone()
            .separated_by(sym(","))
            .at_least(1)
            .delimited_by(sym("<"), sym(">"))
            .ignored();

        let reference = word()
            .separated_by(sym("."))
            .at_least(1)
            .then(type_args.or_not())
            .ignored();

        let literal = string_lit().ignored().or(number().ignored());

        let member = word()
            .or(string_lit().map(|s| s.value))
            .then(sym("?").or_not())
            .then_ignore(sym(":"))
            .then(ty.clone())
            .ignored();
        let object = member
            .separated_by(sym(";").or(sym(",")))
            .allow_trailing()
            .delimited_by(sym("{"), sym("}"))
            .ignored();

        let tuple = ty
            .clone()
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("["), sym("]"))
            .ignored();

        let fn_param = sym("...")
            .or_not()
            .then(word())
            .then(sym("?").or_not())
            .then(sym(":").ignore_then(ty.clone()).or_not())
            .ignored();
        let function = fn_param
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("("), sym(")"))
            .then_ignore(sym("=>"))
            .then(ty.clone())
            .ignored();

        let paren = ty.clone().delimited_by(sym("("), sym(")"));

        let primary = choice((function, paren, object, tuple, literal, reference));
        let array = primary
            .then(sym("[").then(sym("]")).repeated())
            .ignored();

        sym("|")
            .or_not()
            .ignore_then(array.separated_by(sym("|").or(sym("&"))).at_least(1))
            .ignored()
    })
    .boxed()
}

/// `: Type`, or nothing.
pub(crate) fn annotation() -> BoxedParser<'static, char, (), ParserError> {
    sym(":").ignore_then(ts_type()).or_not().ignored().boxed()
}

/// `<T, U extends X>` after a declared name.
pub(crate) fn type_params() -> BoxedParser<'static, char, (), ParserError> {
    word()
        .then(super::lexical::kw("extends").ignore_then(ts_type()).or_not())
        .then(sym("=").ignore_then(ts_type()).or_not())
        .separated_by(sym(","))
        .at_least(1)
        .delimited_by(sym("<"), sym(">"))
        .or_not()
        .ignored()
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(input: &str) -> bool {
        ts_type().then_ignore(end()).parse(input).is_ok()
    }

    #[test]
    fn test_common_type_shapes() {
        assert!(accepts("string"));
        assert!(accepts("React.ReactNode"));
        assert!(accepts("Array<Record<string, number>>"));
        assert!(accepts("string[] | null"));
        assert!(accepts("{ id: number; label?: string }"));
        assert!(accepts("(value: string, ...rest: any[]) => void"));
        assert!(accepts("'a' | 'b' | 3"));
        assert!(accepts("[number, string]"));
    }

    #[test]
    fn test_rejects_dangling_union() {
        assert!(!accepts("string |"));
    }
}
