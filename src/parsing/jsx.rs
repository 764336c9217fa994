//! JSX elements, fragments, attributes and children
//!
//! Inside element bodies whitespace is significant, so the element parser does
//! not consume trailing trivia; the expression grammar adds it after the
//! outermost element.

use chumsky::prelude::*;
use chumsky::BoxedParser;

use super::lexical::{lexeme, string_lit, sym, trivia, ParserError};
use crate::ast::{Expr, JsxAttr, JsxAttrValue, JsxChild, JsxElement};

fn name_segment() -> impl Parser<char, String, Error = ParserError> + Clone {
    filter::<char, _, ParserError>(|c: &char| c.is_alphabetic() || *c == '_' || *c == '$')
        .chain::<char, _, _>(
            filter(|c: &char| c.is_alphanumeric() || matches!(c, '_' | '$' | '-')).repeated(),
        )
        .collect::<String>()
}

/// A tag name: `div`, `my-element`, `Foo.Bar`.
fn tag_name() -> impl Parser<char, String, Error = ParserError> + Clone {
    name_segment()
        .separated_by(just('.'))
        .at_least(1)
        .map(|parts| parts.join("."))
        .labelled("tag name")
}

/// An attribute name, optionally namespaced (`xlink:href`).
fn attr_name() -> impl Parser<char, String, Error = ParserError> + Clone {
    name_segment()
        .then(just(':').ignore_then(name_segment()).or_not())
        .map(|(name, local)| match local {
            Some(local) => format!("{}:{}", name, local),
            None => name,
        })
        .labelled("attribute name")
}

fn closing_tag() -> impl Parser<char, String, Error = ParserError> + Clone {
    just('<')
        .then(trivia())
        .then(just('/'))
        .ignore_then(trivia())
        .ignore_then(lexeme(tag_name()).or_not())
        .then_ignore(just('>'))
        .map(|name| name.unwrap_or_default())
}

pub(crate) fn element<P>(expr: P) -> BoxedParser<'static, char, JsxElement, ParserError>
where
    P: Parser<char, Expr, Error = ParserError> + Clone + 'static,
{
    recursive(move |element| {
        let container = just('{')
            .ignore_then(trivia())
            .ignore_then(expr.clone())
            .then_ignore(just('}'));

        let attr_value = choice((
            string_lit().map(JsxAttrValue::Str),
            lexeme(container.clone()).map(|e| JsxAttrValue::Expr(Box::new(e))),
            lexeme(element.clone()).map(|el| JsxAttrValue::Element(Box::new(el))),
        ));

        let attr = choice((
            lexeme(
                just('{')
                    .ignore_then(trivia())
                    .ignore_then(sym("..."))
                    .ignore_then(expr.clone())
                    .then_ignore(just('}')),
            )
            .map(|e| JsxAttr::Spread(Box::new(e))),
            lexeme(attr_name())
                .then(sym("=").ignore_then(attr_value).or_not())
                .map(|(name, value)| JsxAttr::Named { name, value }),
        ));

        let text = filter(|c: &char| *c != '<' && *c != '{')
            .repeated()
            .at_least(1)
            .collect::<String>()
            .map(JsxChild::Text);
        let child_expr = just('{')
            .ignore_then(trivia())
            .ignore_then(expr.clone().or_not())
            .then_ignore(just('}'))
            .map(|e| JsxChild::Expr(e.map(Box::new)));
        let child = choice((
            text,
            child_expr,
            element.clone().map(|el| JsxChild::Element(Box::new(el))),
        ));

        let fragment = just('<')
            .then(trivia())
            .then(just('>'))
            .ignore_then(child.clone().repeated())
            .then(closing_tag())
            .try_map(|(children, closing), span| {
                if closing.is_empty() {
                    Ok(JsxElement {
                        name: None,
                        attrs: Vec::new(),
                        children,
                        self_closing: false,
                    })
                } else {
                    Err(Simple::custom(
                        span,
                        format!("expected '</>' to close fragment, found '</{}>'", closing),
                    ))
                }
            });

        let body = choice((
            just("/>").to(None),
            just('>')
                .ignore_then(child.repeated())
                .then(closing_tag())
                .map(Some),
        ));

        let tagged = just('<')
            .ignore_then(trivia())
            .ignore_then(lexeme(tag_name()))
            .then(attr.repeated())
            .then(body)
            .try_map(|((name, attrs), body), span| match body {
                None => Ok(JsxElement {
                    name: Some(name),
                    attrs,
                    children: Vec::new(),
                    self_closing: true,
                }),
                Some((children, closing)) if closing == name => Ok(JsxElement {
                    name: Some(name),
                    attrs,
                    children,
                    self_closing: false,
                }),
                Some((_, closing)) => Err(Simple::custom(
                    span,
                    format!("expected '</{}>', found '</{}>'", name, closing),
                )),
            });

        fragment.or(tagged)
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ident;
    use crate::parsing::lexical::ident;

    fn parse(input: &str) -> Result<JsxElement, Vec<ParserError>> {
        let expr = ident().map(|name| Expr::Ident(Ident::new(name)));
        element(expr).then_ignore(end()).parse(input)
    }

    #[test]
    fn test_nested_elements_with_text_and_expressions() {
        let el = parse("<View style={style}><Text>Count: {count}</Text></View>").unwrap();
        assert_eq!(el.name.as_deref(), Some("View"));
        assert_eq!(el.attrs.len(), 1);
        let JsxChild::Element(text) = &el.children[0] else {
            panic!("expected element child");
        };
        assert_eq!(text.children.len(), 2);
        assert_eq!(text.children[0], JsxChild::Text("Count: ".into()));
    }

    #[test]
    fn test_fragment_and_self_closing() {
        let el = parse("<><br /></>").unwrap();
        assert_eq!(el.name, None);
        let JsxChild::Element(br) = &el.children[0] else {
            panic!("expected element child");
        };
        assert!(br.self_closing);
    }

    #[test]
    fn test_mismatched_closing_tag_is_rejected() {
        assert!(parse("<a></b>").is_err());
    }

    #[test]
    fn test_boolean_and_spread_attributes() {
        let el = parse("<input disabled {...rest} aria-label='x' />").unwrap();
        assert_eq!(el.attrs.len(), 3);
        assert!(matches!(&el.attrs[0], JsxAttr::Named { name, value: None } if name == "disabled"));
        assert!(matches!(&el.attrs[1], JsxAttr::Spread(_)));
    }
}
