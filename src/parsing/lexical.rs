//! Lexical building blocks: trivia, punctuation, keywords, names and literals
//!
//! Every public combinator here is a lexeme: it consumes the trailing trivia
//! (whitespace and comments) after what it matched. Leading trivia is consumed
//! once at the start of the program.

use chumsky::prelude::*;

use crate::ast::Str;

pub(crate) type ParserError = Simple<char>;

const RESERVED: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

pub(crate) fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// Whitespace, line comments and block comments.
pub(crate) fn trivia() -> impl Parser<char, (), Error = ParserError> + Clone {
    let whitespace = filter::<char, _, ParserError>(|c: &char| c.is_whitespace()).ignored();
    let line_comment = just("//")
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored();
    let block_comment = just("/*").then(take_until(just("*/"))).ignored();

    choice((whitespace, line_comment, block_comment))
        .repeated()
        .ignored()
}

pub(crate) fn lexeme<O, P>(parser: P) -> impl Parser<char, O, Error = ParserError> + Clone
where
    P: Parser<char, O, Error = ParserError> + Clone,
{
    parser.then_ignore(trivia())
}

/// A punctuator such as `=>` or `{`.
pub(crate) fn sym(text: &'static str) -> impl Parser<char, (), Error = ParserError> + Clone {
    lexeme(just(text).ignored()).labelled(text)
}

/// An identifier-shaped word with no reserved-word check.
pub(crate) fn raw_word() -> impl Parser<char, String, Error = ParserError> + Clone {
    filter::<char, _, ParserError>(|c: &char| c.is_alphabetic() || *c == '_' || *c == '$')
        .chain::<char, _, _>(
            filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '$').repeated(),
        )
        .collect::<String>()
}

/// A word in property position (`a.default`, `{ class: x }`), reserved words allowed.
pub(crate) fn word() -> impl Parser<char, String, Error = ParserError> + Clone {
    lexeme(raw_word()).labelled("property name")
}

/// A binding or reference identifier.
pub(crate) fn ident() -> impl Parser<char, String, Error = ParserError> + Clone {
    lexeme(raw_word().try_map(|name, span| {
        if is_reserved(&name) {
            Err(Simple::custom(span, format!("unexpected keyword '{}'", name)))
        } else {
            Ok(name)
        }
    }))
    .labelled("identifier")
}

/// A keyword, matched as a whole word so `constant` never reads as `const`.
pub(crate) fn kw(keyword: &'static str) -> impl Parser<char, (), Error = ParserError> + Clone {
    lexeme(raw_word().try_map(move |name, span| {
        if name == keyword {
            Ok(())
        } else {
            Err(Simple::custom(span, format!("expected '{}'", keyword)))
        }
    }))
    .labelled(keyword)
}

fn quoted(quote: char) -> impl Parser<char, String, Error = ParserError> + Clone {
    let escape = just::<char, _, ParserError>('\\').chain::<char, _, _>(any());
    let plain = filter(move |c: &char| *c != quote && *c != '\\' && *c != '\n').map(|c| vec![c]);

    just(quote)
        .chain::<char, _, _>(escape.or(plain).repeated().flatten())
        .chain::<char, _, _>(just(quote))
        .collect::<String>()
}

/// A single- or double-quoted string literal.
pub(crate) fn string_lit() -> impl Parser<char, Str, Error = ParserError> + Clone {
    lexeme(quoted('"').or(quoted('\'')).map(|raw| Str {
        value: unescape(&raw[1..raw.len() - 1]),
        raw: Some(raw),
    }))
    .labelled("string")
}

/// A template literal without substitutions; yields the text between the backticks.
pub(crate) fn template_lit() -> impl Parser<char, String, Error = ParserError> + Clone {
    let escape = just::<char, _, ParserError>('\\').chain::<char, _, _>(any());
    let plain = filter(|c: &char| *c != '`' && *c != '\\').map(|c| vec![c]);

    lexeme(
        just('`')
            .ignore_then(escape.or(plain).repeated().flatten())
            .then_ignore(just('`'))
            .collect::<String>()
            .try_map(|body, span| {
                if body.contains("${") {
                    Err(Simple::custom(
                        span,
                        "template literal substitutions are not supported",
                    ))
                } else {
                    Ok(body)
                }
            }),
    )
    .labelled("template literal")
}

/// Decimal number literal, kept in source spelling.
pub(crate) fn number() -> impl Parser<char, String, Error = ParserError> + Clone {
    let digits = filter::<char, _, ParserError>(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1);

    lexeme(
        digits
            .clone()
            .chain::<char, _, _>(just('.').chain(digits).or_not().flatten())
            .collect::<String>(),
    )
    .labelled("number")
}

/// Resolves the escape sequences of a quoted string body.
pub(crate) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all<O>(parser: impl Parser<char, O, Error = ParserError>, input: &str) -> Option<O> {
        parser.then_ignore(end()).parse(input).ok()
    }

    #[test]
    fn test_keyword_does_not_match_identifier_prefix() {
        assert_eq!(parse_all(kw("const"), "const "), Some(()));
        assert!(parse_all(kw("const"), "constant").is_none());
    }

    #[test]
    fn test_ident_rejects_reserved_words() {
        assert_eq!(parse_all(ident(), "$Refresh_1"), Some("$Refresh_1".to_string()));
        assert!(parse_all(ident(), "return").is_none());
        assert_eq!(parse_all(word(), "default"), Some("default".to_string()));
    }

    #[test]
    fn test_string_keeps_raw_and_unescapes_value() {
        let s = parse_all(string_lit(), r#"'it\'s'"#).unwrap();
        assert_eq!(s.value, "it's");
        assert_eq!(s.raw.as_deref(), Some(r#"'it\'s'"#));
    }

    #[test]
    fn test_lexemes_consume_trailing_comments() {
        assert_eq!(
            parse_all(number(), "12.5 // trailing\n/* block */ "),
            Some("12.5".to_string())
        );
    }

    #[test]
    fn test_template_rejects_substitutions() {
        assert_eq!(parse_all(template_lit(), "`plain`"), Some("plain".to_string()));
        assert!(parse_all(template_lit(), "`a ${b}`").is_none());
    }
}
