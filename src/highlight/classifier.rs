//! Token classification for generated code
//!
//! A logos lexer splits code into runs that are each assigned a [`TokenClass`].
//! Every byte of the input lands in exactly one token: characters no rule
//! recognises come out as [`TokenClass::Plain`], so concatenating the token texts
//! always reproduces the input.

use logos::{Lexer, Logos};
use std::fmt;
use std::ops::Range;

/// Lexical category used purely for display styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenClass {
    Keyword,
    StringLiteral,
    Comment,
    Identifier,
    Punctuation,
    Plain,
}

impl TokenClass {
    pub const ALL: [TokenClass; 6] = [
        TokenClass::Keyword,
        TokenClass::StringLiteral,
        TokenClass::Comment,
        TokenClass::Identifier,
        TokenClass::Punctuation,
        TokenClass::Plain,
    ];

    /// Name used for this class in theme configuration.
    pub fn name(&self) -> &'static str {
        match self {
            TokenClass::Keyword => "keyword",
            TokenClass::StringLiteral => "string",
            TokenClass::Comment => "comment",
            TokenClass::Identifier => "identifier",
            TokenClass::Punctuation => "punctuation",
            TokenClass::Plain => "plain",
        }
    }

    pub fn from_name(name: &str) -> Option<TokenClass> {
        TokenClass::ALL.into_iter().find(|class| class.name() == name)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified slice of the scanned code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub class: TokenClass,
    pub text: &'a str,
    /// Byte range of `text` in the scanned code.
    pub span: Range<usize>,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"//[^\n]*")]
    #[token("/*", block_comment)]
    Comment,

    #[token("'", |lex| string_body(lex, '\''))]
    #[token("\"", |lex| string_body(lex, '"'))]
    #[token("`", |lex| string_body(lex, '`'))]
    String,

    #[token("as")]
    #[token("async")]
    #[token("await")]
    #[token("break")]
    #[token("case")]
    #[token("catch")]
    #[token("class")]
    #[token("const")]
    #[token("continue")]
    #[token("debugger")]
    #[token("default")]
    #[token("delete")]
    #[token("do")]
    #[token("else")]
    #[token("enum")]
    #[token("export")]
    #[token("extends")]
    #[token("false")]
    #[token("finally")]
    #[token("for")]
    #[token("from")]
    #[token("function")]
    #[token("if")]
    #[token("implements")]
    #[token("import")]
    #[token("in")]
    #[token("instanceof")]
    #[token("interface")]
    #[token("let")]
    #[token("new")]
    #[token("null")]
    #[token("of")]
    #[token("return")]
    #[token("static")]
    #[token("super")]
    #[token("switch")]
    #[token("this")]
    #[token("throw")]
    #[token("true")]
    #[token("try")]
    #[token("type")]
    #[token("typeof")]
    #[token("undefined")]
    #[token("var")]
    #[token("void")]
    #[token("while")]
    #[token("with")]
    #[token("yield")]
    Keyword,

    #[regex(r"[\p{L}\p{N}_$]+")]
    Identifier,

    // `/` is excluded so it can never run into a comment opener
    #[regex(r"[!%&*+,\-.:;<=>?@^|~(){}\[\]#]+")]
    #[token("/")]
    Punctuation,

    #[regex(r"\s+")]
    Whitespace,
}

/// Consumes a block comment body up to and including `*/`, or to end of input.
fn block_comment(lex: &mut Lexer<'_, RawToken>) {
    let rest = lex.remainder();
    let len = match rest.find("*/") {
        Some(end) => end + 2,
        None => rest.len(),
    };
    lex.bump(len);
}

/// Consumes a quoted body up to the matching unescaped quote, or to end of input.
fn string_body(lex: &mut Lexer<'_, RawToken>, quote: char) {
    let rest = lex.remainder();
    let mut escaped = false;
    let mut len = rest.len();
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            len = i + c.len_utf8();
            break;
        }
    }
    lex.bump(len);
}

impl RawToken {
    fn class(&self) -> TokenClass {
        match self {
            RawToken::Comment => TokenClass::Comment,
            RawToken::String => TokenClass::StringLiteral,
            RawToken::Keyword => TokenClass::Keyword,
            RawToken::Identifier => TokenClass::Identifier,
            RawToken::Punctuation => TokenClass::Punctuation,
            RawToken::Whitespace => TokenClass::Plain,
        }
    }
}

/// Lazy iterator over the tokens of one piece of code.
pub struct Tokens<'a> {
    lexer: Lexer<'a, RawToken>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let raw = self.lexer.next()?;
        let class = match raw {
            Ok(raw) => raw.class(),
            Err(()) => TokenClass::Plain,
        };
        Some(Token {
            class,
            text: self.lexer.slice(),
            span: self.lexer.span(),
        })
    }
}

/// Scans `code` from the start.
pub fn tokenize(code: &str) -> Tokens<'_> {
    Tokens {
        lexer: RawToken::lexer(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(code: &str) -> Vec<(TokenClass, &str)> {
        tokenize(code).map(|t| (t.class, t.text)).collect()
    }

    #[test]
    fn test_keywords_are_whole_words() {
        assert_eq!(
            classes("const constant"),
            vec![
                (TokenClass::Keyword, "const"),
                (TokenClass::Plain, " "),
                (TokenClass::Identifier, "constant"),
            ]
        );
    }

    #[test]
    fn test_comments_take_priority() {
        assert_eq!(
            classes("a // b 'c'\n"),
            vec![
                (TokenClass::Identifier, "a"),
                (TokenClass::Plain, " "),
                (TokenClass::Comment, "// b 'c'"),
                (TokenClass::Plain, "\n"),
            ]
        );
        assert_eq!(
            classes("/* x */y"),
            vec![(TokenClass::Comment, "/* x */"), (TokenClass::Identifier, "y")]
        );
    }

    #[test]
    fn test_slash_never_swallows_a_comment() {
        assert_eq!(
            classes("a=/*c*/b"),
            vec![
                (TokenClass::Identifier, "a"),
                (TokenClass::Punctuation, "="),
                (TokenClass::Comment, "/*c*/"),
                (TokenClass::Identifier, "b"),
            ]
        );
        assert_eq!(
            classes("a / b"),
            vec![
                (TokenClass::Identifier, "a"),
                (TokenClass::Plain, " "),
                (TokenClass::Punctuation, "/"),
                (TokenClass::Plain, " "),
                (TokenClass::Identifier, "b"),
            ]
        );
    }

    #[test]
    fn test_strings_with_escapes() {
        assert_eq!(
            classes(r#""a\"b" + 'c'"#),
            vec![
                (TokenClass::StringLiteral, r#""a\"b""#),
                (TokenClass::Plain, " "),
                (TokenClass::Punctuation, "+"),
                (TokenClass::Plain, " "),
                (TokenClass::StringLiteral, "'c'"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        assert_eq!(
            classes("x = 'abc"),
            vec![
                (TokenClass::Identifier, "x"),
                (TokenClass::Plain, " "),
                (TokenClass::Punctuation, "="),
                (TokenClass::Plain, " "),
                (TokenClass::StringLiteral, "'abc"),
            ]
        );
        assert_eq!(classes("/* open"), vec![(TokenClass::Comment, "/* open")]);
    }

    #[test]
    fn test_unicode_identifiers_and_unknown_characters() {
        assert_eq!(classes("café"), vec![(TokenClass::Identifier, "café")]);
        let tokens = classes("a\\b");
        assert_eq!(tokens[1], (TokenClass::Plain, "\\"));
    }

    #[test]
    fn test_class_names() {
        for class in TokenClass::ALL {
            assert_eq!(TokenClass::from_name(class.name()), Some(class));
        }
        assert_eq!(TokenClass::from_name("number"), None);
    }
}
