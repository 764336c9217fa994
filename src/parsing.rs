//! Source parsing
//!
//! [`SourceParser`] is the seam the engine parses through. [`ChumskyParser`] is
//! the built-in implementation: a character-level chumsky grammar covering the
//! module subset described in [`crate::ast`]. TypeScript annotations are parsed
//! and dropped, JSX is kept in the tree.
//!
//! Failures are reported as a single [`ParseDiagnostic`] with a 1-based line and
//! column, taken from the furthest point the grammar reached.
//!
//! The grammar is recursive descent, so every parse runs on its own thread with
//! a 64 MiB stack, even when the caller is already a blocking worker. Input
//! nested deeper than [`MAX_NESTING`] brackets or markup elements is rejected
//! with a diagnostic before that thread starts.

mod grammar;
mod jsx;
mod lexical;
mod types;

use chumsky::error::SimpleReason;
use chumsky::Parser;
use std::thread;
use tracing::debug;

use crate::ast::Program;
use crate::error::ParseDiagnostic;
use crate::source::Dialect;
use grammar::Features;
use lexical::ParserError;

/// Turns source text into a [`Program`] for a given dialect.
pub trait SourceParser: Send + Sync {
    fn parse(&self, text: &str, dialect: Dialect) -> Result<Program, ParseDiagnostic>;
}

// Nested markup recurses deeply through the combinators.
const PARSER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Deepest bracket or markup nesting the grammar is run on.
pub const MAX_NESTING: usize = 128;

/// The built-in grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChumskyParser;

impl SourceParser for ChumskyParser {
    fn parse(&self, text: &str, dialect: Dialect) -> Result<Program, ParseDiagnostic> {
        let features = Features {
            typescript: dialect.is_typescript(),
            jsx: dialect.markup,
        };

        if let Some(offset) = excessive_nesting(text) {
            debug!(offset, "nesting limit exceeded");
            return Err(LineIndex::new(text).diagnostic(
                offset,
                format!("nesting deeper than {} levels", MAX_NESTING),
            ));
        }

        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("tsx-refresh-parser".into())
                .stack_size(PARSER_STACK_SIZE)
                .spawn_scoped(scope, || parse_program(text, features))
                .map_err(|err| ParseDiagnostic {
                    message: format!("could not start parser thread: {}", err),
                    line: 1,
                    column: 1,
                    offset: 0,
                })?;

            match worker.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }
}

fn parse_program(text: &str, features: Features) -> Result<Program, ParseDiagnostic> {
    grammar::program(features).parse(text).map_err(|errors| {
        debug!(count = errors.len(), "parse failed");
        let index = LineIndex::new(text);
        let furthest = errors.iter().max_by_key(|err| err.span().start);
        match furthest {
            Some(err) => index.diagnostic(err.span().start, describe(err)),
            None => index.diagnostic(0, "invalid syntax".to_string()),
        }
    })
}

/// Character offset of the first bracket or tag that opens a level beyond
/// [`MAX_NESTING`]. Strings and comments are skipped.
fn excessive_nesting(text: &str) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut depth = 0usize;
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match (c, next) {
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
                continue;
            }
            ('\'' | '"' | '`', _) => {
                i = skip_string(&chars, i);
                prev = Some(c);
                continue;
            }
            ('<', Some('/')) => {
                depth = depth.saturating_sub(1);
                i += 2;
                continue;
            }
            ('(' | '[' | '{', _) => depth += 1,
            (')' | ']' | '}', _) | ('/', Some('>')) => depth = depth.saturating_sub(1),
            ('<', Some(n)) if opens_tag(prev, n) => depth += 1,
            _ => {}
        }
        if depth > MAX_NESTING {
            return Some(i);
        }
        if !c.is_whitespace() {
            prev = Some(c);
        }
        i += 1;
    }
    None
}

/// Index just past the string starting at `start`. Quoted strings also stop at
/// a line break so markup text like `Don't` cannot swallow the file.
fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '\n' if quote != '`' => return i,
            c if c == quote => return i + 1,
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

/// `<` starts an element only where an expression can start, which rules out
/// comparisons and type arguments like `Array<string>`.
fn opens_tag(prev: Option<char>, next: char) -> bool {
    let at_expression_start = match prev {
        None => true,
        Some(p) => "([{,=>?:;&|!".contains(p),
    };
    at_expression_start && (next.is_alphabetic() || next == '>')
}

fn describe(err: &ParserError) -> String {
    if let SimpleReason::Custom(message) = err.reason() {
        return message.clone();
    }

    let found = match err.found() {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    };

    let mut expected: Vec<String> = err
        .expected()
        .map(|e| match e {
            Some(c) => format!("{:?}", c),
            None => "end of input".to_string(),
        })
        .collect();
    expected.sort();
    expected.dedup();

    match (err.label(), expected.is_empty()) {
        (Some(label), _) => format!("unexpected {} while parsing {}", found, label),
        (None, true) => format!("unexpected {}", found),
        (None, false) => format!("unexpected {}, expected {}", found, expected.join(", ")),
    }
}

/// Maps character offsets to 1-based line/column positions.
pub(crate) struct LineIndex {
    /// Character offset of each line start.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, c) in text.chars().enumerate() {
            if c == '\n' {
                line_starts.push(offset + 1);
            }
        }
        LineIndex { line_starts }
    }

    pub(crate) fn position(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }

    fn diagnostic(&self, offset: usize, message: String) -> ParseDiagnostic {
        let (line, column) = self.position(offset);
        ParseDiagnostic {
            message,
            line,
            column,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::source::Syntax;

    fn parse_tsx(text: &str) -> Result<Program, ParseDiagnostic> {
        ChumskyParser.parse(text, Dialect::tsx())
    }

    #[test]
    fn test_line_index_positions() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.position(1), (1, 2));
        assert_eq!(index.position(3), (2, 1));
        assert_eq!(index.position(6), (3, 1));
        assert_eq!(index.position(7), (4, 1));
    }

    #[test]
    fn test_parses_imports_and_exports() {
        let program = parse_tsx(
            "import React, { useState as useS } from 'react';\n\
             import * as api from './api';\n\
             export { a as b };\n\
             export * from './all';\n",
        )
        .unwrap();

        assert_eq!(program.body.len(), 4);
        let ModuleItem::Import(import) = &program.body[0] else {
            panic!("expected import");
        };
        assert_eq!(import.source.value, "react");
        assert_eq!(
            import.specifiers,
            vec![
                ImportSpecifier::Default(Ident::new("React")),
                ImportSpecifier::Named {
                    local: Ident::new("useS"),
                    imported: Some(Ident::new("useState")),
                },
            ]
        );
    }

    #[test]
    fn test_type_annotations_are_erased() {
        let program = parse_tsx(
            "type Props = { label: string };\n\
             interface State { count: number }\n\
             const f = (a: number, b?: string): void => {};\n",
        )
        .unwrap();

        assert_eq!(
            program.body[0],
            ModuleItem::Stmt(Stmt::Decl(Decl::TsType(Ident::new("Props"))))
        );
        assert_eq!(
            program.body[1],
            ModuleItem::Stmt(Stmt::Decl(Decl::TsType(Ident::new("State"))))
        );
        let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &program.body[2] else {
            panic!("expected variable declaration");
        };
        let Some(init) = &var.decls[0].init else {
            panic!("expected initializer");
        };
        let Expr::Arrow(arrow) = init.as_ref() else {
            panic!("expected arrow function");
        };
        assert_eq!(arrow.params.len(), 2);
    }

    #[test]
    fn test_operator_precedence() {
        let program = parse_tsx("x = a + b * c === d || e;").unwrap();
        let ModuleItem::Stmt(Stmt::Expr(expr)) = &program.body[0] else {
            panic!("expected expression statement");
        };
        let Expr::Assign(assign) = expr.as_ref() else {
            panic!("expected assignment");
        };
        let Expr::Bin(or) = assign.value.as_ref() else {
            panic!("expected binary expression");
        };
        assert_eq!(or.op, BinaryOp::LogicalOr);
        let Expr::Bin(eq) = or.left.as_ref() else {
            panic!("expected equality");
        };
        assert_eq!(eq.op, BinaryOp::EqEqEq);
    }

    #[test]
    fn test_jsx_needs_markup_extension() {
        let text = "const el = <div />;";
        assert!(ChumskyParser.parse(text, Dialect::jsx()).is_ok());

        let err = ChumskyParser
            .parse(text, Dialect::new(Syntax::EcmaScript, false))
            .unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_annotations_rejected_without_typescript() {
        assert!(ChumskyParser
            .parse("const a: number = 1;", Dialect::jsx())
            .is_err());
    }

    #[test]
    fn test_error_position_points_at_offending_line() {
        let err = parse_tsx("const a = 1;\nconst b = ;\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.column > 1);
    }

    #[test]
    fn test_braces_after_arrow_open_a_block() {
        assert!(parse_tsx("const f = () => { a: 1 };").is_err());

        let program = parse_tsx("const f = () => ({ a: 1 });\nconst g = () => {};").unwrap();
        let arrow_body = |item: &ModuleItem| match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => match var.decls[0].init.as_deref() {
                Some(Expr::Arrow(arrow)) => arrow.body.clone(),
                other => panic!("expected arrow, got {:?}", other),
            },
            other => panic!("expected declaration, got {:?}", other),
        };
        assert!(matches!(arrow_body(&program.body[0]), ArrowBody::Expr(_)));
        assert!(matches!(arrow_body(&program.body[1]), ArrowBody::Block(_)));
    }

    #[test]
    fn test_deep_nesting_is_rejected_before_parsing() {
        let depth = MAX_NESTING + 1;
        let text = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        let err = parse_tsx(&text).unwrap_err();
        assert_eq!(err.message, format!("nesting deeper than {} levels", MAX_NESTING));
        assert_eq!(err.line, 1);
        assert_eq!(err.offset, 4 + MAX_NESTING);

        let markup = format!("const el = {}{};", "<a>".repeat(depth), "</a>".repeat(depth));
        assert!(parse_tsx(&markup).unwrap_err().message.starts_with("nesting deeper"));
    }

    #[test]
    fn test_nesting_ignores_strings_comments_and_type_arguments() {
        let parens = "(".repeat(MAX_NESTING + 1);
        assert_eq!(excessive_nesting(&format!("const s = '{}';", parens)), None);
        assert_eq!(excessive_nesting(&format!("// {}\n/* {} */", parens, parens)), None);
        assert_eq!(excessive_nesting(&"let a: Array<string>;\n".repeat(200)), None);
        assert_eq!(excessive_nesting("<p>Don't {x}</p>"), None);

        let text = format!("f{}1{};", "(".repeat(32), ")".repeat(32));
        assert!(parse_tsx(&text).is_ok());
    }

    #[test]
    fn test_component_with_hooks_and_markup() {
        let program = parse_tsx(
            r#"
const App = () => {
  const [count, setCount] = React.useState(0);
  useEffect(() => {
    console.log('mounted');
  }, []);
  return (
    <View style={styles.container}>
      <Text onPress={() => setCount(count + 1)}>Count: {count}</Text>
    </View>
  );
};
export default App;
"#,
        )
        .unwrap();
        assert_eq!(program.body.len(), 2);
    }
}
