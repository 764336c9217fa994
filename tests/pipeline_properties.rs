//! Engine and orchestrator behavior: pass ordering, fail-fast, determinism and
//! the end-to-end scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tsx_refresh::ast::builders::{expr_stmt, str_lit};
use tsx_refresh::ast::{Expr, Lit, ModuleItem, Program, Stmt};
use tsx_refresh::codegen::ModuleFormat;
use tsx_refresh::error::{ParseDiagnostic, PassError, TransformFailure};
use tsx_refresh::highlight::{strip_markers, tokenize, StyleMapper, Theme, TokenClass};
use tsx_refresh::parsing::{ChumskyParser, SourceParser};
use tsx_refresh::passes::{Identity, Pass, PassAdapter, PassRegistry, RunContext, RunId};
use tsx_refresh::pipeline::{MemorySink, Orchestrator, PipelineConfig, Request, TransformEngine};
use tsx_refresh::settings::{Loader, PassSettings};
use tsx_refresh::{ConfigError, Dialect, FailureKind, SourceUnit};

fn ctx() -> RunContext {
    RunContext::new(RunId::new("1700000000000"))
}

fn last_marker(program: &Program) -> Option<&str> {
    match program.body.last()? {
        ModuleItem::Stmt(Stmt::Expr(expr)) => match expr.as_ref() {
            Expr::Lit(Lit::Str(s)) => Some(s.value.as_str()),
            _ => None,
        },
        _ => None,
    }
}

fn marker_pass(marker: &'static str, expect_before: Option<&'static str>) -> PassAdapter {
    PassAdapter::from_fn(marker, move |mut program: Program, _: &RunContext| {
        if last_marker(&program) != expect_before {
            return Err(PassError::new(format!("{} ran out of order", marker)));
        }
        program.body.push(ModuleItem::Stmt(expr_stmt(str_lit(marker))));
        Ok(program)
    })
}

/// Counts invocations and otherwise behaves like `identity`.
struct SpyPass {
    calls: Arc<AtomicUsize>,
}

impl Pass for SpyPass {
    fn name(&self) -> &str {
        "spy"
    }

    fn apply(&self, program: Program, _ctx: &RunContext) -> Result<Program, PassError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(program)
    }
}

/// Counts invocations and delegates to the built-in grammar.
struct SpyParser {
    calls: Arc<AtomicUsize>,
}

impl SourceParser for SpyParser {
    fn parse(&self, text: &str, dialect: Dialect) -> Result<Program, ParseDiagnostic> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ChumskyParser.parse(text, dialect)
    }
}

#[test]
fn test_passes_run_in_list_order() {
    let config = PipelineConfig::builder()
        .module(ModuleFormat::EsModule)
        .pass(marker_pass("A", None))
        .pass(marker_pass("B", Some("A")))
        .build();
    let source = SourceUnit::new("order.tsx", "let x = 1;", Dialect::tsx());
    let output = TransformEngine::new()
        .transform(&source, &config, &ctx())
        .unwrap();
    assert_eq!(output.code, "let x = 1;\n\"A\";\n\"B\";\n");
}

#[test]
fn test_failing_pass_stops_the_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = PipelineConfig::builder()
        .pass(PassAdapter::from_pass(Identity))
        .pass(PassAdapter::from_fn("broken", |_, _| Err(PassError::new("refused"))))
        .pass(PassAdapter::from_pass(SpyPass {
            calls: calls.clone(),
        }))
        .build();
    let source = SourceUnit::new("fail.tsx", "a;", Dialect::tsx());

    let failure = TransformEngine::new()
        .transform(&source, &config, &ctx())
        .unwrap_err();
    match failure {
        TransformFailure::Pass { index, name, cause } => {
            assert_eq!(index, 1);
            assert_eq!(name, "broken");
            assert_eq!(cause.message, "refused");
        }
        other => panic!("expected pass failure, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_identical_inputs_give_identical_code() {
    let registry = PassRegistry::with_builtins();
    let mut params = serde_json::Map::new();
    params.insert("skipEnvCheck".into(), true.into());
    let config = Arc::new(
        PipelineConfig::builder()
            .pass(registry.resolve("react-refresh", params).unwrap())
            .build(),
    );
    let text = include_str!("../demos/demo.tsx");
    let engine = TransformEngine::new();

    let first = engine
        .run(SourceUnit::new("demo.tsx", text, Dialect::tsx()), config.clone(), ctx())
        .await
        .unwrap();
    let second = engine
        .run(SourceUnit::new("demo.tsx", text, Dialect::tsx()), config, ctx())
        .await
        .unwrap();
    assert_eq!(first, second);
    assert!(first.code.contains("\"1700000000000:MyComponent\""));
}

#[test]
fn test_minimal_function_scenario() {
    let config = PipelineConfig::builder()
        .dialect(Dialect::tsx())
        .module(ModuleFormat::CommonJs)
        .pass(PassAdapter::from_pass(Identity))
        .build();
    let source = SourceUnit::new(
        "greet.tsx",
        "function greet(): string { return 'hello world'; }",
        Dialect::tsx(),
    );
    let code = TransformEngine::new()
        .transform(&source, &config, &ctx())
        .unwrap()
        .code;
    assert!(code.contains("'hello world'"));

    let rendered = StyleMapper::new(Theme::default()).render(tokenize(&code));
    assert!(!rendered.is_empty());
    assert!(rendered.len() >= code.len());
    assert_eq!(strip_markers(&rendered), code);
}

#[test]
fn test_unterminated_string_scenario() {
    let tokens: Vec<_> = tokenize("const s = 'abc").collect();
    let last = tokens.last().unwrap();
    assert_eq!(last.class, TokenClass::StringLiteral);
    assert_eq!(last.text, "'abc");
    assert_eq!(
        tokens
            .iter()
            .filter(|t| t.class == TokenClass::StringLiteral)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_config_error_happens_before_parsing() {
    let parser_calls = Arc::new(AtomicUsize::new(0));
    let pass_calls = Arc::new(AtomicUsize::new(0));

    let mut registry = PassRegistry::with_builtins();
    let spy_calls = pass_calls.clone();
    registry.register("spy", "Counts invocations", move |_| {
        Ok(Arc::new(SpyPass {
            calls: spy_calls.clone(),
        }) as Arc<dyn Pass>)
    });
    let engine = TransformEngine::with_collaborators(
        Arc::new(SpyParser {
            calls: parser_calls.clone(),
        }),
        Arc::new(tsx_refresh::codegen::Emitter),
    );
    let orchestrator = Orchestrator::new(engine, registry);

    let mut settings = Loader::new()
        .set_override("parser.syntax", "coffeescript")
        .unwrap()
        .build()
        .unwrap();
    settings.passes = vec![PassSettings {
        name: "spy".into(),
        options: Default::default(),
    }];

    let mut sink = MemorySink::default();
    let failure = orchestrator
        .run(Request::new("a.tsx", "a;", settings.clone()), &mut sink)
        .await
        .unwrap_err();
    assert_eq!(
        failure,
        TransformFailure::Config(ConfigError::UnknownSyntax("coffeescript".into()))
    );
    assert_eq!(sink.failures.len(), 1);
    assert!(sink.rendered.is_empty());
    assert_eq!(parser_calls.load(Ordering::SeqCst), 0);
    assert_eq!(pass_calls.load(Ordering::SeqCst), 0);

    // with a valid dialect both spies run exactly once
    settings.parser.syntax = "typescript".into();
    orchestrator
        .run(Request::new("a.tsx", "a;", settings), &mut sink)
        .await
        .unwrap();
    assert_eq!(parser_calls.load(Ordering::SeqCst), 1);
    assert_eq!(pass_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_parse_error_reaches_sink_with_position() {
    let settings = Loader::new().build().unwrap();
    let mut sink = MemorySink::default();
    let failure = Orchestrator::default()
        .run(
            Request::new("broken.tsx", "const a = 1;\nconst b = ;\n", settings),
            &mut sink,
        )
        .await
        .unwrap_err();
    assert_eq!(failure.kind(), FailureKind::Parse);
    let TransformFailure::Parse(diagnostic) = &failure else {
        panic!("expected parse failure");
    };
    assert_eq!(diagnostic.line, 2);
    assert_eq!(sink.failures, vec![failure.clone()]);
}
