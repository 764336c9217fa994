//! One end-to-end run: settings in, highlighted code out

use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;

use super::{PipelineConfig, TransformEngine};
use crate::error::TransformFailure;
use crate::highlight::{tokenize, StyleMapper};
use crate::passes::{PassRegistry, RunContext, RunId};
use crate::settings::Settings;
use crate::source::SourceUnit;

/// Where the outcome of a run ends up. Exactly one of the two methods is
/// called per run.
pub trait OutputSink: Send {
    fn deliver_rendered(&mut self, rendered: &str);

    fn deliver_failure(&mut self, failure: &TransformFailure);
}

/// Writes rendered code to stdout and failures to stderr.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl OutputSink for TerminalSink {
    fn deliver_rendered(&mut self, rendered: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout
            .write_all(rendered.as_bytes())
            .and_then(|_| stdout.flush())
        {
            debug!("stdout closed: {}", err);
        }
    }

    fn deliver_failure(&mut self, failure: &TransformFailure) {
        eprintln!("Error: {}", failure);
    }
}

/// Keeps every delivered outcome in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rendered: Vec<String>,
    pub failures: Vec<TransformFailure>,
}

impl OutputSink for MemorySink {
    fn deliver_rendered(&mut self, rendered: &str) {
        self.rendered.push(rendered.to_string());
    }

    fn deliver_failure(&mut self, failure: &TransformFailure) {
        self.failures.push(failure.clone());
    }
}

/// Input of one orchestrated run.
#[derive(Debug, Clone)]
pub struct Request {
    /// Display name of the source (path, `<stdin>`, `<demo>`)
    pub name: String,
    pub text: String,
    pub settings: Settings,
    /// Fixed run id; a clock-based one is generated when absent
    pub run_id: Option<RunId>,
}

impl Request {
    pub fn new(name: impl Into<String>, text: impl Into<String>, settings: Settings) -> Self {
        Request {
            name: name.into(),
            text: text.into(),
            settings,
            run_id: None,
        }
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }
}

/// Builds the per-run values, runs the engine once and renders the result.
pub struct Orchestrator {
    engine: TransformEngine,
    registry: PassRegistry,
}

impl Orchestrator {
    pub fn new(engine: TransformEngine, registry: PassRegistry) -> Self {
        Orchestrator { engine, registry }
    }

    pub fn registry(&self) -> &PassRegistry {
        &self.registry
    }

    /// Run once and hand the outcome to `sink`. The same outcome is returned.
    pub async fn run(
        &self,
        request: Request,
        sink: &mut dyn OutputSink,
    ) -> Result<String, TransformFailure> {
        let result = self.execute(request).await;
        match &result {
            Ok(rendered) => sink.deliver_rendered(rendered),
            Err(failure) => sink.deliver_failure(failure),
        }
        result
    }

    async fn execute(&self, request: Request) -> Result<String, TransformFailure> {
        let Request {
            name,
            text,
            settings,
            run_id,
        } = request;

        // All configuration problems surface before anything is parsed.
        let config = PipelineConfig::from_settings(&settings, &self.registry)?;
        let mapper = StyleMapper::new(settings.highlight.theme()?);

        let run_id = run_id.unwrap_or_else(RunId::from_clock);
        debug!(run_id = %run_id, "run id assigned");
        let ctx = RunContext::new(run_id)
            .skip_env_checks(settings.transform.skip_env_checks)
            .env(settings.transform.resolved_env())
            .source_name(name.clone());
        let source = SourceUnit::new(name, text, config.dialect());

        let output = self.engine.run(source, Arc::new(config), ctx).await?;
        Ok(mapper.render(tokenize(&output.code)))
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Orchestrator::new(TransformEngine::new(), PassRegistry::with_builtins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::highlight::strip_markers;
    use crate::settings::{load_defaults, Loader};

    #[tokio::test]
    async fn test_renders_highlighted_code() {
        let request = Request::new("a.tsx", "const s = 'hi';", load_defaults().unwrap())
            .with_run_id(RunId::new("1"));
        let mut sink = MemorySink::default();
        let rendered = Orchestrator::default().run(request, &mut sink).await.unwrap();

        assert_eq!(sink.rendered, vec![rendered.clone()]);
        assert!(sink.failures.is_empty());
        assert_eq!(strip_markers(&rendered), "\"use strict\";\nconst s = 'hi';\n");
        assert!(rendered.len() > strip_markers(&rendered).len());
    }

    #[tokio::test]
    async fn test_config_failure_goes_to_sink() {
        let settings = Loader::new()
            .set_override("module.type", "amd")
            .unwrap()
            .build()
            .unwrap();
        let mut sink = MemorySink::default();
        let failure = Orchestrator::default()
            .run(Request::new("a.tsx", "a;", settings), &mut sink)
            .await
            .unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Config);
        assert!(sink.rendered.is_empty());
        assert_eq!(sink.failures, vec![failure]);
    }

    #[tokio::test]
    async fn test_plain_theme_when_highlighting_disabled() {
        let settings = Loader::new()
            .set_override("highlight.enabled", false)
            .unwrap()
            .build()
            .unwrap();
        let mut sink = MemorySink::default();
        let rendered = Orchestrator::default()
            .run(Request::new("a.tsx", "a;", settings), &mut sink)
            .await
            .unwrap();
        assert_eq!(rendered, "\"use strict\";\na;\n");
    }
}
