//! Parse, transform and generate

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::PipelineConfig;
use crate::codegen::{CodeGenerator, Emitter};
use crate::error::TransformFailure;
use crate::parsing::{ChumskyParser, SourceParser};
use crate::passes::RunContext;
use crate::source::SourceUnit;

/// Generated code of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
}

pub type TransformResult = Result<TransformOutput, TransformFailure>;

/// Drives one source unit through parsing, the configured passes and code
/// generation.
///
/// The engine holds no per-run state; the same engine (and the same
/// [`PipelineConfig`]) can serve any number of runs.
#[derive(Clone)]
pub struct TransformEngine {
    parser: Arc<dyn SourceParser>,
    generator: Arc<dyn CodeGenerator>,
}

impl TransformEngine {
    /// Engine using the built-in parser and emitter
    pub fn new() -> Self {
        Self::with_collaborators(Arc::new(ChumskyParser), Arc::new(Emitter))
    }

    /// Engine using custom parsing and generation collaborators
    pub fn with_collaborators(
        parser: Arc<dyn SourceParser>,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        TransformEngine { parser, generator }
    }

    /// Run the pipeline on a blocking worker thread.
    ///
    /// Awaiting the worker is the only suspension point. Dropping the future
    /// abandons the run; a panic inside the worker is re-raised here.
    pub async fn run(
        &self,
        source: SourceUnit,
        config: Arc<PipelineConfig>,
        ctx: RunContext,
    ) -> TransformResult {
        let engine = self.clone();
        let task = tokio::task::spawn_blocking(move || engine.transform(&source, &config, &ctx));
        match task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(TransformFailure::Cancelled),
        }
    }

    /// Run the pipeline on the current thread.
    pub fn transform(
        &self,
        source: &SourceUnit,
        config: &PipelineConfig,
        ctx: &RunContext,
    ) -> TransformResult {
        info!(
            source = source.name(),
            dialect = %config.dialect(),
            module = %config.module(),
            passes = config.passes().len(),
            run_id = %ctx.run_id,
            "transform started"
        );

        let result = self.execute(source, config, ctx);
        match &result {
            Ok(output) => info!(bytes = output.code.len(), "transform finished"),
            Err(failure) => warn!(kind = ?failure.kind(), "transform failed: {}", failure),
        }
        result
    }

    fn execute(
        &self,
        source: &SourceUnit,
        config: &PipelineConfig,
        ctx: &RunContext,
    ) -> TransformResult {
        let mut program = self.parser.parse(source.text(), config.dialect())?;
        debug!(items = program.body.len(), "parsed");

        for (index, pass) in config.passes().iter().enumerate() {
            debug!(index, name = pass.name(), "applying pass");
            program = pass
                .apply(program, ctx)
                .map_err(|cause| TransformFailure::Pass {
                    index,
                    name: pass.name().to_string(),
                    cause,
                })?;
        }

        let code = self
            .generator
            .generate(program, &config.generate_options())?;
        Ok(TransformOutput { code })
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}
