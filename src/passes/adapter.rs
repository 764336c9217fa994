//! Uniform wrapper around a resolved pass and its options

use std::fmt;
use std::sync::Arc;

use super::{Pass, PassParams, RunContext};
use crate::ast::Program;
use crate::error::PassError;

/// A pass bound to its parameter bag.
///
/// Adapters are cheap to clone and share nothing mutable, so one
/// `PipelineConfig` can be used by concurrent runs.
#[derive(Clone)]
pub struct PassAdapter {
    name: String,
    params: PassParams,
    pass: Arc<dyn Pass>,
}

impl PassAdapter {
    pub fn new(name: impl Into<String>, params: PassParams, pass: Arc<dyn Pass>) -> Self {
        PassAdapter {
            name: name.into(),
            params,
            pass,
        }
    }

    /// Wraps an in-process pass with no options.
    pub fn from_pass<P: Pass + 'static>(pass: P) -> Self {
        let name = pass.name().to_string();
        PassAdapter::new(name, PassParams::new(), Arc::new(pass))
    }

    /// Wraps a closure as a pass.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Program, &RunContext) -> Result<Program, PassError> + Send + Sync + 'static,
    {
        let name = name.into();
        let pass = FnPass {
            name: name.clone(),
            f,
        };
        PassAdapter::new(name, PassParams::new(), Arc::new(pass))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &PassParams {
        &self.params
    }

    pub fn apply(&self, program: Program, ctx: &RunContext) -> Result<Program, PassError> {
        self.pass.apply(program, ctx)
    }
}

impl fmt::Debug for PassAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassAdapter")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

struct FnPass<F> {
    name: String,
    f: F,
}

impl<F> Pass for FnPass<F>
where
    F: Fn(Program, &RunContext) -> Result<Program, PassError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, program: Program, ctx: &RunContext) -> Result<Program, PassError> {
        (self.f)(program, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{Identity, RunId};

    #[test]
    fn test_from_pass_takes_the_pass_name() {
        let adapter = PassAdapter::from_pass(Identity);
        assert_eq!(adapter.name(), "identity");
        assert!(adapter.params().is_empty());
    }

    #[test]
    fn test_from_fn_runs_the_closure() {
        let adapter = PassAdapter::from_fn("reject", |_, ctx| {
            Err(PassError::new(format!("run {}", ctx.run_id)))
        });
        let err = adapter
            .apply(Program::default(), &RunContext::new(RunId::new("42")))
            .unwrap_err();
        assert_eq!(err.message, "run 42");
        assert!(format!("{:?}", adapter).contains("reject"));
    }
}
