use super::{Pass, RunContext};
use crate::ast::Program;
use crate::error::PassError;

/// Returns the program unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Pass for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(&self, program: Program, _ctx: &RunContext) -> Result<Program, PassError> {
        Ok(program)
    }
}
