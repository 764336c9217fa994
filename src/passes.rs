//! Transform passes
//!
//! A pass takes the whole [`Program`] by value and hands back the (possibly
//! rewritten) program, so it cannot hold on to the tree after it returns.
//! Passes are resolved by name through a [`PassRegistry`] and wrapped, together
//! with their options, in a [`PassAdapter`]; the engine only ever sees adapters.
//!
//! Built-in passes:
//!
//! - `identity`: returns the program unchanged
//! - `react-refresh`: registers components with the fast-refresh runtime

mod adapter;
mod context;
mod identity;
pub mod react_refresh;
mod registry;

pub use adapter::PassAdapter;
pub use context::{RunContext, RunId};
pub use identity::Identity;
pub use react_refresh::ReactRefresh;
pub use registry::{PassFactory, PassRegistry};

use crate::ast::Program;
use crate::error::PassError;

/// Option name to value, as written in settings.
pub type PassParams = serde_json::Map<String, serde_json::Value>;

/// One transform step over the whole program.
pub trait Pass: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, program: Program, ctx: &RunContext) -> Result<Program, PassError>;
}
