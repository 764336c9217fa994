//! # tsx-refresh
//!
//! A TSX transform pipeline: source text is parsed into a [`ast::Program`],
//! rewritten by an ordered list of passes, emitted as CommonJS or ES module
//! JavaScript and finally highlighted for the terminal.
//!
//! ## Layout
//!
//! - [`source`]: source units and dialects
//! - [`parsing`]: the [`parsing::SourceParser`] seam and the built-in grammar
//! - [`ast`]: the program tree with fold/visit traversals
//! - [`passes`]: the [`passes::Pass`] trait, adapters, the registry and the
//!   built-in `identity` and `react-refresh` passes
//! - [`codegen`]: the [`codegen::CodeGenerator`] seam and the built-in emitter
//! - [`pipeline`]: configuration, the engine and the orchestrator
//! - [`highlight`]: token classification and terminal styling
//! - [`settings`]: layered TOML settings
//! - [`error`]: the failure taxonomy

pub mod ast;
pub mod codegen;
pub mod error;
pub mod highlight;
pub mod parsing;
pub mod passes;
pub mod pipeline;
pub mod settings;
pub mod source;

pub use error::{ConfigError, FailureKind, TransformFailure};
pub use pipeline::{Orchestrator, PipelineConfig, Request, TransformEngine};
pub use settings::{Loader, Settings};
pub use source::{Dialect, SourceUnit, Syntax};
