//! Transform pipeline
//!
//! - [`PipelineConfig`]: what one run does (dialect, passes, output shape)
//! - [`TransformEngine`]: parse, apply passes in order, generate code
//! - [`Orchestrator`]: one end-to-end run from settings to highlighted output

pub mod config;
pub mod engine;
pub mod orchestrator;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use engine::{TransformEngine, TransformOutput, TransformResult};
pub use orchestrator::{MemorySink, Orchestrator, OutputSink, Request, TerminalSink};
