//! Error taxonomy for the transform pipeline
//!
//! Every failure a run can produce is one of four kinds, surfaced to the caller
//! through [`TransformFailure`]:
//!
//! - [`ConfigError`]: the pipeline could not be configured (unknown dialect,
//!   module format or pass, bad pass options). Raised before any parsing.
//! - [`ParseDiagnostic`]: the source text is malformed for the selected dialect.
//! - [`PassError`]: a transform pass rejected the program. The failure records
//!   which pass (index and name) failed.
//! - [`GenerationDiagnostic`]: the final program could not be emitted.
//!
//! Tokenization and rendering never fail, so they have no error type.

use thiserror::Error;

/// Errors raised while turning settings into a runnable pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown syntax '{0}' (expected 'ecmascript' or 'typescript')")]
    UnknownSyntax(String),

    #[error("unknown module type '{0}' (expected 'commonjs' or 'esmodule')")]
    UnknownModuleFormat(String),

    #[error("unknown jsx mode '{0}' (expected 'classic' or 'preserve')")]
    UnknownJsxMode(String),

    #[error("'{flag}' is not a markup flag for {syntax} syntax (use '{expected}')")]
    MarkupFlagMismatch {
        flag: String,
        syntax: String,
        expected: String,
    },

    #[error("pass '{0}' is not registered")]
    UnknownPass(String),

    #[error("invalid options for pass '{pass}': {message}")]
    InvalidPassOptions { pass: String, message: String },

    #[error("invalid highlight style for '{class}': {message}")]
    InvalidStyle { class: String, message: String },

    #[error("failed to load settings: {0}")]
    Settings(String),
}

/// A parse failure with the position it was detected at.
///
/// Lines and columns are 1-based; `offset` is the character offset into the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseDiagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// The cause reported by a failing pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PassError {
    pub message: String,
}

impl PassError {
    pub fn new(message: impl Into<String>) -> Self {
        PassError {
            message: message.into(),
        }
    }
}

/// A code generation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationDiagnostic {
    pub message: String,
}

impl GenerationDiagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        GenerationDiagnostic {
            message: message.into(),
        }
    }
}

/// The terminal outcome of a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformFailure {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("parse error at {0}")]
    Parse(#[from] ParseDiagnostic),

    #[error("pass #{index} '{name}' failed: {cause}")]
    Pass {
        index: usize,
        name: String,
        #[source]
        cause: PassError,
    },

    #[error("generation error: {0}")]
    Generation(#[from] GenerationDiagnostic),

    /// The blocking transform task was torn down before it produced a result.
    #[error("transform was cancelled before completion")]
    Cancelled,
}

/// Discriminant of [`TransformFailure`], convenient for matching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Config,
    Parse,
    Pass,
    Generation,
    Cancelled,
}

impl TransformFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransformFailure::Config(_) => FailureKind::Config,
            TransformFailure::Parse(_) => FailureKind::Parse,
            TransformFailure::Pass { .. } => FailureKind::Pass,
            TransformFailure::Generation(_) => FailureKind::Generation,
            TransformFailure::Cancelled => FailureKind::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownSyntax("coffeescript".into());
        assert_eq!(
            err.to_string(),
            "unknown syntax 'coffeescript' (expected 'ecmascript' or 'typescript')"
        );

        let err = ConfigError::UnknownPass("minify".into());
        assert_eq!(err.to_string(), "pass 'minify' is not registered");
    }

    #[test]
    fn test_parse_failure_display_includes_position() {
        let failure = TransformFailure::from(ParseDiagnostic {
            message: "unexpected '}'".into(),
            line: 3,
            column: 7,
            offset: 40,
        });
        assert_eq!(failure.to_string(), "parse error at 3:7: unexpected '}'");
        assert_eq!(failure.kind(), FailureKind::Parse);
    }

    #[test]
    fn test_pass_failure_names_index_and_pass() {
        let failure = TransformFailure::Pass {
            index: 1,
            name: "react-refresh".into(),
            cause: PassError::new("boom"),
        };
        assert_eq!(failure.to_string(), "pass #1 'react-refresh' failed: boom");
        assert_eq!(failure.kind(), FailureKind::Pass);
    }

    #[test]
    fn test_config_error_converts_into_failure() {
        let failure: TransformFailure = ConfigError::UnknownModuleFormat("amd".into()).into();
        assert_eq!(failure.kind(), FailureKind::Config);
    }
}
