//! Layered settings loading
//!
//! `defaults/tsx-refresh.default.toml` is embedded into the binary so that the
//! documented defaults and runtime behavior stay in sync. Callers layer user
//! files and command-line overrides on top via [`Loader`] before deserializing
//! into [`Settings`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::codegen::{JsxMode, ModuleFormat};
use crate::error::ConfigError;
use crate::highlight::{StyleSpec, Theme};
use crate::passes::PassParams;
use crate::source::{Dialect, Syntax};

const DEFAULT_TOML: &str = include_str!("../defaults/tsx-refresh.default.toml");

/// Top-level settings consumed by the orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub parser: ParserSettings,
    pub module: ModuleSettings,
    pub transform: TransformSettings,
    #[serde(default)]
    pub passes: Vec<PassSettings>,
    pub highlight: HighlightSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserSettings {
    pub syntax: String,
    #[serde(default)]
    pub markup: Option<bool>,
    /// Markup flag as spelled for ecmascript.
    #[serde(default)]
    pub jsx: Option<bool>,
    /// Markup flag as spelled for typescript.
    #[serde(default)]
    pub tsx: Option<bool>,
}

impl ParserSettings {
    /// Resolves the dialect. The syntax-specific flag (`tsx`/`jsx`) wins over
    /// `markup`; using the other syntax's flag is an error.
    pub fn dialect(&self) -> Result<Dialect, ConfigError> {
        let syntax: Syntax = self.syntax.parse()?;
        let (own, foreign, foreign_name) = match syntax {
            Syntax::EcmaScript => (self.jsx, self.tsx, "tsx"),
            Syntax::TypeScript => (self.tsx, self.jsx, "jsx"),
        };
        if foreign.is_some() {
            return Err(ConfigError::MarkupFlagMismatch {
                flag: foreign_name.to_string(),
                syntax: syntax.to_string(),
                expected: syntax.markup_flag().to_string(),
            });
        }
        let markup = own.or(self.markup).unwrap_or(false);
        Ok(Dialect::new(syntax, markup))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSettings {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ModuleSettings {
    pub fn format(&self) -> Result<ModuleFormat, ConfigError> {
        self.kind.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformSettings {
    pub external_helpers: bool,
    pub helpers_module: String,
    pub jsx: String,
    pub jsx_pragma: String,
    pub jsx_pragma_frag: String,
    pub skip_env_checks: bool,
    #[serde(default)]
    pub env: Option<String>,
}

impl TransformSettings {
    pub fn jsx_mode(&self) -> Result<JsxMode, ConfigError> {
        match self.jsx.as_str() {
            "classic" => Ok(JsxMode::Classic {
                pragma: self.jsx_pragma.clone(),
                pragma_frag: self.jsx_pragma_frag.clone(),
            }),
            "preserve" => Ok(JsxMode::Preserve),
            other => Err(ConfigError::UnknownJsxMode(other.to_string())),
        }
    }

    /// The configured environment, falling back to `$NODE_ENV`.
    pub fn resolved_env(&self) -> Option<String> {
        self.env
            .clone()
            .or_else(|| std::env::var("NODE_ENV").ok())
            .filter(|env| !env.is_empty())
    }
}

/// One configured pass and its options.
#[derive(Debug, Clone, Deserialize)]
pub struct PassSettings {
    pub name: String,
    #[serde(default)]
    pub options: PassParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightSettings {
    pub enabled: bool,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleSpec>,
}

impl HighlightSettings {
    pub fn theme(&self) -> Result<Theme, ConfigError> {
        if self.enabled {
            Theme::from_specs(&self.styles)
        } else {
            Ok(Theme::plain())
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a settings file. Missing files trigger an error at build time.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional settings file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command-line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| ConfigError::Settings(e.to_string()))?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| ConfigError::Settings(e.to_string()))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}
