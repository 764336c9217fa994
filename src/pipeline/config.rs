//! Per-run pipeline configuration

use crate::codegen::{GenerateOptions, JsxMode, ModuleFormat, DEFAULT_HELPERS_MODULE};
use crate::error::ConfigError;
use crate::passes::{PassAdapter, PassRegistry};
use crate::settings::Settings;
use crate::source::Dialect;

/// Everything the engine needs to know about one run, fixed once built.
///
/// Passes run in list order, each one receiving the program left by the
/// previous pass.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    dialect: Dialect,
    module: ModuleFormat,
    passes: Vec<PassAdapter>,
    external_helpers: bool,
    jsx: JsxMode,
    helpers_module: String,
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Resolve settings into a config. Every pass is looked up (and its
    /// options validated) here, so a bad pass never reaches the parser.
    pub fn from_settings(
        settings: &Settings,
        registry: &PassRegistry,
    ) -> Result<Self, ConfigError> {
        let passes = settings
            .passes
            .iter()
            .map(|pass| registry.resolve(&pass.name, pass.options.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PipelineConfig::builder()
            .dialect(settings.parser.dialect()?)
            .module(settings.module.format()?)
            .jsx(settings.transform.jsx_mode()?)
            .external_helpers(settings.transform.external_helpers)
            .helpers_module(settings.transform.helpers_module.clone())
            .passes(passes)
            .build())
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn module(&self) -> ModuleFormat {
        self.module
    }

    pub fn passes(&self) -> &[PassAdapter] {
        &self.passes
    }

    pub fn external_helpers(&self) -> bool {
        self.external_helpers
    }

    pub fn jsx(&self) -> &JsxMode {
        &self.jsx
    }

    pub fn helpers_module(&self) -> &str {
        &self.helpers_module
    }

    /// Options handed to the code generator.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            module: self.module,
            jsx: self.jsx.clone(),
            external_helpers: self.external_helpers,
            helpers_module: self.helpers_module.clone(),
        }
    }
}

/// Builder for [`PipelineConfig`]. Unset fields take the same defaults as the
/// embedded settings file.
#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    dialect: Dialect,
    module: ModuleFormat,
    passes: Vec<PassAdapter>,
    external_helpers: bool,
    jsx: JsxMode,
    helpers_module: String,
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        PipelineConfigBuilder {
            dialect: Dialect::default(),
            module: ModuleFormat::default(),
            passes: Vec::new(),
            external_helpers: true,
            jsx: JsxMode::default(),
            helpers_module: DEFAULT_HELPERS_MODULE.to_string(),
        }
    }
}

impl PipelineConfigBuilder {
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn module(mut self, module: ModuleFormat) -> Self {
        self.module = module;
        self
    }

    /// Append one pass.
    pub fn pass(mut self, pass: PassAdapter) -> Self {
        self.passes.push(pass);
        self
    }

    /// Append several passes, keeping their order.
    pub fn passes(mut self, passes: impl IntoIterator<Item = PassAdapter>) -> Self {
        self.passes.extend(passes);
        self
    }

    pub fn external_helpers(mut self, external: bool) -> Self {
        self.external_helpers = external;
        self
    }

    pub fn jsx(mut self, jsx: JsxMode) -> Self {
        self.jsx = jsx;
        self
    }

    pub fn helpers_module(mut self, module: impl Into<String>) -> Self {
        self.helpers_module = module.into();
        self
    }

    pub fn build(self) -> PipelineConfig {
        PipelineConfig {
            dialect: self.dialect,
            module: self.module,
            passes: self.passes,
            external_helpers: self.external_helpers,
            jsx: self.jsx,
            helpers_module: self.helpers_module,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::Identity;
    use crate::settings::{load_defaults, Loader, PassSettings};
    use crate::source::Syntax;

    #[test]
    fn test_builder_defaults() {
        let config = PipelineConfig::builder().build();
        assert_eq!(config.dialect(), Dialect::tsx());
        assert_eq!(config.module(), ModuleFormat::CommonJs);
        assert!(config.passes().is_empty());
        assert_eq!(config.generate_options(), GenerateOptions::default());
    }

    #[test]
    fn test_builder_keeps_pass_order() {
        let config = PipelineConfig::builder()
            .pass(PassAdapter::from_fn("a", |p, _| Ok(p)))
            .passes([PassAdapter::from_pass(Identity), PassAdapter::from_fn("b", |p, _| Ok(p))])
            .build();
        let names: Vec<&str> = config.passes().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "identity", "b"]);
    }

    #[test]
    fn test_from_default_settings() {
        let settings = load_defaults().unwrap();
        let config = PipelineConfig::from_settings(&settings, &PassRegistry::with_builtins())
            .unwrap();
        assert_eq!(config.passes().len(), 1);
        assert_eq!(config.passes()[0].name(), "react-refresh");
        assert_eq!(
            config.passes()[0].params().get("skipEnvCheck"),
            Some(&serde_json::Value::Bool(true))
        );
        assert!(config.external_helpers());
        assert_eq!(config.helpers_module(), "@swc/helpers");
    }

    #[test]
    fn test_from_settings_rejects_unknown_pass() {
        let mut settings = load_defaults().unwrap();
        settings.passes.push(PassSettings {
            name: "minify".into(),
            options: Default::default(),
        });
        let err = PipelineConfig::from_settings(&settings, &PassRegistry::with_builtins())
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownPass("minify".into()));
    }

    #[test]
    fn test_from_settings_rejects_bad_dialect() {
        let settings = Loader::new()
            .set_override("parser.syntax", "flow")
            .unwrap()
            .build()
            .unwrap();
        let err = PipelineConfig::from_settings(&settings, &PassRegistry::with_builtins())
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownSyntax("flow".into()));

        let settings = Loader::new()
            .set_override("parser.syntax", "ecmascript")
            .unwrap()
            .build()
            .unwrap();
        let config = PipelineConfig::from_settings(&settings, &PassRegistry::with_builtins())
            .unwrap();
        assert_eq!(config.dialect(), Dialect::new(Syntax::EcmaScript, true));
    }
}
