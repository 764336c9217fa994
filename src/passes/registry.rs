//! Name-to-factory registry used to resolve configured passes

use std::collections::BTreeMap;
use std::sync::Arc;

use super::react_refresh::ReactRefreshOptions;
use super::{Identity, Pass, PassAdapter, PassParams, ReactRefresh};
use crate::error::ConfigError;

/// Builds a pass from its options, rejecting options it cannot use.
pub type PassFactory = Arc<dyn Fn(&PassParams) -> Result<Arc<dyn Pass>, ConfigError> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    description: String,
    factory: PassFactory,
}

/// Registry of known passes
#[derive(Clone, Default)]
pub struct PassRegistry {
    entries: BTreeMap<String, Entry>,
}

impl PassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        PassRegistry {
            entries: BTreeMap::new(),
        }
    }

    /// Create registry with the built-in passes
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(
            "identity",
            "Returns the program unchanged",
            |params: &PassParams| {
                if let Some(key) = params.keys().next() {
                    return Err(ConfigError::InvalidPassOptions {
                        pass: "identity".into(),
                        message: format!("unexpected option '{}'", key),
                    });
                }
                Ok(Arc::new(Identity) as Arc<dyn Pass>)
            },
        );

        registry.register(
            "react-refresh",
            "Registers components with the fast-refresh runtime",
            |params: &PassParams| {
                let options = ReactRefreshOptions::from_params(params)?;
                Ok(Arc::new(ReactRefresh::new(options)) as Arc<dyn Pass>)
            },
        );

        registry
    }

    /// Register a pass factory, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: &str, description: &str, factory: F)
    where
        F: Fn(&PassParams) -> Result<Arc<dyn Pass>, ConfigError> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Entry {
                description: description.to_string(),
                factory: Arc::new(factory),
            },
        );
    }

    /// Build an adapter for a registered pass
    pub fn resolve(&self, name: &str, params: PassParams) -> Result<PassAdapter, ConfigError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPass(name.to_string()))?;
        let pass = (entry.factory)(&params)?;
        Ok(PassAdapter::new(name, params, pass))
    }

    /// Check if a pass is registered
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// List registered passes as (name, description), sorted by name
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> PassParams {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_builtins_are_listed() {
        let registry = PassRegistry::with_builtins();
        let names: Vec<&str> = registry.list().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["identity", "react-refresh"]);
        assert!(registry.has("react-refresh"));
        assert!(!registry.has("minify"));
    }

    #[test]
    fn test_resolve_keeps_params() {
        let registry = PassRegistry::with_builtins();
        let adapter = registry
            .resolve("react-refresh", params(json!({ "moduleId": "m1" })))
            .unwrap();
        assert_eq!(adapter.name(), "react-refresh");
        assert_eq!(adapter.params()["moduleId"], json!("m1"));
    }

    #[test]
    fn test_resolve_errors() {
        let registry = PassRegistry::with_builtins();
        assert_eq!(
            registry.resolve("minify", PassParams::new()).unwrap_err(),
            ConfigError::UnknownPass("minify".into())
        );
        assert!(matches!(
            registry.resolve("identity", params(json!({ "x": 1 }))),
            Err(ConfigError::InvalidPassOptions { .. })
        ));
        assert!(matches!(
            registry.resolve("react-refresh", params(json!({ "skipEnvCheck": "yes" }))),
            Err(ConfigError::InvalidPassOptions { .. })
        ));
    }
}
