//! Run-scoped values handed to every pass

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        RunId(id.into())
    }

    /// Wall-clock time in milliseconds since the Unix epoch.
    pub fn from_clock() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        RunId(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: RunId,
    /// Disables environment guards in passes that have them.
    pub skip_env_checks: bool,
    /// Deployment environment, e.g. `development`.
    pub env: Option<String>,
    pub source_name: String,
}

impl RunContext {
    pub fn new(run_id: RunId) -> Self {
        RunContext {
            run_id,
            skip_env_checks: false,
            env: None,
            source_name: String::new(),
        }
    }

    pub fn skip_env_checks(mut self, skip: bool) -> Self {
        self.skip_env_checks = skip;
        self
    }

    pub fn env(mut self, env: Option<String>) -> Self {
        self.env = env;
        self
    }

    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn is_development(&self) -> bool {
        self.env.as_deref() == Some("development")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_run_id_is_decimal_millis() {
        let id = RunId::from_clock();
        assert!(id.as_str().chars().all(|c| c.is_ascii_digit()));
        assert!(id.as_str().len() >= 13);
    }

    #[test]
    fn test_context_builders() {
        let ctx = RunContext::new(RunId::new("7"))
            .env(Some("development".into()))
            .source_name("App.tsx");
        assert!(ctx.is_development());
        assert!(!ctx.skip_env_checks);
        assert_eq!(ctx.source_name, "App.tsx");
        assert_eq!(ctx.run_id.to_string(), "7");
    }
}
