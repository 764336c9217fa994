//! Source units and parser dialects

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Base language the parser expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    EcmaScript,
    TypeScript,
}

impl Syntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::EcmaScript => "ecmascript",
            Syntax::TypeScript => "typescript",
        }
    }

    /// Name of the markup flag in this syntax's option shape (`jsx` or `tsx`).
    pub fn markup_flag(&self) -> &'static str {
        match self {
            Syntax::EcmaScript => "jsx",
            Syntax::TypeScript => "tsx",
        }
    }
}

impl FromStr for Syntax {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecmascript" | "es" | "javascript" => Ok(Syntax::EcmaScript),
            "typescript" | "ts" => Ok(Syntax::TypeScript),
            other => Err(ConfigError::UnknownSyntax(other.to_string())),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base language plus the markup (JSX) extension switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    pub syntax: Syntax,
    pub markup: bool,
}

impl Dialect {
    pub fn new(syntax: Syntax, markup: bool) -> Self {
        Dialect { syntax, markup }
    }

    /// TypeScript with JSX.
    pub fn tsx() -> Self {
        Dialect::new(Syntax::TypeScript, true)
    }

    /// Plain JavaScript with JSX.
    pub fn jsx() -> Self {
        Dialect::new(Syntax::EcmaScript, true)
    }

    pub fn is_typescript(&self) -> bool {
        self.syntax == Syntax::TypeScript
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::tsx()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.markup {
            write!(f, "{}+{}", self.syntax, self.syntax.markup_flag())
        } else {
            write!(f, "{}", self.syntax)
        }
    }
}

/// Raw source text with the dialect it is written in.
///
/// Immutable once built; the engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    name: String,
    text: String,
    dialect: Dialect,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, text: impl Into<String>, dialect: Dialect) -> Self {
        SourceUnit {
            name: name.into(),
            text: text.into(),
            dialect,
        }
    }

    /// Display name (file path, `<stdin>`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_from_str() {
        assert_eq!("typescript".parse::<Syntax>().unwrap(), Syntax::TypeScript);
        assert_eq!("ecmascript".parse::<Syntax>().unwrap(), Syntax::EcmaScript);
        assert_eq!(
            "flow".parse::<Syntax>().unwrap_err(),
            ConfigError::UnknownSyntax("flow".into())
        );
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::tsx().to_string(), "typescript+tsx");
        assert_eq!(
            Dialect::new(Syntax::EcmaScript, false).to_string(),
            "ecmascript"
        );
    }

    #[test]
    fn test_source_unit_accessors() {
        let unit = SourceUnit::new("demo.tsx", "const a = 1;", Dialect::tsx());
        assert_eq!(unit.name(), "demo.tsx");
        assert_eq!(unit.text(), "const a = 1;");
        assert!(unit.dialect().is_typescript());
    }
}
