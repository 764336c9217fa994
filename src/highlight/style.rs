//! Display styles for token classes
//!
//! A [`Style`] is just the text written before and after a token. Styles are
//! built from [`StyleSpec`] values by rendering crossterm style commands to their
//! ANSI escape text, so nothing here touches the terminal.

use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use crossterm::Command;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::classifier::{Token, TokenClass};
use crate::error::ConfigError;

/// Begin and end markers wrapped around a token's text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style {
    pub begin: String,
    pub end: String,
}

impl Style {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Style {
            begin: begin.into(),
            end: end.into(),
        }
    }

    pub fn plain() -> Self {
        Style::default()
    }
}

/// Declarative style, as written in settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct StyleSpec {
    /// Color name (`blue`, `dark_grey`, ...) or `#rrggbb`.
    pub fg: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub dim: bool,
}

impl StyleSpec {
    pub fn fg(color: &str) -> Self {
        StyleSpec {
            fg: Some(color.to_string()),
            ..StyleSpec::default()
        }
    }

    /// Renders the spec to escape text. Specs with no effect render as plain.
    pub fn to_style(&self, class: &str) -> Result<Style, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidStyle {
            class: class.to_string(),
            message,
        };
        let color = match &self.fg {
            Some(name) => {
                Some(parse_color(name).ok_or_else(|| invalid(format!("unknown color '{}'", name)))?)
            }
            None => None,
        };
        self.escape_text(color).map_err(|e| invalid(e.to_string()))
    }

    fn escape_text(&self, color: Option<Color>) -> Result<Style, std::fmt::Error> {
        let mut begin = String::new();
        if let Some(color) = color {
            SetForegroundColor(color).write_ansi(&mut begin)?;
        }
        for (enabled, attribute) in [
            (self.bold, Attribute::Bold),
            (self.italic, Attribute::Italic),
            (self.dim, Attribute::Dim),
        ] {
            if enabled {
                SetAttribute(attribute).write_ansi(&mut begin)?;
            }
        }
        if begin.is_empty() {
            return Ok(Style::plain());
        }
        let mut end = String::new();
        SetAttribute(Attribute::Reset).write_ansi(&mut end)?;
        Ok(Style::new(begin, end))
    }
}

fn parse_color(name: &str) -> Option<Color> {
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }
    let color = match name.to_ascii_lowercase().replace('-', "_").as_str() {
        "black" => Color::Black,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        _ => return None,
    };
    Some(color)
}

/// Token class to style, with a fallback for unmapped classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    styles: HashMap<TokenClass, Style>,
    fallback: Style,
}

impl Theme {
    /// A theme whose markers are all empty.
    pub fn plain() -> Self {
        Theme {
            styles: HashMap::new(),
            fallback: Style::plain(),
        }
    }

    pub fn with_style(mut self, class: TokenClass, style: Style) -> Self {
        self.styles.insert(class, style);
        self
    }

    /// Builds a theme from configured specs layered over the default palette.
    /// Keys are class names (`keyword`, `string`, ...).
    pub fn from_specs(specs: &BTreeMap<String, StyleSpec>) -> Result<Self, ConfigError> {
        let mut theme = Theme::default();
        for (name, spec) in specs {
            let class = TokenClass::from_name(name).ok_or_else(|| ConfigError::InvalidStyle {
                class: name.clone(),
                message: "not a token class".to_string(),
            })?;
            theme.styles.insert(class, spec.to_style(name)?);
        }
        Ok(theme)
    }

    pub fn style(&self, class: TokenClass) -> &Style {
        self.styles.get(&class).unwrap_or(&self.fallback)
    }
}

impl Default for Theme {
    fn default() -> Self {
        let palette = [
            (TokenClass::Keyword, StyleSpec::fg("blue")),
            (TokenClass::StringLiteral, StyleSpec::fg("green")),
            (
                TokenClass::Comment,
                StyleSpec {
                    fg: Some("dark_grey".to_string()),
                    italic: true,
                    ..StyleSpec::default()
                },
            ),
            (TokenClass::Identifier, StyleSpec::default()),
            (TokenClass::Punctuation, StyleSpec::fg("dark_cyan")),
        ];
        let mut theme = Theme::plain();
        for (class, spec) in palette {
            // built-in palette names are known colors
            if let Ok(style) = spec.to_style(class.name()) {
                theme.styles.insert(class, style);
            }
        }
        theme
    }
}

/// Concatenates styled token fragments into one displayable string.
#[derive(Debug, Clone)]
pub struct StyleMapper {
    theme: Theme,
}

impl StyleMapper {
    pub fn new(theme: Theme) -> Self {
        StyleMapper { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Wraps every token in its class markers, in order, without merging
    /// neighbours of the same class.
    pub fn render<'a>(&self, tokens: impl IntoIterator<Item = Token<'a>>) -> String {
        let mut out = String::new();
        for token in tokens {
            let style = self.theme.style(token.class);
            out.push_str(&style.begin);
            out.push_str(token.text);
            out.push_str(&style.end);
        }
        out
    }
}

static SGR_SEQUENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;:]*m").unwrap());

/// Removes ANSI SGR escape sequences from rendered output.
pub fn strip_markers(rendered: &str) -> String {
    SGR_SEQUENCE.replace_all(rendered, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::tokenize;

    #[test]
    fn test_style_renders_escape_text() {
        let style = StyleSpec::fg("blue").to_style("keyword").unwrap();
        assert!(style.begin.starts_with("\x1b["));
        assert_eq!(style.end, "\x1b[0m");
        assert_eq!(StyleSpec::default().to_style("plain").unwrap(), Style::plain());
    }

    #[test]
    fn test_hex_and_unknown_colors() {
        assert_eq!(
            parse_color("#ff8000"),
            Some(Color::Rgb {
                r: 255,
                g: 128,
                b: 0
            })
        );
        assert_eq!(parse_color("#ff80"), None);
        let err = StyleSpec::fg("chartreuse").to_style("keyword").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStyle { class, .. } if class == "keyword"));
    }

    #[test]
    fn test_render_wraps_each_token() {
        let theme = Theme::plain().with_style(TokenClass::Keyword, Style::new("<k>", "</k>"));
        let mapper = StyleMapper::new(theme);
        assert_eq!(mapper.render(tokenize("const x")), "<k>const</k> x");
    }

    #[test]
    fn test_strip_markers_restores_code() {
        let code = "const a = 'x'; // note\n";
        let rendered = StyleMapper::new(Theme::default()).render(tokenize(code));
        assert!(rendered.len() > code.len());
        assert_eq!(strip_markers(&rendered), code);
    }

    #[test]
    fn test_from_specs_rejects_unknown_class() {
        let mut specs = BTreeMap::new();
        specs.insert("number".to_string(), StyleSpec::fg("red"));
        assert!(Theme::from_specs(&specs).is_err());
    }
}
