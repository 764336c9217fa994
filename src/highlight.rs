//! Syntax-aware terminal highlighting
//!
//! Highlighting is two pure steps: [`tokenize`] splits code into classified
//! tokens and [`StyleMapper::render`] wraps each token in its class's markers.
//! Neither step can fail, and [`strip_markers`] undoes the second one.

pub mod classifier;
pub mod style;

pub use classifier::{tokenize, Token, TokenClass, Tokens};
pub use style::{strip_markers, Style, StyleMapper, StyleSpec, Theme};

/// Tokenizes and renders `code` in one go.
pub fn highlight(code: &str, theme: &Theme) -> String {
    StyleMapper::new(theme.clone()).render(tokenize(code))
}
