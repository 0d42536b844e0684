//! CSS colors for node fills, token highlights and backgrounds.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS color.
///
/// Accepts anything the `color` crate understands: `#3b82f6`,
/// `rgb(59 130 246)`, `white`, and so on.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color(DynamicColor);

impl Color {
    /// Parses a CSS color string.
    ///
    /// ```
    /// use monkeyscope_core::color::Color;
    ///
    /// assert!(Color::new("#3b82f6").is_ok());
    /// assert!(Color::new("no-such-color").is_err());
    /// ```
    pub fn new(css: &str) -> Result<Self, String> {
        css.parse()
    }

    /// Returns this color with its alpha channel replaced.
    ///
    /// ```
    /// use monkeyscope_core::color::Color;
    ///
    /// let highlight = Color::new("red").unwrap().with_alpha(0.35);
    /// assert!((highlight.alpha() - 0.35).abs() < 0.001);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self(self.0.with_alpha(alpha))
    }

    pub fn alpha(&self) -> f32 {
        self.0.components[3]
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(css: &str) -> Result<Self, Self::Err> {
        DynamicColor::from_str(css)
            .map(Self)
            .map_err(|err| format!("invalid color `{css}`: {err}"))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_input() {
        let err = Color::new("not-a-color").unwrap_err();
        assert!(err.contains("`not-a-color`"));
    }

    #[test]
    fn test_default_is_black() {
        assert_eq!(Color::default(), Color::new("black").unwrap());
    }

    #[test]
    fn test_with_alpha_keeps_equality_per_channel() {
        let base = Color::new("#8b5cf6").unwrap();
        assert_eq!(base.with_alpha(0.5), Color::new("#8b5cf6").unwrap().with_alpha(0.5));
        assert_ne!(base.with_alpha(0.5), base);
        assert!((base.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_svg_attribute_value() {
        let value: svg::node::Value = Color::new("white").unwrap().into();
        assert!(!value.to_string().is_empty());
    }
}
