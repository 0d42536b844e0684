//! Configuration types for token alignment, tree layout and rendering.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! configuration file only needs to name the settings it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`AlignConfig`] - Controls how tokens are located in the source.
//! - [`LayoutConfig`] - Spacing of the syntax tree layout and the decode depth limit.
//! - [`StyleConfig`] - Visual styling of exported SVG documents.
//! - [`BackendConfig`] - Local analyzer program used when no recording is given.
//!
//! # Example
//!
//! ```
//! # use monkeyscope::config::{AlignStrategy, AppConfig};
//! let config = AppConfig::default();
//! assert_eq!(config.align().strategy(), AlignStrategy::DeclaredFirst);
//! assert_eq!(config.align().fallback_window(), 20);
//! assert!(config.backend().is_none());
//! ```

use serde::Deserialize;

use monkeyscope_core::{color::Color, geometry::Point};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    align: AlignConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    /// Analyzer program; absent unless configured.
    #[serde(default)]
    backend: Option<BackendConfig>,
}

impl AppConfig {
    pub fn new(align: AlignConfig, layout: LayoutConfig, style: StyleConfig) -> Self {
        Self {
            align,
            layout,
            style,
            backend: None,
        }
    }

    /// Sets the analyzer program.
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn align(&self) -> &AlignConfig {
        &self.align
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn backend(&self) -> Option<&BackendConfig> {
        self.backend.as_ref()
    }
}

/// How a token is anchored in the source before searching for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignStrategy {
    /// Trust the token's declared offset when the literal is found there,
    /// and search only when it is not.
    #[default]
    DeclaredFirst,
    /// Ignore declared offsets and search forward from the cursor; declared
    /// offsets only center the fallback window.
    Cursor,
}

/// Token alignment settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AlignConfig {
    #[serde(default)]
    strategy: AlignStrategy,

    /// Bytes searched on each side of a token's declared offset when the
    /// forward search fails.
    #[serde(default = "default_fallback_window")]
    fallback_window: usize,
}

impl AlignConfig {
    pub fn new(strategy: AlignStrategy, fallback_window: usize) -> Self {
        Self {
            strategy,
            fallback_window,
        }
    }

    pub fn strategy(&self) -> AlignStrategy {
        self.strategy
    }

    pub fn fallback_window(&self) -> usize {
        self.fallback_window
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self::new(AlignStrategy::default(), default_fallback_window())
    }
}

fn default_fallback_window() -> usize {
    20
}

/// Spacing of the syntax tree layout.
///
/// Children start `lead_offset` to the left of their parent and one
/// `level_step` below it. Slot children (`Name`, `Left`, `Condition`, ...)
/// advance a shared cursor by `slot_step`; list children are spread by
/// `statement_step` or `parameter_step`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    origin_x: f32,
    origin_y: f32,
    lead_offset: f32,
    level_step: f32,
    slot_step: f32,
    statement_step: f32,
    parameter_step: f32,
    /// Deepest syntax tree accepted when decoding; a lone root is one level.
    max_depth: usize,
}

impl LayoutConfig {
    /// Returns the position of the root node.
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    pub fn lead_offset(&self) -> f32 {
        self.lead_offset
    }

    pub fn level_step(&self) -> f32 {
        self.level_step
    }

    pub fn slot_step(&self) -> f32 {
        self.slot_step
    }

    pub fn statement_step(&self) -> f32 {
        self.statement_step
    }

    pub fn parameter_step(&self) -> f32 {
        self.parameter_step
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Moves the root node to `origin`.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin_x = origin.x();
        self.origin_y = origin.y();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 400.0,
            origin_y: 50.0,
            lead_offset: 100.0,
            level_step: 100.0,
            slot_step: 200.0,
            statement_step: 250.0,
            parameter_step: 150.0,
            max_depth: monkeyscope_ingest::DecodeOptions::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Visual styling of exported documents.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color as a CSS color string; transparent when unset.
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default = "default_font_family")]
    font_family: String,

    #[serde(default = "default_font_size")]
    font_size: u16,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            font_family: default_font_family(),
            font_size: default_font_size(),
        }
    }
}

fn default_font_family() -> String {
    String::from("monospace")
}

fn default_font_size() -> u16 {
    14
}

/// A local executable answering `tokenize` and `parse` requests.
///
/// The program is run as `program [args..] <action>` with the Monkey source
/// on stdin and must print the JSON response on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    program: String,

    #[serde(default)]
    args: Vec<String>,
}

impl BackendConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();

        assert_approx_eq!(f32, layout.origin().x(), 400.0);
        assert_approx_eq!(f32, layout.origin().y(), 50.0);
        assert_approx_eq!(f32, layout.lead_offset(), 100.0);
        assert_approx_eq!(f32, layout.level_step(), 100.0);
        assert_approx_eq!(f32, layout.slot_step(), 200.0);
        assert_approx_eq!(f32, layout.statement_step(), 250.0);
        assert_approx_eq!(f32, layout.parameter_step(), 150.0);
        assert_eq!(layout.max_depth(), 100);
    }

    #[test]
    fn test_style_background_color() {
        assert!(StyleConfig::default().background_color().unwrap().is_none());

        let style = StyleConfig::default().with_background_color("white");
        assert!(style.background_color().unwrap().is_some());

        let style = StyleConfig::default().with_background_color("not-a-color");
        let err = style.background_color().unwrap_err();
        assert!(err.starts_with("Invalid background color in config"));
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "align": {"strategy": "cursor"},
            "layout": {"statement_step": 300.0},
            "backend": {"program": "monkey-analyzer"}
        }))
        .unwrap();

        assert_eq!(config.align().strategy(), AlignStrategy::Cursor);
        assert_eq!(config.align().fallback_window(), 20);
        assert_approx_eq!(f32, config.layout().statement_step(), 300.0);
        assert_approx_eq!(f32, config.layout().parameter_step(), 150.0);
        assert_eq!(config.style().font_family(), "monospace");

        let backend = config.backend().unwrap();
        assert_eq!(backend.program(), "monkey-analyzer");
        assert!(backend.args().is_empty());
    }
}
