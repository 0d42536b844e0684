//! SVG rendering of syntax tree graphs and highlighted token streams.

mod graph;
mod tokens;

use svg::{Document, node::element as svg_element};

use monkeyscope_core::{color::Color, geometry::Bounds};

use super::ExportError;
use crate::config::StyleConfig;

/// Renders display models to SVG documents with one [`StyleConfig`].
#[derive(Debug, Clone)]
pub struct SvgExporter {
    background_color: Option<Color>,
    font_family: String,
    font_size: f32,
    padding: f32,
}

impl SvgExporter {
    /// Creates an exporter for `style`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Style`] if the configured background color is
    /// not a valid color.
    pub fn new(style: &StyleConfig) -> Result<Self, ExportError> {
        let background_color = style.background_color().map_err(ExportError::Style)?;

        Ok(Self {
            background_color,
            font_family: style.font_family().to_string(),
            font_size: f32::from(style.font_size()),
            padding: 35.0,
        })
    }

    /// Creates an empty document showing `content` plus padding.
    fn document(&self, content: Bounds) -> Document {
        let view = content.expand(self.padding);

        let doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view.min_x(),
                    view.min_y(),
                    view.width(),
                    view.height()
                ),
            )
            .set("width", view.width())
            .set("height", view.height());

        match self.background_color {
            Some(color) => doc.add(
                svg_element::Rectangle::new()
                    .set("x", view.min_x())
                    .set("y", view.min_y())
                    .set("width", view.width())
                    .set("height", view.height())
                    .set("fill", color)
                    .set("fill-opacity", color.alpha()),
            ),
            None => doc,
        }
    }

    fn char_width(&self) -> f32 {
        self.font_size * 0.6
    }

    fn line_height(&self) -> f32 {
        self.font_size * 1.4
    }

    /// Creates a text element in the exporter's font.
    fn text(&self, content: &str, x: f32, y: f32) -> svg_element::Text {
        svg_element::Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_background_color() {
        let style = StyleConfig::default().with_background_color("nope");
        assert!(matches!(
            SvgExporter::new(&style),
            Err(ExportError::Style(_))
        ));
    }

    #[test]
    fn test_document_includes_padding() {
        let exporter = SvgExporter::new(&StyleConfig::default()).unwrap();
        let doc = exporter
            .document(Bounds::new_from_top_left(
                monkeyscope_core::geometry::Point::new(0.0, 0.0),
                monkeyscope_core::geometry::Size::new(100.0, 50.0),
            ))
            .to_string();

        assert!(doc.contains(r#"viewBox="-35 -35 170 120""#));
        assert!(!doc.contains("<rect"));
    }

    #[test]
    fn test_background_rectangle() {
        let style = StyleConfig::default().with_background_color("white");
        let exporter = SvgExporter::new(&style).unwrap();
        let doc = exporter.document(Bounds::default()).to_string();

        assert!(doc.contains("<rect"));
    }
}
