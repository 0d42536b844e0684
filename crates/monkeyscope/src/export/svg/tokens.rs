//! SVG rendering for highlighted token streams.

use indexmap::IndexSet;
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use monkeyscope_core::{
    geometry::{Bounds, Point, Size},
    highlight::DisplaySpan,
    token::{Token, TokenCategory},
};

use super::SvgExporter;
use crate::{align::Alignment, export::ExportError};

const HIGHLIGHT_ALPHA: f32 = 0.35;
const LEGEND_SWATCH: f32 = 12.0;

impl SvgExporter {
    /// Renders the source text of `alignment` in a monospace grid, with every
    /// token span backed by a box in its category color, followed by a
    /// legend of the categories in the order they first appear.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnknownToken`] if a span refers to a token
    /// that is not in `tokens`.
    pub fn render_tokens(
        &self,
        tokens: &[Token],
        alignment: &Alignment,
    ) -> Result<Document, ExportError> {
        let mut code = svg_element::Group::new()
            .set("class", "source")
            .set("xml:space", "preserve");
        let mut categories = IndexSet::new();
        let mut line = 0usize;
        let mut column = 0usize;
        let mut widest = 0usize;

        for span in alignment.spans() {
            let token = span
                .token_index()
                .map(|index| {
                    tokens.get(index).ok_or(ExportError::UnknownToken {
                        index,
                        count: tokens.len(),
                    })
                })
                .transpose()?;
            if let Some(token) = token {
                categories.insert(token.category());
            }

            for (piece_index, piece) in span.text().split('\n').enumerate() {
                if piece_index > 0 {
                    line += 1;
                    column = 0;
                }
                if piece.is_empty() {
                    continue;
                }

                let origin = self.cell(line, column);
                let width = piece.chars().count();
                code = code.add(self.render_piece(span, token, piece, origin));
                column += width;
                widest = widest.max(column);
            }
        }

        let code_size = Size::new(
            widest as f32 * self.char_width(),
            (line + 1) as f32 * self.line_height(),
        );
        let legend_top = code_size.height() + self.line_height();
        let legend = self.render_legend(&categories, legend_top);

        let legend_width = categories
            .iter()
            .map(|category| category.to_string().chars().count())
            .max()
            .map_or(0.0, |chars| {
                LEGEND_SWATCH * 2.0 + chars as f32 * self.char_width()
            });
        let content = Bounds::new_from_top_left(
            Point::default(),
            Size::new(
                code_size.width().max(legend_width),
                legend_top + categories.len() as f32 * self.line_height(),
            ),
        );

        Ok(self.document(content).add(code).add(legend))
    }

    fn render_piece(
        &self,
        span: &DisplaySpan,
        token: Option<&Token>,
        piece: &str,
        origin: Point,
    ) -> svg_element::Group {
        let mut group = svg_element::Group::new();

        if let Some(token) = token {
            let color = token.category().color().with_alpha(HIGHLIGHT_ALPHA);
            group = group
                .set("class", "token")
                .set(
                    "aria-label",
                    format!("{}: {}", token.display_name(), token.literal()),
                )
                .add(
                    svg_element::Rectangle::new()
                        .set("x", origin.x())
                        .set("y", origin.y())
                        .set("width", piece.chars().count() as f32 * self.char_width())
                        .set("height", self.line_height())
                        .set("rx", 2.0)
                        .set("fill", color)
                        .set("fill-opacity", color.alpha()),
                );
            if let Some(index) = span.token_index() {
                group = group.set("data-token-index", index.to_string());
            }
        }

        group.add(
            self.text("", origin.x(), origin.y() + self.line_height() / 2.0)
                .set("dominant-baseline", "central")
                .add(SvgText::new(piece)),
        )
    }

    fn render_legend(
        &self,
        categories: &IndexSet<TokenCategory>,
        top: f32,
    ) -> svg_element::Group {
        let mut legend = svg_element::Group::new().set("class", "legend");

        for (row, category) in categories.iter().enumerate() {
            let y = top + row as f32 * self.line_height();
            let color = category.color();
            legend = legend
                .add(
                    svg_element::Rectangle::new()
                        .set("x", 0.0)
                        .set("y", y + (self.line_height() - LEGEND_SWATCH) / 2.0)
                        .set("width", LEGEND_SWATCH)
                        .set("height", LEGEND_SWATCH)
                        .set("fill", color),
                )
                .add(
                    self.text(
                        &category.to_string(),
                        LEGEND_SWATCH * 2.0,
                        y + self.line_height() / 2.0,
                    )
                    .set("dominant-baseline", "central"),
                );
        }

        legend
    }

    /// Returns the top-left corner of the character cell at `line`/`column`.
    fn cell(&self, line: usize, column: usize) -> Point {
        Point::new(
            column as f32 * self.char_width(),
            line as f32 * self.line_height(),
        )
    }
}
