//! Monkeyscope - token highlighting and syntax tree layout for Monkey
//! language analysis results.
//!
//! Monkeyscope turns the responses of an external Monkey tokenizer and parser
//! into display models: source text partitioned into highlighted spans, and
//! positioned node/edge graphs of syntax trees. Both can be exported as SVG
//! or serialized as JSON.

pub mod backend;
pub mod config;

mod align;
mod error;
mod export;
mod layout;

pub use monkeyscope_core::{color, geometry, graph, highlight, token};
pub use monkeyscope_ingest::{SyntaxTree, syntax};

pub use align::{Alignment, AlignmentNote, TokenAligner, align};
pub use error::MonkeyscopeError;
pub use export::{ExportError, svg::SvgExporter};
pub use layout::{AstGraphBuilder, build_graph};

use log::{debug, info, trace};

use monkeyscope_ingest::DecodeOptions;

use backend::Analyzer;
use config::AppConfig;
use graph::AstGraph;
use token::Token;

/// Entry point tying the decoding, alignment, layout and export stages
/// together under one [`AppConfig`].
///
/// # Examples
///
/// ```rust
/// use monkeyscope::{Visualizer, config::AppConfig};
///
/// let visualizer = Visualizer::new(AppConfig::default());
///
/// let tree = visualizer
///     .decode_syntax_tree(r#"{"ast": {"type": "Program", "statements": []}}"#)
///     .expect("Failed to decode");
/// let graph = visualizer.build_graph(&tree);
///
/// let svg = visualizer
///     .render_graph_svg(&graph)
///     .expect("Failed to render");
/// assert!(svg.contains("Program"));
/// ```
#[derive(Debug, Default)]
pub struct Visualizer {
    config: AppConfig,
}

impl Visualizer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decodes a tokenize response.
    ///
    /// # Errors
    ///
    /// Returns [`MonkeyscopeError::Ingest`] carrying the response text when
    /// the response is malformed or reports an upstream error.
    pub fn decode_tokens(&self, response: &str) -> Result<Vec<Token>, MonkeyscopeError> {
        monkeyscope_ingest::decode_tokens(response)
            .map_err(|err| MonkeyscopeError::new_ingest_error(err, response))
    }

    /// Decodes a parse response, rejecting trees deeper than the configured
    /// `layout.max_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`MonkeyscopeError::Ingest`] carrying the response text when
    /// the response is malformed, reports an upstream error, or holds a tree
    /// that is too deep.
    pub fn decode_syntax_tree(&self, response: &str) -> Result<SyntaxTree, MonkeyscopeError> {
        let options = DecodeOptions::new(self.config.layout().max_depth());
        let tree = monkeyscope_ingest::decode_syntax_tree(response, options)
            .map_err(|err| MonkeyscopeError::new_ingest_error(err, response))?;

        for warning in tree.warnings() {
            debug!(warning = warning.to_string(); "Syntax tree decoded with warning");
        }
        Ok(tree)
    }

    /// Tokenizes `source` with `analyzer`.
    ///
    /// # Errors
    ///
    /// Returns [`MonkeyscopeError::Analyzer`] if no response could be
    /// obtained, or the errors of [`Visualizer::decode_tokens`].
    pub fn tokenize(
        &self,
        analyzer: &dyn Analyzer,
        source: &str,
    ) -> Result<Vec<Token>, MonkeyscopeError> {
        info!(source_len = source.len(); "Tokenizing source");
        let response = analyzer.tokenize(source)?;
        trace!(response = response.as_str(); "Tokenize response");
        self.decode_tokens(&response)
    }

    /// Parses `source` with `analyzer`.
    ///
    /// # Errors
    ///
    /// Returns [`MonkeyscopeError::Analyzer`] if no response could be
    /// obtained, or the errors of [`Visualizer::decode_syntax_tree`].
    pub fn parse(
        &self,
        analyzer: &dyn Analyzer,
        source: &str,
    ) -> Result<SyntaxTree, MonkeyscopeError> {
        info!(source_len = source.len(); "Parsing source");
        let response = analyzer.parse(source)?;
        trace!(response = response.as_str(); "Parse response");
        self.decode_syntax_tree(&response)
    }

    /// Aligns `tokens` with `source` using the configured strategy.
    pub fn align(&self, source: &str, tokens: &[Token]) -> Alignment {
        let alignment = TokenAligner::new(self.config.align().clone()).align(source, tokens);
        for note in alignment.notes() {
            debug!(note = note.to_string(); "Alignment note");
        }
        alignment
    }

    /// Lays out `tree` using the configured spacing.
    pub fn build_graph(&self, tree: &SyntaxTree) -> AstGraph {
        AstGraphBuilder::new(self.config.layout().clone()).build(tree)
    }

    /// Renders `graph` to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`MonkeyscopeError::Export`] if the configured style is invalid.
    pub fn render_graph_svg(&self, graph: &AstGraph) -> Result<String, MonkeyscopeError> {
        let exporter = SvgExporter::new(self.config.style())?;
        let svg = exporter.render_graph(graph).to_string();

        info!(nodes_count = graph.nodes().len(); "Graph SVG rendered");
        Ok(svg)
    }

    /// Renders the highlighted source of `alignment` to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`MonkeyscopeError::Export`] if the configured style is
    /// invalid or `alignment` refers to tokens missing from `tokens`.
    pub fn render_tokens_svg(
        &self,
        tokens: &[Token],
        alignment: &Alignment,
    ) -> Result<String, MonkeyscopeError> {
        let exporter = SvgExporter::new(self.config.style())?;
        let svg = exporter.render_tokens(tokens, alignment)?.to_string();

        info!(spans_count = alignment.spans().len(); "Token SVG rendered");
        Ok(svg)
    }
}
