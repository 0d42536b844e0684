//! Monkeyscope Core Types
//!
//! This crate provides the display-model types shared by the Monkeyscope
//! crates. It includes:
//!
//! - **Tokens**: Upstream lexical tokens and their highlight classes ([`token`] module)
//! - **Highlighting**: Display spans partitioning a source text ([`highlight`] module)
//! - **Graphs**: Positioned syntax tree nodes and edges ([`graph`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod geometry;
pub mod graph;
pub mod highlight;
pub mod token;
