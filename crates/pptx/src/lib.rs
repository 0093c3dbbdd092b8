//! PPTX (Office Open XML) reader for the pptcheck deck model.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents, into
//! the slides, shapes, colors and notes the checks need.

pub mod parser;
mod shapes;

pub use parser::PptxParser;
