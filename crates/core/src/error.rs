//! Error types for deck analysis.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or analyzing a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A word list or sense table is malformed.
    #[error("Invalid lexicon: {0}")]
    LexiconError(String),

    /// A color value is not a six digit hex code or cannot be resolved.
    #[error("Malformed color: {0}")]
    MalformedColor(String),

    /// A theme color slot does not map onto the deck's color scheme.
    #[error("Theme color slot {slot} is out of range for a scheme of {len} entries")]
    ThemeSlotOutOfRange {
        /// The requested theme slot.
        slot: i32,
        /// Number of entries in the color scheme.
        len: usize,
    },

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}
