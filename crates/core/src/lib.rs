//! Core deck model and presentation-quality checks: summary slide, slide
//! numbering, transition smoothness, contrast, text density, full
//! sentences and a speaking-time estimate.

pub mod config;
pub mod contrast;
pub mod error;
pub mod feedback;
pub mod fingerprint;
pub mod grammar;
pub mod lexicon;
pub mod report;
pub mod rules;
pub mod timing;
pub mod types;

pub use config::CheckerConfig;
pub use error::{Error, Result};
pub use feedback::SlideFeedback;
pub use grammar::SentenceClassifier;
pub use lexicon::{NoSenses, PartOfSpeech, PosTags, SenseLookup, SenseTable, WordSet};
pub use report::{CheckReport, Checker, Rule, RuleOutcome};
pub use timing::TimeEstimate;
pub use types::{
    AutoShapeKind, ColorFormat, ColorScheme, Deck, Fill, Font, LineFormat, Notes, Paragraph, Rgb,
    SchemeColor, SchemeValue, Shape, ShapeKind, Slide, TextFrame, TextRun, ThemeColor,
};
