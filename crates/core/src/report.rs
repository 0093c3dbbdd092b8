//! Running every check over a deck and collecting the results.

use crate::config::CheckerConfig;
use crate::feedback::SlideFeedback;
use crate::grammar::SentenceClassifier;
use crate::lexicon::{NoSenses, SenseLookup};
use crate::rules;
use crate::timing::{estimate_presentation_length, TimeEstimate};
use crate::types::Deck;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    EndsWithSummary,
    SlideNumbers,
    SmoothTransitions,
    HighContrast,
    ExcessiveText,
    CompleteSentences,
}

impl Rule {
    /// Every rule in invocation order.
    pub const ALL: [Rule; 6] = [
        Rule::EndsWithSummary,
        Rule::SlideNumbers,
        Rule::SmoothTransitions,
        Rule::HighContrast,
        Rule::ExcessiveText,
        Rule::CompleteSentences,
    ];

    /// Deck-level advice shown when the rule fails.
    pub fn advice(self) -> &'static str {
        match self {
            Rule::EndsWithSummary => "Please end the presentation with a summary slide.",
            Rule::SlideNumbers => "Please add slide numbers.",
            Rule::SmoothTransitions => "Please check slide transitions.",
            Rule::HighContrast => "Please check colours and fonts.",
            Rule::ExcessiveText => "Please ensure that slides do not have too much text.",
            Rule::CompleteSentences => "Please use short phrases rather than full sentences.",
        }
    }

    /// Whether a failure counts against the deck. The sentence check only
    /// leaves per-slide hints.
    pub fn is_informational(self) -> bool {
        matches!(self, Rule::CompleteSentences)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::EndsWithSummary => "ends with summary",
            Rule::SlideNumbers => "slide numbers",
            Rule::SmoothTransitions => "smooth transitions",
            Rule::HighContrast => "high contrast fonts and colours",
            Rule::ExcessiveText => "excessive text",
            Rule::CompleteSentences => "no complete sentences",
        };
        f.write_str(name)
    }
}

/// Result of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: Rule,
    pub passed: bool,
}

/// Everything the report layer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// One outcome per rule, in invocation order.
    pub outcomes: Vec<RuleOutcome>,

    /// Deck-level feedback lines.
    pub general_feedback: Vec<String>,

    /// Feedback per in-scope slide, comments separated by newlines.
    pub slide_feedback: Vec<String>,

    /// `None` when the notes are too sparse to estimate.
    pub time_estimate: Option<TimeEstimate>,
}

impl CheckReport {
    /// Whether the deck needs no changes at all.
    pub fn passed_all(&self) -> bool {
        self.general_feedback.is_empty() && self.slide_feedback.iter().all(String::is_empty)
    }

    /// Outcome of a single rule.
    pub fn outcome(&self, rule: Rule) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }
}

/// Runs the checks with one configuration and classifier.
#[derive(Debug, Clone)]
pub struct Checker<L = NoSenses> {
    config: CheckerConfig,
    classifier: SentenceClassifier<L>,
}

impl Checker {
    /// Checker with the default word lists and no sense dictionary.
    pub fn new(config: CheckerConfig) -> Self {
        Self::with_classifier(config, SentenceClassifier::default())
    }
}

impl<L: SenseLookup> Checker<L> {
    pub fn with_classifier(config: CheckerConfig, classifier: SentenceClassifier<L>) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Run every rule in order, then the time estimate.
    pub fn check(&self, deck: &Deck) -> CheckReport {
        let mut feedback = SlideFeedback::for_deck(deck);
        let mut outcomes = Vec::with_capacity(Rule::ALL.len());

        for rule in Rule::ALL {
            let passed = self.run_rule(rule, deck, &mut feedback);
            log::debug!("Check '{}' passed: {}", rule, passed);
            outcomes.push(RuleOutcome { rule, passed });
        }

        let general_feedback = outcomes
            .iter()
            .filter(|o| !o.passed && !o.rule.is_informational())
            .map(|o| o.rule.advice().to_string())
            .collect();

        let time_estimate = estimate_presentation_length(deck, &self.config);

        CheckReport {
            outcomes,
            general_feedback,
            slide_feedback: feedback.into_entries(),
            time_estimate,
        }
    }

    fn run_rule(
        &self,
        rule: Rule,
        deck: &Deck,
        feedback: &mut SlideFeedback,
    ) -> bool {
        match rule {
            Rule::EndsWithSummary => rules::must_end_with_summary_slide(deck),
            Rule::SlideNumbers => rules::should_have_slide_numbers(deck, feedback),
            Rule::SmoothTransitions => {
                rules::has_smooth_slide_transitions(deck, &self.config, feedback)
            }
            Rule::HighContrast => {
                rules::should_have_high_contrast_fonts_colours(deck, &self.config, feedback)
            }
            Rule::ExcessiveText => {
                rules::should_not_have_excessive_text(deck, &self.config, feedback)
            }
            Rule::CompleteSentences => {
                rules::does_not_have_complete_sentences(deck, &self.classifier, feedback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorFormat, Font, Rgb, Shape, ShapeKind, Slide, TextFrame, ThemeColor};

    fn body(text: &str) -> Shape {
        Shape::new(ShapeKind::TextBox, 100, 300, 800, 200).with_text_frame(TextFrame::from_lines(
            [text],
            Font::sized(24.0).with_color(ColorFormat::Rgb(Rgb::BLACK)),
        ))
    }

    fn slide(title: &str, text: &str, notes: &str) -> Slide {
        let mut slide = Slide::new(Some(title)).with_notes([notes]);
        slide.add_shape(body(text));
        slide
    }

    #[test]
    fn test_clean_deck_passes_everything() {
        let mut deck = Deck::new(1000, 1000);
        deck.add_slide(slide("Intro", "Quarterly results", "Hello and welcome."));
        deck.add_slide(slide("Details", "Revenue growth", "Revenue grew."));
        deck.add_slide(slide("Summary", "Key takeaways", "Thanks!"));

        let report = Checker::new(CheckerConfig::default()).check(&deck);
        assert!(report.passed_all(), "{:?}", report);
        assert_eq!(report.outcomes.len(), 6);
        assert!(report.time_estimate.is_some());
        assert_eq!(report.slide_feedback.len(), 3);
    }

    #[test]
    fn test_feedback_follows_rule_order() {
        let mut deck = Deck::new(1000, 1000);
        deck.add_slide(slide("Intro", "Welcome", "Hi."));
        let mut second = slide(
            "Details",
            "Click here to begin the onboarding process now",
            "Go.",
        );
        second.add_shape(
            Shape::new(ShapeKind::TextBox, 0, 0, 10, 10).with_text_frame(TextFrame::from_lines(
                ["tiny words everywhere here"],
                Font::sized(10.0).with_color(ColorFormat::Rgb(Rgb::BLACK)),
            )),
        );
        deck.add_slide(second);

        let report = Checker::new(CheckerConfig::default()).check(&deck);
        assert!(!report.passed_all());
        assert_eq!(
            report.general_feedback,
            vec![
                "Please end the presentation with a summary slide.",
                "Please check colours and fonts.",
            ]
        );
        let comments: Vec<&str> = report.slide_feedback[1].lines().collect();
        assert_eq!(comments.len(), 2);
        assert!(comments[0].starts_with("Font size for text 'tiny words everywhere here'"));
        assert!(comments[1].starts_with("Avoid full sentences:"));
        assert!(!report.outcome(Rule::CompleteSentences).unwrap().passed);
    }

    #[test]
    fn test_unresolvable_colour_fails_contrast_only() {
        let mut deck = Deck::new(1000, 1000);
        let mut s = Slide::new(Some("Summary"));
        s.add_shape(Shape::new(ShapeKind::TextBox, 0, 0, 10, 10).with_text_frame(
            TextFrame::from_lines(
                ["Hello"],
                Font::default().with_color(ColorFormat::Theme {
                    color: ThemeColor::Accent6,
                    brightness: 0.0,
                }),
            ),
        ));
        deck.add_slide(s);
        deck.color_scheme.entries.clear();

        let report = Checker::new(CheckerConfig::default()).check(&deck);
        assert!(!report.outcome(Rule::HighContrast).unwrap().passed);
        assert!(report.outcome(Rule::EndsWithSummary).unwrap().passed);
        assert_eq!(report.outcomes.len(), 6);
        assert!(report
            .general_feedback
            .contains(&Rule::HighContrast.advice().to_string()));
        assert!(report.slide_feedback[0].contains("Colour for text box could not be resolved"));
    }

    #[test]
    fn test_sparse_notes_leave_estimate_unavailable() {
        let mut deck = Deck::new(1000, 1000);
        for title in ["One", "Two", "Summary"] {
            deck.add_slide(Slide::new(Some(title)));
        }
        let report = Checker::new(CheckerConfig::default()).check(&deck);
        assert_eq!(report.time_estimate, None);
    }
}
