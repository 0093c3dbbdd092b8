//! Speaking-time estimate from speaker notes.

use crate::config::CheckerConfig;
use crate::types::{Deck, Slide};
use serde::{Deserialize, Serialize};

/// Marker in the notes for a deliberate pause.
const BREAK_MARKER: &str = "[Break]";

/// Punctuation that ends a sentence and earns a pause.
const PAUSE_PUNCTUATION: [char; 3] = ['.', '?', '!'];

/// Slides may lack notes up to this count before estimating gives up.
const MAX_SLIDES_WITHOUT_NOTES: usize = 2;

/// Time estimate for a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEstimate {
    /// Total time as `HH:MM:SS`.
    pub total: String,

    /// Time spent on each slide as `MM:SS`.
    pub slide_times: Vec<String>,

    /// Time at which each slide starts as `HH:MM:SS`.
    pub cumulative_start_times: Vec<String>,

    /// Total time in seconds.
    pub total_seconds: f64,
}

/// Spoken text and break count extracted from a slide's notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideNotes {
    /// Runs that are read aloud, each followed by a newline.
    pub spoken: String,

    /// Number of `[Break]` markers.
    pub breaks: usize,
}

impl SlideNotes {
    /// Split a slide's notes into spoken text and breaks.
    ///
    /// Runs in square brackets are stage directions and are not read out;
    /// those containing `[Break]` count as a break.
    pub fn from_slide(slide: &Slide) -> Self {
        let mut notes = Self::default();
        let Some(slide_notes) = &slide.notes else {
            return notes;
        };

        for run in &slide_notes.runs {
            if run.contains('[') && run.contains(']') {
                if run.contains(BREAK_MARKER) {
                    notes.breaks += 1;
                }
                continue;
            }
            notes.spoken.push_str(run);
            notes.spoken.push('\n');
        }

        notes
    }

    /// Seconds needed to present these notes.
    pub fn duration(&self, config: &CheckerConfig) -> f64 {
        let mut seconds = self.breaks as f64 * config.seconds_per_break;

        let mut text = self.spoken.clone();
        for mark in PAUSE_PUNCTUATION {
            let pauses = text.matches(mark).count();
            seconds += pauses as f64 * config.seconds_per_pause;
            text = text.replace(mark, "");
        }

        seconds + text.split_whitespace().count() as f64 * config.seconds_per_word
    }
}

/// Estimate how long the deck takes to present.
///
/// Returns `None` when more than two slides have no spoken notes, since the
/// estimate would be meaningless. Stops at the first backup slide.
pub fn estimate_presentation_length(deck: &Deck, config: &CheckerConfig) -> Option<TimeEstimate> {
    let mut total_seconds = 0.0;
    let mut slides_without_notes = 0;
    let mut slide_times = Vec::new();
    let mut cumulative_start_times = Vec::new();

    for slide in &deck.slides {
        let notes = SlideNotes::from_slide(slide);
        if notes.spoken.is_empty() {
            slides_without_notes += 1;
        }
        if slides_without_notes > MAX_SLIDES_WITHOUT_NOTES {
            log::info!("Too many slides without notes to estimate the presentation length");
            return None;
        }

        if slide.is_backup() {
            break;
        }

        cumulative_start_times.push(format_hms(total_seconds));
        let slide_seconds = notes.duration(config);
        total_seconds += slide_seconds + config.seconds_between_slides;
        slide_times.push(format_ms(slide_seconds));
    }

    Some(TimeEstimate {
        total: format_hms(total_seconds),
        slide_times,
        cumulative_start_times,
        total_seconds,
    })
}

/// Whole seconds, truncated, wrapping at one day.
fn whole_seconds(seconds: f64) -> u64 {
    (seconds.max(0.0) as u64) % 86_400
}

/// Format seconds as `HH:MM:SS`.
pub fn format_hms(seconds: f64) -> String {
    let s = whole_seconds(seconds);
    format!("{:02}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60)
}

/// Format seconds as `MM:SS` (hours are dropped).
pub fn format_ms(seconds: f64) -> String {
    let s = whole_seconds(seconds);
    format!("{:02}:{:02}", (s / 60) % 60, s % 60)
}
