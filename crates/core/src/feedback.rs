//! Per-slide feedback collected by the rules.

use crate::types::Deck;
use serde::{Deserialize, Serialize};

/// One feedback entry per in-scope slide.
///
/// Rules append newline-terminated comments in the order they run, so a
/// slide's entry reads in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideFeedback {
    entries: Vec<String>,
}

impl SlideFeedback {
    /// Empty feedback for `slide_count` slides.
    pub fn new(slide_count: usize) -> Self {
        Self {
            entries: vec![String::new(); slide_count],
        }
    }

    /// Empty feedback sized to the deck's in-scope slides.
    pub fn for_deck(deck: &Deck) -> Self {
        Self::new(deck.in_scope_slides().len())
    }

    /// Append a comment to the slide at 0-based `slide_index`.
    pub fn push(&mut self, slide_index: usize, comment: impl AsRef<str>) {
        match self.entries.get_mut(slide_index) {
            Some(entry) => {
                entry.push_str(comment.as_ref());
                entry.push('\n');
            }
            None => log::warn!(
                "Dropping feedback for slide {} outside the analyzed range: {}",
                slide_index + 1,
                comment.as_ref()
            ),
        }
    }

    /// Feedback for the slide at 0-based `slide_index`.
    pub fn get(&self, slide_index: usize) -> Option<&str> {
        self.entries.get(slide_index).map(String::as_str)
    }

    /// Comments recorded for a slide, one per line.
    pub fn comments(&self, slide_index: usize) -> Vec<&str> {
        self.get(slide_index)
            .map(|entry| entry.lines().collect())
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether no slide received any comment.
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(String::is_empty)
    }

    /// 0-based indices of slides with at least one comment.
    pub fn flagged_slides(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_empty())
            .map(|(i, _)| i)
            .collect()
    }
}
