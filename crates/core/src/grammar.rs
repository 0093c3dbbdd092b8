//! Heuristic detection of full sentences in slide text.
//!
//! Tokens get coarse part-of-speech tags from a sense dictionary, the word
//! lists and a few suffix rules. A run reads as a full sentence when its
//! tags alternate noun, verb, noun.

use crate::lexicon::{NoSenses, PartOfSpeech, PosTags, SenseLookup, WordSet};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Latin abbreviations that would otherwise leave stray letters behind.
static ABBREVIATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"i\.e\.|e\.g\.").unwrap());

/// Split text into word tokens.
///
/// Lower-cases the first character only, drops `i.e.`/`e.g.` and ASCII
/// punctuation, then splits on single spaces. Empty tokens left by removed
/// punctuation are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return Vec::new();
    };
    let lowered: String = first.to_lowercase().chain(chars).collect();

    let without_abbreviations = ABBREVIATION_REGEX.replace_all(&lowered, "");
    let stripped: String = without_abbreviations
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    stripped.trim().split(' ').map(str::to_string).collect()
}

/// Whether a sequence of tag sets contains a noun, verb, noun alternation.
///
/// A verb before the first noun rules the text out immediately.
pub fn is_full_sentence<'a, I>(tags: I) -> bool
where
    I: IntoIterator<Item = &'a PosTags>,
{
    let mut phase = 0usize;

    for tag in tags {
        let noun = tag.contains(PartOfSpeech::Noun);
        let verb = tag.contains(PartOfSpeech::Verb);
        if phase == 0 {
            if verb {
                return false;
            }
            if noun {
                phase = 1;
            }
        } else if phase % 2 == 1 {
            if verb && !noun {
                phase += 1;
            }
        } else if noun && !verb {
            phase += 1;
        }
    }

    phase >= 3
}

/// Tags text runs and decides whether they read as full sentences.
#[derive(Debug, Clone)]
pub struct SentenceClassifier<L = NoSenses> {
    words: WordSet,
    lookup: L,
}

impl Default for SentenceClassifier {
    fn default() -> Self {
        Self::new(WordSet::default())
    }
}

impl SentenceClassifier {
    /// Classifier with no sense dictionary.
    pub fn new(words: WordSet) -> Self {
        Self::with_lookup(words, NoSenses)
    }
}

impl<L: SenseLookup> SentenceClassifier<L> {
    /// Classifier consulting `lookup` before the word lists.
    pub fn with_lookup(words: WordSet, lookup: L) -> Self {
        Self { words, lookup }
    }

    /// Candidate tags for a single token.
    pub fn tag(&self, token: &str) -> PosTags {
        if self.words.prepositions.contains(token) {
            return PosTags::only(PartOfSpeech::Preposition);
        }
        if self.words.articles.contains(token) {
            return PosTags::only(PartOfSpeech::Article);
        }
        if self.words.verbs.contains(token) {
            let mut tags = PosTags::only(PartOfSpeech::Verb);
            if token.ends_with("ing") {
                tags.insert(PartOfSpeech::Noun);
            }
            return tags;
        }

        let mut tags = self.lookup.senses(token);
        if token.ends_with("ing") {
            tags.insert(PartOfSpeech::Adjective);
            tags.insert(PartOfSpeech::Noun);
            tags.insert(PartOfSpeech::Verb);
        } else if token.ends_with("ed") {
            tags = PosTags::only(PartOfSpeech::Adjective);
        } else if tags.is_empty() {
            tags.insert(PartOfSpeech::Noun);
        }
        tags
    }

    /// Tag every distinct token, in order of first occurrence.
    pub fn classify(&self, tokens: &[String]) -> Vec<(String, PosTags)> {
        let mut seen = HashSet::new();
        let mut classified = Vec::new();
        for token in tokens {
            if seen.insert(token.as_str()) {
                classified.push((token.clone(), self.tag(token)));
            }
        }
        classified
    }

    /// Whether `text` looks like a full sentence.
    pub fn is_full_sentence(&self, text: &str) -> bool {
        let classified = self.classify(&tokenize(text));
        is_full_sentence(classified.iter().map(|(_, tags)| tags))
    }
}
