//! Word lists and part-of-speech lookups used by the sentence classifier.

use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;

const DEFAULT_VERBS: &str = include_str!("../data/verbs.txt");
const DEFAULT_PREPOSITIONS: &str = include_str!("../data/prepositions.txt");

/// Articles are fixed and not read from disk.
pub const ARTICLES: [&str; 3] = ["the", "a", "an"];

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Article,
}

impl PartOfSpeech {
    /// Short tag code (`n`, `v`, `a`, `r`, `p`, `at`).
    pub fn code(self) -> &'static str {
        match self {
            Self::Noun => "n",
            Self::Verb => "v",
            Self::Adjective => "a",
            Self::Adverb => "r",
            Self::Preposition => "p",
            Self::Article => "at",
        }
    }

    /// Parse a tag code. `s` (adjective satellite) reads as an adjective.
    pub fn from_code(code: &str) -> Option<Self> {
        let pos = match code {
            "n" => Self::Noun,
            "v" => Self::Verb,
            "a" | "s" => Self::Adjective,
            "r" => Self::Adverb,
            "p" => Self::Preposition,
            "at" => Self::Article,
            _ => return None,
        };
        Some(pos)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Set of candidate tags for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosTags(BTreeSet<PartOfSpeech>);

impl PosTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one tag.
    pub fn only(pos: PartOfSpeech) -> Self {
        let mut tags = Self::new();
        tags.insert(pos);
        tags
    }

    pub fn insert(&mut self, pos: PartOfSpeech) {
        self.0.insert(pos);
    }

    pub fn contains(&self, pos: PartOfSpeech) -> bool {
        self.0.contains(&pos)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PartOfSpeech> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<PartOfSpeech> for PosTags {
    fn from_iter<I: IntoIterator<Item = PartOfSpeech>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for PosTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(PartOfSpeech::code).collect();
        write!(f, "{{{}}}", codes.join(","))
    }
}

/// Dictionary of word senses: the tags of every sense whose lemma is
/// exactly `word`.
pub trait SenseLookup {
    fn senses(&self, word: &str) -> PosTags;
}

/// Lookup that knows no words; tagging falls back to the word lists and
/// suffix rules alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSenses;

impl SenseLookup for NoSenses {
    fn senses(&self, _word: &str) -> PosTags {
        PosTags::new()
    }
}

impl<F> SenseLookup for F
where
    F: Fn(&str) -> PosTags,
{
    fn senses(&self, word: &str) -> PosTags {
        self(word)
    }
}

/// Word → tags table read from a plain text file.
///
/// One word per line followed by whitespace separated tag codes, e.g.
/// `process\tn v`. Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone, Default)]
pub struct SenseTable {
    senses: HashMap<String, PosTags>,
}

impl SenseTable {
    /// Parse a sense table from its text form.
    pub fn parse(text: &str) -> Result<Self> {
        let mut senses: HashMap<String, PosTags> = HashMap::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let entry = senses.entry(word.to_string()).or_default();
            for code in fields {
                let pos = PartOfSpeech::from_code(code).ok_or_else(|| {
                    Error::LexiconError(format!(
                        "line {}: unknown part-of-speech tag '{}'",
                        line_no + 1,
                        code
                    ))
                })?;
                entry.insert(pos);
            }
        }

        Ok(Self { senses })
    }

    /// Read and parse a sense table file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }
}

impl SenseLookup for SenseTable {
    fn senses(&self, word: &str) -> PosTags {
        self.senses.get(word).cloned().unwrap_or_default()
    }
}

/// Closed-class and verb word lists. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct WordSet {
    pub verbs: HashSet<String>,
    pub prepositions: HashSet<String>,
    pub articles: HashSet<String>,
}

impl Default for WordSet {
    fn default() -> Self {
        Self::from_lists(DEFAULT_VERBS, DEFAULT_PREPOSITIONS)
    }
}

impl WordSet {
    /// Build a word set from newline separated verb and preposition lists.
    pub fn from_lists(verbs: &str, prepositions: &str) -> Self {
        Self {
            verbs: parse_word_list(verbs),
            prepositions: parse_word_list(prepositions),
            articles: ARTICLES.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Load `verbs.txt` and `prepositions.txt` from a directory.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = |name: &str| -> Result<String> {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|e| {
                Error::LexiconError(format!("{}: {}", path.display(), e))
            })
        };
        let word_set = Self::from_lists(&read("verbs.txt")?, &read("prepositions.txt")?);
        log::debug!(
            "Loaded {} verbs and {} prepositions from {}",
            word_set.verbs.len(),
            word_set.prepositions.len(),
            dir.display()
        );
        Ok(word_set)
    }
}

fn parse_word_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
