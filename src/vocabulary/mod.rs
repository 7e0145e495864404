//! Vocabulary highlighting and per-session discovery tracking for one unit.

pub mod annotate;

use std::collections::HashSet;

use tracing::debug;

pub use annotate::{
    annotate,
    Annotated,
    Highlighter,
    Segment,
};

use crate::core::{
    normalize_word,
    LectioError,
    Unit,
    VocabEntry,
};

/// Lowercase lookup keys, one per vocabulary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    keys: HashSet<String>,
}

impl HighlightSet {
    pub fn contains(&self, word: &str) -> bool {
        self.keys.contains(&normalize_word(word))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl FromIterator<String> for HighlightSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            keys: iter
                .into_iter()
                .map(|word| normalize_word(&word))
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }
}

pub fn build_highlight_set(unit: &Unit) -> HighlightSet {
    unit.vocabulary.iter().map(|entry| entry.word.clone()).collect()
}

/// Words opened this session. Only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySet {
    words: HashSet<String>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the word was already discovered.
    pub fn insert(&mut self, word: &str) -> bool {
        self.words.insert(normalize_word(word))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize_word(word))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VocabStats {
    pub found: usize,
    pub remaining: usize,
}

pub fn stats(unit: &Unit, discovered: &DiscoverySet) -> VocabStats {
    let total = unit.vocabulary.len();
    let known = build_highlight_set(unit);
    let found = discovered.iter().filter(|word| known.contains(word)).count().min(total);

    VocabStats { found, remaining: total - found }
}

pub struct VocabularyIndex {
    entries: Vec<VocabEntry>,
    highlight_set: HighlightSet,
    highlighter: Highlighter,
    discovered: DiscoverySet,
}

impl VocabularyIndex {
    pub fn new(unit: &Unit) -> Result<Self, LectioError> {
        let highlight_set = build_highlight_set(unit);
        let highlighter = Highlighter::new(&highlight_set)?;

        Ok(Self {
            entries: unit.vocabulary.clone(),
            highlight_set,
            highlighter,
            discovered: DiscoverySet::new(),
        })
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn highlight_set(&self) -> &HighlightSet {
        &self.highlight_set
    }

    pub fn discovered(&self) -> &DiscoverySet {
        &self.discovered
    }

    pub fn entry(&self, word: &str) -> Option<&VocabEntry> {
        let key = normalize_word(word);
        self.entries.iter().find(|entry| entry.key() == key)
    }

    pub fn is_discovered(&self, word: &str) -> bool {
        self.discovered.contains(word)
    }

    /// Marks the word as discovered and returns its popup data.
    pub fn record_discovery(&mut self, word: &str) -> Result<&VocabEntry, LectioError> {
        let key = normalize_word(word);

        let Some(position) = self.entries.iter().position(|entry| entry.key() == key) else {
            return Err(LectioError::WordNotFound(word.to_string()));
        };

        if self.discovered.insert(&key) {
            debug!(word = %key, found = self.discovered.len(), "vocabulary word discovered");
        }

        Ok(&self.entries[position])
    }

    pub fn stats(&self) -> VocabStats {
        let total = self.entries.len();
        let found = self.discovered.len().min(total);
        VocabStats { found, remaining: total - found }
    }

    pub fn annotate(&self, text: &str) -> Annotated {
        self.highlighter.annotate(text)
    }

    pub fn annotate_paragraphs(&self, unit: &Unit) -> Vec<Annotated> {
        unit.paragraphs().map(|paragraph| self.highlighter.annotate(paragraph)).collect()
    }
}
