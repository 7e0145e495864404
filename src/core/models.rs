use serde::{
    Deserialize,
    Serialize,
};

pub const PARAGRAPH_DELIMITER: &str = "\n\n";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: BookStatus,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn first_unit(&self) -> Option<&Unit> {
        self.units.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Available,
    ComingSoon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,             // Dotted id such as "1.1"
    pub title: String,
    pub text: String,           // Paragraphs separated by a blank line
    #[serde(default)]
    pub vocabulary: Vec<VocabEntry>,
    #[serde(default)]
    pub grammar: GrammarNote,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Unit {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split(PARAGRAPH_DELIMITER).map(str::trim).filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: String,
}

impl VocabEntry {
    pub fn key(&self) -> String {
        normalize_word(&self.word)
    }
}

/// The one key form used for highlighting, lookups and discovery.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarNote {
    pub theme: String,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,         // Index into `options`
}
