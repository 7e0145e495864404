use std::{
    fmt,
    path::PathBuf,
};

use tracing::{
    debug,
    info,
};

use crate::core::{
    http::{
        fetch_text,
        http_client,
        is_remote,
    },
    Book,
    Catalog,
    LectioError,
    Unit,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Url(String),
}

impl ContentSource {
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if is_remote(source) {
            ContentSource::Url(source.to_string())
        } else {
            ContentSource::File(PathBuf::from(source))
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::File(path) => write!(f, "{}", path.display()),
            ContentSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Read-only view over one fetched catalog.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    catalog: Catalog,
}

impl ContentStore {
    /// Units are validated one at a time in [`resolve`](Self::resolve), so a broken unit
    /// never hides the rest of the catalog.
    pub fn new(catalog: Catalog) -> Result<Self, LectioError> {
        Ok(Self { catalog })
    }

    pub fn from_json(json: &str) -> Result<Self, LectioError> {
        let catalog = serde_json::from_str::<Catalog>(json)
            .map_err(|e| LectioError::ContentFetchFailed(format!("Malformed catalog: {}", e)))?;
        Self::new(catalog)
    }

    /// Fetches once. There is no retry; the caller reports the failure.
    pub async fn fetch(source: &ContentSource) -> Result<Self, LectioError> {
        info!(source = %source, "fetching catalog");

        let json = match source {
            ContentSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                LectioError::ContentFetchFailed(format!("{}: {}", path.display(), e))
            })?,
            ContentSource::Url(url) => {
                let client = http_client()?;
                fetch_text(&client, url).await?
            }
        };

        let store = Self::from_json(&json)?;
        debug!(books = store.catalog.books.len(), "catalog loaded");
        Ok(store)
    }

    pub fn books(&self) -> &[Book] {
        &self.catalog.books
    }

    pub fn book(&self, book_id: u32) -> Result<&Book, LectioError> {
        self.catalog
            .books
            .iter()
            .find(|book| book.id == book_id)
            .ok_or(LectioError::BookNotFound(book_id))
    }

    pub fn resolve(&self, book_id: u32, unit_id: &str) -> Result<&Unit, LectioError> {
        let unit = self.book(book_id)?.units.iter().find(|unit| unit.id == unit_id).ok_or_else(
            || LectioError::UnitNotFound { book_id, unit_id: unit_id.to_string() },
        )?;

        validate_unit(book_id, unit)?;
        Ok(unit)
    }
}

fn validate_unit(book_id: u32, unit: &Unit) -> Result<(), LectioError> {
    for (index, exercise) in unit.exercises.iter().enumerate() {
        if exercise.options.len() < 2 {
            return Err(LectioError::ContentInvalid(format!(
                "book {} unit {} exercise {} needs at least two options",
                book_id,
                unit.id,
                index + 1
            )));
        }
        if exercise.correct >= exercise.options.len() {
            return Err(LectioError::ContentInvalid(format!(
                "book {} unit {} exercise {} marks option {} correct but has {} options",
                book_id,
                unit.id,
                index + 1,
                exercise.correct,
                exercise.options.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_CATALOG: &str = r#"{
        "books": [
            {
                "id": 1,
                "title": "First Steps",
                "description": "Beginner readings",
                "status": "available",
                "units": [
                    {
                        "id": "1.1",
                        "title": "The Cat",
                        "text": "The cat sat.\n\nA category of cats.",
                        "vocabulary": [
                            { "word": "cat", "translation": "un chat", "definition": "A small pet.", "example": "The cat sleeps." }
                        ],
                        "grammar": { "theme": "Articles", "description": "Use 'the' for known things.", "examples": ["The cat"] },
                        "exercises": [
                            { "question": "2+2?", "options": ["3", "4", "5"], "correct": 1 }
                        ]
                    }
                ]
            },
            { "id": 2, "title": "Next Steps", "description": "", "status": "coming_soon" }
        ]
    }"#;

    #[test]
    fn test_resolve_unit() {
        let store = ContentStore::from_json(SAMPLE_CATALOG).unwrap();
        let unit = store.resolve(1, "1.1").unwrap();

        assert_eq!(unit.title, "The Cat");
        assert_eq!(unit.paragraphs().collect::<Vec<_>>(), vec!["The cat sat.", "A category of cats."]);
        assert!(store.book(1).unwrap().is_available());
        assert!(!store.book(2).unwrap().is_available());
        assert!(store.book(2).unwrap().units.is_empty());
    }

    #[test]
    fn test_unresolvable_ids() {
        let store = ContentStore::from_json(SAMPLE_CATALOG).unwrap();

        assert!(matches!(store.resolve(9, "1.1"), Err(LectioError::BookNotFound(9))));
        match store.resolve(1, "4.2") {
            Err(LectioError::UnitNotFound { book_id, unit_id }) => {
                assert_eq!(book_id, 1);
                assert_eq!(unit_id, "4.2");
            }
            other => panic!("Expected UnitNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_and_invalid_content() {
        assert!(matches!(
            ContentStore::from_json("{ \"books\": "),
            Err(LectioError::ContentFetchFailed(_))
        ));

        let bad_exercise = SAMPLE_CATALOG.replace("\"correct\": 1", "\"correct\": 3");
        let store = ContentStore::from_json(&bad_exercise).unwrap();
        assert_eq!(store.books().len(), 2);
        assert!(matches!(store.resolve(1, "1.1"), Err(LectioError::ContentInvalid(_))));

        let one_option = SAMPLE_CATALOG.replace("[\"3\", \"4\", \"5\"]", "[\"4\"]");
        let store = ContentStore::from_json(&one_option).unwrap();
        assert!(matches!(store.resolve(1, "1.1"), Err(LectioError::ContentInvalid(_))));
    }

    #[test]
    fn test_broken_unit_leaves_other_books_usable() {
        let catalog = r#"{
            "books": [
                {
                    "id": 1,
                    "title": "First Steps",
                    "status": "available",
                    "units": [
                        { "id": "1.1", "title": "Fine", "text": "All good.",
                          "exercises": [{ "question": "1+1?", "options": ["2", "3"], "correct": 0 }] }
                    ]
                },
                {
                    "id": 2,
                    "title": "Broken",
                    "status": "available",
                    "units": [
                        { "id": "2.1", "title": "Bad", "text": "Oops.",
                          "exercises": [{ "question": "?", "options": ["a", "b"], "correct": 5 }] }
                    ]
                }
            ]
        }"#;

        let store = ContentStore::from_json(catalog).unwrap();
        assert_eq!(store.books().len(), 2);
        assert_eq!(store.resolve(1, "1.1").unwrap().title, "Fine");
        assert!(store.book(2).unwrap().is_available());
        assert!(matches!(store.resolve(2, "2.1"), Err(LectioError::ContentInvalid(_))));
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!(
            ContentSource::parse("https://example.org/books.json"),
            ContentSource::Url("https://example.org/books.json".to_string())
        );
        assert_eq!(
            ContentSource::parse(" data/books.json "),
            ContentSource::File(PathBuf::from("data/books.json"))
        );
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails() {
        let source = ContentSource::File(PathBuf::from("/nonexistent/lectio/books.json"));
        assert!(matches!(
            ContentStore::fetch(&source).await,
            Err(LectioError::ContentFetchFailed(_))
        ));
    }
}
