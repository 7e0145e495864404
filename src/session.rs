use tracing::info;

use crate::{
    content::ContentStore,
    core::{
        LectioError,
        Unit,
    },
    exercises::ExerciseSession,
    vocabulary::{
        Annotated,
        VocabularyIndex,
    },
};

/// Everything one open unit needs. Dropped on navigation, which also drops the discoveries.
pub struct UnitSession {
    pub book_id: u32,
    pub book_title: String,
    pub unit: Unit,
    pub paragraphs: Vec<Annotated>,
    pub vocabulary: VocabularyIndex,
    pub exercises: ExerciseSession,
}

impl UnitSession {
    pub fn open(store: &ContentStore, book_id: u32, unit_id: &str) -> Result<Self, LectioError> {
        let book = store.book(book_id)?;
        let unit = store.resolve(book_id, unit_id)?.clone();

        let vocabulary = VocabularyIndex::new(&unit)?;
        let paragraphs = vocabulary.annotate_paragraphs(&unit);
        let exercises = ExerciseSession::new(unit.exercises.clone());

        info!(book = book_id, unit = %unit.id, words = unit.vocabulary.len(), "unit opened");

        Ok(Self {
            book_id,
            book_title: book.title.clone(),
            unit,
            paragraphs,
            vocabulary,
            exercises,
        })
    }

    /// Text handed to playback. The raw unit text, so the skim cursor runs to its full length.
    pub fn reading_text(&self) -> &str {
        &self.unit.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::tests::SAMPLE_CATALOG,
        vocabulary::VocabStats,
    };

    #[test]
    fn test_open_unit_session() {
        let store = ContentStore::from_json(SAMPLE_CATALOG).unwrap();
        let mut session = UnitSession::open(&store, 1, "1.1").unwrap();

        assert_eq!(session.book_title, "First Steps");
        assert_eq!(session.paragraphs.len(), 2);
        assert_eq!(session.paragraphs[0].vocab_keys().collect::<Vec<_>>(), vec!["cat"]);
        // "category" and "cats" are different words.
        assert_eq!(session.paragraphs[1].vocab_keys().count(), 0);

        session.vocabulary.record_discovery("cat").unwrap();
        assert_eq!(session.vocabulary.stats(), VocabStats { found: 1, remaining: 0 });

        let outcome = session.exercises.grade(0, 1).unwrap();
        assert!(outcome.correct);
        assert!(matches!(session.exercises.grade(0, 0), Err(LectioError::AlreadyGraded(0))));

        assert_eq!(session.reading_text(), "The cat sat.\n\nA category of cats.");
    }

    #[test]
    fn test_every_highlight_can_be_discovered() {
        let catalog = SAMPLE_CATALOG
            .replace("\"word\": \"cat\"", "\"word\": \" Cat \"")
            .replace("The cat sat.", "The CAT sat. My cat purrs.");
        let store = ContentStore::from_json(&catalog).unwrap();
        let mut session = UnitSession::open(&store, 1, "1.1").unwrap();

        let keys: Vec<String> = session
            .paragraphs
            .iter()
            .flat_map(|paragraph| paragraph.vocab_keys().map(str::to_string).collect::<Vec<_>>())
            .collect();
        assert_eq!(keys.len(), 2);

        for key in &keys {
            assert!(session.vocabulary.record_discovery(key).is_ok(), "{} not discoverable", key);
        }
        assert_eq!(session.vocabulary.stats(), VocabStats { found: 1, remaining: 0 });
    }

    #[test]
    fn test_reading_text_is_the_raw_unit_text() {
        let catalog = SAMPLE_CATALOG.replace("A category of cats.", "  A category of cats.\\n\\n\\n");
        let store = ContentStore::from_json(&catalog).unwrap();
        let session = UnitSession::open(&store, 1, "1.1").unwrap();

        assert_eq!(session.reading_text(), "The cat sat.\n\n  A category of cats.\n\n\n");
        assert_eq!(session.paragraphs.len(), 2);
    }

    #[test]
    fn test_open_unknown_unit() {
        let store = ContentStore::from_json(SAMPLE_CATALOG).unwrap();
        assert!(matches!(
            UnitSession::open(&store, 1, "9.9"),
            Err(LectioError::UnitNotFound { .. })
        ));
        assert!(matches!(UnitSession::open(&store, 3, "1.1"), Err(LectioError::BookNotFound(3))));
    }
}
