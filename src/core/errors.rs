use thiserror::Error;

#[derive(Error, Debug)]
pub enum LectioError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("HTTP error: {0}")]
    Http(Box<reqwest::Error>),

    #[error("Failed to load content: {0}")]
    ContentFetchFailed(String),

    #[error("Invalid content: {0}")]
    ContentInvalid(String),

    #[error("Book {0} not found")]
    BookNotFound(u32),

    #[error("Unit {unit_id} not found in book {book_id}")]
    UnitNotFound { book_id: u32, unit_id: String },

    #[error("Word '{0}' is not part of this unit's vocabulary")]
    WordNotFound(String),

    #[error("Option {selected} is out of range ({options} options)")]
    InvalidSelection { selected: usize, options: usize },

    #[error("Exercise {0} has already been graded")]
    AlreadyGraded(usize),

    #[error("Exercise {0} not found")]
    ExerciseNotFound(usize),

    #[error("Speech engine is not available")]
    EngineUnavailable,

    #[error("Invalid reading speed: {0}")]
    InvalidRate(String),

    #[error("Profile is missing the {0} field")]
    ProfileIncomplete(&'static str),

    #[error("LectioError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for LectioError {
    fn from(error: std::io::Error) -> Self {
        LectioError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for LectioError {
    fn from(error: reqwest::Error) -> Self {
        LectioError::Http(Box::new(error))
    }
}
