pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod models;
pub mod tasks;

pub use config::AppConfig;
pub use errors::LectioError;
pub use models::{
    normalize_word,
    Book,
    BookStatus,
    Catalog,
    Exercise,
    GrammarNote,
    Unit,
    VocabEntry,
};
