//! Read-aloud and skimming playback for the unit reader.

pub mod controller;
pub mod speech;
pub mod ticker;
pub mod types;

pub use controller::PlaybackController;
pub use speech::{
    CommandSpeechEngine,
    CompletionSignal,
    SpeechEngine,
    UnavailableSpeechEngine,
    Utterance,
};
pub use types::{
    PlaybackEvent,
    PlaybackListener,
    PlaybackRate,
    PlaybackState,
    SkimFrame,
    DEFAULT_SPEED,
    MAX_SPEED,
    MIN_SPEED,
    SKIM_TICK_INTERVAL,
};

use crate::core::config::SpeechSettings;

pub fn speech_engine_from(settings: &SpeechSettings) -> Box<dyn SpeechEngine> {
    if settings.enabled {
        Box::new(CommandSpeechEngine::new(settings))
    } else {
        Box::new(UnavailableSpeechEngine)
    }
}
