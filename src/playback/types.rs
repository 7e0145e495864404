use std::{
    fmt,
    time::Duration,
};

use crate::core::LectioError;

pub const SKIM_TICK_INTERVAL: Duration = Duration::from_millis(20);

pub const MIN_SPEED: u32 = 50;
pub const MAX_SPEED: u32 = 300;
pub const DEFAULT_SPEED: u32 = 100;

/// Playback speed multiplier, 1.0 = normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRate(f32);

impl PlaybackRate {
    pub fn new(multiplier: f32) -> Result<Self, LectioError> {
        if multiplier.is_finite() && multiplier > 0.0 {
            Ok(Self(multiplier))
        } else {
            Err(LectioError::InvalidRate(format!("{multiplier} is not a positive multiplier")))
        }
    }

    /// Slider positions run from 50 to 300 (0.5x to 3.0x).
    pub fn from_slider(value: u32) -> Result<Self, LectioError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&value) {
            return Err(LectioError::InvalidRate(format!(
                "slider value {value} is outside {MIN_SPEED}..={MAX_SPEED}"
            )));
        }
        Self::new(value as f32 / 100.0)
    }

    pub fn multiplier(&self) -> f32 {
        self.0
    }

    pub fn slider_value(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    Idle,
    ReadingAloud { rate: PlaybackRate },
    /// `cursor` is the number of characters the next frame reveals.
    Skimming { rate: PlaybackRate, cursor: usize, length: usize },
}

impl PlaybackState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackState::Idle)
    }

    pub fn is_reading_aloud(&self) -> bool {
        matches!(self, PlaybackState::ReadingAloud { .. })
    }

    pub fn is_skimming(&self) -> bool {
        matches!(self, PlaybackState::Skimming { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::ReadingAloud { .. } => "reading_aloud",
            PlaybackState::Skimming { .. } => "skimming",
        }
    }
}

/// One step of the skim reveal. `hidden` keeps its layout space but is drawn invisibly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkimFrame {
    pub cursor: usize,
    pub length: usize,
    pub visible: String,
    pub hidden: String,
}

impl SkimFrame {
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.length
    }
}

/// Signals posted to the controller from the speech engine and the skim ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    SpeechFinished { generation: u64 },
    SkimTick { generation: u64 },
}

/// Receives state changes so toggles and the revealed text stay in sync.
pub trait PlaybackListener {
    fn state_changed(&mut self, state: &PlaybackState);

    fn skim_frame(&mut self, _frame: &SkimFrame) {}
}
