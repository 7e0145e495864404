use std::{
    sync::mpsc::{
        self,
        Receiver,
        Sender,
    },
    time::Duration,
};

use tokio::runtime::Handle;
use tracing::{
    debug,
    info,
    warn,
};

use super::{
    speech::{
        CompletionSignal,
        SpeechEngine,
        Utterance,
    },
    ticker::SkimTicker,
    types::{
        PlaybackEvent,
        PlaybackListener,
        PlaybackRate,
        PlaybackState,
        SkimFrame,
        SKIM_TICK_INTERVAL,
    },
};
use crate::core::{
    tasks::RepaintHook,
    LectioError,
};

struct SkimSession {
    chars: Vec<char>,
    cursor: usize,
    ticker: SkimTicker,
}

impl SkimSession {
    fn length(&self) -> usize {
        self.chars.len()
    }

    fn frame(&self) -> SkimFrame {
        SkimFrame {
            cursor: self.cursor,
            length: self.length(),
            visible: self.chars[..self.cursor].iter().collect(),
            hidden: self.chars[self.cursor..].iter().collect(),
        }
    }
}

/// Owns the read-aloud and skimming modes of one unit view. At most one is active.
///
/// Engine completions and skim ticks arrive on a channel and are applied by [`poll`](Self::poll)
/// on the UI thread. Every start and stop bumps a generation counter, so a signal that was
/// already in flight when its mode ended is dropped instead of applied.
pub struct PlaybackController {
    state: PlaybackState,
    rate: PlaybackRate,
    generation: u64,
    engine: Box<dyn SpeechEngine>,
    skim: Option<SkimSession>,
    runtime: Handle,
    tick_interval: Duration,
    events_tx: Sender<PlaybackEvent>,
    events_rx: Receiver<PlaybackEvent>,
    listener: Box<dyn PlaybackListener>,
    repaint: Option<RepaintHook>,
}

impl PlaybackController {
    pub fn new(
        engine: Box<dyn SpeechEngine>,
        runtime: Handle,
        listener: Box<dyn PlaybackListener>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();

        Self {
            state: PlaybackState::Idle,
            rate: PlaybackRate::default(),
            generation: 0,
            engine,
            skim: None,
            runtime,
            tick_interval: SKIM_TICK_INTERVAL,
            events_tx,
            events_rx,
            listener,
            repaint: None,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_rate(mut self, rate: PlaybackRate) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_repaint(mut self, repaint: RepaintHook) -> Self {
        self.repaint = Some(repaint);
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    pub fn engine_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn start_read_aloud(&mut self, text: &str, rate: PlaybackRate) -> Result<(), LectioError> {
        self.rate = rate;

        match self.state {
            PlaybackState::Skimming { .. } => self.stop_skim(),
            PlaybackState::ReadingAloud { .. } => self.stop_read_aloud(),
            PlaybackState::Idle => {}
        }

        if !self.engine.is_available() {
            warn!("read aloud requested but no speech engine is available");
            return Err(LectioError::EngineUnavailable);
        }

        let generation = self.next_generation();
        let done = CompletionSignal::new(generation, self.events_tx.clone(), self.repaint.clone());
        self.engine.speak(Utterance { text: text.to_string(), rate }, done)?;

        info!(rate = %rate, chars = text.chars().count(), "read aloud started");
        self.set_state(PlaybackState::ReadingAloud { rate });
        Ok(())
    }

    pub fn stop_read_aloud(&mut self) {
        if !self.state.is_reading_aloud() {
            return;
        }

        self.next_generation();
        self.engine.cancel();

        info!("read aloud stopped");
        self.set_state(PlaybackState::Idle);
    }

    pub fn toggle_read_aloud(&mut self, text: &str) -> Result<(), LectioError> {
        if self.state.is_reading_aloud() {
            self.stop_read_aloud();
            Ok(())
        } else {
            self.start_read_aloud(text, self.rate)
        }
    }

    /// Stores the rate. While reading aloud it is pushed to the engine if the engine can
    /// retime a running utterance; otherwise it applies from the next start.
    pub fn set_rate(&mut self, rate: PlaybackRate) -> Result<(), LectioError> {
        self.rate = rate;

        match self.state {
            PlaybackState::ReadingAloud { .. } => {
                if self.engine.supports_live_rate() {
                    self.engine.set_rate(rate)?;
                } else {
                    debug!(rate = %rate, "engine cannot retime, rate applies on next start");
                }
                self.set_state(PlaybackState::ReadingAloud { rate });
            }
            PlaybackState::Skimming { cursor, length, .. } => {
                self.set_state(PlaybackState::Skimming { rate, cursor, length });
            }
            PlaybackState::Idle => {}
        }

        Ok(())
    }

    pub fn start_skim(&mut self, text: &str) {
        match self.state {
            PlaybackState::ReadingAloud { .. } => self.stop_read_aloud(),
            PlaybackState::Skimming { .. } => self.stop_skim(),
            PlaybackState::Idle => {}
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            debug!("nothing to skim");
            return;
        }

        let generation = self.next_generation();
        let ticker = SkimTicker::start(
            &self.runtime,
            self.tick_interval,
            generation,
            self.events_tx.clone(),
            self.repaint.clone(),
        );

        let length = chars.len();
        self.skim = Some(SkimSession { chars, cursor: 0, ticker });

        info!(chars = length, interval_ms = self.tick_interval.as_millis() as u64, "skimming started");
        self.set_state(PlaybackState::Skimming { rate: self.rate, cursor: 0, length });
    }

    pub fn stop_skim(&mut self) {
        if !self.state.is_skimming() {
            return;
        }

        self.end_skim();
        info!("skimming stopped");
        self.set_state(PlaybackState::Idle);
    }

    pub fn toggle_skim(&mut self, text: &str) {
        if self.state.is_skimming() {
            self.stop_skim();
        } else {
            self.start_skim(text);
        }
    }

    pub fn stop_all(&mut self) {
        self.stop_read_aloud();
        self.stop_skim();
    }

    /// Applies every queued signal. Returns how many changed the controller.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.handle_event(event) {
                applied += 1;
            }
        }
        applied
    }

    pub fn handle_event(&mut self, event: PlaybackEvent) -> bool {
        match event {
            PlaybackEvent::SpeechFinished { generation } => {
                if generation != self.generation || !self.state.is_reading_aloud() {
                    debug!(generation, current = self.generation, "stale speech completion ignored");
                    return false;
                }

                info!("read aloud finished");
                self.set_state(PlaybackState::Idle);
                true
            }
            PlaybackEvent::SkimTick { generation } => {
                match &self.skim {
                    Some(session) if session.ticker.generation() == generation => {
                        self.advance_skim();
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    fn advance_skim(&mut self) {
        let Some(session) = self.skim.as_mut() else {
            return;
        };

        let frame = session.frame();
        let complete = frame.is_complete();
        if !complete {
            session.cursor += 1;
        }
        let (cursor, length) = (session.cursor, session.length());

        self.listener.skim_frame(&frame);

        if complete {
            self.end_skim();
            info!(chars = length, "skimming complete");
            self.set_state(PlaybackState::Idle);
        } else {
            // Cursor steps are reported through `skim_frame` only.
            self.state = PlaybackState::Skimming { rate: self.rate, cursor, length };
        }
    }

    fn end_skim(&mut self) {
        self.next_generation();
        if let Some(session) = self.skim.take() {
            session.ticker.stop();
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        debug!(from = self.state.label(), to = state.label(), "playback state changed");
        self.state = state;
        self.listener.state_changed(&self.state);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if self.state.is_reading_aloud() {
            self.engine.cancel();
        }
    }
}
