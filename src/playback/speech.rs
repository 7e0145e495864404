use std::{
    io::Write,
    process::{
        Child,
        Command,
        Stdio,
    },
    sync::{
        mpsc::Sender,
        Arc,
        Mutex,
    },
    thread,
    time::Duration,
};

use tracing::{
    debug,
    info,
    warn,
};

use super::types::{
    PlaybackEvent,
    PlaybackRate,
};
use crate::core::{
    config::SpeechSettings,
    tasks::RepaintHook,
    LectioError,
};

const CHILD_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: PlaybackRate,
}

/// Posted by the engine once its utterance ends on its own.
pub struct CompletionSignal {
    generation: u64,
    events: Sender<PlaybackEvent>,
    repaint: Option<RepaintHook>,
}

impl CompletionSignal {
    pub(crate) fn new(
        generation: u64,
        events: Sender<PlaybackEvent>,
        repaint: Option<RepaintHook>,
    ) -> Self {
        Self { generation, events, repaint }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn complete(self) {
        let _ = self.events.send(PlaybackEvent::SpeechFinished { generation: self.generation });
        if let Some(repaint) = &self.repaint {
            repaint();
        }
    }
}

pub trait SpeechEngine {
    fn is_available(&self) -> bool;

    fn speak(&mut self, utterance: Utterance, done: CompletionSignal) -> Result<(), LectioError>;

    /// Stops the current utterance at once. Its completion signal must not be sent afterwards.
    fn cancel(&mut self);

    /// Whether `set_rate` retimes the utterance that is already playing.
    fn supports_live_rate(&self) -> bool {
        false
    }

    fn set_rate(&mut self, _rate: PlaybackRate) -> Result<(), LectioError> {
        Ok(())
    }
}

/// Used when speech is disabled or no synthesizer is installed.
pub struct UnavailableSpeechEngine;

impl SpeechEngine for UnavailableSpeechEngine {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: Utterance, _done: CompletionSignal) -> Result<(), LectioError> {
        Err(LectioError::EngineUnavailable)
    }

    fn cancel(&mut self) {}
}

type ChildSlot = Arc<Mutex<Option<Child>>>;

/// Speaks through an external synthesizer (`espeak-ng` compatible: `-s <wpm> --stdin`).
pub struct CommandSpeechEngine {
    program: String,
    words_per_minute: u32,
    available: bool,
    current: Option<ChildSlot>,
}

impl CommandSpeechEngine {
    pub fn new(settings: &SpeechSettings) -> Self {
        let available = settings.enabled && answers_version(&settings.program);
        if available {
            info!(program = %settings.program, "speech engine ready");
        } else {
            warn!(program = %settings.program, enabled = settings.enabled, "speech engine unavailable");
        }

        Self {
            program: settings.program.clone(),
            words_per_minute: settings.words_per_minute,
            available,
            current: None,
        }
    }

    fn words_per_minute_at(&self, rate: PlaybackRate) -> u32 {
        ((self.words_per_minute as f32) * rate.multiplier()).round().max(1.0) as u32
    }
}

impl SpeechEngine for CommandSpeechEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, utterance: Utterance, done: CompletionSignal) -> Result<(), LectioError> {
        if !self.available {
            return Err(LectioError::EngineUnavailable);
        }

        self.cancel();

        let speed = self.words_per_minute_at(utterance.rate);
        let mut child = Command::new(&self.program)
            .arg("-s")
            .arg(speed.to_string())
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LectioError::Custom(format!("Failed to start {}: {}", self.program, e)))?;

        let stdin = child.stdin.take();
        let text = utterance.text;

        debug!(
            program = %self.program,
            wpm = speed,
            chars = text.len(),
            generation = done.generation(),
            "utterance started"
        );

        let slot: ChildSlot = Arc::new(Mutex::new(Some(child)));
        self.current = Some(slot.clone());
        thread::spawn(move || {
            // The pipe may be smaller than the text, so the write happens off the UI thread.
            if let Some(stdin) = stdin {
                feed(stdin, &text);
            }
            wait_for_exit(slot, done);
        });

        Ok(())
    }

    fn cancel(&mut self) {
        let Some(slot) = self.current.take() else {
            return;
        };

        let Ok(mut guard) = slot.lock() else {
            return;
        };

        if let Some(mut child) = guard.take() {
            let _ = child.kill();
            let _ = child.wait();
            debug!(program = %self.program, "utterance cancelled");
        }
    }
}

impl Drop for CommandSpeechEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

// An emptied slot means the utterance was cancelled, so no signal is sent.
fn wait_for_exit(slot: ChildSlot, done: CompletionSignal) {
    loop {
        {
            let Ok(mut guard) = slot.lock() else {
                return;
            };

            let finished = match guard.as_mut() {
                None => return,
                Some(child) => match child.try_wait() {
                    Ok(Some(status)) => {
                        debug!(%status, "utterance finished");
                        true
                    }
                    Ok(None) => false,
                    Err(e) => {
                        warn!(error = %e, "lost track of speech process");
                        true
                    }
                },
            };

            if finished {
                guard.take();
                drop(guard);
                done.complete();
                return;
            }
        }

        thread::sleep(CHILD_POLL_INTERVAL);
    }
}

// Dropping `stdin` afterwards closes the pipe so the synthesizer sees the end of the text.
fn feed(mut stdin: impl Write, text: &str) {
    if let Err(e) = stdin.write_all(text.as_bytes()) {
        debug!(error = %e, "speech input not fully written");
    }
}

fn answers_version(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let settings = SpeechSettings {
            enabled: true,
            program: "lectio-no-such-synthesizer".to_string(),
            words_per_minute: 175,
        };
        let mut engine = CommandSpeechEngine::new(&settings);
        assert!(!engine.is_available());

        let (sender, receiver) = mpsc::channel();
        let result = engine.speak(
            Utterance { text: "hello".to_string(), rate: PlaybackRate::default() },
            CompletionSignal::new(1, sender, None),
        );
        assert!(matches!(result, Err(LectioError::EngineUnavailable)));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_speed_follows_rate() {
        let settings = SpeechSettings { enabled: false, ..SpeechSettings::default() };
        let engine = CommandSpeechEngine::new(&settings);

        assert_eq!(engine.words_per_minute_at(PlaybackRate::default()), 175);
        assert_eq!(engine.words_per_minute_at(PlaybackRate::from_slider(200).unwrap()), 350);
    }

    #[test]
    fn test_speak_does_not_wait_for_input_to_drain() {
        // `cat` rejects `--stdin` and exits without reading, so a large text can never drain.
        let settings =
            SpeechSettings { enabled: true, program: "cat".to_string(), words_per_minute: 175 };
        let mut engine = CommandSpeechEngine::new(&settings);
        if !engine.is_available() {
            return;
        }

        let (sender, receiver) = mpsc::channel();
        let text = "word ".repeat(200_000);
        let result = engine.speak(
            Utterance { text, rate: PlaybackRate::default() },
            CompletionSignal::new(4, sender, None),
        );
        assert!(result.is_ok());

        let event = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event, PlaybackEvent::SpeechFinished { generation: 4 });
    }

    #[test]
    fn test_feed_writes_whole_text() {
        let mut written = Vec::new();
        feed(&mut written, "hello there");
        assert_eq!(written, b"hello there");
    }

    #[test]
    fn test_completion_signal_carries_generation() {
        let (sender, receiver) = mpsc::channel();
        let signal = CompletionSignal::new(7, sender, None);
        assert_eq!(signal.generation(), 7);

        signal.complete();
        assert_eq!(receiver.try_recv().unwrap(), PlaybackEvent::SpeechFinished { generation: 7 });
    }
}
