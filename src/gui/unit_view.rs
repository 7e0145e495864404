use std::{
    cell::RefCell,
    rc::Rc,
};

use eframe::egui::{
    self,
    text::{
        LayoutJob,
        TextFormat,
    },
    Color32,
};
use tokio::runtime::Handle;
use tracing::warn;

use crate::{
    core::{
        tasks::RepaintHook,
        AppConfig,
    },
    exercises::option_label,
    gui::{
        theme::Theme,
        vocab_popup::VocabPopup,
    },
    playback::{
        PlaybackController,
        PlaybackListener,
        PlaybackRate,
        PlaybackState,
        SkimFrame,
        SpeechEngine,
        MAX_SPEED,
        MIN_SPEED,
    },
    session::UnitSession,
    vocabulary::{
        Annotated,
        Segment,
    },
};

pub enum UnitAction {
    Back,
}

/// What the controller last reported. `frame` is only set while a skim reveal is on screen.
pub struct PlaybackView {
    pub state: PlaybackState,
    pub frame: Option<SkimFrame>,
}

impl Default for PlaybackView {
    fn default() -> Self {
        Self { state: PlaybackState::Idle, frame: None }
    }
}

struct ViewListener(Rc<RefCell<PlaybackView>>);

impl PlaybackListener for ViewListener {
    fn state_changed(&mut self, state: &PlaybackState) {
        let mut view = self.0.borrow_mut();
        view.state = *state;
        if !state.is_skimming() {
            view.frame = None;
        }
    }

    fn skim_frame(&mut self, frame: &SkimFrame) {
        let mut view = self.0.borrow_mut();
        view.frame = if frame.is_complete() { None } else { Some(frame.clone()) };
    }
}

pub struct UnitPage {
    session: UnitSession,
    controller: PlaybackController,
    view: Rc<RefCell<PlaybackView>>,
    reading_text: String,
    speed: u32,
    popup: VocabPopup,
    playback_error: Option<String>,
    exercise_error: Option<String>,
}

impl UnitPage {
    pub fn new(
        session: UnitSession,
        engine: Box<dyn SpeechEngine>,
        runtime: Handle,
        config: &AppConfig,
        repaint: RepaintHook,
    ) -> Self {
        let view = Rc::new(RefCell::new(PlaybackView::default()));

        let rate = PlaybackRate::from_slider(config.default_speed).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring configured default speed");
            PlaybackRate::default()
        });

        let controller =
            PlaybackController::new(engine, runtime, Box::new(ViewListener(Rc::clone(&view))))
                .with_tick_interval(config.skim_interval())
                .with_rate(rate)
                .with_repaint(repaint);

        let reading_text = session.reading_text().to_string();

        Self {
            session,
            controller,
            view,
            reading_text,
            speed: rate.slider_value(),
            popup: VocabPopup::default(),
            playback_error: None,
            exercise_error: None,
        }
    }

    pub fn session(&self) -> &UnitSession {
        &self.session
    }

    /// Stops any playback before the page is dropped or hidden.
    pub fn stop(&mut self) {
        self.controller.stop_all();
        self.popup.close();
    }

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<UnitAction> {
        self.controller.poll();

        let mut action = None;
        let ctx = ui.ctx().clone();

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⬅ Books").clicked() {
                    action = Some(UnitAction::Back);
                }
                ui.label(egui::RichText::new(&self.session.book_title).color(theme.muted(&ctx)));
            });

            ui.heading(theme.heading(
                &ctx,
                &format!("{} {}", self.session.unit.id, self.session.unit.title),
            ));
            ui.add_space(6.0);

            self.show_playback_controls(ui, theme);
            ui.separator();
            self.show_text(ui, theme);

            ui.add_space(12.0);
            self.show_vocabulary(ui, theme);

            ui.add_space(12.0);
            self.show_grammar(ui, theme);

            ui.add_space(12.0);
            self.show_exercises(ui, theme);
        });

        self.popup.show(&ctx, theme);

        if action.is_some() {
            self.stop();
        }
        action
    }

    /// Marks the word as discovered and shows its card. Text and panel clicks both land here.
    fn open_word(&mut self, word: &str) {
        match self.session.vocabulary.record_discovery(word) {
            Ok(entry) => self.popup.open(entry),
            Err(e) => warn!(word = %word, error = %e, "clicked word has no entry"),
        }
    }

    fn skim_frame(&self) -> Option<SkimFrame> {
        self.view.borrow().frame.clone()
    }

    fn show_playback_controls(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let state = self.view.borrow().state;

        ui.horizontal(|ui| {
            let read_label = if state.is_reading_aloud() { "⏹ Stop reading" } else { "🔊 Read aloud" };
            let read_button = ui
                .add_enabled(self.controller.engine_available(), egui::Button::new(read_label))
                .on_disabled_hover_text("No speech engine is available on this system");
            if read_button.clicked() {
                self.playback_error = None;
                if let Err(e) = self.controller.toggle_read_aloud(&self.reading_text) {
                    warn!(error = %e, "read aloud failed");
                    self.playback_error = Some(e.to_string());
                }
            }

            let skim_label = if state.is_skimming() { "⏹ Stop skimming" } else { "👁 Skim" };
            if ui.button(skim_label).clicked() {
                self.playback_error = None;
                self.controller.toggle_skim(&self.reading_text);
            }

            ui.separator();
            ui.label("Speed");
            let slider = ui.add(egui::Slider::new(&mut self.speed, MIN_SPEED..=MAX_SPEED).show_value(false));
            if slider.changed() {
                match PlaybackRate::from_slider(self.speed)
                    .and_then(|rate| self.controller.set_rate(rate))
                {
                    Ok(()) => self.playback_error = None,
                    Err(e) => self.playback_error = Some(e.to_string()),
                }
            }
            ui.label(self.controller.rate().to_string());
        });

        if let Some(error) = &self.playback_error {
            ui.colored_label(theme.incorrect(ui.ctx()), error);
        }
    }

    fn show_text(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        if let Some(frame) = self.skim_frame() {
            ui.label(skim_layout(ui, &frame));
            return;
        }

        let mut clicked = None;
        for paragraph in &self.session.paragraphs {
            if let Some(word) = paragraph_ui(ui, paragraph, &self.session, theme) {
                clicked = Some(word);
            }
            ui.add_space(8.0);
        }

        if let Some(word) = clicked {
            self.open_word(&word);
        }
    }

    fn show_vocabulary(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let ctx = ui.ctx().clone();
        let stats = self.session.vocabulary.stats();

        ui.horizontal(|ui| {
            ui.heading(theme.heading(&ctx, "Vocabulary"));
            ui.label(
                egui::RichText::new(format!("Found: {}  Remaining: {}", stats.found, stats.remaining))
                    .color(theme.muted(&ctx)),
            );
        });

        let mut opened = None;
        ui.horizontal_wrapped(|ui| {
            for entry in self.session.vocabulary.entries() {
                let discovered = self.session.vocabulary.is_discovered(&entry.word);
                let card = egui::Frame::group(ui.style()).inner_margin(8.0).show(ui, |ui| {
                    ui.set_width(160.0);
                    let color = if discovered { theme.discovered(&ctx) } else { theme.vocab(&ctx) };
                    ui.label(egui::RichText::new(&entry.word).color(color).strong());
                    ui.label(&entry.translation);
                });
                let response = card
                    .response
                    .interact(egui::Sense::click())
                    .on_hover_cursor(egui::CursorIcon::PointingHand);
                if response.clicked() {
                    opened = Some(entry.word.clone());
                }
            }
        });

        if let Some(word) = opened {
            self.open_word(&word);
        }
    }

    fn show_grammar(&self, ui: &mut egui::Ui, theme: &Theme) {
        let grammar = &self.session.unit.grammar;
        if grammar.theme.is_empty() && grammar.description.is_empty() {
            return;
        }

        ui.heading(theme.heading(ui.ctx(), "Grammar"));
        egui::Frame::group(ui.style()).inner_margin(10.0).show(ui, |ui| {
            ui.label(egui::RichText::new(&grammar.theme).strong());
            ui.label(&grammar.description);
            for example in &grammar.examples {
                ui.label(format!("• {}", example));
            }
        });
    }

    fn show_exercises(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        if self.session.exercises.is_empty() {
            return;
        }

        let ctx = ui.ctx().clone();
        let score = self.session.exercises.score();

        ui.horizontal(|ui| {
            ui.heading(theme.heading(&ctx, "Exercises"));
            ui.label(
                egui::RichText::new(format!("{} / {} correct", score.correct, score.total))
                    .color(theme.muted(&ctx)),
            );
        });

        let mut picked = None;
        for (index, exercise) in self.session.exercises.exercises().iter().enumerate() {
            let outcome = self.session.exercises.outcome(index);

            egui::Frame::group(ui.style()).inner_margin(10.0).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(format!("{}. {}", index + 1, exercise.question)).strong());

                for (option_index, option) in exercise.options.iter().enumerate() {
                    let mut text =
                        egui::RichText::new(format!("{}. {}", option_label(option_index), option));

                    if let Some(outcome) = outcome {
                        if option_index == outcome.correct_index {
                            text = text.color(theme.correct(&ctx)).strong();
                        } else if option_index == outcome.selected {
                            text = text.color(theme.incorrect(&ctx)).strikethrough();
                        }
                    }

                    if ui.add_enabled(outcome.is_none(), egui::Button::new(text)).clicked() {
                        picked = Some((index, option_index));
                    }
                }

                if let Some(outcome) = outcome {
                    let (message, color) = if outcome.correct {
                        ("Correct!", theme.correct(&ctx))
                    } else {
                        ("Not quite. The right answer is highlighted.", theme.incorrect(&ctx))
                    };
                    ui.colored_label(color, message);
                }
            });
            ui.add_space(6.0);
        }

        if let Some((index, selected)) = picked {
            match self.session.exercises.grade(index, selected) {
                Ok(_) => self.exercise_error = None,
                Err(e) => self.exercise_error = Some(e.to_string()),
            }
        }

        if let Some(error) = &self.exercise_error {
            ui.colored_label(theme.incorrect(&ctx), error);
        }
    }
}

/// Renders one paragraph with clickable vocabulary. Returns the key of a clicked word.
fn paragraph_ui(
    ui: &mut egui::Ui,
    paragraph: &Annotated,
    session: &UnitSession,
    theme: &Theme,
) -> Option<String> {
    let mut clicked = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;

        for segment in &paragraph.segments {
            match segment {
                Segment::Plain(text) => {
                    ui.label(text);
                }
                Segment::Vocab { text, key } => {
                    let color = if session.vocabulary.is_discovered(key) {
                        theme.discovered(ui.ctx())
                    } else {
                        theme.vocab(ui.ctx())
                    };
                    let response = ui
                        .add(
                            egui::Label::new(egui::RichText::new(text).color(color).underline())
                                .sense(egui::Sense::click()),
                        )
                        .on_hover_cursor(egui::CursorIcon::PointingHand);
                    if response.clicked() {
                        clicked = Some(key.clone());
                    }
                }
            }
        }
    });

    clicked
}

/// Revealed part in the normal text color, the rest transparent so the layout does not jump.
fn skim_layout(ui: &egui::Ui, frame: &SkimFrame) -> LayoutJob {
    let font_id = egui::TextStyle::Body.resolve(ui.style());
    let mut job = LayoutJob::default();
    job.wrap.max_width = ui.available_width();

    job.append(
        &frame.visible,
        0.0,
        TextFormat { font_id: font_id.clone(), color: ui.visuals().text_color(), ..Default::default() },
    );
    job.append(
        &frame.hidden,
        0.0,
        TextFormat { font_id, color: Color32::TRANSPARENT, ..Default::default() },
    );

    job
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        thread,
        time::{
            Duration,
            Instant,
        },
    };

    use tokio::runtime::Runtime;

    use super::*;
    use crate::{
        content::{
            tests::SAMPLE_CATALOG,
            ContentStore,
        },
        playback::UnavailableSpeechEngine,
    };

    fn unit_page(runtime: &Runtime, config: &AppConfig) -> UnitPage {
        let store = ContentStore::from_json(SAMPLE_CATALOG).unwrap();
        let session = UnitSession::open(&store, 1, "1.1").unwrap();
        UnitPage::new(
            session,
            Box::new(UnavailableSpeechEngine),
            runtime.handle().clone(),
            config,
            Arc::new(|| {}),
        )
    }

    #[test]
    fn test_panel_card_discovers_word() {
        let runtime = Runtime::new().unwrap();
        let mut page = unit_page(&runtime, &AppConfig::default());
        assert!(!page.session.vocabulary.is_discovered("cat"));

        page.open_word("Cat");

        assert!(page.session.vocabulary.is_discovered("cat"));
        assert_eq!(page.popup.entry().map(|entry| entry.translation.as_str()), Some("un chat"));
    }

    #[test]
    fn test_unknown_word_opens_nothing() {
        let runtime = Runtime::new().unwrap();
        let mut page = unit_page(&runtime, &AppConfig::default());

        page.open_word("dog");

        assert!(page.popup.entry().is_none());
        assert_eq!(page.session.vocabulary.stats().found, 0);
    }

    #[test]
    fn test_stopping_skim_restores_annotated_text() {
        let runtime = Runtime::new().unwrap();
        let mut page = unit_page(&runtime, &AppConfig::default());

        page.controller.toggle_skim(&page.reading_text);
        let deadline = Instant::now() + Duration::from_secs(5);
        while page.skim_frame().is_none() && Instant::now() < deadline {
            page.controller.poll();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(page.skim_frame().is_some());
        assert!(page.view.borrow().state.is_skimming());

        page.controller.toggle_skim(&page.reading_text);
        page.controller.poll();

        assert!(page.skim_frame().is_none());
        assert!(page.view.borrow().state.is_idle());
        assert_eq!(page.session.paragraphs.len(), 2);
        assert_eq!(page.session.paragraphs[0].vocab_keys().collect::<Vec<_>>(), vec!["cat"]);
    }

    #[test]
    fn test_view_listener_tracks_skim() {
        let view = Rc::new(RefCell::new(PlaybackView::default()));
        let mut listener = ViewListener(Rc::clone(&view));
        let rate = PlaybackRate::default();

        listener.state_changed(&PlaybackState::Skimming { rate, cursor: 0, length: 3 });
        listener.skim_frame(&SkimFrame {
            cursor: 1,
            length: 3,
            visible: "a".to_string(),
            hidden: "bc".to_string(),
        });
        assert_eq!(view.borrow().frame.as_ref().map(|f| f.visible.as_str()), Some("a"));

        listener.skim_frame(&SkimFrame {
            cursor: 3,
            length: 3,
            visible: "abc".to_string(),
            hidden: String::new(),
        });
        assert!(view.borrow().frame.is_none());

        listener.state_changed(&PlaybackState::Idle);
        assert!(view.borrow().state.is_idle());
        assert!(view.borrow().frame.is_none());
    }

    #[test]
    fn test_stop_clears_frame() {
        let view = Rc::new(RefCell::new(PlaybackView::default()));
        let mut listener = ViewListener(Rc::clone(&view));

        listener.skim_frame(&SkimFrame {
            cursor: 2,
            length: 5,
            visible: "he".to_string(),
            hidden: "llo".to_string(),
        });
        assert!(view.borrow().frame.is_some());

        listener.state_changed(&PlaybackState::Idle);
        assert!(view.borrow().frame.is_none());
    }
}
