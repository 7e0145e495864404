use eframe::egui;

use crate::{
    core::VocabEntry,
    gui::theme::Theme,
};

/// Popup for a clicked vocabulary word. Holds a copy of the entry so it can outlive the click.
#[derive(Default)]
pub struct VocabPopup {
    entry: Option<VocabEntry>,
}

impl VocabPopup {
    pub fn open(&mut self, entry: &VocabEntry) {
        self.entry = Some(entry.clone());
    }

    pub fn close(&mut self) {
        self.entry = None;
    }

    pub(crate) fn entry(&self) -> Option<&VocabEntry> {
        self.entry.as_ref()
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) {
        let Some(entry) = self.entry() else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("vocab_popup")).show(ctx, |ui| {
            ui.set_width(360.0);

            ui.label(egui::RichText::new(&entry.word).size(24.0).color(theme.vocab(ctx)).strong());
            ui.label(egui::RichText::new(&entry.translation).italics());
            ui.separator();

            if !entry.definition.is_empty() {
                ui.label(&entry.definition);
            }

            if !entry.example.is_empty() {
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new("Example:").color(theme.muted(ctx)));
                    ui.label(egui::RichText::new(&entry.example).italics());
                });
            }

            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    ui.close();
                }
            });
        });

        if modal.should_close() {
            self.entry = None;
        }
    }
}
