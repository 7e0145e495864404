use eframe::egui;

use crate::{
    core::{
        Book,
        BookStatus,
    },
    gui::theme::Theme,
};

const CARD_WIDTH: f32 = 240.0;

/// Draws the book cards. Returns the id of the book the user clicked, if any.
pub fn book_grid(ui: &mut egui::Ui, books: &[Book], theme: &Theme) -> Option<u32> {
    let mut opened = None;

    ui.heading(theme.heading(ui.ctx(), "Books"));
    ui.add_space(8.0);

    if books.is_empty() {
        ui.label(egui::RichText::new("The catalog has no books yet.").color(theme.muted(ui.ctx())));
        return None;
    }

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(12.0, 12.0);

            for book in books {
                if book_card(ui, book, theme) {
                    opened = Some(book.id);
                }
            }
        });
    });

    opened
}

fn book_card(ui: &mut egui::Ui, book: &Book, theme: &Theme) -> bool {
    let available = book.is_available();

    let frame = egui::Frame::group(ui.style()).inner_margin(12.0).show(ui, |ui| {
        ui.set_width(CARD_WIDTH);
        ui.set_min_height(120.0);

        ui.vertical(|ui| {
            ui.label(egui::RichText::new(&book.title).size(18.0).strong());
            if !book.description.is_empty() {
                ui.label(egui::RichText::new(&book.description).color(theme.muted(ui.ctx())));
            }
            ui.add_space(6.0);

            match book.status {
                BookStatus::Available => {
                    let units = book.units.len();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} unit{}",
                            units,
                            if units == 1 { "" } else { "s" }
                        ))
                        .color(theme.vocab(ui.ctx())),
                    );
                }
                BookStatus::ComingSoon => {
                    ui.label(egui::RichText::new("Coming soon").italics().color(theme.muted(ui.ctx())));
                }
            }
        });
    });

    if !available {
        return false;
    }

    let response = frame.response.interact(egui::Sense::click());
    let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
    response.clicked()
}
