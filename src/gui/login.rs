use eframe::egui;

use crate::{
    gui::theme::Theme,
    persistence::UserProfile,
};

#[derive(Default)]
pub struct LoginForm {
    name: String,
    surname: String,
    group: String,
    error: Option<String>,
}

impl LoginForm {
    /// Returns the new profile once the form is submitted with every field filled in.
    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<UserProfile> {
        let mut submitted = None;

        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading(theme.heading(ui.ctx(), "Welcome to the reading room"));
            ui.label("Sign in to continue to your books.");
            ui.add_space(20.0);

            egui::Frame::group(ui.style()).inner_margin(16.0).show(ui, |ui| {
                ui.set_max_width(320.0);

                egui::Grid::new("login_form").num_columns(2).spacing([12.0, 10.0]).show(ui, |ui| {
                    ui.label("Name");
                    ui.add(egui::TextEdit::singleline(&mut self.name).hint_text("First name"));
                    ui.end_row();

                    ui.label("Surname");
                    ui.add(egui::TextEdit::singleline(&mut self.surname).hint_text("Last name"));
                    ui.end_row();

                    ui.label("Group");
                    let group = ui.add(egui::TextEdit::singleline(&mut self.group).hint_text("e.g. B2"));
                    ui.end_row();

                    let entered =
                        group.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    ui.label("");
                    if ui.button("Start reading").clicked() || entered {
                        match UserProfile::new(&self.name, &self.surname, &self.group) {
                            Ok(profile) => {
                                self.error = None;
                                submitted = Some(profile);
                            }
                            Err(e) => self.error = Some(e.to_string()),
                        }
                    }
                    ui.end_row();
                });

                if let Some(error) = &self.error {
                    ui.add_space(8.0);
                    ui.colored_label(theme.incorrect(ui.ctx()), error);
                }
            });
        });

        if submitted.is_some() {
            *self = Self::default();
        }
        submitted
    }
}
