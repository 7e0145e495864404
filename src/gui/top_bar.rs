use eframe::egui::{
    self,
    containers,
};

use crate::{
    gui::theme::Theme,
    persistence::{
        ThemePreference,
        UserProfile,
    },
};

pub enum TopBarAction {
    ShowBooks,
    Reload,
    SetTheme(ThemePreference),
    LogOut,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        theme: &Theme,
        profile: Option<&UserProfile>,
        preference: ThemePreference,
    ) -> Option<TopBarAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                ui.label(theme.heading(ctx, "Lectio"));
                ui.separator();

                if profile.is_some() && ui.button("Books").clicked() {
                    action = Some(TopBarAction::ShowBooks);
                }

                ui.menu_button("Settings", |ui| {
                    if ui
                        .selectable_label(preference == ThemePreference::Light, "Light theme")
                        .clicked()
                    {
                        action = Some(TopBarAction::SetTheme(ThemePreference::Light));
                    }
                    if ui.selectable_label(preference == ThemePreference::Dark, "Dark theme").clicked()
                    {
                        action = Some(TopBarAction::SetTheme(ThemePreference::Dark));
                    }
                    ui.separator();
                    if ui.button("Reload content").clicked() {
                        action = Some(TopBarAction::Reload);
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(profile) = profile {
                        if ui.button("Log out").clicked() {
                            action = Some(TopBarAction::LogOut);
                        }
                        ui.label(
                            egui::RichText::new(format!("Group {}", profile.group))
                                .color(theme.muted(ctx)),
                        );
                        ui.label(egui::RichText::new(profile.display_name()).strong());
                    }
                });
            });
        });

        action
    }
}
