use eframe::egui::{
    self,
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    Stroke,
    Visuals,
};

use crate::persistence::ThemePreference;

#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
}

impl Default for Theme {
    fn default() -> Self {
        Self::classroom()
    }
}

impl Theme {
    pub fn classroom() -> Self {
        Theme { dark: ThemeDetails::chalkboard(), light: ThemeDetails::paper() }
    }

    fn details(&self, ctx: &egui::Context) -> &ThemeDetails {
        if ctx.style().visuals.dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn vocab(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).accent
    }

    pub fn discovered(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).muted_accent
    }

    pub fn correct(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).green
    }

    pub fn incorrect(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).red
    }

    pub fn muted(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).comment
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> egui::RichText {
        egui::RichText::new(content).color(self.details(ctx).heading).strong()
    }
}

#[derive(Clone)]
struct ThemeDetails {
    background: Color32,
    background_dark: Color32,
    background_light: Color32,
    foreground: Color32,
    selection: Color32,
    comment: Color32,
    heading: Color32,
    accent: Color32,
    muted_accent: Color32,
    green: Color32,
    red: Color32,
}

impl ThemeDetails {
    fn paper() -> Self {
        Self {
            background: Color32::from_rgb(0xfa, 0xf8, 0xf3),
            background_dark: Color32::from_rgb(0xef, 0xeb, 0xe1),
            background_light: Color32::from_rgb(0xff, 0xff, 0xff),
            foreground: Color32::from_rgb(0x2b, 0x2d, 0x42),
            selection: Color32::from_rgb(0xd8, 0xe2, 0xf0),
            comment: Color32::from_rgb(0x80, 0x84, 0x96),
            heading: Color32::from_rgb(0x3a, 0x50, 0x8c),
            accent: Color32::from_rgb(0x2f, 0x6f, 0xd6),
            muted_accent: Color32::from_rgb(0x7a, 0x5c, 0xc2),
            green: Color32::from_rgb(0x2e, 0x9e, 0x5b),
            red: Color32::from_rgb(0xd1, 0x45, 0x45),
        }
    }

    fn chalkboard() -> Self {
        Self {
            background: Color32::from_rgb(0x23, 0x2a, 0x2e),
            background_dark: Color32::from_rgb(0x1b, 0x21, 0x24),
            background_light: Color32::from_rgb(0x2f, 0x38, 0x3d),
            foreground: Color32::from_rgb(0xee, 0xee, 0xe6),
            selection: Color32::from_rgb(0x3e, 0x4b, 0x52),
            comment: Color32::from_rgb(0x8d, 0x99, 0x9e),
            heading: Color32::from_rgb(0xf3, 0xd9, 0x8b),
            accent: Color32::from_rgb(0x7f, 0xc8, 0xf8),
            muted_accent: Color32::from_rgb(0xc3, 0xa6, 0xf5),
            green: Color32::from_rgb(0x6f, 0xd0, 0x8c),
            red: Color32::from_rgb(0xf2, 0x7d, 0x72),
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
}

pub fn apply_preference(ctx: &egui::Context, preference: ThemePreference) {
    let variant = match preference {
        ThemePreference::Dark => egui::Theme::Dark,
        ThemePreference::Light => egui::Theme::Light,
    };

    ctx.set_theme(variant);
    ctx.options_mut(|o| {
        o.theme_preference = match preference {
            ThemePreference::Dark => egui::ThemePreference::Dark,
            ThemePreference::Light => egui::ThemePreference::Light,
        };
    });
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: WidgetVisuals {
                    bg_fill: theme.background,
                    bg_stroke: Stroke {
                        color: theme.background_dark,
                        ..default.widgets.noninteractive.bg_stroke
                    },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.noninteractive.fg_stroke
                    },
                    ..default.widgets.noninteractive
                },
                inactive: WidgetVisuals {
                    bg_fill: theme.background_light,
                    weak_bg_fill: theme.background_light,
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.inactive.fg_stroke
                    },
                    ..default.widgets.inactive
                },
                hovered: WidgetVisuals {
                    bg_fill: theme.selection,
                    weak_bg_fill: theme.selection,
                    bg_stroke: Stroke { color: theme.accent, ..default.widgets.hovered.bg_stroke },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.hovered.fg_stroke
                    },
                    ..default.widgets.hovered
                },
                active: WidgetVisuals {
                    bg_fill: theme.selection,
                    weak_bg_fill: theme.selection,
                    bg_stroke: Stroke { color: theme.accent, ..default.widgets.active.bg_stroke },
                    ..default.widgets.active
                },
                ..default.widgets
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.accent,
            faint_bg_color: theme.background_dark,
            extreme_bg_color: theme.background_dark,
            error_fg_color: theme.red,
            window_shadow: Shadow { color: theme.background_dark, ..default.window_shadow },
            window_fill: theme.background,
            panel_fill: theme.background,
            ..default
        },
    );
}
