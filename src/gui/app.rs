use std::sync::Arc;

use eframe::egui;
use tracing::{
    debug,
    error,
    info,
    warn,
};

use super::{
    catalog::book_grid,
    error_modal::ErrorModal,
    login::LoginForm,
    theme::{
        apply_preference,
        set_theme,
        Theme,
    },
    top_bar::{
        TopBar,
        TopBarAction,
    },
    unit_view::{
        UnitAction,
        UnitPage,
    },
};
use crate::{
    content::{
        ContentSource,
        ContentStore,
    },
    core::{
        tasks::{
            RepaintHook,
            TaskManager,
            TaskResult,
        },
        AppConfig,
    },
    persistence::{
        LocalStore,
        ThemePreference,
        UserProfile,
    },
    playback::speech_engine_from,
    session::UnitSession,
};

enum ContentState {
    Loading(String),
    Ready(ContentStore),
    Failed(String),
}

enum Page {
    Login,
    Books,
    Unit(Box<UnitPage>),
    UnitFailed(String),
}

enum Navigation {
    LoggedIn(UserProfile),
    Books,
    OpenBook(u32),
    Reload,
}

pub struct LectioApp {
    // Configuration
    config: AppConfig,
    store: Option<LocalStore>,

    // Session
    profile: Option<UserProfile>,
    content: ContentState,
    page: Page,

    // UI State
    theme: Theme,
    theme_preference: ThemePreference,
    login: LoginForm,
    error_modal: ErrorModal,

    task_manager: TaskManager,
    repaint: RepaintHook,
}

impl LectioApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        task_manager: TaskManager,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let repaint: RepaintHook = Arc::new(move || ctx.request_repaint());
        let task_manager = task_manager.with_repaint(Arc::clone(&repaint));

        let store = match LocalStore::open_default() {
            Ok(store) => {
                info!(path = %store.path().display(), "local storage opened");
                Some(store)
            }
            Err(e) => {
                error!(error = %e, "local storage unavailable, nothing will be remembered");
                None
            }
        };

        let profile = store.as_ref().and_then(UserProfile::load);
        let theme_preference = store.as_ref().map(ThemePreference::load).unwrap_or_default();

        let theme = Theme::classroom();
        set_theme(&cc.egui_ctx, &theme);
        apply_preference(&cc.egui_ctx, theme_preference);

        let page = if profile.is_some() { Page::Books } else { Page::Login };

        let mut app = Self {
            config,
            store,
            profile,
            content: ContentState::Loading(String::new()),
            page,
            theme,
            theme_preference,
            login: LoginForm::default(),
            error_modal: ErrorModal::new(),
            task_manager,
            repaint,
        };

        app.reload();
        app
    }

    fn reload(&mut self) {
        let source = ContentSource::parse(&self.config.content_source);
        info!(source = %source, "loading catalog");
        self.content = ContentState::Loading(format!("Loading {}...", source));
        self.task_manager.load_catalog(source);
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        debug!(task = result.task_type(), "task result received");
        match result {
            TaskResult::CatalogLoaded { source, result, .. } => match result {
                Ok(store) => {
                    info!(source = %source, books = store.books().len(), "catalog loaded");
                    self.content = ContentState::Ready(store);
                }
                Err(e) => {
                    error!(source = %source, error = %e, "catalog failed to load");
                    self.content = ContentState::Failed(e.to_string());
                }
            },
            TaskResult::LoadingMessage { message, .. } => {
                if let ContentState::Loading(current) = &mut self.content {
                    *current = message;
                }
            }
        }
    }

    fn navigate(&mut self, page: Page) {
        if let Page::Unit(unit_page) = &mut self.page {
            unit_page.stop();
        }
        self.page = page;
    }

    fn open_book(&mut self, ctx: &egui::Context, book_id: u32) {
        let ContentState::Ready(store) = &self.content else {
            warn!(book = book_id, "catalog not ready, ignoring book click");
            return;
        };

        let first_unit = match store.book(book_id) {
            Ok(book) => book
                .first_unit()
                .map(|unit| unit.id.clone())
                .ok_or_else(|| format!("{} has no units yet.", book.title)),
            Err(e) => Err(e.to_string()),
        };

        let unit_id = match first_unit {
            Ok(unit_id) => unit_id,
            Err(message) => {
                self.navigate(Page::UnitFailed(message));
                return;
            }
        };

        let opened = UnitSession::open(store, book_id, &unit_id);
        match opened {
            Ok(session) => {
                let unit_page = UnitPage::new(
                    session,
                    speech_engine_from(&self.config.speech),
                    self.task_manager.runtime_handle(),
                    &self.config,
                    Arc::clone(&self.repaint),
                );
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                    "Lectio - {}",
                    unit_page.session().unit.title
                )));
                self.navigate(Page::Unit(Box::new(unit_page)));
            }
            Err(e) => {
                warn!(book = book_id, unit = %unit_id, error = %e, "unit could not be opened");
                self.navigate(Page::UnitFailed(e.to_string()));
            }
        }
    }

    fn handle_top_bar(&mut self, ctx: &egui::Context, action: TopBarAction) {
        match action {
            TopBarAction::ShowBooks => self.navigate(Page::Books),
            TopBarAction::Reload => {
                self.navigate(Page::Books);
                self.reload();
            }
            TopBarAction::SetTheme(preference) => {
                self.theme_preference = preference;
                apply_preference(ctx, preference);
                if let Some(store) = &mut self.store {
                    if let Err(e) = preference.save(store) {
                        self.error_modal.show_error("Could not save theme", &e);
                    }
                }
            }
            TopBarAction::LogOut => {
                if let Some(store) = &mut self.store {
                    if let Err(e) = UserProfile::clear(store) {
                        self.error_modal.show_error("Could not log out cleanly", &e);
                    }
                }
                info!("logged out");
                self.profile = None;
                self.navigate(Page::Login);
            }
        }
    }

    fn log_in(&mut self, profile: UserProfile) {
        if let Some(store) = &mut self.store {
            if let Err(e) = profile.save(store) {
                self.error_modal.show_error("Could not save your profile", &e);
            }
        }
        info!(user = %profile.display_name(), group = %profile.group, "logged in");
        self.profile = Some(profile);
        self.navigate(Page::Books);
    }

    fn show_page(&mut self, ui: &mut egui::Ui) -> Option<Navigation> {
        match &mut self.page {
            Page::Login => self.login.show(ui, &self.theme).map(Navigation::LoggedIn),
            Page::Books => match &self.content {
                ContentState::Loading(message) => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(message.as_str());
                    });
                    None
                }
                ContentState::Failed(message) => {
                    let mut retry = false;
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading(self.theme.heading(ui.ctx(), "The books could not be loaded"));
                        ui.colored_label(self.theme.incorrect(ui.ctx()), message.as_str());
                        ui.add_space(10.0);
                        retry = ui.button("Reload").clicked();
                    });
                    retry.then_some(Navigation::Reload)
                }
                ContentState::Ready(store) => {
                    book_grid(ui, store.books(), &self.theme).map(Navigation::OpenBook)
                }
            },
            Page::Unit(unit_page) => unit_page.show(ui, &self.theme).map(|action| match action {
                UnitAction::Back => Navigation::Books,
            }),
            Page::UnitFailed(message) => {
                let mut back = false;
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading(self.theme.heading(ui.ctx(), "This unit is not available"));
                    ui.colored_label(self.theme.incorrect(ui.ctx()), message.as_str());
                    ui.add_space(10.0);
                    back = ui.button("Back to books").clicked();
                });
                back.then_some(Navigation::Books)
            }
        }
    }
}

impl eframe::App for LectioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for result in self.task_manager.poll_results() {
            self.handle_task_result(result);
        }

        if self.profile.is_none() && !matches!(self.page, Page::Login) {
            self.navigate(Page::Login);
        }

        if let Some(action) =
            TopBar::show(ctx, &self.theme, self.profile.as_ref(), self.theme_preference)
        {
            self.handle_top_bar(ctx, action);
        }

        let navigation = egui::CentralPanel::default().show(ctx, |ui| self.show_page(ui)).inner;

        match navigation {
            Some(Navigation::LoggedIn(profile)) => self.log_in(profile),
            Some(Navigation::Books) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Title("Lectio".to_string()));
                self.navigate(Page::Books);
            }
            Some(Navigation::OpenBook(book_id)) => self.open_book(ctx, book_id),
            Some(Navigation::Reload) => self.reload(),
            None => {}
        }

        self.error_modal.show(ctx);
    }
}
