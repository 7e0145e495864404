pub mod app;
pub mod catalog;
pub mod error_modal;
pub mod login;
pub mod theme;
pub mod top_bar;
pub mod unit_view;
pub mod vocab_popup;

pub use app::LectioApp;
