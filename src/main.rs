use std::error::Error;

use eframe::egui;
use lectio::{
    core::{
        logging::init_logging,
        tasks::TaskManager,
        AppConfig,
    },
    gui::LectioApp,
};
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let config = AppConfig::load();
    info!(source = %config.content_source, "starting lectio");

    let task_manager = TaskManager::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Lectio")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lectio",
        options,
        Box::new(move |cc| Ok(Box::new(LectioApp::new(cc, config, task_manager)))),
    )?;

    Ok(())
}
