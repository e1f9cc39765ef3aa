mod api;
mod app;
mod application;
mod config;
mod domain;
mod host;
mod logging;
mod storage;
mod ui;
mod utils;

use iced::{window, Size};

fn main() -> iced::Result {
    logging::init_logging();

    let config = config::load();
    let host = host::detect_from_env();

    let mut window_settings = window::Settings {
        size: Size::new(480.0, 640.0),
        ..Default::default()
    };
    host.ready();
    host.expand(&mut window_settings);

    iced::application(
        move || app::VortexApp::boot(config.clone(), host.clone()),
        app::update,
        app::view,
    )
    .title("Vortex")
    .window(window_settings)
    .run()
}
