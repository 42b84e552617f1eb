pub mod app;
pub mod geometry_view;
pub mod plot_view;
pub mod ui;

use app::App;

/// Launch the interactive viewer with eframe.
pub fn run() -> Result<(), eframe::Error> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Absorber-Sim — Acoustic Treatment Absorption")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Absorber-Sim",
        native_options,
        Box::new(|cc| Ok(Box::new(App::new(cc)))),
    )
}
