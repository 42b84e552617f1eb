// Absorption plot via egui_plot.

use absorber_core::AbsorptionCurve;
use egui_plot::{Legend, Line, Plot};

/// Draw the absorption curve in the central panel. Singular bins are
/// dropped so the line does not break on NaN.
pub fn draw_absorption_plot(ctx: &egui::Context, curve: &AbsorptionCurve, diffuse: Option<&[f64]>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Absorption Coefficient");

        if let Some((f_peak, a_peak)) = curve.peak() {
            ui.label(format!("Peak α = {a_peak:.3} at {f_peak:.0} Hz"));
        }

        let normal: Vec<[f64; 2]> = curve.finite_points().map(|(f, a)| [f, a]).collect();
        let normal = Line::new(normal).name("Normal incidence");

        let diffuse = diffuse.map(|alpha| {
            let points: Vec<[f64; 2]> = curve
                .frequencies
                .iter()
                .zip(alpha.iter())
                .filter(|(_, a)| a.is_finite())
                .map(|(&f, &a)| [f, a])
                .collect();
            Line::new(points).name("Diffuse field")
        });

        Plot::new("absorption_plot")
            .x_axis_label("Frequency (Hz)")
            .y_axis_label("α")
            .include_y(0.0)
            .include_y(1.0)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(normal);
                if let Some(line) = diffuse {
                    plot_ui.line(line);
                }
            });
    });
}
