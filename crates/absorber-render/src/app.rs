// eframe application: state orchestration between controls, geometry and plot.

use absorber_core::{AbsorptionCurve, AirProperties, TreatmentParams};

use crate::{geometry_view, plot_view, ui, ui::UiState};

pub struct App {
    params: TreatmentParams,
    ui_state: UiState,
    curve: AbsorptionCurve,
    /// Diffuse-field curve, computed lazily when first shown.
    diffuse: Option<Vec<f64>>,
    last_error: Option<String>,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            params: TreatmentParams::default(),
            ui_state: UiState::default(),
            curve: AbsorptionCurve::default(),
            diffuse: None,
            last_error: None,
        };
        app.recompute();
        app
    }

    /// Re-run the model; on failure keep the previous curve and surface the
    /// error in the side panel.
    fn recompute(&mut self) {
        match absorber_core::compute(&self.params) {
            Ok(curve) => {
                self.curve = curve;
                self.diffuse = None;
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("evaluation failed: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn refresh_diffuse(&mut self) {
        if !self.ui_state.show_diffuse || self.diffuse.is_some() {
            return;
        }
        match AirProperties::from_temperature(self.params.temperature) {
            Ok(air) => self.diffuse = Some(self.curve.diffuse_absorption(&air)),
            Err(e) => tracing::warn!("diffuse-field curve skipped: {e}"),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        geometry_view::draw_geometry(ctx, &self.params);
        let changed = ui::draw_controls(
            ctx,
            &mut self.params,
            &mut self.ui_state,
            self.last_error.as_deref(),
        );

        // Re-run the model if any parameter changed; the new curve is drawn
        // in this same frame.
        if changed {
            tracing::debug!(kind = ?self.params.kind, "parameters changed");
            self.recompute();
        }

        self.refresh_diffuse();
        let diffuse = if self.ui_state.show_diffuse {
            self.diffuse.as_deref()
        } else {
            None
        };
        plot_view::draw_absorption_plot(ctx, &self.curve, diffuse);
    }
}
