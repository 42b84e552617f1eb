// egui control panel: treatment selector, sliders, readouts.

use absorber_core::{PorousModelKind, TreatmentKind, TreatmentParams};

/// Extra UI-only state that doesn't belong in TreatmentParams.
#[derive(Default)]
pub struct UiState {
    pub show_diffuse: bool,
}

/// Slider over a length stored in metres and shown in millimetres.
fn mm_slider(ui: &mut egui::Ui, label: &str, value_m: &mut f64, range_mm: std::ops::RangeInclusive<f32>) -> bool {
    ui.label(label);
    let mut mm = (*value_m * 1000.0) as f32;
    if ui.add(egui::Slider::new(&mut mm, range_mm)).changed() {
        *value_m = mm as f64 / 1000.0;
        return true;
    }
    false
}

/// Draw the right-side control panel. Returns `true` if any treatment
/// parameter changed (meaning the curve needs to be recomputed).
pub fn draw_controls(
    ctx: &egui::Context,
    params: &mut TreatmentParams,
    ui_state: &mut UiState,
    last_error: Option<&str>,
) -> bool {
    let mut changed = false;

    egui::SidePanel::right("controls")
        .min_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Treatment");
            ui.separator();

            let mut kind = params.kind;
            egui::ComboBox::from_label("Type")
                .selected_text(kind.label())
                .show_ui(ui, |ui| {
                    for candidate in TreatmentKind::ALL {
                        ui.selectable_value(&mut kind, candidate, candidate.label());
                    }
                });
            if kind != params.kind {
                // Switching family loads that family's defaults, keeping the
                // environment settings.
                let temperature = params.temperature;
                *params = TreatmentParams::preset(kind);
                params.temperature = temperature;
                changed = true;
            }

            ui.separator();

            // --- Panel ---
            match params.kind {
                TreatmentKind::Membrane => {
                    ui.label("Surface Density (kg/m²)");
                    let mut m = params.surface_density as f32;
                    if ui.add(egui::Slider::new(&mut m, 0.1..=20.0)).changed() {
                        params.surface_density = m as f64;
                        changed = true;
                    }
                }
                TreatmentKind::Perforated => {
                    changed |= mm_slider(ui, "Hole Diameter (mm)", &mut params.hole_diameter, 1.0..=20.0);
                    changed |= mm_slider(ui, "Hole Spacing (mm)", &mut params.hole_spacing, 5.0..=100.0);
                    changed |= mm_slider(ui, "Panel Thickness (mm)", &mut params.panel_thickness, 0.5..=25.0);
                    ui.label(format!("Open area: {:.1} %", params.panel().map_or(0.0, |p| p.perforation_ratio()) * 100.0));
                }
                TreatmentKind::Slotted => {
                    changed |= mm_slider(ui, "Slot Width (mm)", &mut params.slot_width, 1.0..=30.0);
                    changed |= mm_slider(ui, "Slot Spacing (mm)", &mut params.slot_spacing, 5.0..=200.0);
                    changed |= mm_slider(ui, "Panel Thickness (mm)", &mut params.panel_thickness, 0.5..=25.0);
                }
                TreatmentKind::Microperforated => {
                    changed |= mm_slider(ui, "Hole Diameter (mm)", &mut params.hole_diameter, 0.05..=1.0);
                    changed |= mm_slider(ui, "Sheet Thickness (mm)", &mut params.panel_thickness, 0.05..=2.0);
                    ui.label("Perforation Ratio (%)");
                    let mut pct = (params.perforation_ratio * 100.0) as f32;
                    if ui.add(egui::Slider::new(&mut pct, 0.1..=10.0)).changed() {
                        params.perforation_ratio = pct as f64 / 100.0;
                        changed = true;
                    }
                }
                TreatmentKind::PorousRigid | TreatmentKind::PorousAirGap => {}
            }

            if params.kind.has_panel() {
                if ui.checkbox(&mut params.porous_fill, "Porous layer in cavity").changed() {
                    changed = true;
                }
                if let Some(f0) = params.resonance_estimate() {
                    ui.label(format!("Resonance estimate: {f0:.0} Hz"));
                }
                ui.separator();
            }

            // --- Porous layer ---
            let porous_used = !params.kind.has_panel() || params.porous_fill;
            if porous_used {
                let mut model = params.porous_model;
                egui::ComboBox::from_label("Porous Model")
                    .selected_text(match model {
                        PorousModelKind::DelanyBazley => "Delany-Bazley",
                        PorousModelKind::Miki => "Miki",
                        PorousModelKind::Jca => "JCA",
                    })
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut model, PorousModelKind::DelanyBazley, "Delany-Bazley");
                        ui.selectable_value(&mut model, PorousModelKind::Miki, "Miki");
                        ui.selectable_value(&mut model, PorousModelKind::Jca, "JCA");
                    });
                if model != params.porous_model {
                    params.porous_model = model;
                    changed = true;
                }

                ui.label("Flow Resistivity (N·s/m⁴)");
                let mut sigma = params.sigma as f32;
                if ui
                    .add(egui::Slider::new(&mut sigma, 1_000.0..=100_000.0).logarithmic(true))
                    .changed()
                {
                    params.sigma = sigma as f64;
                    changed = true;
                }

                if params.porous_model == PorousModelKind::Jca {
                    ui.label("Porosity");
                    let mut phi = params.porosity as f32;
                    if ui.add(egui::Slider::new(&mut phi, 0.5..=1.0)).changed() {
                        params.porosity = phi as f64;
                        changed = true;
                    }
                    ui.label("Tortuosity");
                    let mut alpha = params.tortuosity as f32;
                    if ui.add(egui::Slider::new(&mut alpha, 1.0..=3.0)).changed() {
                        params.tortuosity = alpha as f64;
                        changed = true;
                    }
                }

                changed |= mm_slider(ui, "Porous Depth (mm)", &mut params.porous_depth, 5.0..=300.0);
            }

            if params.kind != TreatmentKind::PorousRigid {
                changed |= mm_slider(ui, "Air Cavity Depth (mm)", &mut params.cavity_depth, 5.0..=500.0);
            }

            ui.separator();

            // --- Environment ---
            ui.label("Temperature (°C)");
            let mut temp = params.temperature as f32;
            if ui.add(egui::Slider::new(&mut temp, -20.0..=60.0)).changed() {
                params.temperature = temp as f64;
                changed = true;
            }

            ui.label("Upper Frequency (Hz)");
            let mut f_stop = params.f_stop as f32;
            if ui
                .add(egui::Slider::new(&mut f_stop, 500.0..=20_000.0).logarithmic(true))
                .changed()
            {
                params.f_stop = (f_stop as f64).max(params.f_start + 1.0);
                changed = true;
            }

            ui.separator();

            // --- Display ---
            ui.checkbox(&mut ui_state.show_diffuse, "Show diffuse-field absorption");

            if let Some(err) = last_error {
                ui.separator();
                ui.colored_label(egui::Color32::LIGHT_RED, err);
            }
        });

    changed
}
