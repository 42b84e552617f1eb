// 2D cross-section of the layer stack drawn with the egui painter.

use absorber_core::{LayerConfig, TreatmentParams};

const MIN_LAYER_PX: f32 = 3.0;

fn layer_style(layer: &LayerConfig) -> (egui::Color32, String) {
    match layer {
        LayerConfig::Porous { depth, .. } => (
            egui::Color32::from_rgb(200, 150, 60),
            format!("porous {:.0} mm", depth * 1000.0),
        ),
        LayerConfig::AirGap { depth } => (
            egui::Color32::from_rgb(40, 60, 90),
            format!("air {:.0} mm", depth * 1000.0),
        ),
        LayerConfig::Panel { .. } => (egui::Color32::from_rgb(170, 170, 170), String::new()),
    }
}

/// Draw the treatment in a top panel: incident side on the left, rigid wall
/// on the right, layer widths proportional to their depths.
pub fn draw_geometry(ctx: &egui::Context, params: &TreatmentParams) {
    egui::TopBottomPanel::top("geometry")
        .min_height(120.0)
        .show(ctx, |ui| {
            ui.heading("Treatment Cross-Section");

            let available = ui.available_size();
            let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
            let rect = response.rect;

            let layers = params.layers();
            let total_depth_m: f64 = layers.iter().map(LayerConfig::depth).sum();
            if total_depth_m <= 0.0 {
                return;
            }

            let padding = 20.0;
            let wall_width = 12.0;
            let draw_width = rect.width() - 2.0 * padding - wall_width;
            let draw_height = rect.height() - 2.0 * padding;
            let scale_x = draw_width / total_depth_m as f32;

            // Layers are listed front to back, so the wall sits at the far right.
            let wall_x = rect.right() - padding - wall_width;
            let top = rect.center().y - draw_height / 2.0;
            let mut x = wall_x;

            for layer in layers.iter().rev() {
                let w = (layer.depth() as f32 * scale_x).max(MIN_LAYER_PX);
                let segment = egui::Rect::from_min_size(egui::pos2(x - w, top), egui::vec2(w, draw_height));
                let (color, label) = layer_style(layer);

                painter.rect_filled(segment, 0.0, color);
                painter.rect_stroke(
                    segment,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::WHITE),
                    egui::StrokeKind::Inside,
                );
                if !label.is_empty() && w > 60.0 {
                    painter.text(
                        segment.center(),
                        egui::Align2::CENTER_CENTER,
                        label,
                        egui::FontId::proportional(12.0),
                        egui::Color32::WHITE,
                    );
                }
                x -= w;
            }

            let wall = egui::Rect::from_min_size(egui::pos2(wall_x, top), egui::vec2(wall_width, draw_height));
            painter.rect_filled(wall, 0.0, egui::Color32::DARK_GRAY);

            // Incident wave arrow.
            let arrow_y = rect.center().y;
            painter.arrow(
                egui::pos2(rect.left() + 2.0, arrow_y),
                egui::vec2((x - rect.left() - 6.0).max(4.0), 0.0),
                egui::Stroke::new(2.0, egui::Color32::LIGHT_BLUE),
            );
        });
}
