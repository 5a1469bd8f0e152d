use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui, pos2, vec2};

use crate::engine::reach_curve;
use crate::sim::NodeId;

use super::super::render_utils::{ACTIVE_EDGE_COLOR, NEWLY_ACTIVATED_COLOR};
use super::super::ViewModel;

const LOG_ROW_HEIGHT: f32 = 18.0;
const CURVE_COLOR: Color32 = Color32::from_rgb(59, 130, 246);

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Top Spreaders");
        ui.add_space(4.0);

        let spreaders = &self.playback.overlay().top_spreaders;
        if spreaders.is_empty() {
            ui.label("No spreaders at this step.");
        } else {
            egui::Grid::new("top_spreaders")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for entry in spreaders.entries() {
                        ui.label(self.display_id(&entry.id));
                        ui.label(RichText::new(entry.count.to_string()).color(ACTIVE_EDGE_COLOR).strong());
                        ui.end_row();
                    }
                });
        }

        ui.separator();
        ui.label(
            RichText::new(format!(
                "Transmission log ({})",
                self.playback.overlay().active_edges.path_count()
            ))
            .strong(),
        );
        let paths = self
            .playback
            .current_step_data()
            .map(|step| step.activation_paths.as_slice())
            .unwrap_or_default();
        if paths.is_empty() {
            ui.small("No transmissions at this step.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("transmission_log")
                .max_height(240.0)
                .auto_shrink([false, true])
                .show_rows(ui, LOG_ROW_HEIGHT, paths.len(), |ui, row_range| {
                    for (source, target) in &paths[row_range] {
                        ui.horizontal(|ui| {
                            ui.monospace(RichText::new(self.display_id(source)).color(Color32::from_rgb(234, 179, 8)));
                            ui.monospace("->");
                            ui.monospace(RichText::new(self.display_id(target)).color(NEWLY_ACTIVATED_COLOR));
                        });
                    }
                });
        }

        ui.separator();
        ui.label(RichText::new("Impact curve").strong());
        self.draw_impact_curve(ui);
    }

    fn display_id(&self, id: &NodeId) -> String {
        self.scene
            .as_ref()
            .and_then(|scene| scene.graph.render_id_for(id))
            .map_or_else(|| id.to_string(), str::to_owned)
    }

    fn draw_impact_curve(&self, ui: &mut Ui) {
        let Some(result) = self.playback.result() else {
            ui.small("Run a simulation to plot total reach.");
            return;
        };
        let points = reach_curve(result);
        if points.is_empty() {
            ui.small("The run produced no steps.");
            return;
        }

        let (rect, _response) =
            ui.allocate_exact_size(vec2(ui.available_width(), 160.0), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, Color32::from_rgb(17, 24, 39));

        let max_x = (points.len() - 1).max(1) as f32;
        let max_y = points
            .iter()
            .map(|point| point[1] as f32)
            .fold(1.0_f32, f32::max);
        let plot = rect.shrink(8.0);
        let to_screen = |x: f32, y: f32| {
            pos2(
                plot.left() + x / max_x * plot.width(),
                plot.bottom() - y / max_y * plot.height(),
            )
        };

        let line = points
            .iter()
            .map(|point| to_screen(point[0] as f32, point[1] as f32))
            .collect::<Vec<_>>();
        for pair in line.windows(2) {
            painter.line_segment([pair[0], pair[1]], Stroke::new(2.0, CURVE_COLOR));
        }
        for point in &line {
            painter.circle_filled(*point, 2.0, CURVE_COLOR);
        }

        let current = self.playback.current_step() as f32;
        let marker_x = to_screen(current, 0.0).x;
        painter.line_segment(
            [pos2(marker_x, plot.top()), pos2(marker_x, plot.bottom())],
            Stroke::new(1.0, Color32::from_gray(200)),
        );

        painter.text(
            plot.left_top(),
            egui::Align2::LEFT_TOP,
            format!("peak reach {}", max_y as usize),
            egui::FontId::proportional(11.0),
            Color32::from_gray(180),
        );
    }
}
