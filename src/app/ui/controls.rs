use eframe::egui::{self, RichText, Ui};

use crate::sim::{NodeId, Strategy};
use crate::util::ellipsize;

use super::super::render_utils::ALERT_COLOR;
use super::super::ViewModel;

const SEARCH_RESULT_ROWS: usize = 8;
const BLOCKED_PREVIEW_ROWS: usize = 12;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Run Configuration");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Content text")
            .on_hover_text("Message whose spread is simulated; the service scores it for risk.");
        ui.add(
            egui::TextEdit::multiline(&mut self.config.content_text)
                .desired_rows(2)
                .desired_width(f32::INFINITY)
                .hint_text("Enter message..."),
        );

        ui.separator();
        self.draw_dataset_controls(ui);

        ui.separator();
        ui.label("Strategy");
        ui.horizontal_wrapped(|ui| {
            for strategy in [Strategy::FuzzyAdaptive, Strategy::GeneticOptimized] {
                ui.selectable_value(&mut self.config.strategy, strategy, strategy.label());
            }
        });

        ui.add_space(4.0);
        ui.add_enabled(
            !self.config.has_dataset(),
            egui::Slider::new(&mut self.config.num_nodes, 20..=1000).text("Network size"),
        )
        .on_hover_text("Size of the random network; an imported dataset fixes this to its node count.");
        ui.add(egui::Slider::new(&mut self.config.seed_nodes, 1..=50).text("Seed nodes"))
            .on_hover_text("Accounts that post the message at step 0.");
        ui.add(
            egui::Slider::new(&mut self.config.risk_tolerance, 0.0..=1.0)
                .text("Risk tolerance")
                .clamping(egui::SliderClamping::Always),
        );
        ui.add(egui::Slider::new(&mut self.config.simulation_steps, 1..=60).text("Steps"));

        ui.separator();
        self.draw_block_controls(ui);

        ui.separator();
        let running = self.pending_run.is_some();
        ui.horizontal(|ui| {
            let label = if running {
                "Processing..."
            } else {
                "Run simulation"
            };
            let run_button = ui.add_enabled(
                !running,
                egui::Button::new(RichText::new(label).strong()).min_size(egui::vec2(160.0, 28.0)),
            );
            if run_button.clicked() {
                self.start_run();
            }
            if running {
                ui.spinner();
            }
        });
    }

    fn draw_dataset_controls(&mut self, ui: &mut Ui) {
        ui.label("Network dataset")
            .on_hover_text("JSON file with 'nodes' and 'links' arrays.");

        ui.horizontal(|ui| {
            let path_edit = ui.add(
                egui::TextEdit::singleline(&mut self.dataset_path)
                    .hint_text("path/to/network.json")
                    .desired_width(200.0),
            );
            let submitted =
                path_edit.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
            let can_load = !self.dataset_path.trim().is_empty();
            if (ui.add_enabled(can_load, egui::Button::new("Load")).clicked() || submitted) && can_load
            {
                self.load_dataset_from_path();
            }
        });

        match (&self.dataset_name, &self.config.custom_graph) {
            (Some(name), Some(topology)) => {
                ui.label(
                    RichText::new(format!(
                        "Custom data loaded: {name} ({} nodes, {} links)",
                        topology.node_count(),
                        topology.edge_count()
                    ))
                    .color(egui::Color32::from_rgb(74, 222, 128)),
                );
                if ui.small_button("Clear data (use random)").clicked() {
                    self.clear_dataset();
                }
            }
            _ => {
                ui.small("Using a random network generated by the service.");
            }
        }
    }

    fn draw_block_controls(&mut self, ui: &mut Ui) {
        ui.label("Block nodes")
            .on_hover_text("Blocked nodes are removed from the next run. Click nodes on the canvas or search here.");
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Search node id...")
                .desired_width(f32::INFINITY),
        );

        let mut toggled: Option<NodeId> = None;
        if let Some(scene) = &self.scene
            && !self.search.trim().is_empty()
        {
            let matches = scene.search(&self.search, SEARCH_RESULT_ROWS);
            if matches.is_empty() {
                ui.small("No nodes match.");
            }
            for index in matches {
                let node = &scene.graph.nodes()[index];
                let blocked = node.is_blocked(&self.block_list);
                ui.horizontal(|ui| {
                    ui.label(node.render_id.as_str());
                    let action = if blocked { "Unblock" } else { "Block" };
                    if ui.small_button(action).clicked() {
                        toggled = Some(node.original_id.clone());
                    }
                });
            }
        }

        if !self.block_list.is_empty() {
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!(
                    "{} blocked. Re-run the simulation to apply.",
                    self.block_list.len()
                ))
                .color(ALERT_COLOR),
            );

            let preview = self
                .block_list
                .iter()
                .take(BLOCKED_PREVIEW_ROWS)
                .map(NodeId::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            let more = self.block_list.len().saturating_sub(BLOCKED_PREVIEW_ROWS);
            let preview = if more > 0 {
                format!("{preview} (+{more} more)")
            } else {
                preview
            };
            ui.small(ellipsize(&preview, 160));

            if ui.small_button("Clear block list").clicked() {
                self.block_list.clear();
            }
        }

        if let Some(id) = toggled {
            self.toggle_block(id);
        }
    }
}
