use std::time::Duration;

use eframe::egui::{self, Ui};

use crate::engine::PlaybackStatus;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_playback_bar(&mut self, ui: &mut Ui, now: Duration) {
        let step_count = self.playback.step_count();
        let has_steps = step_count > 0;

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let toggle_label = match self.playback.status() {
                PlaybackStatus::Playing => "Pause",
                PlaybackStatus::Finished => "Replay",
                PlaybackStatus::Idle | PlaybackStatus::Paused => "Play",
            };
            if ui
                .add_enabled(has_steps, egui::Button::new(toggle_label).min_size(egui::vec2(64.0, 0.0)))
                .clicked()
            {
                self.playback.toggle(now);
            }

            if ui
                .add_enabled(has_steps, egui::Button::new("Reset"))
                .on_hover_text("Back to step 0 and clear the block list.")
                .clicked()
            {
                self.reset_session();
            }

            ui.separator();

            let last = self.playback.last_index().unwrap_or(0);
            let mut scrub_to = self.playback.current_step();
            ui.spacing_mut().slider_width = (ui.available_width() - 180.0).max(120.0);
            let scrubber = ui.add_enabled(
                has_steps,
                egui::Slider::new(&mut scrub_to, 0..=last)
                    .show_value(false)
                    .clamping(egui::SliderClamping::Always),
            );
            if scrubber.changed() {
                self.playback.scrub(scrub_to);
            }

            if has_steps {
                ui.label(format!(
                    "step {} / {}",
                    self.playback.current_step() + 1,
                    step_count
                ));
            } else {
                ui.label("no steps");
            }
            ui.small(format!("{} ms", self.playback.interval().as_millis()));
        });
        ui.add_space(4.0);
    }
}
