use std::time::Duration;

use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::engine::{StepInsights, Tier};
use crate::util::group_digits;

use super::super::render_utils::ALERT_COLOR;
use super::super::{NoticeKind, ViewModel};

const REQUEST_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context, session_expired: &mut bool) {
        let now = Duration::from_secs_f64(ctx.input(|input| input.time));

        *session_expired = self.poll_requests(now);
        self.playback.poll(now);

        if let Some(wait) = self.playback.next_tick_in(now) {
            ctx.request_repaint_after(wait);
        }
        if self.pending_run.is_some() || self.pending_report.is_some() {
            ctx.request_repaint_after(REQUEST_POLL_INTERVAL);
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        if !self.notices.is_empty() {
            egui::TopBottomPanel::top("notices")
                .resizable(false)
                .show(ctx, |ui| self.draw_notices(ui));
        }

        egui::TopBottomPanel::bottom("playback")
            .resizable(false)
            .show(ctx, |ui| self.draw_playback_bar(ui, now));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_top_bar(&mut self, ui: &mut egui::Ui) {
        let insights = StepInsights::compute(self.playback.result(), self.playback.current_step());

        ui.horizontal(|ui| {
            ui.heading("Contagion Lens");
            ui.separator();

            if let Some(scene) = &self.scene {
                ui.label(format!(
                    "nodes: {} ({} titans)",
                    group_digits(scene.graph.node_count()),
                    scene.graph.tier_count(Tier::Titan)
                ));
                ui.label(format!("links: {}", group_digits(scene.graph.edge_count())));
                ui.separator();
            }

            ui.label(format!("velocity: +{}", insights.velocity));
            ui.label(format!(
                "reach: {} / {}",
                group_digits(insights.reach),
                group_digits(insights.total_nodes)
            ));

            let saturation = RichText::new(format!("saturation: {:.1}%", insights.saturation));
            ui.label(if insights.saturation_alert() {
                saturation.color(ALERT_COLOR).strong()
            } else {
                saturation
            });

            let risk = RichText::new(format!("risk score: {:.0}", insights.risk * 100.0));
            ui.label(if insights.risk_alert() {
                risk.color(ALERT_COLOR).strong()
            } else {
                risk
            });

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let can_report = self.playback.result().is_some()
                    && self.last_run_config.is_some()
                    && self.pending_report.is_none();
                let report_button = ui
                    .add_enabled(can_report, egui::Button::new("Download report"))
                    .on_hover_text(format!(
                        "Render a PDF of this run into {}",
                        self.report_dir.display()
                    ));
                if report_button.clicked() {
                    self.start_report();
                }
                if self.pending_report.is_some() {
                    ui.spinner();
                }
                ui.label(self.playback.status().label());
            });
        });
    }

    fn draw_notices(&mut self, ui: &mut egui::Ui) {
        let mut dismissed = None;

        for (index, notice) in self.notices.iter().enumerate() {
            ui.horizontal(|ui| {
                let color = match notice.kind {
                    NoticeKind::Info => Color32::from_rgb(96, 165, 250),
                    NoticeKind::Warning => Color32::from_rgb(251, 191, 36),
                    NoticeKind::Error => ALERT_COLOR,
                };
                ui.label(RichText::new(notice.message.as_str()).color(color));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = Some(index);
                    }
                });
            });
        }

        if let Some(index) = dismissed {
            self.notices.remove(index);
        }
    }
}
