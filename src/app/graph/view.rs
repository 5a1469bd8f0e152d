use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use crate::engine::Tier;

use super::super::render_utils::{
    ACTIVE_EDGE_COLOR, BLOCKED_FILL, INACTIVE_EDGE_COLOR, NEWLY_ACTIVATED_COLOR,
    SEARCH_MATCH_COLOR, blend_color, circle_visible, draw_background, draw_block_mark,
    edge_visible, node_radius, tier_color, world_to_screen,
};
use super::super::ViewModel;

const PARTICLE_SPEED: f32 = 0.55;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        let Some(scene) = self.scene.as_ref() else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Configure a run and press Run simulation to see the network.",
                FontId::proportional(15.0),
                Color32::from_gray(170),
            );
            return;
        };

        if self.fit_pending {
            let extent = scene
                .positions
                .iter()
                .map(|position| position.length())
                .fold(0.0_f32, f32::max)
                + 30.0;
            self.fit_pending = false;
            self.fit_view(rect, extent);
        }

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let graph = &scene.graph;
        let overlay = self.playback.overlay();
        let search_matches = if self.search.trim().is_empty() {
            HashSet::new()
        } else {
            scene.search_set(&self.search)
        };

        let screen_positions = scene
            .positions
            .iter()
            .map(|world| world_to_screen(rect, self.pan, self.zoom, *world))
            .collect::<Vec<_>>();
        let screen_radii = graph
            .nodes()
            .iter()
            .map(|node| node_radius(node.weight(), self.zoom))
            .collect::<Vec<_>>();

        let hovered = Self::hovered_index(ui, rect, &screen_positions, &screen_radii);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let flow_time = ui.input(|input| input.time) as f32;
        let zoom_sqrt = self.zoom.sqrt();
        let any_active = !overlay.active_edges.is_empty();

        for edge_index in 0..graph.edge_count() {
            let Some((src, dst)) = graph.edge_endpoints(edge_index) else {
                continue;
            };
            let start = screen_positions[src];
            let end = screen_positions[dst];
            if !edge_visible(rect, start, end) {
                continue;
            }

            if graph.is_edge_active(edge_index, &overlay.active_edges) {
                painter.line_segment([start, end], Stroke::new(3.0, ACTIVE_EDGE_COLOR));

                let phase = (flow_time * PARTICLE_SPEED + edge_index as f32 * 0.37).fract();
                let particle: Pos2 = start + (end - start) * phase;
                painter.circle_filled(particle, (2.6 * zoom_sqrt).clamp(2.0, 5.0), Color32::WHITE);
            } else {
                painter.line_segment(
                    [start, end],
                    Stroke::new((0.9 * zoom_sqrt).clamp(0.5, 2.0), INACTIVE_EDGE_COLOR),
                );
            }
        }

        let mut draw_order = (0..graph.node_count()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| {
            graph.nodes()[*a]
                .weight()
                .total_cmp(&graph.nodes()[*b].weight())
        });

        for index in draw_order {
            let position = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_visible(rect, position, radius + 4.0) {
                continue;
            }

            let node = &graph.nodes()[index];
            let is_blocked = node.is_blocked(&self.block_list);
            let is_hovered = hovered == Some(index);
            let is_new = overlay.is_newly_activated(&node.original_id);
            let is_transmitting = overlay.active_edges.touches(&node.original_id);
            let is_match = search_matches.contains(&index);

            let base_color = tier_color(node.color());
            let fill = if is_blocked {
                BLOCKED_FILL
            } else if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.35)
            } else if is_match {
                blend_color(base_color, SEARCH_MATCH_COLOR, 0.6)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(
                position,
                radius,
                if is_transmitting && !is_blocked {
                    Stroke::new(1.5, ACTIVE_EDGE_COLOR)
                } else {
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(10, 10, 10, 200))
                },
            );
            if is_new && !is_blocked {
                painter.circle_stroke(
                    position,
                    radius + 3.0,
                    Stroke::new(2.0, NEWLY_ACTIVATED_COLOR),
                );
            }
            if is_match {
                painter.circle_stroke(
                    position,
                    radius + 5.0,
                    Stroke::new(1.5, SEARCH_MATCH_COLOR),
                );
            }
            if is_blocked {
                draw_block_mark(&painter, position, radius);
            }

            let should_draw_label =
                node.tier == Tier::Titan || is_blocked || is_hovered || is_match || self.zoom > 2.5;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.render_id.as_str(),
                    FontId::proportional(12.0),
                    Color32::from_gray(236),
                );
            }
        }

        if let Some(index) = hovered {
            let node = &graph.nodes()[index];
            let status = if node.is_blocked(&self.block_list) {
                "blocked, click to unblock"
            } else {
                "click to block on next run"
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  degree {}  |  {status}",
                    node.render_id,
                    node.tier.label(),
                    node.degree
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if any_active || response.dragged() {
            ui.ctx().request_repaint();
        }

        let pending_toggle = if response.clicked_by(egui::PointerButton::Primary) {
            hovered.map(|index| graph.nodes()[index].original_id.clone())
        } else {
            None
        };

        if let Some(id) = pending_toggle {
            self.toggle_block(id);
        }
    }
}
