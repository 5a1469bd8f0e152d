use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::engine::Rgb;

pub(super) const ACTIVE_EDGE_COLOR: Color32 = Color32::from_rgb(6, 182, 212);
pub(super) const INACTIVE_EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 64, 70, 90);
pub(super) const NEWLY_ACTIVATED_COLOR: Color32 = Color32::from_rgb(168, 85, 247);
pub(super) const BLOCKED_FILL: Color32 = Color32::from_rgb(17, 17, 17);
pub(super) const BLOCKED_MARK: Color32 = Color32::from_rgb(239, 68, 68);
pub(super) const SEARCH_MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
pub(super) const ALERT_COLOR: Color32 = Color32::from_rgb(239, 68, 68);

pub(super) fn tier_color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(15, 18, 24));

    let step = (64.0 * zoom.clamp(0.5, 2.0)).max(24.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 66, 78, 60));

    let mut x = origin.x.rem_euclid(step) + rect.left();
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step) + rect.top();
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn draw_block_mark(painter: &Painter, center: Pos2, radius: f32) {
    let arm = radius * 0.7;
    let stroke = Stroke::new((radius * 0.28).clamp(1.5, 4.0), BLOCKED_MARK);
    painter.line_segment(
        [center + Vec2::new(-arm, -arm), center + Vec2::new(arm, arm)],
        stroke,
    );
    painter.line_segment(
        [center + Vec2::new(-arm, arm), center + Vec2::new(arm, -arm)],
        stroke,
    );
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    let bounds = Rect::from_two_pos(start, end).expand(2.0);
    rect.intersects(bounds)
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

pub(super) fn node_radius(weight: f32, zoom: f32) -> f32 {
    (weight * zoom.powf(0.6)).clamp(2.0, 48.0)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn screen_and_world_round_trip() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0));
        let pan = vec2(30.0, -12.0);
        let world = vec2(140.0, -75.0);

        let screen = world_to_screen(rect, pan, 1.7, world);
        let back = screen_to_world(rect, pan, 1.7, screen);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn edge_visibility_uses_bounds() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0)));
        assert!(!edge_visible(rect, pos2(200.0, 0.0), pos2(300.0, 100.0)));
    }

    #[test]
    fn tier_colors_convert_exactly() {
        assert_eq!(tier_color(Rgb(217, 119, 6)), Color32::from_rgb(217, 119, 6));
        assert_eq!(
            blend_color(Color32::BLACK, Color32::WHITE, 1.0),
            Color32::WHITE
        );
    }
}
