use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use vc_atlas::layout::{LayoutConfig, NodeKind};

const FIT_PADDING: f32 = 24.0;

/// Maps the layout's logical canvas onto the graph panel. The canvas is fit
/// to the panel and then panned and zoomed by the user.
#[derive(Clone, Copy, Debug)]
pub(super) struct CanvasTransform {
    rect: Rect,
    pan: Vec2,
    scale: f32,
    canvas_center: Pos2,
}

impl CanvasTransform {
    pub(super) fn new(rect: Rect, pan: Vec2, zoom: f32, config: &LayoutConfig) -> Self {
        let fit_x = (rect.width() - FIT_PADDING * 2.0).max(1.0) / config.canvas_width;
        let fit_y = (rect.height() - FIT_PADDING * 2.0).max(1.0) / config.canvas_height;
        let (center_x, center_y) = config.center();

        Self {
            rect,
            pan,
            scale: fit_x.min(fit_y) * zoom,
            canvas_center: pos2(center_x, center_y),
        }
    }

    pub(super) fn scale(&self) -> f32 {
        self.scale
    }

    pub(super) fn to_screen(&self, point: Pos2) -> Pos2 {
        self.rect.center() + self.pan + (point - self.canvas_center) * self.scale
    }

    pub(super) fn to_canvas(&self, screen: Pos2) -> Pos2 {
        self.canvas_center + (screen - self.rect.center() - self.pan) / self.scale
    }

    pub(super) fn canvas_rect(&self, config: &LayoutConfig) -> Rect {
        Rect::from_two_pos(
            self.to_screen(Pos2::ZERO),
            self.to_screen(pos2(config.canvas_width, config.canvas_height)),
        )
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * amount) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn node_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Organization => Color32::from_rgb(59, 130, 246),
        NodeKind::Person => Color32::from_rgb(16, 185, 129),
    }
}

/// Stronger connections are drawn wider and more opaque.
pub(super) fn edge_stroke(strength: f32, scale: f32) -> Stroke {
    let strength = strength.clamp(0.0, 1.0);
    let alpha = (70.0 + strength * 120.0) as u8;
    Stroke::new(
        ((0.6 + strength * 1.6) * scale.sqrt()).clamp(0.4, 4.0),
        Color32::from_rgba_unmultiplied(148, 163, 184, alpha),
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, canvas: Rect, scale: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
    painter.rect_filled(canvas, 4.0, Color32::from_rgb(24, 30, 38));

    let step = (50.0 * scale).max(12.0);
    let grid = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 60));

    let mut x = canvas.left() + step;
    while x < canvas.right() {
        painter.line_segment([pos2(x, canvas.top()), pos2(x, canvas.bottom())], grid);
        x += step;
    }

    let mut y = canvas.top() + step;
    while y < canvas.bottom() {
        painter.line_segment([pos2(canvas.left(), y), pos2(canvas.right(), y)], grid);
        y += step;
    }
}

pub(super) fn label_offset(radius: f32) -> Vec2 {
    vec2(0.0, radius + 8.0)
}
