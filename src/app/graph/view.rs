use eframe::egui::{self, Align2, Color32, Context, FontId, Sense, Stroke, Ui, pos2, vec2};
use tracing::debug;
use vc_atlas::layout::{NodeKind, Phase, StepOutcome};
use vc_atlas::util::short_label;

use super::super::ViewModel;
use super::super::render_utils::{
    CanvasTransform, blend_color, draw_background, edge_stroke, label_offset, node_color,
};

/// Whether a step changed positions, so the next frame has to be drawn.
fn moved_nodes(outcome: StepOutcome) -> bool {
    matches!(
        outcome,
        StepOutcome::Advanced { .. } | StepOutcome::Settled { .. }
    )
}

impl ViewModel {
    /// Applies at most one layout step per frame while the animation is on.
    fn advance_layout(&mut self, ctx: &Context) {
        if !self.animate_layout || self.engine.is_settled() {
            return;
        }

        let ticket = self.engine.schedule();
        let outcome = self.engine.step(ticket);
        match outcome {
            StepOutcome::Settled { step } => debug!(step, "viewer layout settled"),
            StepOutcome::Stale => {
                debug!(run = ?ticket.run(), "viewer step dropped for a previous run");
            }
            StepOutcome::Advanced { .. } | StepOutcome::Idle => {}
        }

        if moved_nodes(outcome) {
            ctx.request_repaint();
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        self.advance_layout(ui.ctx());

        let transform = CanvasTransform::new(rect, self.pan, self.zoom, self.engine.config());
        self.handle_graph_pointer(ui, &response, &transform);

        let scale = transform.scale();
        draw_background(
            &painter,
            rect,
            transform.canvas_rect(self.engine.config()),
            scale,
        );

        if self.interaction.hovered().is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let frame = self
            .engine
            .frame(self.selected.as_deref(), self.interaction.hovered());
        if frame.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No people or funds match the current filters.",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
            return;
        }

        let highlight = Color32::from_rgb(249, 115, 22);
        for edge in &frame.edges {
            let start = transform.to_screen(pos2(edge.from[0], edge.from[1]));
            let end = transform.to_screen(pos2(edge.to[0], edge.to[1]));
            let touches_selection = self
                .selected
                .as_deref()
                .is_some_and(|selected| edge.source == selected || edge.target == selected);

            let stroke = if touches_selection {
                Stroke::new((2.2 * scale.sqrt()).clamp(1.2, 4.5), highlight)
            } else {
                edge_stroke(edge.strength, scale)
            };
            painter.line_segment([start, end], stroke);
        }

        let selected_color = Color32::from_rgb(245, 206, 93);
        for node in &frame.nodes {
            let position = transform.to_screen(pos2(node.x, node.y));
            let radius = node.size * scale;

            let mut color = node_color(node.kind);
            if node.hovered {
                color = blend_color(color, highlight, 0.55);
            }
            if node.selected {
                color = blend_color(color, selected_color, 0.75);
                painter.circle_stroke(
                    position,
                    radius + 4.0,
                    Stroke::new(1.6, Color32::from_rgba_unmultiplied(245, 206, 93, 160)),
                );
            }

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    if node.kind == NodeKind::Organization { 1.6 } else { 1.0 },
                    Color32::from_rgba_unmultiplied(15, 15, 15, 190),
                ),
            );

            let show_label = node.selected
                || node.hovered
                || node.kind == NodeKind::Organization
                || scale > 1.4;
            if show_label {
                painter.text(
                    position + label_offset(radius),
                    Align2::CENTER_CENTER,
                    short_label(&node.label),
                    FontId::proportional(11.0),
                    Color32::from_gray(236),
                );
            }
        }

        if let Some(node) = frame.nodes.iter().find(|node| node.hovered) {
            let kind = match node.kind {
                NodeKind::Organization => "fund",
                NodeKind::Person => "person",
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {kind}", node.label),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let status = match self.engine.phase() {
            Phase::Simulating { step } => {
                format!("layout step {step}/{}", self.engine.config().step_bound)
            }
            Phase::Settled => "layout settled".to_owned(),
        };
        painter.text(
            rect.left_bottom() + vec2(10.0, -10.0),
            Align2::LEFT_BOTTOM,
            status,
            FontId::proportional(12.0),
            Color32::from_gray(170),
        );
    }
}
