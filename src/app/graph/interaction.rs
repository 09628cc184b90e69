use eframe::egui::{self, Rect, Ui, Vec2};
use tracing::debug;

use super::super::ViewModel;
use super::super::render_utils::CanvasTransform;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let config = self.engine.config();
        let anchor = CanvasTransform::new(rect, self.pan, self.zoom, config).to_canvas(pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.25, 8.0);
        let unpanned = CanvasTransform::new(rect, Vec2::ZERO, self.zoom, config);
        self.pan = pointer - unpanned.to_screen(anchor);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Feeds pointer movement and primary clicks to the interaction layer in
    /// canvas coordinates.
    pub(in crate::app) fn handle_graph_pointer(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        transform: &CanvasTransform,
    ) {
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| response.rect.contains(*pointer));

        let change = match pointer {
            Some(pointer) => self
                .interaction
                .pointer_moved(&self.engine, transform.to_canvas(pointer)),
            None => self.interaction.pointer_left(),
        };
        if let Some(change) = change {
            debug!(previous = ?change.previous, current = ?change.current, "hover changed");
        }

        if !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }
        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };

        let selection = self
            .interaction
            .pointer_clicked(&self.engine, transform.to_canvas(pointer));
        if let Some(selected) = &selection {
            debug!(node = %selected.node_id, kind = ?selected.kind, "node selected");
        }
        self.set_selected(selection.map(|selected| selected.node_id));
    }
}
