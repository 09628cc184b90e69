//! Pointer events mapped onto layout nodes. Coordinates are in the layout's
//! logical canvas space; the viewer converts from screen space first.

use eframe::egui::Pos2;
use serde::Serialize;

use crate::layout::{LayoutEngine, NodeKind};

/// Emitted on a click that lands on a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelected {
    pub node_id: String,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverChange {
    pub previous: Option<String>,
    pub current: Option<String>,
}

#[derive(Debug, Default)]
pub struct Interaction {
    hovered: Option<String>,
}

impl Interaction {
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Updates the hovered id. Returns the transition only when it changed.
    pub fn pointer_moved(&mut self, engine: &LayoutEngine, point: Pos2) -> Option<HoverChange> {
        let current = engine.hit_test(point).map(|node| node.id.clone());
        if current == self.hovered {
            return None;
        }

        let previous = std::mem::replace(&mut self.hovered, current.clone());
        Some(HoverChange { previous, current })
    }

    /// Pointer left the canvas.
    pub fn pointer_left(&mut self) -> Option<HoverChange> {
        let previous = self.hovered.take()?;
        Some(HoverChange {
            previous: Some(previous),
            current: None,
        })
    }

    pub fn pointer_clicked(&self, engine: &LayoutEngine, point: Pos2) -> Option<NodeSelected> {
        engine.hit_test(point).map(|node| NodeSelected {
            node_id: node.id.clone(),
            kind: node.kind,
        })
    }

    pub fn reset(&mut self) {
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::layout::LayoutConfig;
    use crate::vc::{IngestOptions, build_dataset};

    fn engine() -> LayoutEngine {
        let csv = "firstName,lastName,jobExperience_1_company_name,jobExperience_1_positions_1_function\n\
                   Ada,Lovelace,Acme Capital,Partner\n";
        let dataset = build_dataset(csv, Vec::new(), &IngestOptions { current_year: 2025 }).dataset;
        let mut engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
        engine.initialize(&dataset);
        engine
    }

    #[test]
    fn hover_reports_only_transitions() {
        let engine = engine();
        let mut interaction = Interaction::default();

        let change = interaction.pointer_moved(&engine, pos2(200.0, 150.0));
        assert_eq!(
            change,
            Some(HoverChange {
                previous: None,
                current: Some("acme-capital".to_owned()),
            })
        );
        assert_eq!(interaction.pointer_moved(&engine, pos2(201.0, 151.0)), None);
        assert_eq!(interaction.hovered(), Some("acme-capital"));

        let change = interaction.pointer_moved(&engine, pos2(400.0, 200.0));
        assert_eq!(change.and_then(|change| change.current), Some("person-0".to_owned()));

        let change = interaction.pointer_moved(&engine, pos2(700.0, 550.0));
        assert_eq!(change.and_then(|change| change.previous), Some("person-0".to_owned()));
        assert_eq!(interaction.hovered(), None);
    }

    #[test]
    fn click_emits_id_and_kind() {
        let engine = engine();
        let interaction = Interaction::default();

        assert_eq!(
            interaction.pointer_clicked(&engine, pos2(203.0, 148.0)),
            Some(NodeSelected {
                node_id: "acme-capital".to_owned(),
                kind: NodeKind::Organization,
            })
        );
        assert_eq!(
            interaction
                .pointer_clicked(&engine, pos2(402.0, 201.0))
                .map(|selected| selected.kind),
            Some(NodeKind::Person)
        );
        assert_eq!(interaction.pointer_clicked(&engine, pos2(10.0, 10.0)), None);
    }

    #[test]
    fn empty_engine_never_hovers() {
        let engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
        let mut interaction = Interaction::default();
        assert_eq!(interaction.pointer_moved(&engine, pos2(400.0, 300.0)), None);
        assert_eq!(interaction.pointer_clicked(&engine, pos2(400.0, 300.0)), None);
    }

    #[test]
    fn reset_and_leave_clear_hover() {
        let engine = engine();
        let mut interaction = Interaction::default();
        interaction.pointer_moved(&engine, pos2(200.0, 150.0));
        assert!(interaction.pointer_left().is_some());
        assert!(interaction.pointer_left().is_none());

        interaction.pointer_moved(&engine, pos2(200.0, 150.0));
        interaction.reset();
        assert_eq!(interaction.hovered(), None);
    }
}
