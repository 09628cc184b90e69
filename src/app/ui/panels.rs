use eframe::egui::{self, Align, Context, Layout, Vec2};
use tracing::{debug, info};
use vc_atlas::interaction::Interaction;
use vc_atlas::layout::LayoutEngine;
use vc_atlas::query::{FilterOptions, statistics};
use vc_atlas::vc::LoadedDataset;

use super::super::{DataSource, ViewModel};
use super::FilterChoices;

impl ViewModel {
    pub(in crate::app) fn new(
        loaded: LoadedDataset,
        engine: LayoutEngine,
        current_year: i32,
    ) -> Self {
        let LoadedDataset { dataset, report } = loaded;
        let choices = FilterChoices::from_dataset(&dataset);

        let mut model = Self {
            visible: dataset.clone(),
            statistics: statistics(&dataset),
            dataset,
            current_year,
            report,
            choices,
            filters: FilterOptions::default(),
            engine,
            interaction: Interaction::default(),
            selected: None,
            drill_down: None,
            search: String::new(),
            search_cache: None,
            animate_layout: true,
            pan: Vec2::ZERO,
            zoom: 1.0,
        };
        model.restart_layout();
        model
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &DataSource,
        reload_requested: &mut bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("vc-atlas");
                    ui.separator();
                    ui.label(format!("export: {}", source.csv.display()));
                    ui.label(format!(
                        "funds: {}/{}",
                        self.visible.organizations.len(),
                        self.dataset.organizations.len()
                    ));
                    ui.label(format!(
                        "people: {}/{}",
                        self.visible.people.len(),
                        self.dataset.people.len()
                    ));
                    if self.report.dropped_rows > 0 {
                        ui.label(format!("dropped rows: {}", self.report.dropped_rows))
                            .on_hover_text("Rows without both a first and a last name.");
                    }
                    if ui.button("Reload export").clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Restart layout").clicked() {
                        self.restart_layout();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.filters.has_active_filters() {
                            ui.label("filters active");
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            debug!(?selected, "selection changed");
            self.selected = selected;
        }
    }

    /// Starts a new layout run over the visible entities. Any step scheduled
    /// for the previous run is dropped by the engine.
    pub(in crate::app) fn restart_layout(&mut self) {
        let run = self.engine.initialize(&self.visible);
        self.interaction.reset();
        debug!(?run, "layout restarted");
    }

    pub(in crate::app) fn apply_filters(&mut self) {
        self.visible = self.filters.apply(&self.dataset);
        self.statistics = statistics(&self.visible);
        self.search_cache = None;

        let selection_visible = self.selected.as_deref().is_some_and(|id| {
            self.visible.person(id).is_some() || self.visible.organization(id).is_some()
        });
        if !selection_visible {
            self.selected = None;
        }

        info!(
            people = self.visible.people.len(),
            organizations = self.visible.organizations.len(),
            active = self.filters.has_active_filters(),
            "filters applied"
        );
        self.restart_layout();
    }
}
