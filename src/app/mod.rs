use std::path::PathBuf;

use anyhow::Result;
use eframe::egui::{self, Context, Vec2};
use tracing::error;
use vc_atlas::interaction::Interaction;
use vc_atlas::layout::{LayoutConfig, LayoutEngine};
use vc_atlas::query::{FilterOptions, SearchResult, Statistics};
use vc_atlas::vc::{Dataset, IngestOptions, IngestReport, LoadedDataset, load_dataset};

mod graph;
mod render_utils;
mod ui;

/// Files the viewer (re)loads from.
pub struct DataSource {
    pub csv: PathBuf,
    pub connections: Option<PathBuf>,
    pub options: IngestOptions,
}

impl DataSource {
    pub fn load(&self) -> Result<LoadedDataset> {
        load_dataset(&self.csv, self.connections.as_deref(), &self.options)
    }
}

pub struct AtlasApp {
    source: DataSource,
    layout_config: LayoutConfig,
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: Dataset,
    current_year: i32,
    report: IngestReport,
    visible: Dataset,
    choices: ui::FilterChoices,
    filters: FilterOptions,
    engine: LayoutEngine,
    interaction: Interaction,
    selected: Option<String>,
    drill_down: Option<ui::DrillDown>,
    search: String,
    search_cache: Option<SearchCache>,
    statistics: Statistics,
    animate_layout: bool,
    pan: Vec2,
    zoom: f32,
}

struct SearchCache {
    query: String,
    results: Vec<SearchResult>,
}

impl AtlasApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: DataSource,
        layout_config: LayoutConfig,
    ) -> Self {
        let state = Self::load_state(&source, &layout_config);
        Self {
            source,
            layout_config,
            state,
        }
    }

    fn load_state(source: &DataSource, layout_config: &LayoutConfig) -> AppState {
        let loaded = match source.load() {
            Ok(loaded) => loaded,
            Err(error) => {
                error!(error = %format!("{error:#}"), "failed to load dataset");
                return AppState::Error(format!("{error:#}"));
            }
        };

        match LayoutEngine::new(layout_config.clone()) {
            Ok(engine) => AppState::Ready(Box::new(ViewModel::new(
                loaded,
                engine,
                source.options.current_year,
            ))),
            Err(error) => AppState::Error(error.to_string()),
        }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut reload_requested = false;

        match &mut self.state {
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the network export");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        reload_requested = true;
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx, &self.source, &mut reload_requested);
            }
        }

        if reload_requested {
            self.state = Self::load_state(&self.source, &self.layout_config);
        }
    }
}
