use std::collections::BTreeSet;

use eframe::egui::{self, RichText, Ui, Vec2};
use vc_atlas::query::{FundSizeBucket, SearchResult, search};
use vc_atlas::vc::Dataset;

use super::super::{SearchCache, ViewModel};

const SEARCH_RESULT_ROWS: f32 = 260.0;
const CHOICE_LIST_HEIGHT: f32 = 160.0;

/// Distinct values offered by the filter lists, taken from the loaded export.
#[derive(Default)]
pub(in crate::app) struct FilterChoices {
    education: Vec<String>,
    previous_companies: Vec<String>,
    invested_companies: Vec<String>,
    skills: Vec<String>,
    languages: Vec<String>,
    geography: Vec<String>,
    sector_focus: Vec<String>,
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|value| !value.trim().is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl FilterChoices {
    pub(in crate::app) fn from_dataset(dataset: &Dataset) -> Self {
        let people = &dataset.people;
        let organizations = &dataset.organizations;

        Self {
            education: distinct(
                people
                    .iter()
                    .flat_map(|person| &person.education)
                    .map(|education| &education.institution),
            ),
            previous_companies: distinct(
                people
                    .iter()
                    .flat_map(|person| &person.previous_roles)
                    .map(|role| &role.company),
            ),
            invested_companies: distinct(
                people
                    .iter()
                    .flat_map(|person| &person.invested_companies),
            ),
            skills: distinct(people.iter().flat_map(|person| &person.skills)),
            languages: distinct(people.iter().flat_map(|person| &person.languages)),
            geography: distinct(
                organizations
                    .iter()
                    .flat_map(|organization| &organization.geography),
            ),
            sector_focus: distinct(
                organizations
                    .iter()
                    .flat_map(|organization| &organization.sector_focus),
            ),
        }
    }
}

/// Checkbox list bound to a selection vector. Returns whether it changed.
fn choice_list(ui: &mut Ui, title: &str, options: &[String], selected: &mut Vec<String>) -> bool {
    let mut changed = false;
    let header = if selected.is_empty() {
        title.to_owned()
    } else {
        format!("{title} ({})", selected.len())
    };

    ui.collapsing(header, |ui| {
        if options.is_empty() {
            ui.label("Nothing in this export.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt(title)
            .max_height(CHOICE_LIST_HEIGHT)
            .show(ui, |ui| {
                for option in options {
                    let mut checked = selected.contains(option);
                    if ui.checkbox(&mut checked, option.as_str()).changed() {
                        if checked {
                            selected.push(option.clone());
                        } else {
                            selected.retain(|value| value != option);
                        }
                        changed = true;
                    }
                }
            });
    });

    changed
}

impl ViewModel {
    fn search_results(&mut self) -> &[SearchResult] {
        let query = self.search.trim();
        let stale = self
            .search_cache
            .as_ref()
            .is_none_or(|cached| cached.query != query);
        if stale {
            self.search_cache = Some(SearchCache {
                query: query.to_owned(),
                results: search(&self.visible, query),
            });
        }

        self.search_cache
            .as_ref()
            .map(|cached| cached.results.as_slice())
            .unwrap_or_default()
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Search people and funds")
            .on_hover_text("Matches names, roles, skills, schools, employers and fund details.");
        ui.text_edit_singleline(&mut self.search);

        let mut picked = None;
        let results = self.search_results();
        if !results.is_empty() {
            egui::ScrollArea::vertical()
                .id_salt("search_results")
                .max_height(SEARCH_RESULT_ROWS)
                .show(ui, |ui| {
                    for result in results {
                        let response = ui
                            .link(format!("{}  ({})", result.name, result.subtitle))
                            .on_hover_text(format!(
                                "relevance {}: {}",
                                result.relevance,
                                result.matched_fields.join(", ")
                            ));
                        if response.clicked() {
                            picked = Some(result.id.clone());
                        }
                    }
                });
        }

        if let Some(id) = picked {
            self.set_selected(Some(id));
            self.search.clear();
        }
    }

    fn draw_layout_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Layout").strong());
        ui.checkbox(&mut self.animate_layout, "Animate layout")
            .on_hover_text("Advance the simulation one step per frame until it settles.");
        ui.horizontal(|ui| {
            if ui.button("Restart layout").clicked() {
                self.restart_layout();
            }
            if ui.button("Reset view").clicked() {
                self.pan = Vec2::ZERO;
                self.zoom = 1.0;
            }
        });
        if !self.animate_layout && !self.engine.is_settled() && ui.button("Settle now").clicked() {
            self.engine.run_to_settled();
        }
    }

    fn draw_filters(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Filters").strong());
            let clear = ui.add_enabled(
                self.filters.has_active_filters(),
                egui::Button::new("Clear"),
            );
            if clear.clicked() {
                self.filters.clear();
                self.apply_filters();
            }
        });

        let mut changed = false;
        let choices = &self.choices;
        let filters = &mut self.filters;

        ui.label("People");
        changed |= choice_list(ui, "Education", &choices.education, &mut filters.education);
        changed |= choice_list(
            ui,
            "Previous companies",
            &choices.previous_companies,
            &mut filters.previous_companies,
        );
        changed |= choice_list(
            ui,
            "Invested companies",
            &choices.invested_companies,
            &mut filters.invested_companies,
        );
        changed |= choice_list(ui, "Skills", &choices.skills, &mut filters.skills);
        changed |= choice_list(ui, "Languages", &choices.languages, &mut filters.languages);
        changed |= ui
            .add(egui::Slider::new(&mut filters.min_influence, 0..=100).text("Min influence"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut filters.min_tenure, 0..=40).text("Min tenure (years)"))
            .changed();

        ui.add_space(4.0);
        ui.label("Funds");
        changed |= choice_list(ui, "Geography", &choices.geography, &mut filters.geography);
        changed |= choice_list(
            ui,
            "Sector focus",
            &choices.sector_focus,
            &mut filters.sector_focus,
        );

        let selected_buckets = filters.fund_size.len();
        let header = if selected_buckets == 0 {
            "Fund size".to_owned()
        } else {
            format!("Fund size ({selected_buckets})")
        };
        ui.collapsing(header, |ui| {
            for bucket in FundSizeBucket::ALL {
                let mut checked = filters.fund_size.contains(&bucket);
                if ui.checkbox(&mut checked, bucket.label()).changed() {
                    if checked {
                        filters.fund_size.push(bucket);
                    } else {
                        filters.fund_size.retain(|value| *value != bucket);
                    }
                    changed = true;
                }
            }
        });

        if changed {
            self.apply_filters();
        }
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Explore");
        ui.separator();
        ui.add_space(4.0);

        self.draw_search(ui);
        ui.separator();
        self.draw_layout_controls(ui);
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("filters_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| self.draw_filters(ui));
    }
}
