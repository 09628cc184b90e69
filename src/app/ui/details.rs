use eframe::egui::{self, RichText, Ui};
use vc_atlas::query::{
    TimelineEntry, TimelineKind, alumni, employees, graduation_cohorts, person_timeline,
    sort_timeline,
};
use vc_atlas::vc::{Organization, Person};

use super::super::ViewModel;

const COHORTS_SHOWN: usize = 5;

/// Overview drill-downs opened from the statistics clusters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) enum DrillDown {
    Institution(String),
    Company(String),
}

/// What a click in the details panel asks for.
enum Action {
    Select(Option<String>),
    Open(DrillDown),
    Close,
}

fn tag_line(ui: &mut Ui, title: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    ui.label(format!("{title}: {}", values.join(", ")));
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let mut action = None;

        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let selected = self.selected.as_deref();
                action = if let Some(person) = selected.and_then(|id| self.visible.person(id)) {
                    self.draw_person(ui, person)
                } else if let Some(organization) =
                    selected.and_then(|id| self.visible.organization(id))
                {
                    self.draw_organization(ui, organization)
                } else if let Some(drill_down) = &self.drill_down {
                    self.draw_drill_down(ui, drill_down)
                } else {
                    self.draw_statistics(ui)
                };
            });

        match action {
            Some(Action::Select(selection)) => self.set_selected(selection),
            Some(Action::Open(drill_down)) => {
                self.set_selected(None);
                self.drill_down = Some(drill_down);
            }
            Some(Action::Close) => self.drill_down = None,
            None => {}
        }
    }

    fn draw_person(&self, ui: &mut Ui, person: &Person) -> Option<Action> {
        let mut next = None;

        ui.horizontal(|ui| {
            ui.heading("Person");
            if ui.small_button("Back to overview").clicked() {
                next = Some(Action::Select(None));
            }
        });
        ui.add_space(6.0);

        ui.label(RichText::new(person.name.as_str()).strong());
        ui.label(person.current_role.as_str());
        let organization = person.current_organization();
        match person
            .current_organization_id()
            .filter(|id| self.visible.organization(id).is_some())
        {
            Some(id) => {
                if ui.link(organization).clicked() {
                    next = Some(Action::Select(Some(id.to_owned())));
                }
            }
            None => {
                ui.label(organization);
            }
        }
        if let Some(sub_fund) = person.current_sub_fund() {
            ui.small(sub_fund);
        }

        ui.add_space(6.0);
        ui.label(format!("Location: {}", person.location));
        ui.label(format!("Influence: {}", person.influence));
        ui.label(format!("Tenure: {} years", person.tenure));
        if !person.profile_url.is_empty() {
            ui.hyperlink_to("Profile", person.profile_url.as_str());
        }
        tag_line(ui, "Skills", &person.skills);
        tag_line(ui, "Languages", &person.languages);
        tag_line(ui, "Invested in", &person.invested_companies);

        if person.last_contacted_by.is_some()
            || person.last_contact_date.is_some()
            || person.connection_strength.is_some()
        {
            ui.separator();
            ui.label(RichText::new("Contact").strong());
            if let Some(by) = &person.last_contacted_by {
                ui.label(format!("Last contacted by: {by}"));
            }
            if let Some(date) = &person.last_contact_date {
                ui.label(format!("Last contact: {date}"));
            }
            if let Some(strength) = &person.connection_strength {
                ui.label(format!("Connection strength: {strength}"));
            }
        }

        ui.separator();
        ui.label(RichText::new("Timeline").strong());
        let timeline = person_timeline(person, self.current_year);
        if timeline.is_empty() {
            ui.label("None recorded.");
        }
        for entry in &timeline {
            ui.horizontal_wrapped(|ui| {
                let drill_down = match entry.kind {
                    TimelineKind::Education => DrillDown::Institution(entry.place.clone()),
                    TimelineKind::Experience => DrillDown::Company(entry.place.clone()),
                };
                if ui.link(entry.place.as_str()).clicked() {
                    next = Some(Action::Open(drill_down));
                }
                ui.label(format!("{} ({})", entry.role, entry.duration_label()));
            });
        }

        ui.separator();
        ui.label(RichText::new("Connections").strong());
        if person.connections.is_empty() {
            ui.label("No known connections.");
        }
        for id in &person.connections {
            match self.visible.person(id) {
                Some(other) => {
                    if ui.link(other.name.as_str()).clicked() {
                        next = Some(Action::Select(Some(other.id.clone())));
                    }
                }
                None => {
                    ui.weak(format!("{id} (hidden by filters)"));
                }
            }
        }

        next
    }

    fn draw_organization(&self, ui: &mut Ui, organization: &Organization) -> Option<Action> {
        let mut next = None;

        ui.horizontal(|ui| {
            ui.heading("Fund");
            if ui.small_button("Back to overview").clicked() {
                next = Some(Action::Select(None));
            }
        });
        ui.add_space(6.0);

        ui.label(RichText::new(organization.name.as_str()).strong());
        if !organization.description.is_empty() {
            ui.label(organization.description.as_str());
        }
        ui.label(format!("Founded: {}", organization.founded_year));
        ui.label(format!("Fund size: {}", organization.fund_size));
        ui.label(format!("Influence score: {}", organization.influence_score));
        ui.label(format!("Team size: {}", organization.team_size()));
        tag_line(ui, "Geography", &organization.geography);
        tag_line(ui, "Stage", &organization.stage);
        tag_line(ui, "Sector focus", &organization.sector_focus);
        if !organization.website.is_empty() {
            ui.hyperlink_to("Website", organization.website.as_str());
        }

        ui.separator();
        ui.label(RichText::new("Current team").strong());
        if organization.current_team().is_empty() {
            ui.label("No current members in this export.");
        }
        for id in organization.current_team() {
            match self.visible.person(id) {
                Some(person) => {
                    let label = format!("{} ({})", person.name, person.current_role);
                    if ui.link(label).clicked() {
                        next = Some(Action::Select(Some(person.id.clone())));
                    }
                }
                None => {
                    ui.weak(format!("{id} (hidden by filters)"));
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("Sub-funds").strong());
        for sub_fund in &organization.sub_funds {
            ui.label(format!(
                "{} · {} · vintage {} · {:?}",
                sub_fund.name, sub_fund.size, sub_fund.vintage, sub_fund.status
            ));
            let metrics = [
                ("MOIC", sub_fund.moic),
                ("IRR", sub_fund.irr),
                ("DPI", sub_fund.dpi),
                ("TVPI", sub_fund.tvpi),
            ]
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| format!("{name} {value:.2}")))
            .collect::<Vec<_>>();
            if !metrics.is_empty() {
                ui.small(metrics.join("  "));
            }
            tag_line(ui, "Investments", &sub_fund.investments);
        }

        next
    }

    fn draw_statistics(&self, ui: &mut Ui) -> Option<Action> {
        let stats = &self.statistics;
        let mut next = None;

        ui.heading("Overview");
        ui.add_space(6.0);
        ui.label(format!("Funds: {}", stats.organizations));
        ui.label(format!("People: {}", stats.people));
        ui.label(format!("Average influence: {:.0}", stats.average_influence));
        ui.label(format!("Average tenure: {:.1} years", stats.average_tenure));
        ui.label(format!("Average team size: {:.1}", stats.average_team_size));
        ui.label(format!("Average growth rate: {:.1}%", stats.average_growth_rate));
        ui.label(format!("Portfolio companies: {}", stats.total_portfolio_companies));
        ui.label(format!(
            "Ingest: {} rows, {} dropped, {} fund slots",
            self.report.rows_read, self.report.dropped_rows, self.report.fund_slots
        ));

        ui.separator();
        ui.label(RichText::new("Education clusters").strong());
        for entry in &stats.top_education {
            if ui.link(format!("{}  ({})", entry.label, entry.count)).clicked() {
                next = Some(Action::Open(DrillDown::Institution(entry.label.clone())));
            }
        }

        ui.separator();
        ui.label(RichText::new("Company clusters").strong());
        for entry in &stats.top_companies {
            if ui.link(format!("{}  ({})", entry.label, entry.count)).clicked() {
                next = Some(Action::Open(DrillDown::Company(entry.label.clone())));
            }
        }

        ui.separator();
        ui.label(RichText::new("Top influencers").strong());
        for influencer in &stats.top_influencers {
            ui.label(format!("{}  ({})", influencer.name, influencer.influence));
        }

        ui.separator();
        ui.label(RichText::new("Largest portfolios").strong());
        for portfolio in &stats.top_portfolios {
            ui.label(format!("{}  ({})", portfolio.name, portfolio.portfolio_size));
        }

        ui.separator();
        ui.label(RichText::new("Geography").strong());
        for entry in &stats.geography {
            ui.label(format!("{}  ({})", entry.label, entry.count));
        }

        next
    }

    fn draw_drill_down(&self, ui: &mut Ui, drill_down: &DrillDown) -> Option<Action> {
        let mut next = None;

        let (title, place) = match drill_down {
            DrillDown::Institution(name) => ("Alumni", name),
            DrillDown::Company(name) => ("Employees", name),
        };
        ui.horizontal(|ui| {
            ui.heading(title);
            if ui.small_button("Back to overview").clicked() {
                next = Some(Action::Close);
            }
        });
        ui.label(RichText::new(place.as_str()).strong());
        ui.add_space(6.0);

        match drill_down {
            DrillDown::Institution(institution) => {
                let entries = alumni(&self.visible, institution);
                ui.label(format!("{} alumni", entries.len()));

                ui.separator();
                ui.label(RichText::new("Graduation cohorts").strong());
                for cohort in graduation_cohorts(&entries).iter().take(COHORTS_SHOWN) {
                    let year = if cohort.year > 0 {
                        cohort.year.to_string()
                    } else {
                        "Unknown".to_owned()
                    };
                    ui.label(format!("{year}  ({})", cohort.person_ids.len()));
                }

                ui.separator();
                if let Some(action) = timeline_rows(ui, &entries) {
                    next = Some(action);
                }
            }
            DrillDown::Company(company) => {
                let mut entries = employees(&self.visible, company, self.current_year);
                sort_timeline(&mut entries);
                let (current, former): (Vec<_>, Vec<_>) =
                    entries.into_iter().partition(|entry| entry.current);

                for (heading, group) in [("Current", current), ("Former", former)] {
                    ui.separator();
                    ui.label(RichText::new(format!("{heading} ({})", group.len())).strong());
                    if let Some(action) = timeline_rows(ui, &group) {
                        next = Some(action);
                    }
                }
            }
        }

        next
    }
}

fn timeline_rows(ui: &mut Ui, entries: &[TimelineEntry]) -> Option<Action> {
    let mut next = None;
    if entries.is_empty() {
        ui.label("Nobody in the visible data.");
    }
    for entry in entries {
        ui.horizontal_wrapped(|ui| {
            if ui.link(entry.name.as_str()).clicked() {
                next = Some(Action::Select(Some(entry.person_id.clone())));
            }
            let overlap = if entry.overlap { "  [same year]" } else { "" };
            ui.label(format!("{} ({}){overlap}", entry.role, entry.duration_label()));
        });
    }
    next
}
