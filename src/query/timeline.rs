use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::Month;
use serde::Serialize;

use crate::vc::{Dataset, Education, Person, PreviousRole};

/// Years assumed for a degree when only the graduation year is known.
const DEGREE_YEARS: i32 = 4;
const FALLBACK_START_YEAR: i32 = 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimelineKind {
    Education,
    Experience,
}

/// One stint of one person at a company or institution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub person_id: String,
    pub name: String,
    pub role: String,
    pub place: String,
    pub kind: TimelineKind,
    pub start_year: i32,
    pub start_month: Option<u8>,
    pub end_year: Option<i32>,
    pub end_month: Option<u8>,
    pub current: bool,
    /// Another entry in the same listing ends in the same year.
    pub overlap: bool,
}

impl TimelineEntry {
    /// `"Mar 2019 - Present"`, `"2015 - Jun 2019"`.
    pub fn duration_label(&self) -> String {
        let start = format_date(self.start_year, self.start_month);
        let end = match self.end_year {
            Some(year) if !self.current => format_date(year, self.end_month),
            _ => "Present".to_owned(),
        };
        format!("{start} - {end}")
    }

    fn experience(person: &Person, role: &PreviousRole) -> Self {
        Self {
            person_id: person.id.clone(),
            name: person.name.clone(),
            role: role.role.clone(),
            place: role.company.clone(),
            kind: TimelineKind::Experience,
            start_year: role.start_year,
            start_month: role.start_month,
            end_year: Some(role.end_year),
            end_month: role.end_month,
            current: false,
            overlap: false,
        }
    }

    fn current_position(person: &Person, current_year: i32) -> Option<Self> {
        if person.current_organization_id().is_none() {
            return None;
        }
        let tenure = i32::try_from(person.tenure).unwrap_or(i32::MAX);

        Some(Self {
            person_id: person.id.clone(),
            name: person.name.clone(),
            role: person.current_role.clone(),
            place: person.current_organization().to_owned(),
            kind: TimelineKind::Experience,
            start_year: current_year.saturating_sub(tenure),
            start_month: None,
            end_year: None,
            end_month: None,
            current: true,
            overlap: false,
        })
    }

    fn education(person: &Person, education: &Education) -> Self {
        let graduated = (education.graduation_year > 0).then_some(education.graduation_year);
        let start_year = education
            .start_year
            .filter(|year| *year > 0)
            .or_else(|| graduated.map(|year| year - DEGREE_YEARS))
            .unwrap_or(FALLBACK_START_YEAR);

        Self {
            person_id: person.id.clone(),
            name: person.name.clone(),
            role: format!("{} in {}", education.degree, education.field),
            place: education.institution.clone(),
            kind: TimelineKind::Education,
            start_year,
            start_month: education.start_month,
            end_year: graduated,
            end_month: education.end_month,
            current: false,
            overlap: false,
        }
    }
}

fn format_date(year: i32, month: Option<u8>) -> String {
    match month.and_then(|month| Month::try_from(month).ok()) {
        Some(month) => format!("{} {year}", &month.name()[..3]),
        None => year.to_string(),
    }
}

/// Most recent start first; the start month breaks ties and a missing month
/// sorts last. Stable, so equal entries keep their order.
pub fn sort_timeline(entries: &mut [TimelineEntry]) {
    entries.sort_by_key(|entry| Reverse((entry.start_year, entry.start_month.unwrap_or(0))));
}

/// Everyone in `dataset` who studied at `institution`, latest graduates
/// first. Entries sharing a graduation year are flagged as overlapping.
pub fn alumni(dataset: &Dataset, institution: &str) -> Vec<TimelineEntry> {
    let mut entries = dataset
        .people
        .iter()
        .filter_map(|person| {
            let education = person
                .education
                .iter()
                .find(|education| education.institution == institution)?;
            Some(TimelineEntry::education(person, education))
        })
        .collect::<Vec<_>>();
    entries.sort_by_key(|entry| Reverse(entry.end_year.unwrap_or(0)));

    let cohorts = cohort_sizes(&entries);
    for entry in &mut entries {
        entry.overlap = cohorts
            .get(&entry.end_year.unwrap_or(0))
            .is_some_and(|count| *count > 1);
    }
    entries
}

fn cohort_sizes(entries: &[TimelineEntry]) -> BTreeMap<i32, usize> {
    let mut sizes = BTreeMap::new();
    for entry in entries {
        *sizes.entry(entry.end_year.unwrap_or(0)).or_default() += 1;
    }
    sizes
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    /// Graduation year, 0 when unknown.
    pub year: i32,
    pub person_ids: Vec<String>,
}

/// Alumni grouped by graduation year, most recent year first.
pub fn graduation_cohorts(entries: &[TimelineEntry]) -> Vec<Cohort> {
    let mut cohorts = BTreeMap::<i32, Vec<String>>::new();
    for entry in entries {
        cohorts
            .entry(entry.end_year.unwrap_or(0))
            .or_default()
            .push(entry.person_id.clone());
    }

    cohorts
        .into_iter()
        .rev()
        .map(|(year, person_ids)| Cohort { year, person_ids })
        .collect()
}

/// People who work or worked at `company`. Current members of a fund with
/// that name are listed with their current role and a start derived from
/// tenure; everyone else with their first role there.
pub fn employees(dataset: &Dataset, company: &str, current_year: i32) -> Vec<TimelineEntry> {
    dataset
        .people
        .iter()
        .filter_map(|person| {
            if person.current_organization_id().is_some()
                && person.current_organization() == company
            {
                return TimelineEntry::current_position(person, current_year);
            }
            person
                .previous_roles
                .iter()
                .find(|role| role.company == company)
                .map(|role| TimelineEntry::experience(person, role))
        })
        .collect()
}

/// One person's career and education, most recent first.
pub fn person_timeline(person: &Person, current_year: i32) -> Vec<TimelineEntry> {
    let mut entries = TimelineEntry::current_position(person, current_year)
        .into_iter()
        .chain(
            person
                .previous_roles
                .iter()
                .map(|role| TimelineEntry::experience(person, role)),
        )
        .chain(
            person
                .education
                .iter()
                .map(|education| TimelineEntry::education(person, education)),
        )
        .collect::<Vec<_>>();
    sort_timeline(&mut entries);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vc::{IngestOptions, build_dataset};

    const YEAR: i32 = 2025;

    fn dataset() -> Dataset {
        let csv = "firstName,lastName,education_1_company_name,education_1_subject,education_1_tenure_start_year,education_1_tenure_start_month,education_1_tenure_end_year,jobExperience_1_company_name,jobExperience_1_positions_1_function,jobExperience_1_positions_1_tenure_start_year,jobExperience_2_company_name,jobExperience_2_positions_1_function,jobExperience_2_positions_1_tenure_start_year,jobExperience_2_positions_1_tenure_start_month,jobExperience_2_positions_1_tenure_end_year,jobExperience_2_positions_1_tenure_end_month\n\
                   Ada,Lovelace,MIT,Math,2008,9,2012,Acme Capital,Partner,2019,Google,Engineer,2012,3,2019,6\n\
                   Alan,Turing,MIT,Physics,,,2012,Google,Researcher,2014,,,,,,\n\
                   Grace,Hopper,MIT,CS,,,2016,Navy Labs,Officer,2017,Acme Capital,Analyst,2016,,2017,\n\
                   Edsger,Dijkstra,Oxford,CS,,,,Google,Lead,2020,,,,,,\n";
        build_dataset(csv, Vec::new(), &IngestOptions { current_year: YEAR }).dataset
    }

    fn ids(entries: &[TimelineEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.person_id.as_str()).collect()
    }

    #[test]
    fn alumni_are_sorted_by_graduation_and_flag_shared_years() {
        let entries = alumni(&dataset(), "MIT");
        assert_eq!(ids(&entries), vec!["person-2", "person-0", "person-1"]);
        assert_eq!(
            entries.iter().map(|entry| entry.overlap).collect::<Vec<_>>(),
            vec![false, true, true]
        );

        let ada = &entries[1];
        assert_eq!(ada.role, "Degree in Math");
        assert_eq!((ada.start_year, ada.start_month), (2008, Some(9)));
        assert_eq!(ada.duration_label(), "Sep 2008 - 2012");

        let alan = &entries[2];
        assert_eq!(alan.start_year, 2008);
        assert_eq!(alan.kind, TimelineKind::Education);
    }

    #[test]
    fn unknown_graduation_year_falls_back() {
        let entries = alumni(&dataset(), "Oxford");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_year, FALLBACK_START_YEAR);
        assert_eq!(entries[0].end_year, None);
        assert!(!entries[0].overlap);
        assert!(alumni(&dataset(), "Stanford").is_empty());
    }

    #[test]
    fn cohorts_group_alumni_newest_first() {
        let cohorts = graduation_cohorts(&alumni(&dataset(), "MIT"));
        assert_eq!(
            cohorts,
            vec![
                Cohort {
                    year: 2016,
                    person_ids: vec!["person-2".to_owned()],
                },
                Cohort {
                    year: 2012,
                    person_ids: vec!["person-0".to_owned(), "person-1".to_owned()],
                },
            ]
        );
    }

    #[test]
    fn employees_split_into_current_and_former() {
        let dataset = dataset();

        let acme = employees(&dataset, "Acme Capital", YEAR);
        assert_eq!(ids(&acme), vec!["person-0", "person-2"]);
        assert!(acme[0].current);
        assert_eq!(acme[0].role, "Partner");
        assert_eq!(acme[0].start_year, 2019);
        assert_eq!(acme[0].duration_label(), "2019 - Present");
        assert!(!acme[1].current);
        assert_eq!(acme[1].role, "Analyst");
        assert_eq!(acme[1].duration_label(), "2016 - 2017");

        let google = employees(&dataset, "Google", YEAR);
        assert_eq!(ids(&google), vec!["person-0", "person-1", "person-3"]);
        assert_eq!(google[0].duration_label(), "Mar 2012 - Jun 2019");
        assert!(google.iter().all(|entry| !entry.current));
    }

    #[test]
    fn timeline_orders_by_start_year_then_month() {
        let mut entries = employees(&dataset(), "Google", YEAR);
        entries[1].start_year = 2012;
        entries[1].start_month = Some(11);
        sort_timeline(&mut entries);
        assert_eq!(ids(&entries), vec!["person-3", "person-1", "person-0"]);
    }

    #[test]
    fn person_timeline_mixes_roles_and_education() {
        let dataset = dataset();
        let ada = dataset.person("person-0").unwrap();
        let entries = person_timeline(ada, YEAR);

        let places = entries
            .iter()
            .map(|entry| (entry.place.as_str(), entry.kind))
            .collect::<Vec<_>>();
        assert_eq!(
            places,
            vec![
                ("Acme Capital", TimelineKind::Experience),
                ("Google", TimelineKind::Experience),
                ("MIT", TimelineKind::Education),
            ]
        );
    }
}
