use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info};

use crate::util::{parse_leading_int, slugify};

use super::model::{
    CurrentAffiliation, Education, Organization, Person, PreviousRole, UNKNOWN,
    seeded_sub_fund_name,
};
use super::tabular::{Record, Table};

const JOB_SLOTS: usize = 20;
const EDUCATION_SLOTS: usize = 8;
const SKILL_SLOTS: usize = 20;
const LANGUAGE_SLOTS: usize = 9;
const FUND_KEYWORDS: [&str; 4] = ["capital", "ventures", "partners", "fund"];
const INVESTED_COLUMNS: [&str; 10] = [
    "1st VC Fund",
    "2nd VC Fund",
    "3rd VC Fund",
    "4th VC Fund",
    "5th VC Fund",
    "6th VC Fund",
    "7th VC Fund",
    "8th VC Fund",
    "9th VC Fund",
    "10th VC Fund",
];

#[derive(Clone, Copy, Debug)]
pub struct IngestOptions {
    /// Year used for open-ended roles and tenure.
    pub current_year: i32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            current_year: chrono::Local::now().year(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub rows_read: usize,
    pub people: usize,
    pub dropped_rows: usize,
    pub organizations: usize,
    pub fund_slots: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Ingested {
    pub people: Vec<Person>,
    pub organizations: Vec<Organization>,
    pub report: IngestReport,
}

pub fn is_fund_name(company: &str) -> bool {
    let lowered = company.to_lowercase();
    FUND_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

fn parse_year(value: &str) -> Option<i32> {
    parse_leading_int(value).and_then(|year| i32::try_from(year).ok())
}

fn parse_year_or_current(value: &str, current_year: i32) -> i32 {
    parse_year(value)
        .filter(|&year| year != 0)
        .unwrap_or(current_year)
}

fn parse_month(value: &str) -> Option<u8> {
    parse_leading_int(value)
        .and_then(|month| u8::try_from(month).ok())
        .filter(|month| (1..=12).contains(month))
}

fn parse_count(value: &str) -> f64 {
    parse_leading_int(value).unwrap_or(0) as f64
}

/// Dedups organizations by exact name and keeps first-seen order. Distinct
/// names that slug to the same id get `-2`, `-3`, ... suffixes so ids stay
/// unique.
#[derive(Default)]
struct OrganizationMap {
    organizations: Vec<Organization>,
    index_by_name: HashMap<String, usize>,
    index_by_id: HashMap<String, usize>,
}

impl OrganizationMap {
    fn id_of(&self, name: &str) -> Option<&str> {
        let index = *self.index_by_name.get(name)?;
        self.organizations
            .get(index)
            .map(|organization| organization.id.as_str())
    }

    fn unique_id(&self, name: &str) -> String {
        let base = slugify(name);
        if !self.index_by_id.contains_key(&base) {
            return base;
        }
        (2..)
            .map(|suffix| format!("{base}-{suffix}"))
            .find(|candidate| !self.index_by_id.contains_key(candidate))
            .unwrap_or(base)
    }

    /// Returns the id of the organization called `name`, creating it with
    /// `build` when the name has not been seen yet.
    fn get_or_insert(&mut self, name: &str, build: impl FnOnce(String) -> Organization) -> String {
        if let Some(id) = self.id_of(name) {
            return id.to_owned();
        }

        let organization = build(self.unique_id(name));
        let id = organization.id.clone();
        if id != slugify(name) {
            debug!(name, id = %id, "organization slug already taken");
        }
        self.index_by_id.insert(id.clone(), self.organizations.len());
        self.index_by_name
            .insert(organization.name.clone(), self.organizations.len());
        self.organizations.push(organization);
        id
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Organization> {
        let index = *self.index_by_id.get(id)?;
        self.organizations.get_mut(index)
    }
}

struct WorkHistory {
    current: CurrentAffiliation,
    current_role: Option<String>,
    previous_roles: Vec<PreviousRole>,
}

fn collect_work_history(
    record: &Record<'_>,
    options: &IngestOptions,
    organizations: &mut OrganizationMap,
    report: &mut IngestReport,
) -> WorkHistory {
    let mut history = WorkHistory {
        current: CurrentAffiliation::Unaffiliated,
        current_role: None,
        previous_roles: Vec::new(),
    };

    for slot in 1..=JOB_SLOTS {
        let prefix = format!("jobExperience_{slot}");
        let (Some(company), Some(position)) = (
            record.non_empty(&format!("{prefix}_company_name")),
            record.non_empty(&format!("{prefix}_positions_1_function")),
        ) else {
            continue;
        };

        let tenure = format!("{prefix}_positions_1_tenure");
        let is_fund = is_fund_name(company);

        let organization_id = is_fund.then(|| {
            report.fund_slots += 1;
            organizations.get_or_insert(company, |id| {
                let geography = record
                    .non_empty("location_countryCode")
                    .map(str::to_owned)
                    .unwrap_or_else(|| UNKNOWN.to_owned());
                let website = record.get(&format!("{prefix}_company_liUrl")).to_owned();
                Organization::discovered_with_id(id, company, vec![geography], website)
            })
        });

        if slot == 1
            && let Some(organization_id) = organization_id
        {
            history.current = CurrentAffiliation::Fund {
                organization: company.to_owned(),
                organization_id,
                sub_fund: seeded_sub_fund_name(company),
            };
            history.current_role = Some(position.to_owned());
        } else {
            history.previous_roles.push(PreviousRole {
                company: company.to_owned(),
                role: position.to_owned(),
                start_year: parse_year(record.get(&format!("{tenure}_start_year"))).unwrap_or(0),
                end_year: parse_year_or_current(
                    record.get(&format!("{tenure}_end_year")),
                    options.current_year,
                ),
                start_month: parse_month(record.get(&format!("{tenure}_start_month"))),
                end_month: parse_month(record.get(&format!("{tenure}_end_month"))),
                is_fund,
            });
        }
    }

    history
}

fn collect_education(record: &Record<'_>) -> Vec<Education> {
    (1..=EDUCATION_SLOTS)
        .filter_map(|slot| {
            let prefix = format!("education_{slot}");
            let institution = record.non_empty(&format!("{prefix}_company_name"))?;
            Some(Education {
                institution: institution.to_owned(),
                degree: "Degree".to_owned(),
                field: record
                    .non_empty(&format!("{prefix}_subject"))
                    .unwrap_or(UNKNOWN)
                    .to_owned(),
                graduation_year: parse_year(record.get(&format!("{prefix}_tenure_end_year")))
                    .unwrap_or(0),
                start_year: parse_year(record.get(&format!("{prefix}_tenure_start_year"))),
                start_month: parse_month(record.get(&format!("{prefix}_tenure_start_month"))),
                end_month: parse_month(record.get(&format!("{prefix}_tenure_end_month"))),
            })
        })
        .collect()
}

fn collect_slots(record: &Record<'_>, columns: impl Iterator<Item = String>) -> Vec<String> {
    columns
        .filter_map(|column| {
            let value = record.get(&column).trim();
            (!value.is_empty()).then(|| value.to_owned())
        })
        .collect()
}

fn collect_invested_companies(record: &Record<'_>) -> Vec<String> {
    INVESTED_COLUMNS
        .iter()
        .filter_map(|column| record.non_empty(column))
        .filter(|company| *company != UNKNOWN)
        .map(str::to_owned)
        .collect()
}

pub fn influence_score(
    connections: f64,
    followers: f64,
    skill_count: usize,
    education_count: usize,
) -> u8 {
    let raw = connections / 10.0
        + followers / 100.0
        + (skill_count as f64) * 2.0
        + (education_count as f64) * 5.0;
    raw.clamp(0.0, 100.0).round() as u8
}

pub fn tenure_years(current_year: i32, start_year: i32) -> u32 {
    u32::try_from(current_year.saturating_sub(start_year)).unwrap_or(0)
}

fn normalize_record(
    index: usize,
    record: &Record<'_>,
    options: &IngestOptions,
    organizations: &mut OrganizationMap,
    report: &mut IngestReport,
) -> Option<Person> {
    let first_name = record.non_empty("firstName")?;
    let last_name = record.non_empty("lastName")?;

    let history = collect_work_history(record, options, organizations, report);
    let education = collect_education(record);
    let skills = collect_slots(record, (1..=SKILL_SLOTS).map(|slot| format!("skills_{slot}")));
    let languages = collect_slots(
        record,
        (1..=LANGUAGE_SLOTS).map(|slot| format!("languages_{slot}_language")),
    );

    let influence = influence_score(
        parse_count(record.get("connections")),
        parse_count(record.get("followers")),
        skills.len(),
        education.len(),
    );
    let start_year = parse_year_or_current(
        record.get("jobExperience_1_positions_1_tenure_start_year"),
        options.current_year,
    );

    let current_role = history
        .current_role
        .or_else(|| record.non_empty("headline").map(str::to_owned))
        .unwrap_or_else(|| "Professional".to_owned());

    Some(Person {
        id: format!("person-{index}"),
        name: format!("{first_name} {last_name}").trim().to_owned(),
        current_role,
        current: history.current,
        previous_roles: history.previous_roles,
        education,
        skills,
        languages,
        location: record
            .non_empty("location_address")
            .unwrap_or(UNKNOWN)
            .to_owned(),
        profile_url: record
            .non_empty("slug")
            .map(|slug| format!("https://linkedin.com/in/{slug}"))
            .unwrap_or_default(),
        connections: Vec::new(),
        influence,
        tenure: tenure_years(options.current_year, start_year),
        invested_companies: collect_invested_companies(record),
        last_contacted_by: record.non_empty("Last Contacted by").map(str::to_owned),
        last_contact_date: record.non_empty("Last contact time").map(str::to_owned),
        connection_strength: record.non_empty("Connection Strength").map(str::to_owned),
    })
}

/// Turns parsed rows into people and the organizations discovered in their
/// work histories. Runs as one linear pass: an organization only gains the
/// members whose rows are processed after it exists.
pub fn ingest(table: &Table, options: &IngestOptions) -> Ingested {
    let mut organizations = OrganizationMap::default();
    let mut people = Vec::with_capacity(table.len());
    let mut report = IngestReport {
        rows_read: table.len(),
        ..IngestReport::default()
    };

    for (index, record) in table.records().enumerate() {
        let Some(person) =
            normalize_record(index, &record, options, &mut organizations, &mut report)
        else {
            report.dropped_rows += 1;
            debug!(row = index, "dropping row without first and last name");
            continue;
        };

        if let Some(organization_id) = person.current_organization_id()
            && let Some(entry) = organizations.get_mut(organization_id)
        {
            entry.add_current_member(&person.id);
        }

        people.push(person);
    }

    report.people = people.len();
    report.organizations = organizations.organizations.len();
    info!(
        rows = report.rows_read,
        people = report.people,
        organizations = report.organizations,
        dropped = report.dropped_rows,
        "ingested records"
    );

    Ingested {
        people,
        organizations: organizations.organizations,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vc::tabular::parse_table;

    const YEAR: i32 = 2025;

    fn options() -> IngestOptions {
        IngestOptions { current_year: YEAR }
    }

    fn ingest_csv(text: &str) -> Ingested {
        ingest(&parse_table(text), &options())
    }

    #[test]
    fn slot_one_fund_becomes_current_affiliation() {
        let ingested = ingest_csv(
            "firstName,lastName,jobExperience_1_company_name,jobExperience_1_positions_1_function,jobExperience_1_positions_1_tenure_start_year\n\
             Ada,Lovelace,Acme Capital,Partner,2020\n",
        );

        assert_eq!(ingested.people.len(), 1);
        let person = &ingested.people[0];
        assert_eq!(person.id, "person-0");
        assert_eq!(person.name, "Ada Lovelace");
        assert_eq!(person.current_organization(), "Acme Capital");
        assert_eq!(person.current_role, "Partner");
        assert_eq!(person.current_sub_fund(), Some("Acme Capital Fund I"));
        assert_eq!(person.tenure, (YEAR - 2020) as u32);
        assert!(person.previous_roles.is_empty());

        assert_eq!(ingested.organizations.len(), 1);
        let organization = &ingested.organizations[0];
        assert_eq!(organization.id, "acme-capital");
        assert_eq!(organization.name, "Acme Capital");
        assert_eq!(organization.current_team(), ["person-0"]);
        assert_eq!(organization.team_size(), 1);
        assert_eq!(organization.sub_funds[0].team_members, vec!["person-0"]);
        assert_eq!(organization.geography, vec!["Unknown"]);
    }

    #[test]
    fn later_fund_slots_do_not_make_a_person_current() {
        let ingested = ingest_csv(
            "firstName,lastName,headline,jobExperience_1_company_name,jobExperience_1_positions_1_function,jobExperience_2_company_name,jobExperience_2_positions_1_function,jobExperience_2_positions_1_tenure_start_year,location_countryCode\n\
             Grace,Hopper,Engineer,Navy Labs,Officer,Harbor Partners,Advisor,2011,US\n",
        );

        let person = &ingested.people[0];
        assert_eq!(person.current_organization(), "Unknown");
        assert_eq!(person.current_role, "Engineer");
        assert_eq!(person.previous_roles.len(), 2);
        assert!(!person.previous_roles[0].is_fund);
        assert!(person.previous_roles[1].is_fund);
        assert_eq!(person.previous_roles[1].start_year, 2011);
        assert_eq!(person.previous_roles[1].end_year, YEAR);

        let organization = &ingested.organizations[0];
        assert_eq!(organization.name, "Harbor Partners");
        assert_eq!(organization.team_size(), 0);
        assert_eq!(organization.geography, vec!["US"]);
    }

    #[test]
    fn rows_missing_a_name_are_dropped_and_counted() {
        let ingested = ingest_csv("firstName,lastName\nAda,\n,Turing\nAlan,Turing\n");
        assert_eq!(ingested.people.len(), 1);
        assert_eq!(ingested.people[0].id, "person-2");
        assert_eq!(ingested.report.rows_read, 3);
        assert_eq!(ingested.report.dropped_rows, 2);
    }

    #[test]
    fn organizations_are_deduplicated_in_first_seen_order() {
        let ingested = ingest_csv(
            "firstName,lastName,jobExperience_1_company_name,jobExperience_1_positions_1_function\n\
             A,One,Blue Fund,Partner\n\
             B,Two,Red Ventures,Associate\n\
             C,Three,Blue Fund,Principal\n",
        );

        let names = ingested
            .organizations
            .iter()
            .map(|organization| organization.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Blue Fund", "Red Ventures"]);
        assert_eq!(ingested.organizations[0].current_team(), ["person-0", "person-2"]);
        for organization in &ingested.organizations {
            assert_eq!(organization.team_size(), organization.current_team().len());
        }
    }

    #[test]
    fn names_sharing_a_slug_get_distinct_ids() {
        let ingested = ingest_csv(
            "firstName,lastName,jobExperience_1_company_name,jobExperience_1_positions_1_function\n\
             A,One,Acme Capital,Partner\n\
             B,Two,ACME CAPITAL,Associate\n\
             C,Three,Acme  Capital,Principal\n\
             D,Four,Acme Capital,Analyst\n",
        );

        let ids = ingested
            .organizations
            .iter()
            .map(|organization| organization.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["acme-capital", "acme-capital-2", "acme-capital-3"]);
        assert_eq!(ingested.organizations[1].name, "ACME CAPITAL");
        assert_eq!(
            ingested.organizations[1].sub_funds[0].id,
            "acme-capital-2-fund-i"
        );

        assert_eq!(ingested.organizations[0].current_team(), ["person-0", "person-3"]);
        assert_eq!(ingested.organizations[1].current_team(), ["person-1"]);
        assert_eq!(ingested.organizations[2].current_team(), ["person-2"]);
        assert_eq!(
            ingested.people[1].current_organization_id(),
            Some("acme-capital-2")
        );
        assert_eq!(ingested.people[1].current_organization(), "ACME CAPITAL");
    }

    #[test]
    fn education_skills_and_languages_keep_slot_order() {
        let ingested = ingest_csv(
            "firstName,lastName,education_1_company_name,education_1_tenure_end_year,education_2_company_name,education_2_subject,skills_1,skills_2,skills_3,languages_1_language,languages_2_language\n\
             Ada,Lovelace,Cambridge,1835,INSEAD,Finance,Math, ,Math,English,French\n",
        );

        let person = &ingested.people[0];
        assert_eq!(person.education.len(), 2);
        assert_eq!(person.education[0].field, "Unknown");
        assert_eq!(person.education[0].degree, "Degree");
        assert_eq!(person.education[0].graduation_year, 1835);
        assert_eq!(person.education[1].field, "Finance");
        assert_eq!(person.education[1].graduation_year, 0);
        assert_eq!(person.skills, vec!["Math", "Math"]);
        assert_eq!(person.languages, vec!["English", "French"]);
    }

    #[test]
    fn invested_companies_skip_blank_and_unknown() {
        let ingested = ingest_csv(
            "firstName,lastName,1st VC Fund,2nd VC Fund,3rd VC Fund,10th VC Fund\n\
             Ada,Lovelace,Stripe,Unknown,,Figma\n",
        );
        assert_eq!(ingested.people[0].invested_companies, vec!["Stripe", "Figma"]);
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let ingested = ingest_csv(
            "firstName,lastName,connections,followers,jobExperience_1_company_name,jobExperience_1_positions_1_function,jobExperience_1_positions_1_tenure_start_year\n\
             Ada,Lovelace,lots,n/a,Acme Capital,Partner,soon\n",
        );
        let person = &ingested.people[0];
        assert_eq!(person.influence, 0);
        assert_eq!(person.tenure, 0);
    }

    #[test]
    fn future_start_year_keeps_tenure_non_negative() {
        let ingested = ingest_csv(
            "firstName,lastName,jobExperience_1_positions_1_tenure_start_year\n\
             Ada,Lovelace,2999\n",
        );
        assert_eq!(ingested.people[0].tenure, 0);
    }

    #[test]
    fn oversized_connection_counts_clamp_influence() {
        let ingested = ingest_csv("firstName,lastName,connections\nAda,Lovelace,99999999999999999999\n");
        assert_eq!(ingested.people[0].influence, 100);
    }

    #[test]
    fn influence_is_clamped_and_rounded() {
        assert_eq!(influence_score(0.0, 0.0, 0, 0), 0);
        assert_eq!(influence_score(500.0, 150.0, 1, 1), 59);
        assert_eq!(influence_score(5.0, 0.0, 0, 0), 1);
        assert_eq!(influence_score(50_000.0, 0.0, 20, 8), 100);
        assert_eq!(influence_score(-9_000.0, 0.0, 3, 0), 0);
    }

    #[test]
    fn influence_stays_in_range_for_any_counts() {
        for connections in [-100_000.0, -1.0, 0.0, 37.0, 4_999.0, 1e9] {
            for followers in [-5.0, 0.0, 250.0, 1e7] {
                for skills in [0, 7, 20] {
                    for education in [0, 3, 8] {
                        let score = influence_score(connections, followers, skills, education);
                        assert!(score <= 100);
                    }
                }
            }
        }
    }

    #[test]
    fn contact_and_profile_fields_are_carried() {
        let ingested = ingest_csv(
            "firstName,lastName,slug,location_address,Last Contacted by,Last contact time,Connection Strength\n\
             Ada,Lovelace,ada-l,London,Charles,2024-05-01,Strong\n",
        );
        let person = &ingested.people[0];
        assert_eq!(person.profile_url, "https://linkedin.com/in/ada-l");
        assert_eq!(person.location, "London");
        assert_eq!(person.last_contacted_by.as_deref(), Some("Charles"));
        assert_eq!(person.last_contact_date.as_deref(), Some("2024-05-01"));
        assert_eq!(person.connection_strength.as_deref(), Some("Strong"));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let ingested = ingest_csv("");
        assert!(ingested.people.is_empty());
        assert!(ingested.organizations.is_empty());
        assert_eq!(ingested.report, IngestReport::default());
    }

    #[test]
    fn fund_classification_is_case_insensitive() {
        assert!(is_fund_name("SEQUOIA CAPITAL"));
        assert!(is_fund_name("Index Ventures"));
        assert!(is_fund_name("Accel Partners"));
        assert!(is_fund_name("Founders Fund"));
        assert!(!is_fund_name("Google"));
    }
}
