use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

use crate::layout::NodeKind;
use crate::vc::{Dataset, Organization, Person};

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_RESULTS: usize = 10;

const NAME_WEIGHT: u32 = 10;
/// Below every substring weight, so a loose subsequence hit on a name never
/// pushes a real field match out of the result list.
const FUZZY_NAME_WEIGHT: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub subtitle: String,
    pub relevance: u32,
    pub matched_fields: Vec<&'static str>,
}

/// Accumulates relevance and the distinct field labels that matched.
struct Score<'q> {
    needle: &'q str,
    relevance: u32,
    fields: Vec<&'static str>,
}

impl<'q> Score<'q> {
    fn new(needle: &'q str) -> Self {
        Self {
            needle,
            relevance: 0,
            fields: Vec::new(),
        }
    }

    fn hit(&mut self, field: &'static str, weight: u32) {
        self.relevance += weight;
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
    }

    fn text(&mut self, field: &'static str, weight: u32, value: &str) {
        if value.to_lowercase().contains(self.needle) {
            self.hit(field, weight);
        }
    }

    fn each<'a>(
        &mut self,
        field: &'static str,
        weight: u32,
        values: impl IntoIterator<Item = &'a str>,
    ) {
        for value in values {
            self.text(field, weight, value);
        }
    }

    fn name(&mut self, matcher: &SkimMatcherV2, query: &str, name: &str) {
        if name.to_lowercase().contains(self.needle) {
            self.hit("name", NAME_WEIGHT);
        } else if fuzzy_match_score(matcher, name, query).is_some() {
            self.hit("name", FUZZY_NAME_WEIGHT);
        }
    }

    fn finish(self) -> Option<(u32, Vec<&'static str>)> {
        (!self.fields.is_empty()).then_some((self.relevance, self.fields))
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn score_person(
    matcher: &SkimMatcherV2,
    query: &str,
    needle: &str,
    person: &Person,
) -> Option<(u32, Vec<&'static str>)> {
    let mut score = Score::new(needle);
    score.name(matcher, query, &person.name);
    score.text("role", 8, &person.current_role);
    score.each("skills", 6, person.skills.iter().map(String::as_str));
    score.each(
        "education",
        5,
        person.education.iter().map(|education| education.institution.as_str()),
    );
    score.each(
        "previous experience",
        4,
        person.previous_roles.iter().map(|role| role.company.as_str()),
    );
    score.text("location", 3, &person.location);
    score.each("languages", 2, person.languages.iter().map(String::as_str));
    score.finish()
}

fn score_organization(
    matcher: &SkimMatcherV2,
    query: &str,
    needle: &str,
    organization: &Organization,
) -> Option<(u32, Vec<&'static str>)> {
    let mut score = Score::new(needle);
    score.name(matcher, query, &organization.name);
    score.text("description", 7, &organization.description);
    score.each("sector focus", 6, organization.sector_focus.iter().map(String::as_str));
    score.each("geography", 5, organization.geography.iter().map(String::as_str));
    score.each("investment stage", 4, organization.stage.iter().map(String::as_str));
    score.text("fund size", 3, &organization.fund_size);
    score.finish()
}

/// Ranks people and organizations against `query`. People come before
/// organizations at equal relevance.
pub fn search(dataset: &Dataset, query: &str) -> Vec<SearchResult> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let needle = query.to_lowercase();
    let mut results = Vec::new();

    for person in &dataset.people {
        let Some((relevance, matched_fields)) = score_person(&matcher, query, &needle, person)
        else {
            continue;
        };
        let organization = person
            .current_organization_id()
            .and_then(|id| dataset.organization(id))
            .map(|organization| organization.name.as_str())
            .unwrap_or("Unknown Fund");
        results.push(SearchResult {
            id: person.id.clone(),
            kind: NodeKind::Person,
            name: person.name.clone(),
            subtitle: format!("{} • {}", person.current_role, organization),
            relevance,
            matched_fields,
        });
    }

    for organization in &dataset.organizations {
        let Some((relevance, matched_fields)) =
            score_organization(&matcher, query, &needle, organization)
        else {
            continue;
        };
        results.push(SearchResult {
            id: organization.id.clone(),
            kind: NodeKind::Organization,
            name: organization.name.clone(),
            subtitle: format!(
                "{} • {} team members",
                organization.fund_size,
                organization.team_size()
            ),
            relevance,
            matched_fields,
        });
    }

    results.sort_by(|left, right| right.relevance.cmp(&left.relevance));
    results.truncate(MAX_RESULTS);
    results
}
