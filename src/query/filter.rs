use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::vc::{Dataset, Organization, Person};

/// Fund size ranges offered by the filter panel, in USD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundSizeBucket {
    #[serde(rename = "<$100M")]
    Under100M,
    #[serde(rename = "$100M-$500M")]
    From100MTo500M,
    #[serde(rename = "$500M-$1B")]
    From500MTo1B,
    #[serde(rename = "$1B-$5B")]
    From1BTo5B,
    #[serde(rename = "$5B+")]
    Over5B,
}

impl FundSizeBucket {
    pub const ALL: [Self; 5] = [
        Self::Under100M,
        Self::From100MTo500M,
        Self::From500MTo1B,
        Self::From1BTo5B,
        Self::Over5B,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Under100M => "<$100M",
            Self::From100MTo500M => "$100M-$500M",
            Self::From500MTo1B => "$500M-$1B",
            Self::From1BTo5B => "$1B-$5B",
            Self::Over5B => "$5B+",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }

    /// Lower bound inclusive, upper bound exclusive, in millions.
    pub fn contains(self, millions: f64) -> bool {
        let (low, high) = match self {
            Self::Under100M => (f64::NEG_INFINITY, 100.0),
            Self::From100MTo500M => (100.0, 500.0),
            Self::From500MTo1B => (500.0, 1_000.0),
            Self::From1BTo5B => (1_000.0, 5_000.0),
            Self::Over5B => (5_000.0, f64::INFINITY),
        };
        millions >= low && millions < high
    }
}

/// Parses free-text fund sizes such as `$2.5B`, `$750M`, `€40k` or
/// `1.2 billion` into USD millions. A bare number is read as dollars.
pub fn parse_fund_size_millions(text: &str) -> Option<f64> {
    let lowered = text.to_lowercase();
    let start = lowered.find(|c: char| c.is_ascii_digit())?;
    let rest = &lowered[start..];

    let number_end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(rest.len());
    let amount = rest[..number_end].replace(',', "").parse::<f64>().ok()?;

    let suffix = rest[number_end..].trim_start();
    let millions = if suffix.starts_with('b') {
        amount * 1_000.0
    } else if suffix.starts_with('m') {
        amount
    } else if suffix.starts_with('k') || suffix.starts_with("thousand") {
        amount / 1_000.0
    } else {
        amount / 1_000_000.0
    };
    Some(millions)
}

fn any_selected<'a>(selected: &[String], values: impl IntoIterator<Item = &'a String>) -> bool {
    selected.is_empty() || values.into_iter().any(|value| selected.contains(value))
}

/// Filter panel state. Empty lists and zero minimums place no constraint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterOptions {
    pub education: Vec<String>,
    pub previous_companies: Vec<String>,
    pub invested_companies: Vec<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub min_influence: u8,
    pub min_tenure: u32,
    pub geography: Vec<String>,
    pub sector_focus: Vec<String>,
    pub fund_size: Vec<FundSizeBucket>,
}

impl FilterOptions {
    pub fn has_active_filters(&self) -> bool {
        !self.education.is_empty()
            || !self.previous_companies.is_empty()
            || !self.invested_companies.is_empty()
            || !self.skills.is_empty()
            || !self.languages.is_empty()
            || self.min_influence > 0
            || self.min_tenure > 0
            || !self.geography.is_empty()
            || !self.sector_focus.is_empty()
            || !self.fund_size.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn person_matches(&self, person: &Person) -> bool {
        any_selected(
            &self.education,
            person.education.iter().map(|education| &education.institution),
        ) && any_selected(
            &self.previous_companies,
            person.previous_roles.iter().map(|role| &role.company),
        ) && any_selected(&self.invested_companies, &person.invested_companies)
            && any_selected(&self.skills, &person.skills)
            && any_selected(&self.languages, &person.languages)
            && person.influence >= self.min_influence
            && person.tenure >= self.min_tenure
    }

    pub fn organization_matches(&self, organization: &Organization) -> bool {
        if !any_selected(&self.geography, &organization.geography)
            || !any_selected(&self.sector_focus, &organization.sector_focus)
        {
            return false;
        }
        if self.fund_size.is_empty() {
            return true;
        }

        parse_fund_size_millions(&organization.fund_size).is_some_and(|millions| {
            self.fund_size
                .iter()
                .any(|bucket| bucket.contains(millions))
        })
    }

    /// Keeps matching people and organizations plus the connections whose
    /// endpoints both survive. Person connection lists and organization teams
    /// are pruned to surviving people.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        if !self.has_active_filters() {
            return dataset.clone();
        }

        let kept = dataset
            .people
            .iter()
            .filter(|person| self.person_matches(person))
            .map(|person| person.id.as_str())
            .collect::<HashSet<_>>();

        let people = dataset
            .people
            .iter()
            .filter(|person| kept.contains(person.id.as_str()))
            .map(|person| {
                let mut person = person.clone();
                person.connections.retain(|id| kept.contains(id.as_str()));
                person
            })
            .collect::<Vec<_>>();
        let organizations = dataset
            .organizations
            .iter()
            .filter(|organization| self.organization_matches(organization))
            .map(|organization| {
                let mut organization = organization.clone();
                organization.retain_members(|id| kept.contains(id));
                organization
            })
            .collect();

        let connections = dataset
            .connections
            .iter()
            .filter(|connection| {
                kept.contains(connection.person1.as_str())
                    && kept.contains(connection.person2.as_str())
            })
            .cloned()
            .collect();

        Dataset {
            people,
            organizations,
            connections,
        }
    }
}
