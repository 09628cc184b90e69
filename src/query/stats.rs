use std::collections::HashMap;

use serde::Serialize;

use crate::vc::Dataset;

const TOP_N: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: String,
    pub name: String,
    pub influence: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub portfolio_size: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub organizations: usize,
    pub people: usize,
    pub top_education: Vec<Ranked>,
    pub top_companies: Vec<Ranked>,
    pub top_influencers: Vec<Influencer>,
    pub top_portfolios: Vec<Portfolio>,
    pub geography: Vec<Ranked>,
    pub average_influence: f64,
    pub average_tenure: f64,
    pub average_team_size: f64,
    pub average_growth_rate: f64,
    pub total_portfolio_companies: usize,
}

/// Counts labels and orders them by count, then name.
fn rank<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<Ranked> {
    let mut counts = HashMap::<&str, usize>::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut ranked = counts
        .into_iter()
        .map(|(label, count)| Ranked {
            label: label.to_owned(),
            count,
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.label.cmp(&right.label))
    });
    ranked
}

fn top(mut ranked: Vec<Ranked>) -> Vec<Ranked> {
    ranked.truncate(TOP_N);
    ranked
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

pub fn statistics(dataset: &Dataset) -> Statistics {
    let people = &dataset.people;
    let organizations = &dataset.organizations;

    let top_education = top(rank(
        people
            .iter()
            .flat_map(|person| &person.education)
            .map(|education| education.institution.as_str()),
    ));
    let top_companies = top(rank(
        people
            .iter()
            .flat_map(|person| &person.previous_roles)
            .filter(|role| !role.is_fund)
            .map(|role| role.company.as_str()),
    ));

    let mut by_influence = people.iter().collect::<Vec<_>>();
    by_influence.sort_by(|left, right| right.influence.cmp(&left.influence));
    let top_influencers = by_influence
        .into_iter()
        .take(TOP_N)
        .map(|person| Influencer {
            id: person.id.clone(),
            name: person.name.clone(),
            influence: person.influence,
        })
        .collect();

    let mut portfolios = organizations
        .iter()
        .map(|organization| Portfolio {
            id: organization.id.clone(),
            name: organization.name.clone(),
            portfolio_size: organization.portfolio_size(),
        })
        .collect::<Vec<_>>();
    let total_portfolio_companies = portfolios
        .iter()
        .map(|portfolio| portfolio.portfolio_size)
        .sum();
    portfolios.sort_by(|left, right| right.portfolio_size.cmp(&left.portfolio_size));
    portfolios.truncate(TOP_N);

    let geography = rank(
        organizations
            .iter()
            .flat_map(|organization| &organization.geography)
            .map(String::as_str),
    );

    Statistics {
        organizations: organizations.len(),
        people: people.len(),
        top_education,
        top_companies,
        top_influencers,
        top_portfolios: portfolios,
        geography,
        average_influence: average(
            people.iter().map(|person| f64::from(person.influence)).sum(),
            people.len(),
        ),
        average_tenure: average(
            people.iter().map(|person| f64::from(person.tenure)).sum(),
            people.len(),
        ),
        average_team_size: average(
            organizations
                .iter()
                .map(|organization| organization.team_size() as f64)
                .sum(),
            organizations.len(),
        ),
        average_growth_rate: average(
            organizations
                .iter()
                .map(|organization| organization.growth_rate)
                .sum(),
            organizations.len(),
        ),
        total_portfolio_companies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vc::{IngestOptions, build_dataset};

    fn dataset() -> Dataset {
        let csv = "firstName,lastName,connections,education_1_company_name,education_2_company_name,location_countryCode,jobExperience_1_company_name,jobExperience_1_positions_1_function,jobExperience_1_positions_1_tenure_start_year,jobExperience_2_company_name,jobExperience_2_positions_1_function\n\
                   Ada,Lovelace,900,Oxford,MIT,GB,Acme Capital,Partner,2015,Google,Engineer\n\
                   Alan,Turing,300,MIT,,US,Blue Ventures,Principal,2021,Google,Researcher\n\
                   Grace,Hopper,600,Yale,,US,Navy Labs,Officer,2020,Harbor Partners,Advisor\n";
        let mut dataset =
            build_dataset(csv, Vec::new(), &IngestOptions { current_year: 2025 }).dataset;
        dataset.organizations[1].sub_funds[0].investments =
            vec!["Stripe".to_owned(), "Figma".to_owned()];
        dataset.organizations[0].growth_rate = 30.0;
        dataset
    }

    #[test]
    fn clusters_rank_by_count_then_name() {
        let stats = statistics(&dataset());
        assert_eq!(
            stats.top_education,
            vec![
                Ranked { label: "MIT".to_owned(), count: 2 },
                Ranked { label: "Oxford".to_owned(), count: 1 },
                Ranked { label: "Yale".to_owned(), count: 1 },
            ]
        );
        assert_eq!(
            stats.top_companies,
            vec![
                Ranked { label: "Google".to_owned(), count: 2 },
                Ranked { label: "Navy Labs".to_owned(), count: 1 },
            ]
        );
    }

    #[test]
    fn influencers_and_portfolios_are_ordered() {
        let stats = statistics(&dataset());
        let influencers = stats
            .top_influencers
            .iter()
            .map(|influencer| influencer.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(influencers, vec!["person-0", "person-2", "person-1"]);

        assert_eq!(stats.top_portfolios[0].id, "blue-ventures");
        assert_eq!(stats.top_portfolios[0].portfolio_size, 2);
        assert_eq!(stats.total_portfolio_companies, 2);
    }

    #[test]
    fn geography_and_averages() {
        let stats = statistics(&dataset());
        assert_eq!(stats.organizations, 3);
        assert_eq!(stats.people, 3);
        assert_eq!(
            stats.geography,
            vec![
                Ranked { label: "US".to_owned(), count: 2 },
                Ranked { label: "GB".to_owned(), count: 1 },
            ]
        );
        assert!((stats.average_tenure - 19.0 / 3.0).abs() < 1e-9);
        assert!((stats.average_team_size - 2.0 / 3.0).abs() < 1e-9);
        assert!((stats.average_growth_rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_averages_to_zero() {
        let stats = statistics(&Dataset::default());
        assert_eq!(stats, Statistics::default());
    }
}
