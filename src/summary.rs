//! Headless run: settle the layout and describe the result as JSON.

use serde::Serialize;
use tracing::info;

use crate::layout::{ConfigError, FrameSnapshot, LayoutConfig, LayoutEngine};
use crate::query::{Statistics, statistics};
use crate::vc::{IngestReport, LoadedDataset};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    pub id: String,
    pub name: String,
    pub team_size: usize,
    pub current_team: Vec<String>,
    pub sub_funds: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub report: IngestReport,
    pub people: usize,
    pub connections: usize,
    pub organizations: Vec<OrganizationSummary>,
    pub statistics: Statistics,
    pub steps: u32,
    pub layout: FrameSnapshot,
}

pub fn summarize(loaded: &LoadedDataset, config: LayoutConfig) -> Result<Summary, ConfigError> {
    let dataset = &loaded.dataset;
    let mut engine = LayoutEngine::new(config)?;
    engine.initialize(dataset);
    let steps = engine.run_to_settled();
    info!(steps, nodes = engine.nodes().len(), "layout settled for summary");

    let organizations = dataset
        .organizations
        .iter()
        .map(|organization| OrganizationSummary {
            id: organization.id.clone(),
            name: organization.name.clone(),
            team_size: organization.team_size(),
            current_team: organization.current_team().to_vec(),
            sub_funds: organization
                .sub_funds
                .iter()
                .map(|sub_fund| sub_fund.name.clone())
                .collect(),
        })
        .collect();

    Ok(Summary {
        report: loaded.report,
        people: dataset.people.len(),
        connections: dataset.connections.len(),
        organizations,
        statistics: statistics(dataset),
        steps,
        layout: engine.frame(None, None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vc::{IngestOptions, build_dataset};

    #[test]
    fn summary_reports_settled_layout() {
        let csv = "firstName,lastName,jobExperience_1_company_name,jobExperience_1_positions_1_function\n\
                   Ada,Lovelace,Example Ventures,Partner\n\
                   ,Nobody,,\n";
        let loaded = build_dataset(csv, Vec::new(), &IngestOptions { current_year: 2025 });
        let config = LayoutConfig {
            step_bound: 12,
            ..LayoutConfig::default()
        };

        let summary = summarize(&loaded, config).unwrap();
        assert_eq!(summary.steps, 12);
        assert_eq!(summary.people, 1);
        assert_eq!(summary.report.dropped_rows, 1);
        assert_eq!(summary.organizations[0].id, "example-ventures");
        assert_eq!(summary.organizations[0].team_size, 1);
        assert_eq!(summary.organizations[0].sub_funds, vec!["Example Ventures Fund I"]);
        assert_eq!(summary.layout.nodes.len(), 2);
        assert_eq!(summary.layout.edges.len(), 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["organizations"][0]["teamSize"], 1);
        assert_eq!(json["layout"]["nodes"][0]["kind"], "organization");
    }

    #[test]
    fn invalid_config_is_reported() {
        let loaded = build_dataset("", Vec::new(), &IngestOptions { current_year: 2025 });
        let config = LayoutConfig {
            canvas_width: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            summarize(&loaded, config),
            Err(ConfigError::InvalidCanvas { .. })
        ));
    }
}
