use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::model::{Connection, Dataset, Person, clamp_strength};
use super::normalize::{IngestOptions, IngestReport, ingest};
use super::tabular::parse_table;

pub struct LoadedDataset {
    pub dataset: Dataset,
    pub report: IngestReport,
}

pub fn parse_connections(raw: &str) -> Result<Vec<Connection>> {
    let mut connections: Vec<Connection> =
        serde_json::from_str(raw).context("invalid connections JSON")?;
    for connection in &mut connections {
        connection.strength = clamp_strength(connection.strength);
    }
    Ok(connections)
}

/// Records each connection on both endpoints' `connections` lists. Returns
/// how many connections named a person that is not in `people`.
pub fn link_connections(people: &mut [Person], connections: &[Connection]) -> usize {
    let index_by_id = people
        .iter()
        .enumerate()
        .map(|(index, person)| (person.id.clone(), index))
        .collect::<HashMap<_, _>>();

    let mut dangling = 0usize;
    for connection in connections {
        let (Some(&first), Some(&second)) = (
            index_by_id.get(&connection.person1),
            index_by_id.get(&connection.person2),
        ) else {
            dangling += 1;
            continue;
        };
        if first == second {
            continue;
        }

        let mut link = |from: usize, to_id: &str| {
            let links = &mut people[from].connections;
            if !links.iter().any(|existing| existing == to_id) {
                links.push(to_id.to_owned());
            }
        };
        link(first, &connection.person2);
        link(second, &connection.person1);
    }

    dangling
}

pub fn build_dataset(
    csv_text: &str,
    connections: Vec<Connection>,
    options: &IngestOptions,
) -> LoadedDataset {
    let table = parse_table(csv_text);
    let ingested = ingest(&table, options);

    let mut people = ingested.people;
    let dangling = link_connections(&mut people, &connections);
    if dangling > 0 {
        warn!(dangling, "connections reference people missing from the export");
    }

    LoadedDataset {
        dataset: Dataset {
            people,
            organizations: ingested.organizations,
            connections,
        },
        report: ingested.report,
    }
}

pub fn load_dataset(
    csv_path: &Path,
    connections_path: Option<&Path>,
    options: &IngestOptions,
) -> Result<LoadedDataset> {
    let csv_text = fs::read_to_string(csv_path)
        .with_context(|| format!("failed to read CSV export {}", csv_path.display()))?;

    let connections = match connections_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read connections file {}", path.display()))?;
            parse_connections(&raw)
                .with_context(|| format!("failed to parse connections file {}", path.display()))?
        }
        None => Vec::new(),
    };

    let loaded = build_dataset(&csv_text, connections, options);
    info!(
        path = %csv_path.display(),
        people = loaded.dataset.people.len(),
        organizations = loaded.dataset.organizations.len(),
        connections = loaded.dataset.connections.len(),
        "loaded dataset"
    );
    Ok(loaded)
}
