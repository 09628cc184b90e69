use std::collections::HashSet;

use eframe::egui::{Vec2, pos2};

use crate::vc::Dataset;

use super::config::LayoutConfig;
use super::{LayoutEdge, LayoutNode, NodeKind};

/// Seeds organizations on the coarse grid followed by people on the denser
/// one. The result depends only on the dataset order and the config.
pub(super) fn seed_nodes(dataset: &Dataset, config: &LayoutConfig) -> Vec<LayoutNode> {
    let organizations = dataset
        .organizations
        .iter()
        .enumerate()
        .map(|(index, organization)| {
            let (x, y) = config.organization_grid.position(index);
            LayoutNode {
                id: organization.id.clone(),
                label: organization.name.clone(),
                kind: NodeKind::Organization,
                position: pos2(x, y),
                velocity: Vec2::ZERO,
                size: config
                    .organization_size
                    .size_for(organization.team_size() as f32),
                connections: organization.current_team().to_vec(),
            }
        });

    let people = dataset.people.iter().enumerate().map(|(index, person)| {
        let (x, y) = config.person_grid.position(index);
        LayoutNode {
            id: person.id.clone(),
            label: person.name.clone(),
            kind: NodeKind::Person,
            position: pos2(x, y),
            velocity: Vec2::ZERO,
            size: config.person_size.size_for(f32::from(person.influence)),
            connections: person.connections.clone(),
        }
    });

    organizations.chain(people).collect()
}

/// Connection edges first, then one organization -> member edge per person
/// whose current organization id names a known organization.
pub(super) fn derive_edges(dataset: &Dataset) -> Vec<LayoutEdge> {
    let mut edges = dataset
        .connections
        .iter()
        .map(|connection| LayoutEdge {
            source: connection.person1.clone(),
            target: connection.person2.clone(),
            strength: connection.strength,
        })
        .collect::<Vec<_>>();

    let organization_ids = dataset
        .organizations
        .iter()
        .map(|organization| organization.id.as_str())
        .collect::<HashSet<_>>();

    for person in &dataset.people {
        if let Some(organization_id) = person.current_organization_id()
            && organization_ids.contains(organization_id)
        {
            edges.push(LayoutEdge {
                source: organization_id.to_owned(),
                target: person.id.clone(),
                strength: 1.0,
            });
        }
    }

    edges
}
