//! Force-directed placement of organizations and people on a fixed canvas.
//!
//! A run starts with [`LayoutEngine::initialize`], advances one step per
//! [`LayoutEngine::step`] call and settles after the configured step bound.
//! Every step is tied to the run that scheduled it through a [`StepTicket`];
//! re-initializing starts a new run and any ticket from an older run is
//! dropped without touching the nodes.

mod build;
mod config;
mod forces;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2};
use serde::Serialize;
use tracing::{debug, info};

use crate::vc::Dataset;

pub use config::{ConfigError, GridSeed, LayoutConfig, NeighborStrategy, SizeRange};
use forces::{StepScratch, step_pairwise, step_quadtree};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Organization,
    Person,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub position: Pos2,
    pub velocity: Vec2,
    pub size: f32,
    pub connections: Vec<String>,
}

impl LayoutNode {
    pub fn contains(&self, point: Pos2) -> bool {
        self.position.distance(point) <= self.size
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEdge {
    pub source: String,
    pub target: String,
    pub strength: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

/// Permission to apply one step to the run that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepTicket {
    run: RunId,
}

impl StepTicket {
    pub fn run(&self) -> RunId {
        self.run
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Simulating { step: u32 },
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A step was applied and more remain.
    Advanced { step: u32 },
    /// A step was applied and it was the last one.
    Settled { step: u32 },
    /// The run is current but already settled.
    Idle,
    /// The ticket belongs to an older run.
    Stale,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub selected: bool,
    pub hovered: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub strength: f32,
}

/// What a renderer needs to draw one frame.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FrameSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

pub struct LayoutEngine {
    config: LayoutConfig,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    index_by_id: HashMap<String, usize>,
    phase: Phase,
    run: RunId,
    scratch: StepScratch,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            index_by_id: HashMap::new(),
            phase: Phase::Settled,
            run: RunId::default(),
            scratch: StepScratch::default(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled
    }

    pub fn current_run(&self) -> RunId {
        self.run
    }

    /// Discards all node state and seeds a fresh run from `dataset`.
    pub fn initialize(&mut self, dataset: &Dataset) -> RunId {
        self.run = RunId(self.run.0.wrapping_add(1));
        self.nodes = build::seed_nodes(dataset, &self.config);
        self.edges = build::derive_edges(dataset);

        self.index_by_id.clear();
        for (index, node) in self.nodes.iter().enumerate() {
            self.index_by_id.insert(node.id.clone(), index);
        }

        self.phase = if self.nodes.is_empty() {
            Phase::Settled
        } else {
            Phase::Simulating { step: 0 }
        };

        info!(
            run = self.run.0,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            quadtree = self.config.uses_quadtree(self.nodes.len()),
            "layout initialized"
        );
        self.run
    }

    pub fn schedule(&self) -> StepTicket {
        StepTicket { run: self.run }
    }

    pub fn step(&mut self, ticket: StepTicket) -> StepOutcome {
        if ticket.run != self.run {
            debug!(
                ticket_run = ticket.run.0,
                current_run = self.run.0,
                "dropping stale layout step"
            );
            return StepOutcome::Stale;
        }

        let Phase::Simulating { step } = self.phase else {
            return StepOutcome::Idle;
        };

        let step = step + 1;
        if self.config.uses_quadtree(self.nodes.len()) {
            step_quadtree(&mut self.nodes, &self.config, step, &mut self.scratch);
        } else {
            step_pairwise(&mut self.nodes, &self.config, step);
        }

        if step >= self.config.step_bound {
            self.phase = Phase::Settled;
            debug!(run = self.run.0, steps = step, "layout settled");
            StepOutcome::Settled { step }
        } else {
            self.phase = Phase::Simulating { step };
            StepOutcome::Advanced { step }
        }
    }

    /// Runs the current simulation to its bound and returns the number of
    /// steps applied.
    pub fn run_to_settled(&mut self) -> u32 {
        let mut applied = 0;
        loop {
            match self.step(self.schedule()) {
                StepOutcome::Advanced { .. } => applied += 1,
                StepOutcome::Settled { .. } => return applied + 1,
                StepOutcome::Idle | StepOutcome::Stale => return applied,
            }
        }
    }

    /// Topmost node under `point`. Nodes are drawn in order, so among
    /// overlapping hits the last one wins.
    pub fn hit_test(&self, point: Pos2) -> Option<&LayoutNode> {
        self.nodes.iter().rev().find(|node| node.contains(point))
    }

    pub fn frame(&self, selected: Option<&str>, hovered: Option<&str>) -> FrameSnapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|node| NodeView {
                id: node.id.clone(),
                label: node.label.clone(),
                kind: node.kind,
                x: node.position.x,
                y: node.position.y,
                size: node.size,
                selected: selected == Some(node.id.as_str()),
                hovered: hovered == Some(node.id.as_str()),
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .filter_map(|edge| {
                let source = self.node(&edge.source)?;
                let target = self.node(&edge.target)?;
                Some(EdgeView {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    from: [source.position.x, source.position.y],
                    to: [target.position.x, target.position.y],
                    strength: edge.strength,
                })
            })
            .collect();

        FrameSnapshot { nodes, edges }
    }
}
