use eframe::egui::{Pos2, Vec2, pos2};

use super::LayoutNode;
use super::config::LayoutConfig;
use super::quadtree::QuadNode;

/// Reusable buffers for the quadtree pass.
#[derive(Default)]
pub(super) struct StepScratch {
    start_positions: Vec<Pos2>,
    candidates: Vec<usize>,
}

pub(super) fn dampening(config: &LayoutConfig, step: u32) -> f32 {
    (1.0 - step as f32 / config.step_bound as f32).max(config.dampening_floor)
}

fn repulsion(
    position: Pos2,
    size: f32,
    other: &LayoutNode,
    config: &LayoutConfig,
    dampening: f32,
) -> Option<Vec2> {
    let delta = position - other.position;
    let distance = delta.length();
    let min_distance = size + other.size + config.separation_margin;
    if distance < min_distance && distance > 0.0 {
        let force = (min_distance - distance) * config.repulsion * dampening;
        Some(delta / distance * force)
    } else {
        None
    }
}

/// Clamps `value` into `[low, high]`; the lower bound wins when the range is
/// inverted (a node wider than the canvas).
fn clamp_axis(value: f32, low: f32, high: f32) -> f32 {
    value.min(high).max(low)
}

fn integrate(node: &mut LayoutNode, mut velocity: Vec2, config: &LayoutConfig) {
    velocity *= config.velocity_damping;
    let floor = config.velocity_noise_floor;
    if velocity.x.abs() > floor || velocity.y.abs() > floor {
        node.position += velocity;
    }
    node.velocity = velocity;

    let inset = node.size + config.boundary_margin;
    node.position = pos2(
        clamp_axis(node.position.x, inset, config.canvas_width - inset),
        clamp_axis(node.position.y, inset, config.canvas_height - inset),
    );
}

fn centering(node: &LayoutNode, config: &LayoutConfig, dampening: f32) -> Vec2 {
    let (center_x, center_y) = config.center();
    (pos2(center_x, center_y) - node.position) * (config.centering * dampening)
}

/// One simulation step. Nodes are updated in order and each update sees the
/// positions already written by earlier nodes in the same step.
pub(super) fn step_pairwise(nodes: &mut [LayoutNode], config: &LayoutConfig, step: u32) {
    let dampening = dampening(config, step);

    for index in 0..nodes.len() {
        let position = nodes[index].position;
        let size = nodes[index].size;
        let mut velocity = nodes[index].velocity + centering(&nodes[index], config, dampening);

        for (other_index, other) in nodes.iter().enumerate() {
            if other_index == index {
                continue;
            }
            if let Some(push) = repulsion(position, size, other, config, dampening) {
                velocity += push;
            }
        }

        integrate(&mut nodes[index], velocity, config);
    }
}

/// Same step as [`step_pairwise`], with candidates taken from a quadtree over
/// the step-start positions. The query radius grows by the largest distance
/// any node has moved so far in this step, so no node within reach is missed,
/// and candidates are visited in index order to keep the float sums identical.
pub(super) fn step_quadtree(
    nodes: &mut [LayoutNode],
    config: &LayoutConfig,
    step: u32,
    scratch: &mut StepScratch,
) {
    scratch.start_positions.clear();
    scratch
        .start_positions
        .extend(nodes.iter().map(|node| node.position));

    let Some(tree) = QuadNode::build(&scratch.start_positions) else {
        step_pairwise(nodes, config, step);
        return;
    };

    let dampening = dampening(config, step);
    let max_size = nodes.iter().map(|node| node.size).fold(0.0_f32, f32::max);
    let mut max_drift = 0.0_f32;

    for index in 0..nodes.len() {
        let position = nodes[index].position;
        let size = nodes[index].size;
        let mut velocity = nodes[index].velocity + centering(&nodes[index], config, dampening);

        let reach = size + max_size + config.separation_margin + max_drift + 1.0;
        scratch.candidates.clear();
        tree.collect_within(
            &scratch.start_positions,
            position,
            reach,
            &mut scratch.candidates,
        );
        scratch.candidates.sort_unstable();

        for &other_index in &scratch.candidates {
            if other_index == index {
                continue;
            }
            if let Some(push) = repulsion(position, size, &nodes[other_index], config, dampening) {
                velocity += push;
            }
        }

        integrate(&mut nodes[index], velocity, config);
        let drift = (nodes[index].position - scratch.start_positions[index]).length();
        max_drift = max_drift.max(drift);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NodeKind;

    fn node(id: &str, x: f32, y: f32, size: f32) -> LayoutNode {
        LayoutNode {
            id: id.to_owned(),
            label: id.to_owned(),
            kind: NodeKind::Person,
            position: pos2(x, y),
            velocity: Vec2::ZERO,
            size,
            connections: Vec::new(),
        }
    }

    #[test]
    fn dampening_decays_to_floor() {
        let config = LayoutConfig::default();
        assert!((dampening(&config, 1) - (1.0 - 1.0 / 300.0)).abs() < 1e-6);
        assert!((dampening(&config, 30) - 0.9).abs() < 1e-6);
        assert_eq!(dampening(&config, 90), 0.8);
        assert_eq!(dampening(&config, 300), 0.8);
    }

    #[test]
    fn lone_node_drifts_toward_center() {
        let config = LayoutConfig::default();
        let mut nodes = vec![node("a", 100.0, 300.0, 6.0)];
        for step in 1..=config.step_bound {
            step_pairwise(&mut nodes, &config, step);
        }
        assert!(nodes[0].position.x > 100.0);
        assert!(nodes[0].position.x <= 400.0 + 1.0);
        assert_eq!(nodes[0].position.y, 300.0);
    }

    #[test]
    fn small_velocity_does_not_move_the_node() {
        let config = LayoutConfig::default();
        let mut nodes = vec![node("a", 399.0, 300.0, 6.0)];
        step_pairwise(&mut nodes, &config, 1);
        assert_eq!(nodes[0].position, pos2(399.0, 300.0));
        assert!(nodes[0].velocity.x > 0.0);
    }

    #[test]
    fn overlapping_nodes_push_apart() {
        let config = LayoutConfig::default();
        let mut nodes = vec![node("a", 395.0, 300.0, 10.0), node("b", 405.0, 300.0, 10.0)];
        for step in 1..=20 {
            step_pairwise(&mut nodes, &config, step);
        }
        assert!(nodes[0].position.x < 395.0);
        assert!(nodes[1].position.x > 405.0);
    }

    #[test]
    fn coincident_nodes_exert_no_force() {
        let config = LayoutConfig::default();
        let a = node("a", 400.0, 300.0, 10.0);
        let b = node("b", 400.0, 300.0, 10.0);
        assert!(repulsion(a.position, a.size, &b, &config, 1.0).is_none());
    }

    #[test]
    fn positions_stay_inside_the_canvas() {
        let config = LayoutConfig::default();
        let mut nodes = vec![node("a", -50.0, 900.0, 12.0)];
        step_pairwise(&mut nodes, &config, 1);
        assert_eq!(nodes[0].position, pos2(22.0, 578.0));
    }

    #[test]
    fn oversized_node_pins_to_lower_bound() {
        let config = LayoutConfig {
            canvas_width: 20.0,
            ..LayoutConfig::default()
        };
        let mut nodes = vec![node("a", 10.0, 300.0, 12.0)];
        step_pairwise(&mut nodes, &config, 1);
        assert_eq!(nodes[0].position.x, 22.0);
    }

    #[test]
    fn quadtree_step_matches_pairwise_exactly() {
        let config = LayoutConfig::default();
        let seed = (0..90)
            .map(|index| {
                let x = 120.0 + (index % 12) as f32 * 21.0 + (index % 5) as f32;
                let y = 110.0 + (index / 12) as f32 * 19.0 + (index % 3) as f32;
                node(&format!("n{index}"), x, y, 6.0 + (index % 7) as f32)
            })
            .collect::<Vec<_>>();

        let mut pairwise = seed.clone();
        let mut quadtree = seed;
        let mut scratch = StepScratch::default();
        for step in 1..=config.step_bound {
            step_pairwise(&mut pairwise, &config, step);
            step_quadtree(&mut quadtree, &config, step, &mut scratch);
        }

        for (left, right) in pairwise.iter().zip(&quadtree) {
            assert_eq!(left.position, right.position, "node {}", left.id);
            assert_eq!(left.velocity, right.velocity, "node {}", left.id);
        }
    }
}
