mod quadtree;

use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::engine::{RenderGraph, Tier};
use crate::util::stable_pair;

use quadtree::Quadtree;

const LAYOUT_ITERATIONS: usize = 220;
const FULL_ITERATION_NODES: usize = 400;
const MIN_LAYOUT_ITERATIONS: usize = 60;
const BARNES_HUT_THETA: f32 = 0.9;

fn ring_factor(tier: Tier) -> f32 {
    match tier {
        Tier::Titan => 0.0,
        Tier::Macro => 1.6,
        Tier::Micro | Tier::Nano => 3.4,
    }
}

fn iteration_budget(node_count: usize) -> usize {
    if node_count <= FULL_ITERATION_NODES {
        return LAYOUT_ITERATIONS;
    }
    let scale = (FULL_ITERATION_NODES as f32 / node_count as f32).sqrt();
    ((LAYOUT_ITERATIONS as f32 * scale) as usize).max(MIN_LAYOUT_ITERATIONS)
}

fn pair_repulsion(a: Vec2, b: Vec2, combined_weight: f32, k: f32) -> Vec2 {
    let delta = a - b;
    let distance = delta.length().max(0.5);
    let spacing = combined_weight * 1.8;

    let mut force = k * k / distance;
    if distance < spacing {
        force += (spacing - distance) * 2.0;
    }
    delta / distance * force
}

pub fn tiered_layout(graph: &RenderGraph) -> Vec<Vec2> {
    let (positions, interactions) = settle(graph);
    debug!(nodes = positions.len(), interactions, "layout settled");
    positions
}

/// Positions plus the number of repulsion terms evaluated to reach them.
fn settle(graph: &RenderGraph) -> (Vec<Vec2>, usize) {
    let nodes = graph.nodes();
    let n = nodes.len();
    if n == 0 {
        return (Vec::new(), 0);
    }

    if n == 1 {
        return (vec![Vec2::ZERO], 0);
    }

    let k = (260_000.0 / n as f32).sqrt().clamp(28.0, 140.0);

    let mut tier_slots = [0usize; 4];
    let mut tier_totals = [0usize; 4];
    for node in nodes {
        tier_totals[tier_slot(node.tier)] += 1;
    }

    let mut positions = nodes
        .iter()
        .map(|node| {
            let slot = tier_slot(node.tier);
            let rank = tier_slots[slot];
            tier_slots[slot] += 1;

            let angle = rank as f32 / tier_totals[slot].max(1) as f32 * TAU;
            let radius = ring_factor(node.tier) * k * (n as f32).sqrt() * 0.35;
            let (jx, jy) = stable_pair(&node.render_id);
            vec2(angle.cos(), angle.sin()) * radius + vec2(jx, jy) * k * 0.5
        })
        .collect::<Vec<_>>();

    let edges = (0..graph.edge_count())
        .filter_map(|index| graph.edge_endpoints(index))
        .filter(|(from, to)| from != to)
        .collect::<Vec<_>>();
    let anchors = nodes
        .iter()
        .map(|node| ring_factor(node.tier) * k * (n as f32).sqrt() * 0.35)
        .collect::<Vec<_>>();

    let weights = nodes.iter().map(|node| node.weight()).collect::<Vec<_>>();

    let iterations = iteration_budget(n);
    let cooling = 0.97_f32.powf(LAYOUT_ITERATIONS as f32 / iterations as f32);
    let mut temperature = k * 4.0;
    let mut interactions = 0usize;
    let mut displacement = vec![Vec2::ZERO; n];
    for _ in 0..iterations {
        let Some(tree) = Quadtree::build(&positions) else {
            break;
        };

        let near = |i: usize, j: usize| {
            pair_repulsion(positions[i], positions[j], weights[i] + weights[j], k)
        };
        let far = |point: Vec2, centroid: Vec2, count: f32| {
            let delta = point - centroid;
            let distance = delta.length().max(0.5);
            delta / distance * (k * k * count / distance)
        };
        for (index, d) in displacement.iter_mut().enumerate() {
            *d = tree.repulsion_on(index, &positions, near, far, BARNES_HUT_THETA, &mut interactions);
        }

        for &(from, to) in &edges {
            let delta = positions[from] - positions[to];
            let distance = delta.length().max(0.5);
            let pull = delta / distance * (distance * distance / k) * 0.6;
            displacement[from] -= pull;
            displacement[to] += pull;
        }

        for (index, position) in positions.iter().enumerate() {
            let distance = position.length();
            if distance > 0.5 {
                let offset = distance - anchors[index];
                displacement[index] -= *position / distance * offset * 0.25;
            }
        }

        for (position, d) in positions.iter_mut().zip(&displacement) {
            let length = d.length();
            if length > 0.0 {
                *position += *d / length * length.min(temperature);
            }
        }

        temperature *= cooling;
        if temperature < 0.5 {
            break;
        }
    }

    (positions, interactions)
}

fn tier_slot(tier: Tier) -> usize {
    match tier {
        Tier::Titan => 0,
        Tier::Macro => 1,
        Tier::Micro => 2,
        Tier::Nano => 3,
    }
}
