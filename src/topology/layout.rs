//! Force-directed layout for topology visualization.
//!
//! Fruchterman-Reingold: repulsion between every pair, attraction along
//! edges, linear cooling, final rescale to [-1, 1]. Determinism across runs
//! is not required; the contract is only that connected nodes are pulled
//! closer and disconnected nodes pushed apart.

use crate::topology::types::{Connection, Position};
use rand::Rng;
use std::collections::{HashMap, HashSet};

const ITERATIONS: usize = 50;
const INITIAL_TEMPERATURE: f64 = 0.1;
const MIN_DISTANCE: f64 = 1e-9;

pub(crate) fn spring_layout(
    names: &[String],
    edges: &HashSet<Connection>,
) -> HashMap<String, Position> {
    let n = names.len();
    if n == 0 {
        return HashMap::new();
    }
    if n == 1 {
        return HashMap::from([(names[0].clone(), Position::new(0.0, 0.0))]);
    }

    let index: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let edge_indices: Vec<(usize, usize)> = edges
        .iter()
        .filter_map(|edge| {
            let (a, b) = edge.endpoints();
            Some((*index.get(a)?, *index.get(b)?))
        })
        .collect();

    let mut rng = rand::thread_rng();
    let mut pos: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)])
        .collect();

    // Optimal pairwise distance for a unit-area frame.
    let k = (1.0 / n as f64).sqrt();

    for iteration in 0..ITERATIONS {
        let mut disp = vec![[0.0f64; 2]; n];

        // Repulsion between all pairs.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i][0] += fx;
                disp[i][1] += fy;
                disp[j][0] -= fx;
                disp[j][1] -= fy;
            }
        }

        // Attraction along edges.
        for &(i, j) in &edge_indices {
            let dx = pos[i][0] - pos[j][0];
            let dy = pos[i][1] - pos[j][1];
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[i][0] -= fx;
            disp[i][1] -= fy;
            disp[j][0] += fx;
            disp[j][1] += fy;
        }

        let temperature =
            INITIAL_TEMPERATURE * (1.0 - iteration as f64 / ITERATIONS as f64);
        for i in 0..n {
            let len = (disp[i][0] * disp[i][0] + disp[i][1] * disp[i][1])
                .sqrt()
                .max(MIN_DISTANCE);
            let step = len.min(temperature);
            pos[i][0] += disp[i][0] / len * step;
            pos[i][1] += disp[i][1] / len * step;
        }
    }

    // Rescale into [-1, 1].
    let max_abs = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(1.0f64, f64::max);

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            (
                name.clone(),
                Position::new(pos[i][0] / max_abs, pos[i][1] / max_abs),
            )
        })
        .collect()
}
