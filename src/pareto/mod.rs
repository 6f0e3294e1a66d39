//! Policy exploration: sweep weight combinations and keep the Pareto
//! frontier of run outcomes.
//!
//! Each run clones the base policy, applies one grid combination, and drives
//! the full pipeline; nothing is shared between runs but the immutable
//! tables. Objectives are fill rate and cohesion score (maximized) against
//! total cost and distinct source units (minimized).
//!
//! # Reference
//!
//! - Pareto, V. (1896). "Cours d'économie politique". The dominance relation.
//! - Deb, K. (2001). "Multi-Objective Optimization using Evolutionary
//!   Algorithms". Wiley. Non-dominated sorting.

use crate::engine::AssignmentEngine;
use crate::models::{Billet, PolicyConfiguration, Soldier};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// One swept parameter and the values it takes across the grid.
///
/// Unknown parameter names are inert: [`PolicyConfiguration::set`] ignores
/// them, so every run in that axis collapses to the base behavior. An axis
/// with no values produces an empty grid and therefore no runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyAxis {
    pub parameter: String,
    pub values: Vec<f64>,
}

impl PolicyAxis {
    pub fn new(parameter: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            parameter: parameter.into(),
            values,
        }
    }
}

/// One evaluated run: the policy that produced it and its objectives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    /// The exact policy that produced this point, replayable as-is.
    pub policy: PolicyConfiguration,
    /// Billets filled over billets requested (maximize).
    pub fill_rate: f64,
    /// Realized assignment cost (minimize).
    pub total_cost: f64,
    /// Keep-together satisfaction percentage (maximize).
    pub cohesion_score: f64,
    /// Distinct parent units tapped (minimize).
    pub source_units: usize,
}

impl ParetoPoint {
    /// Whether `self` is at least as good as `other` on every objective and
    /// strictly better on at least one.
    pub fn dominates(&self, other: &ParetoPoint) -> bool {
        let no_worse = self.fill_rate >= other.fill_rate
            && self.total_cost <= other.total_cost
            && self.cohesion_score >= other.cohesion_score
            && self.source_units <= other.source_units;
        let better = self.fill_rate > other.fill_rate
            || self.total_cost < other.total_cost
            || self.cohesion_score > other.cohesion_score
            || self.source_units < other.source_units;
        no_worse && better
    }
}

/// Result of one exploration sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationOutcome {
    /// Non-dominated points, in run order.
    pub frontier: Vec<ParetoPoint>,
    /// Runs that completed.
    pub evaluated: usize,
    /// Runs that failed; absent from the frontier.
    pub aborted: usize,
    /// Every completed run produced the same objectives (spread < 1e-9 on
    /// all four); the frontier holds that single point rather than a
    /// spurious multi-point front.
    pub dominant_solution: bool,
}

/// Sweeps policy combinations through an engine and keeps the frontier.
#[derive(Debug, Clone)]
pub struct ParetoExplorer {
    engine: AssignmentEngine,
    axes: Vec<PolicyAxis>,
    max_runs: usize,
    seed: u64,
}

impl ParetoExplorer {
    /// Default ceiling on grid evaluations before subsampling kicks in.
    pub const DEFAULT_MAX_RUNS: usize = 64;

    pub fn new(engine: AssignmentEngine) -> Self {
        Self {
            engine,
            axes: Vec::new(),
            max_runs: Self::DEFAULT_MAX_RUNS,
            seed: 0,
        }
    }

    /// Adds a swept parameter, chainable.
    pub fn with_axis(mut self, axis: PolicyAxis) -> Self {
        self.axes.push(axis);
        self
    }

    /// Caps the number of evaluated combinations, chainable.
    pub fn with_max_runs(mut self, max_runs: usize) -> Self {
        self.max_runs = max_runs;
        self
    }

    /// Seeds the subsampling shuffle, chainable. Same seed, same subset.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of combinations the configured axes span.
    pub fn grid_size(&self) -> usize {
        self.axes
            .iter()
            .map(|axis| axis.values.len())
            .fold(1usize, |acc, n| acc.saturating_mul(n))
    }

    /// Decodes a grid index into its (parameter, value) overrides.
    fn combo_at(&self, mut index: usize) -> Vec<(&str, f64)> {
        let mut combo = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            let n = axis.values.len();
            combo.push((axis.parameter.as_str(), axis.values[index % n]));
            index /= n;
        }
        combo
    }

    /// Runs the sweep and returns the frontier.
    ///
    /// When the grid exceeds `max_runs` a seeded sample of distinct grid
    /// points is evaluated instead, in grid order, so repeat sweeps with the
    /// same seed compare like for like. Aborted runs are counted and
    /// skipped; they never poison the frontier.
    pub fn explore(
        &self,
        soldiers: &[Soldier],
        billets: &[Billet],
        base: &PolicyConfiguration,
    ) -> ExplorationOutcome {
        let grid_size = self.grid_size();
        let indices: Vec<usize> = if grid_size <= self.max_runs {
            (0..grid_size).collect()
        } else {
            let mut rng = SmallRng::seed_from_u64(self.seed);
            let mut picked =
                rand::seq::index::sample(&mut rng, grid_size, self.max_runs).into_vec();
            picked.sort_unstable();
            picked
        };
        tracing::debug!(
            grid = grid_size,
            runs = indices.len(),
            axes = self.axes.len(),
            "exploration sweep start"
        );

        let mut candidates: Vec<ParetoPoint> = Vec::with_capacity(indices.len());
        let mut aborted = 0usize;
        for (run, &index) in indices.iter().enumerate() {
            let mut policy = base.clone();
            policy.name = format!("{}/{run}", base.name);
            for (name, value) in self.combo_at(index) {
                policy.set(name, value);
            }

            match self.engine.assign(soldiers, billets, &policy) {
                Ok(outcome) => candidates.push(ParetoPoint {
                    policy,
                    fill_rate: outcome.summary.fill_rate,
                    total_cost: outcome.summary.total_cost,
                    cohesion_score: outcome.summary.cohesion_score,
                    source_units: outcome.summary.distinct_source_units,
                }),
                Err(error) => {
                    tracing::warn!(%error, run, "exploration run aborted");
                    aborted += 1;
                }
            }
        }

        let evaluated = candidates.len();
        let dominant_solution = all_objectives_agree(&candidates);
        let frontier = if dominant_solution {
            candidates.truncate(1);
            candidates
        } else {
            non_dominated(candidates)
        };

        ExplorationOutcome {
            frontier,
            evaluated,
            aborted,
            dominant_solution,
        }
    }
}

/// True when every completed run landed on the same objectives.
fn all_objectives_agree(points: &[ParetoPoint]) -> bool {
    let Some(first) = points.first() else {
        return false;
    };
    points.iter().all(|p| {
        (p.fill_rate - first.fill_rate).abs() < 1e-9
            && (p.total_cost - first.total_cost).abs() < 1e-9
            && (p.cohesion_score - first.cohesion_score).abs() < 1e-9
            && p.source_units == first.source_units
    })
}

/// Filters to points no other point dominates, preserving run order.
fn non_dominated(points: Vec<ParetoPoint>) -> Vec<ParetoPoint> {
    let keep: Vec<bool> = points
        .iter()
        .map(|candidate| !points.iter().any(|other| other.dominates(candidate)))
        .collect();
    points
        .into_iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(point))
        .collect()
}
