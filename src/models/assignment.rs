//! Assignment result types: the canonical output of one solver run.

use super::matrix::is_infeasible_cost;
use serde::{Deserialize, Serialize};

/// One matched soldier/billet pair with its realized matrix cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPair {
    pub soldier_id: String,
    pub billet_id: String,
    /// The composed matrix entry the solver paid for this pair.
    pub cost: f64,
}

/// A set of assignment pairs. Each soldier id and each billet id appears at
/// most once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assignment {
    pub pairs: Vec<AssignmentPair>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: AssignmentPair) {
        self.pairs.push(pair);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sum of realized pair costs.
    pub fn total_cost(&self) -> f64 {
        self.pairs.iter().map(|p| p.cost).sum()
    }

    pub fn pair_for_soldier(&self, soldier_id: &str) -> Option<&AssignmentPair> {
        self.pairs.iter().find(|p| p.soldier_id == soldier_id)
    }

    pub fn pair_for_billet(&self, billet_id: &str) -> Option<&AssignmentPair> {
        self.pairs.iter().find(|p| p.billet_id == billet_id)
    }

    /// Pairs below the infeasibility sentinel; callers that must never act on
    /// a degenerate match filter through this.
    pub fn feasible_pairs(&self) -> impl Iterator<Item = &AssignmentPair> {
        self.pairs.iter().filter(|p| !is_infeasible_cost(p.cost))
    }

    /// Count of pairs at or above the infeasibility sentinel.
    pub fn infeasible_count(&self) -> usize {
        self.pairs.len() - self.feasible_pairs().count()
    }
}
