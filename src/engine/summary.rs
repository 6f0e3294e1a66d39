//! Run summary: fill, cost, cohesion, and degradation metrics for one run.
//!
//! The summary is the serializable record handed to callers and to the
//! exploration layer; it never influences the solve itself.

use crate::layers::LayerReport;
use crate::models::{Assignment, Billet, Soldier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Overall health of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every adjustment applied with complete data.
    Clean,
    /// At least one layer skipped pairs or soldiers for missing data.
    Degraded,
    /// The run failed outright; see `diagnostic`.
    Aborted,
}

/// Requested versus filled billets within one priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriorityFill {
    pub requested: usize,
    pub filled: usize,
}

/// Metrics for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    /// Failure detail when aborted.
    pub diagnostic: Option<String>,
    /// Billets requested.
    pub requested: usize,
    /// Billets filled, degenerate sentinel matches included.
    pub filled: usize,
    /// filled / requested; 0.0 when nothing was requested.
    pub fill_rate: f64,
    /// Sum of realized pair costs.
    pub total_cost: f64,
    /// total_cost / filled; 0.0 when nothing was filled.
    pub mean_pair_cost: f64,
    /// Pairs matched at or above the infeasibility sentinel.
    pub infeasible_pairs: usize,
    /// Every matched pair was infeasible: a 100% fill that means nothing.
    pub no_feasible_match: bool,
    /// Billet ids left unfilled, in table order.
    pub unfilled_billets: Vec<String>,
    /// Soldier ids left unassigned, in table order.
    pub unassigned_soldiers: Vec<String>,
    /// Fill broken out by billet priority tier.
    pub fill_by_priority: BTreeMap<i32, PriorityFill>,
    /// Percentage of keep-together instances filled entirely from a single
    /// unit; 50.0 (neutral) when no instance was requested.
    pub cohesion_score: f64,
    /// Distinct parent units among assigned soldiers.
    pub distinct_source_units: usize,
    /// Pairs or soldiers each layer skipped for missing data.
    pub degraded_by_layer: BTreeMap<String, usize>,
    /// Net cost delta each layer applied.
    pub adjustment_by_layer: BTreeMap<String, f64>,
    /// Total degradation count across layers.
    pub degraded_total: usize,
}

impl RunSummary {
    /// Computes the summary for a finished solve.
    pub fn calculate(
        assignment: &Assignment,
        soldiers: &[Soldier],
        billets: &[Billet],
        reports: &[(&'static str, LayerReport)],
    ) -> Self {
        let requested = billets.len();
        let filled = assignment.len();
        let fill_rate = if requested == 0 {
            0.0
        } else {
            filled as f64 / requested as f64
        };
        let total_cost = assignment.total_cost();
        let mean_pair_cost = if filled == 0 {
            0.0
        } else {
            total_cost / filled as f64
        };
        let infeasible_pairs = assignment.infeasible_count();

        let filled_billets: HashSet<&str> = assignment
            .pairs
            .iter()
            .map(|p| p.billet_id.as_str())
            .collect();
        let assigned_soldiers: HashSet<&str> = assignment
            .pairs
            .iter()
            .map(|p| p.soldier_id.as_str())
            .collect();

        let mut fill_by_priority: BTreeMap<i32, PriorityFill> = BTreeMap::new();
        for billet in billets {
            let entry = fill_by_priority.entry(billet.priority).or_default();
            entry.requested += 1;
            if filled_billets.contains(billet.id.as_str()) {
                entry.filled += 1;
            }
        }

        let unit_of: HashMap<&str, &str> = soldiers
            .iter()
            .map(|s| (s.id.as_str(), s.unit.as_str()))
            .collect();
        let distinct_source_units = assignment
            .pairs
            .iter()
            .filter_map(|p| unit_of.get(p.soldier_id.as_str()).copied())
            .filter(|unit| !unit.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let mut degraded_by_layer = BTreeMap::new();
        let mut adjustment_by_layer = BTreeMap::new();
        let mut degraded_total = 0;
        for (name, report) in reports {
            degraded_by_layer.insert((*name).to_string(), report.degraded);
            adjustment_by_layer.insert((*name).to_string(), report.total_delta);
            degraded_total += report.degraded;
        }

        let status = if degraded_total > 0 {
            RunStatus::Degraded
        } else {
            RunStatus::Clean
        };

        Self {
            status,
            diagnostic: None,
            requested,
            filled,
            fill_rate,
            total_cost,
            mean_pair_cost,
            infeasible_pairs,
            no_feasible_match: filled > 0 && infeasible_pairs == filled,
            unfilled_billets: billets
                .iter()
                .filter(|b| !filled_billets.contains(b.id.as_str()))
                .map(|b| b.id.clone())
                .collect(),
            unassigned_soldiers: soldiers
                .iter()
                .filter(|s| !assigned_soldiers.contains(s.id.as_str()))
                .map(|s| s.id.clone())
                .collect(),
            fill_by_priority,
            cohesion_score: cohesion_score(assignment, billets, &unit_of),
            distinct_source_units,
            degraded_by_layer,
            adjustment_by_layer,
            degraded_total,
        }
    }

    /// A summary for a run that failed before producing an assignment.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Aborted,
            diagnostic: Some(message.into()),
            requested: 0,
            filled: 0,
            fill_rate: 0.0,
            total_cost: 0.0,
            mean_pair_cost: 0.0,
            infeasible_pairs: 0,
            no_feasible_match: false,
            unfilled_billets: Vec::new(),
            unassigned_soldiers: Vec::new(),
            fill_by_priority: BTreeMap::new(),
            cohesion_score: 0.0,
            distinct_source_units: 0,
            degraded_by_layer: BTreeMap::new(),
            adjustment_by_layer: BTreeMap::new(),
            degraded_total: 0,
        }
    }
}

/// Fraction of keep-together instances filled entirely from one unit, as a
/// percentage. Soldiers without a unit on file never satisfy an instance.
fn cohesion_score(
    assignment: &Assignment,
    billets: &[Billet],
    unit_of: &HashMap<&str, &str>,
) -> f64 {
    let mut groups: BTreeMap<&str, Vec<&Billet>> = BTreeMap::new();
    for billet in billets {
        if let Some(instance) = &billet.keep_together {
            groups.entry(instance).or_default().push(billet);
        }
    }
    if groups.is_empty() {
        return 50.0;
    }

    let mut satisfied = 0usize;
    for members in groups.values() {
        let mut units: HashSet<&str> = HashSet::new();
        let mut complete = true;
        for billet in members {
            match assignment.pair_for_billet(&billet.id) {
                Some(pair) => {
                    units.insert(unit_of.get(pair.soldier_id.as_str()).copied().unwrap_or(""));
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete && units.len() == 1 && !units.contains("") {
            satisfied += 1;
        }
    }

    satisfied as f64 / groups.len() as f64 * 100.0
}
