//! Assignment pipeline: alignment check, base matrix, cost layers, solver,
//! and run summary.

mod builder;
mod solver;
mod summary;

pub use builder::CostMatrixBuilder;
pub use solver::{solve, Matching};
pub use summary::{PriorityFill, RunStatus, RunSummary};

use crate::error::AssignError;
use crate::layers::{CostLayer, LayerContext, LayerStack};
use crate::models::{Assignment, AssignmentPair, Billet, PolicyConfiguration, Soldier};
use crate::validation::check_alignment;
use std::sync::Arc;

/// A solved run: the assignment plus its metrics.
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub assignment: Assignment,
    pub summary: RunSummary,
}

/// Drives one table pair through the full pipeline.
///
/// The engine is immutable once configured and may be reused across runs;
/// each run reads the tables and policy it is handed and touches nothing
/// else.
///
/// # Examples
///
/// ```
/// use u_assign::engine::AssignmentEngine;
/// use u_assign::models::{Billet, PolicyConfiguration, Soldier};
///
/// let soldiers = vec![
///     Soldier::new(0, "S-1", "11B", 5),
///     Soldier::new(1, "S-2", "68W", 5),
/// ];
/// let billets = vec![Billet::new(0, "B-1", "68W").with_rank_band(4, 6)];
/// let policy = PolicyConfiguration::new("defaults");
///
/// let outcome = AssignmentEngine::new()
///     .assign(&soldiers, &billets, &policy)
///     .unwrap();
///
/// assert_eq!(outcome.assignment.pairs.len(), 1);
/// assert_eq!(outcome.assignment.pairs[0].soldier_id, "S-2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine {
    builder: CostMatrixBuilder,
    layers: LayerStack,
}

impl AssignmentEngine {
    /// An engine with no cost layers: base matrix straight into the solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cost layer; layers apply in insertion order.
    pub fn with_layer(mut self, layer: Arc<dyn CostLayer>) -> Self {
        self.layers.add_layer(layer);
        self
    }

    /// Pins skill-mismatched pairs to the infeasible sentinel, chainable.
    pub fn with_strict_skill(mut self, strict: bool) -> Self {
        self.builder = self.builder.with_strict_skill(strict);
        self
    }

    /// Names of the configured layers, in application order.
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.names()
    }

    /// Runs the pipeline: verify alignment, build the base matrix, apply
    /// every layer, solve, and summarize.
    pub fn assign(
        &self,
        soldiers: &[Soldier],
        billets: &[Billet],
        policy: &PolicyConfiguration,
    ) -> Result<AssignmentOutcome, AssignError> {
        check_alignment(soldiers, billets)?;

        let mut matrix = self.builder.build(soldiers, billets, policy);
        let context = LayerContext::new(soldiers, billets, policy);
        let reports = self.layers.apply_all(&mut matrix, &context);

        let matching = solver::solve(&matrix)?;
        let mut assignment = Assignment::new();
        for &(row, col) in &matching.pairs {
            assignment.push(AssignmentPair {
                soldier_id: matrix.soldier_id(row).to_string(),
                billet_id: matrix.billet_id(col).to_string(),
                cost: matrix.get(row, col),
            });
        }

        let summary = RunSummary::calculate(&assignment, soldiers, billets, &reports);
        tracing::info!(
            policy = %policy.name,
            requested = summary.requested,
            filled = summary.filled,
            degraded = summary.degraded_total,
            "assignment complete"
        );
        Ok(AssignmentOutcome {
            assignment,
            summary,
        })
    }
}
