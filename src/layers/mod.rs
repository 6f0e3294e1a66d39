//! Additive cost layers over the base matrix.
//!
//! Each layer reads the soldier/billet tables and the policy, and adds
//! penalties (positive) or bonuses (negative) onto matrix entries. Layers
//! are independent: any subset can be stacked, in any order, and each
//! reports how many pairs it adjusted and how many it had to skip for
//! missing data. The conventional production order is readiness, cohesion,
//! geography, qualification.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use u_assign::layers::{CohesionLayer, LayerContext, LayerStack};
//! use u_assign::models::{Billet, CostMatrix, PolicyConfiguration, Soldier};
//!
//! let soldiers = vec![Soldier::new(0, "S-1", "11B", 5).with_unit("A-CO")];
//! let billets = vec![Billet::new(0, "B-1", "11B")];
//! let policy = PolicyConfiguration::defaults();
//!
//! let mut matrix = CostMatrix::new(
//!     soldiers.iter().map(|s| s.id.clone()).collect(),
//!     billets.iter().map(|b| b.id.clone()).collect(),
//! );
//! let stack = LayerStack::new().with_layer(Arc::new(CohesionLayer));
//! let context = LayerContext::new(&soldiers, &billets, &policy);
//! let reports = stack.apply_all(&mut matrix, &context);
//! assert_eq!(reports.len(), 1);
//! ```

mod cohesion;
mod geography;
mod qualification;
mod readiness;

pub use cohesion::{derive_teams, CohesionLayer};
pub use geography::{GeographicLayer, GeoPoint, HaversineTravelModel, TravelCostModel};
pub use qualification::QualificationLayer;
pub use readiness::{filter_ready, GateCheck, ReadinessPenaltyLayer, ReadinessProfile};

use crate::models::{Billet, CostMatrix, PolicyConfiguration, Soldier};
use std::sync::Arc;

/// Read-only inputs shared by every layer in one run.
#[derive(Debug, Clone, Copy)]
pub struct LayerContext<'a> {
    /// Soldier table, row-aligned with the matrix.
    pub soldiers: &'a [Soldier],
    /// Billet table, column-aligned with the matrix.
    pub billets: &'a [Billet],
    /// Weight set for this run.
    pub policy: &'a PolicyConfiguration,
}

impl<'a> LayerContext<'a> {
    pub fn new(
        soldiers: &'a [Soldier],
        billets: &'a [Billet],
        policy: &'a PolicyConfiguration,
    ) -> Self {
        Self {
            soldiers,
            billets,
            policy,
        }
    }
}

/// What one layer did to the matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerReport {
    /// Pairs that received a nonzero delta.
    pub adjusted: usize,
    /// Lookups skipped for missing or malformed data (granularity is
    /// documented per layer: pairs for geography and qualification,
    /// soldiers for cohesion).
    pub degraded: usize,
    /// Net cost added across the whole matrix.
    pub total_delta: f64,
}

/// A cost adjustment layer.
///
/// Layers never abort: missing data degrades to "no adjustment" and is
/// counted in the report. `Send + Sync` so a configured engine can be shared
/// across threads.
pub trait CostLayer: Send + Sync + std::fmt::Debug {
    /// Stable name used in reports and summaries.
    fn name(&self) -> &'static str;

    /// Adds this layer's deltas onto the matrix.
    fn apply(&self, matrix: &mut CostMatrix, context: &LayerContext) -> LayerReport;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// An ordered stack of layers applied over a base matrix.
#[derive(Clone, Default)]
pub struct LayerStack {
    layers: Vec<Arc<dyn CostLayer>>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer, chainable.
    pub fn with_layer(mut self, layer: Arc<dyn CostLayer>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Appends a layer.
    pub fn add_layer(&mut self, layer: Arc<dyn CostLayer>) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Applies every layer in order, returning one report per layer.
    pub fn apply_all(
        &self,
        matrix: &mut CostMatrix,
        context: &LayerContext,
    ) -> Vec<(&'static str, LayerReport)> {
        let mut reports = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let report = layer.apply(matrix, context);
            tracing::debug!(
                layer = layer.name(),
                adjusted = report.adjusted,
                degraded = report.degraded,
                delta = report.total_delta,
                "layer applied"
            );
            reports.push((layer.name(), report));
        }
        reports
    }
}

impl std::fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerStack")
            .field("layers", &self.names())
            .finish()
    }
}
