//! Policy configuration: the named weight set read by every cost layer.
//!
//! Penalties are positive, bonuses negative. The parameter set is fixed and
//! enumerable; consumers read named keys only. A key absent from a
//! configuration falls back to the built-in default, which is what lets the
//! exploration layer vary arbitrary subsets safely.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every known parameter name with its default weight.
///
/// Grouped by the layer that reads it. Unknown names passed to
/// [`PolicyConfiguration::set`] are ignored.
pub const DEFAULT_WEIGHTS: &[(&str, f64)] = &[
    // base matrix
    ("skill_mismatch_penalty", 3000.0),
    ("rank_distance_penalty", 1000.0),
    ("priority_weight_low", 1.0),
    ("priority_weight_medium", 1.5),
    ("priority_weight_high", 2.0),
    ("priority_fill_bonus", 200.0),
    // readiness
    ("readiness_gate_penalty", 2000.0),
    ("dwell_short_penalty", 1500.0),
    ("medical_category_penalty", 1000.0),
    ("non_deployable_penalty", 8000.0),
    ("readiness_current_bonus", -100.0),
    // cohesion
    ("keep_together_bonus", -200.0),
    ("team_split_penalty", 300.0),
    ("cross_unit_penalty", 200.0),
    // geography
    ("travel_cost_weight", 1.0),
    ("distance_penalty_per_1000", 100.0),
    ("cross_region_penalty", 500.0),
    ("same_region_bonus", -300.0),
    // qualification
    ("education_gap_penalty", 400.0),
    ("clearance_gap_penalty", 2000.0),
    ("language_missing_penalty", 1000.0),
    ("language_native_bonus", -150.0),
    ("badge_missing_penalty", 800.0),
    ("badge_preferred_bonus", -100.0),
    ("license_missing_penalty", 600.0),
    ("experience_gap_penalty", 700.0),
    ("combat_experience_bonus", -150.0),
    ("award_bonus", -50.0),
    ("fitness_shortfall_penalty", 500.0),
    ("service_time_penalty", 300.0),
    ("critical_qualification_penalty", 2500.0),
    ("qualification_perfect_bonus", -200.0),
];

/// A named set of numeric weights consumed by the cost layers.
///
/// Treated as an immutable value object per pipeline run: clone it per run
/// rather than sharing a mutable instance across runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyConfiguration {
    /// Label for reports and frontier snapshots.
    pub name: String,
    /// Explicit overrides; anything absent reads from [`DEFAULT_WEIGHTS`].
    weights: HashMap<String, f64>,
}

impl PolicyConfiguration {
    /// Creates an empty configuration: every parameter reads its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: HashMap::new(),
        }
    }

    /// Creates a configuration with every parameter pinned to its default.
    pub fn defaults() -> Self {
        let mut config = Self::new("defaults");
        for &(name, value) in DEFAULT_WEIGHTS {
            config.weights.insert(name.to_string(), value);
        }
        config
    }

    /// Creates a configuration with every parameter pinned to zero.
    ///
    /// Useful as a neutral baseline when isolating a single layer's effect.
    pub fn zeroed() -> Self {
        let mut config = Self::new("zeroed");
        for &(name, _) in DEFAULT_WEIGHTS {
            config.weights.insert(name.to_string(), 0.0);
        }
        config
    }

    /// Sets a weight, chainable. Unknown parameter names are ignored.
    pub fn with_weight(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a weight. Unknown parameter names are ignored.
    pub fn set(&mut self, name: &str, value: f64) {
        if Self::is_known(name) {
            self.weights.insert(name.to_string(), value);
        }
    }

    /// Reads a weight, falling back to the built-in default for the name.
    ///
    /// Names outside the parameter table read as 0.0 so a mistyped consumer
    /// degrades to "no effect" rather than panicking.
    pub fn get(&self, name: &str) -> f64 {
        if let Some(&value) = self.weights.get(name) {
            return value;
        }
        Self::default_for(name).unwrap_or(0.0)
    }

    /// The built-in default for a parameter name, if the name is known.
    pub fn default_for(name: &str) -> Option<f64> {
        DEFAULT_WEIGHTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }

    /// Whether a name belongs to the fixed parameter set.
    pub fn is_known(name: &str) -> bool {
        DEFAULT_WEIGHTS.iter().any(|(n, _)| *n == name)
    }

    /// Iterates every known parameter name.
    pub fn parameter_names() -> impl Iterator<Item = &'static str> {
        DEFAULT_WEIGHTS.iter().map(|&(n, _)| n)
    }

    /// Number of explicitly overridden parameters.
    pub fn override_count(&self) -> usize {
        self.weights.len()
    }
}
