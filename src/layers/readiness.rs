//! Readiness penalties against a mission readiness profile.
//!
//! A profile names the training gates a mission demands plus medical,
//! dental, dwell, deployment-count, deployability, and passport thresholds.
//! Soft mode adds row-uniform penalties so a marginal soldier stays usable
//! when nobody better exists; hard mode ([`filter_ready`]) excludes failing
//! soldiers entirely before matrix construction and renumbers the survivors,
//! because matrix coordinates are positional.

use super::{CostLayer, LayerContext, LayerReport};
use crate::models::{CostMatrix, ReadinessSnapshot, Soldier};
use serde::{Deserialize, Serialize};

/// Named bundle of readiness thresholds for a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessProfile {
    /// Profile label for reports.
    pub name: String,
    /// Training gates that must be current.
    pub required_gates: Vec<String>,
    /// Highest acceptable medical category.
    pub max_med_category: i32,
    /// Highest acceptable dental category.
    pub max_dental_category: i32,
    /// Minimum dwell months since the last rotation.
    pub min_dwell_months: i32,
    /// Career deployment ceiling, when the mission caps it.
    pub max_deployments: Option<i32>,
    /// Soldier must be administratively deployable.
    pub require_deployable: bool,
    /// Soldier must hold a valid passport.
    pub require_passport: bool,
}

impl ReadinessProfile {
    /// Creates a fully permissive profile to build on.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_gates: Vec::new(),
            max_med_category: 4,
            max_dental_category: 4,
            min_dwell_months: 0,
            max_deployments: None,
            require_deployable: false,
            require_passport: false,
        }
    }

    /// Home-station training rotation.
    pub fn conus_training() -> Self {
        Self::new("conus_training")
            .with_gate("weapons_qual")
            .with_gate("pha")
            .with_max_categories(3, 3)
            .with_min_dwell(6)
            .deployable_required()
    }

    /// Overseas training exercise: passport and overseas screening on top of
    /// the home-station gates.
    pub fn oconus_training() -> Self {
        Self::new("oconus_training")
            .with_gate("weapons_qual")
            .with_gate("pha")
            .with_gate("overseas_screening")
            .with_max_categories(2, 2)
            .with_min_dwell(6)
            .deployable_required()
            .passport_required()
    }

    /// Combat rotation: full gate list, tight categories, full dwell.
    pub fn combat_deployment() -> Self {
        Self::new("combat_deployment")
            .with_gate("weapons_qual")
            .with_gate("pha")
            .with_gate("srp")
            .with_max_categories(2, 2)
            .with_min_dwell(12)
            .deployable_required()
            .passport_required()
    }

    /// Adds a required training gate, chainable.
    pub fn with_gate(mut self, gate: impl Into<String>) -> Self {
        self.required_gates.push(gate.into());
        self
    }

    /// Sets medical and dental category ceilings, chainable.
    pub fn with_max_categories(mut self, medical: i32, dental: i32) -> Self {
        self.max_med_category = medical;
        self.max_dental_category = dental;
        self
    }

    /// Sets the dwell floor in months, chainable.
    pub fn with_min_dwell(mut self, months: i32) -> Self {
        self.min_dwell_months = months;
        self
    }

    /// Caps career deployments, chainable.
    pub fn with_max_deployments(mut self, count: i32) -> Self {
        self.max_deployments = Some(count);
        self
    }

    /// Requires administrative deployability, chainable.
    pub fn deployable_required(mut self) -> Self {
        self.require_deployable = true;
        self
    }

    /// Requires a valid passport, chainable.
    pub fn passport_required(mut self) -> Self {
        self.require_passport = true;
        self
    }

    /// Evaluates a snapshot against this profile.
    pub fn evaluate(&self, snapshot: &ReadinessSnapshot) -> GateCheck {
        let missing_gates: Vec<String> = self
            .required_gates
            .iter()
            .filter(|gate| !snapshot.gate_current(gate))
            .cloned()
            .collect();

        GateCheck {
            missing_gates,
            dwell_short: snapshot.dwell_months < self.min_dwell_months,
            medical_levels_over: (snapshot.med_category - self.max_med_category).max(0),
            dental_levels_over: (snapshot.dental_category - self.max_dental_category).max(0),
            non_deployable: self.require_deployable && !snapshot.deployable,
            over_deployed: self
                .max_deployments
                .is_some_and(|cap| snapshot.deployment_count > cap),
            missing_passport: self.require_passport && !snapshot.has_passport,
        }
    }
}

/// Outcome of checking one snapshot against a profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GateCheck {
    /// Required gates that are not current.
    pub missing_gates: Vec<String>,
    /// Dwell below the profile floor.
    pub dwell_short: bool,
    /// Medical category levels above the ceiling.
    pub medical_levels_over: i32,
    /// Dental category levels above the ceiling.
    pub dental_levels_over: i32,
    /// Deployability required but absent.
    pub non_deployable: bool,
    /// Deployment count above the cap.
    pub over_deployed: bool,
    /// Passport required but absent.
    pub missing_passport: bool,
}

impl GateCheck {
    /// True when every check passed.
    pub fn is_ready(&self) -> bool {
        self.missing_gates.is_empty()
            && !self.dwell_short
            && self.medical_levels_over == 0
            && self.dental_levels_over == 0
            && !self.non_deployable
            && !self.over_deployed
            && !self.missing_passport
    }

    /// Gate-class failures: missing gates plus passport and deployment-cap
    /// misses. Dwell, category, and deployability carry their own weights.
    pub fn gate_failures(&self) -> usize {
        self.missing_gates.len()
            + usize::from(self.over_deployed)
            + usize::from(self.missing_passport)
    }
}

/// Hard pre-filter: keeps only soldiers passing the profile, renumbered to a
/// dense 0-based sequence so the survivors are valid matrix rows.
pub fn filter_ready(soldiers: &[Soldier], profile: &ReadinessProfile) -> Vec<Soldier> {
    let mut kept = Vec::new();
    for soldier in soldiers {
        if profile.evaluate(&soldier.readiness).is_ready() {
            let mut soldier = soldier.clone();
            soldier.index = kept.len();
            kept.push(soldier);
        } else {
            tracing::debug!(
                soldier = %soldier.id,
                profile = %profile.name,
                "excluded by readiness pre-filter"
            );
        }
    }
    kept
}

/// Row-uniform readiness penalties in the soft mode.
#[derive(Debug, Clone)]
pub struct ReadinessPenaltyLayer {
    /// Profile the mission demands.
    pub profile: ReadinessProfile,
}

impl ReadinessPenaltyLayer {
    pub fn new(profile: ReadinessProfile) -> Self {
        Self { profile }
    }
}

impl CostLayer for ReadinessPenaltyLayer {
    fn name(&self) -> &'static str {
        "readiness"
    }

    fn description(&self) -> &'static str {
        "training, medical, dwell, and deployability penalties"
    }

    fn apply(&self, matrix: &mut CostMatrix, context: &LayerContext) -> LayerReport {
        let policy = context.policy;
        let gate_penalty = policy.get("readiness_gate_penalty");
        let dwell_penalty = policy.get("dwell_short_penalty");
        let category_penalty = policy.get("medical_category_penalty");
        let non_deployable_penalty = policy.get("non_deployable_penalty");
        let current_bonus = policy.get("readiness_current_bonus");

        let mut report = LayerReport::default();
        let cols = matrix.cols();

        for (row, soldier) in context.soldiers.iter().enumerate() {
            let check = self.profile.evaluate(&soldier.readiness);

            let mut delta = gate_penalty * check.gate_failures() as f64;
            if check.dwell_short {
                delta += dwell_penalty;
            }
            delta += category_penalty
                * (check.medical_levels_over + check.dental_levels_over) as f64;
            if check.non_deployable {
                delta += non_deployable_penalty;
            }
            if check.is_ready() {
                delta += current_bonus;
            }

            if delta != 0.0 && cols > 0 {
                matrix.add_row(row, delta);
                report.adjusted += cols;
                report.total_delta += delta * cols as f64;
            }
        }
        report
    }
}
