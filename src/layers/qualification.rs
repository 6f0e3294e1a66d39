//! Qualification adjustments: detailed position requirements against each
//! soldier's record.
//!
//! Every category is additive and absent-safe. Required items a soldier
//! lacks mark the pair critical, which adds one flat penalty on top of the
//! per-item charges; the pair stays assignable. Clearance, medical, and
//! fitness checks read the soldier row itself, so they run even when no
//! qualification profile is on record; profile-backed categories are then
//! skipped and the pair counted as degraded.

use super::{CostLayer, LayerContext, LayerReport};
use crate::models::{CostMatrix, PolicyConfiguration, QualificationRequirements, Soldier};

struct QualWeights {
    education_gap: f64,
    clearance_gap: f64,
    language_missing: f64,
    language_native_bonus: f64,
    badge_missing: f64,
    badge_preferred_bonus: f64,
    license_missing: f64,
    experience_gap: f64,
    combat_bonus: f64,
    award_bonus: f64,
    fitness_shortfall: f64,
    service_time: f64,
    critical: f64,
    perfect_bonus: f64,
}

impl QualWeights {
    fn from_policy(policy: &PolicyConfiguration) -> Self {
        Self {
            education_gap: policy.get("education_gap_penalty"),
            clearance_gap: policy.get("clearance_gap_penalty"),
            language_missing: policy.get("language_missing_penalty"),
            language_native_bonus: policy.get("language_native_bonus"),
            badge_missing: policy.get("badge_missing_penalty"),
            badge_preferred_bonus: policy.get("badge_preferred_bonus"),
            license_missing: policy.get("license_missing_penalty"),
            experience_gap: policy.get("experience_gap_penalty"),
            combat_bonus: policy.get("combat_experience_bonus"),
            award_bonus: policy.get("award_bonus"),
            fitness_shortfall: policy.get("fitness_shortfall_penalty"),
            service_time: policy.get("service_time_penalty"),
            critical: policy.get("critical_qualification_penalty"),
            perfect_bonus: policy.get("qualification_perfect_bonus"),
        }
    }
}

/// Whether the bundle carries requirements only a profile can answer.
fn needs_profile(req: &QualificationRequirements) -> bool {
    req.min_education.is_some()
        || !req.languages.is_empty()
        || !req.badges_required.is_empty()
        || !req.badges_preferred.is_empty()
        || !req.licenses_required.is_empty()
        || !req.awards_preferred.is_empty()
        || req.combat_required
        || req.min_total_deployments > 0
        || req.min_leadership_level > 0
        || req.min_months_in_service > 0
        || req.min_months_in_grade > 0
}

/// Cost delta for one soldier against one requirement bundle.
/// Returns the delta and whether any check was skipped for missing data.
fn evaluate_pair(
    soldier: &Soldier,
    req: &QualificationRequirements,
    weights: &QualWeights,
) -> (f64, bool) {
    let mut penalty = 0.0;
    let mut bonus = 0.0;
    let mut critical = false;

    if let Some(min_clearance) = req.min_clearance {
        let gap = min_clearance.level() - soldier.clearance.level();
        if gap > 0 {
            penalty += weights.clearance_gap * gap as f64;
            critical = true;
        }
    }
    if let Some(max_med) = req.max_med_category {
        if soldier.readiness.med_category > max_med {
            penalty += weights.fitness_shortfall;
        }
    }
    let mut degraded = req.min_fitness_score.is_some() && soldier.fitness_score.is_none();
    if let (Some(floor), Some(score)) = (req.min_fitness_score, soldier.fitness_score) {
        if score < floor {
            penalty += weights.fitness_shortfall;
        }
    }

    degraded |= soldier.qualifications.is_none() && needs_profile(req);
    if let Some(profile) = &soldier.qualifications {
        if let Some(min_education) = req.min_education {
            let gap = min_education.level() - profile.education.level();
            if gap > 0 {
                penalty += weights.education_gap * gap as f64;
            }
        }

        for language in &req.languages {
            if !language.required {
                continue;
            }
            match profile.language(&language.code) {
                Some(skill) if skill.is_proficient(language.min_level) => {
                    if skill.native {
                        bonus += weights.language_native_bonus;
                    }
                }
                _ => {
                    penalty += weights.language_missing;
                    critical = true;
                }
            }
        }

        for code in &req.badges_required {
            if !profile.has_badge(code) {
                penalty += weights.badge_missing;
                critical = true;
            }
        }
        for code in &req.badges_preferred {
            if profile.has_badge(code) {
                bonus += weights.badge_preferred_bonus;
            }
        }
        for code in &req.licenses_required {
            if !profile.has_license(code) {
                penalty += weights.license_missing;
                critical = true;
            }
        }
        for code in &req.awards_preferred {
            if profile.has_award(code) {
                bonus += weights.award_bonus;
            }
        }

        if req.combat_required {
            if profile.combat_deployments > 0 {
                bonus += weights.combat_bonus;
            } else {
                penalty += weights.experience_gap;
                critical = true;
            }
        }
        let deployment_gap = req.min_total_deployments - profile.total_deployments;
        if deployment_gap > 0 {
            penalty += weights.experience_gap * deployment_gap as f64;
        }
        let leadership_gap = req.min_leadership_level - profile.leadership_level;
        if leadership_gap > 0 {
            penalty += weights.experience_gap * leadership_gap as f64;
        }

        if profile.months_in_service < req.min_months_in_service {
            penalty += weights.service_time;
        }
        if profile.months_in_grade < req.min_months_in_grade {
            penalty += weights.service_time;
        }
    }

    if critical {
        penalty += weights.critical;
    }
    // A degraded pair never earns the perfect-fit bonus: a skipped check is
    // not a passed one.
    if penalty == 0.0 && !degraded {
        bonus += weights.perfect_bonus;
    }

    (penalty + bonus, degraded)
}

/// Detailed-requirement adjustments per soldier/billet pair.
#[derive(Debug, Clone, Copy)]
pub struct QualificationLayer;

impl CostLayer for QualificationLayer {
    fn name(&self) -> &'static str {
        "qualification"
    }

    fn description(&self) -> &'static str {
        "education, clearance, language, badge, and experience requirements"
    }

    fn apply(&self, matrix: &mut CostMatrix, context: &LayerContext) -> LayerReport {
        let weights = QualWeights::from_policy(context.policy);
        let mut report = LayerReport::default();

        for (col, billet) in context.billets.iter().enumerate() {
            let Some(req) = &billet.requirements else {
                continue;
            };
            // An attached-but-empty bundle demands nothing and earns nothing.
            if !req.has_any() {
                continue;
            }
            for (row, soldier) in context.soldiers.iter().enumerate() {
                let (delta, degraded) = evaluate_pair(soldier, req, &weights);
                if degraded {
                    report.degraded += 1;
                }
                if delta != 0.0 {
                    matrix.add(row, col, delta);
                    report.adjusted += 1;
                    report.total_delta += delta;
                }
            }
        }

        report
    }
}
