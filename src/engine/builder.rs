//! Base cost matrix construction from skill, rank band, and fill priority.

use crate::models::{Billet, CostMatrix, PolicyConfiguration, Soldier, INFEASIBLE_COST};

/// Builds the base N×M cost matrix the layers then adjust.
///
/// The base cost is a pure function of the two tables and the policy:
///
/// ```text
/// skill_term = skill_mismatch_penalty   if skill codes differ
/// rank_term  = rank_distance_penalty × ordinal distance outside the band
/// cost       = (skill_term + rank_term) × priority_weight(tier)
///              - priority_fill_bonus × (tier - 1)
/// ```
///
/// Priority tiers clamp into 1..=3 and map to the low/medium/high priority
/// weights. In strict-skill mode a mismatched pair is pinned to the
/// infeasible sentinel instead of priced, which keeps the pair assignable
/// as a last resort while the summary counts it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostMatrixBuilder {
    strict_skill: bool,
}

impl CostMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins skill-mismatched pairs to the infeasible sentinel, chainable.
    pub fn with_strict_skill(mut self, strict: bool) -> Self {
        self.strict_skill = strict;
        self
    }

    pub fn build(
        &self,
        soldiers: &[Soldier],
        billets: &[Billet],
        policy: &PolicyConfiguration,
    ) -> CostMatrix {
        let skill_penalty = policy.get("skill_mismatch_penalty");
        let rank_penalty = policy.get("rank_distance_penalty");
        let tier_weights = [
            policy.get("priority_weight_low"),
            policy.get("priority_weight_medium"),
            policy.get("priority_weight_high"),
        ];
        let fill_bonus = policy.get("priority_fill_bonus");

        let mut matrix = CostMatrix::new(
            soldiers.iter().map(|s| s.id.clone()).collect(),
            billets.iter().map(|b| b.id.clone()).collect(),
        );

        for (row, soldier) in soldiers.iter().enumerate() {
            for (col, billet) in billets.iter().enumerate() {
                let mismatch = soldier.skill_code != billet.skill_code;
                if mismatch && self.strict_skill {
                    matrix.set(row, col, INFEASIBLE_COST);
                    continue;
                }

                let tier = billet.priority.clamp(1, 3);
                let weight = tier_weights[(tier - 1) as usize];
                let skill_term = if mismatch { skill_penalty } else { 0.0 };
                let rank_term = rank_penalty * billet.rank_distance(soldier.rank) as f64;
                let cost = (skill_term + rank_term) * weight - fill_bonus * (tier - 1) as f64;
                matrix.set(row, col, cost);
            }
        }

        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::is_infeasible_cost;

    fn defaults() -> PolicyConfiguration {
        PolicyConfiguration::new("defaults")
    }

    #[test]
    fn test_in_band_match_is_free() {
        let soldiers = vec![Soldier::new(0, "S-1", "11B", 5)];
        let billets = vec![Billet::new(0, "B-1", "11B").with_rank_band(4, 6)];
        let matrix = CostMatrixBuilder::new().build(&soldiers, &billets, &defaults());

        assert!(matrix.get(0, 0).abs() < 1e-10);
    }

    #[test]
    fn test_mismatch_and_rank_distance_price_in() {
        let soldiers = vec![
            Soldier::new(0, "S-1", "11B", 5),
            Soldier::new(1, "S-2", "68W", 3),
        ];
        let billets = vec![Billet::new(0, "B-1", "11B").with_rank_band(5, 6)];
        let matrix = CostMatrixBuilder::new().build(&soldiers, &billets, &defaults());

        assert!(matrix.get(0, 0).abs() < 1e-10);
        // Wrong skill and two ranks below the band.
        assert!((matrix.get(1, 0) - (3000.0 + 1000.0 * 2.0)).abs() < 1e-10);
    }

    #[test]
    fn test_priority_scales_penalties_and_rewards_filling() {
        let soldiers = vec![
            Soldier::new(0, "S-1", "11B", 5),
            Soldier::new(1, "S-2", "68W", 5),
        ];
        let billets = vec![
            Billet::new(0, "B-1", "11B").with_rank_band(5, 6).with_priority(1),
            Billet::new(1, "B-2", "11B").with_rank_band(5, 6).with_priority(3),
        ];
        let matrix = CostMatrixBuilder::new().build(&soldiers, &billets, &defaults());

        // A perfect candidate is rewarded for filling the critical billet.
        assert!(matrix.get(0, 0).abs() < 1e-10);
        assert!((matrix.get(0, 1) - (-400.0)).abs() < 1e-10);
        // A mismatched candidate hurts twice as much at the critical billet.
        assert!((matrix.get(1, 0) - 3000.0).abs() < 1e-10);
        assert!((matrix.get(1, 1) - (3000.0 * 2.0 - 400.0)).abs() < 1e-10);
    }

    #[test]
    fn test_priority_tiers_clamp() {
        let soldiers = vec![Soldier::new(0, "S-1", "11B", 5)];
        let billets = vec![
            Billet::new(0, "B-1", "11B").with_rank_band(5, 6).with_priority(0),
            Billet::new(1, "B-2", "11B").with_rank_band(5, 6).with_priority(9),
        ];
        let matrix = CostMatrixBuilder::new().build(&soldiers, &billets, &defaults());

        assert!(matrix.get(0, 0).abs() < 1e-10);
        assert!((matrix.get(0, 1) - (-400.0)).abs() < 1e-10);
    }

    #[test]
    fn test_strict_skill_pins_the_sentinel() {
        let soldiers = vec![
            Soldier::new(0, "S-1", "11B", 5),
            Soldier::new(1, "S-2", "68W", 5),
        ];
        let billets = vec![Billet::new(0, "B-1", "11B").with_rank_band(5, 6)];
        let matrix = CostMatrixBuilder::new()
            .with_strict_skill(true)
            .build(&soldiers, &billets, &defaults());

        assert!(!is_infeasible_cost(matrix.get(0, 0)));
        assert!(is_infeasible_cost(matrix.get(1, 0)));
        assert!((matrix.get(1, 0) - INFEASIBLE_COST).abs() < 1e-10);
    }

    #[test]
    fn test_empty_tables_build_empty_shapes() {
        let soldiers = vec![Soldier::new(0, "S-1", "11B", 5)];
        let matrix = CostMatrixBuilder::new().build(&soldiers, &[], &defaults());
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.cols(), 0);

        let matrix = CostMatrixBuilder::new().build(&[], &[], &defaults());
        assert!(matrix.is_empty());
    }
}
