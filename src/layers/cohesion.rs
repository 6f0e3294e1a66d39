//! Unit-cohesion adjustments: keep organic teams together, avoid sourcing
//! from more parent units than necessary.
//!
//! Teams are derived per run from supervisor references. Billets sharing a
//! `keep_together` instance id form a group; each group is claimed by the
//! best-fitting team, whose eligible members then get a bonus on the group's
//! columns deep enough to out-compete outsiders, with an epsilon-scale
//! hierarchy offset so the solver seats the leader first on exact ties.

use super::{CostLayer, LayerContext, LayerReport};
use crate::models::{Billet, CostMatrix, OrganicTeam, Soldier};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Derives every organic team from the soldier table.
///
/// A leader has at least one same-unit subordinate and no same-unit
/// supervisor; the team is the leader plus all transitive same-unit
/// subordinates in breadth-first hierarchy order. Unknown supervisor
/// references and cyclic chains yield no team and are logged; the layer
/// counts them as degraded.
pub fn derive_teams(soldiers: &[Soldier]) -> Vec<OrganicTeam> {
    derive_teams_counted(soldiers).0
}

fn derive_teams_counted(soldiers: &[Soldier]) -> (Vec<OrganicTeam>, usize) {
    let by_id: HashMap<&str, &Soldier> = soldiers.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut degraded = 0usize;

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for soldier in soldiers {
        if let Some(sup_id) = &soldier.supervisor {
            match by_id.get(sup_id.as_str()) {
                Some(sup) if sup.unit == soldier.unit => {
                    children.entry(sup_id).or_default().push(&soldier.id);
                }
                Some(_) => {} // cross-unit supervision never forms a team
                None => {
                    tracing::warn!(
                        soldier = %soldier.id,
                        supervisor = %sup_id,
                        "unknown supervisor; soldier joins no team"
                    );
                    degraded += 1;
                }
            }
        }
    }
    for list in children.values_mut() {
        list.sort_unstable();
    }

    let mut teams = Vec::new();
    for soldier in soldiers {
        if !children.contains_key(soldier.id.as_str()) {
            continue;
        }
        let led_from_same_unit = soldier
            .supervisor
            .as_ref()
            .and_then(|sup| by_id.get(sup.as_str()))
            .is_some_and(|sup| sup.unit == soldier.unit);
        if led_from_same_unit {
            continue; // absorbed into a larger tree
        }

        let mut team = OrganicTeam::new(&soldier.id, &soldier.unit);
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(&soldier.id);
        let mut queue: VecDeque<&str> = children[soldier.id.as_str()].iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                tracing::warn!(soldier = id, "cyclic supervision; walk truncated");
                degraded += 1;
                continue;
            }
            team.member_ids.push(id.to_string());
            if let Some(subs) = children.get(id) {
                queue.extend(subs.iter().copied());
            }
        }
        teams.push(team);
    }

    teams.sort_by(|a, b| a.leader_id.cmp(&b.leader_id));
    (teams, degraded)
}

/// Keep-together instance id -> column positions, in id order.
fn instance_groups(billets: &[Billet]) -> BTreeMap<&str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (col, billet) in billets.iter().enumerate() {
        if let Some(instance) = &billet.keep_together {
            groups.entry(instance).or_default().push(col);
        }
    }
    groups
}

/// Team members eligible for a group: skill matches some billet in it.
/// Keeps the team's hierarchy position for the tie-break offset.
fn eligible_members<'a>(
    team: &'a OrganicTeam,
    group_skills: &HashSet<&str>,
    by_id: &HashMap<&str, &'a Soldier>,
) -> Vec<(usize, &'a str)> {
    team.all_ids()
        .enumerate()
        .filter(|(_, id)| {
            by_id
                .get(id)
                .is_some_and(|s| group_skills.contains(s.skill_code.as_str()))
        })
        .collect()
}

/// Cohesion bonuses and cross-leveling penalties.
#[derive(Debug, Clone, Copy)]
pub struct CohesionLayer;

impl CostLayer for CohesionLayer {
    fn name(&self) -> &'static str {
        "cohesion"
    }

    fn description(&self) -> &'static str {
        "keep-together bonuses, split and cross-unit penalties"
    }

    fn apply(&self, matrix: &mut CostMatrix, context: &LayerContext) -> LayerReport {
        let bonus = context.policy.get("keep_together_bonus");
        let split_penalty = context.policy.get("team_split_penalty");
        let cross_unit = context.policy.get("cross_unit_penalty");

        let (teams, degraded) = derive_teams_counted(context.soldiers);
        let mut report = LayerReport {
            degraded,
            ..LayerReport::default()
        };

        let by_id: HashMap<&str, &Soldier> =
            context.soldiers.iter().map(|s| (s.id.as_str(), s)).collect();
        let row_of: HashMap<&str, usize> = context
            .soldiers
            .iter()
            .enumerate()
            .map(|(row, s)| (s.id.as_str(), row))
            .collect();

        let groups = instance_groups(context.billets);
        let mut touched: HashSet<(usize, usize)> = HashSet::new();
        let mut add = |matrix: &mut CostMatrix,
                       report: &mut LayerReport,
                       row: usize,
                       col: usize,
                       delta: f64| {
            if delta != 0.0 {
                matrix.add(row, col, delta);
                report.total_delta += delta;
                if touched.insert((row, col)) {
                    report.adjusted += 1;
                }
            }
        };

        // Claim each group for its best-fitting team: most eligible members,
        // then closest size, then lexicographic leader id.
        let mut claims: Vec<(&str, &Vec<usize>, Vec<(usize, &str)>)> = Vec::new();
        let mut claimed: HashSet<usize> = HashSet::new();
        for (instance, cols) in &groups {
            let group_skills: HashSet<&str> = cols
                .iter()
                .map(|&c| context.billets[c].skill_code.as_str())
                .collect();

            let mut best: Option<(usize, usize, &str, usize)> = None;
            for (ti, team) in teams.iter().enumerate() {
                if claimed.contains(&ti) {
                    continue;
                }
                let members = eligible_members(team, &group_skills, &by_id);
                if members.len() < 2 {
                    continue;
                }
                let gap = team.size().abs_diff(cols.len());
                let better = match best {
                    None => true,
                    Some((count, best_gap, leader, _)) => {
                        members.len() > count
                            || (members.len() == count
                                && (gap < best_gap
                                    || (gap == best_gap && team.leader_id.as_str() < leader)))
                    }
                };
                if better {
                    best = Some((members.len(), gap, &team.leader_id, ti));
                }
            }

            if let Some((_, _, _, ti)) = best {
                claimed.insert(ti);
                claims.push((*instance, cols, eligible_members(&teams[ti], &group_skills, &by_id)));
            }
        }

        // Bonuses on the claimed group, split penalties on everyone else's.
        let hierarchy_step = bonus.abs() * 1e-6;
        for (instance, cols, members) in &claims {
            let co = (members.len() - 1) as f64;
            for &(hier, id) in members {
                let row = row_of[id];
                for &col in *cols {
                    add(
                        matrix,
                        &mut report,
                        row,
                        col,
                        bonus * co + hierarchy_step * hier as f64,
                    );
                }
                for (other, other_cols) in &groups {
                    if other == instance {
                        continue;
                    }
                    for &col in other_cols {
                        add(matrix, &mut report, row, col, split_penalty);
                    }
                }
            }
        }

        // Cross-leveling: the largest unit sources free, each further unit
        // costs one more increment on every one of its rows.
        if cross_unit != 0.0 && matrix.cols() > 0 {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for soldier in context.soldiers {
                *counts.entry(soldier.unit.as_str()).or_default() += 1;
            }
            let mut units: Vec<(&str, usize)> = counts.into_iter().collect();
            units.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            let rank: HashMap<&str, usize> = units
                .iter()
                .enumerate()
                .map(|(i, &(unit, _))| (unit, i))
                .collect();

            for (row, soldier) in context.soldiers.iter().enumerate() {
                let k = rank[soldier.unit.as_str()];
                if k > 0 {
                    for col in 0..matrix.cols() {
                        add(matrix, &mut report, row, col, cross_unit * k as f64);
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PolicyConfiguration;

    fn make_soldier(index: usize, id: &str, unit: &str) -> Soldier {
        Soldier::new(index, id, "11B", 5).with_unit(unit)
    }

    #[test]
    fn test_derive_teams_walks_transitive_subordinates() {
        let soldiers = vec![
            make_soldier(0, "S-1", "A").with_supervisor("S-2"),
            make_soldier(1, "S-2", "A").with_supervisor("S-3"),
            make_soldier(2, "S-3", "A"),
            make_soldier(3, "S-4", "B"),
        ];
        let teams = derive_teams(&soldiers);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].leader_id, "S-3");
        assert_eq!(teams[0].member_ids, vec!["S-2", "S-1"]);
        assert_eq!(teams[0].unit, "A");
    }

    #[test]
    fn test_cross_unit_supervision_splits_trees() {
        // S-2 reports to S-3 in another unit, so S-2 roots its own team.
        let soldiers = vec![
            make_soldier(0, "S-1", "A").with_supervisor("S-2"),
            make_soldier(1, "S-2", "A").with_supervisor("S-3"),
            make_soldier(2, "S-3", "B"),
        ];
        let teams = derive_teams(&soldiers);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].leader_id, "S-2");
        assert_eq!(teams[0].member_ids, vec!["S-1"]);
    }

    #[test]
    fn test_cyclic_supervision_terminates_without_a_team() {
        let soldiers = vec![
            make_soldier(0, "S-1", "A").with_supervisor("S-2"),
            make_soldier(1, "S-2", "A").with_supervisor("S-1"),
        ];
        let teams = derive_teams(&soldiers);
        assert!(teams.is_empty());
    }

    #[test]
    fn test_unknown_supervisor_counts_degraded() {
        let soldiers = vec![make_soldier(0, "S-1", "A").with_supervisor("S-9")];
        let (teams, degraded) = derive_teams_counted(&soldiers);
        assert!(teams.is_empty());
        assert_eq!(degraded, 1);
    }

    fn scenario() -> (Vec<Soldier>, Vec<Billet>) {
        let soldiers = vec![
            make_soldier(0, "S-A1", "A").with_supervisor("S-A2"),
            Soldier::new(1, "S-A2", "11B", 6).with_unit("A"),
            make_soldier(2, "S-B1", "B"),
        ];
        let billets = vec![
            Billet::new(0, "B-X", "11B").with_rank_band(5, 6),
            Billet::new(1, "B-Y", "11B")
                .with_rank_band(5, 6)
                .with_team_instance("alpha"),
        ];
        (soldiers, billets)
    }

    #[test]
    fn test_bonus_lands_on_claimed_group_with_leader_deepest() {
        let (soldiers, billets) = scenario();
        let policy = PolicyConfiguration::zeroed().with_weight("keep_together_bonus", -200.0);
        let context = LayerContext::new(&soldiers, &billets, &policy);
        let mut matrix = CostMatrix::new(
            soldiers.iter().map(|s| s.id.clone()).collect(),
            billets.iter().map(|b| b.id.clone()).collect(),
        );

        CohesionLayer.apply(&mut matrix, &context);

        // Untagged column untouched.
        assert!(matrix.get(0, 0).abs() < 1e-10);
        assert!(matrix.get(1, 0).abs() < 1e-10);
        // Both team members get the bonus on the tagged column; the leader
        // (hierarchy position 0) sits strictly deepest.
        assert!(matrix.get(1, 1) < matrix.get(0, 1));
        assert!(matrix.get(0, 1) < -199.0);
        // The outsider gets nothing.
        assert!(matrix.get(2, 1).abs() < 1e-10);
    }

    #[test]
    fn test_cross_unit_penalty_scales_with_unit_rank() {
        let soldiers = vec![
            make_soldier(0, "S-1", "A"),
            make_soldier(1, "S-2", "A"),
            make_soldier(2, "S-3", "B"),
            make_soldier(3, "S-4", "C"),
        ];
        let billets = vec![Billet::new(0, "B-1", "11B")];
        let policy = PolicyConfiguration::zeroed().with_weight("cross_unit_penalty", 100.0);
        let context = LayerContext::new(&soldiers, &billets, &policy);
        let mut matrix = CostMatrix::new(
            soldiers.iter().map(|s| s.id.clone()).collect(),
            vec!["B-1".to_string()],
        );

        let report = CohesionLayer.apply(&mut matrix, &context);

        // Unit A is largest and free; B and C rank by name.
        assert!(matrix.get(0, 0).abs() < 1e-10);
        assert!((matrix.get(2, 0) - 100.0).abs() < 1e-10);
        assert!((matrix.get(3, 0) - 200.0).abs() < 1e-10);
        assert_eq!(report.adjusted, 2);
    }

    #[test]
    fn test_split_penalty_on_foreign_instance_columns() {
        let soldiers = vec![
            make_soldier(0, "S-A1", "A").with_supervisor("S-A2"),
            make_soldier(1, "S-A2", "A"),
            make_soldier(2, "S-C1", "C").with_supervisor("S-C2"),
            make_soldier(3, "S-C2", "C"),
        ];
        let billets = vec![
            Billet::new(0, "B-1", "11B").with_team_instance("alpha"),
            Billet::new(1, "B-2", "11B").with_team_instance("bravo"),
        ];
        let policy = PolicyConfiguration::zeroed()
            .with_weight("keep_together_bonus", -200.0)
            .with_weight("team_split_penalty", 300.0);
        let context = LayerContext::new(&soldiers, &billets, &policy);
        let mut matrix = CostMatrix::new(
            soldiers.iter().map(|s| s.id.clone()).collect(),
            billets.iter().map(|b| b.id.clone()).collect(),
        );

        CohesionLayer.apply(&mut matrix, &context);

        // Team A claims "alpha" (leader id order), team C claims "bravo".
        // Members straying into the other group's column pay the split fee.
        assert!(matrix.get(0, 0) < -199.0);
        assert!((matrix.get(0, 1) - 300.0).abs() < 1e-10);
        assert!(matrix.get(2, 1) < -199.0);
        assert!((matrix.get(2, 0) - 300.0).abs() < 1e-10);
    }

    #[test]
    fn test_zeroed_policy_is_a_no_op() {
        let (soldiers, billets) = scenario();
        let policy = PolicyConfiguration::zeroed();
        let context = LayerContext::new(&soldiers, &billets, &policy);
        let mut matrix = CostMatrix::new(
            soldiers.iter().map(|s| s.id.clone()).collect(),
            billets.iter().map(|b| b.id.clone()).collect(),
        );

        let report = CohesionLayer.apply(&mut matrix, &context);
        assert_eq!(report.adjusted, 0);
        for row in 0..3 {
            for col in 0..2 {
                assert!(matrix.get(row, col).abs() < 1e-10);
            }
        }
    }
}
