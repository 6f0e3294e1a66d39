//! Organic team: a leader and their transitive same-unit subordinates.
//!
//! Teams are derived from the soldier table's supervisor references once per
//! run and never persisted.

use serde::{Deserialize, Serialize};

/// A leader plus all transitive subordinates within one parent unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicTeam {
    /// The root soldier of the tree.
    pub leader_id: String,
    /// Parent unit shared by every member.
    pub unit: String,
    /// Subordinate ids in hierarchy order (breadth-first under the leader).
    pub member_ids: Vec<String>,
}

impl OrganicTeam {
    pub fn new(leader_id: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            leader_id: leader_id.into(),
            unit: unit.into(),
            member_ids: Vec::new(),
        }
    }

    /// Total head-count including the leader.
    pub fn size(&self) -> usize {
        1 + self.member_ids.len()
    }

    /// Every member id in hierarchy order, leader first.
    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.leader_id.as_str()).chain(self.member_ids.iter().map(String::as_str))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.leader_id == id || self.member_ids.iter().any(|m| m == id)
    }
}
