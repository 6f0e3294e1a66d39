//! Billet model: the demand side of the assignment problem.

use super::soldier::{Clearance, EducationLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A language requirement on a billet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRequirement {
    /// Language code.
    pub code: String,
    /// Minimum level for both listening and reading.
    pub min_level: i32,
    /// Required (unmet is critical) versus preferred.
    pub required: bool,
}

impl LanguageRequirement {
    /// Creates a required language.
    pub fn new(code: impl Into<String>, min_level: i32) -> Self {
        Self {
            code: code.into(),
            min_level,
            required: true,
        }
    }

    /// Creates a preferred (non-critical) language.
    pub fn preferred(code: impl Into<String>, min_level: i32) -> Self {
        Self {
            code: code.into(),
            min_level,
            required: false,
        }
    }
}

/// Detailed position requirements, attached to a billet when the force
/// document specifies more than skill and rank.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualificationRequirements {
    /// Minimum education level.
    pub min_education: Option<EducationLevel>,
    /// Minimum clearance; unmet is critical.
    pub min_clearance: Option<Clearance>,
    /// Language requirements.
    pub languages: Vec<LanguageRequirement>,
    /// Badge/ASI/SQI codes that must be held; each missing one is critical.
    pub badges_required: Vec<String>,
    /// Badge/ASI/SQI codes that earn a bonus when held.
    pub badges_preferred: Vec<String>,
    /// License codes that must be held; each missing one is critical.
    pub licenses_required: Vec<String>,
    /// Award codes that earn a bonus when held.
    pub awards_preferred: Vec<String>,
    /// Combat service credit required; missing is critical.
    pub combat_required: bool,
    /// Minimum total deployments.
    pub min_total_deployments: i32,
    /// Minimum leadership position level.
    pub min_leadership_level: i32,
    /// Minimum time in service, months.
    pub min_months_in_service: i32,
    /// Minimum time in grade, months.
    pub min_months_in_grade: i32,
    /// Maximum acceptable medical category.
    pub max_med_category: Option<i32>,
    /// Minimum fitness test score.
    pub min_fitness_score: Option<i32>,
}

impl QualificationRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements for a leadership billet in a line company: combat
    /// experience, jump status, and squad-leader time.
    pub fn infantry_leader() -> Self {
        Self {
            badges_required: vec!["AIRBORNE".to_string()],
            badges_preferred: vec!["RANGER".to_string(), "CIB".to_string()],
            combat_required: true,
            min_leadership_level: 2,
            min_months_in_service: 48,
            min_months_in_grade: 6,
            max_med_category: Some(2),
            ..Self::default()
        }
    }

    /// Requirements for a language-coded analyst billet.
    pub fn language_analyst(code: impl Into<String>) -> Self {
        Self {
            min_education: Some(EducationLevel::SomeCollege),
            min_clearance: Some(Clearance::TopSecret),
            languages: vec![LanguageRequirement::new(code, 2)],
            ..Self::default()
        }
    }

    /// Sets the education floor, chainable.
    pub fn with_min_education(mut self, level: EducationLevel) -> Self {
        self.min_education = Some(level);
        self
    }

    /// Sets the clearance floor, chainable.
    pub fn with_min_clearance(mut self, clearance: Clearance) -> Self {
        self.min_clearance = Some(clearance);
        self
    }

    /// Adds a language requirement, chainable.
    pub fn with_language(mut self, requirement: LanguageRequirement) -> Self {
        self.languages.push(requirement);
        self
    }

    /// Adds a required badge/ASI/SQI code, chainable.
    pub fn with_required_badge(mut self, code: impl Into<String>) -> Self {
        self.badges_required.push(code.into());
        self
    }

    /// Adds a preferred badge/ASI/SQI code, chainable.
    pub fn with_preferred_badge(mut self, code: impl Into<String>) -> Self {
        self.badges_preferred.push(code.into());
        self
    }

    /// Adds a required license code, chainable.
    pub fn with_required_license(mut self, code: impl Into<String>) -> Self {
        self.licenses_required.push(code.into());
        self
    }

    /// Adds a preferred award code, chainable.
    pub fn with_preferred_award(mut self, code: impl Into<String>) -> Self {
        self.awards_preferred.push(code.into());
        self
    }

    /// Requires combat service credit, chainable.
    pub fn require_combat(mut self) -> Self {
        self.combat_required = true;
        self
    }

    /// Sets experience floors, chainable.
    pub fn with_experience(mut self, min_deployments: i32, min_leadership: i32) -> Self {
        self.min_total_deployments = min_deployments;
        self.min_leadership_level = min_leadership;
        self
    }

    /// Sets time-in-service/grade floors in months, chainable.
    pub fn with_service_floors(mut self, in_service: i32, in_grade: i32) -> Self {
        self.min_months_in_service = in_service;
        self.min_months_in_grade = in_grade;
        self
    }

    /// Sets the medical category ceiling, chainable.
    pub fn with_max_med_category(mut self, category: i32) -> Self {
        self.max_med_category = Some(category);
        self
    }

    /// Sets the fitness floor, chainable.
    pub fn with_min_fitness(mut self, score: i32) -> Self {
        self.min_fitness_score = Some(score);
        self
    }

    /// Whether the bundle carries any requirement at all.
    pub fn has_any(&self) -> bool {
        self != &Self::default()
    }
}

/// An open position to fill.
///
/// `index` is the billet's dense 0-based column position in the input table;
/// the alignment check rejects gapped or reordered tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billet {
    /// Column position in the billet table.
    pub index: usize,
    /// Unique identifier.
    pub id: String,
    /// Required skill code.
    pub skill_code: String,
    /// Lower edge of the acceptable rank band (pay-grade ordinal).
    pub min_rank: i32,
    /// Upper edge of the acceptable rank band.
    pub max_rank: i32,
    /// Fill priority tier: 1 routine, 2 elevated, 3 critical.
    pub priority: i32,
    /// Mission location reference, resolved by the travel-cost model.
    pub location: String,
    /// Detailed requirements, when the position carries them.
    pub requirements: Option<QualificationRequirements>,
    /// Team-instance id; billets sharing one should be filled by a single
    /// organic team.
    pub keep_together: Option<String>,
    /// Free-form attributes.
    pub attributes: HashMap<String, String>,
}

impl Billet {
    /// Creates a billet at a table position. The rank band defaults to the
    /// full enlisted range and priority to routine.
    pub fn new(index: usize, id: impl Into<String>, skill_code: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            skill_code: skill_code.into(),
            min_rank: 1,
            max_rank: 9,
            priority: 1,
            location: String::new(),
            requirements: None,
            keep_together: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the acceptable rank band, chainable.
    pub fn with_rank_band(mut self, min_rank: i32, max_rank: i32) -> Self {
        self.min_rank = min_rank;
        self.max_rank = max_rank;
        self
    }

    /// Sets the priority tier, chainable.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the mission location, chainable.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Attaches a requirement bundle, chainable.
    pub fn with_requirements(mut self, requirements: QualificationRequirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    /// Tags the billet with a keep-together team instance, chainable.
    pub fn with_team_instance(mut self, instance: impl Into<String>) -> Self {
        self.keep_together = Some(instance.into());
        self
    }

    /// Adds a free-form attribute, chainable.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Ordinal distance from a rank to the acceptable band; zero inside it.
    pub fn rank_distance(&self, rank: i32) -> i32 {
        if rank < self.min_rank {
            self.min_rank - rank
        } else if rank > self.max_rank {
            rank - self.max_rank
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billet_builder() {
        let billet = Billet::new(0, "B-100", "11B")
            .with_rank_band(5, 6)
            .with_priority(3)
            .with_location("JBLM")
            .with_team_instance("wpns-sq-1");

        assert_eq!(billet.index, 0);
        assert_eq!(billet.priority, 3);
        assert_eq!(billet.keep_together.as_deref(), Some("wpns-sq-1"));
        assert!(billet.requirements.is_none());
    }

    #[test]
    fn test_rank_distance() {
        let billet = Billet::new(0, "B-1", "11B").with_rank_band(5, 6);
        assert_eq!(billet.rank_distance(5), 0);
        assert_eq!(billet.rank_distance(6), 0);
        assert_eq!(billet.rank_distance(4), 1);
        assert_eq!(billet.rank_distance(9), 3);
    }

    #[test]
    fn test_empty_bundle_has_nothing() {
        assert!(!QualificationRequirements::new().has_any());
        assert!(QualificationRequirements::new().require_combat().has_any());
    }

    #[test]
    fn test_infantry_leader_preset() {
        let req = QualificationRequirements::infantry_leader();
        assert!(req.combat_required);
        assert!(req.badges_required.contains(&"AIRBORNE".to_string()));
        assert_eq!(req.min_leadership_level, 2);
        assert_eq!(req.max_med_category, Some(2));
    }

    #[test]
    fn test_language_analyst_preset() {
        let req = QualificationRequirements::language_analyst("KP");
        assert_eq!(req.min_clearance, Some(Clearance::TopSecret));
        assert_eq!(req.languages.len(), 1);
        assert!(req.languages[0].required);
        assert_eq!(req.languages[0].code, "KP");
    }
}
