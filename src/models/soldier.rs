//! Soldier model: the supply side of the assignment problem.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Security clearance, ordered from none upward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Clearance {
    /// No clearance held.
    #[default]
    None,
    /// Secret.
    Secret,
    /// Top Secret.
    TopSecret,
}

impl Clearance {
    /// Ordinal level, 0 for none.
    pub fn level(&self) -> i32 {
        *self as i32
    }
}

/// Education attainment, ordered from none upward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum EducationLevel {
    /// No credential on record.
    #[default]
    None,
    /// General equivalency diploma.
    Ged,
    /// High-school diploma.
    HighSchool,
    /// College credit without a degree.
    SomeCollege,
    /// Associate degree.
    Associate,
    /// Bachelor's degree.
    Bachelor,
    /// Master's degree.
    Master,
    /// Doctorate or professional degree.
    Doctorate,
}

impl EducationLevel {
    /// Ordinal level, 0 for none.
    pub fn level(&self) -> i32 {
        *self as i32
    }
}

/// A language skill with DLPT-style listening/reading levels (0-5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    /// Language code, e.g. "AD" (Arabic) or "KP" (Korean).
    pub code: String,
    /// Listening proficiency level, 0-5.
    pub listening: i32,
    /// Reading proficiency level, 0-5.
    pub reading: i32,
    /// Native speakers satisfy any level requirement.
    pub native: bool,
}

impl LanguageSkill {
    /// Creates a language skill. Levels are clamped to 0-5.
    pub fn new(code: impl Into<String>, listening: i32, reading: i32) -> Self {
        Self {
            code: code.into(),
            listening: listening.clamp(0, 5),
            reading: reading.clamp(0, 5),
            native: false,
        }
    }

    /// Marks the speaker as native, chainable.
    pub fn native(mut self) -> Self {
        self.native = true;
        self
    }

    /// Proficiency requires both listening and reading at the minimum level.
    pub fn is_proficient(&self, min_level: i32) -> bool {
        self.native || (self.listening >= min_level && self.reading >= min_level)
    }
}

/// Per-soldier readiness state, as computed by the importing collaborator.
///
/// Gate currency and dwell are precomputed upstream from raw completion and
/// deployment dates; the core only compares them against a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
    /// Administratively deployable.
    pub deployable: bool,
    /// Medical readiness category, 1 (full) to 4 (non-deployable).
    pub med_category: i32,
    /// Dental readiness category, 1 to 4.
    pub dental_category: i32,
    /// Months since the last qualifying deployment or rotation.
    pub dwell_months: i32,
    /// Career deployment count.
    pub deployment_count: i32,
    /// Valid passport on file.
    pub has_passport: bool,
    /// Training gate name -> currently qualified. A gate absent from the
    /// map counts as not current.
    pub training: HashMap<String, bool>,
}

impl Default for ReadinessSnapshot {
    fn default() -> Self {
        Self {
            deployable: true,
            med_category: 1,
            dental_category: 1,
            dwell_months: 12,
            deployment_count: 0,
            has_passport: false,
            training: HashMap::new(),
        }
    }
}

impl ReadinessSnapshot {
    /// Records a training gate's currency, chainable.
    pub fn with_gate(mut self, gate: impl Into<String>, current: bool) -> Self {
        self.training.insert(gate.into(), current);
        self
    }

    /// Whether a named gate is currently satisfied.
    pub fn gate_current(&self, gate: &str) -> bool {
        self.training.get(gate).copied().unwrap_or(false)
    }
}

/// Detailed qualification record. Optional per soldier; layers treat an
/// absent profile as "no penalty, no bonus" for profile-backed categories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualificationProfile {
    /// Highest education attained.
    pub education: EducationLevel,
    /// Language skills.
    pub languages: Vec<LanguageSkill>,
    /// Badge, ASI, and SQI codes held (e.g. "RANGER", "AIRBORNE", "W3").
    pub badges: Vec<String>,
    /// License codes held.
    pub licenses: Vec<String>,
    /// Award codes held.
    pub awards: Vec<String>,
    /// Deployments with combat service credit.
    pub combat_deployments: i32,
    /// Total career deployments.
    pub total_deployments: i32,
    /// Highest leadership position level held (1 team, 2 squad, 3 platoon...).
    pub leadership_level: i32,
    /// Time in service, months.
    pub months_in_service: i32,
    /// Time in current grade, months.
    pub months_in_grade: i32,
}

impl QualificationProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets education, chainable.
    pub fn with_education(mut self, education: EducationLevel) -> Self {
        self.education = education;
        self
    }

    /// Adds a language skill, chainable.
    pub fn with_language(mut self, language: LanguageSkill) -> Self {
        self.languages.push(language);
        self
    }

    /// Adds a badge/ASI/SQI code, chainable.
    pub fn with_badge(mut self, code: impl Into<String>) -> Self {
        self.badges.push(code.into());
        self
    }

    /// Adds a license code, chainable.
    pub fn with_license(mut self, code: impl Into<String>) -> Self {
        self.licenses.push(code.into());
        self
    }

    /// Adds an award code, chainable.
    pub fn with_award(mut self, code: impl Into<String>) -> Self {
        self.awards.push(code.into());
        self
    }

    /// Sets deployment experience, chainable.
    pub fn with_deployments(mut self, combat: i32, total: i32) -> Self {
        self.combat_deployments = combat;
        self.total_deployments = total;
        self
    }

    /// Sets leadership level, chainable.
    pub fn with_leadership(mut self, level: i32) -> Self {
        self.leadership_level = level;
        self
    }

    /// Sets time in service and grade, chainable.
    pub fn with_service_months(mut self, in_service: i32, in_grade: i32) -> Self {
        self.months_in_service = in_service;
        self.months_in_grade = in_grade;
        self
    }

    pub fn has_badge(&self, code: &str) -> bool {
        self.badges.iter().any(|b| b == code)
    }

    pub fn has_license(&self, code: &str) -> bool {
        self.licenses.iter().any(|l| l == code)
    }

    pub fn has_award(&self, code: &str) -> bool {
        self.awards.iter().any(|a| a == code)
    }

    /// The soldier's skill in a language, if any.
    pub fn language(&self, code: &str) -> Option<&LanguageSkill> {
        self.languages.iter().find(|l| l.code == code)
    }
}

/// A soldier available for assignment.
///
/// `index` is the soldier's dense 0-based row position in the input table and
/// must equal its position in the slice handed to the engine; the alignment
/// check rejects anything else before matrix construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soldier {
    /// Row position in the soldier table.
    pub index: usize,
    /// Unique identifier.
    pub id: String,
    /// Military occupational specialty code, e.g. "11B".
    pub skill_code: String,
    /// Pay-grade ordinal (E-5 = 5).
    pub rank: i32,
    /// Home station reference, resolved by the travel-cost model.
    pub home_location: String,
    /// Parent unit reference.
    pub unit: String,
    /// Supervisor's soldier id; forms the leadership forest.
    pub supervisor: Option<String>,
    /// Security clearance held.
    pub clearance: Clearance,
    /// Fitness test score, when on record.
    pub fitness_score: Option<i32>,
    /// Readiness state.
    pub readiness: ReadinessSnapshot,
    /// Detailed qualifications, when on record.
    pub qualifications: Option<QualificationProfile>,
    /// Free-form attributes.
    pub attributes: HashMap<String, String>,
}

impl Soldier {
    /// Creates a soldier at a table position with the required identity fields.
    pub fn new(index: usize, id: impl Into<String>, skill_code: impl Into<String>, rank: i32) -> Self {
        Self {
            index,
            id: id.into(),
            skill_code: skill_code.into(),
            rank,
            home_location: String::new(),
            unit: String::new(),
            supervisor: None,
            clearance: Clearance::None,
            fitness_score: None,
            readiness: ReadinessSnapshot::default(),
            qualifications: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the home station, chainable.
    pub fn with_home(mut self, location: impl Into<String>) -> Self {
        self.home_location = location.into();
        self
    }

    /// Sets the parent unit, chainable.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the supervisor reference, chainable.
    pub fn with_supervisor(mut self, supervisor: impl Into<String>) -> Self {
        self.supervisor = Some(supervisor.into());
        self
    }

    /// Sets the clearance, chainable.
    pub fn with_clearance(mut self, clearance: Clearance) -> Self {
        self.clearance = clearance;
        self
    }

    /// Sets the fitness score, chainable.
    pub fn with_fitness(mut self, score: i32) -> Self {
        self.fitness_score = Some(score);
        self
    }

    /// Sets the readiness snapshot, chainable.
    pub fn with_readiness(mut self, readiness: ReadinessSnapshot) -> Self {
        self.readiness = readiness;
        self
    }

    /// Sets the qualification profile, chainable.
    pub fn with_qualifications(mut self, profile: QualificationProfile) -> Self {
        self.qualifications = Some(profile);
        self
    }

    /// Adds a free-form attribute, chainable.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
