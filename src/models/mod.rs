//! Assignment domain models.
//!
//! Core data types for stating a constrained bipartite assignment problem
//! and its solution. The vocabulary is military manning, but the shapes
//! carry to any supply-versus-demand matching with layered preferences.
//!
//! # Domain Mappings
//!
//! | u-assign | Military manning | Staffing | Disaster response |
//! |----------|------------------|----------|-------------------|
//! | Soldier | Service member | Employee | Responder |
//! | Billet | Authorized position | Open role | Task slot |
//! | OrganicTeam | Squad/crew | Working group | Strike team |
//! | Assignment | Manning decision | Placement | Tasking |

mod assignment;
mod billet;
mod matrix;
mod policy;
mod soldier;
mod team;

pub use assignment::{Assignment, AssignmentPair};
pub use billet::{Billet, LanguageRequirement, QualificationRequirements};
pub use matrix::{is_infeasible_cost, CostMatrix, INFEASIBLE_COST};
pub use policy::{PolicyConfiguration, DEFAULT_WEIGHTS};
pub use soldier::{
    Clearance, EducationLevel, LanguageSkill, QualificationProfile, ReadinessSnapshot, Soldier,
};
pub use team::OrganicTeam;
