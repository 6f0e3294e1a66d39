//! Manpower assignment engine for the U-Engine ecosystem.
//!
//! Matches a soldier table against a billet table by composing an additive
//! cost matrix — a skill/rank base adjusted by readiness, cohesion,
//! geographic, and qualification layers — and solving it to a minimum-cost
//! one-to-one matching. A policy configuration weights every term, and the
//! exploration layer sweeps those weights into a Pareto frontier of
//! candidate manning solutions.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Soldier`, `Billet`, `OrganicTeam`,
//!   `PolicyConfiguration`, `CostMatrix`, `Assignment`
//! - **`validation`**: Input integrity checks (duplicate ids, index
//!   alignment, supervisor references and cycles)
//! - **`layers`**: The `CostLayer` trait and the built-in readiness,
//!   cohesion, geography, and qualification layers
//! - **`engine`**: Matrix construction, the Hungarian solver, and the run
//!   summary
//! - **`pareto`**: Policy sweeps and the non-dominated frontier
//!
//! # Architecture
//!
//! This crate sits at Layer 3 (Frameworks) in the U-Engine ecosystem. It
//! contains only assignment domain logic — personnel data import, readiness
//! date arithmetic, and order publication live with the calling
//! collaborators.
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Munkres (1957), "Algorithms for the Assignment and Transportation Problems"
//! - Burkard, Dell'Amico & Martello (2009), "Assignment Problems"

pub mod engine;
pub mod error;
pub mod layers;
pub mod models;
pub mod pareto;
pub mod validation;
