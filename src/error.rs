//! Fatal error types for the assignment pipeline.
//!
//! Only two conditions abort a run: misaligned input tables and numeric
//! solver failure. Everything else degrades in place and is reported
//! through the run summary instead.

use thiserror::Error;

/// Errors that abort an assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// Input tables carry gapped, non-0-based, or duplicate row/column
    /// identities. Matrix coordinates are positional; proceeding would
    /// silently corrupt every downstream cost.
    #[error("index alignment: {0}")]
    IndexAlignment(String),

    /// The composed matrix contains non-finite entries, so the matching
    /// algorithm cannot run.
    #[error("solver failure: {0}")]
    Solver(String),
}
