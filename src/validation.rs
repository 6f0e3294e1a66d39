//! Input validation for assignment problems.
//!
//! Checks structural integrity of the soldier and billet tables before any
//! matrix work. Detects:
//! - Gapped or non-0-based table indices
//! - Duplicate IDs
//! - Unknown supervisor references
//! - Cycles in the supervisor forest
//! - Inverted rank bands and empty skill codes
//!
//! Two entry points: [`validate_tables`] collects every problem at once for
//! pre-flight reporting, while [`check_alignment`] enforces only the hard
//! positional invariants and is what the engine calls before building a
//! matrix.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (cycle
//! detection by DFS coloring)

use crate::error::AssignError;
use crate::models::{Billet, Soldier};
use std::collections::HashMap;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two soldiers share the same ID.
    DuplicateSoldierId,
    /// Two billets share the same ID.
    DuplicateBilletId,
    /// A soldier's index does not match its table position.
    MisalignedSoldierIndex,
    /// A billet's index does not match its table position.
    MisalignedBilletIndex,
    /// A supervisor reference points at no known soldier.
    UnknownSupervisor,
    /// The supervisor forest contains a cycle.
    CyclicSupervision,
    /// A billet's rank band has min above max.
    InvalidRankBand,
    /// A soldier or billet carries no skill code.
    EmptySkillCode,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the soldier and billet tables for an assignment problem.
///
/// Collects every error rather than stopping at the first, so a caller can
/// repair an imported data set in one pass.
pub fn validate_tables(soldiers: &[Soldier], billets: &[Billet]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut soldier_rows: HashMap<&str, usize> = HashMap::new();
    for (row, soldier) in soldiers.iter().enumerate() {
        if soldier.index != row {
            errors.push(ValidationError::new(
                ValidationErrorKind::MisalignedSoldierIndex,
                format!(
                    "soldier \"{}\" at row {} carries index {}; indices must be dense and 0-based",
                    soldier.id, row, soldier.index
                ),
            ));
        }
        if let Some(&first) = soldier_rows.get(soldier.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSoldierId,
                format!(
                    "duplicate soldier id \"{}\" at rows {} and {}",
                    soldier.id, first, row
                ),
            ));
        } else {
            soldier_rows.insert(&soldier.id, row);
        }
        if soldier.skill_code.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySkillCode,
                format!("soldier \"{}\" has an empty skill code", soldier.id),
            ));
        }
    }

    let mut billet_cols: HashMap<&str, usize> = HashMap::new();
    for (col, billet) in billets.iter().enumerate() {
        if billet.index != col {
            errors.push(ValidationError::new(
                ValidationErrorKind::MisalignedBilletIndex,
                format!(
                    "billet \"{}\" at column {} carries index {}; indices must be dense and 0-based",
                    billet.id, col, billet.index
                ),
            ));
        }
        if let Some(&first) = billet_cols.get(billet.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateBilletId,
                format!(
                    "duplicate billet id \"{}\" at columns {} and {}",
                    billet.id, first, col
                ),
            ));
        } else {
            billet_cols.insert(&billet.id, col);
        }
        if billet.skill_code.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySkillCode,
                format!("billet \"{}\" has an empty skill code", billet.id),
            ));
        }
        if billet.min_rank > billet.max_rank {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRankBand,
                format!(
                    "billet \"{}\" has rank band {}..{} (min above max)",
                    billet.id, billet.min_rank, billet.max_rank
                ),
            ));
        }
    }

    validate_supervisors(soldiers, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks supervisor references and walks the forest for cycles.
fn validate_supervisors(soldiers: &[Soldier], errors: &mut Vec<ValidationError>) {
    let known: HashMap<&str, &Soldier> = soldiers.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut parent: HashMap<&str, &str> = HashMap::new();

    for soldier in soldiers {
        if let Some(sup) = &soldier.supervisor {
            if known.contains_key(sup.as_str()) {
                parent.insert(&soldier.id, sup);
            } else {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSupervisor,
                    format!(
                        "soldier \"{}\" reports to unknown supervisor \"{}\"",
                        soldier.id, sup
                    ),
                ));
            }
        }
    }

    // DFS coloring over parent pointers: 1 = in progress, 2 = done.
    let mut state: HashMap<&str, u8> = HashMap::new();
    for soldier in soldiers {
        if state.get(soldier.id.as_str()).copied().unwrap_or(0) != 0 {
            continue;
        }
        let mut chain: Vec<&str> = Vec::new();
        let mut current = soldier.id.as_str();
        loop {
            match state.get(current).copied().unwrap_or(0) {
                1 => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::CyclicSupervision,
                        format!("supervision cycle through soldier \"{current}\""),
                    ));
                    break;
                }
                2 => break,
                _ => {
                    state.insert(current, 1);
                    chain.push(current);
                    match parent.get(current) {
                        Some(&next) => current = next,
                        None => break,
                    }
                }
            }
        }
        for id in chain {
            state.insert(id, 2);
        }
    }
}

/// Enforces the hard positional invariants the matrix build depends on:
/// dense 0-based indices and unique ids on both tables.
///
/// Returns the first offense as an [`AssignError::IndexAlignment`] with a
/// diagnostic naming the position, since proceeding would silently corrupt
/// every downstream cost.
pub fn check_alignment(soldiers: &[Soldier], billets: &[Billet]) -> Result<(), AssignError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (row, soldier) in soldiers.iter().enumerate() {
        if soldier.index != row {
            return Err(AssignError::IndexAlignment(format!(
                "soldier \"{}\" at row {} carries index {}; renumber the table to a dense 0-based sequence",
                soldier.id, row, soldier.index
            )));
        }
        if let Some(&first) = seen.get(soldier.id.as_str()) {
            return Err(AssignError::IndexAlignment(format!(
                "duplicate soldier id \"{}\" at rows {} and {}",
                soldier.id, first, row
            )));
        }
        seen.insert(&soldier.id, row);
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (col, billet) in billets.iter().enumerate() {
        if billet.index != col {
            return Err(AssignError::IndexAlignment(format!(
                "billet \"{}\" at column {} carries index {}; renumber the table to a dense 0-based sequence",
                billet.id, col, billet.index
            )));
        }
        if let Some(&first) = seen.get(billet.id.as_str()) {
            return Err(AssignError::IndexAlignment(format!(
                "duplicate billet id \"{}\" at columns {} and {}",
                billet.id, first, col
            )));
        }
        seen.insert(&billet.id, col);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_soldier(index: usize, id: &str) -> Soldier {
        Soldier::new(index, id, "11B", 5).with_unit("A-CO")
    }

    fn make_billet(index: usize, id: &str) -> Billet {
        Billet::new(index, id, "11B")
    }

    #[test]
    fn test_clean_tables_pass() {
        let soldiers = vec![make_soldier(0, "S-1"), make_soldier(1, "S-2")];
        let billets = vec![make_billet(0, "B-1")];
        assert!(validate_tables(&soldiers, &billets).is_ok());
        assert!(check_alignment(&soldiers, &billets).is_ok());
    }

    #[test]
    fn test_gapped_soldier_index_rejected() {
        // A filtered table handed over without renumbering.
        let soldiers = vec![make_soldier(0, "S-1"), make_soldier(3, "S-4")];
        let billets = vec![make_billet(0, "B-1")];

        let errors = validate_tables(&soldiers, &billets).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MisalignedSoldierIndex));

        let err = check_alignment(&soldiers, &billets).unwrap_err();
        assert!(matches!(err, AssignError::IndexAlignment(_)));
        assert!(err.to_string().contains("S-4"));
    }

    #[test]
    fn test_gapped_billet_index_rejected() {
        let soldiers = vec![make_soldier(0, "S-1")];
        let billets = vec![make_billet(1, "B-1")];
        let err = check_alignment(&soldiers, &billets).unwrap_err();
        assert!(err.to_string().contains("column 0"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let soldiers = vec![make_soldier(0, "S-1"), make_soldier(1, "S-1")];
        let billets = vec![make_billet(0, "B-1"), make_billet(1, "B-1")];

        let errors = validate_tables(&soldiers, &billets).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateSoldierId));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateBilletId));

        assert!(check_alignment(&soldiers, &billets).is_err());
    }

    #[test]
    fn test_unknown_supervisor_reported() {
        let soldiers = vec![
            make_soldier(0, "S-1").with_supervisor("S-99"),
            make_soldier(1, "S-2"),
        ];
        let errors = validate_tables(&soldiers, &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownSupervisor);
    }

    #[test]
    fn test_supervision_cycle_detected() {
        let soldiers = vec![
            make_soldier(0, "S-1").with_supervisor("S-2"),
            make_soldier(1, "S-2").with_supervisor("S-3"),
            make_soldier(2, "S-3").with_supervisor("S-1"),
        ];
        let errors = validate_tables(&soldiers, &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicSupervision));
    }

    #[test]
    fn test_deep_chain_without_cycle_passes() {
        let soldiers = vec![
            make_soldier(0, "S-1").with_supervisor("S-2"),
            make_soldier(1, "S-2").with_supervisor("S-3"),
            make_soldier(2, "S-3"),
        ];
        assert!(validate_tables(&soldiers, &[]).is_ok());
    }

    #[test]
    fn test_inverted_rank_band_reported() {
        let billets = vec![make_billet(0, "B-1").with_rank_band(7, 5)];
        let errors = validate_tables(&[], &billets).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidRankBand);
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut unskilled = make_soldier(2, "S-1");
        unskilled.skill_code.clear();
        let soldiers = vec![make_soldier(0, "S-1"), unskilled];
        let billets = vec![make_billet(0, "B-1").with_rank_band(9, 1)];

        let errors = validate_tables(&soldiers, &billets).unwrap_err();
        // duplicate id, misaligned index, empty skill code, inverted band
        assert!(errors.len() >= 4);
    }
}
