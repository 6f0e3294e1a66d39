//! Dense soldier x billet cost grid with identity side tables.
//!
//! Row and column positions are positional, never identity-based: the
//! position -> id side tables ride on the matrix for its whole life so a
//! filtered or reordered table can never be silently misread.

use serde::{Deserialize, Serialize};

/// Large-but-finite cost marking a categorically infeasible pair.
///
/// Finite so the solver can still rank sentinel entries and produce a
/// degenerate (but excludable) matching instead of failing; far above any
/// composable sum of real penalties.
pub const INFEASIBLE_COST: f64 = 1.0e7;

/// Whether a realized cost marks its pair infeasible. Layer bonuses may drag
/// a sentinel entry down a little, so the cut sits at half the sentinel.
pub fn is_infeasible_cost(cost: f64) -> bool {
    cost >= INFEASIBLE_COST * 0.5
}

/// Dense 2-D cost grid, rows = soldiers, columns = billets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostMatrix {
    costs: Vec<Vec<f64>>,
    /// Row position -> soldier id.
    pub soldier_ids: Vec<String>,
    /// Column position -> billet id.
    pub billet_ids: Vec<String>,
}

impl CostMatrix {
    /// Creates a zero-filled matrix shaped by the two id tables.
    pub fn new(soldier_ids: Vec<String>, billet_ids: Vec<String>) -> Self {
        let cols = billet_ids.len();
        let costs = vec![vec![0.0; cols]; soldier_ids.len()];
        Self {
            costs,
            soldier_ids,
            billet_ids,
        }
    }

    pub fn rows(&self) -> usize {
        self.soldier_ids.len()
    }

    pub fn cols(&self) -> usize {
        self.billet_ids.len()
    }

    /// True when either side of the problem is empty.
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.costs[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cost: f64) {
        self.costs[row][col] = cost;
    }

    /// Adds a delta to one entry; the layers compose additively.
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, delta: f64) {
        self.costs[row][col] += delta;
    }

    /// Adds a delta to every entry of a row.
    pub fn add_row(&mut self, row: usize, delta: f64) {
        for cost in &mut self.costs[row] {
            *cost += delta;
        }
    }

    pub fn soldier_id(&self, row: usize) -> &str {
        &self.soldier_ids[row]
    }

    pub fn billet_id(&self, col: usize) -> &str {
        &self.billet_ids[col]
    }

    /// Raw row slices for the solver.
    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.costs
    }

    /// The first non-finite entry, if any.
    pub fn first_non_finite(&self) -> Option<(usize, usize, f64)> {
        for (r, row) in self.costs.iter().enumerate() {
            for (c, &cost) in row.iter().enumerate() {
                if !cost.is_finite() {
                    return Some((r, c, cost));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> CostMatrix {
        CostMatrix::new(
            vec!["S-1".to_string(), "S-2".to_string()],
            vec!["B-1".to_string(), "B-2".to_string(), "B-3".to_string()],
        )
    }

    #[test]
    fn test_shape_and_side_tables() {
        let matrix = sample_matrix();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.soldier_id(1), "S-2");
        assert_eq!(matrix.billet_id(2), "B-3");
        assert!(matrix.get(0, 0).abs() < 1e-10);
    }

    #[test]
    fn test_additive_updates() {
        let mut matrix = sample_matrix();
        matrix.set(0, 1, 100.0);
        matrix.add(0, 1, -30.0);
        matrix.add_row(0, 5.0);
        assert!((matrix.get(0, 1) - 75.0).abs() < 1e-10);
        assert!((matrix.get(0, 0) - 5.0).abs() < 1e-10);
        assert!((matrix.get(1, 0)).abs() < 1e-10);
    }

    #[test]
    fn test_empty_shapes() {
        let no_rows = CostMatrix::new(Vec::new(), vec!["B-1".to_string()]);
        assert!(no_rows.is_empty());
        assert_eq!(no_rows.rows(), 0);
        assert_eq!(no_rows.cols(), 1);

        let no_cols = CostMatrix::new(vec!["S-1".to_string()], Vec::new());
        assert!(no_cols.is_empty());
        assert_eq!(no_cols.rows(), 1);
        assert_eq!(no_cols.cols(), 0);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut matrix = sample_matrix();
        assert!(matrix.first_non_finite().is_none());
        matrix.set(1, 2, f64::NAN);
        let (r, c, _) = matrix.first_non_finite().unwrap();
        assert_eq!((r, c), (1, 2));
    }

    #[test]
    fn test_infeasible_threshold() {
        assert!(is_infeasible_cost(INFEASIBLE_COST));
        assert!(is_infeasible_cost(INFEASIBLE_COST - 50_000.0));
        assert!(!is_infeasible_cost(250_000.0));
    }
}
