//! Minimum-cost assignment via the Hungarian (Kuhn-Munkres) algorithm.
//!
//! # Reference
//!
//! - Kuhn, H. W. (1955). "The Hungarian method for the assignment problem".
//!   Naval Research Logistics Quarterly 2, 83-97.
//! - Munkres, J. (1957). "Algorithms for the assignment and transportation
//!   problems". Journal of the SIAM 5(1), 32-38.

use crate::error::AssignError;
use crate::models::CostMatrix;
use std::collections::VecDeque;

/// A solved matching over matrix positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    /// Matched (row, col) pairs in row order.
    pub pairs: Vec<(usize, usize)>,
    /// Rows left unmatched (soldiers without a billet).
    pub unmatched_rows: Vec<usize>,
    /// Columns left unmatched (billets without a soldier).
    pub unmatched_cols: Vec<usize>,
}

/// Solves the matrix to a minimum-total-cost one-to-one matching that
/// matches as many pairs as the shapes allow.
///
/// Rectangular inputs are padded to square with a uniform dummy cost, so
/// padding never changes which real pairs win; the dummy matches are then
/// reported as unmatched rows or columns. Infeasible-sentinel entries are
/// ordinary large costs here and may appear in the result. A non-finite
/// entry fails the run before the algorithm starts.
pub fn solve(matrix: &CostMatrix) -> Result<Matching, AssignError> {
    if let Some((row, col, value)) = matrix.first_non_finite() {
        return Err(AssignError::Solver(format!(
            "non-finite cost {value} at row {row}, col {col}"
        )));
    }

    let n_rows = matrix.rows();
    let n_cols = matrix.cols();
    if n_rows == 0 || n_cols == 0 {
        return Ok(Matching {
            pairs: Vec::new(),
            unmatched_rows: (0..n_rows).collect(),
            unmatched_cols: (0..n_cols).collect(),
        });
    }

    let row_match = hungarian(matrix.as_rows());

    let mut pairs = Vec::new();
    let mut matched_cols = vec![false; n_cols];
    for (row, &col) in row_match.iter().enumerate() {
        if let Some(col) = col {
            if col < n_cols {
                pairs.push((row, col));
                matched_cols[col] = true;
            }
        }
    }
    let matched_rows: Vec<bool> = {
        let mut flags = vec![false; n_rows];
        for &(row, _) in &pairs {
            flags[row] = true;
        }
        flags
    };

    Ok(Matching {
        pairs,
        unmatched_rows: (0..n_rows).filter(|&i| !matched_rows[i]).collect(),
        unmatched_cols: (0..n_cols).filter(|&j| !matched_cols[j]).collect(),
    })
}

/// Core Kuhn-Munkres on a dense matrix; `result[i] = Some(j)` assigns row i
/// to column j. Columns beyond the caller's real width are padding.
fn hungarian(input: &[Vec<f64>]) -> Vec<Option<usize>> {
    let n_rows = input.len();
    let n_cols = input.first().map_or(0, Vec::len);

    // Pad to square; the dummy cost is uniform so it cannot bias real pairs.
    let n = n_rows.max(n_cols);
    let mut cost = vec![vec![0.0; n]; n];
    for (i, row) in input.iter().enumerate() {
        cost[i][..n_cols].copy_from_slice(row);
    }

    // Reduce rows, then columns; every row and column gains a zero and the
    // reduced matrix is non-negative even when the input carries bonuses.
    for row in cost.iter_mut() {
        let row_min = row.iter().copied().fold(f64::INFINITY, f64::min);
        if row_min.is_finite() {
            for value in row.iter_mut() {
                *value -= row_min;
            }
        }
    }
    for j in 0..n {
        let col_min = (0..n).map(|i| cost[i][j]).fold(f64::INFINITY, f64::min);
        if col_min.is_finite() && col_min > 0.0 {
            for row in cost.iter_mut() {
                row[j] -= col_min;
            }
        }
    }

    let mut row_match: Vec<Option<usize>> = vec![None; n];
    let mut col_match: Vec<Option<usize>> = vec![None; n];

    // Greedy seed on independent zeros.
    for i in 0..n {
        for j in 0..n {
            if cost[i][j].abs() < 1e-10 && row_match[i].is_none() && col_match[j].is_none() {
                row_match[i] = Some(j);
                col_match[j] = Some(i);
            }
        }
    }

    loop {
        let unmatched_rows: Vec<usize> = (0..n).filter(|&i| row_match[i].is_none()).collect();
        if unmatched_rows.is_empty() {
            break;
        }

        // Breadth-first search for an augmenting path over zero edges.
        let mut found_augmenting = false;
        for &start_row in &unmatched_rows {
            let mut parent_col: Vec<Option<usize>> = vec![None; n];
            let mut visited_col = vec![false; n];
            let mut queue: VecDeque<usize> = VecDeque::from(vec![start_row]);
            let mut found_col: Option<usize> = None;

            'bfs: while let Some(row) = queue.pop_front() {
                for col in 0..n {
                    if !visited_col[col] && cost[row][col].abs() < 1e-10 {
                        visited_col[col] = true;
                        parent_col[col] = Some(row);

                        match col_match[col] {
                            None => {
                                found_col = Some(col);
                                break 'bfs;
                            }
                            Some(next_row) => queue.push_back(next_row),
                        }
                    }
                }
            }

            if let Some(mut col) = found_col {
                // Flip matched/unmatched edges back along the path.
                while let Some(row) = parent_col[col] {
                    let prev_col = row_match[row];
                    row_match[row] = Some(col);
                    col_match[col] = Some(row);
                    match prev_col {
                        Some(previous) => col = previous,
                        None => break,
                    }
                }
                found_augmenting = true;
                break;
            }
        }

        if !found_augmenting {
            // Cover rows reachable from unmatched rows through alternating
            // paths, then shift the minimum uncovered value to open new zeros.
            let mut row_covered = vec![false; n];
            let mut col_covered = vec![false; n];
            let mut stack: Vec<usize> = unmatched_rows.clone();
            while let Some(row) = stack.pop() {
                if row_covered[row] {
                    continue;
                }
                row_covered[row] = true;
                for col in 0..n {
                    if cost[row][col].abs() < 1e-10 && !col_covered[col] {
                        col_covered[col] = true;
                        if let Some(matched_row) = col_match[col] {
                            stack.push(matched_row);
                        }
                    }
                }
            }

            let mut min_val = f64::INFINITY;
            for i in 0..n {
                if row_covered[i] {
                    for j in 0..n {
                        if !col_covered[j] {
                            min_val = min_val.min(cost[i][j]);
                        }
                    }
                }
            }
            if !min_val.is_finite() || min_val <= 0.0 {
                break; // no further progress possible
            }

            for i in 0..n {
                for j in 0..n {
                    if row_covered[i] && !col_covered[j] {
                        cost[i][j] -= min_val;
                    } else if !row_covered[i] && col_covered[j] {
                        cost[i][j] += min_val;
                    }
                }
            }
        }
    }

    row_match.truncate(n_rows);
    row_match
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::INFEASIBLE_COST;

    fn make_matrix(costs: &[&[f64]]) -> CostMatrix {
        let soldier_ids = (0..costs.len()).map(|i| format!("S-{i}")).collect();
        let billet_ids = (0..costs.first().map_or(0, |r| r.len()))
            .map(|j| format!("B-{j}"))
            .collect();
        let mut matrix = CostMatrix::new(soldier_ids, billet_ids);
        for (i, row) in costs.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                matrix.set(i, j, value);
            }
        }
        matrix
    }

    fn total_cost(matrix: &CostMatrix, matching: &Matching) -> f64 {
        matching
            .pairs
            .iter()
            .map(|&(row, col)| matrix.get(row, col))
            .sum()
    }

    #[test]
    fn test_square_matrix_finds_the_optimum() {
        let matrix = make_matrix(&[
            &[4.0, 1.0, 3.0],
            &[2.0, 0.0, 5.0],
            &[3.0, 2.0, 2.0],
        ]);
        let matching = solve(&matrix).unwrap();

        assert_eq!(matching.pairs.len(), 3);
        assert!(matching.unmatched_rows.is_empty());
        assert!(matching.unmatched_cols.is_empty());
        // (0,1)=1 + (1,0)=2 + (2,2)=2
        assert!((total_cost(&matrix, &matching) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_more_rows_than_columns() {
        let matrix = make_matrix(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let matching = solve(&matrix).unwrap();

        assert_eq!(matching.pairs.len(), 2);
        assert_eq!(matching.unmatched_rows.len(), 1);
        assert!(matching.unmatched_cols.is_empty());
    }

    #[test]
    fn test_more_columns_than_rows() {
        let matrix = make_matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let matching = solve(&matrix).unwrap();

        assert_eq!(matching.pairs.len(), 2);
        assert!(matching.unmatched_rows.is_empty());
        assert_eq!(matching.unmatched_cols.len(), 1);
    }

    #[test]
    fn test_empty_shapes_match_nothing() {
        let no_rows = CostMatrix::new(Vec::new(), vec!["B-0".to_string()]);
        let matching = solve(&no_rows).unwrap();
        assert!(matching.pairs.is_empty());
        assert_eq!(matching.unmatched_cols, vec![0]);

        let no_cols = CostMatrix::new(vec!["S-0".to_string(), "S-1".to_string()], Vec::new());
        let matching = solve(&no_cols).unwrap();
        assert!(matching.pairs.is_empty());
        assert_eq!(matching.unmatched_rows, vec![0, 1]);
    }

    #[test]
    fn test_all_zero_costs_still_match_everyone() {
        let matrix = make_matrix(&[&[0.0, 0.0], &[0.0, 0.0]]);
        let matching = solve(&matrix).unwrap();

        assert_eq!(matching.pairs.len(), 2);
        assert!(total_cost(&matrix, &matching).abs() < 1e-10);
    }

    #[test]
    fn test_negative_costs_favor_the_deepest_bonus() {
        let matrix = make_matrix(&[&[-200.0, 0.0], &[-199.0, 0.0]]);
        let matching = solve(&matrix).unwrap();

        // Row 0 takes the deeper bonus, row 1 the neutral column.
        assert_eq!(matching.pairs.len(), 2);
        assert!((total_cost(&matrix, &matching) - -200.0).abs() < 1e-10);
        assert!(matching.pairs.contains(&(0, 0)));
        assert!(matching.pairs.contains(&(1, 1)));
    }

    #[test]
    fn test_greedy_trap_is_escaped() {
        // A row-greedy scan would take (0,0)=1 then pay 4+9; the optimum
        // fully crosses over: (0,2)=3, (1,1)=4, (2,0)=3.
        let matrix = make_matrix(&[
            &[1.0, 2.0, 3.0],
            &[2.0, 4.0, 6.0],
            &[3.0, 6.0, 9.0],
        ]);
        let matching = solve(&matrix).unwrap();

        assert_eq!(matching.pairs.len(), 3);
        assert!((total_cost(&matrix, &matching) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_sentinel_entries_stay_matchable() {
        let matrix = make_matrix(&[
            &[INFEASIBLE_COST, INFEASIBLE_COST],
            &[INFEASIBLE_COST, INFEASIBLE_COST + 5.0],
        ]);
        let matching = solve(&matrix).unwrap();

        // Everyone still gets a seat, and cost order holds among sentinels.
        assert_eq!(matching.pairs.len(), 2);
        assert!((total_cost(&matrix, &matching) - (2.0 * INFEASIBLE_COST)).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_entry_fails_before_solving() {
        let matrix = make_matrix(&[&[1.0, f64::NAN], &[2.0, 3.0]]);
        let result = solve(&matrix);

        assert!(matches!(result, Err(AssignError::Solver(_))));
    }

    #[test]
    fn test_single_cell() {
        let matrix = make_matrix(&[&[3.0]]);
        let matching = solve(&matrix).unwrap();
        assert_eq!(matching.pairs, vec![(0, 0)]);
    }
}
