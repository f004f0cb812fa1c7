//! Usage-based allocation weighting (the "free list").

/// Distributes allocation weight over rows, least-used first.
///
/// Rows are visited in ascending usage order (stable, so ties keep index
/// order). Each row receives `(1 - usage) * prod(usage of earlier rows)`, so
/// weight only spills past a row in proportion to how full it already is.
pub fn allocation_weighting(usage: &[f32], out: &mut [f32]) {
    debug_assert_eq!(usage.len(), out.len());

    let mut free_list: Vec<usize> = (0..usage.len()).collect();
    free_list.sort_by(|&a, &b| usage[a].total_cmp(&usage[b]));

    let mut running = 1.0f32;
    for row in free_list {
        out[row] = (1.0 - usage[row]) * running;
        running *= usage[row];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_free_row_takes_everything() {
        let mut out = [0.0; 3];
        allocation_weighting(&[0.0, 0.0, 1.0], &mut out);
        assert_eq!(out, [1.0, 0.0, 0.0]);

        allocation_weighting(&[1.0, 1.0, 0.0], &mut out);
        assert_eq!(out, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_spill_to_next_rank() {
        let mut out = [0.0; 2];
        allocation_weighting(&[0.5, 0.25], &mut out);
        // row 1 first: 0.75, then row 0: 0.5 * 0.25
        assert!((out[1] - 0.75).abs() < 1e-7);
        assert!((out[0] - 0.125).abs() < 1e-7);
    }

    #[test]
    fn test_saturated_usage_is_finite_zero() {
        let mut out = [9.0; 4];
        allocation_weighting(&[1.0; 4], &mut out);
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn test_monotone_under_permutation() {
        let base = [1.0 / 6.0, 2.0 / 6.0, 3.0 / 6.0, 4.0 / 6.0, 5.0 / 6.0];
        let order = [3usize, 0, 4, 2, 1];
        let permuted: Vec<f32> = order.iter().map(|&i| base[i]).collect();
        let mut out = vec![0.0; 5];
        allocation_weighting(&permuted, &mut out);

        // undo the permutation: base index i sits at position p where order[p] == i
        let mut by_usage = vec![0.0; 5];
        for (p, &i) in order.iter().enumerate() {
            by_usage[i] = out[p];
        }
        for i in 1..5 {
            assert!(by_usage[i] < by_usage[i - 1]);
        }
    }
}
