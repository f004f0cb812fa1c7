//! Usage tracking: writes fill rows, free gates release rows that were read.

/// Retention per row: `prod_r (1 - free_gate[r] * read_weights[r][n])`.
///
/// `read_weights` must be the weights from the previous step.
pub fn retention(free_gates: &[f32], read_weights: &[f32], num_cells: usize, out: &mut [f32]) {
    debug_assert_eq!(read_weights.len(), free_gates.len() * num_cells);
    debug_assert_eq!(out.len(), num_cells);

    out.fill(1.0);
    for (&gate, head) in free_gates.iter().zip(read_weights.chunks_exact(num_cells)) {
        for (psi, &w) in out.iter_mut().zip(head) {
            *psi *= 1.0 - gate * w;
        }
    }
}

/// Soft-union the write into usage, then scale by retention.
pub fn update_usage(usage: &mut [f32], write_weights: &[f32], retention: &[f32]) {
    debug_assert_eq!(usage.len(), write_weights.len());
    debug_assert_eq!(usage.len(), retention.len());

    for ((u, &w), &psi) in usage.iter_mut().zip(write_weights).zip(retention) {
        *u = (*u + w - *u * w) * psi;
    }
}
