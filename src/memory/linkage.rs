//! Temporal link matrix and precedence bookkeeping.

/// Updates `link` (`[N, N]`) after a write, using the precedence from before it.
///
/// `link[i][j]` records how strongly row `i` was written right after row `j`.
/// The diagonal is forced to zero.
pub fn update_temporal_link(link: &mut [f32], write_weights: &[f32], precedence: &[f32]) {
    let n = write_weights.len();
    debug_assert_eq!(link.len(), n * n);
    debug_assert_eq!(precedence.len(), n);

    for (i, row) in link.chunks_exact_mut(n).enumerate() {
        let w_i = write_weights[i];
        for (j, l) in row.iter_mut().enumerate() {
            *l = if i == j {
                0.0
            } else {
                (1.0 - w_i - write_weights[j]) * *l + w_i * precedence[j]
            };
        }
    }
}

/// Decays precedence by the write mass of this batch element, then adds the write.
pub fn update_precedence(precedence: &mut [f32], write_weights: &[f32]) {
    debug_assert_eq!(precedence.len(), write_weights.len());

    let write_mass: f32 = write_weights.iter().sum();
    for (p, &w) in precedence.iter_mut().zip(write_weights) {
        *p = (1.0 - write_mass) * *p + w;
    }
}
