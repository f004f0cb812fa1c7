//! Content-based addressing.
//!
//! Each key is compared against every memory row by cosine similarity,
//! sharpened by its strength and normalised with a softmax over rows.

use super::tensor::{dot_f64, norm_f64, softmax_in_place};

/// Computes one distribution over `num_cells` rows per key.
///
/// `memory` is `[num_cells, cell_size]`, `keys` is `[K, cell_size]`,
/// `strengths` has `K` entries and `out` is `[K, num_cells]`. An all-zero
/// row or key has similarity 0. Norms and dot products are taken in f64 so
/// any finite input keeps a finite similarity.
pub fn content_addressing(
    memory: &[f32],
    keys: &[f32],
    strengths: &[f32],
    num_cells: usize,
    cell_size: usize,
    epsilon: f32,
    out: &mut [f32],
) {
    let num_keys = strengths.len();
    debug_assert_eq!(memory.len(), num_cells * cell_size);
    debug_assert_eq!(keys.len(), num_keys * cell_size);
    debug_assert_eq!(out.len(), num_keys * num_cells);

    let row_norms: Vec<f64> = memory.chunks_exact(cell_size).map(norm_f64).collect();

    for ((key, &strength), scores) in keys
        .chunks_exact(cell_size)
        .zip(strengths)
        .zip(out.chunks_exact_mut(num_cells))
    {
        let key_norm = norm_f64(key);
        for ((score, row), &row_norm) in scores
            .iter_mut()
            .zip(memory.chunks_exact(cell_size))
            .zip(&row_norms)
        {
            let similarity = dot_f64(key, row) / (key_norm * row_norm + epsilon as f64);
            *score = similarity as f32 * strength;
        }
        softmax_in_place(scores);
    }
}
