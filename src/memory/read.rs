//! Read weighting (temporal forward/backward + content) and the weighted read.

use super::tensor::{vecmat, vecmat_transposed};

/// Number of read modes per head: forward, backward, content.
pub const READ_MODES: usize = 3;

/// Follows the link matrix from the previous read weights.
///
/// `forward = prev · linkᵗ` moves each head to rows written after the ones it
/// read; `backward = prev · link` moves it to rows written before.
pub fn temporal_read_weights(
    prev_read_weights: &[f32],
    link: &[f32],
    read_heads: usize,
    num_cells: usize,
    forward: &mut [f32],
    backward: &mut [f32],
) {
    vecmat_transposed(prev_read_weights, link, forward, read_heads, num_cells);
    vecmat(prev_read_weights, link, backward, read_heads, num_cells, num_cells);
}

/// Linear blend of the three addressing modes per head. Modes are not renormalised.
pub fn blend_read_weights(
    forward: &[f32],
    backward: &[f32],
    content: &[f32],
    modes: &[f32],
    out: &mut [f32],
) {
    let num_cells = out.len() / (modes.len() / READ_MODES);
    debug_assert_eq!(forward.len(), out.len());
    debug_assert_eq!(backward.len(), out.len());
    debug_assert_eq!(content.len(), out.len());

    for (h, (weights, mode)) in out
        .chunks_exact_mut(num_cells)
        .zip(modes.chunks_exact(READ_MODES))
        .enumerate()
    {
        let base = h * num_cells;
        for (n, w) in weights.iter_mut().enumerate() {
            *w = forward[base + n] * mode[0]
                + backward[base + n] * mode[1]
                + content[base + n] * mode[2];
        }
    }
}

/// `out[h] = read_weights[h] · memory`, one word per head.
pub fn read_memory(
    read_weights: &[f32],
    memory: &[f32],
    read_heads: usize,
    cell_size: usize,
    out: &mut [f32],
) {
    let num_cells = memory.len() / cell_size;
    vecmat(read_weights, memory, out, read_heads, num_cells, cell_size);
}
