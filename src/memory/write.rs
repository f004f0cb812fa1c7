//! Write weighting and the erase-then-add memory update.

/// Blends allocation and content addressing, then gates the result.
///
/// `allocation_gate = 1` selects pure allocation, `0` pure content;
/// `write_gate = 0` suppresses the write entirely.
pub fn write_weighting(
    allocation: &[f32],
    content: &[f32],
    allocation_gate: f32,
    write_gate: f32,
    out: &mut [f32],
) {
    debug_assert_eq!(allocation.len(), content.len());
    debug_assert_eq!(allocation.len(), out.len());

    for ((w, &a), &c) in out.iter_mut().zip(allocation).zip(content) {
        *w = (allocation_gate * (a - c) + c) * write_gate;
    }
}

/// Erases then adds into `memory` (`[N, cell_size]`) along the write weighting.
pub fn erase_and_add(
    memory: &mut [f32],
    write_weights: &[f32],
    erase: &[f32],
    write: &[f32],
    cell_size: usize,
) {
    debug_assert_eq!(memory.len(), write_weights.len() * cell_size);
    debug_assert_eq!(erase.len(), cell_size);
    debug_assert_eq!(write.len(), cell_size);

    for (row, &w) in memory.chunks_exact_mut(cell_size).zip(write_weights) {
        for ((m, &e), &v) in row.iter_mut().zip(erase).zip(write) {
            *m = *m * (1.0 - w * e) + w * v;
        }
    }
}
