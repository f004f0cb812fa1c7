use super::error::MemoryError;
use serde::{Deserialize, Serialize};

/// Configuration for the DNC memory bank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Independent sequences processed per step
    pub batch_size: usize,
    /// Number of memory rows (N)
    pub num_cells: usize,
    /// Width of each memory row (W)
    pub cell_size: usize,
    /// Number of read heads (R)
    pub read_heads: usize,
    /// Guard added to norm products in cosine similarity
    pub epsilon: f32,
    /// Usage below this counts a row as free in stats
    pub free_threshold: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            num_cells: 16,
            cell_size: 16,
            read_heads: 1,
            epsilon: 1e-6,
            free_threshold: 0.01,
        }
    }
}

impl MemoryConfig {
    pub fn new(batch_size: usize, num_cells: usize, cell_size: usize, read_heads: usize) -> Self {
        Self {
            batch_size,
            num_cells,
            cell_size,
            read_heads,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), MemoryError> {
        let dims = [
            ("batch_size", self.batch_size),
            ("num_cells", self.num_cells),
            ("cell_size", self.cell_size),
            ("read_heads", self.read_heads),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(MemoryError::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(MemoryError::InvalidConfig(format!(
                "epsilon must be positive and finite, got {}",
                self.epsilon
            )));
        }
        if !(0.0..=1.0).contains(&self.free_threshold) {
            return Err(MemoryError::InvalidConfig(format!(
                "free_threshold must lie in [0, 1], got {}",
                self.free_threshold
            )));
        }
        Ok(())
    }

    /// Width of the raw controller emission: `W*R + 3*W + 5*R + 3`.
    ///
    /// Read keys (R*W), write key, erase and write vectors (3*W), read
    /// strengths, free gates and the three read modes per head (5*R), plus
    /// write strength, allocation gate and write gate.
    pub fn interface_size(&self) -> usize {
        self.cell_size * self.read_heads + 3 * self.cell_size + 5 * self.read_heads + 3
    }

    /// Returns true when both configs describe the same tensor shapes.
    pub(crate) fn same_shape(&self, other: &MemoryConfig) -> bool {
        self.batch_size == other.batch_size
            && self.num_cells == other.num_cells
            && self.cell_size == other.cell_size
            && self.read_heads == other.read_heads
    }
}
