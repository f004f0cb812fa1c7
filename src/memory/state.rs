use super::config::MemoryConfig;
use super::error::{check_buffer, check_range, MemoryError};
use super::tensor::entropy;
use serde::{Deserialize, Serialize};

/// All persistent per-batch memory state, passed by value between steps.
///
/// Buffers are flat and batch-major:
/// - `memory`: `[B, N, W]`
/// - `usage`, `precedence`, `write_weights`, `allocation`: `[B, N]`
/// - `temporal_link`: `[B, N, N]`, zero diagonal
/// - `read_weights`: `[B, R, N]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMemoryState")]
pub struct MemoryState {
    config: MemoryConfig,
    pub(crate) memory: Vec<f32>,
    pub(crate) usage: Vec<f32>,
    pub(crate) temporal_link: Vec<f32>,
    pub(crate) precedence: Vec<f32>,
    pub(crate) read_weights: Vec<f32>,
    pub(crate) write_weights: Vec<f32>,
    pub(crate) allocation: Vec<f32>,
}

/// Unchecked wire form of [`MemoryState`]; converted through `TryFrom`.
#[derive(Deserialize)]
struct RawMemoryState {
    config: MemoryConfig,
    memory: Vec<f32>,
    usage: Vec<f32>,
    temporal_link: Vec<f32>,
    precedence: Vec<f32>,
    read_weights: Vec<f32>,
    write_weights: Vec<f32>,
    allocation: Vec<f32>,
}

impl TryFrom<RawMemoryState> for MemoryState {
    type Error = MemoryError;

    fn try_from(raw: RawMemoryState) -> Result<Self, Self::Error> {
        let template = MemoryState::new(raw.config)?;
        check_buffer("memory", &raw.memory, template.memory.len())?;
        check_buffer("usage", &raw.usage, template.usage.len())?;
        check_buffer("temporal_link", &raw.temporal_link, template.temporal_link.len())?;
        check_buffer("precedence", &raw.precedence, template.precedence.len())?;
        check_buffer("read_weights", &raw.read_weights, template.read_weights.len())?;
        check_buffer("write_weights", &raw.write_weights, template.write_weights.len())?;
        check_buffer("allocation", &raw.allocation, template.allocation.len())?;
        check_range("usage", &raw.usage, 0.0, 1.0)?;
        check_range("precedence", &raw.precedence, 0.0, 1.0)?;
        check_range("read_weights", &raw.read_weights, 0.0, 1.0)?;
        Ok(Self {
            config: raw.config,
            memory: raw.memory,
            usage: raw.usage,
            temporal_link: raw.temporal_link,
            precedence: raw.precedence,
            read_weights: raw.read_weights,
            write_weights: raw.write_weights,
            allocation: raw.allocation,
        })
    }
}

impl MemoryState {
    /// All-zero state for `config`.
    pub fn new(config: MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;
        let b = config.batch_size;
        let n = config.num_cells;
        Ok(Self {
            config,
            memory: vec![0.0; b * n * config.cell_size],
            usage: vec![0.0; b * n],
            temporal_link: vec![0.0; b * n * n],
            precedence: vec![0.0; b * n],
            read_weights: vec![0.0; b * config.read_heads * n],
            write_weights: vec![0.0; b * n],
            allocation: vec![0.0; b * n],
        })
    }

    /// Zeroes every buffer in place.
    pub fn reset(&mut self) {
        for buffer in [
            &mut self.memory,
            &mut self.usage,
            &mut self.temporal_link,
            &mut self.precedence,
            &mut self.read_weights,
            &mut self.write_weights,
            &mut self.allocation,
        ] {
            buffer.fill(0.0);
        }
    }

    /// Replaces the memory matrix (`[B, N, W]`).
    pub fn with_memory(mut self, memory: Vec<f32>) -> Result<Self, MemoryError> {
        check_buffer("memory", &memory, self.memory.len())?;
        self.memory = memory;
        Ok(self)
    }

    /// Replaces usage (`[B, N]`, each in `[0, 1]`).
    pub fn with_usage(mut self, usage: Vec<f32>) -> Result<Self, MemoryError> {
        check_buffer("usage", &usage, self.usage.len())?;
        check_range("usage", &usage, 0.0, 1.0)?;
        self.usage = usage;
        Ok(self)
    }

    /// Replaces precedence (`[B, N]`, each in `[0, 1]`).
    pub fn with_precedence(mut self, precedence: Vec<f32>) -> Result<Self, MemoryError> {
        check_buffer("precedence", &precedence, self.precedence.len())?;
        check_range("precedence", &precedence, 0.0, 1.0)?;
        self.precedence = precedence;
        Ok(self)
    }

    /// Replaces read weights (`[B, R, N]`, each in `[0, 1]`).
    pub fn with_read_weights(mut self, read_weights: Vec<f32>) -> Result<Self, MemoryError> {
        check_buffer("read_weights", &read_weights, self.read_weights.len())?;
        check_range("read_weights", &read_weights, 0.0, 1.0)?;
        self.read_weights = read_weights;
        Ok(self)
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn memory(&self) -> &[f32] {
        &self.memory
    }

    pub fn usage(&self) -> &[f32] {
        &self.usage
    }

    pub fn temporal_link(&self) -> &[f32] {
        &self.temporal_link
    }

    pub fn precedence(&self) -> &[f32] {
        &self.precedence
    }

    pub fn read_weights(&self) -> &[f32] {
        &self.read_weights
    }

    /// Write weighting produced by the most recent step.
    pub fn write_weights(&self) -> &[f32] {
        &self.write_weights
    }

    /// Allocation weighting computed during the most recent step.
    pub fn allocation(&self) -> &[f32] {
        &self.allocation
    }

    // Per-batch views

    pub fn batch_memory(&self, b: usize) -> &[f32] {
        let span = self.config.num_cells * self.config.cell_size;
        &self.memory[b * span..(b + 1) * span]
    }

    pub fn batch_usage(&self, b: usize) -> &[f32] {
        let n = self.config.num_cells;
        &self.usage[b * n..(b + 1) * n]
    }

    pub fn batch_temporal_link(&self, b: usize) -> &[f32] {
        let span = self.config.num_cells * self.config.num_cells;
        &self.temporal_link[b * span..(b + 1) * span]
    }

    pub fn batch_precedence(&self, b: usize) -> &[f32] {
        let n = self.config.num_cells;
        &self.precedence[b * n..(b + 1) * n]
    }

    pub fn batch_read_weights(&self, b: usize) -> &[f32] {
        let span = self.config.read_heads * self.config.num_cells;
        &self.read_weights[b * span..(b + 1) * span]
    }

    pub fn batch_write_weights(&self, b: usize) -> &[f32] {
        let n = self.config.num_cells;
        &self.write_weights[b * n..(b + 1) * n]
    }

    pub fn batch_allocation(&self, b: usize) -> &[f32] {
        let n = self.config.num_cells;
        &self.allocation[b * n..(b + 1) * n]
    }

    /// Returns statistics about the current memory state
    pub fn stats(&self) -> MemoryStats {
        let cells = self.usage.len();
        let heads = self.config.batch_size * self.config.read_heads;
        MemoryStats {
            batch_size: self.config.batch_size,
            mean_usage: self.usage.iter().sum::<f32>() / cells as f32,
            free_cells: self
                .usage
                .iter()
                .filter(|&&u| u < self.config.free_threshold)
                .count(),
            link_mass: self.temporal_link.iter().sum(),
            mean_read_entropy: self
                .read_weights
                .chunks_exact(self.config.num_cells)
                .map(entropy)
                .sum::<f32>()
                / heads as f32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStats {
    pub batch_size: usize,
    pub mean_usage: f32,
    /// Rows below the free threshold, summed over the batch
    pub free_cells: usize,
    pub link_mass: f32,
    pub mean_read_entropy: f32,
}

/// Words read by every head: `[B, R, W]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResult {
    pub(crate) read_heads: usize,
    pub(crate) cell_size: usize,
    pub(crate) data: Vec<f32>,
}

impl ReadResult {
    pub(crate) fn zeros(config: &MemoryConfig) -> Self {
        Self {
            read_heads: config.read_heads,
            cell_size: config.cell_size,
            data: vec![0.0; config.batch_size * config.read_heads * config.cell_size],
        }
    }

    /// `[R, W]` words for batch element `b`.
    pub fn batch(&self, b: usize) -> &[f32] {
        let span = self.read_heads * self.cell_size;
        &self.data[b * span..(b + 1) * span]
    }

    pub fn head(&self, b: usize, r: usize) -> &[f32] {
        let start = (b * self.read_heads + r) * self.cell_size;
        &self.data[start..start + self.cell_size]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
