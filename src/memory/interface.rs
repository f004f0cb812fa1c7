//! Structured, validated view over the controller's per-step emissions.

use super::config::MemoryConfig;
use super::error::{check_buffer, check_range, MemoryError};
use super::read::READ_MODES;
use serde::{Deserialize, Serialize};

/// Slack on each head's mode sum for rounding in the upstream softmax.
const MODE_SUM_TOLERANCE: f32 = 1e-4;

/// Raw batched interface fields, flat and batch-major.
///
/// Shapes per batch element: `write_key`, `erase_vector` and `write_vector`
/// are `[W]`; `read_keys` is `[R, W]`; `read_modes` is `[R, 3]` ordered
/// forward, backward, content; the gates and strengths are scalars or `[R]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceFields {
    pub write_key: Vec<f32>,
    pub write_strength: Vec<f32>,
    pub allocation_gate: Vec<f32>,
    pub write_gate: Vec<f32>,
    pub erase_vector: Vec<f32>,
    pub write_vector: Vec<f32>,
    pub read_keys: Vec<f32>,
    pub read_strengths: Vec<f32>,
    pub read_modes: Vec<f32>,
    pub free_gates: Vec<f32>,
}

impl InterfaceFields {
    /// All-zero fields sized for `config`.
    pub fn zeros(config: &MemoryConfig) -> Self {
        let b = config.batch_size;
        let w = config.cell_size;
        let r = config.read_heads;
        Self {
            write_key: vec![0.0; b * w],
            write_strength: vec![0.0; b],
            allocation_gate: vec![0.0; b],
            write_gate: vec![0.0; b],
            erase_vector: vec![0.0; b * w],
            write_vector: vec![0.0; b * w],
            read_keys: vec![0.0; b * r * w],
            read_strengths: vec![0.0; b * r],
            read_modes: vec![0.0; b * r * READ_MODES],
            free_gates: vec![0.0; b * r],
        }
    }
}

/// Immutable interface for one timestep. Construct with [`Interface::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    config: MemoryConfig,
    fields: InterfaceFields,
}

impl Interface {
    /// Validates shapes and ranges of every field against `config`.
    pub fn new(config: &MemoryConfig, fields: InterfaceFields) -> Result<Self, MemoryError> {
        config.validate()?;
        let b = config.batch_size;
        let w = config.cell_size;
        let r = config.read_heads;

        check_buffer("write_key", &fields.write_key, b * w)?;
        check_buffer("write_strength", &fields.write_strength, b)?;
        check_range("write_strength", &fields.write_strength, 0.0, f32::MAX)?;
        check_buffer("allocation_gate", &fields.allocation_gate, b)?;
        check_range("allocation_gate", &fields.allocation_gate, 0.0, 1.0)?;
        check_buffer("write_gate", &fields.write_gate, b)?;
        check_range("write_gate", &fields.write_gate, 0.0, 1.0)?;
        check_buffer("erase_vector", &fields.erase_vector, b * w)?;
        check_range("erase_vector", &fields.erase_vector, 0.0, 1.0)?;
        check_buffer("write_vector", &fields.write_vector, b * w)?;
        check_buffer("read_keys", &fields.read_keys, b * r * w)?;
        check_buffer("read_strengths", &fields.read_strengths, b * r)?;
        check_range("read_strengths", &fields.read_strengths, 0.0, f32::MAX)?;
        check_buffer("read_modes", &fields.read_modes, b * r * READ_MODES)?;
        check_range("read_modes", &fields.read_modes, 0.0, f32::MAX)?;
        check_mode_sums(&fields.read_modes)?;
        check_buffer("free_gates", &fields.free_gates, b * r)?;
        check_range("free_gates", &fields.free_gates, 0.0, 1.0)?;

        Ok(Self {
            config: *config,
            fields,
        })
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn fields(&self) -> &InterfaceFields {
        &self.fields
    }

    pub fn into_fields(self) -> InterfaceFields {
        self.fields
    }

    fn word<'a>(&self, values: &'a [f32], b: usize) -> &'a [f32] {
        let w = self.config.cell_size;
        &values[b * w..(b + 1) * w]
    }

    fn per_head<'a>(&self, values: &'a [f32], b: usize, width: usize) -> &'a [f32] {
        let span = self.config.read_heads * width;
        &values[b * span..(b + 1) * span]
    }

    // Per-batch accessors

    pub fn write_key(&self, b: usize) -> &[f32] {
        self.word(&self.fields.write_key, b)
    }

    pub fn write_strength(&self, b: usize) -> f32 {
        self.fields.write_strength[b]
    }

    pub fn allocation_gate(&self, b: usize) -> f32 {
        self.fields.allocation_gate[b]
    }

    pub fn write_gate(&self, b: usize) -> f32 {
        self.fields.write_gate[b]
    }

    pub fn erase_vector(&self, b: usize) -> &[f32] {
        self.word(&self.fields.erase_vector, b)
    }

    pub fn write_vector(&self, b: usize) -> &[f32] {
        self.word(&self.fields.write_vector, b)
    }

    /// `[R, W]` read keys for batch element `b`.
    pub fn read_keys(&self, b: usize) -> &[f32] {
        self.per_head(&self.fields.read_keys, b, self.config.cell_size)
    }

    pub fn read_strengths(&self, b: usize) -> &[f32] {
        self.per_head(&self.fields.read_strengths, b, 1)
    }

    /// `[R, 3]` read modes (forward, backward, content) for batch element `b`.
    pub fn read_modes(&self, b: usize) -> &[f32] {
        self.per_head(&self.fields.read_modes, b, READ_MODES)
    }

    pub fn free_gates(&self, b: usize) -> &[f32] {
        self.per_head(&self.fields.free_gates, b, 1)
    }
}

/// Each head's three modes must sum to at most 1 so its read weights stay in `[0, 1]`.
fn check_mode_sums(modes: &[f32]) -> Result<(), MemoryError> {
    let over = modes
        .chunks_exact(READ_MODES)
        .map(|head| head.iter().sum::<f32>())
        .enumerate()
        .find(|&(_, sum)| sum > 1.0 + MODE_SUM_TOLERANCE);
    match over {
        Some((index, value)) => Err(MemoryError::OutOfRange {
            field: "read_modes (per-head sum)",
            index,
            value,
            min: 0.0,
            max: 1.0,
        }),
        None => Ok(()),
    }
}
