use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    #[error("Invalid memory configuration: {0}")]
    InvalidConfig(String),
    #[error("Shape mismatch for {field}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Non-finite value in {field} at index {index}")]
    NonFinite { field: &'static str, index: usize },
    #[error("Value {value} in {field} at index {index} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        index: usize,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("Configuration mismatch: {0}")]
    ConfigMismatch(String),
}

/// Checks a flat buffer for the expected length and finite contents.
pub(crate) fn check_buffer(
    field: &'static str,
    values: &[f32],
    expected: usize,
) -> Result<(), MemoryError> {
    if values.len() != expected {
        return Err(MemoryError::ShapeMismatch {
            field,
            expected,
            actual: values.len(),
        });
    }
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(MemoryError::NonFinite { field, index }),
        None => Ok(()),
    }
}

/// Checks every value lies in `[min, max]`. Assumes `check_buffer` already passed.
pub(crate) fn check_range(
    field: &'static str,
    values: &[f32],
    min: f32,
    max: f32,
) -> Result<(), MemoryError> {
    match values.iter().position(|&v| v < min || v > max) {
        Some(index) => Err(MemoryError::OutOfRange {
            field,
            index,
            value: values[index],
            min,
            max,
        }),
        None => Ok(()),
    }
}
