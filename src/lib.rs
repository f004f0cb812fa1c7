//! External memory of a Differentiable Neural Computer.
//!
//! The [`memory`] module holds the per-timestep read/write bank: content
//! addressing, usage-based allocation, temporal linkage and the read/write
//! cycle driven by a controller-produced [`memory::Interface`].

pub mod memory;

pub use memory::{
    step, Interface, InterfaceFields, Memory, MemoryConfig, MemoryError, MemoryState,
    MemoryStats, ReadResult,
};
