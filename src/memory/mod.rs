//! DNC external memory: addressing, allocation, linkage and the read/write cycle.

pub mod addressing;
pub mod allocation;
pub mod config;
pub mod dnc;
pub mod error;
pub mod interface;
pub mod linkage;
pub mod read;
pub mod state;
pub mod tensor;
pub mod usage;
pub mod write;

pub use config::MemoryConfig;
pub use dnc::{step, Memory};
pub use error::MemoryError;
pub use interface::{Interface, InterfaceFields};
pub use state::{MemoryState, MemoryStats, ReadResult};
