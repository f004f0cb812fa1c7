//! The per-timestep memory transition and the stateful [`Memory`] wrapper.

use super::addressing::content_addressing;
use super::allocation::allocation_weighting;
use super::config::MemoryConfig;
use super::error::MemoryError;
use super::interface::Interface;
use super::linkage::{update_precedence, update_temporal_link};
use super::read::{blend_read_weights, read_memory, temporal_read_weights};
use super::state::{MemoryState, MemoryStats, ReadResult};
use super::usage::{retention, update_usage};
use super::write::{erase_and_add, write_weighting};

/// Computes the state after one timestep and the words read during it.
///
/// Per batch element, in order: allocation from the old usage, write
/// weighting, erase/add, link and precedence update, usage update with the
/// previous step's read weights, then new read weights and the read itself.
pub fn step(
    state: &MemoryState,
    interface: &Interface,
) -> Result<(MemoryState, ReadResult), MemoryError> {
    check_compatible(state, interface)?;
    let mut next = state.clone();
    let read = advance(&mut next, interface);
    Ok((next, read))
}

fn check_compatible(state: &MemoryState, interface: &Interface) -> Result<(), MemoryError> {
    if state.config().same_shape(interface.config()) {
        return Ok(());
    }
    let e = MemoryError::ConfigMismatch(format!(
        "state is {:?} but interface was built for {:?}",
        state.config(),
        interface.config()
    ));
    tracing::warn!("Rejected interface: {}", e);
    Err(e)
}

fn advance(state: &mut MemoryState, interface: &Interface) -> ReadResult {
    let config = *state.config();
    let n = config.num_cells;
    let w = config.cell_size;
    let r = config.read_heads;

    let mut result = ReadResult::zeros(&config);
    let mut write_content = vec![0.0; n];
    let mut psi = vec![0.0; n];
    let mut read_content = vec![0.0; r * n];
    let mut forward = vec![0.0; r * n];
    let mut backward = vec![0.0; r * n];

    for b in 0..config.batch_size {
        let memory = &mut state.memory[b * n * w..(b + 1) * n * w];
        let usage = &mut state.usage[b * n..(b + 1) * n];
        let link = &mut state.temporal_link[b * n * n..(b + 1) * n * n];
        let precedence = &mut state.precedence[b * n..(b + 1) * n];
        let read_weights = &mut state.read_weights[b * r * n..(b + 1) * r * n];
        let write_weights = &mut state.write_weights[b * n..(b + 1) * n];
        let allocation = &mut state.allocation[b * n..(b + 1) * n];

        // write
        allocation_weighting(usage, allocation);
        content_addressing(
            memory,
            interface.write_key(b),
            &[interface.write_strength(b)],
            n,
            w,
            config.epsilon,
            &mut write_content,
        );
        write_weighting(
            allocation,
            &write_content,
            interface.allocation_gate(b),
            interface.write_gate(b),
            write_weights,
        );
        erase_and_add(
            memory,
            write_weights,
            interface.erase_vector(b),
            interface.write_vector(b),
            w,
        );

        // linkage, then usage with the read weights still from the last step
        update_temporal_link(link, write_weights, precedence);
        update_precedence(precedence, write_weights);
        retention(interface.free_gates(b), read_weights, n, &mut psi);
        update_usage(usage, write_weights, &psi);

        // read
        content_addressing(
            memory,
            interface.read_keys(b),
            interface.read_strengths(b),
            n,
            w,
            config.epsilon,
            &mut read_content,
        );
        temporal_read_weights(read_weights, link, r, n, &mut forward, &mut backward);
        blend_read_weights(
            &forward,
            &backward,
            &read_content,
            interface.read_modes(b),
            read_weights,
        );
        read_memory(
            read_weights,
            memory,
            r,
            w,
            &mut result.data[b * r * w..(b + 1) * r * w],
        );
    }

    tracing::trace!(
        batch_size = config.batch_size,
        write_mass = state.write_weights.iter().sum::<f32>(),
        read_mass = state.read_weights.iter().sum::<f32>(),
        "memory step"
    );

    result
}

/// Memory bank that owns its state across timesteps.
#[derive(Debug, Clone)]
pub struct Memory {
    state: MemoryState,
}

impl Memory {
    pub fn new(config: MemoryConfig) -> Result<Self, MemoryError> {
        let state = MemoryState::new(config)?;
        tracing::debug!(
            batch_size = config.batch_size,
            num_cells = config.num_cells,
            cell_size = config.cell_size,
            read_heads = config.read_heads,
            "Created DNC memory"
        );
        Ok(Self { state })
    }

    /// Wraps an existing state, e.g. one seeded through the `MemoryState` builders.
    pub fn from_state(state: MemoryState) -> Self {
        Self { state }
    }

    /// Zeroes memory, usage, links, precedence and read weights.
    pub fn reset(&mut self) {
        self.state.reset();
        tracing::debug!(batch_size = self.state.config().batch_size, "Reset DNC memory");
    }

    /// Performs one read/write cycle.
    pub fn step(&mut self, interface: &Interface) -> Result<ReadResult, MemoryError> {
        check_compatible(&self.state, interface)?;
        Ok(advance(&mut self.state, interface))
    }

    pub fn config(&self) -> &MemoryConfig {
        self.state.config()
    }

    pub fn state(&self) -> &MemoryState {
        &self.state
    }

    pub fn into_state(self) -> MemoryState {
        self.state
    }

    pub fn stats(&self) -> MemoryStats {
        self.state.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::interface::InterfaceFields;

    fn seeded_state(config: MemoryConfig) -> MemoryState {
        MemoryState::new(config)
            .unwrap()
            .with_memory(vec![
                1.0, -1.0, -1.0, 1.0, 4.0, 5.0, 6.0, 7.0, -1.0, 1.0, 1.0, -1.0, // batch 0
                12.0, 16.0, 14.0, 10.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, // batch 1
            ])
            .unwrap()
    }

    #[test]
    fn test_write_weight_allocation_vs_content() {
        let config = MemoryConfig::new(2, 3, 4, 2);
        let state = seeded_state(config)
            .with_usage(vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0])
            .unwrap();
        let fields = InterfaceFields {
            write_key: vec![4.0, 5.0, 6.0, 7.0, 12.0, 16.0, 14.0, 10.0],
            write_strength: vec![1.0, 0.5],
            allocation_gate: vec![1.0, 0.0],
            write_gate: vec![1.0, 1.0],
            ..InterfaceFields::zeros(&config)
        };
        let interface = Interface::new(&config, fields).unwrap();
        let (state, _) = step(&state, &interface).unwrap();

        // batch 0 only uses allocation
        let w0 = state.batch_write_weights(0);
        assert!((w0[0] - 1.0).abs() < 1e-6);
        assert!(w0[1].abs() < 1e-6);
        assert!(w0[2].abs() < 1e-6);

        // batch 1 only uses content
        let w1 = state.batch_write_weights(1);
        assert!(w1[0] > w1[1]);
        assert!(w1[0] > w1[2]);
        assert_eq!(w1[1], w1[2]);
    }

    #[test]
    fn test_mismatched_interface_rejected() {
        let mut memory = Memory::new(MemoryConfig::new(1, 4, 2, 1)).unwrap();
        let other = MemoryConfig::new(1, 4, 3, 1);
        let interface = Interface::new(&other, InterfaceFields::zeros(&other)).unwrap();
        let before = memory.state().clone();
        assert!(matches!(
            memory.step(&interface),
            Err(MemoryError::ConfigMismatch(_))
        ));
        assert_eq!(memory.state(), &before);
        assert!(matches!(
            step(&before, &interface),
            Err(MemoryError::ConfigMismatch(_))
        ));
    }

    #[test]
    fn test_read_returns_written_word() {
        let config = MemoryConfig::new(1, 4, 3, 1);
        let mut memory = Memory::new(config).unwrap();
        let write = InterfaceFields {
            write_vector: vec![0.5, 1.0, 2.0],
            erase_vector: vec![1.0; 3],
            allocation_gate: vec![1.0],
            write_gate: vec![1.0],
            ..InterfaceFields::zeros(&config)
        };
        memory.step(&Interface::new(&config, write).unwrap()).unwrap();

        let read = InterfaceFields {
            read_keys: vec![0.5, 1.0, 2.0],
            read_strengths: vec![50.0],
            read_modes: vec![0.0, 0.0, 1.0],
            ..InterfaceFields::zeros(&config)
        };
        let result = memory.step(&Interface::new(&config, read).unwrap()).unwrap();
        let word = result.head(0, 0);
        for (got, want) in word.iter().zip([0.5, 1.0, 2.0]) {
            assert!((got - want).abs() < 1e-3, "got {:?}", word);
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let config = MemoryConfig::new(1, 3, 2, 1);
        let mut memory = Memory::new(config).unwrap();
        let fields = InterfaceFields {
            write_vector: vec![1.0, 1.0],
            allocation_gate: vec![1.0],
            write_gate: vec![1.0],
            ..InterfaceFields::zeros(&config)
        };
        memory.step(&Interface::new(&config, fields).unwrap()).unwrap();
        assert!(memory.stats().mean_usage > 0.0);

        memory.reset();
        assert_eq!(memory.state(), &MemoryState::new(config).unwrap());
    }
}
