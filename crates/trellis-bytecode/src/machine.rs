//! The narrow interface through which compiled classes reach the machine.

use trellis_core::{CharacterClass, ClassGraph, GraphError};

use crate::StateId;

/// Default state-table capacity of a matching machine.
pub const MAX_STATE_SIZE: usize = 65521;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    #[error("state table is full: {required} states required, {available} available")]
    OutOfSpace { required: usize, available: usize },
    #[error(transparent)]
    Automaton(#[from] GraphError),
}

/// A matching machine that accepts published byte automata.
///
/// Capacity is fixed for the lifetime of the machine; publishing only ever
/// appends, so a failed publish leaves the table untouched.
pub trait Machine {
    /// Total number of states the table can hold.
    fn capacity(&self) -> usize;

    /// Index the next published state will receive.
    fn next_free_state(&self) -> usize;

    /// Append `graph` and return the id of its root state.
    fn publish(&mut self, graph: &ClassGraph) -> Result<StateId, MachineError>;

    fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.next_free_state())
    }
}

impl<M: Machine + ?Sized> Machine for &mut M {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }
    fn next_free_state(&self) -> usize {
        (**self).next_free_state()
    }
    fn publish(&mut self, graph: &ClassGraph) -> Result<StateId, MachineError> {
        (**self).publish(graph)
    }
}

/// Values that can serialise themselves into a machine.
///
/// Publishing is not memoised here: the same value published twice occupies
/// the table twice. Deduplication belongs to the caller's registry.
pub trait Publish {
    fn publish_to<M: Machine + ?Sized>(&self, machine: &mut M) -> Result<StateId, MachineError>;
}

impl Publish for ClassGraph {
    fn publish_to<M: Machine + ?Sized>(&self, machine: &mut M) -> Result<StateId, MachineError> {
        machine.publish(self)
    }
}

impl Publish for CharacterClass {
    fn publish_to<M: Machine + ?Sized>(&self, machine: &mut M) -> Result<StateId, MachineError> {
        machine.publish(&self.to_graph()?)
    }
}
