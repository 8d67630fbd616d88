//! In-memory state table.

use trellis_core::{ClassGraph, Encoding, GraphState};

use crate::machine::{MAX_STATE_SIZE, Machine, MachineError};
use crate::StateId;

/// A flat table of byte-automaton states.
///
/// Each published graph is appended with its transitions rebased onto its
/// position in the table, so a root `StateId` is all a matcher needs.
#[derive(Debug, Clone)]
pub struct StateTable {
    states: Vec<GraphState>,
    roots: Vec<StateId>,
    capacity: usize,
}

impl Default for StateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTable {
    pub fn new() -> Self {
        Self::with_capacity(MAX_STATE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::new(),
            roots: Vec::new(),
            capacity,
        }
    }

    pub fn states(&self) -> &[GraphState] {
        &self.states
    }

    /// Roots in publication order.
    pub fn roots(&self) -> &[StateId] {
        &self.roots
    }

    /// Number of successful publishes.
    pub fn writes(&self) -> usize {
        self.roots.len()
    }

    pub fn state(&self, id: StateId) -> Option<&GraphState> {
        self.states.get(id.index())
    }

    /// Length of the shortest prefix of `bytes` accepted from `root`.
    pub fn probe(&self, root: StateId, bytes: &[u8]) -> Option<usize> {
        let mut state = self.state(root)?;
        for (i, &byte) in bytes.iter().enumerate() {
            if state.accept.contains(byte) {
                return Some(i + 1);
            }
            state = self.state(StateId(state.target(byte)?))?;
        }
        None
    }

    /// Whether `bytes` as a whole is accepted from `root`.
    pub fn matches(&self, root: StateId, bytes: &[u8]) -> bool {
        self.probe(root, bytes) == Some(bytes.len()) && !bytes.is_empty()
    }

    /// Whether the character `c`, encoded with `encoding`, is accepted from `root`.
    pub fn contains_char(&self, root: StateId, encoding: Encoding, c: char) -> bool {
        encoding
            .encode_char(c)
            .is_some_and(|bytes| self.matches(root, &bytes))
    }
}

impl Machine for StateTable {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn next_free_state(&self) -> usize {
        self.states.len()
    }

    fn publish(&mut self, graph: &ClassGraph) -> Result<StateId, MachineError> {
        let required = graph.state_size();
        let available = self.remaining();
        if required > available {
            return Err(MachineError::OutOfSpace {
                required,
                available,
            });
        }

        let base = self.states.len() as u32;
        self.states.extend(graph.states().iter().map(|state| GraphState {
            accept: state.accept,
            next: state
                .next
                .iter()
                .map(|&(set, target)| (set, target + base))
                .collect(),
        }));

        let root = StateId(base);
        self.roots.push(root);
        Ok(root)
    }
}
