//! Minimised byte automaton for a character class.
//!
//! States are numbered from the root (`0`) in breadth-first order. A state
//! accepts a byte when reading that byte completes a member of the class, and
//! moves to another state when the byte is a proper prefix of one.
//! Graphs are acyclic: every class is a finite set of finite byte strings.
//!
//! Construction goes through a byte-level [`Hir`] and a minimised dense DFA;
//! the DFA's live states become [`GraphState`] rows.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use regex_automata::dfa::{Automaton, StartKind, dense};
use regex_automata::nfa::thompson;
use regex_automata::util::primitives::StateID;
use regex_automata::{Anchored, Input, MatchKind};
use regex_syntax::hir::{Class, ClassBytes, ClassBytesRange, Hir};

use crate::ByteSet;
use crate::encoding::ByteSequence;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct GraphState {
    /// Bytes that complete a match from this state.
    pub accept: ByteSet,
    /// Outgoing edges, disjoint and ordered by lowest byte.
    pub next: Vec<(ByteSet, u32)>,
}

impl GraphState {
    pub fn target(&self, byte: u8) -> Option<u32> {
        self.next
            .iter()
            .find(|(set, _)| set.contains(byte))
            .map(|&(_, t)| t)
    }

    fn is_dead(&self) -> bool {
        self.accept.is_empty() && self.next.is_empty()
    }
}

/// The byte automaton could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphError(String);

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot build byte automaton: {}", self.0)
    }
}

impl std::error::Error for GraphError {}

#[derive(Clone, Debug)]
pub struct ClassGraph {
    states: Vec<GraphState>,
    /// Expression the states were built from, kept for concatenation.
    hir: Hir,
}

impl PartialEq for ClassGraph {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
    }
}

impl Eq for ClassGraph {}

impl Default for ClassGraph {
    fn default() -> Self {
        Self::empty()
    }
}

impl ClassGraph {
    /// Graph that matches nothing. Still occupies its root state.
    pub fn empty() -> Self {
        Self {
            states: vec![GraphState::default()],
            hir: Hir::fail(),
        }
    }

    /// Build the minimal automaton accepting exactly the given sequences.
    pub fn from_sequences(seqs: &[ByteSequence]) -> Result<Self, GraphError> {
        let members: Vec<Hir> = seqs
            .iter()
            .filter(|seq| !seq.is_empty())
            .map(|seq| Hir::concat(seq.iter().map(|&(lo, hi)| byte_class(lo, hi)).collect()))
            .collect();
        if members.is_empty() {
            return Ok(Self::empty());
        }
        Self::from_hir(Hir::alternation(members))
    }

    pub fn states(&self) -> &[GraphState] {
        &self.states
    }

    pub fn root(&self) -> &GraphState {
        &self.states[0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().is_dead()
    }

    /// Number of machine states needed to publish this graph.
    pub fn state_size(&self) -> usize {
        self.states.len().max(1)
    }

    /// Length of the shortest prefix of `bytes` the graph accepts.
    pub fn shortest_match(&self, bytes: &[u8]) -> Option<usize> {
        let mut state = self.root();
        for (i, &byte) in bytes.iter().enumerate() {
            if state.accept.contains(byte) {
                return Some(i + 1);
            }
            state = &self.states[state.target(byte)? as usize];
        }
        None
    }

    /// Whether the whole of `bytes` is a member.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        let Some((&last, init)) = bytes.split_last() else {
            return false;
        };
        let mut state = self.root();
        for &byte in init {
            match state.target(byte) {
                Some(t) => state = &self.states[t as usize],
                None => return false,
            }
        }
        state.accept.contains(last)
    }

    /// Concatenate: accept a member of `self` followed by a member of `other`.
    pub fn append_sequence(&self, other: &ClassGraph) -> Result<ClassGraph, GraphError> {
        if self.is_empty() || other.is_empty() {
            return Ok(Self::empty());
        }
        Self::from_hir(Hir::concat(vec![self.hir.clone(), other.hir.clone()]))
    }

    fn from_hir(hir: Hir) -> Result<Self, GraphError> {
        let nfa = thompson::Compiler::new()
            .configure(thompson::Config::new().utf8(false))
            .build_from_hir(&hir)
            .map_err(|e| GraphError(e.to_string()))?;
        let dfa = dense::DFA::builder()
            .configure(
                dense::DFA::config()
                    .start_kind(StartKind::Anchored)
                    .match_kind(MatchKind::All)
                    .minimize(true),
            )
            .build_from_nfa(&nfa)
            .map_err(|e| GraphError(e.to_string()))?;
        let start = dfa
            .start_state_forward(&Input::new("").anchored(Anchored::Yes))
            .map_err(|e| GraphError(e.to_string()))?;

        let mut rows = Rows {
            dfa: &dfa,
            memo: HashMap::new(),
            active: HashSet::new(),
            ids: HashMap::new(),
            states: Vec::new(),
        };
        let Some(root) = rows.visit(start)? else {
            return Ok(Self::empty());
        };
        Ok(Self {
            states: renumber(&rows.states, root),
            hir,
        })
    }
}

/// One line per state: `N: accept <bytes>; <bytes> -> M`.
impl fmt::Display for ClassGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            write!(f, "{id}:")?;
            if !state.accept.is_empty() {
                write!(f, " accept {}", state.accept)?;
            }
            for (set, target) in &state.next {
                write!(f, "; {set} -> {target}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn byte_class(lo: u8, hi: u8) -> Hir {
    Hir::class(Class::Bytes(ClassBytes::new([ClassBytesRange::new(lo, hi)])))
}

/// Interns the rows reachable from a DFA state.
struct Rows<'a> {
    dfa: &'a dense::DFA<Vec<u32>>,
    memo: HashMap<StateID, Option<u32>>,
    active: HashSet<StateID>,
    ids: HashMap<GraphState, u32>,
    states: Vec<GraphState>,
}

impl Rows<'_> {
    /// Row id for `state`, or `None` when no member continues from it.
    fn visit(&mut self, state: StateID) -> Result<Option<u32>, GraphError> {
        if let Some(&id) = self.memo.get(&state) {
            return Ok(id);
        }
        if !self.active.insert(state) {
            return Err(GraphError("member set is not finite".to_string()));
        }

        let mut row = GraphState::default();
        for byte in 0..=255u8 {
            let next = self.dfa.next_state(state, byte);
            if self.dfa.is_dead_state(next) {
                continue;
            }
            // Matches are reported one transition late.
            if self.dfa.is_match_state(self.dfa.next_eoi_state(next)) {
                row.accept.insert(byte);
            }
            let Some(target) = self.visit(next)? else {
                continue;
            };
            match row.next.iter_mut().find(|(_, t)| *t == target) {
                Some((set, _)) => set.insert(byte),
                None => row.next.push((ByteSet::range(byte, byte), target)),
            }
        }
        self.active.remove(&state);

        let id = if row.is_dead() {
            None
        } else if let Some(&id) = self.ids.get(&row) {
            Some(id)
        } else {
            let id = self.states.len() as u32;
            self.ids.insert(row.clone(), id);
            self.states.push(row);
            Some(id)
        };
        self.memo.insert(state, id);
        Ok(id)
    }
}

/// Renumber breadth-first from `root`, dropping unreachable rows.
fn renumber(rows: &[GraphState], root: u32) -> Vec<GraphState> {
    let mut order: HashMap<u32, u32> = HashMap::from([(root, 0)]);
    let mut queue = VecDeque::from([root]);
    let mut visit = Vec::new();
    while let Some(id) = queue.pop_front() {
        visit.push(id);
        for &(_, t) in &rows[id as usize].next {
            if !order.contains_key(&t) {
                order.insert(t, order.len() as u32);
                queue.push_back(t);
            }
        }
    }

    visit
        .into_iter()
        .map(|id| {
            let row = &rows[id as usize];
            GraphState {
                accept: row.accept,
                next: row.next.iter().map(|&(set, t)| (set, order[&t])).collect(),
            }
        })
        .collect()
}
