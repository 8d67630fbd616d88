//! Long-lived dedup cache of published classes.
//!
//! Maps `(encoding, canonical text)` to the machine index the class was
//! published at, and keeps a copy of each published class so later passes can
//! recover its contents from the index alone. A registry belongs to one
//! machine: sharing it across machines hands out indices that do not exist.

use std::collections::HashMap;

use trellis_bytecode::{Machine, MachineError, Publish, StateId};
use trellis_core::{CharacterClass, Encoding, Interner, Symbol};

#[derive(Debug, Clone, Default)]
struct EncodingEntries {
    indices: HashMap<Symbol, StateId>,
    classes: HashMap<StateId, CharacterClass>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    keys: Interner,
    encodings: HashMap<Encoding, EncodingEntries>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry key for a canonical text. Case folding changes what a text
    /// denotes, so case-insensitive keys are kept apart.
    pub fn key(text: &str, ignore_case: bool) -> String {
        if ignore_case {
            format!("(?i){text}")
        } else {
            text.to_string()
        }
    }

    pub fn get(&self, encoding: Encoding, key: &str) -> Option<StateId> {
        let sym = self.keys.get(key)?;
        self.encodings.get(&encoding)?.indices.get(&sym).copied()
    }

    /// The class published at `index`.
    pub fn class(&self, encoding: Encoding, index: StateId) -> Option<&CharacterClass> {
        self.encodings.get(&encoding)?.classes.get(&index)
    }

    /// Return the index for `key`, publishing `class` on first sight.
    ///
    /// A failed publish records nothing.
    pub fn lookup_or_publish<M: Machine + ?Sized>(
        &mut self,
        machine: &mut M,
        key: &str,
        class: &CharacterClass,
    ) -> Result<StateId, MachineError> {
        let encoding = class.encoding();
        if let Some(index) = self.get(encoding, key) {
            return Ok(index);
        }
        let index = class.publish_to(machine)?;
        let sym = self.keys.intern(key);
        let entries = self.encodings.entry(encoding).or_default();
        entries.indices.insert(sym, index);
        entries.classes.insert(index, class.clone());
        Ok(index)
    }

    /// Published entries across all encodings.
    pub fn len(&self) -> usize {
        self.encodings.values().map(|e| e.indices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
