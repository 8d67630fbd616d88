//! Interning of canonical pattern texts.
//!
//! The registry keys published classes by their canonical text; interning
//! turns each distinct text into a `Symbol` so lookups and per-encoding maps
//! compare integers instead of strings.

use indexmap::IndexSet;

/// Handle to an interned text. Ordered by first insertion.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interner {
    texts: IndexSet<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the existing symbol if it was seen before.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(sym) = self.get(text) {
            return sym;
        }
        let (index, _) = self.texts.insert_full(text.into());
        Symbol(index as u32)
    }

    /// Symbol for `text` without interning it.
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.texts.get_index_of(text).map(|i| Symbol(i as u32))
    }

    /// # Panics
    /// Panics if the symbol was not created by this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.texts[sym.0 as usize]
    }

    #[inline]
    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.texts.get_index(sym.0 as usize).map(|s| &**s)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.texts
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol(i as u32), &**s))
    }
}
