//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::CharacterClass;

impl CharacterClass {
    pub(crate) fn ensure_same_encoding(&self, other: &CharacterClass) {
        assert_eq!(
            self.encoding(),
            other.encoding(),
            "CharacterClass: set operation across encodings ({} vs {})",
            self.encoding(),
            other.encoding(),
        );
    }
}
