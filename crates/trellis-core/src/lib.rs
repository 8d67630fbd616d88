#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Value types shared by the trellis compiler and machine.
//!
//! - [`CharacterClass`]: a set of characters and raw bytes under one [`Encoding`]
//! - [`ClassGraph`]: the minimised byte automaton a class lowers to
//! - [`Interner`]: canonical pattern text to [`Symbol`]

mod byteset;
mod class;
pub mod colors;
pub mod encoding;
mod graph;
mod interner;
mod invariants;

pub use byteset::ByteSet;
pub use class::CharacterClass;
pub use colors::Colors;
pub use encoding::{ByteSequence, Encoding, UnknownEncoding};
pub use graph::{ClassGraph, GraphError, GraphState};
pub use interner::{Interner, Symbol};

#[cfg(test)]
mod class_tests;
#[cfg(test)]
mod interner_tests;
